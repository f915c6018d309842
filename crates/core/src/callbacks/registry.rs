//! Callback package registry - per-game-object bookkeeping
//!
//! Exclusive owner of the game-object-to-package map. All map access goes
//! through one mutex; package invocation and deallocation never happen
//! while it is held, since both can run arbitrary consumer code.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::SlotMap;

use soundlink_sdk::{CallbackType, EventCallback, EventDispatcher, GameObjectId};

use crate::config::{CallbackConfig, OptimizePolicy};
use crate::tasks::TaskSender;

use super::package::{CallbackPackage, LatentAction, PackageKey, PostEventDelegate};

/// Map state behind the registry lock
///
/// Invariant: a key is in `packages` iff it is in exactly one `by_object`
/// set. Packages are never shared across game objects.
pub(super) struct RegistryState {
    pub(super) packages: SlotMap<PackageKey, Arc<CallbackPackage>>,
    pub(super) by_object: HashMap<GameObjectId, HashSet<PackageKey>>,
}

/// Thread-safe registry of event callback packages keyed by game object
///
/// Constructed once at subsystem startup and handed by reference to every
/// collaborator that needs it; all operations are safe from any thread.
pub struct CallbackRegistry {
    pub(super) state: Mutex<RegistryState>,
    policy: OptimizePolicy,
    reserve_size: usize,
    dispatcher: Arc<dyn EventDispatcher>,
    pub(super) tasks: TaskSender,
}

impl CallbackRegistry {
    /// Create an empty registry
    ///
    /// `dispatcher` is the engine surface used for synchronous cancellation
    /// during game object teardown; `tasks` is where delegate callbacks are
    /// deferred to.
    pub fn new(
        config: &CallbackConfig,
        dispatcher: Arc<dyn EventDispatcher>,
        tasks: TaskSender,
    ) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                packages: SlotMap::with_key(),
                by_object: HashMap::new(),
            }),
            policy: config.optimize,
            reserve_size: config.reserve_size,
            dispatcher,
            tasks,
        }
    }

    /// Register a raw function-pointer callback for a pending event
    ///
    /// `user_data` is handed back in `EventCallbackInfo::user_data` on every
    /// invocation. `None` still creates a package, so events posted without
    /// a callback are tracked for [`has_active_events`](Self::has_active_events).
    /// The returned key doubles as the engine cookie via
    /// [`PackageKey::to_cookie`].
    pub fn create_function_callback(
        &self,
        callback: Option<EventCallback>,
        user_data: u64,
        flags: CallbackType,
        game_object: GameObjectId,
    ) -> PackageKey {
        self.insert(
            CallbackPackage::FunctionPointer {
                callback,
                user_data,
                flags,
            },
            game_object,
        )
    }

    /// Register a game-thread delegate for a pending event
    pub fn create_delegate_callback(
        &self,
        delegate: PostEventDelegate,
        flags: CallbackType,
        game_object: GameObjectId,
    ) -> PackageKey {
        self.insert(
            CallbackPackage::DelegateDispatch {
                delegate: Some(delegate),
                flags,
            },
            game_object,
        )
    }

    /// Register a latent wait-for-event-end action
    ///
    /// Holds only a weak back-reference; the action stays owned by the
    /// latent-task machinery.
    pub fn create_latent_callback(
        &self,
        action: &Arc<LatentAction>,
        game_object: GameObjectId,
    ) -> PackageKey {
        self.insert(
            CallbackPackage::LatentResume {
                action: Arc::downgrade(action),
            },
            game_object,
        )
    }

    fn insert(&self, package: CallbackPackage, game_object: GameObjectId) -> PackageKey {
        let mut state = self.state.lock();
        let key = state.packages.insert(Arc::new(package));
        state
            .by_object
            .entry(game_object)
            .or_default()
            .insert(key);
        tracing::trace!("Registered callback package {:?} for {}", key, game_object);
        key
    }

    /// Remove and free a callback package
    ///
    /// Safe no-op if the package has already been removed (for example by an
    /// end-of-event dispatch that won the race).
    pub fn remove_package(&self, key: PackageKey, game_object: GameObjectId) {
        let removed = {
            let mut state = self.state.lock();
            let removed = state.packages.remove(key);
            if removed.is_some() {
                self.remove_from_set(&mut state, key, game_object);
            }
            removed
        };
        // Dropped outside the lock: the last reference can run arbitrary
        // consumer destructors that must not re-enter the registry lock.
        drop(removed);
    }

    /// Announce a game object that will post events
    ///
    /// Under the `Speed` policy this pre-creates its package set with
    /// reserved capacity; otherwise it is a no-op.
    pub fn register_game_object(&self, game_object: GameObjectId) {
        if self.policy == OptimizePolicy::Speed {
            let mut state = self.state.lock();
            state
                .by_object
                .entry(game_object)
                .or_insert_with(|| HashSet::with_capacity(self.reserve_size));
        }
    }

    /// Tear down a game object, freeing all of its remaining packages
    ///
    /// Cancels the object's in-flight callbacks on the engine first; the
    /// dispatcher guarantees no further dispatches for it once that call
    /// returns, so the drain below cannot race the engine thread.
    pub fn unregister_game_object(&self, game_object: GameObjectId) {
        self.dispatcher.cancel_event_callbacks(game_object);

        let drained: Vec<Arc<CallbackPackage>> = {
            let mut state = self.state.lock();
            match state.by_object.remove(&game_object) {
                Some(keys) => keys
                    .into_iter()
                    .filter_map(|key| state.packages.remove(key))
                    .collect(),
                None => return,
            }
        };
        tracing::debug!(
            "Unregistered {} with {} outstanding packages",
            game_object,
            drained.len()
        );
        drop(drained);
    }

    /// Whether any events are still outstanding for a game object
    pub fn has_active_events(&self, game_object: GameObjectId) -> bool {
        let state = self.state.lock();
        state
            .by_object
            .get(&game_object)
            .is_some_and(|set| !set.is_empty())
    }

    /// Number of outstanding packages for a game object
    pub fn active_event_count(&self, game_object: GameObjectId) -> usize {
        let state = self.state.lock();
        state
            .by_object
            .get(&game_object)
            .map_or(0, |set| set.len())
    }

    /// Drop a key from its owner's set, applying the retention policy
    ///
    /// Caller must have already removed the key from `packages` and must
    /// hold the lock.
    pub(super) fn remove_from_set(
        &self,
        state: &mut RegistryState,
        key: PackageKey,
        game_object: GameObjectId,
    ) {
        if let Some(set) = state.by_object.get_mut(&game_object) {
            set.remove(&key);
            if self.policy == OptimizePolicy::MemoryUsage && set.is_empty() {
                state.by_object.remove(&game_object);
            }
        }
    }
}

impl Drop for CallbackRegistry {
    fn drop(&mut self) {
        let drained: Vec<Arc<CallbackPackage>> = {
            let mut state = self.state.lock();
            state.by_object.clear();
            state.packages.drain().map(|(_, package)| package).collect()
        };
        if !drained.is_empty() {
            tracing::debug!(
                "Callback registry dropped with {} outstanding packages",
                drained.len()
            );
        }
        drop(drained);
    }
}
