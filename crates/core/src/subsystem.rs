//! Subsystem lifecycle
//!
//! Ties the callback registry and the game-thread queue to an explicitly
//! owned instance. The host constructs it at startup, hands the registry
//! out to collaborators, and drops it at shutdown; a second live instance
//! in the same process is rejected rather than silently replacing the
//! first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use soundlink_sdk::EventDispatcher;

use crate::callbacks::CallbackRegistry;
use crate::config::CallbackConfig;
use crate::error::SubsystemError;
use crate::tasks::GameThreadQueue;

static SUBSYSTEM_LIVE: AtomicBool = AtomicBool::new(false);

/// Releases the liveness flag once the owning subsystem is fully dropped
struct LivenessGuard;

impl Drop for LivenessGuard {
    fn drop(&mut self) {
        SUBSYSTEM_LIVE.store(false, Ordering::Release);
    }
}

/// The audio callback subsystem
///
/// Owns the [`CallbackRegistry`] and the [`GameThreadQueue`] delegate
/// callbacks are deferred to. Dropping it drains every outstanding package
/// across all game objects.
pub struct AudioCallbackSubsystem {
    registry: Arc<CallbackRegistry>,
    queue: GameThreadQueue,
    // Declared last: the flag is released only after the registry drains
    _guard: LivenessGuard,
}

impl AudioCallbackSubsystem {
    /// Bring the subsystem up
    ///
    /// `dispatcher` is the engine bridge used for synchronous callback
    /// cancellation during game object teardown.
    ///
    /// # Errors
    /// [`SubsystemError::AlreadyInitialized`] if another instance is alive
    /// in this process.
    pub fn initialize(
        config: &CallbackConfig,
        dispatcher: Arc<dyn EventDispatcher>,
    ) -> Result<Self, SubsystemError> {
        if SUBSYSTEM_LIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::error!("Audio callback subsystem has already been initialized");
            return Err(SubsystemError::AlreadyInitialized);
        }
        let guard = LivenessGuard;

        let queue = GameThreadQueue::new(config.task_queue_capacity);
        let registry = Arc::new(CallbackRegistry::new(config, dispatcher, queue.sender()));

        tracing::info!(
            "Audio callback subsystem initialized ({:?} policy, queue capacity {})",
            config.optimize,
            config.task_queue_capacity
        );

        Ok(Self {
            registry,
            queue,
            _guard: guard,
        })
    }

    /// The callback registry, shareable with collaborators on any thread
    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    /// Run deferred delegate callbacks
    ///
    /// Called once per frame on the game thread. Returns the number of
    /// callbacks executed.
    pub fn process_game_thread_tasks(&self) -> usize {
        self.queue.process()
    }

    /// Number of deferred callbacks waiting for the next frame
    pub fn pending_task_count(&self) -> usize {
        self.queue.len()
    }
}
