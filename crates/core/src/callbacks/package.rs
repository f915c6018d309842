//! Callback package variants and the per-variant dispatch

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use slotmap::{Key, KeyData};

use soundlink_sdk::{
    CallbackPayload, CallbackType, EventCallback, EventCallbackInfo, GameObjectId, PlayingId,
};

use crate::tasks::TaskSender;

slotmap::new_key_type! {
    /// Stable handle for a registered callback package
    pub struct PackageKey;
}

impl PackageKey {
    /// Opaque cookie value carried in [`EventCallbackInfo::package`]
    ///
    /// Never zero for a live key, so 0 stays usable as "unset".
    pub fn to_cookie(self) -> u64 {
        self.data().as_ffi()
    }

    /// Rebuild a key from an engine-supplied cookie
    ///
    /// A stale or garbage cookie yields a key that simply misses on lookup.
    pub fn from_cookie(cookie: u64) -> Self {
        KeyData::from_ffi(cookie).into()
    }
}

/// Consumer-facing classification of an engine callback
///
/// One variant per subscribable [`CallbackType`] bit; delegate consumers
/// match on this instead of the raw flag mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    EndOfEvent,
    EndOfDynamicSequenceItem,
    Marker,
    Duration,
    MusicPlayStarted,
    MusicSyncBeat,
    MusicSyncBar,
    Starvation,
}

impl CallbackKind {
    /// Classify a single-bit callback type from the engine
    ///
    /// Returns `None` for masks with zero or multiple bits, or bits this
    /// layer does not expose to delegates.
    pub fn from_type(event_type: CallbackType) -> Option<Self> {
        match event_type {
            t if t == CallbackType::END_OF_EVENT => Some(Self::EndOfEvent),
            t if t == CallbackType::END_OF_DYNAMIC_SEQUENCE_ITEM => {
                Some(Self::EndOfDynamicSequenceItem)
            }
            t if t == CallbackType::MARKER => Some(Self::Marker),
            t if t == CallbackType::DURATION => Some(Self::Duration),
            t if t == CallbackType::MUSIC_PLAY_STARTED => Some(Self::MusicPlayStarted),
            t if t == CallbackType::MUSIC_SYNC_BEAT => Some(Self::MusicSyncBeat),
            t if t == CallbackType::MUSIC_SYNC_BAR => Some(Self::MusicSyncBar),
            t if t == CallbackType::STARVATION => Some(Self::Starvation),
            _ => None,
        }
    }
}

/// Owned, consumer-facing callback info handed to delegates
///
/// Built from the raw [`EventCallbackInfo`] on the engine thread, then moved
/// into the deferred closure. Holds no reference back to the package, which
/// may be freed before the closure runs.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegateEventInfo {
    /// Game object the event was posted on
    pub game_object: GameObjectId,
    /// Playing instance that produced this callback
    pub playing_id: PlayingId,
    /// Event-type-specific data
    pub payload: CallbackPayload,
}

impl DelegateEventInfo {
    fn from_raw(info: &EventCallbackInfo) -> Self {
        Self {
            game_object: info.game_object,
            playing_id: info.playing_id,
            payload: info.payload.clone(),
        }
    }
}

/// Bound delegate executed on the game thread for each subscribed callback
pub type PostEventDelegate = Arc<dyn Fn(CallbackKind, DelegateEventInfo) + Send + Sync>;

/// A suspended wait-for-event-end action
///
/// Owned by the latent-task machinery; the callback layer holds only a
/// [`Weak`] back-reference, so an externally destroyed action is a silent
/// no-op at resume time.
#[derive(Debug, Default)]
pub struct LatentAction {
    finished: AtomicBool,
}

impl LatentAction {
    /// Create a new, unfinished action
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Whether the event this action waits on has ended
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    fn mark_finished(&self) {
        self.finished.store(true, Ordering::Release);
    }
}

/// A registered callback, one variant per notification style
///
/// Packages are owned by the registry map and invoked only from the engine
/// callback entry point; none of the variants touch the map themselves.
pub(crate) enum CallbackPackage {
    /// Raw function pointer invoked synchronously on the engine thread
    FunctionPointer {
        callback: Option<EventCallback>,
        user_data: u64,
        flags: CallbackType,
    },
    /// Bound delegate, deferred to the game thread
    DelegateDispatch {
        delegate: Option<PostEventDelegate>,
        flags: CallbackType,
    },
    /// Resumption of a suspended wait-for-event-end action
    LatentResume { action: Weak<LatentAction> },
}

impl CallbackPackage {
    /// Mask of callback types this package subscribed to
    pub(crate) fn flags(&self) -> CallbackType {
        match self {
            Self::FunctionPointer { flags, .. } => *flags,
            Self::DelegateDispatch { flags, .. } => *flags,
            // Latent actions only ever care about event completion
            Self::LatentResume { .. } => CallbackType::END_OF_EVENT,
        }
    }

    /// Notify this package of an engine callback
    ///
    /// Called from the engine thread, outside the registry lock.
    pub(crate) fn handle(
        &self,
        event_type: CallbackType,
        info: &EventCallbackInfo,
        tasks: &TaskSender,
    ) {
        match self {
            Self::FunctionPointer {
                callback,
                user_data,
                ..
            } => {
                if let Some(callback) = callback {
                    // The caller-owned slot is filled on a copy; the
                    // engine's record keeps the package handle untouched.
                    let mut user_info = info.clone();
                    user_info.user_data = *user_data;
                    callback(event_type, &user_info);
                }
            }
            Self::DelegateDispatch { delegate, .. } => {
                if let Some(delegate) = delegate {
                    let Some(kind) = CallbackKind::from_type(event_type) else {
                        return;
                    };
                    // Everything the closure needs is captured by value so
                    // the package can be freed before it runs.
                    let delegate = Arc::clone(delegate);
                    let owned_info = DelegateEventInfo::from_raw(info);
                    tasks.queue(move || {
                        delegate(kind, owned_info);
                    });
                }
            }
            Self::LatentResume { action } => {
                if let Some(action) = action.upgrade() {
                    action.mark_finished();
                }
            }
        }
    }
}
