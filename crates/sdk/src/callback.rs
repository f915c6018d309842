//! Callback type masks, payloads, and the raw callback info record

use bitflags::bitflags;

use crate::ids::{GameObjectId, PlayingId};

bitflags! {
    /// Mask of event callback types a caller can subscribe to
    ///
    /// The engine passes exactly one bit per invocation; registrations may
    /// combine several. Bit values match the engine's wire constants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CallbackType: u32 {
        /// The event has finished playing (always terminates the registration)
        const END_OF_EVENT = 0x0001;
        /// An item in a dynamic sequence finished playing
        const END_OF_DYNAMIC_SEQUENCE_ITEM = 0x0002;
        /// Playback reached an authored marker
        const MARKER = 0x0004;
        /// The estimated duration of the event is known
        const DURATION = 0x0008;
        /// An interactive-music segment started playing
        const MUSIC_PLAY_STARTED = 0x0080;
        /// Interactive-music beat boundary
        const MUSIC_SYNC_BEAT = 0x0100;
        /// Interactive-music bar boundary
        const MUSIC_SYNC_BAR = 0x0200;
        /// The source starved for data during playback
        const STARVATION = 0x20000;
    }
}

/// Event-type-specific payload carried in [`EventCallbackInfo`]
///
/// The callback layer passes this through untouched; only variant handlers
/// and consumer code interpret it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CallbackPayload {
    /// No extra data (end of event, starvation, ...)
    #[default]
    None,
    /// Authored marker reached during playback
    Marker {
        /// Marker identifier from the authoring tool
        identifier: u32,
        /// Sample position of the marker within the source
        position: u32,
        /// Optional marker label
        label: String,
    },
    /// Event duration estimation
    Duration {
        /// Duration of the current source in milliseconds
        duration_ms: f32,
        /// Estimated total duration of the event in milliseconds
        estimated_duration_ms: f32,
        /// Engine node that produced the estimate
        audio_node_id: u64,
    },
    /// Interactive-music sync point (beat, bar, segment start)
    MusicSync {
        /// Position within the current segment in milliseconds
        segment_position_ms: f32,
        /// Duration of one beat in milliseconds
        beat_duration_ms: f32,
        /// Duration of one bar in milliseconds
        bar_duration_ms: f32,
    },
}

/// The callback info record the engine hands to the callback entry point
///
/// The callback layer reads and writes only [`package`](Self::package),
/// fills [`user_data`](Self::user_data) for function-pointer callbacks, and
/// reads [`game_object`](Self::game_object). Everything else is payload
/// passed through to variant handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct EventCallbackInfo {
    /// Callback-layer-owned package handle (opaque cookie; 0 when unset).
    /// Callers and the engine must never modify this slot.
    pub package: u64,
    /// Caller-owned cookie, populated before a function-pointer callback
    /// is invoked. Distinct from `package` so neither side ever has to
    /// save and restore the other's slot.
    pub user_data: u64,
    /// Game object the event was posted on
    pub game_object: GameObjectId,
    /// Playing instance that produced this callback
    pub playing_id: PlayingId,
    /// Event-type-specific data
    pub payload: CallbackPayload,
}

impl EventCallbackInfo {
    /// Create an info record for the given game object with empty slots
    pub fn new(game_object: GameObjectId, playing_id: PlayingId) -> Self {
        Self {
            package: 0,
            user_data: 0,
            game_object,
            playing_id,
            payload: CallbackPayload::None,
        }
    }
}

/// Raw callback invoked synchronously on the engine thread
///
/// `info.user_data` carries the cookie supplied at registration time.
pub type EventCallback = fn(CallbackType, &EventCallbackInfo);
