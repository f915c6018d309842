//! Outbound engine surface consumed by the callback layer

use crate::ids::GameObjectId;

/// The sound engine as seen from the callback layer.
///
/// Implemented by the engine bridge and injected into the callback registry
/// at subsystem startup; tests substitute a recording stub.
pub trait EventDispatcher: Send + Sync {
    /// Cancel every in-flight callback for `game_object`, synchronously.
    ///
    /// This must not return until no further callback-entry-point
    /// invocations for `game_object` are possible. Game-object teardown
    /// relies on this guarantee to free the object's remaining packages
    /// without racing the engine thread; an implementation that returns
    /// early makes a use-after-teardown dispatch possible.
    fn cancel_event_callbacks(&self, game_object: GameObjectId);
}
