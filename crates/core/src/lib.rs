//! soundlink - Core Callback Layer
//!
//! This crate contains the thread-safe indirection layer between the sound
//! engine's callback thread and consumer code: per-game-object bookkeeping
//! for registered event callbacks, with correct lifetime management across
//! concurrent firing and teardown.
//!
//! # Re-exports
//!
//! This crate re-exports the SDK crate for convenience:
//! - [`sdk`] - Engine boundary types (ids, callback info, dispatcher trait)

use tracing::info;

// Re-export the SDK crate
pub use soundlink_sdk as sdk;

pub mod callbacks;
pub mod config;
pub mod error;
pub mod subsystem;
pub mod tasks;

// Re-export commonly used items
pub use callbacks::{
    CallbackKind, CallbackRegistry, DelegateEventInfo, LatentAction, PackageKey,
    PostEventDelegate,
};
pub use config::{CallbackConfig, ConfigError, ConfigResult, OptimizePolicy};
pub use error::SubsystemError;
pub use subsystem::AudioCallbackSubsystem;
pub use tasks::{GameThreadQueue, TaskSender};

// Re-export boundary types
pub use soundlink_sdk::{
    CallbackPayload, CallbackType, EventCallback, EventCallbackInfo, EventDispatcher,
    GameObjectId, PlayingId,
};

/// Shut down the callback layer
///
/// Called by the host once the subsystem instance has been dropped.
pub fn shutdown() {
    info!("soundlink shutting down...");
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_sdk_types_exist() {
        // Verify SDK types are accessible through the re-export
        use crate::sdk::GameObjectId;
        let _ = GameObjectId(0);
    }
}
