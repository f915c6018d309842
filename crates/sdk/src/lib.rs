//! soundlink SDK - Audio Engine Boundary Types
//!
//! This crate contains the types shared across the boundary between the
//! sound engine and the callback layer in `soundlink-core`. It carries no
//! engine logic, allowing dependent crates to compile against a stable,
//! cheap surface.
//!
//! # Modules
//!
//! - [`ids`] - Game object and playing-instance identifiers
//! - [`callback`] - Callback type masks, payloads, and the callback info record
//! - [`dispatcher`] - The outbound engine surface consumed by the callback layer

pub mod callback;
pub mod dispatcher;
pub mod ids;

pub use callback::*;
pub use dispatcher::EventDispatcher;
pub use ids::{GameObjectId, PlayingId};
