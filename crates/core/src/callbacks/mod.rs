//! Event callback registration and dispatch
//!
//! The indirection layer between the engine's callback thread and consumer
//! code. Callers register one of three callback styles against a game
//! object and get back a stable [`PackageKey`]:
//!
//! - raw function pointer, invoked synchronously on the engine thread
//! - bound delegate, deferred to the game thread task queue
//! - latent action resume, flipping a finished flag on a suspended task
//!
//! The engine bridge feeds every callback into
//! [`CallbackRegistry::dispatch_event`], which matches it back to its
//! package and retires the package when the event completes.

mod dispatch;
mod package;
mod registry;

pub use package::{
    CallbackKind, DelegateEventInfo, LatentAction, PackageKey, PostEventDelegate,
};
pub use registry::CallbackRegistry;
