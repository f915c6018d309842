//! Error types for subsystem lifecycle

/// Error type for subsystem construction
///
/// Lookup misses (unknown package handle, unknown game object) are normal
/// silent no-ops everywhere in the callback layer and never surface here;
/// the only fallible operation is bringing the subsystem up.
#[derive(Debug, thiserror::Error)]
pub enum SubsystemError {
    /// A live subsystem instance already exists in this process
    #[error("audio callback subsystem already initialized")]
    AlreadyInitialized,
}
