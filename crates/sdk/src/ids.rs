//! Identifier newtypes shared with the sound engine

use std::fmt;

/// Identifier of a simulated entity registered with the sound engine.
///
/// The callback layer treats this as fully opaque; it only ever uses it as a
/// map key. Ownership of the id space belongs to the game-object layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameObjectId(pub u64);

impl GameObjectId {
    /// Reserved id the engine uses when an event has no game object
    pub const INVALID: GameObjectId = GameObjectId(u64::MAX);
}

impl fmt::Display for GameObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GameObjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of a single playing event instance, assigned by the engine at
/// post time and carried in every callback for that instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayingId(pub u32);

impl PlayingId {
    /// The engine's "post failed" sentinel
    pub const INVALID: PlayingId = PlayingId(0);
}

impl fmt::Display for PlayingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
