use std::fmt;

use crate::keybind::CommandId;

/// Caller bugs and terminal conditions raised by the engine.
///
/// Everything else the engine can fail on is plain I/O and travels as
/// `anyhow::Error`; use `downcast_ref::<EngineError>()` to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The same command instance was registered twice in one frame.
    DuplicateRegistration { id: CommandId, label: String },
    /// Hit-testing asked about a command that was never given a position.
    UnpositionedCommand { id: CommandId },
    /// Every input producer has stopped; no further events will arrive.
    InputClosed,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateRegistration { id, label } => {
                write!(f, "command {id} ({label:?}) is already registered")
            }
            Self::UnpositionedCommand { id } => {
                write!(f, "command {id} has no screen position")
            }
            Self::InputClosed => write!(f, "input sources closed"),
        }
    }
}

impl std::error::Error for EngineError {}
