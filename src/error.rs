//! Playback error types.
//!
//! Three kinds cover the whole surface: configuration conflicts, operations
//! arriving out of order, and per-frame replay failures. The first two are
//! returned synchronously to the caller that violated the contract; replay
//! failures are caught at the tick boundary and never stop the clock.

/// Errors reported by the recording and playback surface.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Clock metadata was supplied more than once with different values,
    /// or the supplied values are unusable.
    #[error("Invalid clock configuration: {reason}")]
    Configuration { reason: String },

    /// An operation arrived in a state that cannot accept it.
    #[error("Invalid player state: {reason}")]
    State { reason: String },

    /// A single frame failed to replay onto its target.
    ///
    /// Canvas implementations build this with [`Error::render`]; the replay
    /// loop stamps the index of the failing op before reporting it.
    #[error("Frame replay failed at op {op_index}: {message}")]
    Render { op_index: usize, message: String },
}

impl Error {
    /// Configuration error with the given reason.
    pub fn configuration(reason: impl Into<String>) -> Self {
        Error::Configuration {
            reason: reason.into(),
        }
    }

    /// State error with the given reason.
    pub fn state(reason: impl Into<String>) -> Self {
        Error::State {
            reason: reason.into(),
        }
    }

    /// Render error for a failing canvas call.
    pub fn render(message: impl Into<String>) -> Self {
        Error::Render {
            op_index: 0,
            message: message.into(),
        }
    }

    /// Stamp the op index onto a render error; other kinds pass through.
    pub(crate) fn at_op(self, op_index: usize) -> Self {
        match self {
            Error::Render { message, .. } => Error::Render { op_index, message },
            other => other,
        }
    }

    /// True for the per-frame replay failure kind.
    pub fn is_render(&self) -> bool {
        matches!(self, Error::Render { .. })
    }
}

/// A poisoned lock means a peer thread panicked mid-mutation; surface it
/// as a state error rather than panicking in turn.
impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Error::state("shared player state poisoned by a panicked thread")
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
