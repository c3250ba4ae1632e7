//! Session lifecycle state.

/// Lifecycle state of a [`Session`](crate::Session).
///
/// A session is a decode loop rather than a protocol state machine: it runs
/// until the first read failure and then stays terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// The socket is open and frames are being read.
    #[default]
    Running,
    /// The decode loop has exited.
    Terminated,
}

impl SessionState {
    /// Returns `true` while the decode loop may still deliver frames.
    #[must_use]
    #[inline]
    pub const fn is_running(&self) -> bool {
        matches!(self, SessionState::Running)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Running => write!(f, "Running"),
            SessionState::Terminated => write!(f, "Terminated"),
        }
    }
}
