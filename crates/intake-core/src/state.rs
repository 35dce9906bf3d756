//! Submission session state machine
//!
//! The presentation layer only ever reflects these states; it never owns
//! them. Transitions not in the table below do not exist.

/// Lifecycle state of a submission session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Accepting attaches
    Open,
    /// A commit is in flight
    Committing,
    /// Terminal: committed or discarded
    Closed,
}

/// States reachable from `from` in one transition
#[must_use]
pub fn allowed_transitions(from: SessionState) -> Vec<SessionState> {
    use SessionState::*;
    match from {
        // commit start, or discard/timeout
        Open => vec![Committing, Closed],
        // commit success closes, commit failure re-opens
        Committing => vec![Closed, Open],
        Closed => vec![],
    }
}

/// Check a single transition against the table
#[inline]
#[must_use]
pub fn allowed(from: SessionState, to: SessionState) -> bool {
    allowed_transitions(from).contains(&to)
}
