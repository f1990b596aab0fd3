use thiserror::Error;
use uuid::Uuid;


/// Every failure the voting engine can report.
///
/// All variants except `Unavailable` are caused by the caller and are
/// never retried by the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Score {0} is outside of 1..=10")]
    InvalidScore(i64),
    #[error("Cannot vote for yourself")]
    SelfVote,
    #[error("User {0} is not a participant of this event")]
    UnknownParticipant(Uuid),
    #[error("Completed voters: {completed}/{required}. At least {required} completed voters required before computing teams")]
    QuorumNotMet {
        completed: usize,
        required: usize,
    },
    #[error("Event {0} not found")]
    EventNotFound(Uuid),
    #[error("Participants not configured for event {0}")]
    RosterNotSet(Uuid),
    #[error("User {0} not found")]
    UnknownUser(Uuid),
    #[error("Participants of event {0} cannot change once voting has started")]
    RosterLocked(Uuid),
    #[error("Invalid event date: {0}")]
    InvalidEventDate(String),
    #[error("Service unavailable: {source}")]
    Unavailable {
        #[from]
        source: anyhow::Error,
    },
}

impl EngineError {
    /// Infrastructure failures may succeed on a later attempt, everything
    /// else is a problem with the request itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::Unavailable { .. })
    }
}
