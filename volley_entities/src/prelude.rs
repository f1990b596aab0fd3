pub use crate::domain::event::Event;
pub use crate::domain::participant::{Gender, GenderCounts, Participant};
pub use crate::domain::team::{AssignmentSummary, ParticipantScore, TeamAssignment, TeamSummary};
pub use crate::domain::vote::{Vote, VoteScore, VotingProgress};
pub use crate::error::EngineError;
