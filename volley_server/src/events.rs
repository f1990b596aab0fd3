use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use volley_backend::VotingService;
use volley_entities::{
    prelude::{Event, Gender, GenderCounts, Participant, ParticipantScore, TeamAssignment, TeamSummary, VotingProgress},
    Uuid,
};

use crate::{auth::ExtractAuthenticatedUser, response::APIError, state::AppState};


fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn default_weekly_recurrence() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub date: String,
    #[serde(default = "default_weekly_recurrence")]
    pub weekly_recurrence: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub date: NaiveDate,
    pub weekly_recurrence: bool,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        EventResponse {
            id: event.id,
            date: event.date,
            weekly_recurrence: event.weekly_recurrence,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantsUpdate {
    pub user_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub gender: Gender,
}

impl From<Participant> for UserResponse {
    fn from(participant: Participant) -> Self {
        UserResponse {
            id: participant.id,
            username: participant.username,
            gender: participant.gender,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    pub target_user_id: Uuid,
    /// Kept wide so out-of-range values reach validation instead of
    /// failing deserialization.
    pub score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteResponse {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub user_id: Uuid,
    pub username: String,
    pub gender: Gender,
    pub average_score: f64,
}

impl From<&ParticipantScore> for ScoreResponse {
    fn from(score: &ParticipantScore) -> Self {
        ScoreResponse {
            user_id: score.user_id,
            username: score.username.clone(),
            gender: score.gender,
            average_score: round2(score.average_score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatsResponse {
    pub total_score: f64,
    pub average_score: f64,
    pub gender_counts: GenderCounts,
}

impl From<&TeamSummary> for TeamStatsResponse {
    fn from(summary: &TeamSummary) -> Self {
        TeamStatsResponse {
            total_score: round2(summary.total_score),
            average_score: round2(summary.average_score),
            gender_counts: summary.gender_counts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamsSummaryResponse {
    pub team_a: TeamStatsResponse,
    pub team_b: TeamStatsResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamsResponse {
    pub team_a: Vec<ScoreResponse>,
    pub team_b: Vec<ScoreResponse>,
    pub summary: TeamsSummaryResponse,
}

impl From<&TeamAssignment> for TeamsResponse {
    fn from(assignment: &TeamAssignment) -> Self {
        TeamsResponse {
            team_a: assignment.team_a.iter().map(ScoreResponse::from).collect(),
            team_b: assignment.team_b.iter().map(ScoreResponse::from).collect(),
            summary: TeamsSummaryResponse {
                team_a: (&assignment.summary.team_a).into(),
                team_b: (&assignment.summary.team_b).into(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidateTeamsResponse {
    pub invalidated: bool,
}


async fn create_event(
    State(service): State<Arc<VotingService>>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), APIError> {
    let date = service.date_policy().parse_date(&request.date)?;
    let event = service.create_event(date, request.weekly_recurrence).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

async fn list_events(State(service): State<Arc<VotingService>>) -> Json<Vec<EventResponse>> {
    Json(service.list_events().await.into_iter().map(EventResponse::from).collect())
}

async fn get_event(
    State(service): State<Arc<VotingService>>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventResponse>, APIError> {
    Ok(Json(service.get_event(event_id).await?.into()))
}

async fn set_participants(
    State(service): State<Arc<VotingService>>,
    Path(event_id): Path<Uuid>,
    Json(update): Json<ParticipantsUpdate>,
) -> Result<Json<Vec<UserResponse>>, APIError> {
    let participants = service.set_participants(event_id, update.user_ids).await?;
    Ok(Json(participants.into_iter().map(UserResponse::from).collect()))
}

async fn get_participants(
    State(service): State<Arc<VotingService>>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<UserResponse>>, APIError> {
    let participants = service.participants(event_id).await?;
    Ok(Json(
        participants
            .into_iter()
            .sorted_by(|a, b| a.username.cmp(&b.username))
            .map(UserResponse::from)
            .collect(),
    ))
}

async fn submit_vote(
    State(service): State<Arc<VotingService>>,
    Path(event_id): Path<Uuid>,
    ExtractAuthenticatedUser(user): ExtractAuthenticatedUser,
    Json(request): Json<VoteRequest>,
) -> Result<(StatusCode, Json<VoteResponse>), APIError> {
    if !service.is_participant(event_id, user.uuid).await? {
        return Err(APIError::from((StatusCode::FORBIDDEN, "Only participants of this event can vote")));
    }
    service.submit_vote(event_id, user.uuid, request.target_user_id, request.score).await?;
    Ok((StatusCode::CREATED, Json(VoteResponse { status: "ok".into() })))
}

async fn get_progress(
    State(service): State<Arc<VotingService>>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<VotingProgress>, APIError> {
    Ok(Json(service.progress(event_id).await?))
}

async fn get_scores(
    State(service): State<Arc<VotingService>>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<ScoreResponse>>, APIError> {
    let scores = service.scores(event_id).await?;
    Ok(Json(scores.iter().map(ScoreResponse::from).collect()))
}

async fn get_teams(
    State(service): State<Arc<VotingService>>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<TeamsResponse>, APIError> {
    let assignment = service.teams(event_id).await?;
    Ok(Json(assignment.as_ref().into()))
}

async fn invalidate_teams(
    State(service): State<Arc<VotingService>>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<InvalidateTeamsResponse>, APIError> {
    let invalidated = service.invalidate_teams(event_id).await?;
    Ok(Json(InvalidateTeamsResponse { invalidated }))
}


pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route("/events/:event_id", get(get_event))
        .route("/events/:event_id/participants", get(get_participants).put(set_participants))
        .route("/events/:event_id/votes", post(submit_vote))
        .route("/events/:event_id/progress", get(get_progress))
        .route("/events/:event_id/scores", get(get_scores))
        .route("/events/:event_id/teams", get(get_teams).delete(invalidate_teams))
}
