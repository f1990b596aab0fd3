use std::str::FromStr;

use axum::{async_trait, extract::FromRequestParts, http::{request::Parts, StatusCode}};
use volley_entities::Uuid;

use crate::{response::APIError, state::AppState};

/// Set by the gateway in front of this service once it has authenticated
/// the caller.
pub const AUTHENTICATED_USER_HEADER: &str = "x-authenticated-user";


#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub uuid: Uuid,
}

pub struct ExtractAuthenticatedUser(pub AuthenticatedUser);

#[async_trait]
impl FromRequestParts<AppState> for ExtractAuthenticatedUser {
    type Rejection = APIError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHENTICATED_USER_HEADER)
            .ok_or(APIError::from((StatusCode::UNAUTHORIZED, "Missing authenticated user")))?;

        let value = header
            .to_str()
            .map_err(|_| APIError::from((StatusCode::BAD_REQUEST, "User ID is not formatted correctly")))?;
        let uuid = Uuid::from_str(value.trim())
            .map_err(|_| APIError::from((StatusCode::BAD_REQUEST, "User ID is not formatted correctly")))?;

        Ok(ExtractAuthenticatedUser(AuthenticatedUser { uuid }))
    }
}
