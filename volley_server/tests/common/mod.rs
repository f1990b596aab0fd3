use axum::{body::{Body, BoxBody}, http::{request::Builder, Request}, response::Response};
use tower::ServiceExt;
use volley_backend::EngineConfig;
use volley_entities::{prelude::{Gender, Participant}, Uuid};
use volley_server::{auth::AUTHENTICATED_USER_HEADER, state::AppState};


pub const ROSTER_SIZE: u128 = 12;

pub fn player_id(idx: u128) -> Uuid {
    Uuid::from_u128(idx)
}

#[allow(dead_code)]
pub fn outsider_id() -> Uuid {
    Uuid::from_u128(900)
}

/// Twelve players, alternating genders, plus one known user that is never
/// put on a roster.
pub fn mock_users() -> Vec<Participant> {
    let mut users = (1..=ROSTER_SIZE)
        .map(|idx| Participant::new(
            player_id(idx),
            format!("player{:02}", idx),
            if idx % 2 == 1 { Gender::M } else { Gender::F }
        ))
        .collect::<Vec<_>>();
    users.push(Participant::new(outsider_id(), "outsider", Gender::F));
    users
}

#[allow(dead_code)]
pub fn roster_ids() -> Vec<Uuid> {
    (1..=ROSTER_SIZE).map(player_id).collect()
}

pub enum Auth {
    None,
    User(Uuid),
}

pub struct Fixture {
    pub app: axum::Router,
    pub auth: Auth,
}

pub struct APIResponse {
    response: Response<BoxBody>,
}

impl APIResponse {
    pub fn status(&self) -> axum::http::StatusCode {
        self.response.status()
    }

    #[allow(dead_code)]
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> T {
        let bytes = hyper::body::to_bytes(self.response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}

impl Fixture {
    pub fn new(engine_config: EngineConfig) -> Self {
        let state = AppState::with_users(engine_config, mock_users());
        Self {
            app: volley_server::app_with_state(state),
            auth: Auth::None,
        }
    }

    #[allow(dead_code)]
    pub fn default() -> Self {
        Self::new(EngineConfig::default())
    }

    #[allow(dead_code)]
    pub fn as_user(&mut self, user_id: Uuid) -> &mut Self {
        self.auth = Auth::User(user_id);
        self
    }

    #[allow(dead_code)]
    pub fn anonymous(&mut self) -> &mut Self {
        self.auth = Auth::None;
        self
    }

    fn get_base_request(&self) -> Builder {
        let builder = Request::builder();
        match &self.auth {
            Auth::None => builder,
            Auth::User(user_id) => builder.header(AUTHENTICATED_USER_HEADER, user_id.to_string()),
        }
    }

    async fn send(&self, request: Request<Body>) -> APIResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        APIResponse { response }
    }

    #[allow(dead_code)]
    pub async fn get(&self, path: &str) -> APIResponse {
        let request = self.get_base_request()
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    #[allow(dead_code)]
    pub async fn delete(&self, path: &str) -> APIResponse {
        let request = self.get_base_request()
            .method("DELETE")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn send_json<T: serde::Serialize>(&self, method: &str, path: &str, body: T) -> APIResponse {
        let request = self.get_base_request()
            .method(method)
            .header("Content-Type", "application/json")
            .uri(path)
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    #[allow(dead_code)]
    pub async fn post_json<T: serde::Serialize>(&self, path: &str, body: T) -> APIResponse {
        self.send_json("POST", path, body).await
    }

    #[allow(dead_code)]
    pub async fn put_json<T: serde::Serialize>(&self, path: &str, body: T) -> APIResponse {
        self.send_json("PUT", path, body).await
    }
}
