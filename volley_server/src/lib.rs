use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod commands;
pub mod config;
pub mod events;
pub mod response;
pub mod state;

use state::AppState;


pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .merge(events::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub fn app(config: &config::Config) -> anyhow::Result<Router> {
    Ok(app_with_state(AppState::new(config)?))
}
