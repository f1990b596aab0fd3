use std::sync::Arc;

use axum::extract::FromRef;
use volley_backend::{
    directory::InMemoryUserDirectory,
    import::read_users_from_path,
    EngineConfig, VotingService,
};
use volley_entities::prelude::Participant;

use crate::config::Config;


#[derive(Clone)]
pub struct AppState {
    pub service: Arc<VotingService>,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<AppState> {
        let users = match &config.users_path {
            Some(path) => read_users_from_path(path)?,
            None => vec![],
        };
        tracing::info!("Loaded {} users into the directory", users.len());
        Ok(Self::with_users(config.engine.clone(), users))
    }

    pub fn with_users(engine_config: EngineConfig, users: Vec<Participant>) -> AppState {
        let directory = Arc::new(InMemoryUserDirectory::from_participants(users));
        AppState {
            service: Arc::new(VotingService::new(engine_config, directory)),
        }
    }
}

impl FromRef<AppState> for Arc<VotingService> {
    fn from_ref(app_state: &AppState) -> Arc<VotingService> {
        app_state.service.clone()
    }
}
