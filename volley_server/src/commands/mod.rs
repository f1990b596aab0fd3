use volley_backend::{import::read_scored_players_from_path, BalancingEngine, EngineConfig};

use crate::events::TeamsResponse;


#[derive(clap::Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve,
    /// Split the players in a `id,username,gender,score` CSV file into two
    /// teams and print them as JSON.
    Balance {
        path: String
    },
}

impl Command {
    pub fn run_offline(&self, engine_config: &EngineConfig) -> anyhow::Result<()> {
        match self {
            Command::Serve => Ok(()),
            Command::Balance { path } => {
                let players = read_scored_players_from_path(path)?;
                let engine = BalancingEngine::new(&engine_config.balancing);
                let (assignment, report) = engine.balance_with_report(players);
                tracing::info!(
                    "Balanced {} players in {} passes ({} swaps)",
                    assignment.team_a.len() + assignment.team_b.len(),
                    report.passes,
                    report.swaps
                );
                println!("{}", serde_json::to_string_pretty(&TeamsResponse::from(&assignment))?);
                Ok(())
            }
        }
    }
}
