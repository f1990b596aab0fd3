use volley_backend::EngineConfig;


#[derive(Debug, serde::Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub logging_config: String,
    /// CSV file with `id,username,gender` rows to fill the user directory.
    pub users_path: Option<String>,
    pub engine: EngineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".into(),
            port: 3000,
            logging_config: "debug,hyper=error,mio=debug,tower_http=debug,axum::rejection=trace".into(),
            users_path: None,
            engine: EngineConfig::default(),
        }
    }
}

pub(crate) fn read_config_inner() -> Result<Config, anyhow::Error> {
    let config_path = std::env::var("VOLLEY_SERVER_CONFIG")?;
    let config = std::fs::read_to_string(config_path)?;
    parse_config(&config)
}

pub fn parse_config(raw: &str) -> Result<Config, anyhow::Error> {
    Ok(serde_yaml::from_str::<Config>(raw)?)
}

pub fn read_config() -> Config {
    match read_config_inner() {
        Ok(config) => config,
        Err(e) => {
            //Print to stderr, since logging is set up in the config
            eprintln!("Warning: Failed to read config: {}", e);
            Config::default()
        }
    }
}


#[cfg(test)]
mod tests {
    use chrono::Weekday;
    use volley_backend::config::CompletionRule;

    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config("port: 8080\nengine:\n  voting_weekday: Mon\n  quorum:\n    required_voters: 8\n    completion: full_ballot\n").unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.engine.voting_weekday, Weekday::Mon);
        assert_eq!(config.engine.quorum.required_voters, 8);
        assert_eq!(config.engine.quorum.completion, CompletionRule::FullBallot);
        assert_eq!(config.engine.balancing.max_refinement_passes, 50);
    }
}
