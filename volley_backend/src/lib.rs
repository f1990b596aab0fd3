pub mod aggregator;
pub mod balance;
pub mod cache;
pub mod config;
pub mod directory;
pub mod import;
pub mod ledger;
pub mod registry;
pub mod service;

pub use balance::BalancingEngine;
pub use config::EngineConfig;
pub use service::VotingService;
