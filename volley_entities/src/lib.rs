pub mod domain;
pub mod error;
pub mod prelude;

pub use error::EngineError;
pub use uuid::Uuid;
