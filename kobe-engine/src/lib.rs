pub mod engine;
pub mod session;
pub mod timeout;
pub mod traits;

pub use engine::{ChatEngine, ChatSetup, EngineConfig, EngineError};
