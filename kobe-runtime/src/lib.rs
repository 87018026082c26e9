pub mod config_store;
pub mod defaults;
pub mod llm;
pub mod runtime_engine;
pub mod secrets;

pub use config_store::ConfigStore;
pub use llm::GeminiChatTransport;
pub use runtime_engine::{build_engine_from_config, chat_setup_from_config};
