pub mod config;
pub mod decode;
pub mod instructions;
pub mod persona;
pub mod quiz;
pub mod transcript;
pub mod turn;
pub mod types;

pub use config::*;
pub use decode::*;
pub use instructions::*;
pub use persona::*;
pub use quiz::*;
pub use transcript::*;
pub use turn::*;
pub use types::*;
