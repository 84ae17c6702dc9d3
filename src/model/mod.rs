pub mod chat;
pub mod config;
pub mod plan;
pub mod selection;

pub use chat::*;
pub use config::*;
pub use plan::*;
pub use selection::*;
