pub mod config;
pub mod state;

pub use config::{Config, StoreBackend};
pub use state::DeskState;
