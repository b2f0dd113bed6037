pub mod app;
pub mod config;
pub mod error;
pub mod state;
pub mod user;

pub use app::*;
pub use config::*;
pub use error::*;
pub use state::*;
pub use user::*;
