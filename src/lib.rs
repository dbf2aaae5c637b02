pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

pub use app::ServeHub;
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use session::Session;
