pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod store;

pub use error::{AppError, AppResult};
pub use session::{AuthorizationGrant, Session, SessionState};
pub use store::{TokenPair, TokenStore};
