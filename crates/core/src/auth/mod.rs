mod error;
mod functions;
mod traits;
mod types;

pub use error::AuthError;
pub use functions::{calculate_expiry, generate_session_id, is_session_expired, new_session};
pub use traits::{AuthClient, Result, SessionRepository};
pub use types::{Credentials, Identity, Session, SessionId};
