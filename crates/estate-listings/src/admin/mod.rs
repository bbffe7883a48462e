//! Admin dashboard access: credential check and explicit, expiring sessions.

pub mod session;

pub use session::{
    is_token_valid, parse_bearer, AdminCredentials, AdminSession, SessionContext, SessionError,
    SessionStore,
};
