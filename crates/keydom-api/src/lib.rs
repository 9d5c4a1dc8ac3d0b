// keydom-api: Async Rust client for the Keydom access-control REST API

pub mod auth;
pub mod error;
pub mod outcome;
pub mod resources;
pub mod session;
pub mod transport;

pub use auth::{Credentials, legacy_password_hash};
pub use error::Error;
pub use outcome::{Outcome, Record};
pub use resources::{
    AccessMediaClient, AccessMediaInsert, AccessMediaUpdate, ProfileClient, VisitClient,
    VisitInsert, VisitorClient, VisitorInsert, VisitorUpdate,
};
pub use session::{AuthSession, TOKEN_HEADER};
pub use transport::{TlsMode, TransportConfig};
