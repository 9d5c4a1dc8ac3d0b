// Access profile endpoints (read-only)

use tracing::debug;

use crate::outcome::Outcome;
use crate::session::AuthSession;

/// Client for access profiles.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    session: AuthSession,
}

impl ProfileClient {
    pub fn new(session: AuthSession) -> Self {
        Self { session }
    }

    /// List every profile.
    ///
    /// `GET /profiles/getAll`
    pub async fn get_all(&self) -> Outcome {
        debug!("listing profiles");
        self.session.get("/profiles/getAll", &[]).await
    }
}
