// User / visitor endpoints
//
// Reads and writes go through `/users/visitor/...`; deletion is the
// generic `/users/delete`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::outcome::Outcome;
use crate::resources::ID_PARAM;
use crate::session::AuthSession;

/// Body for `POST /users/visitor/insert`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorInsert {
    pub last_name: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
}

/// Body for `PUT /users/visitor/update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorUpdate {
    pub uuid: String,
    pub last_name: String,
    pub first_name: String,
    /// Unique when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
}

/// Client for user and visitor records.
#[derive(Debug, Clone)]
pub struct VisitorClient {
    session: AuthSession,
}

impl VisitorClient {
    pub fn new(session: AuthSession) -> Self {
        Self { session }
    }

    /// `GET /users/visitor/getByKey/?uuid={uuid}`
    pub async fn get_by_key(&self, uuid: &str) -> Outcome {
        debug!(uuid, "fetching visitor");
        self.session
            .get("/users/visitor/getByKey/", &[(ID_PARAM, uuid)])
            .await
    }

    /// `POST /users/visitor/insert`
    pub async fn create(&self, fields: &(impl Serialize + Sync)) -> Outcome {
        debug!("creating visitor");
        self.session.post("/users/visitor/insert", fields).await
    }

    /// `PUT /users/visitor/update`
    pub async fn update(&self, fields: &(impl Serialize + Sync)) -> Outcome {
        debug!("updating visitor");
        self.session.put("/users/visitor/update", fields).await
    }

    /// `DELETE /users/delete/?uuid={uuid}`
    pub async fn delete(&self, uuid: &str) -> Outcome {
        debug!(uuid, "deleting user");
        self.session
            .delete("/users/delete/", &[(ID_PARAM, uuid)])
            .await
    }
}
