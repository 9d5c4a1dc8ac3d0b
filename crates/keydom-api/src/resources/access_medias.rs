// Access media endpoints (cards, tags, plates)
//
// `/accessMedias/{getByKey,insert,update,delete}`

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::outcome::Outcome;
use crate::resources::ID_PARAM;
use crate::session::AuthSession;

/// Body for `POST /accessMedias/insert`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessMediaInsert {
    /// Unique.
    pub identifier: String,
    pub media_type_code: i64,
    /// Unique when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
    pub enabled: bool,
    pub validity_start: i64,
    pub validity_end: i64,
    pub validity_mode: i64,
    pub antipassback_enabled: bool,
    pub counting_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_uuid_or_name: Option<String>,
    pub life_cycle_mode: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_access_media_number: Option<i64>,
}

/// Body for `PUT /accessMedias/update`: the insert fields plus the record uuid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessMediaUpdate {
    pub uuid: String,
    #[serde(flatten)]
    pub fields: AccessMediaInsert,
}

/// Client for access media records.
#[derive(Debug, Clone)]
pub struct AccessMediaClient {
    session: AuthSession,
}

impl AccessMediaClient {
    pub fn new(session: AuthSession) -> Self {
        Self { session }
    }

    /// `GET /accessMedias/getByKey/?uuid={uuid}`
    pub async fn get_by_key(&self, uuid: &str) -> Outcome {
        debug!(uuid, "fetching access media");
        self.session
            .get("/accessMedias/getByKey/", &[(ID_PARAM, uuid)])
            .await
    }

    /// `POST /accessMedias/insert`
    pub async fn create(&self, fields: &(impl Serialize + Sync)) -> Outcome {
        debug!("creating access media");
        self.session.post("/accessMedias/insert", fields).await
    }

    /// `PUT /accessMedias/update`
    pub async fn update(&self, fields: &(impl Serialize + Sync)) -> Outcome {
        debug!("updating access media");
        self.session.put("/accessMedias/update", fields).await
    }

    /// `DELETE /accessMedias/delete/?uuid={uuid}`
    pub async fn delete(&self, uuid: &str) -> Outcome {
        debug!(uuid, "deleting access media");
        self.session
            .delete("/accessMedias/delete/", &[(ID_PARAM, uuid)])
            .await
    }
}
