// Visit endpoints
//
// `/visits/{getByKey,insert,update,delete}`. Lookups use the same
// `getByKey/?uuid=` shape as the other resources.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::outcome::Outcome;
use crate::resources::ID_PARAM;
use crate::session::AuthSession;

/// Body for `POST /visits/insert` and `PUT /visits/update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitInsert {
    /// Unique when set. Required for updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_uuid: Option<String>,
    pub initial_timestamp: i64,
    pub final_timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_visit_access_media_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_visit_access_media_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_visit_access_profile_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_first_access_media_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_first_access_media_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_first_access_media_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_first_profile_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_second_access_media_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_second_access_media_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_second_access_media_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_second_profile_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_third_access_media_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_third_access_media_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_third_access_media_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_third_profile_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_user_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_visit_now: Option<bool>,
    pub site_id: i64,
}

/// Client for visits.
#[derive(Debug, Clone)]
pub struct VisitClient {
    session: AuthSession,
}

impl VisitClient {
    pub fn new(session: AuthSession) -> Self {
        Self { session }
    }

    /// `GET /visits/getByKey/?uuid={uuid}`
    pub async fn get_by_key(&self, uuid: &str) -> Outcome {
        debug!(uuid, "fetching visit");
        self.session
            .get("/visits/getByKey/", &[(ID_PARAM, uuid)])
            .await
    }

    /// `POST /visits/insert`
    pub async fn create(&self, fields: &(impl Serialize + Sync)) -> Outcome {
        debug!("creating visit");
        self.session.post("/visits/insert", fields).await
    }

    /// `PUT /visits/update`
    pub async fn update(&self, fields: &(impl Serialize + Sync)) -> Outcome {
        debug!("updating visit");
        self.session.put("/visits/update", fields).await
    }

    /// `DELETE /visits/delete/?uuid={uuid}`
    pub async fn delete(&self, uuid: &str) -> Outcome {
        debug!(uuid, "deleting visit");
        self.session
            .delete("/visits/delete/", &[(ID_PARAM, uuid)])
            .await
    }
}
