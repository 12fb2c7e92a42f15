//! Campaign rule service
//!
//! Loads a campaign's qualification rule from the backend and creates new
//! campaigns with a rule. The backend does not accept rule changes on existing
//! campaigns, so saving always goes through `create`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::application::error_ext::TransportResultExt;
use crate::application::session::{EditMode, EditSession};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, WireCondition};
use crate::infrastructure::traits::HttpTransport;

pub const DETAIL_PATH: &str = "/api/event/detail";
pub const ADD_PATH: &str = "/api/event/add";

/// Campaign as returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub reward: String,
    #[serde(default)]
    pub status: i64,
    pub conditions: WireCondition,
}

#[derive(Debug, Serialize)]
struct CreateCampaignRequest<'a> {
    name: &'a str,
    reward: &'a str,
    conditions: WireCondition,
}

/// Backend response wrapper; `code == 0` is success.
#[derive(Debug, Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Value,
}

/// Service for exchanging campaign rules with the backend.
pub struct CampaignService {
    api: Arc<dyn HttpTransport>,
}

impl CampaignService {
    pub fn new(api: Arc<dyn HttpTransport>) -> Self {
        Self { api }
    }

    /// Fetch a campaign, including its rule in wire form.
    pub fn load(&self, id: i64) -> ApplicationResult<CampaignDetail> {
        debug!("load: id={}", id);
        let response = self
            .api
            .get(DETAIL_PATH, &[("id", id.to_string())])
            .with_request_context("load campaign", DETAIL_PATH)?;
        let data = unwrap_envelope(response)?;
        serde_json::from_value(data).map_err(|e| ApplicationError::OperationFailed {
            context: format!("parse campaign {}", id),
            source: Box::new(e),
        })
    }

    /// Fetch a campaign and decode its rule into a session.
    pub fn open(&self, id: i64, mode: EditMode) -> ApplicationResult<EditSession> {
        let detail = self.load(id)?;
        EditSession::from_wire(&detail.conditions, mode)
            .map_err(|e| ApplicationError::Domain(DomainError::from(e)))
    }

    /// Create a campaign whose rule is the session's tree.
    ///
    /// The tree is validated before anything is sent.
    pub fn create(&self, name: &str, reward: &str, session: &EditSession) -> ApplicationResult<()> {
        if name.trim().is_empty() {
            return Err(ApplicationError::InvalidInput("empty campaign name".into()));
        }
        session.validate().map_err(DomainError::from)?;

        let request = CreateCampaignRequest {
            name,
            reward,
            conditions: session.to_wire(),
        };
        let body = serde_json::to_value(&request).map_err(|e| ApplicationError::OperationFailed {
            context: "serialize campaign".into(),
            source: Box::new(e),
        })?;

        let response = self
            .api
            .post(ADD_PATH, &body)
            .with_request_context("create campaign", ADD_PATH)?;
        unwrap_envelope(response)?;
        info!("created campaign {:?}", name);
        Ok(())
    }
}

fn unwrap_envelope(response: Value) -> ApplicationResult<Value> {
    let envelope: Envelope =
        serde_json::from_value(response).map_err(|e| ApplicationError::OperationFailed {
            context: "parse response envelope".into(),
            source: Box::new(e),
        })?;
    if envelope.code != 0 {
        return Err(ApplicationError::Api {
            code: envelope.code,
            msg: envelope.msg,
        });
    }
    Ok(envelope.data)
}
