use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::session::{DcnmResponse, Session};

/// A JSON document the controller serves at a fixed path.
#[async_trait]
pub trait RestResource: DeserializeOwned + Serialize + Send + Sync {
    const PATH: &'static str;

    /// Fetch and decode the document. A failure status is an error.
    async fn fetch(session: &Session) -> Result<Self> {
        let resp = session.get(Self::PATH).await?;
        if !resp.is_ok() {
            return Err(Error::Status {
                path: Self::PATH.to_string(),
                status: resp.status().as_u16(),
                body: resp.text().into_owned(),
            });
        }
        resp.json()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// PUT the serialized document back to `PATH`.
    async fn save(&self, session: &Session) -> Result<DcnmResponse> {
        let body = self.to_json()?;
        session.put(Self::PATH, &body).await
    }
}
