use std::borrow::Cow;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// A controller response with its body already read.
#[derive(Debug, Clone)]
pub struct DcnmResponse {
    url: String,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl DcnmResponse {
    pub(crate) async fn read(resp: reqwest::Response) -> Result<Self> {
        let url = resp.url().to_string();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;
        Ok(Self {
            url,
            status,
            headers,
            body,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// True for any status below 400.
    pub fn is_ok(&self) -> bool {
        self.status.as_u16() < 400
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Body as text; invalid UTF-8 is replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
