use std::collections::HashMap;

use parking_lot::RwLock;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};

use super::response::DcnmResponse;
use crate::config::{
    SessionConfig, DEFAULT_EXPIRATION_TIME, DEFAULT_HEADERS, LOGON_PATH, SETTINGS_PATH,
    TOKEN_FIELD, VERSION_FIELD, VERSION_PATH,
};
use crate::error::{Error, Result};
use crate::settings::auto_config::AutoConfigSettings;
use crate::settings::traits::RestResource;

/// How a login attempt ended.
#[derive(Debug)]
pub enum LoginOutcome {
    /// The controller accepted the credentials; its response was merged into the headers.
    Accepted(DcnmResponse),
    /// The controller answered with a failure status.
    Rejected(DcnmResponse),
    /// No connection could be made; headers are unchanged.
    Unreachable(reqwest::Error),
}

impl LoginOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, LoginOutcome::Accepted(_))
    }

    pub fn response(&self) -> Option<&DcnmResponse> {
        match self {
            LoginOutcome::Accepted(resp) | LoginOutcome::Rejected(resp) => Some(resp),
            LoginOutcome::Unreachable(_) => None,
        }
    }
}

/// An authenticated connection to a DCNM controller.
pub struct Session {
    client: Client,
    base_url: String,
    user: String,
    passwd: String,
    verify: bool,
    expiration_time: u64,
    headers: RwLock<HashMap<String, String>>,
    token: RwLock<Option<String>>,
    settings: RwLock<Option<AutoConfigSettings>>,
}

impl Session {
    /// Create a session. No request is made until `login`.
    pub fn new(
        url: impl Into<String>,
        user: impl Into<String>,
        passwd: impl Into<String>,
        verify: bool,
    ) -> Result<Self> {
        Self::build(url.into(), user.into(), passwd.into(), verify, DEFAULT_EXPIRATION_TIME)
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        Self::build(
            config.url.clone(),
            config.user.clone(),
            config.passwd.clone(),
            config.verify,
            config.expiration_time,
        )
    }

    fn build(
        url: String,
        user: String,
        passwd: String,
        verify: bool,
        expiration_time: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!verify)
            .build()?;

        let headers = DEFAULT_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            user,
            passwd,
            verify,
            expiration_time,
            headers: RwLock::new(headers),
            token: RwLock::new(None),
            settings: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn verify(&self) -> bool {
        self.verify
    }

    pub fn expiration_time(&self) -> u64 {
        self.expiration_time
    }

    /// Snapshot of the headers sent with every request.
    pub fn headers(&self) -> HashMap<String, String> {
        self.headers.read().clone()
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .read()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }

    /// Session token from the last merged login response, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Settings last fetched or saved through this session.
    pub fn settings(&self) -> Option<AutoConfigSettings> {
        self.settings.read().clone()
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticate with basic auth and merge the returned fields into the headers.
    ///
    /// The response body is merged even when the controller rejects the
    /// login. Connection failures come back as `LoginOutcome::Unreachable`.
    pub async fn login(&self) -> Result<LoginOutcome> {
        let url = self.url_for(LOGON_PATH);
        let payload = json!({ "expirationTime": self.expiration_time }).to_string();

        let mut req = self
            .client
            .post(&url)
            .basic_auth(&self.user, Some(&self.passwd));
        for (k, v) in DEFAULT_HEADERS {
            req = req.header(k, v);
        }

        let resp = match req.body(payload).send().await {
            Ok(resp) => resp,
            Err(e) if e.is_connect() => {
                error!("connection to {} failed: {}", url, e);
                return Ok(LoginOutcome::Unreachable(e));
            }
            Err(e) => return Err(e.into()),
        };
        let resp = DcnmResponse::read(resp).await?;

        if resp.is_ok() {
            info!("logged into {}", url);
            let fields = json_object(&resp)?;
            self.merge_headers(fields);
            Ok(LoginOutcome::Accepted(resp))
        } else {
            error!(
                "could not log into {}: status={} response={}",
                url,
                resp.status().as_u16(),
                resp.text()
            );
            match json_object(&resp) {
                Ok(fields) => self.merge_headers(fields),
                Err(e) => debug!("login failure body not merged: {}", e),
            }
            Ok(LoginOutcome::Rejected(resp))
        }
    }

    /// Merge login fields into the headers.
    ///
    /// Names match existing headers case-insensitively. Pairs that cannot be
    /// sent as an HTTP header are skipped.
    fn merge_headers(&self, fields: Map<String, Value>) {
        let mut headers = self.headers.write();
        for (name, value) in fields {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            if HeaderName::from_bytes(name.as_bytes()).is_err()
                || HeaderValue::from_str(&value).is_err()
            {
                debug!("login field {:?} is not a valid header, skipped", name);
                continue;
            }
            if name.eq_ignore_ascii_case(TOKEN_FIELD) {
                *self.token.write() = Some(value.clone());
            }
            headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
            headers.insert(name, value);
        }
    }

    /// Controller release, e.g. `"11.5(1)"`.
    pub async fn version(&self) -> Result<String> {
        let resp = self.get(VERSION_PATH).await?;
        let doc: Value = resp.json()?;
        doc.get(VERSION_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(Error::MissingField(VERSION_FIELD))
    }

    /// Build a request against `path` carrying the current headers.
    fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url_for(path);
        let headers = self.headers.read().clone();

        let mut req = self.client.request(method, &url);
        for (k, v) in &headers {
            req = req.header(k.as_str(), v.as_str());
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> Result<DcnmResponse> {
        let resp = req.send().await?;
        DcnmResponse::read(resp).await
    }

    pub async fn get(&self, path: &str) -> Result<DcnmResponse> {
        let resp = self.send(self.build_request(Method::GET, path)).await?;
        log_outcome(&resp);
        Ok(resp)
    }

    pub async fn post(&self, path: &str, data: &str) -> Result<DcnmResponse> {
        let req = self.build_request(Method::POST, path).body(data.to_string());
        let resp = self.send(req).await?;
        if !resp.is_ok() {
            error!(
                "posting {} to {} failed: status={} response={}",
                data,
                resp.url(),
                resp.status().as_u16(),
                resp.text()
            );
        }
        Ok(resp)
    }

    pub async fn put(&self, path: &str, data: &str) -> Result<DcnmResponse> {
        let req = self.build_request(Method::PUT, path).body(data.to_string());
        self.send(req).await
    }

    pub async fn delete(&self, path: &str, data: Option<&str>) -> Result<DcnmResponse> {
        let mut req = self.build_request(Method::DELETE, path);
        if let Some(data) = data {
            req = req.body(data.to_string());
        }
        let resp = self.send(req).await?;
        log_outcome(&resp);
        Ok(resp)
    }

    /// Fetch the controller's auto-config settings.
    pub async fn get_settings(&self) -> Result<AutoConfigSettings> {
        let settings = AutoConfigSettings::fetch(self).await?;
        *self.settings.write() = Some(settings.clone());
        Ok(settings)
    }

    /// Store `settings` on the controller.
    pub async fn save_settings(&self, settings: &AutoConfigSettings) -> Result<DcnmResponse> {
        let resp = settings.save(self).await?;
        if resp.is_ok() {
            *self.settings.write() = Some(settings.clone());
        } else {
            debug!("{} rejected settings status={}", SETTINGS_PATH, resp.status().as_u16());
        }
        Ok(resp)
    }

    /// Store a settings document given as untyped JSON.
    ///
    /// Anything but a JSON object fails with `Error::InvalidSettings` before
    /// a request is made.
    pub async fn save_settings_value(&self, value: Value) -> Result<DcnmResponse> {
        let settings = AutoConfigSettings::try_from(value)?;
        self.save_settings(&settings).await
    }
}

fn log_outcome(resp: &DcnmResponse) {
    if resp.is_ok() {
        info!("got {} response={}", resp.url(), resp.text());
    } else {
        error!(
            "could not get {}: status={} response={}",
            resp.url(),
            resp.status().as_u16(),
            resp.text()
        );
    }
}

fn json_object(resp: &DcnmResponse) -> Result<Map<String, Value>> {
    match resp.json::<Value>()? {
        Value::Object(fields) => Ok(fields),
        other => Err(Error::UnexpectedBody(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}
