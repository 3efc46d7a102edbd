// Directory service HTTP client
//
// Wraps `reqwest::Client` with directory-specific URL construction and
// response decoding. Every endpoint returns the decoded JSON payload;
// non-success statuses are mapped into `Error::Api` before the caller
// sees them.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{CustomerRecord, SetLimitRequest, SetPlanRequest, TopUpRequest};
use crate::transport::TransportConfig;

/// HTTP client for the customer directory service.
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DirectoryClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the service root (e.g. `https://directory.internal`);
    /// endpoint paths are appended under `/api/`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Used by tests that point at a mock server.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The directory base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a full URL for an API path: `{base}/api/{path}`.
    fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Fetch the full customer collection.
    pub async fn list_customers(&self) -> Result<Vec<CustomerRecord>, Error> {
        let url = self.api_url("customers")?;
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        Self::decode(resp).await
    }

    /// Change a customer's billing plan. The service recomputes the
    /// monthly credit allotment and returns the full updated record.
    pub async fn set_plan(&self, id: &str, plan: &str) -> Result<CustomerRecord, Error> {
        let url = self.api_url(&format!("customers/{id}/plan"))?;
        debug!("PUT {url}");
        self.put_json(url, &SetPlanRequest { plan }).await
    }

    /// Set or clear a customer's per-user credit limit.
    pub async fn set_per_user_limit(
        &self,
        id: &str,
        limit: Option<u32>,
    ) -> Result<CustomerRecord, Error> {
        let url = self.api_url(&format!("customers/{id}/limit"))?;
        debug!("PUT {url}");
        self.put_json(url, &SetLimitRequest { limit }).await
    }

    /// Add a one-time credit amount to a customer's monthly allotment.
    pub async fn top_up(&self, id: &str, amount: u32) -> Result<CustomerRecord, Error> {
        let url = self.api_url(&format!("customers/{id}/topup"))?;
        debug!("POST {url}");
        let resp = self
            .http
            .post(url)
            .json(&TopUpRequest { amount })
            .send()
            .await?;
        Self::decode(resp).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn put_json<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let resp = self.http.put(url).json(body).send().await?;
        Self::decode(resp).await
    }

    /// Map the response status, then decode the JSON body.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: body[..body.len().min(200)].to_string(),
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}
