use crate::config::CatalogSettings;
use crate::models::error::SError;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

const API_KEY_HEADER: &str = "x-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// One request against the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    /// `GET {base}?appid=<id>`
    Single(String),
    /// `GET {multi}?appids=<id,id,...>`
    Multi(Vec<String>),
}

/// Status and body of a catalog response, before any decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait CatalogTransport {
    fn fetch(&self, request: CatalogRequest) -> impl Future<Output = Result<RawResponse, SError>> + Send;
}

pub struct HttpTransport {
    client: reqwest::Client,
    settings: CatalogSettings,
}

impl HttpTransport {
    pub fn new(settings: CatalogSettings) -> Result<Self, SError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, settings })
    }
}

impl CatalogTransport for HttpTransport {
    async fn fetch(&self, request: CatalogRequest) -> Result<RawResponse, SError> {
        let (url, query) = match &request {
            CatalogRequest::Single(id) => (self.settings.base_url(), ("appid", id.clone())),
            CatalogRequest::Multi(ids) => (self.settings.multi_url(), ("appids", ids.join(","))),
        };
        debug!("Accessing catalog at {url}?{}={}", query.0, query.1);

        let response = self
            .client
            .get(&url)
            .query(&[query])
            .header(API_KEY_HEADER, self.settings.api_key())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(RawResponse { status, body })
    }
}
