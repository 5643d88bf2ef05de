use crate::api::response::{decode_body, error_from_body};
use crate::error::{ClinicError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the clinic backend.
///
/// Cheap to clone; clones share the underlying connection pool. The bearer
/// token is supplied per call so one client can serve both anonymous and
/// authenticated requests.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Result<T> {
        let body = self.execute(self.request(Method::GET, path, token), path).await?;
        decode_body(&body)
    }

    pub async fn post<B, T>(&self, path: &str, token: Option<&str>, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path, token).json(payload);
        let body = self.execute(request, path).await?;
        decode_body(&body)
    }

    /// POST whose success body carries nothing the caller needs.
    pub async fn post_ack<B>(&self, path: &str, token: Option<&str>, payload: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path, token).json(payload);
        self.execute(request, path).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<()> {
        let request = self.request(Method::DELETE, path, token);
        self.execute(request, path).await.map(|_| ())
    }

    async fn execute(&self, request: RequestBuilder, path: &str) -> Result<String> {
        let response = request.send().await.map_err(ClinicError::NetworkError)?;
        let status = response.status();
        let body = response.text().await?;
        debug!(path, status = status.as_u16(), "backend responded");

        if status.is_success() {
            Ok(body)
        } else {
            Err(error_from_body(status.as_u16(), &body))
        }
    }
}
