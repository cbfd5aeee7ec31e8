use std::time::Duration;

use reqwest::Client as HttpClient;
use serde_json::Value;
use url::Url;

use crate::api::error::ApiError;
use crate::api::models::{NewShop, ServiceRequest, Session, Shop};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin gateway over the ServicePro REST endpoints. One instance per app,
/// holding the shared reqwest client and the configured base URL. Cloning
/// shares the underlying connection pool, so handlers clone freely into
/// spawned futures.
#[derive(Clone)]
pub struct ApiClient {
    pub http: HttpClient,
    base: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base = base_url.trim_end_matches('/').to_string();
        // Reject an unusable base early rather than on the first call.
        Url::parse(&base)?;
        let http = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// Turn a non-2xx response into `Rejected`, keeping the server's `error`
    /// field when the body has one.
    async fn rejection(resp: reqwest::Response) -> ApiError {
        let status = resp.status().as_u16();
        let message = resp
            .json::<Value>()
            .await
            .ok()
            .and_then(|json| json.get("error").and_then(|v| v.as_str()).map(str::to_string));
        ApiError::Rejected { status, message }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let body = serde_json::json!({ "username": username, "password": password });
        let resp = self
            .http
            .post(self.endpoint("api/login"))
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }
        Ok(resp.json::<Session>().await?)
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: &str,
        question: &str,
        answer: &str,
    ) -> Result<Session, ApiError> {
        let body = serde_json::json!({
            "username": username,
            "password": password,
            "role": role,
            "question": question,
            "answer": answer,
        });
        let resp = self
            .http
            .post(self.endpoint("api/register"))
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }
        Ok(resp.json::<Session>().await?)
    }

    pub async fn shops(&self) -> Result<Vec<Shop>, ApiError> {
        let resp = self.http.get(self.endpoint("api/shops")).send().await?;
        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }
        Ok(resp.json::<Vec<Shop>>().await?)
    }

    pub async fn create_shop(&self, shop: &NewShop) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.endpoint("api/shops"))
            .json(shop)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }
        Ok(())
    }

    pub async fn delete_shop(&self, id: i64) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.endpoint(&format!("api/shops/{}", id)))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }
        Ok(())
    }

    pub async fn request_service(&self, request: &ServiceRequest) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.endpoint("api/requests"))
            .json(request)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_doubled_slashes() {
        let client = ApiClient::new("http://127.0.0.1:3000/").unwrap();
        assert_eq!(
            client.endpoint("api/shops"),
            "http://127.0.0.1:3000/api/shops"
        );
        assert_eq!(
            client.endpoint("/api/shops/5"),
            "http://127.0.0.1:3000/api/shops/5"
        );
    }

    #[test]
    fn rejects_junk_base_url() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
