use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Thin PostgREST client. Services build relative paths with PostgREST
/// filter syntax (`?id=eq.{uuid}`) and deserialize the row arrays that come
/// back; nothing above this seam sees reqwest types.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn headers(&self, representation: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(key) = HeaderValue::from_str(&self.anon_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.anon_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if representation {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }

        headers
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        representation: bool,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.headers(representation));

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Storage API error ({}): {}", status, error_text);
            return Err(anyhow!("Storage API error ({}): {}", status, error_text));
        }

        Ok(response)
    }

    /// GET rows; `path` carries the table and any PostgREST filters.
    pub async fn select<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, path, None, false).await?;
        Ok(response.json::<T>().await?)
    }

    /// INSERT one row and return the stored representation.
    pub async fn insert<T>(&self, table: &str, row: Value) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", table);
        let response = self.send(Method::POST, &path, Some(row), true).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    /// PATCH the rows selected by `path` and return their representations.
    pub async fn update<T>(&self, path: &str, patch: Value) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::PATCH, path, Some(patch), true).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    /// DELETE the rows selected by `path`.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, None, false).await?;
        Ok(())
    }
}
