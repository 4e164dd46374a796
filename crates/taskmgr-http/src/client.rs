use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{HttpError, Result};

/// Shared JSON client bound to one backend base URI.
///
/// Cloning is cheap; every service holds its own clone.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base: String,
}

impl HttpClient {
    /// Build a client for `base_uri`.
    ///
    /// No timeout is applied unless `timeout` is set.
    ///
    /// # Errors
    /// Returns an error when the base URI is not http(s) or the client cannot be built.
    pub fn new(base_uri: &str, timeout: Option<Duration>) -> Result<Self> {
        let base = base_uri.trim().trim_end_matches('/');
        let host = base
            .strip_prefix("http://")
            .or_else(|| base.strip_prefix("https://"))
            .unwrap_or_default();
        if host.is_empty() {
            return Err(HttpError::InvalidBaseUri(base_uri.to_owned()));
        }
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(HttpError::Client)?;
        Ok(Self {
            http,
            base: base.to_owned(),
        })
    }

    /// Base URI without trailing slash.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// `GET {path}?{query}` decoded as JSON.
    ///
    /// # Errors
    /// Transport, status and decode failures.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.url(path);
        let request = self.http.get(&url).query(query);
        self.send_json(Method::GET, url, request).await
    }

    /// `POST {path}` with a JSON body.
    ///
    /// # Errors
    /// Transport, status and decode failures.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.http.post(&url).json(body);
        self.send_json(Method::POST, url, request).await
    }

    /// `PATCH {path}` with a partial JSON body.
    ///
    /// # Errors
    /// Transport, status and decode failures.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.http.patch(&url).json(body);
        self.send_json(Method::PATCH, url, request).await
    }

    /// `DELETE {path}`, discarding the response body.
    ///
    /// # Errors
    /// Transport and status failures.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        let request = self.http.delete(&url);
        self.send(&Method::DELETE, &url, request).await?;
        Ok(())
    }

    async fn send(&self, method: &Method, url: &str, request: RequestBuilder) -> Result<Response> {
        debug!(%method, %url, "Sending request");
        let response = request.send().await.map_err(|source| HttpError::Transport {
            method: method.clone(),
            url: url.to_owned(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::Status {
                method: method.clone(),
                url: url.to_owned(),
                status,
                body,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, method: Method, url: String, request: RequestBuilder) -> Result<T> {
        let response = self.send(&method, &url, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| HttpError::Decode { method, url, source })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;

    #[test]
    fn rejects_non_http_base_uri() {
        assert!(matches!(
            HttpClient::new("ftp://example.com", None),
            Err(HttpError::InvalidBaseUri(_))
        ));
        assert!(matches!(HttpClient::new("http://", None), Err(HttpError::InvalidBaseUri(_))));
    }

    #[test]
    fn joins_paths_without_double_slashes() -> Result<()> {
        let client = HttpClient::new("http://localhost:3000/", None)?;
        assert_eq!(client.base_uri(), "http://localhost:3000");
        assert_eq!(client.url("/projects"), "http://localhost:3000/projects");
        assert_eq!(client.url("projects/1"), "http://localhost:3000/projects/1");
        Ok(())
    }
}
