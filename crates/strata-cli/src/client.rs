//! HTTP client for the strata daemon's image endpoints.

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Header carrying base64-encoded registry credentials.
pub const REGISTRY_AUTH_HEADER: &str = "X-Registry-Auth";

/// User Agent string
pub const USER_AGENT: &str = concat!("strata/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Status { status: StatusCode, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Thin wrapper over the daemon API rooted at `base`.
#[derive(Debug, Clone)]
pub struct DaemonClient {
    http: Client,
    base: String,
}

impl DaemonClient {
    pub fn new(host: &str) -> Result<Self, ClientError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base: host.trim_end_matches('/').to_string(),
        })
    }

    /// Whether the daemon already has `image`. Only a 404 means absent.
    pub async fn image_exists(&self, image: &str) -> Result<bool, ClientError> {
        let url = format!("{}/images/{image}/json", self.base);
        debug!(%url, "inspecting image");
        let response = self.http.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check(response).await.map(|_| true)
    }

    /// Start a pull. The returned body streams status events.
    pub async fn pull(&self, name: &str, tag: &str, auth: &str) -> Result<Response, ClientError> {
        let url = format!("{}/images/create", self.base);
        let mut query = vec![("fromImage", name)];
        if !tag.is_empty() {
            query.push(("tag", tag));
        }
        debug!(%url, name, tag, "pulling image");
        let response = self
            .http
            .post(&url)
            .query(&query)
            .header(REGISTRY_AUTH_HEADER, auth)
            .send()
            .await?;
        check(response).await
    }

    /// Start a push. The returned body streams status events.
    pub async fn push(&self, name: &str, auth: &str) -> Result<Response, ClientError> {
        let url = format!("{}/images/{name}/push", self.base);
        debug!(%url, "pushing image");
        let response = self
            .http
            .post(&url)
            .header(REGISTRY_AUTH_HEADER, auth)
            .send()
            .await?;
        check(response).await
    }
}

/// Pass 2xx responses through; turn anything else into [`ClientError::Status`].
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(err) => err.message,
        Err(_) => body.trim().to_string(),
    };
    Err(ClientError::Status { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_image_exists() {
        let mut server = Server::new_async().await;
        let _found = server
            .mock("GET", "/images/busybox:latest/json")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;
        let _missing = server
            .mock("GET", "/images/redis:alpine/json")
            .with_status(404)
            .with_body(r#"{"message":"image: redis:alpine: not found"}"#)
            .create_async()
            .await;

        let client = DaemonClient::new(&server.url()).unwrap();
        assert!(client.image_exists("busybox:latest").await.unwrap());
        assert!(!client.image_exists("redis:alpine").await.unwrap());
    }

    #[tokio::test]
    async fn test_inspect_server_error_is_reported() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/images/busybox/json")
            .with_status(500)
            .with_body(r#"{"message":"daemon is shutting down"}"#)
            .create_async()
            .await;

        let client = DaemonClient::new(&server.url()).unwrap();
        let err = client.image_exists("busybox").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.to_string(), "daemon is shutting down (HTTP 500 Internal Server Error)");
    }

    #[tokio::test]
    async fn test_pull_sends_query_and_auth() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/images/create")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("fromImage".into(), "docker.io/library/redis".into()),
                Matcher::UrlEncoded("tag".into(), "alpine".into()),
            ]))
            .match_header(REGISTRY_AUTH_HEADER, "e30=")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_body(r#"{"id":"a","status":"done"}"#)
            .create_async()
            .await;

        let client = DaemonClient::new(&format!("{}/", server.url())).unwrap();
        let response = client
            .pull("docker.io/library/redis", "alpine", "e30=")
            .await
            .unwrap();
        assert_eq!(response.text().await.unwrap(), r#"{"id":"a","status":"done"}"#);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_pull_without_tag_omits_query_param() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/images/create")
            .match_query(Matcher::Exact("fromImage=busybox".into()))
            .with_status(200)
            .create_async()
            .await;

        let client = DaemonClient::new(&server.url()).unwrap();
        client.pull("busybox", "", "").await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_push_error_uses_plain_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/images/redis:7/push")
            .with_status(401)
            .with_body("unauthorized\n")
            .create_async()
            .await;

        let client = DaemonClient::new(&server.url()).unwrap();
        let err = client.push("redis:7", "").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(err.to_string().starts_with("unauthorized"));
    }
}
