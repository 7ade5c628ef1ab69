//! Practicum homework statuses API client.

use async_trait::async_trait;
use common::{FetchError, HomeworkError};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::StatusSource;

pub struct PracticumClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, HomeworkError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        debug!(from_date, status = status.as_u16(), "Status endpoint responded");
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()).into());
        }

        resp.json::<Value>()
            .await
            .map_err(|e| HomeworkError::Shape(format!("response body is not JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode as HttpStatus};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    const PATH: &str = "/api/user_api/homework_statuses/";

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}{}", addr, PATH)
    }

    async fn statuses(
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> (HttpStatus, Json<Value>) {
        let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
        if auth != Some("OAuth test-token") {
            return (
                HttpStatus::UNAUTHORIZED,
                Json(json!({"code": "not_authenticated"})),
            );
        }

        let from_date = params.get("from_date").cloned().unwrap_or_default();
        (
            HttpStatus::OK,
            Json(json!({
                "homeworks": [{"homework_name": format!("since {}", from_date), "status": "reviewing"}],
                "current_date": 2000
            })),
        )
    }

    #[tokio::test]
    async fn test_fetch_sends_token_and_from_date() {
        let endpoint = serve(Router::new().route(PATH, get(statuses))).await;
        let client = PracticumClient::new(endpoint, "test-token");

        let body = client.fetch(1581604970).await.unwrap();

        assert_eq!(body["homeworks"][0]["homework_name"], "since 1581604970");
        assert_eq!(body["current_date"], 2000);
    }

    #[tokio::test]
    async fn test_fetch_wrong_token_is_a_status_error() {
        let endpoint = serve(Router::new().route(PATH, get(statuses))).await;
        let client = PracticumClient::new(endpoint, "stale-token");

        let err = client.fetch(0).await.unwrap_err();

        assert_eq!(err, HomeworkError::Fetch(FetchError::Status(401)));
    }

    #[tokio::test]
    async fn test_fetch_service_unavailable() {
        let app = Router::new().route(PATH, get(|| async { HttpStatus::SERVICE_UNAVAILABLE }));
        let endpoint = serve(app).await;
        let client = PracticumClient::new(endpoint, "test-token");

        let err = client.fetch(0).await.unwrap_err();

        assert_eq!(err, HomeworkError::Fetch(FetchError::Status(503)));
    }

    #[tokio::test]
    async fn test_fetch_non_json_body() {
        let app = Router::new().route(PATH, get(|| async { "<html>maintenance</html>" }));
        let endpoint = serve(app).await;
        let client = PracticumClient::new(endpoint, "test-token");

        let err = client.fetch(0).await.unwrap_err();

        assert!(matches!(err, HomeworkError::Shape(_)));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = PracticumClient::new(format!("http://{}{}", addr, PATH), "test-token");

        let err = client.fetch(0).await.unwrap_err();

        assert!(matches!(err, HomeworkError::Fetch(FetchError::Transport(_))));
    }
}
