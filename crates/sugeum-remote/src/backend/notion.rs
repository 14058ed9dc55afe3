//! Notion database record store.

use std::time::Duration;

use serde_json::{json, Value};
use sugeum_core::{CanonicalRecord, RecordStore, StoreConfig, StoreError, StoreResponse};
use tracing::{debug, info, warn};

use super::truncate_body;
use crate::{RemoteError, Result};

/// Message returned when the integration token or database id is missing.
pub const MISSING_CREDENTIALS: &str = "NOTION_API_KEY 또는 NOTION_DB_ID 미설정";

const UNTITLED_DATABASE: &str = "(제목 없음)";

/// Writes records as pages of a Notion database.
///
/// The database schema is `who` (title), `when` (date) and
/// `what`/`where`/`why`/`how` (rich text).
pub struct NotionStore {
    client: reqwest::Client,
    base_url: String,
    notion_version: String,
    api_key: Option<String>,
    database_id: Option<String>,
}

impl NotionStore {
    pub fn new(api_key: Option<String>, database_id: Option<String>) -> Self {
        let defaults = StoreConfig::default();
        Self {
            client: reqwest::Client::new(),
            base_url: defaults.base_url,
            notion_version: defaults.notion_version,
            api_key,
            database_id,
        }
    }

    /// Build a store from configuration. Missing credentials are not an error
    /// here; saves then answer with status 500.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            notion_version: config.notion_version.clone(),
            api_key: config.api_key(),
            database_id: config.database_id(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.api_key, &self.database_id) {
            (Some(key), Some(id)) => Some((key.as_str(), id.as_str())),
            _ => None,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str, api_key: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(api_key)
            .header("Notion-Version", &self.notion_version)
    }

    /// Check that the database is reachable and return its title.
    pub async fn ping(&self) -> Result<String> {
        let (api_key, database_id) = self
            .credentials()
            .ok_or_else(|| RemoteError::MissingCredential(MISSING_CREDENTIALS.to_string()))?;

        let path = format!("/databases/{}", database_id);
        info!(database_id = %database_id, "pinging notion database");
        let resp = self.request(reqwest::Method::GET, &path, api_key).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(RemoteError::Server {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let database: Value = serde_json::from_str(&body)?;
        Ok(database_title(&database))
    }
}

impl RecordStore for NotionStore {
    async fn save(&self, record: &CanonicalRecord) -> std::result::Result<StoreResponse, StoreError> {
        let Some((api_key, database_id)) = self.credentials() else {
            warn!("notion credentials missing, record not sent");
            return Ok(StoreResponse::new(500, MISSING_CREDENTIALS));
        };

        let payload = build_page_payload(database_id, record);
        debug!(title = %record.title(), "creating notion page");

        let resp = self
            .request(reqwest::Method::POST, "/pages", api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        let response = interpret_response(status, &body);
        if response.is_success() {
            info!(status, url = %response.message, "notion page created");
        } else {
            warn!(status, message = %response.message, "notion rejected the record");
        }
        Ok(response)
    }
}

/// Request body for `POST /pages`.
///
/// `when` is only included when set; an empty date property is rejected by
/// the API.
pub fn build_page_payload(database_id: &str, record: &CanonicalRecord) -> Value {
    let mut properties = json!({
        "who": { "title": [{ "text": { "content": record.title() } }] },
        "what": rich_text(&record.what),
        "where": rich_text(&record.place),
        "why": rich_text(&record.why),
        "how": rich_text(&record.how),
    });

    if let Some(date) = record.date() {
        properties["when"] = json!({ "date": { "start": date } });
    }

    json!({
        "parent": { "database_id": database_id },
        "properties": properties,
    })
}

/// Map a `POST /pages` answer to a [`StoreResponse`].
///
/// Success carries the page URL (or id); failure carries Notion's `message`
/// (or `details`). Bodies that are not JSON are passed through.
pub fn interpret_response(status: u16, body: &str) -> StoreResponse {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return StoreResponse::new(status, truncate_body(body));
    };

    let keys: &[&str] = if (200..300).contains(&status) {
        &["url", "id"]
    } else {
        &["message", "details"]
    };

    let message = keys
        .iter()
        .find_map(|key| json.get(*key).and_then(Value::as_str))
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| truncate_body(&json.to_string()));

    StoreResponse::new(status, message)
}

fn rich_text(content: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": content } }] })
}

fn database_title(database: &Value) -> String {
    let title: String = database
        .get("title")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("plain_text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if title.is_empty() {
        UNTITLED_DATABASE.to_string()
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Request as seen by the local server: lowercased head and raw body.
    struct Captured {
        head: String,
        body: String,
    }

    /// Answer a single HTTP request with `status` and `body`, then hand back
    /// what was received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 4096];

            let captured = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before the request was complete");
                received.extend_from_slice(&chunk[..n]);

                let Some(split) = received.windows(4).position(|w| w == b"\r\n\r\n") else {
                    continue;
                };
                let head = String::from_utf8_lossy(&received[..split]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                let body_start = split + 4;
                if received.len() >= body_start + length {
                    let body = String::from_utf8_lossy(&received[body_start..body_start + length]);
                    break Captured {
                        head,
                        body: body.into_owned(),
                    };
                }
            };

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            captured
        });

        (base_url, handle)
    }

    fn record() -> CanonicalRecord {
        CanonicalRecord {
            who: "북구청".into(),
            what: "방수공사 (잔금)".into(),
            when: "2025-01-29".into(),
            place: "북구청".into(),
            why: "잔금".into(),
            how: "10,000,000원".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_page_payload() {
        let payload = build_page_payload("db-1", &record());

        assert_eq!(payload["parent"]["database_id"], "db-1");
        let properties = &payload["properties"];
        assert_eq!(properties["who"]["title"][0]["text"]["content"], "북구청");
        assert_eq!(properties["what"]["rich_text"][0]["text"]["content"], "방수공사 (잔금)");
        assert_eq!(properties["how"]["rich_text"][0]["text"]["content"], "10,000,000원");
        assert_eq!(properties["when"]["date"]["start"], "2025-01-29");
    }

    #[test]
    fn test_page_payload_without_date_or_who() {
        let record = CanonicalRecord {
            who: String::new(),
            when: String::new(),
            place: "강남 오피스텔".into(),
            ..record()
        };

        let payload = build_page_payload("db-1", &record);
        let properties = payload["properties"].as_object().unwrap();

        assert!(!properties.contains_key("when"));
        assert_eq!(properties["who"]["title"][0]["text"]["content"], "강남 오피스텔");
    }

    #[test]
    fn test_interpret_response() {
        assert_eq!(
            interpret_response(200, r#"{"id": "abc", "url": "https://www.notion.so/abc"}"#),
            StoreResponse::new(200, "https://www.notion.so/abc")
        );
        assert_eq!(
            interpret_response(200, r#"{"id": "abc"}"#),
            StoreResponse::new(200, "abc")
        );
        assert_eq!(
            interpret_response(
                401,
                r#"{"object": "error", "status": 401, "code": "unauthorized", "message": "API token is invalid."}"#
            ),
            StoreResponse::new(401, "API token is invalid.")
        );
        assert_eq!(
            interpret_response(502, "Bad Gateway"),
            StoreResponse::new(502, "Bad Gateway")
        );
    }

    #[test]
    fn test_database_title() {
        let database = json!({
            "title": [{ "plain_text": "수금 " }, { "plain_text": "관리" }]
        });
        assert_eq!(database_title(&database), "수금 관리");
        assert_eq!(database_title(&json!({ "title": [] })), UNTITLED_DATABASE);
    }

    #[tokio::test]
    async fn test_save_posts_page_payload() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"object": "page", "id": "abc", "url": "https://www.notion.so/abc"}"#,
        )
        .await;
        let store = NotionStore::new(Some("secret-token".into()), Some("db-1".into()))
            .with_base_url(base_url);

        let response = store.save(&record()).await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(response, StoreResponse::new(200, "https://www.notion.so/abc"));
        assert!(request.head.starts_with("post /pages http/1.1"), "{}", request.head);
        assert!(request.head.contains("authorization: bearer secret-token"));
        assert!(request.head.contains("notion-version: 2022-06-28"));
        let sent: Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(sent, build_page_payload("db-1", &record()));
    }

    #[tokio::test]
    async fn test_save_rejection_is_a_failed_response() {
        let (base_url, server) = serve_once(
            "400 Bad Request",
            r#"{"object": "error", "status": 400, "code": "validation_error", "message": "body failed validation: body.properties.when.date should be defined."}"#,
        )
        .await;
        let store = NotionStore::new(Some("secret-token".into()), Some("db-1".into()))
            .with_base_url(base_url);

        let response = store.save(&record()).await.unwrap();
        server.await.unwrap();

        assert!(!response.is_success());
        assert_eq!(response.status, 400);
        assert_eq!(
            response.message,
            "body failed validation: body.properties.when.date should be defined."
        );
        assert!(response.into_result().is_err());
    }

    #[tokio::test]
    async fn test_missing_credentials_answer_500() {
        let store = NotionStore::new(None, Some("db-1".into()));

        let response = store.save(&record()).await.unwrap();

        assert_eq!(response, StoreResponse::new(500, MISSING_CREDENTIALS));
        assert!(matches!(store.ping().await, Err(RemoteError::MissingCredential(_))));
    }
}
