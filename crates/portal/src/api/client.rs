//! Portal HTTP client
//!
//! Issues the portal's JSON and multipart requests with the CSRF header and
//! the session cookie attached. Uses synchronous HTTP (ureq) so controllers
//! stay executor-agnostic; every request is bounded by the configured
//! timeout and nothing is retried.

use log::debug;
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{LazyLock, PoisonError, RwLock};
use ureq::unversioned::multipart::{Form, Part};
use url::Url;

use super::PortalApi;
use super::wire::{
    Ack, ArchiveAck, ChatReply, ChatRequest, DeleteRequest, ErrorBody, HistoryReply, PhotoReply,
    QueryRef,
};
use crate::config::PortalSettings;
use crate::error::{RequestError, RequestResult};
use crate::models::{ChatHistoryEntry, PhotoUpload, QueryId, SupportRequest};

/// Header carrying the CSRF token on state-changing requests
pub const CSRF_HEADER: &str = "X-CSRFToken";

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<meta\b[^>]*>").expect("valid meta regex"));
static CSRF_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bname\s*=\s*["']csrf-token["']"#).expect("valid name regex")
});
static CONTENT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bcontent\s*=\s*["']([^"']*)["']"#).expect("valid content regex")
});

/// Pull the token out of a page's `<meta name="csrf-token" content="...">`
pub fn extract_csrf_token(html: &str) -> Option<String> {
    META_TAG
        .find_iter(html)
        .map(|m| m.as_str())
        .filter(|tag| CSRF_NAME.is_match(tag))
        .find_map(|tag| CONTENT_ATTR.captures(tag))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|token| !token.is_empty())
}

/// Blocking HTTP implementation of [`PortalApi`]
pub struct HttpPortal {
    agent: ureq::Agent,
    base_url: Url,
    csrf_token: RwLock<Option<String>>,
    session_cookie: Option<String>,
    support_email_url: String,
}

impl HttpPortal {
    /// Create a client from settings
    pub fn new(settings: &PortalSettings) -> anyhow::Result<Self> {
        let mut base_url = Url::parse(&settings.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid portal base URL {}: {}", settings.base_url, e))?;
        // Endpoints resolve under the base path, so it must end in a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let config = ureq::Agent::config_builder()
            .timeout_global(Some(settings.timeout()))
            .http_status_as_error(false)
            .build();

        Ok(Self {
            agent: ureq::Agent::new_with_config(config),
            base_url,
            csrf_token: RwLock::new(settings.csrf_token.clone()),
            session_cookie: settings.session_cookie.clone(),
            support_email_url: settings.support_email_url.clone(),
        })
    }

    /// Replace the CSRF token used on subsequent requests
    pub fn set_csrf_token(&self, token: impl Into<String>) {
        let mut guard = self
            .csrf_token
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(token.into());
    }

    /// Current CSRF token, if one is known
    pub fn csrf_token(&self) -> Option<String> {
        self.csrf_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Load a page and adopt the CSRF token from its meta tag
    pub fn fetch_csrf_token(&self, page_path: &str) -> RequestResult<String> {
        let url = self.url(page_path)?;
        debug!("GET {} (csrf bootstrap)", url);
        let request = self.with_session(self.agent.get(url.as_str()));
        let mut response = request.call().map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(transport_error)?;
        if !(200..300).contains(&status) {
            return Err(RequestError::Http {
                status,
                message: String::new(),
            });
        }

        let token = extract_csrf_token(&body)
            .ok_or_else(|| RequestError::Protocol("page has no csrf-token meta tag".into()))?;
        self.set_csrf_token(token.clone());
        Ok(token)
    }

    fn url(&self, path: &str) -> RequestResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| RequestError::Protocol(format!("invalid URL {}: {}", path, e)))
    }

    fn with_session<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        match &self.session_cookie {
            Some(cookie) => request.header("Cookie", cookie.as_str()),
            None => request,
        }
    }

    fn with_csrf<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        let request = self.with_session(request);
        match self.csrf_token() {
            Some(token) => request.header(CSRF_HEADER, token),
            None => request,
        }
    }

    fn get_json<R: DeserializeOwned>(&self, path: &str) -> RequestResult<R> {
        let url = self.url(path)?;
        debug!("GET {}", url);
        let request = self.with_session(self.agent.get(url.as_str()));
        let response = request.call().map_err(transport_error)?;
        read_json(response)
    }

    fn post_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> RequestResult<R> {
        let url = self.url(path)?;
        debug!("POST {}", url);
        let request = self.with_csrf(self.agent.post(url.as_str()));
        let response = request.send_json(body).map_err(transport_error)?;
        read_json(response)
    }
}

/// Map a transport-level failure onto the taxonomy
fn transport_error(err: ureq::Error) -> RequestError {
    match err {
        ureq::Error::Timeout(_) => RequestError::Timeout,
        ureq::Error::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => RequestError::Timeout,
        ureq::Error::StatusCode(status) => RequestError::Http {
            status,
            message: String::new(),
        },
        other => RequestError::Network(other.to_string()),
    }
}

/// Check the status, then parse the body as JSON
fn read_json<R: DeserializeOwned>(
    mut response: ureq::http::Response<ureq::Body>,
) -> RequestResult<R> {
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(transport_error)?;

    if !(200..300).contains(&status) {
        let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
        return Err(RequestError::Http {
            status,
            message: parsed.error.or(parsed.message).unwrap_or_default(),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        debug!("Non-JSON response body: {}", body);
        RequestError::Protocol(format!("server did not return JSON: {}", e))
    })
}

impl PortalApi for HttpPortal {
    fn toggle_star(&self, id: QueryId) -> RequestResult<()> {
        let ack: Ack = self.post_json("/toggle_star", &QueryRef { query_id: id })?;
        ack.into_result("Failed to update star status").map(|_| ())
    }

    fn toggle_archive(&self, id: QueryId) -> RequestResult<bool> {
        let ack: ArchiveAck = self.post_json("/toggle_archive", &QueryRef { query_id: id })?;
        if ack.success {
            Ok(ack.archived)
        } else {
            Err(RequestError::Application(
                ack.error.unwrap_or_else(|| "Failed to archive query".to_string()),
            ))
        }
    }

    fn delete_query(&self, id: QueryId, permanent: bool) -> RequestResult<()> {
        let body = DeleteRequest {
            query_id: id,
            permanent,
        };
        let ack: Ack = self.post_json("/delete_query", &body)?;
        ack.into_result("Failed to delete query").map(|_| ())
    }

    fn restore_query(&self, id: QueryId) -> RequestResult<()> {
        let ack: Ack = self.post_json("/restore_query", &QueryRef { query_id: id })?;
        ack.into_result("Failed to restore query").map(|_| ())
    }

    fn archive_query(&self, id: QueryId) -> RequestResult<()> {
        let ack: Ack = self.post_json("/archive_query", &QueryRef { query_id: id })?;
        ack.into_result("Failed to archive query").map(|_| ())
    }

    fn send_chat(&self, message: &str) -> RequestResult<String> {
        let body = ChatRequest {
            message: message.to_string(),
        };
        let reply: ChatReply = self.post_json("/chat", &body)?;
        match (reply.success, reply.response) {
            (Some(false), response) => Err(RequestError::Application(
                response.unwrap_or_else(|| "An error occurred. Please try again.".to_string()),
            )),
            (_, Some(response)) => Ok(response),
            (_, None) => Err(RequestError::Protocol("chat reply has no response".into())),
        }
    }

    fn chat_history(&self) -> RequestResult<Vec<ChatHistoryEntry>> {
        let reply: HistoryReply = self.get_json("/get_chat_history")?;
        match reply.error {
            Some(error) if reply.history.is_empty() => Err(RequestError::Application(error)),
            _ => Ok(reply.history),
        }
    }

    fn clear_chat_history(&self) -> RequestResult<()> {
        let ack: Ack = self.get_json("/clear_chat_history")?;
        ack.into_result("Failed to clear chat history").map(|_| ())
    }

    fn upload_profile_photo(&self, upload: &PhotoUpload) -> RequestResult<String> {
        let url = self.url("/upload_profile_photo")?;
        debug!("POST {} ({} bytes)", url, upload.bytes.len());

        let part = Part::bytes(&upload.bytes)
            .file_name(&upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(|e| {
                RequestError::Protocol(format!(
                    "invalid content type {}: {}",
                    upload.content_type, e
                ))
            })?;
        let form = Form::new().part("photo", part);

        let request = self.with_csrf(self.agent.post(url.as_str()));
        let response = request.send(form).map_err(transport_error)?;
        let reply: PhotoReply = read_json(response)?;

        match (reply.success, reply.photo_url) {
            (true, Some(url)) => Ok(url),
            (true, None) => Err(RequestError::Protocol("upload reply has no photo_url".into())),
            (false, _) => Err(RequestError::Application(
                reply.error.unwrap_or_else(|| "Unknown error".to_string()),
            )),
        }
    }

    fn send_support_email(&self, request: &SupportRequest) -> RequestResult<Option<String>> {
        let ack: Ack = self.post_json(&self.support_email_url, request)?;
        ack.into_result("Failed to send message. Please try again.")
    }
}
