//! Transport seam of the client core.
//!
//! [`Backend`] is everything the core needs from the server. [`HttpBackend`]
//! speaks the JSON API over `reqwest`; tests substitute an in-memory fake.

use crate::domain::{
    AuraError, AuraResult, Field, FriendAction, FriendshipStatus, Identity, Ping, PingDraft,
    PingId, Response, UserId,
};
use crate::dtos::{FriendshipDTO, LoginDTO, RegisterDTO, RespondDTO, TokenDTO};
use dotenv::dotenv;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::env;
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Every call the client core makes against the server. Calls that need a
/// session take the bearer token explicitly.
pub trait Backend {
    async fn register(&self, body: &RegisterDTO) -> AuraResult<String>;

    async fn login(&self, email: &str, password: &str) -> AuraResult<String>;

    async fn me(&self, token: &str) -> AuraResult<Identity>;

    async fn search_users(&self, token: &str, query: &str) -> AuraResult<Vec<Identity>>;

    async fn get_user(&self, token: &str, id: UserId) -> AuraResult<Identity>;

    async fn incoming_requests(&self, token: &str) -> AuraResult<Vec<Identity>>;

    async fn friends(&self, token: &str) -> AuraResult<Vec<Identity>>;

    /// Applies `action` against `target` and returns the acknowledged status.
    async fn friend_action(
        &self,
        token: &str,
        target: UserId,
        action: FriendAction,
    ) -> AuraResult<FriendshipStatus>;

    async fn create_ping(&self, token: &str, draft: &PingDraft) -> AuraResult<Ping>;

    async fn inbox(&self, token: &str) -> AuraResult<Vec<Ping>>;

    async fn get_ping(&self, token: &str, id: PingId) -> AuraResult<Ping>;

    async fn respond(&self, token: &str, id: PingId, response: Response) -> AuraResult<Ping>;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, always ending with `/`
    pub base_url: Url,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url })
    }

    /// Reads `AURA_API_URL`, falling back to the local development server
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();
        let raw = env::var("AURA_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&raw).map_err(|e| format!("Invalid AURA_API_URL `{raw}`: {e}"))
    }

    /// The server origin: the base URL without its trailing `/api` segment
    pub fn origin(&self) -> Url {
        let mut origin = self.base_url.clone();
        let path = origin.path().trim_end_matches('/').to_string();
        let stripped = path.strip_suffix("/api").unwrap_or(&path);
        origin.set_path(&format!("{stripped}/"));
        origin
    }

    /// Absolute calendar link for `ping`. A root-relative reference is
    /// resolved under the origin's path so nested deployments keep their
    /// prefix.
    pub fn calendar_url(&self, ping: &Ping) -> Result<Url, url::ParseError> {
        self.origin()
            .join(ping.ics_public_url.trim_start_matches('/'))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    code: Option<String>,
    field: Option<String>,
}

/// Maps a non-success answer back onto the shared error taxonomy
pub fn error_from_response(status: StatusCode, body: &str) -> AuraError {
    if status == StatusCode::UNAUTHORIZED {
        return AuraError::Unauthorized;
    }

    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let mapped = match parsed.code.as_deref() {
        Some("validation_error") => parsed
            .field
            .as_deref()
            .and_then(Field::parse)
            .map(AuraError::validation),
        Some("already_connected") => Some(AuraError::AlreadyConnected),
        Some("already_requested") => Some(AuraError::AlreadyRequested),
        Some("no_such_request") => Some(AuraError::NoSuchRequest),
        Some("not_connected") => Some(AuraError::NotConnected),
        Some("forbidden") => Some(AuraError::Forbidden),
        Some("invalid_invitee") => Some(AuraError::InvalidInvitee),
        Some("unauthorized") => Some(AuraError::Unauthorized),
        _ => None,
    };

    mapped.unwrap_or_else(|| {
        let message = if parsed.error.is_empty() {
            status.canonical_reason().unwrap_or("unexpected status").to_string()
        } else {
            parsed.error
        };
        AuraError::network(Some(status.as_u16()), message)
    })
}

pub struct HttpBackend {
    http: Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> AuraResult<Url> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| AuraError::network(None, format!("invalid url `{path}`: {e}")))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AuraResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| AuraError::network(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = error_from_response(status, &body);
            debug!(status = status.as_u16(), "Request failed: {}", err);
            return Err(err);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AuraError::network(Some(status.as_u16()), format!("invalid response body: {e}")))
    }
}

impl Backend for HttpBackend {
    async fn register(&self, body: &RegisterDTO) -> AuraResult<String> {
        let request = self.http.post(self.url("auth/register")?).json(body);
        let token: TokenDTO = self.send(request).await?;
        Ok(token.access_token)
    }

    async fn login(&self, email: &str, password: &str) -> AuraResult<String> {
        let body = LoginDTO {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = self.http.post(self.url("auth/login")?).json(&body);
        let token: TokenDTO = self.send(request).await?;
        Ok(token.access_token)
    }

    async fn me(&self, token: &str) -> AuraResult<Identity> {
        let request = self.http.get(self.url("me")?).bearer_auth(token);
        self.send(request).await
    }

    async fn search_users(&self, token: &str, query: &str) -> AuraResult<Vec<Identity>> {
        let mut url = self.url("users/search")?;
        url.query_pairs_mut().append_pair("q", query);
        self.send(self.http.get(url).bearer_auth(token)).await
    }

    async fn get_user(&self, token: &str, id: UserId) -> AuraResult<Identity> {
        let request = self.http.get(self.url(&format!("users/{id}"))?).bearer_auth(token);
        self.send(request).await
    }

    async fn incoming_requests(&self, token: &str) -> AuraResult<Vec<Identity>> {
        let request = self
            .http
            .get(self.url("friends/requests/incoming")?)
            .bearer_auth(token);
        self.send(request).await
    }

    async fn friends(&self, token: &str) -> AuraResult<Vec<Identity>> {
        let request = self.http.get(self.url("friends")?).bearer_auth(token);
        self.send(request).await
    }

    async fn friend_action(
        &self,
        token: &str,
        target: UserId,
        action: FriendAction,
    ) -> AuraResult<FriendshipStatus> {
        let request = match action {
            FriendAction::Request => self.http.post(self.url(&format!("friends/{target}/request"))?),
            FriendAction::Approve => self.http.post(self.url(&format!("friends/{target}/approve"))?),
            FriendAction::Decline => self.http.post(self.url(&format!("friends/{target}/decline"))?),
            FriendAction::Remove => self.http.delete(self.url(&format!("friends/{target}"))?),
        };
        let acknowledged: FriendshipDTO = self.send(request.bearer_auth(token)).await?;
        Ok(acknowledged.status)
    }

    async fn create_ping(&self, token: &str, draft: &PingDraft) -> AuraResult<Ping> {
        let request = self.http.post(self.url("pings")?).bearer_auth(token).json(draft);
        self.send(request).await
    }

    async fn inbox(&self, token: &str) -> AuraResult<Vec<Ping>> {
        let request = self.http.get(self.url("pings/inbox")?).bearer_auth(token);
        self.send(request).await
    }

    async fn get_ping(&self, token: &str, id: PingId) -> AuraResult<Ping> {
        let request = self.http.get(self.url(&format!("pings/{id}"))?).bearer_auth(token);
        self.send(request).await
    }

    async fn respond(&self, token: &str, id: PingId, response: Response) -> AuraResult<Ping> {
        let request = self
            .http
            .post(self.url(&format!("pings/{id}/respond"))?)
            .bearer_auth(token)
            .json(&RespondDTO { status: response });
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_map_back_to_variants() {
        let body = r#"{"error":"Validation error","code":"validation_error","field":"starts_at"}"#;
        assert_eq!(
            error_from_response(StatusCode::UNPROCESSABLE_ENTITY, body),
            AuraError::validation(Field::StartsAt)
        );
        assert_eq!(
            error_from_response(StatusCode::CONFLICT, r#"{"error":"x","code":"already_connected"}"#),
            AuraError::AlreadyConnected
        );
        assert_eq!(
            error_from_response(StatusCode::UNAUTHORIZED, ""),
            AuraError::Unauthorized
        );
    }

    #[test]
    fn unknown_answers_become_network_errors() {
        assert_eq!(
            error_from_response(StatusCode::NOT_FOUND, r#"{"error":"Ping not found"}"#),
            AuraError::network(Some(404), "Ping not found")
        );
        assert_eq!(
            error_from_response(StatusCode::BAD_GATEWAY, "<html>"),
            AuraError::network(Some(502), "Bad Gateway")
        );
    }

    #[test]
    fn origin_drops_the_api_segment() {
        let config = ClientConfig::new("http://example.com:8000/api").unwrap();
        assert_eq!(config.base_url.as_str(), "http://example.com:8000/api/");
        assert_eq!(config.origin().as_str(), "http://example.com:8000/");

        let nested = ClientConfig::new("https://example.com/aura/api/").unwrap();
        assert_eq!(nested.origin().as_str(), "https://example.com/aura/");
        assert_eq!(
            nested.base_url.join("pings/inbox").unwrap().as_str(),
            "https://example.com/aura/api/pings/inbox"
        );
    }

    #[test]
    fn calendar_link_keeps_the_deployment_prefix() {
        let ping = Ping {
            id: 3,
            title: "Beer?".into(),
            location: "Kvarnen".into(),
            notes: String::new(),
            starts_at: chrono::Utc::now(),
            creator: Identity {
                id: 1,
                name: "Ann".into(),
                email: "ann@example.com".into(),
                timezone: None,
            },
            invites: Vec::new(),
            ics_public_url: "/api/pings/3/ics-public?sig=abc".into(),
        };

        let nested = ClientConfig::new("https://example.com/aura/api/").unwrap();
        assert_eq!(
            nested.calendar_url(&ping).unwrap().as_str(),
            "https://example.com/aura/api/pings/3/ics-public?sig=abc"
        );

        let root = ClientConfig::new("http://localhost:8000/api").unwrap();
        assert_eq!(
            root.calendar_url(&ping).unwrap().as_str(),
            "http://localhost:8000/api/pings/3/ics-public?sig=abc"
        );
    }
}
