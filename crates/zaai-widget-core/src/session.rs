use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Browser-storage key for the device identity. Read at session-request
/// time, written when a response carries `user`, never deleted.
pub const DEVICE_ID_STORAGE_KEY: &str = "chatkit_device_id";

pub const SESSION_ENDPOINT_PATH: &str = "/api/chatkit/session";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Session failed {status}: {body}")]
    RequestFailed { status: u16, body: String },
    #[error("Missing client_secret from backend")]
    MalformedResponse,
    #[error("Session request could not be sent: {0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    /// `None` serializes to an explicit JSON `null` on the first visit.
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Raw transport outcome: HTTP status plus body text, before any
/// interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTransportResponse {
    pub status: u16,
    pub body: String,
}

/// Persistence seam for the device identity. The web shell backs this with
/// `window.localStorage`.
pub trait DeviceIdStore {
    fn load_device_id(&self) -> Option<String>;
    fn store_device_id(&self, device_id: &str);
}

/// One POST to the session endpoint. Futures are `?Send` because the wasm
/// shell's are not.
#[async_trait(?Send)]
pub trait SessionTransport {
    async fn post_session(
        &self,
        request: &SessionRequest,
    ) -> Result<SessionTransportResponse, SessionError>;
}

/// Joins the backend base URL with the session endpoint path. The backend
/// value is used verbatim.
pub fn session_endpoint(backend: &str) -> String {
    format!("{backend}{SESSION_ENDPOINT_PATH}")
}

/// Interprets a session response: non-2xx fails with the captured body,
/// 2xx must carry a non-empty `client_secret`.
pub fn parse_session_response(status: u16, body: &str) -> Result<SessionResponse, SessionError> {
    if !is_success(status) {
        return Err(SessionError::RequestFailed {
            status,
            body: body.to_string(),
        });
    }

    let value: Value = serde_json::from_str(body).map_err(|_| SessionError::MalformedResponse)?;
    let client_secret = value
        .get("client_secret")
        .and_then(Value::as_str)
        .filter(|secret| !secret.is_empty())
        .ok_or(SessionError::MalformedResponse)?
        .to_string();

    Ok(SessionResponse {
        client_secret,
        user: user_from_value(&value),
    })
}

/// Performs one session round trip: stored device id out, fresh
/// credential back. Invoked once per credential request; results are never
/// cached at this layer.
pub async fn negotiate_session<T, S>(transport: &T, store: &S) -> Result<String, SessionError>
where
    T: SessionTransport + ?Sized,
    S: DeviceIdStore + ?Sized,
{
    let request = SessionRequest {
        device_id: store.load_device_id(),
    };
    let raw = transport.post_session(&request).await?;

    // The backend mints the device identity on the first call, and the
    // identity is persisted before the credential is validated, so a 2xx
    // response missing client_secret still rotates the stored id.
    if is_success(raw.status) {
        if let Some(user) = serde_json::from_str::<Value>(&raw.body)
            .ok()
            .as_ref()
            .and_then(user_from_value)
        {
            store.store_device_id(&user);
        }
    }

    Ok(parse_session_response(raw.status, &raw.body)?.client_secret)
}

/// Credential capability handed to the external chat component: an
/// existing credential is returned unchanged, otherwise a session is
/// negotiated.
pub async fn resolve_credential<T, S>(
    existing: Option<String>,
    transport: &T,
    store: &S,
) -> Result<String, SessionError>
where
    T: SessionTransport + ?Sized,
    S: DeviceIdStore + ?Sized,
{
    if let Some(secret) = existing.filter(|secret| !secret.is_empty()) {
        return Ok(secret);
    }
    negotiate_session(transport, store).await
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn user_from_value(value: &Value) -> Option<String> {
    value
        .get("user")
        .and_then(Value::as_str)
        .filter(|user| !user.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use futures::executor::block_on;

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        device_id: RefCell<Option<String>>,
    }

    impl DeviceIdStore for MemoryStore {
        fn load_device_id(&self) -> Option<String> {
            self.device_id.borrow().clone()
        }

        fn store_device_id(&self, device_id: &str) {
            *self.device_id.borrow_mut() = Some(device_id.to_string());
        }
    }

    #[derive(Default)]
    struct ScriptedTransport {
        responses: RefCell<VecDeque<SessionTransportResponse>>,
        requests: RefCell<Vec<SessionRequest>>,
    }

    impl ScriptedTransport {
        fn respond_with(responses: Vec<(u16, &str)>) -> Self {
            Self {
                responses: RefCell::new(
                    responses
                        .into_iter()
                        .map(|(status, body)| SessionTransportResponse {
                            status,
                            body: body.to_string(),
                        })
                        .collect(),
                ),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl SessionTransport for ScriptedTransport {
        async fn post_session(
            &self,
            request: &SessionRequest,
        ) -> Result<SessionTransportResponse, SessionError> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| SessionError::Network("no scripted response".to_string()))
        }
    }

    #[test]
    fn request_serializes_absent_device_id_as_null() {
        let body = serde_json::to_string(&SessionRequest { device_id: None })
            .expect("request serializes");
        assert_eq!(body, r#"{"device_id":null}"#);
    }

    #[test]
    fn parse_rejects_non_success_status() {
        let error = parse_session_response(500, "boom").expect_err("expected failure");
        assert_eq!(
            error,
            SessionError::RequestFailed {
                status: 500,
                body: "boom".to_string(),
            }
        );
        assert!(error.to_string().contains("boom"));
        assert!(error.to_string().contains("500"));
    }

    #[test]
    fn parse_requires_client_secret() {
        let error =
            parse_session_response(200, r#"{"user":"abc"}"#).expect_err("expected failure");
        assert_eq!(error, SessionError::MalformedResponse);
    }

    #[test]
    fn parse_rejects_empty_client_secret() {
        let error = parse_session_response(200, r#"{"client_secret":""}"#)
            .expect_err("expected failure");
        assert_eq!(error, SessionError::MalformedResponse);
    }

    #[test]
    fn parse_rejects_unparseable_body() {
        let error = parse_session_response(200, "not json").expect_err("expected failure");
        assert_eq!(error, SessionError::MalformedResponse);
    }

    #[test]
    fn parse_accepts_full_response() {
        let response =
            parse_session_response(200, r#"{"client_secret":"cs_1","user":"dev_1"}"#)
                .expect("valid response");
        assert_eq!(response.client_secret, "cs_1");
        assert_eq!(response.user.as_deref(), Some("dev_1"));
    }

    #[test]
    fn first_negotiation_sends_null_device_id() {
        let transport =
            ScriptedTransport::respond_with(vec![(200, r#"{"client_secret":"cs_1"}"#)]);
        let store = MemoryStore::default();

        let secret = block_on(negotiate_session(&transport, &store)).expect("session succeeds");

        assert_eq!(secret, "cs_1");
        assert_eq!(transport.requests.borrow()[0].device_id, None);
    }

    #[test]
    fn returned_user_is_persisted_and_sent_on_the_next_call() {
        let transport = ScriptedTransport::respond_with(vec![
            (200, r#"{"client_secret":"cs_1","user":"abc"}"#),
            (200, r#"{"client_secret":"cs_2"}"#),
        ]);
        let store = MemoryStore::default();

        block_on(negotiate_session(&transport, &store)).expect("first session succeeds");
        assert_eq!(store.load_device_id().as_deref(), Some("abc"));

        block_on(negotiate_session(&transport, &store)).expect("second session succeeds");
        assert_eq!(
            transport.requests.borrow()[1].device_id.as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn user_is_persisted_even_when_client_secret_is_missing() {
        let transport = ScriptedTransport::respond_with(vec![(200, r#"{"user":"abc"}"#)]);
        let store = MemoryStore::default();

        let error =
            block_on(negotiate_session(&transport, &store)).expect_err("expected failure");

        assert_eq!(error, SessionError::MalformedResponse);
        assert_eq!(store.load_device_id().as_deref(), Some("abc"));
    }

    #[test]
    fn failed_request_does_not_touch_the_store() {
        let transport = ScriptedTransport::respond_with(vec![(500, "boom")]);
        let store = MemoryStore::default();

        let error =
            block_on(negotiate_session(&transport, &store)).expect_err("expected failure");

        assert!(matches!(error, SessionError::RequestFailed { status: 500, .. }));
        assert_eq!(store.load_device_id(), None);
    }

    #[test]
    fn existing_credential_is_returned_without_a_request() {
        let transport = ScriptedTransport::default();
        let store = MemoryStore::default();

        let secret = block_on(resolve_credential(
            Some("cs_existing".to_string()),
            &transport,
            &store,
        ))
        .expect("existing credential resolves");

        assert_eq!(secret, "cs_existing");
        assert!(transport.requests.borrow().is_empty());
    }

    #[test]
    fn empty_existing_credential_triggers_negotiation() {
        let transport =
            ScriptedTransport::respond_with(vec![(200, r#"{"client_secret":"cs_1"}"#)]);
        let store = MemoryStore::default();

        let secret = block_on(resolve_credential(Some(String::new()), &transport, &store))
            .expect("session succeeds");

        assert_eq!(secret, "cs_1");
        assert_eq!(transport.requests.borrow().len(), 1);
    }

    #[test]
    fn session_endpoint_joins_verbatim() {
        assert_eq!(
            session_endpoint("https://api.zaai.se"),
            "https://api.zaai.se/api/chatkit/session"
        );
        // No trailing-slash cleanup on the configured backend.
        assert_eq!(
            session_endpoint("https://api.zaai.se/"),
            "https://api.zaai.se//api/chatkit/session"
        );
    }
}
