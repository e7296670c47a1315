use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use zaai_widget_core::{
    SessionError, SessionRequest, SessionTransport, SessionTransportResponse, session_endpoint,
};

/// `SessionTransport` backed by `window.fetch`. Status and body text are
/// returned uninterpreted; the core decides what they mean.
pub(crate) struct FetchSessionTransport {
    session_url: String,
}

impl FetchSessionTransport {
    pub(crate) fn new(backend: &str) -> Self {
        Self {
            session_url: session_endpoint(backend),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl SessionTransport for FetchSessionTransport {
    async fn post_session(
        &self,
        request: &SessionRequest,
    ) -> Result<SessionTransportResponse, SessionError> {
        let window = web_sys::window()
            .ok_or_else(|| SessionError::Network("no window".to_string()))?;
        let body = serde_json::to_string(request)
            .map_err(|error| SessionError::Network(error.to_string()))?;

        let init = web_sys::RequestInit::new();
        init.set_method("POST");
        init.set_body(&JsValue::from_str(&body));

        let headers = web_sys::Headers::new().map_err(network_error)?;
        headers
            .set("Content-Type", "application/json")
            .map_err(network_error)?;
        init.set_headers(headers.as_ref());

        let response = JsFuture::from(window.fetch_with_str_and_init(&self.session_url, &init))
            .await
            .map_err(network_error)?;
        let response: web_sys::Response = response
            .dyn_into()
            .map_err(|_| SessionError::Network("fetch returned a non-response".to_string()))?;

        let status = response.status();
        let text = JsFuture::from(response.text().map_err(network_error)?)
            .await
            .map_err(network_error)?;

        Ok(SessionTransportResponse {
            status,
            body: text.as_string().unwrap_or_default(),
        })
    }
}

fn network_error(value: JsValue) -> SessionError {
    SessionError::Network(js_message(&value))
}

pub(crate) fn js_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|error| String::from(error.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}
