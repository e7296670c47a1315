//! Platform-neutral core of the ZAAI embeddable chat widget.
//!
//! Everything here is browser-free: configuration parsing, the session
//! negotiation contract, the panel state machine, and the passthrough
//! payload handed to the vendor chat component. The wasm shell in
//! `zaai-widget-web` supplies the DOM, fetch, and storage bindings.

pub mod chatkit;
pub mod config;
pub mod error;
pub mod session;
pub mod state;

pub use chatkit::{CHATKIT_ELEMENT_NAME, CHATKIT_SCRIPT_URL, ChatKitOptions};
pub use config::{ConfigError, DEFAULT_ICON, DEFAULT_TITLE, WidgetConfig, WidgetOptions};
pub use error::WidgetError;
pub use session::{
    DEVICE_ID_STORAGE_KEY, DeviceIdStore, SESSION_ENDPOINT_PATH, SessionError, SessionRequest,
    SessionResponse, SessionTransport, SessionTransportResponse, negotiate_session,
    parse_session_response, resolve_credential, session_endpoint,
};
pub use state::{
    MountStatus, PanelState, ReducerResult, WidgetAction, WidgetState, apply_action,
};
