//! Loader and mount glue for the vendor `openai-chatkit` element.

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{Document, HtmlElement, HtmlScriptElement};

use zaai_widget_core::{
    CHATKIT_ELEMENT_NAME, CHATKIT_SCRIPT_URL, ChatKitOptions, WidgetConfig, WidgetError,
    resolve_credential,
};

use crate::network::{FetchSessionTransport, js_message};
use crate::storage::LocalStorageDeviceIdStore;

#[wasm_bindgen]
extern "C" {
    /// The vendor chat component. `setOptions` is the only surface this
    /// shell touches; everything behind it is the component's own business.
    #[wasm_bindgen(extends = HtmlElement)]
    type ChatKitElement;

    #[wasm_bindgen(method, js_name = setOptions)]
    fn set_options(this: &ChatKitElement, options: &JsValue);
}

/// A constructed, configured component instance that has not been attached
/// yet. Attachment is separate so a superseded mount can be dropped whole.
pub(crate) struct ChatKitInstance {
    node: ChatKitElement,
    credential_provider: Closure<dyn FnMut(JsValue) -> Promise>,
}

impl ChatKitInstance {
    pub(crate) fn attach(&self, mount: &HtmlElement) -> Result<(), JsValue> {
        mount.append_child(&self.node).map(|_| ())
    }

    /// The credential callback must outlive the mounted instance; the
    /// widget holds it until the next mount replaces it.
    pub(crate) fn into_credential_provider(self) -> Closure<dyn FnMut(JsValue) -> Promise> {
        self.credential_provider
    }
}

/// Loads the component definition if needed, then builds a fresh instance
/// wired to the session backend. Session negotiation is deferred until the
/// component asks for a credential.
pub(crate) async fn prepare_chatkit(
    document: &Document,
    config: &WidgetConfig,
) -> Result<ChatKitInstance, WidgetError> {
    ensure_chatkit_ready(document).await?;

    let node: ChatKitElement = document
        .create_element(CHATKIT_ELEMENT_NAME)
        .map_err(component_error)?
        .unchecked_into();

    let credential_provider = credential_provider(config.backend.clone());
    let options = build_options(&credential_provider)?;
    node.set_options(&options);

    let style = node.style();
    style.set_property("width", "100%").map_err(component_error)?;
    style.set_property("height", "100%").map_err(component_error)?;

    Ok(ChatKitInstance {
        node,
        credential_provider,
    })
}

/// Registers the component definition exactly once: a registry hit is
/// free, otherwise the vendor script is injected and `whenDefined`
/// awaited. Concurrent callers are not deduplicated.
async fn ensure_chatkit_ready(document: &Document) -> Result<(), WidgetError> {
    let window = web_sys::window()
        .ok_or_else(|| WidgetError::ComponentLoad("no window".to_string()))?;
    let registry = window.custom_elements();
    if !registry.get(CHATKIT_ELEMENT_NAME).is_undefined() {
        return Ok(());
    }

    load_script_once(document, CHATKIT_SCRIPT_URL).await?;

    let defined = registry
        .when_defined(CHATKIT_ELEMENT_NAME)
        .map_err(component_error)?;
    JsFuture::from(defined)
        .await
        .map_err(component_error)?;
    Ok(())
}

/// Injects a deferred script tag for `src`, skipping injection when an
/// identical tag already exists.
async fn load_script_once(document: &Document, src: &str) -> Result<(), WidgetError> {
    let selector = format!("script[src=\"{src}\"]");
    if document
        .query_selector(&selector)
        .map_err(component_error)?
        .is_some()
    {
        return Ok(());
    }

    let script: HtmlScriptElement = document
        .create_element("script")
        .map_err(component_error)?
        .unchecked_into();
    script.set_src(src);
    script.set_defer(true);

    let loaded = Promise::new(&mut |resolve: Function, reject: Function| {
        let onload = Closure::once_into_js(move || {
            let _ = resolve.call0(&JsValue::NULL);
        });
        script.set_onload(Some(onload.unchecked_ref()));

        let failed_src = src.to_string();
        let onerror = Closure::once_into_js(move |_event: JsValue| {
            let _ = reject.call1(
                &JsValue::NULL,
                &JsValue::from_str(&format!("Failed to load {failed_src}")),
            );
        });
        script.set_onerror(Some(onerror.unchecked_ref()));
    });

    let head = document
        .head()
        .ok_or_else(|| WidgetError::ComponentLoad("document has no head".to_string()))?;
    head.append_child(&script).map_err(component_error)?;

    JsFuture::from(loaded).await.map_err(component_error)?;
    Ok(())
}

/// `api.getClientSecret(existing)`: an existing credential is handed back
/// unchanged, otherwise a session is negotiated against the backend.
fn credential_provider(backend: String) -> Closure<dyn FnMut(JsValue) -> Promise> {
    Closure::wrap(Box::new(move |existing: JsValue| -> Promise {
        let backend = backend.clone();
        future_to_promise(async move {
            let existing = existing.as_string().filter(|secret| !secret.is_empty());
            let transport = FetchSessionTransport::new(&backend);
            match resolve_credential(existing, &transport, &LocalStorageDeviceIdStore).await {
                Ok(secret) => Ok(JsValue::from_str(&secret)),
                Err(error) => Err(JsValue::from_str(&error.to_string())),
            }
        })
    }) as Box<dyn FnMut(JsValue) -> Promise>)
}

/// Serializes the passthrough payload and grafts the `api` capability
/// object onto it.
fn build_options(
    credential_provider: &Closure<dyn FnMut(JsValue) -> Promise>,
) -> Result<JsValue, WidgetError> {
    let options = serde_wasm_bindgen::to_value(&ChatKitOptions::default())
        .map_err(|error| WidgetError::ComponentLoad(error.to_string()))?;

    let api = js_sys::Object::new();
    Reflect::set(&api, &"getClientSecret".into(), credential_provider.as_ref())
        .map_err(component_error)?;
    Reflect::set(&options, &"api".into(), &api).map_err(component_error)?;

    Ok(options)
}

fn component_error(value: JsValue) -> WidgetError {
    WidgetError::ComponentLoad(js_message(&value))
}
