//! Browser embed shell for the ZAAI chat widget.
//!
//! Compiled to `wasm32-unknown-unknown`. Everything DOM-, fetch-, and
//! storage-shaped lives here, driving the platform-neutral logic in
//! `zaai-widget-core`. The widget boots from the embedding script tag's
//! `data-*` attributes, or programmatically through [`init`].

mod chatkit;
mod dom;
mod network;
mod storage;

use std::cell::RefCell;

use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, HtmlScriptElement, KeyboardEvent};

use zaai_widget_core::{
    ConfigError, WidgetAction, WidgetConfig, WidgetOptions, WidgetState, apply_action,
};

const CONSOLE_PREFIX: &str = "[ZAAI]";

thread_local! {
    static WIDGET: RefCell<Option<Widget>> = const { RefCell::new(None) };
}

struct Widget {
    config: WidgetConfig,
    state: WidgetState,
    panel: HtmlElement,
    mount: HtmlElement,
    // Kept alive for the widget's lifetime; dropping them would detach the
    // DOM listeners.
    _bubble_click: Closure<dyn FnMut()>,
    _bubble_keydown: Closure<dyn FnMut(KeyboardEvent)>,
    _close_click: Closure<dyn FnMut()>,
    /// Credential callback of the currently mounted instance; replaced on
    /// every remount, kept alive like the listeners above.
    _credential_provider: Option<Closure<dyn FnMut(JsValue) -> Promise>>,
}

impl Widget {
    fn toggle(&mut self) {
        if dom::is_panel_visible(&self.panel) {
            self.close();
        } else {
            self.open();
        }
    }

    fn open(&mut self) {
        let result = apply_action(&mut self.state, WidgetAction::OpenRequested);
        let _ = dom::set_panel_visible(&self.panel, true);
        if let Some(generation) = result.mount_requested {
            wasm_bindgen_futures::spawn_local(run_mount(
                generation,
                self.config.clone(),
                self.mount.clone(),
            ));
        }
    }

    fn close(&mut self) {
        let _ = apply_action(&mut self.state, WidgetAction::CloseRequested);
        let _ = dom::set_panel_visible(&self.panel, false);
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    boot_from_script_tag();
}

/// Programmatic entry point: `init({ backend, title?, icon? })`.
///
/// A missing backend is fatal and silent, matching the script-tag path:
/// one diagnostic log entry, no DOM insertion, no exception.
#[wasm_bindgen]
pub fn init(options: JsValue) {
    let options: WidgetOptions = match serde_wasm_bindgen::from_value(options) {
        Ok(options) => options,
        Err(error) => {
            console_error(&format!("init options rejected: {error}"));
            return;
        }
    };
    match WidgetConfig::try_from(options) {
        Ok(config) => {
            if let Some(document) = web_sys::window().and_then(|window| window.document()) {
                mount_when_ready(document, config);
            }
        }
        Err(error) => console_error(&error.to_string()),
    }
}

/// Serialized panel state machine, for host-page debugging.
#[wasm_bindgen]
pub fn widget_state_json() -> String {
    WIDGET.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|widget| {
                serde_json::to_string(&widget.state).unwrap_or_else(|_| "{}".to_string())
            })
            .unwrap_or_else(|| "{}".to_string())
    })
}

fn boot_from_script_tag() {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    match config_from_embed_script(&document) {
        Ok(config) => mount_when_ready(document, config),
        Err(error) => console_error(&error.to_string()),
    }
}

/// Reads `data-backend`/`data-title`/`data-icon` from the embedding script
/// tag. Module scripts lose `document.currentScript`, so the first tag
/// carrying the backend attribute is the fallback.
fn config_from_embed_script(document: &Document) -> Result<WidgetConfig, ConfigError> {
    let script = document
        .current_script()
        .and_then(|element| element.dyn_into::<HtmlScriptElement>().ok())
        .or_else(|| {
            document
                .query_selector("script[data-backend]")
                .ok()
                .flatten()
                .and_then(|element| element.dyn_into::<HtmlScriptElement>().ok())
        });
    config_from_script(script.as_ref())
}

fn config_from_script(script: Option<&HtmlScriptElement>) -> Result<WidgetConfig, ConfigError> {
    let dataset = script.map(|script| script.dataset());
    let read = |key: &str| dataset.as_ref().and_then(|dataset| dataset.get(key));
    WidgetConfig::from_parts(read("backend"), read("title"), read("icon"))
}

fn mount_when_ready(document: Document, config: WidgetConfig) {
    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(move || {
            if let Some(document) = web_sys::window().and_then(|window| window.document()) {
                if let Err(error) = mount_widget(&document, config) {
                    console_error(&format!(
                        "widget mount failed: {}",
                        network::js_message(&error)
                    ));
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref());
    } else if let Err(error) = mount_widget(&document, config) {
        console_error(&format!(
            "widget mount failed: {}",
            network::js_message(&error)
        ));
    }
}

/// Injects styles, renders the bubble + hidden panel pair, and wires the
/// toggle handlers. Clicking or activating the bubble with Enter/Space
/// drives the same transition.
fn mount_widget(document: &Document, config: WidgetConfig) -> Result<(), JsValue> {
    dom::inject_styles(document)?;

    let bubble = dom::build_bubble(document, &config.icon)?;
    let parts = dom::build_panel(document, &config.title)?;

    let close_click = Closure::wrap(Box::new(|| {
        with_widget(Widget::close);
    }) as Box<dyn FnMut()>);
    parts
        .close
        .add_event_listener_with_callback("click", close_click.as_ref().unchecked_ref())?;

    let bubble_click = Closure::wrap(Box::new(|| {
        with_widget(Widget::toggle);
    }) as Box<dyn FnMut()>);
    bubble.add_event_listener_with_callback("click", bubble_click.as_ref().unchecked_ref())?;

    let bubble_keydown = Closure::wrap(Box::new(|event: KeyboardEvent| {
        if is_activation_key(&event.key()) {
            with_widget(Widget::toggle);
        }
    }) as Box<dyn FnMut(KeyboardEvent)>);
    bubble
        .add_event_listener_with_callback("keydown", bubble_keydown.as_ref().unchecked_ref())?;

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    body.append_child(&parts.panel)?;
    body.append_child(&bubble)?;

    WIDGET.with(|slot| {
        *slot.borrow_mut() = Some(Widget {
            config,
            state: WidgetState::default(),
            panel: parts.panel,
            mount: parts.mount,
            _bubble_click: bubble_click,
            _bubble_keydown: bubble_keydown,
            _close_click: close_click,
            _credential_provider: None,
        });
    });

    console_log("Widget mounted");
    Ok(())
}

fn is_activation_key(key: &str) -> bool {
    key == "Enter" || key == " "
}

/// One open transition's asynchronous tail: clear the mount area, prepare
/// a fresh component instance, and attach it unless a reopen superseded
/// this generation. Failures surface as a blocking alert plus one console
/// diagnostic; the panel stays open and unmounted.
async fn run_mount(generation: u64, config: WidgetConfig, mount: HtmlElement) {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };

    dom::clear_mount_area(&mount);

    let outcome = chatkit::prepare_chatkit(&document, &config).await;

    let mut surfaced = None;
    with_widget(|widget| match outcome {
        Ok(instance) => {
            if widget.state.mount_generation != generation {
                return;
            }
            match instance.attach(&mount) {
                Ok(()) => {
                    let _ = apply_action(
                        &mut widget.state,
                        WidgetAction::MountCompleted { generation },
                    );
                    widget._credential_provider = Some(instance.into_credential_provider());
                }
                Err(error) => {
                    let message = network::js_message(&error);
                    let _ = apply_action(
                        &mut widget.state,
                        WidgetAction::MountFailed {
                            generation,
                            message: message.clone(),
                        },
                    );
                    surfaced = Some(message);
                }
            }
        }
        Err(error) => {
            let message = error.to_string();
            if widget.state.mount_generation == generation {
                surfaced = Some(message.clone());
            }
            let _ = apply_action(
                &mut widget.state,
                WidgetAction::MountFailed {
                    generation,
                    message,
                },
            );
        }
    });

    if let Some(message) = surfaced {
        console_error(&format!("ChatKit mount error: {message}"));
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(&message);
        }
    }
}

fn with_widget(f: impl FnOnce(&mut Widget)) {
    WIDGET.with(|slot| {
        if let Some(widget) = slot.borrow_mut().as_mut() {
            f(widget);
        }
    });
}

fn console_log(message: &str) {
    web_sys::console::log_1(&format!("{CONSOLE_PREFIX} {message}").into());
}

fn console_error(message: &str) {
    web_sys::console::error_1(&format!("{CONSOLE_PREFIX} {message}").into());
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        web_sys::window()
            .expect("window")
            .document()
            .expect("document")
    }

    fn embed_script(attributes: &[(&str, &str)]) -> HtmlScriptElement {
        let script: HtmlScriptElement = document()
            .create_element("script")
            .expect("script element")
            .unchecked_into();
        for (name, value) in attributes {
            script.set_attribute(name, value).expect("attribute set");
        }
        script
    }

    #[wasm_bindgen_test]
    fn script_dataset_maps_to_config() {
        let script = embed_script(&[
            ("data-backend", "https://api.zaai.se"),
            ("data-title", "Support"),
            ("data-icon", "✨"),
        ]);
        let config = config_from_script(Some(&script)).expect("valid config");
        assert_eq!(config.backend, "https://api.zaai.se");
        assert_eq!(config.title, "Support");
        assert_eq!(config.icon, "✨");
    }

    #[wasm_bindgen_test]
    fn script_without_backend_is_rejected() {
        let script = embed_script(&[("data-title", "Support")]);
        let error = config_from_script(Some(&script)).expect_err("expected error");
        assert_eq!(error, ConfigError::MissingBackend);
    }

    #[wasm_bindgen_test]
    fn missing_script_is_rejected() {
        let error = config_from_script(None).expect_err("expected error");
        assert_eq!(error, ConfigError::MissingBackend);
    }

    #[wasm_bindgen_test]
    fn enter_and_space_activate_the_bubble() {
        assert!(is_activation_key("Enter"));
        assert!(is_activation_key(" "));
        assert!(!is_activation_key("Escape"));
        assert!(!is_activation_key("a"));
    }
}
