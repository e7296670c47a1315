//! Bubble and panel construction. Class names and geometry follow the
//! shipped embed stylesheet.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

/// Stacking order for both fixed elements, above anything a site builder
/// is likely to render.
const STACKING_ORDER: u32 = 2_147_483_000;

pub(crate) const BUBBLE_CLASS: &str = "zaai-bubble";
pub(crate) const PANEL_CLASS: &str = "zaai-panel";
const HEADER_CLASS: &str = "zaai-header";
const TITLE_CLASS: &str = "zaai-title";
const CLOSE_CLASS: &str = "zaai-close";
const MOUNT_CLASS: &str = "zaai-mount";

const BUBBLE_LABEL: &str = "Öppna chat";
const CLOSE_LABEL: &str = "Stäng";

/// Appends the widget's scoped style block to `<head>`. Runs once per
/// widget mount; there is no double-injection guard.
pub(crate) fn inject_styles(document: &Document) -> Result<(), JsValue> {
    let css = format!(
        "
      .{BUBBLE_CLASS}{{position:fixed;right:20px;bottom:20px;width:56px;height:56px;border-radius:999px;
        background:#fff;border:1px solid #e9e9e9;box-shadow:0 10px 30px rgba(0,0,0,.2);
        display:flex;align-items:center;justify-content:center;cursor:pointer;z-index:{STACKING_ORDER};
        font:800 24px system-ui;user-select:none}}
      .{PANEL_CLASS}{{position:fixed;right:20px;bottom:90px;width:380px;max-width:calc(100vw - 40px);
        height:560px;max-height:calc(100vh - 140px);background:#fff;border:1px solid #e9e9e9;
        border-radius:16px;box-shadow:0 20px 60px rgba(0,0,0,.25);z-index:{STACKING_ORDER};
        display:none;overflow:hidden;flex-direction:column}}
      .{HEADER_CLASS}{{display:flex;justify-content:space-between;align-items:center;padding:10px 12px;border-bottom:1px solid #eee}}
      .{TITLE_CLASS}{{font:800 14px system-ui;color:#111}}
      .{CLOSE_CLASS}{{border:none;background:transparent;cursor:pointer;font:900 18px system-ui;line-height:1;color:#111}}
      .{MOUNT_CLASS}{{flex:1}}
    "
    );

    let style = document.create_element("style")?;
    style.set_text_content(Some(&css));
    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no head"))?;
    head.append_child(&style)?;
    Ok(())
}

/// The always-visible circular trigger. Focusable and exposed as a button
/// so keyboard activation works.
pub(crate) fn build_bubble(document: &Document, icon: &str) -> Result<HtmlElement, JsValue> {
    let bubble: HtmlElement = document.create_element("div")?.dyn_into()?;
    bubble.set_class_name(BUBBLE_CLASS);
    bubble.set_attribute("role", "button")?;
    bubble.set_attribute("tabindex", "0")?;
    bubble.set_attribute("aria-label", BUBBLE_LABEL)?;
    bubble.set_text_content(Some(icon));
    Ok(bubble)
}

pub(crate) struct PanelParts {
    pub(crate) panel: HtmlElement,
    pub(crate) mount: HtmlElement,
    pub(crate) close: HtmlElement,
}

/// The collapsible container: header with title and close button above
/// the chat mount area. Hidden until the first open.
pub(crate) fn build_panel(document: &Document, title: &str) -> Result<PanelParts, JsValue> {
    let panel: HtmlElement = document.create_element("div")?.dyn_into()?;
    panel.set_class_name(PANEL_CLASS);

    let header: HtmlElement = document.create_element("div")?.dyn_into()?;
    header.set_class_name(HEADER_CLASS);

    let title_el: HtmlElement = document.create_element("div")?.dyn_into()?;
    title_el.set_class_name(TITLE_CLASS);
    title_el.set_text_content(Some(title));

    let close: HtmlElement = document.create_element("button")?.dyn_into()?;
    close.set_class_name(CLOSE_CLASS);
    close.set_attribute("aria-label", CLOSE_LABEL)?;
    close.set_text_content(Some("×"));

    header.append_child(&title_el)?;
    header.append_child(&close)?;

    let mount: HtmlElement = document.create_element("div")?.dyn_into()?;
    mount.set_class_name(MOUNT_CLASS);

    panel.append_child(&header)?;
    panel.append_child(&mount)?;

    Ok(PanelParts {
        panel,
        mount,
        close,
    })
}

/// Visibility is tracked on the inline style, matching the stylesheet's
/// `display:none` default.
pub(crate) fn is_panel_visible(panel: &HtmlElement) -> bool {
    panel
        .style()
        .get_property_value("display")
        .is_ok_and(|display| display == "flex")
}

pub(crate) fn set_panel_visible(panel: &HtmlElement, visible: bool) -> Result<(), JsValue> {
    let display = if visible { "flex" } else { "none" };
    panel.style().set_property("display", display)
}

pub(crate) fn clear_mount_area(mount: &HtmlElement) {
    mount.set_inner_html("");
}
