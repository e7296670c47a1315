//! Passthrough payload for the vendor chat component. None of this is
//! interpreted locally; it is serialized and handed to `setOptions`.

use serde::{Deserialize, Serialize};

/// Custom-element name the vendor script registers.
pub const CHATKIT_ELEMENT_NAME: &str = "openai-chatkit";

pub const CHATKIT_SCRIPT_URL: &str =
    "https://cdn.platform.openai.com/deployments/chatkit/chatkit.js";

const FONT_FAMILY: &str = "\"OpenAI Sans\", system-ui, -apple-system, BlinkMacSystemFont, \
     \"Segoe UI\", Roboto, Helvetica, Arial, sans-serif";
const FONT_BASE_URL: &str = "https://cdn.openai.com/common/fonts/openai-sans/v2";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatKitOptions {
    pub theme: Theme,
    pub composer: Composer,
    pub start_screen: StartScreen,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub color_scheme: String,
    pub radius: String,
    pub density: String,
    pub color: ThemeColor,
    pub typography: Typography,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            color_scheme: "light".to_string(),
            radius: "pill".to_string(),
            density: "normal".to_string(),
            color: ThemeColor::default(),
            typography: Typography::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColor {
    pub accent: AccentColor,
    pub surface: SurfaceColor,
}

impl Default for ThemeColor {
    fn default() -> Self {
        Self {
            accent: AccentColor {
                primary: "#9F80DA".to_string(),
                level: 1,
            },
            surface: SurfaceColor {
                background: "#ffffff".to_string(),
                foreground: "#0B0B0F".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccentColor {
    pub primary: String,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceColor {
    pub background: String,
    pub foreground: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub base_size: u32,
    pub font_family: String,
    pub font_sources: Vec<FontSource>,
}

impl Default for Typography {
    fn default() -> Self {
        let weights = [
            (400, "Regular"),
            (500, "Medium"),
            (600, "Semibold"),
            (700, "Bold"),
        ];
        Self {
            base_size: 16,
            font_family: FONT_FAMILY.to_string(),
            font_sources: weights
                .into_iter()
                .map(|(weight, file)| FontSource {
                    family: "OpenAI Sans".to_string(),
                    src: format!("{FONT_BASE_URL}/OpenAISans-{file}.woff2"),
                    weight,
                    style: "normal".to_string(),
                    display: "swap".to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSource {
    pub family: String,
    pub src: String,
    pub weight: u16,
    pub style: String,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composer {
    pub placeholder: String,
    pub attachments: Attachments,
}

impl Default for Composer {
    fn default() -> Self {
        Self {
            placeholder: "Skriv ett meddelande till ZAAI…".to_string(),
            attachments: Attachments { enabled: false },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachments {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartScreen {
    pub greeting: String,
    pub prompts: Vec<String>,
}

impl Default for StartScreen {
    fn default() -> Self {
        Self {
            greeting: "Chatta med oss! 👋".to_string(),
            prompts: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_payload_uses_vendor_field_names() {
        let value =
            serde_json::to_value(ChatKitOptions::default()).expect("payload serializes");

        assert_eq!(value["theme"]["colorScheme"], "light");
        assert_eq!(value["theme"]["color"]["accent"]["primary"], "#9F80DA");
        assert_eq!(value["theme"]["typography"]["baseSize"], 16);
        assert_eq!(
            value["theme"]["typography"]["fontSources"]
                .as_array()
                .expect("font sources")
                .len(),
            4
        );
        assert_eq!(value["composer"]["attachments"]["enabled"], false);
        assert_eq!(value["startScreen"]["greeting"], "Chatta med oss! 👋");
        assert!(value["startScreen"]["prompts"].as_array().expect("prompts").is_empty());
    }
}
