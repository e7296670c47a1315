use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "ZAAI";
pub const DEFAULT_ICON: &str = "💬";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing data-backend on script tag.")]
    MissingBackend,
}

/// Raw host-supplied options, before validation. This is what the
/// programmatic `init(options)` entry point deserializes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetOptions {
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Validated widget configuration, read exactly once before first render
/// and immutable for the page's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Backend base URL, kept verbatim. No trailing-slash normalization.
    pub backend: String,
    pub title: String,
    pub icon: String,
}

impl WidgetConfig {
    /// Applies defaults for an absent or empty title/icon and rejects an
    /// absent or empty backend.
    pub fn from_parts(
        backend: Option<String>,
        title: Option<String>,
        icon: Option<String>,
    ) -> Result<Self, ConfigError> {
        let backend = backend
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingBackend)?;
        Ok(Self {
            backend,
            title: non_empty_or(title, DEFAULT_TITLE),
            icon: non_empty_or(icon, DEFAULT_ICON),
        })
    }
}

impl TryFrom<WidgetOptions> for WidgetConfig {
    type Error = ConfigError;

    fn try_from(options: WidgetOptions) -> Result<Self, Self::Error> {
        Self::from_parts(options.backend, options.title, options.icon)
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}
