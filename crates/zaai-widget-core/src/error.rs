use crate::config::ConfigError;
use crate::session::SessionError;

/// Everything that can surface at a panel-open attempt. The shell shows
/// the `Display` text verbatim in a blocking alert; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The vendor script or its custom-element definition failed to load.
    #[error("{0}")]
    ComponentLoad(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_failures_surface_status_and_body() {
        let error = WidgetError::from(SessionError::RequestFailed {
            status: 500,
            body: "boom".to_string(),
        });
        let message = error.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("boom"));
    }

    #[test]
    fn component_load_surfaces_the_message_unwrapped() {
        let error = WidgetError::ComponentLoad("Failed to load https://cdn.example/x.js".into());
        assert_eq!(error.to_string(), "Failed to load https://cdn.example/x.js");
    }
}
