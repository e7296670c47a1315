use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    Closed,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MountStatus {
    Idle,
    Mounting,
    Mounted,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetState {
    pub panel: PanelState,
    pub mount: MountStatus,
    /// Advances on every open transition; mount outcomes carrying an older
    /// generation were superseded by a close + reopen and are discarded.
    pub mount_generation: u64,
    pub last_error: Option<String>,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            panel: PanelState::Closed,
            mount: MountStatus::Idle,
            mount_generation: 0,
            last_error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetAction {
    OpenRequested,
    CloseRequested,
    MountCompleted { generation: u64 },
    MountFailed { generation: u64, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReducerResult {
    /// Generation of the mount the shell should start, when an open
    /// transition requested one.
    pub mount_requested: Option<u64>,
}

pub fn apply_action(state: &mut WidgetState, action: WidgetAction) -> ReducerResult {
    match action {
        WidgetAction::OpenRequested => {
            // Every open performs a fresh mount regardless of prior state.
            state.panel = PanelState::Open;
            state.mount_generation = state.mount_generation.saturating_add(1);
            state.mount = MountStatus::Mounting;
            state.last_error = None;
            ReducerResult {
                mount_requested: Some(state.mount_generation),
            }
        }
        WidgetAction::CloseRequested => {
            // Hiding the panel tears nothing down; an in-flight mount keeps
            // its generation and may still land in the hidden panel.
            state.panel = PanelState::Closed;
            ReducerResult::default()
        }
        WidgetAction::MountCompleted { generation } => {
            if generation == state.mount_generation {
                state.mount = MountStatus::Mounted;
            }
            ReducerResult::default()
        }
        WidgetAction::MountFailed {
            generation,
            message,
        } => {
            // The panel intentionally stays open after a failed mount.
            if generation == state.mount_generation {
                state.mount = MountStatus::Failed {
                    message: message.clone(),
                };
                state.last_error = Some(message);
            }
            ReducerResult::default()
        }
    }
}
