use super::ViewState;
use crate::controller::{Input, Phase};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents the result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Keep the current file
    Keep,
    /// Delete the current file
    Delete,
    /// Skip the current file
    Skip,
    /// Confirm delete action
    ConfirmDelete,
    /// Cancel delete action
    CancelDelete,
    /// Toggle help overlay
    Help,
    /// No action
    None,
}

/// Maps keyboard events to actions
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q, Esc or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('Q'), KeyModifiers::SHIFT) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        // Keep: k or Right arrow
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Keep,
        (KeyCode::Char('K'), KeyModifiers::SHIFT) => KeyAction::Keep,
        (KeyCode::Right, KeyModifiers::NONE) => KeyAction::Keep,

        // Delete: d or Left arrow
        (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::Delete,
        (KeyCode::Char('D'), KeyModifiers::SHIFT) => KeyAction::Delete,
        (KeyCode::Left, KeyModifiers::NONE) => KeyAction::Delete,

        // Skip: s or Down arrow
        (KeyCode::Char('s'), KeyModifiers::NONE) => KeyAction::Skip,
        (KeyCode::Char('S'), KeyModifiers::SHIFT) => KeyAction::Skip,
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Skip,

        // Help: ?
        (KeyCode::Char('?'), _) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events to confirmation actions.
/// Used while the delete confirmation overlay is open.
pub fn handle_confirm_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Confirm: y or Enter
        (KeyCode::Char('y'), KeyModifiers::NONE) => KeyAction::ConfirmDelete,
        (KeyCode::Char('Y'), _) => KeyAction::ConfirmDelete,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::ConfirmDelete,

        // Cancel: n or Esc
        (KeyCode::Char('n'), KeyModifiers::NONE) => KeyAction::CancelDelete,
        (KeyCode::Char('N'), _) => KeyAction::CancelDelete,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::CancelDelete,

        // Quit still works from the dialog
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,

        _ => KeyAction::None,
    }
}

impl From<KeyAction> for Input {
    fn from(action: KeyAction) -> Self {
        match action {
            KeyAction::Keep => Input::Keep,
            KeyAction::Delete => Input::Delete,
            KeyAction::Skip => Input::Skip,
            KeyAction::Quit => Input::Quit,
            KeyAction::ConfirmDelete
            | KeyAction::CancelDelete
            | KeyAction::Help
            | KeyAction::None => Input::Other,
        }
    }
}

/// Where a key press ends up once the open overlay has seen it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRoute {
    /// Overlay to show next
    pub view: ViewState,
    /// Decision for the controller, if the key produced one
    pub input: Option<Input>,
}

impl KeyRoute {
    fn show(view: ViewState) -> Self {
        Self { view, input: None }
    }

    fn send(input: Input) -> Self {
        Self {
            view: ViewState::Browsing,
            input: Some(input),
        }
    }
}

/// Routes a key through the overlays.
///
/// Quit (`q` or Ctrl+C) always reaches the controller. Esc and `?` only close
/// the help overlay, and a delete waits for confirmation when `confirm_delete`
/// is set.
pub fn route_key(view: ViewState, phase: Phase, confirm_delete: bool, key: KeyEvent) -> KeyRoute {
    match view {
        ViewState::Help => match handle_key_event(key) {
            _ if key.code == KeyCode::Esc => KeyRoute::show(ViewState::Browsing),
            KeyAction::Help => KeyRoute::show(ViewState::Browsing),
            KeyAction::Quit => KeyRoute::send(Input::Quit),
            _ => KeyRoute::show(ViewState::Help),
        },
        ViewState::ConfirmDelete => match handle_confirm_input(key) {
            KeyAction::ConfirmDelete => KeyRoute::send(Input::Delete),
            KeyAction::CancelDelete => KeyRoute::show(ViewState::Browsing),
            KeyAction::Quit => KeyRoute::send(Input::Quit),
            _ => KeyRoute::show(ViewState::ConfirmDelete),
        },
        ViewState::Browsing => match handle_key_event(key) {
            KeyAction::Help if phase == Phase::FileManage => KeyRoute::show(ViewState::Help),
            KeyAction::Delete if confirm_delete && phase == Phase::FileManage => {
                KeyRoute::show(ViewState::ConfirmDelete)
            }
            action => KeyRoute::send(action.into()),
        },
    }
}
