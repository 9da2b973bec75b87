use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::Mode;

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    ScrollPageDown,
    ScrollPageUp,
    JumpToTop,
    JumpToBottom,
    PendingG, // First 'g' press, waiting for second 'g'
    JumpToInquiry,
    ToggleVariant,
    ToggleHelp,
    /// Pointer over a cell of the page area (column, row)
    PointerMove(u16, u16),
    Click(u16, u16),
    WheelDown,
    WheelUp,
    ExitMode,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, mode: Mode, pending_key: Option<char>) -> Action {
    if mode == Mode::Help {
        // Any key closes help
        return match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
            _ => Action::ExitMode,
        };
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::ExitMode,

        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Action::ScrollUp,
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::ScrollHalfPageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ScrollHalfPageUp,
        (KeyCode::Char('f'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) | (KeyCode::Char(' '), _) => {
            Action::ScrollPageDown
        }
        (KeyCode::Char('b'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => Action::ScrollPageUp,

        (KeyCode::Char('g'), KeyModifiers::NONE) => {
            if pending_key == Some('g') {
                Action::JumpToTop
            } else {
                Action::PendingG
            }
        }
        (KeyCode::Home, _) => Action::JumpToTop,
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::JumpToBottom,

        (KeyCode::Char('i'), KeyModifiers::NONE) => Action::JumpToInquiry,
        (KeyCode::Char('v'), KeyModifiers::NONE) => Action::ToggleVariant,
        (KeyCode::Char('?'), _) => Action::ToggleHelp,

        _ => Action::None,
    }
}

/// Map a mouse event to an action; rows at or below `page_rows` are chrome
pub fn handle_mouse_event(mouse: MouseEvent, page_rows: u16) -> Action {
    if mouse.row >= page_rows {
        return Action::None;
    }
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Action::PointerMove(mouse.column, mouse.row),
        MouseEventKind::Down(MouseButton::Left) => Action::Click(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => Action::WheelDown,
        MouseEventKind::ScrollUp => Action::WheelUp,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_gg_jumps_to_top() {
        assert_eq!(handle_key_event(key(KeyCode::Char('g')), Mode::Normal, None), Action::PendingG);
        assert_eq!(
            handle_key_event(key(KeyCode::Char('g')), Mode::Normal, Some('g')),
            Action::JumpToTop
        );
    }

    #[test]
    fn test_help_swallows_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Char('j')), Mode::Help, None), Action::ExitMode);
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Mode::Help, None),
            Action::Quit
        );
    }

    #[test]
    fn test_mouse_over_status_bar_is_ignored() {
        let mouse = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 3,
            row: 24,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(handle_mouse_event(mouse, 24), Action::None);
        assert_eq!(handle_mouse_event(MouseEvent { row: 5, ..mouse }, 24), Action::PointerMove(3, 5));
    }
}
