//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Whether keystrokes go to the search box or to navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    Open,
    Back,
    OpenSearch,
    ClearSearch,
    ShowItems,
    ShowStats,
    Refresh,
    DismissNotification,
    SearchInput(char),
    SearchBackspace,
    SubmitSearch,
    CancelSearch,
}

pub fn map_key(event: KeyEvent, mode: InputMode) -> Option<Action> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match mode {
        InputMode::Search => match code {
            KeyCode::Enter => Some(Action::SubmitSearch),
            KeyCode::Esc => Some(Action::CancelSearch),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(c) => Some(Action::SearchInput(c)),
            _ => None,
        },
        InputMode::Normal => match code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('/') => Some(Action::OpenSearch),
            KeyCode::Char('c') => Some(Action::ClearSearch),
            KeyCode::Char('s') => Some(Action::ShowStats),
            KeyCode::Char('i') => Some(Action::ShowItems),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('x') => Some(Action::DismissNotification),
            KeyCode::Char('n') | KeyCode::Right => Some(Action::NextPage),
            KeyCode::Char('p') | KeyCode::Left => Some(Action::PrevPage),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
            KeyCode::Enter => Some(Action::Open),
            KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_normal_mode_bindings() {
        assert_eq!(map_key(press(KeyCode::Char('q')), InputMode::Normal), Some(Action::Quit));
        assert_eq!(map_key(press(KeyCode::Right), InputMode::Normal), Some(Action::NextPage));
        assert_eq!(map_key(press(KeyCode::Char('p')), InputMode::Normal), Some(Action::PrevPage));
        assert_eq!(map_key(press(KeyCode::Backspace), InputMode::Normal), Some(Action::Back));
    }

    #[test]
    fn test_search_mode_captures_letters() {
        assert_eq!(
            map_key(press(KeyCode::Char('q')), InputMode::Search),
            Some(Action::SearchInput('q'))
        );
        assert_eq!(map_key(press(KeyCode::Esc), InputMode::Search), Some(Action::CancelSearch));
        assert_eq!(map_key(press(KeyCode::Enter), InputMode::Search), Some(Action::SubmitSearch));
    }

    #[test]
    fn test_ctrl_c_quits_in_any_mode() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(event, InputMode::Normal), Some(Action::Quit));
        assert_eq!(map_key(event, InputMode::Search), Some(Action::Quit));
    }
}
