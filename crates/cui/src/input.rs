use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    NextFocus,
    PrevFocus,
    MoveUp,
    MoveDown,
    Activate,
    Cancel,
    AddPlayer,
    RemovePlayer,
    TogglePlayer,
    FilterMethods,
    StartRound,
    StopRound,
    SaveRoster,
    LoadRoster,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Esc => InputAction::Cancel,
        KeyCode::Tab => InputAction::NextFocus,
        KeyCode::BackTab => InputAction::PrevFocus,
        KeyCode::Up => InputAction::MoveUp,
        KeyCode::Down => InputAction::MoveDown,
        KeyCode::Enter => InputAction::Activate,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('k') => InputAction::MoveUp,
        KeyCode::Char('j') => InputAction::MoveDown,
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            InputAction::SaveRoster
        }
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            InputAction::LoadRoster
        }
        KeyCode::Char('a') => InputAction::AddPlayer,
        KeyCode::Char('x') => InputAction::RemovePlayer,
        KeyCode::Char('e') => InputAction::TogglePlayer,
        KeyCode::Char('/') => InputAction::FilterMethods,
        KeyCode::Char('g') => InputAction::StartRound,
        KeyCode::Char('c') => InputAction::StopRound,
        KeyCode::Char('S') => InputAction::SaveRoster,
        KeyCode::Char('L') => InputAction::LoadRoster,
        _ => InputAction::None,
    }
}
