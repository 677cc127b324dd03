use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the app does with a key before the focused widget sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Save,
    Quit,
    NextField,
    PrevField,
    /// Offer the key to the focused widget first.
    Edit(KeyEvent),
}

pub fn classify(key: &KeyEvent) -> KeyCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') => return KeyCommand::Save,
            KeyCode::Char('q') | KeyCode::Char('Q') => return KeyCommand::Quit,
            KeyCode::Char('c') | KeyCode::Char('C') => return KeyCommand::Quit,
            _ => {}
        }
    }

    match key.code {
        KeyCode::Tab => KeyCommand::NextField,
        KeyCode::BackTab => KeyCommand::PrevField,
        _ => KeyCommand::Edit(*key),
    }
}

/// Fallback for keys the focused widget left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unhandled {
    NextField,
    PrevField,
    ResetStatus,
    Nothing,
}

pub fn fallback(key: &KeyEvent) -> Unhandled {
    match key.code {
        KeyCode::Down => Unhandled::NextField,
        KeyCode::Up => Unhandled::PrevField,
        KeyCode::Esc => Unhandled::ResetStatus,
        _ => Unhandled::Nothing,
    }
}
