use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Activate,
    NextCard,
    PrevCard,
    AddCard,
    StartDrag,
    StartResize,
    EditCard,
    ShowDetail,
    TogglePan,
    ZoomIn,
    ZoomOut,
    Quit,
    ToggleHelp,
    SubmitText,
    Cancel,
    Backspace,
    Delete,
    Home,
    End,
    Newline,
    ClearText,
    InputChar(char),
    Noop,
}

pub fn action_for_key(key: KeyEvent, text_mode: bool) -> Action {
    if text_mode {
        return match key.code {
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => Action::Newline,
            KeyCode::Enter => Action::SubmitText,
            KeyCode::Esc => Action::Cancel,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Delete => Action::Delete,
            KeyCode::Left => Action::Move(Direction::Left),
            KeyCode::Right => Action::Move(Direction::Right),
            KeyCode::Home => Action::Home,
            KeyCode::End => Action::End,
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Action::ClearText
            }
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Noop,
            KeyCode::Char(c) => Action::InputChar(c),
            _ => Action::Noop,
        };
    }

    match key.code {
        KeyCode::Up => Action::Move(Direction::Up),
        KeyCode::Down => Action::Move(Direction::Down),
        KeyCode::Left => Action::Move(Direction::Left),
        KeyCode::Right => Action::Move(Direction::Right),
        KeyCode::Enter => Action::Activate,
        KeyCode::Tab => Action::NextCard,
        KeyCode::BackTab => Action::PrevCard,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Backspace => Action::Cancel,
        KeyCode::Char('+') => Action::ZoomIn,
        KeyCode::Char('=') if key.modifiers.contains(KeyModifiers::SHIFT) => Action::ZoomIn,
        KeyCode::Char('-') => Action::ZoomOut,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('h') => Action::Move(Direction::Left),
        KeyCode::Char('j') => Action::Move(Direction::Down),
        KeyCode::Char('k') => Action::Move(Direction::Up),
        KeyCode::Char('l') => Action::Move(Direction::Right),
        KeyCode::Char('a') | KeyCode::Char('n') => Action::AddCard,
        KeyCode::Char('m') => Action::StartDrag,
        KeyCode::Char('r') => Action::StartResize,
        KeyCode::Char('e') => Action::EditCard,
        KeyCode::Char('o') | KeyCode::Char(' ') => Action::ShowDetail,
        KeyCode::Char('p') => Action::TogglePan,
        _ => Action::Noop,
    }
}
