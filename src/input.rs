use crate::math::Direction;
use crate::state::Toggle;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Something the user asked the animation to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle(Toggle),
    /// Single manual step, which also stops automatic play
    Nudge(Direction),
    /// Swap the light and dark color schemes
    FlipScheme,
    Quit,
}

/// Maps a key press to a command. Unbound keys yield `None`.
pub fn map_key(event: KeyEvent) -> Option<Command> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }
        KeyCode::Char(c) => match c {
            'c' => Some(Command::Toggle(Toggle::Cos)),
            's' => Some(Command::Toggle(Toggle::Sin)),
            'l' => Some(Command::Toggle(Toggle::Lines)),
            'p' => Some(Command::Toggle(Toggle::Circle)),
            'e' => Some(Command::Toggle(Toggle::Edges)),
            'n' => Some(Command::Toggle(Toggle::Numbers)),
            'a' | ' ' => Some(Command::Toggle(Toggle::Auto)),
            'r' => Some(Command::Toggle(Toggle::Reverse)),
            't' => Some(Command::FlipScheme),
            'q' => Some(Command::Quit),
            _ => None,
        },
        KeyCode::Right => Some(Command::Nudge(Direction::Forward)),
        KeyCode::Left => Some(Command::Nudge(Direction::Backward)),
        KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}
