//! Terminal key events to tokens.
//!
//! Tokens name physical keys, so shifted characters are folded back onto
//! the key that produces them on a US layout (`'D'` is Shift+D, `'$'` is
//! Shift+4). Keys with no token translate to `None`, which the dispatcher
//! passes through.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};

use crate::token::{Modifiers, Token};

/// Translate a crossterm key event to a token and its held modifiers.
pub fn translate(event: &KeyEvent) -> Option<(Token, Modifiers)> {
    let mut modifiers = translate_modifiers(event.modifiers);

    let token = match event.code {
        KeyCode::Char(c) => {
            let (token, shifted) = translate_char(c)?;
            if shifted {
                modifiers |= Modifiers::SHIFT;
            }
            token
        }
        KeyCode::Esc => Token::Escape,
        KeyCode::Enter => Token::Return,
        KeyCode::Tab => Token::Tab,
        KeyCode::BackTab => {
            modifiers |= Modifiers::SHIFT;
            Token::Tab
        }
        KeyCode::Backspace => Token::Backspace,
        KeyCode::Delete => Token::Delete,
        KeyCode::Left => Token::Left,
        KeyCode::Right => Token::Right,
        KeyCode::Up => Token::Up,
        KeyCode::Down => Token::Down,
        KeyCode::Modifier(code) => translate_modifier_key(code)?,
        _ => return None,
    };

    Some((token, modifiers))
}

fn translate_modifiers(modifiers: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    if modifiers.contains(KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if modifiers.contains(KeyModifiers::CONTROL) {
        out |= Modifiers::CONTROL;
    }
    if modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META) {
        out |= Modifiers::COMMAND;
    }
    if modifiers.contains(KeyModifiers::ALT) {
        out |= Modifiers::OPTION;
    }
    out
}

/// Returns the key token and whether producing `c` needs Shift.
fn translate_char(c: char) -> Option<(Token, bool)> {
    let shifted_digit = match c {
        ')' => Some(Token::Num0),
        '!' => Some(Token::Num1),
        '@' => Some(Token::Num2),
        '#' => Some(Token::Num3),
        '$' => Some(Token::Num4),
        '%' => Some(Token::Num5),
        '^' => Some(Token::Num6),
        '&' => Some(Token::Num7),
        '*' => Some(Token::Num8),
        '(' => Some(Token::Num9),
        _ => None,
    };
    if let Some(token) = shifted_digit {
        return Some((token, true));
    }

    Token::from_char(c).map(|token| (token, c.is_ascii_uppercase()))
}

fn translate_modifier_key(code: ModifierKeyCode) -> Option<Token> {
    match code {
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => Some(Token::Shift),
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => Some(Token::Control),
        ModifierKeyCode::LeftSuper
        | ModifierKeyCode::RightSuper
        | ModifierKeyCode::LeftMeta
        | ModifierKeyCode::RightMeta => Some(Token::Command),
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => Some(Token::Option),
        _ => None,
    }
}
