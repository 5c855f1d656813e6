//! Logical key tokens and the modifier set.
//!
//! A [`Token`] is a key identity after platform translation. Letters carry
//! no case: an uppercase letter is the letter plus [`Token::Shift`]. Held
//! modifiers are fed to the matcher as ordinary tokens, always in the
//! canonical order Shift, Command, Control, Option.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Digits
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    // Special keys
    Escape,
    Return,
    Tab,
    Space,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,

    // Modifiers
    Shift,
    Control,
    Command,
    Option,
}

impl Token {
    /// Returns true for the four modifier tokens.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Token::Shift | Token::Control | Token::Command | Token::Option
        )
    }

    /// Maps an ASCII letter (either case) or digit to its token.
    pub fn from_char(c: char) -> Option<Self> {
        let token = match c.to_ascii_uppercase() {
            'A' => Token::A,
            'B' => Token::B,
            'C' => Token::C,
            'D' => Token::D,
            'E' => Token::E,
            'F' => Token::F,
            'G' => Token::G,
            'H' => Token::H,
            'I' => Token::I,
            'J' => Token::J,
            'K' => Token::K,
            'L' => Token::L,
            'M' => Token::M,
            'N' => Token::N,
            'O' => Token::O,
            'P' => Token::P,
            'Q' => Token::Q,
            'R' => Token::R,
            'S' => Token::S,
            'T' => Token::T,
            'U' => Token::U,
            'V' => Token::V,
            'W' => Token::W,
            'X' => Token::X,
            'Y' => Token::Y,
            'Z' => Token::Z,
            '0' => Token::Num0,
            '1' => Token::Num1,
            '2' => Token::Num2,
            '3' => Token::Num3,
            '4' => Token::Num4,
            '5' => Token::Num5,
            '6' => Token::Num6,
            '7' => Token::Num7,
            '8' => Token::Num8,
            '9' => Token::Num9,
            ' ' => Token::Space,
            _ => return None,
        };
        Some(token)
    }

    /// The modifier flag this token stands for, if it is a modifier.
    pub fn as_modifier(&self) -> Option<Modifiers> {
        match self {
            Token::Shift => Some(Modifiers::SHIFT),
            Token::Control => Some(Modifiers::CONTROL),
            Token::Command => Some(Modifiers::COMMAND),
            Token::Option => Some(Modifiers::OPTION),
            _ => None,
        }
    }

    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            Token::A => "A",
            Token::B => "B",
            Token::C => "C",
            Token::D => "D",
            Token::E => "E",
            Token::F => "F",
            Token::G => "G",
            Token::H => "H",
            Token::I => "I",
            Token::J => "J",
            Token::K => "K",
            Token::L => "L",
            Token::M => "M",
            Token::N => "N",
            Token::O => "O",
            Token::P => "P",
            Token::Q => "Q",
            Token::R => "R",
            Token::S => "S",
            Token::T => "T",
            Token::U => "U",
            Token::V => "V",
            Token::W => "W",
            Token::X => "X",
            Token::Y => "Y",
            Token::Z => "Z",
            Token::Num0 => "0",
            Token::Num1 => "1",
            Token::Num2 => "2",
            Token::Num3 => "3",
            Token::Num4 => "4",
            Token::Num5 => "5",
            Token::Num6 => "6",
            Token::Num7 => "7",
            Token::Num8 => "8",
            Token::Num9 => "9",
            Token::Escape => "Esc",
            Token::Return => "Enter",
            Token::Tab => "Tab",
            Token::Space => "Space",
            Token::Backspace => "Backspace",
            Token::Delete => "Del",
            Token::Left => "Left",
            Token::Right => "Right",
            Token::Up => "Up",
            Token::Down => "Down",
            Token::Shift => "Shift",
            Token::Control => "Ctrl",
            Token::Command => "Cmd",
            Token::Option => "Opt",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Token {
    type Err = Error;

    /// Parse a key name like "d", "esc", "ctrl" (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();

        let token = match normalized.as_str() {
            "esc" | "escape" => Token::Escape,
            "enter" | "return" | "ret" => Token::Return,
            "tab" => Token::Tab,
            "space" => Token::Space,
            "backspace" | "bs" => Token::Backspace,
            "delete" | "del" => Token::Delete,
            "left" => Token::Left,
            "right" => Token::Right,
            "up" => Token::Up,
            "down" => Token::Down,
            "shift" => Token::Shift,
            "ctrl" | "control" => Token::Control,
            "cmd" | "command" | "super" => Token::Command,
            "alt" | "opt" | "option" | "meta" => Token::Option,
            single if single.chars().count() == 1 => single
                .chars()
                .next()
                .and_then(Token::from_char)
                .ok_or_else(|| Error::UnknownKey(s.trim().to_string()))?,
            _ => return Err(Error::UnknownKey(s.trim().to_string())),
        };

        Ok(token)
    }
}

bitflags! {
    /// Modifier keys held while a key was pressed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const COMMAND = 1 << 2;
        const OPTION = 1 << 3;
    }
}

/// Modifier flags paired with their tokens, in the order they are fed to
/// the matcher.
const CANONICAL_MODIFIERS: [(Modifiers, Token); 4] = [
    (Modifiers::SHIFT, Token::Shift),
    (Modifiers::COMMAND, Token::Command),
    (Modifiers::CONTROL, Token::Control),
    (Modifiers::OPTION, Token::Option),
];

impl Modifiers {
    /// Held modifiers as tokens, in canonical order.
    pub fn tokens(self) -> impl Iterator<Item = Token> {
        CANONICAL_MODIFIERS
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, token)| token)
    }
}

/// Parse a key sequence like `"d d"`, `"ctrl+r"` or `"g shift+g"`.
///
/// Keys are separated by whitespace. Each key may be a `+`-joined chord of
/// modifiers and one key; a chord expands to its modifier tokens (in
/// canonical order, regardless of how they were written) followed by the
/// key. A single uppercase letter is shorthand for `shift+<letter>`.
pub fn parse_sequence(s: &str) -> Result<Vec<Token>> {
    let mut sequence = Vec::new();

    for chord in s.split_whitespace() {
        let parts: Vec<&str> = chord.split('+').collect();
        let Some((key_part, modifier_parts)) = parts.split_last() else {
            continue;
        };

        let mut modifiers = Modifiers::empty();
        for part in modifier_parts {
            let token: Token = part.parse()?;
            let flag = token.as_modifier().ok_or_else(|| {
                Error::InvalidSequence(format!("`{part}` in `{chord}` is not a modifier"))
            })?;
            modifiers |= flag;
        }

        if key_part.is_empty() {
            return Err(Error::InvalidSequence(format!("`{chord}` has no key")));
        }

        let mut chars = key_part.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                modifiers |= Modifiers::SHIFT;
            }
        }

        let key: Token = key_part.parse()?;
        sequence.extend(modifiers.tokens());
        sequence.push(key);
    }

    if sequence.is_empty() {
        return Err(Error::InvalidSequence("empty key sequence".to_string()));
    }

    Ok(sequence)
}

/// Render a sequence for status lines and error messages, e.g. `"Ctrl R"`.
pub fn format_sequence(sequence: &[Token]) -> String {
    sequence
        .iter()
        .map(Token::label)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_keys() {
        assert_eq!("d".parse::<Token>().unwrap(), Token::D);
        assert_eq!("7".parse::<Token>().unwrap(), Token::Num7);
        assert_eq!("esc".parse::<Token>().unwrap(), Token::Escape);
        assert_eq!("Escape".parse::<Token>().unwrap(), Token::Escape);
        assert_eq!("CTRL".parse::<Token>().unwrap(), Token::Control);
        assert_eq!("alt".parse::<Token>().unwrap(), Token::Option);
        assert_eq!("space".parse::<Token>().unwrap(), Token::Space);
    }

    #[test]
    fn test_parse_unknown_key() {
        assert_eq!(
            "hyper".parse::<Token>(),
            Err(Error::UnknownKey("hyper".to_string()))
        );
        assert!("$".parse::<Token>().is_err());
        assert!("".parse::<Token>().is_err());
    }

    #[test]
    fn test_modifier_predicates() {
        assert!(Token::Shift.is_modifier());
        assert!(Token::Option.is_modifier());
        assert!(!Token::D.is_modifier());
        assert!(!Token::Escape.is_modifier());
        assert_eq!(Token::Control.as_modifier(), Some(Modifiers::CONTROL));
        assert_eq!(Token::R.as_modifier(), None);
    }

    #[test]
    fn test_modifier_tokens_canonical_order() {
        let all = Modifiers::all();
        let tokens: Vec<Token> = all.tokens().collect();
        assert_eq!(
            tokens,
            vec![Token::Shift, Token::Command, Token::Control, Token::Option]
        );

        let some = Modifiers::OPTION | Modifiers::SHIFT;
        assert_eq!(
            some.tokens().collect::<Vec<_>>(),
            vec![Token::Shift, Token::Option]
        );

        assert_eq!(Modifiers::empty().tokens().count(), 0);
    }

    #[test]
    fn test_parse_sequence_multi_key() {
        assert_eq!(parse_sequence("d d").unwrap(), vec![Token::D, Token::D]);
        assert_eq!(parse_sequence("  g   g ").unwrap(), vec![Token::G, Token::G]);
    }

    #[test]
    fn test_parse_sequence_chord() {
        assert_eq!(
            parse_sequence("ctrl+r").unwrap(),
            vec![Token::Control, Token::R]
        );
        // Written order does not matter; canonical order is emitted
        assert_eq!(
            parse_sequence("ctrl+shift+z").unwrap(),
            parse_sequence("shift+ctrl+z").unwrap()
        );
        assert_eq!(
            parse_sequence("ctrl+shift+z").unwrap(),
            vec![Token::Shift, Token::Control, Token::Z]
        );
    }

    #[test]
    fn test_parse_sequence_uppercase_is_shifted() {
        assert_eq!(parse_sequence("D").unwrap(), vec![Token::Shift, Token::D]);
        assert_eq!(
            parse_sequence("shift+D").unwrap(),
            vec![Token::Shift, Token::D]
        );
    }

    #[test]
    fn test_parse_sequence_errors() {
        assert!(matches!(
            parse_sequence(""),
            Err(Error::InvalidSequence(_))
        ));
        assert!(matches!(
            parse_sequence("   "),
            Err(Error::InvalidSequence(_))
        ));
        assert!(matches!(
            parse_sequence("d+d"),
            Err(Error::InvalidSequence(_))
        ));
        assert!(matches!(
            parse_sequence("ctrl+"),
            Err(Error::InvalidSequence(_))
        ));
        assert!(matches!(
            parse_sequence("ctrl+nope"),
            Err(Error::UnknownKey(_))
        ));
    }

    #[test]
    fn test_format_sequence() {
        assert_eq!(format_sequence(&[Token::Control, Token::R]), "Ctrl R");
        assert_eq!(format_sequence(&[Token::D, Token::D]), "D D");
        assert_eq!(format_sequence(&[]), "");
    }
}
