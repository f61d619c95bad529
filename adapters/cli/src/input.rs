//! Keyboard-style input mapping.

use delve_core::{Command, Direction};

/// Action requested by a single key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    /// Intent forwarded to the session.
    Intent(Command),
    /// Leave the game loop.
    Quit,
}

const fn step(direction: Direction) -> Input {
    Input::Intent(Command::Move { direction })
}

fn key(token: &str) -> Option<Input> {
    let input = match token.to_ascii_lowercase().as_str() {
        "w" | "up" | "arrowup" => step(Direction::Up),
        "s" | "down" | "arrowdown" => step(Direction::Down),
        "a" | "left" | "arrowleft" => step(Direction::Left),
        "d" | "right" | "arrowright" => step(Direction::Right),
        "e" | "space" | "enter" => Input::Intent(Command::EnterPortal),
        "r" | "reset" => Input::Intent(Command::Reset),
        "q" | "quit" => Input::Quit,
        _ => return None,
    };
    Some(input)
}

/// Maps a line of keys to inputs.
///
/// Whitespace separates tokens. A token is either a key name such as `up` or
/// `space`, or a run of single-letter keys such as `ddse`. A bare space
/// between letters never counts as the portal key; use `e` or `space`.
/// Unrecognised tokens are returned separately.
pub(crate) fn parse_line(line: &str) -> (Vec<Input>, Vec<String>) {
    let mut inputs = Vec::new();
    let mut unknown = Vec::new();
    for token in line.split_whitespace() {
        if let Some(input) = key(token) {
            inputs.push(input);
            continue;
        }
        for letter in token.chars() {
            match key(letter.encode_utf8(&mut [0; 4])) {
                Some(input) => inputs.push(input),
                None => unknown.push(letter.to_string()),
            }
        }
    }
    (inputs, unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_names_map_to_moves() {
        let (inputs, unknown) = parse_line("wasd Up ArrowDown");
        assert!(unknown.is_empty());
        assert_eq!(
            inputs,
            vec![
                step(Direction::Up),
                step(Direction::Left),
                step(Direction::Down),
                step(Direction::Right),
                step(Direction::Up),
                step(Direction::Down),
            ]
        );
    }

    #[test]
    fn portal_reset_and_quit_keys() {
        let (inputs, _) = parse_line("e space r q");
        assert_eq!(
            inputs,
            vec![
                Input::Intent(Command::EnterPortal),
                Input::Intent(Command::EnterPortal),
                Input::Intent(Command::Reset),
                Input::Quit,
            ]
        );
    }

    #[test]
    fn unknown_letters_are_reported() {
        let (inputs, unknown) = parse_line("dxd");
        assert_eq!(inputs.len(), 2);
        assert_eq!(unknown, vec!["x".to_owned()]);
    }
}
