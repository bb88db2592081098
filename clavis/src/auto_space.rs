//! # Auto Space Module - Implicit Spaces While Typing
//!
//! Practice segments contain literal spaces between words that the user never has to type.
//! [`apply_auto_spaces`] rebuilds the correctly spaced value from the keystroke stream:
//!
//! - before each input character, every space the target requires at the current position
//!   is inserted without consuming input
//! - spaces typed by the user are skipped
//! - once the target length is reached, the rest of the input is dropped
//!
//! Only apply this on insertion. On deletion the raw value is stored as-is so the user can
//! delete through auto-inserted spaces.
//!
//! ```rust
//! use clavis::auto_space::apply_auto_spaces;
//!
//! assert_eq!(apply_auto_spaces("a b", "a"), "a");
//! assert_eq!(apply_auto_spaces("a b", "ab"), "a b");
//! assert_eq!(apply_auto_spaces("a b", "a b"), "a b");
//! ```

/// Rebuild `raw_input` with the spaces required by `target`
pub fn apply_auto_spaces(target: &str, raw_input: &str) -> String {
    let target: Vec<char> = target.chars().collect();
    let mut next = String::with_capacity(raw_input.len());
    let mut next_len = 0;

    for char in raw_input.chars() {
        while target.get(next_len) == Some(&' ') {
            next.push(' ');
            next_len += 1;
        }

        if next_len >= target.len() {
            break;
        }

        if char == ' ' {
            continue;
        }

        next.push(char);
        next_len += 1;
    }

    next
}
