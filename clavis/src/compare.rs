//! # Compare Module - Character Comparison
//!
//! Position-wise comparison between a target segment and typed input.
//!
//! Two characters are equal when their canonical forms match case-insensitively. The
//! canonical form folds visually-equivalent characters that are hard or impossible to type
//! on a regular keyboard into their ASCII counterparts:
//!
//! | Characters        | Canonical |
//! |-------------------|-----------|
//! | `“` `”`           | `"`       |
//! | `‘` `’`           | `'`       |
//! | `—` `–` `‑`       | `-`       |
//! | no-break space, `　` | ` `    |
//!
//! The mapping is used for comparison only. Segment text keeps its original characters.

/// Fold a character into its comparable form
pub const fn canonical(char: char) -> char {
    match char {
        '\u{201C}' | '\u{201D}' => '"',
        '\u{2018}' | '\u{2019}' => '\'',
        '\u{2014}' | '\u{2013}' | '\u{2011}' => '-',
        '\u{00A0}' | '\u{3000}' => ' ',
        _ => char,
    }
}

/// Case-insensitive equality on canonical characters
///
/// ```rust
/// use clavis::compare::chars_equal;
///
/// assert!(chars_equal('A', 'a'));
/// assert!(chars_equal('’', '\''));
/// assert!(!chars_equal('a', 'b'));
/// ```
pub fn chars_equal(a: char, b: char) -> bool {
    let a = canonical(a);
    let b = canonical(b);
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Number of positions where target and input agree
///
/// Only positions present in both strings are compared. No credit is given beyond the
/// shorter string.
pub fn count_correct(target: &str, input: &str) -> usize {
    target
        .chars()
        .zip(input.chars())
        .filter(|(expected, typed)| chars_equal(*expected, *typed))
        .count()
}

/// True if input has exactly the target's length and matches at every position
pub fn is_completed(target: &str, input: &str) -> bool {
    let mut target = target.chars();
    let mut input = input.chars();

    loop {
        match (target.next(), input.next()) {
            (Some(expected), Some(typed)) if chars_equal(expected, typed) => continue,
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// True if input is at least as long as the target, regardless of correctness
pub fn is_reached(target: &str, input: &str) -> bool {
    input.chars().count() >= target.chars().count()
}

/// Correctness of one displayed target character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Not typed yet
    Pending,
    /// Typed and matching
    Correct,
    /// Typed and not matching
    Wrong,
}

/// Classify every target character against the input
///
/// The returned vector always has one entry per target character.
pub fn classify(target: &str, input: &str) -> Vec<CharClass> {
    let mut typed = input.chars();
    target
        .chars()
        .map(|expected| match typed.next() {
            None => CharClass::Pending,
            Some(char) if chars_equal(expected, char) => CharClass::Correct,
            Some(_) => CharClass::Wrong,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_mapping() {
        assert_eq!(canonical('“'), '"');
        assert_eq!(canonical('”'), '"');
        assert_eq!(canonical('‘'), '\'');
        assert_eq!(canonical('’'), '\'');
        assert_eq!(canonical('—'), '-');
        assert_eq!(canonical('–'), '-');
        assert_eq!(canonical('‑'), '-');
        assert_eq!(canonical('\u{3000}'), ' ');
        assert_eq!(canonical('\u{00A0}'), ' ');
        // Everything else maps to itself
        assert_eq!(canonical('x'), 'x');
        assert_eq!(canonical('é'), 'é');
    }

    #[test]
    fn test_chars_equal_ignores_case() {
        assert!(chars_equal('H', 'h'));
        assert!(chars_equal('É', 'é'));
        assert!(chars_equal('Σ', 'σ'));
        assert!(!chars_equal('e', 'é'));
        assert!(chars_equal('\u{3000}', ' '));
    }

    #[test]
    fn test_count_correct() {
        assert_eq!(count_correct("hello", "hello"), 5);
        assert_eq!(count_correct("hello", "hxllo"), 4);
        assert_eq!(count_correct("hello", "he"), 2);
        // No credit past the target
        assert_eq!(count_correct("hi", "hiya"), 2);
        assert_eq!(count_correct("", "abc"), 0);
        assert_eq!(count_correct("abc", ""), 0);
    }

    #[test]
    fn test_count_correct_never_exceeds_shorter_length() {
        let pairs = [
            ("hello world", "hello"),
            ("cat", "CATS"),
            ("a b c", "a  b  c"),
            ("", ""),
            ("ünï", "UNI"),
        ];

        for (target, input) in pairs {
            let bound = target.chars().count().min(input.chars().count());
            assert!(count_correct(target, input) <= bound, "{target:?} / {input:?}");
        }
    }

    #[test]
    fn test_is_completed() {
        assert!(is_completed("hello world", "hello world"));
        assert!(is_completed("hi", "HI"));
        assert!(!is_completed("cat", "cag"));
        assert!(!is_completed("cat", "ca"));
        assert!(!is_completed("cat", "cats"));
        assert!(is_completed("", ""));
    }

    #[test]
    fn test_completed_implies_full_match() {
        for (target, input) in [("hi", "Hi"), ("a b", "A B"), ("x", "y")] {
            if is_completed(target, input) {
                assert_eq!(target.chars().count(), input.chars().count());
                assert_eq!(count_correct(target, input), target.chars().count());
            }
        }
    }

    #[test]
    fn test_is_reached() {
        assert!(is_reached("cat", "cag"));
        assert!(is_reached("cat", "cats"));
        assert!(!is_reached("cat", "ca"));
        assert!(is_reached("", ""));
        // Counted in characters, not bytes
        assert!(!is_reached("abc", "éé"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify("cat", "cX"),
            vec![CharClass::Correct, CharClass::Wrong, CharClass::Pending]
        );
        assert_eq!(classify("ab", ""), vec![CharClass::Pending; 2]);
        assert_eq!(classify("ab", "ABC"), vec![CharClass::Correct; 2]);
    }
}
