//! Path data tokenizer.
//!
//! Splits a `d` attribute into command letters and numbers, then groups the
//! numbers into arity-sized segments. Extra tuples after a command become
//! segments of their own (implicit repetition); after a moveto they are
//! linetos of the same relativity.

use regex::Regex;
use std::sync::OnceLock;

/// One drawing instruction with exactly `arity(command)` arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub command: char,
    pub args: Vec<f64>,
}

impl Segment {
    /// Uppercase form of the command letter.
    #[inline]
    pub fn kind(&self) -> char {
        self.command.to_ascii_uppercase()
    }

    #[inline]
    pub fn is_relative(&self) -> bool {
        self.command.is_ascii_lowercase()
    }
}

/// Numbers consumed per repetition of a command.
pub fn arity(command: char) -> Option<usize> {
    match command.to_ascii_uppercase() {
        'M' | 'L' | 'T' => Some(2),
        'H' | 'V' => Some(1),
        'C' => Some(6),
        'S' | 'Q' => Some(4),
        'A' => Some(7),
        'Z' => Some(0),
        _ => None,
    }
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([MmZzLlHhVvCcSsQqTtAa])|([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
            .expect("path token regex is valid")
    })
}

/// Tokenize path data into segments.
///
/// Numbers before the first command and trailing partial tuples are dropped.
pub fn tokenize(d: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current: Option<(char, usize)> = None;
    let mut repeated = false;
    let mut pending: Vec<f64> = Vec::with_capacity(7);

    for caps in token_regex().captures_iter(d) {
        if let Some(cmd) = caps.get(1) {
            let command = cmd.as_str().chars().next().unwrap_or('Z');
            let Some(n) = arity(command) else { continue };
            pending.clear();
            repeated = false;
            if n == 0 {
                segments.push(Segment {
                    command,
                    args: Vec::new(),
                });
                current = None;
            } else {
                current = Some((command, n));
            }
            continue;
        }

        let Some((command, n)) = current else { continue };
        let Some(value) = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok()) else {
            continue;
        };
        pending.push(value);
        if pending.len() == n {
            let command = if repeated { implicit_command(command) } else { command };
            segments.push(Segment {
                command,
                args: std::mem::take(&mut pending),
            });
            repeated = true;
        }
    }

    segments
}

/// Command used for repeated argument tuples.
fn implicit_command(command: char) -> char {
    match command {
        'M' => 'L',
        'm' => 'l',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(d: &str) -> String {
        tokenize(d).iter().map(|s| s.command).collect()
    }

    #[test]
    fn test_square() {
        let segs = tokenize("M0,0 L10,0 L10,10 L0,10 Z");
        assert_eq!(segs.len(), 5);
        assert_eq!(commands("M0,0 L10,0 L10,10 L0,10 Z"), "MLLLZ");
        assert_eq!(segs[2].args, vec![10.0, 10.0]);
        assert!(segs[4].args.is_empty());
    }

    #[test]
    fn test_implicit_repetition() {
        assert_eq!(commands("M0 0 10 0 10 10"), "MLL");
        assert_eq!(commands("m0 0 10 0"), "ml");
        assert_eq!(commands("C1 1 2 2 3 3 4 4 5 5 6 6"), "CC");
        assert_eq!(commands("h5 5 5"), "hhh");
    }

    #[test]
    fn test_number_forms() {
        let segs = tokenize("M-1.5.5L1e2-2E-1l.25,+3.");
        assert_eq!(segs[0].args, vec![-1.5, 0.5]);
        assert_eq!(segs[1].args, vec![100.0, -0.2]);
        assert_eq!(segs[2].args, vec![0.25, 3.0]);
    }

    #[test]
    fn test_partial_and_leading_numbers_dropped() {
        assert_eq!(commands("5 5 M0,0 L1"), "M");
        assert_eq!(commands("C1 2 3 4 5"), "");
    }

    #[test]
    fn test_unparsable_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("hello world").is_empty());
    }

    #[test]
    fn test_arity_table() {
        assert_eq!(arity('a'), Some(7));
        assert_eq!(arity('z'), Some(0));
        assert_eq!(arity('X'), None);
    }
}
