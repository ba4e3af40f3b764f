// src/core/locator.rs

//! Best-effort mapping from a node's identifying strings to a position in
//! the manifest text.
//!
//! This is a substring search, not a structural parse-position tracker: it
//! trusts that the raw text contains the exact value and can land on a
//! repeated occurrence. Good enough to drop a cursor near the right line.

use crate::models::CommandNode;

/// Zero-based line/column position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Finds the position of the first candidate that occurs in `source`.
///
/// Candidate priority: the command's last line, then the description, then
/// the name. Empty candidates are skipped; no match falls back to the start
/// of the document.
pub fn locate(source: &str, node: &CommandNode) -> Position {
    let command_last = node.command.as_ref().and_then(|spec| spec.last_line());
    locate_any(
        source,
        [command_last, node.description.as_deref(), Some(node.name.as_str())],
    )
}

/// The candidate-list form of [`locate`], in the given priority order.
pub fn locate_any<'a>(
    source: &str,
    candidates: impl IntoIterator<Item = Option<&'a str>>,
) -> Position {
    for candidate in candidates.into_iter().flatten() {
        if candidate.is_empty() {
            continue;
        }
        if let Some(index) = source.find(candidate) {
            return position_at(source, index);
        }
    }
    Position::default()
}

fn position_at(source: &str, index: usize) -> Position {
    let prefix = &source[..index];
    let line = prefix.bytes().filter(|&b| b == b'\n').count();
    let column = match prefix.rfind('\n') {
        Some(newline) => prefix.len() - newline - 1,
        None => prefix.len(),
    };
    Position { line, column }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Runnable;

    fn node(name: &str, command: Option<Runnable>) -> CommandNode {
        CommandNode {
            name: name.to_string(),
            command,
            ..Default::default()
        }
    }

    #[test]
    fn command_candidate_wins_over_name() {
        let source = "run: build\nname: Build";
        let found = locate(
            source,
            &node("Build", Some(Runnable::Single("build".to_string()))),
        );
        assert_eq!(found, Position { line: 0, column: 5 });
    }

    #[test]
    fn falls_back_to_name_when_command_is_absent_from_the_text() {
        let source = "run: compile\nname: Build";
        let found = locate(
            source,
            &node("Build", Some(Runnable::Single("deploy".to_string()))),
        );
        assert_eq!(found.line, 1);
        assert_eq!(found.column, 6);
    }

    #[test]
    fn sequence_command_searches_its_last_element() {
        let source = "steps:\n  - first\n  - second\n";
        let spec = Runnable::Sequence(vec!["first".to_string(), "second".to_string()]);
        let found = locate(source, &node("Steps", Some(spec)));
        assert_eq!(found.line, 2);
    }

    #[test]
    fn empty_candidates_are_skipped() {
        let source = "name: X";
        let found = locate(source, &node("X", Some(Runnable::Single(String::new()))));
        assert_eq!(found.line, 0);
        assert_eq!(found.column, 6);
    }

    #[test]
    fn no_match_defaults_to_the_origin() {
        let found = locate("totally unrelated", &node("Missing", None));
        assert_eq!(found, Position::default());
    }

    #[test]
    fn description_outranks_name() {
        let source = "a\nb\ndesc here\nname here\n";
        let mut n = node("name here", None);
        n.description = Some("desc here".to_string());
        assert_eq!(locate(source, &n).line, 2);
    }
}
