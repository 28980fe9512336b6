//! Classification of the text the engine left unconsumed after compiling
//! the first statement of a command.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InLineComment,
    InBlockComment,
}

/// Returns true when `tail` holds only whitespace, `--` line comments and
/// `/* */` block comments.
///
/// A block comment still open at the end of input counts as inert.
pub fn is_inert(tail: &str) -> bool {
    let bytes = tail.as_bytes();
    let mut state = ScanState::Normal;
    let mut i = 0;

    while i < bytes.len() {
        let current = bytes[i];
        let next = bytes.get(i + 1).copied();

        match state {
            ScanState::Normal => match (current, next) {
                (b' ' | b'\t' | b'\r' | b'\n', _) => {}
                (b'/', Some(b'*')) => {
                    state = ScanState::InBlockComment;
                    i += 1;
                }
                (b'-', Some(b'-')) => {
                    state = ScanState::InLineComment;
                    i += 1;
                }
                _ => return false,
            },
            ScanState::InLineComment => {
                if current == b'\r' || current == b'\n' {
                    state = ScanState::Normal;
                }
            }
            ScanState::InBlockComment => {
                if current == b'*' && next == Some(b'/') {
                    state = ScanState::Normal;
                    i += 1;
                }
            }
        }
        i += 1;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_and_empty_are_inert() {
        assert!(is_inert(""));
        assert!(is_inert("  \t\r\n "));
    }

    #[test]
    fn test_comments_are_inert() {
        assert!(is_inert(" -- trailing comment"));
        assert!(is_inert("-- one\n-- two\r\n"));
        assert!(is_inert("/* block */ \n /* another\n spanning lines */"));
        assert!(is_inert("/* contains -- and ; SELECT 2 */"));
        assert!(is_inert("-- line with /* not a block\n"));
    }

    #[test]
    fn test_statements_are_not_inert() {
        assert!(!is_inert(" SELECT 2"));
        assert!(!is_inert("-- comment\nSELECT 2"));
        assert!(!is_inert("/* done */ x"));
        assert!(!is_inert(";"));
    }

    #[test]
    fn test_lone_comment_markers_are_not_inert() {
        assert!(!is_inert("-"));
        assert!(!is_inert(" - 1"));
        assert!(!is_inert("/"));
        assert!(!is_inert("*/"));
    }

    #[test]
    fn test_unterminated_block_comment_is_inert() {
        assert!(is_inert("/* never closed"));
        assert!(is_inert("/* almost *"));
    }
}
