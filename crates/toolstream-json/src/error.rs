//! Errors raised while parsing a streamed JSON document.

/// A fragment could not continue the JSON document.
///
/// Every variant records the byte offset, counted from the first byte ever
/// fed to the parser, of the character that was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JsonStreamError {
    #[error("unexpected character {ch:?} at byte {offset}, expected {expected}")]
    UnexpectedCharacter {
        ch: char,
        offset: usize,
        expected: &'static str,
    },

    #[error("invalid escape sequence '\\{ch}' at byte {offset}")]
    InvalidEscape { ch: char, offset: usize },

    #[error("invalid unicode escape at byte {offset}")]
    InvalidUnicode { offset: usize },

    #[error("unescaped control character at byte {offset}")]
    ControlCharacter { offset: usize },

    #[error("invalid number {text:?} at byte {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("trailing character {ch:?} at byte {offset} after a complete document")]
    TrailingCharacters { ch: char, offset: usize },

    #[error("nesting depth exceeds the limit of {max_depth} at byte {offset}")]
    DepthLimitExceeded { max_depth: usize, offset: usize },

    #[error("input ended at byte {offset} before the document was complete")]
    UnexpectedEnd { offset: usize },
}

impl JsonStreamError {
    /// Byte offset at which the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { offset, .. }
            | Self::InvalidEscape { offset, .. }
            | Self::InvalidUnicode { offset }
            | Self::ControlCharacter { offset }
            | Self::InvalidNumber { offset, .. }
            | Self::TrailingCharacters { offset, .. }
            | Self::DepthLimitExceeded { offset, .. }
            | Self::UnexpectedEnd { offset } => *offset,
        }
    }
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, JsonStreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = JsonStreamError::UnexpectedCharacter {
            ch: 'b',
            offset: 1,
            expected: "a value or ']'",
        };
        assert_eq!(
            err.to_string(),
            "unexpected character 'b' at byte 1, expected a value or ']'"
        );

        let err = JsonStreamError::InvalidEscape { ch: 'x', offset: 4 };
        assert_eq!(err.to_string(), "invalid escape sequence '\\x' at byte 4");
    }

    #[test]
    fn test_offset() {
        assert_eq!(JsonStreamError::UnexpectedEnd { offset: 9 }.offset(), 9);
        assert_eq!(
            JsonStreamError::DepthLimitExceeded { max_depth: 2, offset: 3 }.offset(),
            3
        );
    }
}
