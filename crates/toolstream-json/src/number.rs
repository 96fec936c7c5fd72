//! Number token state machine.
//!
//! JSON numbers carry no terminator, so the parser tracks how far through the
//! `-? int frac? exp?` grammar the text has advanced and decides on the next
//! non-number character whether the token may end there.

use serde_json::Value;

/// Position within the JSON number grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberState {
    /// Leading `-` only.
    Minus,
    /// A single `0` integer part.
    Zero,
    /// Integer digits after a non-zero lead.
    Int,
    /// `.` with no fraction digit yet.
    Dot,
    Frac,
    /// `e` or `E` with nothing after it.
    Exp,
    ExpSign,
    ExpDigits,
}

impl NumberState {
    /// State after the first character of a number, if `c` can start one.
    pub(crate) fn start(c: char) -> Option<Self> {
        match c {
            '-' => Some(Self::Minus),
            '0' => Some(Self::Zero),
            '1'..='9' => Some(Self::Int),
            _ => None,
        }
    }

    /// State after consuming `c`, or `None` when `c` is not part of the number.
    pub(crate) fn next(self, c: char) -> Option<Self> {
        match (self, c) {
            (Self::Minus, '0') => Some(Self::Zero),
            (Self::Minus, '1'..='9') => Some(Self::Int),
            (Self::Int, '0'..='9') => Some(Self::Int),
            (Self::Zero | Self::Int, '.') => Some(Self::Dot),
            (Self::Dot | Self::Frac, '0'..='9') => Some(Self::Frac),
            (Self::Zero | Self::Int | Self::Frac, 'e' | 'E') => Some(Self::Exp),
            (Self::Exp, '+' | '-') => Some(Self::ExpSign),
            (Self::Exp | Self::ExpSign | Self::ExpDigits, '0'..='9') => Some(Self::ExpDigits),
            _ => None,
        }
    }

    /// Whether the number may end in this state.
    pub(crate) fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Zero | Self::Int | Self::Frac | Self::ExpDigits
        )
    }
}

/// An in-progress number token.
#[derive(Debug, Clone)]
pub(crate) struct NumberToken {
    pub(crate) text: String,
    pub(crate) state: NumberState,
}

impl NumberToken {
    pub(crate) fn new(c: char, state: NumberState) -> Self {
        Self {
            text: c.to_string(),
            state,
        }
    }

    /// Decoded value, if the text so far is a complete number.
    ///
    /// Out-of-range literals such as `1e400` decode to `None`.
    pub(crate) fn value(&self) -> Option<Value> {
        if !self.state.is_terminal() {
            return None;
        }
        serde_json::from_str::<serde_json::Number>(&self.text)
            .ok()
            .map(Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn scan(text: &str) -> Option<NumberState> {
        let mut chars = text.chars();
        let mut state = NumberState::start(chars.next()?)?;
        for c in chars {
            state = state.next(c)?;
        }
        Some(state)
    }

    #[test_case("0" ; "zero")]
    #[test_case("-12" ; "negative integer")]
    #[test_case("3.25" ; "fraction")]
    #[test_case("1e10" ; "exponent")]
    #[test_case("-0.5E-3" ; "signed exponent")]
    fn test_complete_numbers(text: &str) {
        let state = scan(text).unwrap();
        assert!(state.is_terminal());
    }

    #[test_case("-" ; "sign only")]
    #[test_case("1." ; "dangling dot")]
    #[test_case("1e" ; "dangling exponent")]
    #[test_case("1e+" ; "dangling exponent sign")]
    fn test_incomplete_numbers(text: &str) {
        let state = scan(text).unwrap();
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_rejects_malformed_continuations() {
        assert_eq!(NumberState::Minus.next('.'), None);
        assert_eq!(NumberState::Dot.next('e'), None);
        assert_eq!(NumberState::Zero.next('1'), None);
        assert_eq!(NumberState::start('+'), None);
    }

    #[test]
    fn test_value_decoding() {
        let token = NumberToken {
            text: "42".to_string(),
            state: NumberState::Int,
        };
        assert_eq!(token.value(), Some(serde_json::json!(42)));

        let token = NumberToken {
            text: "1.".to_string(),
            state: NumberState::Dot,
        };
        assert_eq!(token.value(), None);

        let token = NumberToken {
            text: "1e400".to_string(),
            state: NumberState::ExpDigits,
        };
        assert_eq!(token.value(), None);
    }
}
