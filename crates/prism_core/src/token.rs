//! # Tokens
//!
//! Caller-assigned identities for Visuals and Cameras.

use serde::{Deserialize, Serialize};

/// Unique 64-bit identity of a Visual or Camera.
///
/// Tokens are chosen by the caller. The pool enforces uniqueness for Camera
/// tokens only; Visual tokens are trusted as given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Token(u64);

impl Token {
    /// Creates a token from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for Token {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_conversions() {
        let token: Token = 42_u64.into();
        assert_eq!(token, Token::new(42));
        assert_eq!(token.raw(), 42);
        assert_eq!(token.to_string(), "#42");
    }

    #[test]
    fn test_tokens_order_by_raw_value() {
        let mut tokens = vec![Token::new(9), Token::new(1), Token::new(5)];
        tokens.sort_unstable();
        let raw: Vec<u64> = tokens.into_iter().map(Token::raw).collect();
        assert_eq!(raw, vec![1, 5, 9]);
    }
}
