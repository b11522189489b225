use crate::domain::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

const USER_TOKEN_PREFIX: &str = "flowlog-temp-token-";
const GUEST_TOKEN: &str = "guest-token";

/// Bearer token handed over by the session layer
///
/// The client forwards it verbatim; it never checks it against the server.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Token form the server issues for a signed-in user
    pub fn for_user(user_id: UserId) -> Self {
        Self(format!("{}{}", USER_TOKEN_PREFIX, user_id))
    }

    pub fn guest() -> Self {
        Self(GUEST_TOKEN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_guest(&self) -> bool {
        self.0 == GUEST_TOKEN
    }

    /// Reads the user id back out of a user token
    pub fn user_id(&self) -> Option<UserId> {
        self.0
            .strip_prefix(USER_TOKEN_PREFIX)
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<i64>().ok())
            .map(UserId)
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Keep tokens out of logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_guest() {
            write!(f, "SessionToken(guest)")
        } else {
            write!(f, "SessionToken(..)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_token_round_trip() {
        let token = SessionToken::for_user(UserId(12));
        assert_eq!(token.as_str(), "flowlog-temp-token-12");
        assert_eq!(token.user_id(), Some(UserId(12)));
        assert!(!token.is_guest());
    }

    #[test]
    fn test_guest_token() {
        let token = SessionToken::guest();
        assert!(token.is_guest());
        assert_eq!(token.user_id(), None);
        assert_eq!(token.bearer(), "Bearer guest-token");
    }

    #[test]
    fn test_foreign_tokens_are_forwarded_unparsed() {
        let token = SessionToken::new("flowlog-temp-token-abc");
        assert_eq!(token.user_id(), None);
        assert_eq!(token.as_str(), "flowlog-temp-token-abc");

        assert_eq!(SessionToken::new("flowlog-temp-token-").user_id(), None);
    }

    #[test]
    fn test_debug_hides_token() {
        let token = SessionToken::for_user(UserId(1));
        assert!(!format!("{:?}", token).contains("flowlog-temp-token"));
    }
}
