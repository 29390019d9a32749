//! Typed video identifier.
//!
//! A [`VideoId`] names one video and is used verbatim in file and directory
//! names, so construction validates it against a filesystem-safe character set.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Short stable token naming one video.
///
/// Only ASCII letters, digits, `-` and `_` are accepted. Anything else,
/// path separators in particular, is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Validate `token` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnrecognizedReference`] if the token is empty or
    /// contains characters outside the safe set. `reference` is only used for
    /// the error message.
    pub fn parse(token: &str, reference: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(Error::unrecognized(reference, "no video ID present"));
        }
        if let Some(bad) = token.chars().find(|c| !is_safe_char(*c)) {
            return Err(Error::unrecognized(
                reference,
                format!("video ID {token:?} contains unsupported character {bad:?}"),
            ));
        }
        Ok(Self(token.to_string()))
    }

    /// Borrow the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl TryFrom<String> for VideoId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value, &value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_ids() {
        for token in ["abc123", "dQw4w9WgXcQ", "-x_Y-z"] {
            let id = VideoId::parse(token, "ref").unwrap();
            assert_eq!(id.as_str(), token);
            assert_eq!(id.to_string(), token);
        }
    }

    #[test]
    fn rejects_empty() {
        let err = VideoId::parse("", "https://youtu.be/").unwrap_err();
        assert!(matches!(err, Error::UnrecognizedReference { .. }));
    }

    #[test]
    fn rejects_path_hostile_tokens() {
        for token in ["../etc", "a/b", "a\\b", "with space", "dot.dot"] {
            let err = VideoId::parse(token, "ref").unwrap_err();
            assert!(
                matches!(err, Error::UnrecognizedReference { .. }),
                "{token} should be rejected"
            );
        }
    }

    #[test]
    fn try_from_string() {
        assert!(VideoId::try_from("abc".to_string()).is_ok());
        assert!(VideoId::try_from("a/b".to_string()).is_err());
    }
}
