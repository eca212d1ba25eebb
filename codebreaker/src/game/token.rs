//! Wire token codec.
//!
//! The service sends every color as `p{position}{color}`, e.g. `p2c5` for
//! color `c5` at position 2. The position tag has to match the index the
//! token occupies in the proposal; a token that doesn't carry its own
//! position is rejected rather than rendered.

use thiserror::Error;

use super::{constants::POSITION_TAG, entities::ColorTag};

/// Wire-format violations in a received proposal.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TokenError {
    #[error("malformed token {raw:?}: expected position tag p{position}")]
    MissingPositionTag { raw: String, position: usize },
    #[error("malformed token {raw:?}: no color after position tag p{position}")]
    MissingColor { raw: String, position: usize },
    #[error("proposal has no tokens")]
    EmptyProposal,
    #[error("proposal has {actual} tokens but the session code length is {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Strip the `p{position}` tag from a raw wire token, leaving the bare color.
///
/// # Errors
///
/// Fails if the token doesn't start with exactly `p{position}` or if nothing
/// but digits follows it (`p12c3` is not a valid token for position 1).
///
/// # Examples
///
/// ```
/// use codebreaker::token::{normalize, TokenError};
///
/// assert_eq!(normalize("p2c5", 2).unwrap().as_str(), "c5");
/// assert!(matches!(normalize("p2c5", 3), Err(TokenError::MissingPositionTag { .. })));
/// ```
pub fn normalize(raw: &str, position: usize) -> Result<ColorTag, TokenError> {
    let missing_tag = || TokenError::MissingPositionTag {
        raw: raw.to_string(),
        position,
    };

    let color = raw
        .strip_prefix(POSITION_TAG)
        .and_then(|rest| rest.strip_prefix(position.to_string().as_str()))
        .ok_or_else(missing_tag)?;

    match color.chars().next() {
        None => Err(TokenError::MissingColor {
            raw: raw.to_string(),
            position,
        }),
        // The tag continues with more digits, so it names another position.
        Some(c) if c.is_ascii_digit() => Err(missing_tag()),
        Some(_) => Ok(ColorTag::new(color)),
    }
}

/// Rebuild the wire form of a color at a position.
#[must_use]
pub fn encode(color: &ColorTag, position: usize) -> String {
    format!("{POSITION_TAG}{position}{color}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_matching_position() {
        assert_eq!(normalize("p2c5", 2).unwrap().as_str(), "c5");
        assert_eq!(normalize("p0c0", 0).unwrap().as_str(), "c0");
    }

    #[test]
    fn test_normalize_rejects_wrong_position() {
        let err = normalize("p2c5", 3).unwrap_err();
        assert_eq!(
            err,
            TokenError::MissingPositionTag {
                raw: "p2c5".to_string(),
                position: 3
            }
        );
    }

    #[test]
    fn test_normalize_rejects_longer_position_number() {
        // p12 is position twelve, not position one followed by "2c3"
        assert!(matches!(
            normalize("p12c3", 1),
            Err(TokenError::MissingPositionTag { .. })
        ));
        assert_eq!(normalize("p12c3", 12).unwrap().as_str(), "c3");
    }

    #[test]
    fn test_normalize_rejects_bare_position() {
        assert!(matches!(
            normalize("p4", 4),
            Err(TokenError::MissingColor { position: 4, .. })
        ));
    }

    #[test]
    fn test_normalize_rejects_untagged_token() {
        assert!(normalize("c3", 0).is_err());
        assert!(normalize("", 0).is_err());
        assert!(normalize("P0c3", 0).is_err());
    }

    #[test]
    fn test_normalize_only_strips_prefix() {
        // The tag is only recognized at the start of the token
        assert!(normalize("c1p1", 1).is_err());
    }

    #[test]
    fn test_encode_restores_wire_token() {
        let color = normalize("p7c8", 7).unwrap();
        assert_eq!(encode(&color, 7), "p7c8");
    }

    #[test]
    fn test_error_display_names_token() {
        let msg = normalize("p2c5", 3).unwrap_err().to_string();
        assert!(msg.contains("p2c5"));
        assert!(msg.contains("p3"));
    }
}
