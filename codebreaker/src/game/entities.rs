use std::fmt;

use super::{
    constants::{COLOR_TAG, MIN_PALETTE_SIZE, WIN_STATUSES},
    token::{self, TokenError},
};

/// Number of distinct colors the service may use for a session.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PaletteSize(usize);

impl PaletteSize {
    /// Returns `None` for palettes smaller than [`MIN_PALETTE_SIZE`].
    #[must_use]
    pub const fn new(size: usize) -> Option<Self> {
        if size < MIN_PALETTE_SIZE {
            None
        } else {
            Some(Self(size))
        }
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for PaletteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A bare color identifier, e.g. `c3`, with its position tag removed.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ColorTag(String);

impl ColorTag {
    pub fn new(tag: &str) -> Self {
        Self(tag.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric index for tags of the form `c{index}`.
    pub fn index(&self) -> Option<u8> {
        self.0.strip_prefix(COLOR_TAG)?.parse().ok()
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One color at one position of a proposal.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ColorToken {
    position: usize,
    color: ColorTag,
}

impl ColorToken {
    /// Parse a raw wire token that must sit at `position`.
    pub fn parse(raw: &str, position: usize) -> Result<Self, TokenError> {
        let color = token::normalize(raw, position)?;
        Ok(Self { position, color })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn color(&self) -> &ColorTag {
        &self.color
    }

    /// The token exactly as the service sent it.
    pub fn to_wire(&self) -> String {
        token::encode(&self.color, self.position)
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.color.fmt(f)
    }
}

/// An ordered, non-empty guess at the secret code.
///
/// Proposals are immutable; the session replaces the whole proposal when the
/// service issues a new one.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Proposal {
    tokens: Vec<ColorToken>,
}

impl Proposal {
    /// Normalize every wire token against the index it occupies.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::EmptyProposal`] for an empty list, or the first
    /// token error encountered.
    pub fn from_wire<S: AsRef<str>>(raw: &[S]) -> Result<Self, TokenError> {
        if raw.is_empty() {
            return Err(TokenError::EmptyProposal);
        }
        let tokens = raw
            .iter()
            .enumerate()
            .map(|(position, token)| ColorToken::parse(token.as_ref(), position))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tokens })
    }

    /// Code length of the proposal.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false for a parsed proposal.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[ColorToken] {
        &self.tokens
    }

    pub fn colors(&self) -> impl Iterator<Item = &ColorTag> {
        self.tokens.iter().map(ColorToken::color)
    }

    pub fn to_wire(&self) -> Vec<String> {
        self.tokens.iter().map(ColorToken::to_wire).collect()
    }
}

impl fmt::Display for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = self
            .colors()
            .map(ColorTag::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{repr}")
    }
}

/// Number of positions of a proposal judged correct, within `0..=L`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct HitCount(usize);

impl HitCount {
    /// Returns `None` if `hits` falls outside `0..=code_length`.
    #[must_use]
    pub fn new(hits: i64, code_length: usize) -> Option<Self> {
        let hits = usize::try_from(hits).ok()?;
        (hits <= code_length).then_some(Self(hits))
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for HitCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A proposal together with the feedback it received.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HistoryEntry {
    attempt: usize,
    proposal: Proposal,
    hits: HitCount,
}

impl HistoryEntry {
    pub(crate) fn new(attempt: usize, proposal: Proposal, hits: HitCount) -> Self {
        Self {
            attempt,
            proposal,
            hits,
        }
    }

    /// 1-based position of this entry in the ledger.
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    pub fn proposal(&self) -> &Proposal {
        &self.proposal
    }

    pub fn hits(&self) -> HitCount {
        self.hits
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {} ({} hits)", self.attempt, self.proposal, self.hits)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SessionStatus {
    #[default]
    InProgress,
    Won,
}

impl SessionStatus {
    /// Classify a status string reported by the service.
    ///
    /// Only the win vocabulary is recognized. Every other value, including
    /// ones the service might add later, means the game goes on.
    pub fn from_remote(status: &str) -> Self {
        let status = status.trim();
        if WIN_STATUSES
            .iter()
            .any(|won| status.eq_ignore_ascii_case(won))
        {
            Self::Won
        } else {
            Self::InProgress
        }
    }

    pub fn is_won(self) -> bool {
        self == Self::Won
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::InProgress => "in progress",
            Self::Won => "won",
        };
        write!(f, "{repr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size_lower_bound() {
        assert!(PaletteSize::new(0).is_none());
        assert!(PaletteSize::new(1).is_none());
        assert_eq!(PaletteSize::new(2).map(PaletteSize::get), Some(2));
        assert_eq!(PaletteSize::new(12).map(PaletteSize::get), Some(12));
    }

    #[test]
    fn test_color_tag_index() {
        assert_eq!(ColorTag::new("c3").index(), Some(3));
        assert_eq!(ColorTag::new("c10").index(), Some(10));
        assert_eq!(ColorTag::new("red").index(), None);
        assert_eq!(ColorTag::new("c").index(), None);
    }

    #[test]
    fn test_proposal_from_wire() {
        let proposal = Proposal::from_wire(&["p0c1", "p1c0", "p2c2"]).unwrap();
        assert_eq!(proposal.len(), 3);
        assert_eq!(proposal.to_string(), "c1 c0 c2");
        assert_eq!(proposal.tokens()[1].position(), 1);
        assert_eq!(proposal.to_wire(), vec!["p0c1", "p1c0", "p2c2"]);
    }

    #[test]
    fn test_proposal_rejects_shuffled_tokens() {
        let err = Proposal::from_wire(&["p1c1", "p0c0"]).unwrap_err();
        assert!(matches!(
            err,
            TokenError::MissingPositionTag { position: 0, .. }
        ));
    }

    #[test]
    fn test_proposal_rejects_empty() {
        let raw: [&str; 0] = [];
        assert_eq!(
            Proposal::from_wire(&raw).unwrap_err(),
            TokenError::EmptyProposal
        );
    }

    #[test]
    fn test_proposal_wire_form_reencodes_positions() {
        let proposal = Proposal::from_wire(&["p0c3", "p1c1"]).unwrap();
        assert_eq!(proposal.to_wire(), vec!["p0c3", "p1c1"]);
        assert_eq!(proposal.tokens()[1].to_wire(), "p1c1");
    }

    #[test]
    fn test_hit_count_bounds() {
        assert_eq!(HitCount::new(0, 4).map(HitCount::get), Some(0));
        assert_eq!(HitCount::new(4, 4).map(HitCount::get), Some(4));
        assert!(HitCount::new(5, 4).is_none());
        assert!(HitCount::new(-1, 4).is_none());
        assert!(HitCount::new(i64::MIN, 4).is_none());
    }

    #[test]
    fn test_status_win_vocabulary() {
        assert_eq!(SessionStatus::from_remote("won"), SessionStatus::Won);
        assert_eq!(SessionStatus::from_remote("WON"), SessionStatus::Won);
        assert_eq!(SessionStatus::from_remote("Ganado"), SessionStatus::Won);
        assert_eq!(SessionStatus::from_remote(" ganado "), SessionStatus::Won);
    }

    #[test]
    fn test_status_unknown_is_in_progress() {
        for status in ["EnCurso", "Continua", "", "lost", "wonder"] {
            assert_eq!(
                SessionStatus::from_remote(status),
                SessionStatus::InProgress,
                "{status:?} should not end the session"
            );
        }
    }

    #[test]
    fn test_history_entry_display() {
        let proposal = Proposal::from_wire(&["p0c0", "p1c2"]).unwrap();
        let entry = HistoryEntry::new(3, proposal, HitCount::new(1, 2).unwrap());
        assert_eq!(entry.to_string(), "#3: c0 c2 (1 hits)");
    }
}
