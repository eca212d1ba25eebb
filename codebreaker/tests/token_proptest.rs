/// Property-based tests for the wire token codec
///
/// These tests check that normalization only accepts tokens tagged with
/// their own position, across random positions and color tags.
use codebreaker::{
    entities::{ColorTag, Proposal},
    token::{TokenError, encode, normalize},
};
use proptest::prelude::*;

// Strategy for a bare color tag like c0..c99
fn color_strategy() -> impl Strategy<Value = String> {
    (0u8..100).prop_map(|index| format!("c{index}"))
}

// Strategy for a proposal's worth of colors
fn colors_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(color_strategy(), 1..=12)
}

proptest! {
    #[test]
    fn test_normalize_recovers_color(position in 0usize..1000, color in color_strategy()) {
        let raw = format!("p{position}{color}");
        let tag = normalize(&raw, position).unwrap();
        prop_assert_eq!(tag.as_str(), color.as_str());
        prop_assert_eq!(encode(&tag, position), raw);
    }

    #[test]
    fn test_normalize_rejects_other_positions(
        position in 0usize..1000,
        other in 0usize..1000,
        color in color_strategy(),
    ) {
        prop_assume!(position != other);
        let raw = format!("p{position}{color}");
        prop_assert!(
            matches!(normalize(&raw, other), Err(TokenError::MissingPositionTag { .. })),
            "{} must not normalize at position {}", raw, other
        );
    }

    #[test]
    fn test_color_index_matches_tag(index in 0u8..=255) {
        let tag = ColorTag::new(&format!("c{index}"));
        prop_assert_eq!(tag.index(), Some(index));
    }

    #[test]
    fn test_proposal_preserves_wire_form(colors in colors_strategy()) {
        let raw: Vec<String> = colors
            .iter()
            .enumerate()
            .map(|(position, color)| format!("p{position}{color}"))
            .collect();
        let proposal = Proposal::from_wire(&raw).unwrap();

        prop_assert_eq!(proposal.len(), colors.len());
        prop_assert_eq!(proposal.to_wire(), raw);
        let bare: Vec<&str> = proposal.colors().map(ColorTag::as_str).collect();
        prop_assert_eq!(bare, colors.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_proposal_rejects_swapped_tokens(colors in prop::collection::vec(color_strategy(), 2..=9)) {
        let mut raw: Vec<String> = colors
            .iter()
            .enumerate()
            .map(|(position, color)| format!("p{position}{color}"))
            .collect();
        raw.swap(0, 1);
        prop_assert!(Proposal::from_wire(&raw).is_err());
    }
}
