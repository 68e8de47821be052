pub mod chain;
pub mod error;
pub mod grammar;
pub mod ids;
pub mod model;
pub mod pos;
pub mod report;

#[cfg(feature = "serde")]
pub mod wire;

// Re-export core types for convenience
pub use chain::{Inversion, Parenthetical, VChain, VChainResult};
pub use error::ProtocolError;
pub use grammar::*;
pub use ids::{ChainId, ClauseId};
pub use model::{nearest_occurrence, Clause, ClauseElement, ClauseSet};
pub use pos::{PosToken, Span};
pub use report::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_aliases() {
        assert_eq!("O".parse::<Role>(), Ok(Role::Od));
        assert_eq!("Complement".parse::<Role>(), Ok(Role::Comp));
        assert_eq!("Parenthetical".parse::<Role>(), Ok(Role::Insert));
        assert_eq!("Insertion".parse::<Role>(), Ok(Role::Insert));
        assert_eq!("Complementizer".parse::<Role>(), Ok(Role::Compz));
        assert!("Q".parse::<Role>().is_err());
    }

    #[test]
    fn test_pos_round_trip() {
        for tag in ["AUX", "VERB", "NOUN", "PUNCT", "OTHER"] {
            let pos: PartOfSpeech = tag.parse().unwrap();
            assert_eq!(pos.as_str(), tag);
        }
        assert!(PartOfSpeech::Det.is_nominal());
        assert!(!PartOfSpeech::Adv.is_nominal());
    }

    #[test]
    fn test_chain_id_display() {
        let id = ChainId::new(3);
        assert_eq!(id.to_string(), "vc-3");
        assert_eq!(ChainId::parse("vc-3"), Some(id));
        assert_eq!(ChainId::parse("chain-3"), None);
        assert_eq!(core::mem::size_of::<ChainId>(), 4);
    }

    #[test]
    fn test_pattern_labels() {
        assert_eq!(SentencePattern::Svc.label(), "第2文型 (SVC)");
        assert_eq!(SentencePattern::Svc.comp_label(), Some("第2文型 (SV+Comp)"));
        assert_eq!(SentencePattern::Svo.comp_label(), None);
        assert_eq!(SentencePattern::from_number(6), Err(ProtocolError::PatternOutOfRange(6)));
    }

    #[test]
    fn test_span_slice_is_checked() {
        let s = "café au lait";
        assert_eq!(Span::new(0, 5).slice(s), Some("café"));
        assert_eq!(Span::new(0, 4).slice(s), None);
        assert_eq!(Span::new(10, 40).slice(s), None);
    }
}
