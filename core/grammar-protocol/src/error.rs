use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unknown clause role `{0}`")]
    UnknownRole(String),

    #[error("unknown part-of-speech tag `{0}`")]
    UnknownPartOfSpeech(String),

    #[error("sentence pattern {0} is outside 1..=5")]
    PatternOutOfRange(u8),

    #[error("unknown clause type `{0}`")]
    UnknownClauseType(String),

    #[error("malformed chain id `{0}`")]
    MalformedChainId(String),

    #[error("span [{start},{end}) is neither elided (-1,-1) nor a valid range")]
    InvalidSpan { start: i64, end: i64 },

    #[error("clause set has no `main` clause")]
    MissingMainClause,

    #[error("duplicate clause id `{0}`")]
    DuplicateClause(String),
}
