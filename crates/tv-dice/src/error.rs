//! Error types for the dice engine.

use std::ops::Range;

/// A grammar or range violation found while parsing dice notation.
///
/// Every variant carries the byte span of the offending input, measured
/// against the original text (whitespace included), so front ends can point
/// at it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    /// The input was empty or contained only whitespace.
    #[error("empty dice notation")]
    Empty,

    /// The `d` separator between count and sides was missing.
    #[error("expected 'd' at position {}, found {found}", .span.start)]
    MissingSeparator {
        /// Where the separator was expected.
        span: Range<usize>,
        /// What was there instead.
        found: String,
    },

    /// No digits followed the `d` separator.
    #[error("expected number of sides after 'd' at position {}, found {found}", .span.start)]
    MissingSides {
        /// Where the sides were expected.
        span: Range<usize>,
        /// What was there instead.
        found: String,
    },

    /// The die count was zero.
    #[error("die count must be at least 1")]
    CountTooSmall {
        /// The count literal.
        span: Range<usize>,
    },

    /// The die count exceeded the supported maximum.
    #[error("die count too large (max {max})")]
    CountTooLarge {
        /// The count literal.
        span: Range<usize>,
        /// The largest accepted count.
        max: u32,
    },

    /// The die had fewer than two sides.
    #[error("die must have at least 2 sides")]
    TooFewSides {
        /// The sides literal.
        span: Range<usize>,
    },

    /// The sides literal did not fit the supported range.
    #[error("die sides too large (max {})", u32::MAX)]
    SidesOutOfRange {
        /// The sides literal.
        span: Range<usize>,
    },

    /// A keep/drop operation was not followed by a count.
    #[error("expected number after operation {op} at position {}", .span.end)]
    MissingOperationCount {
        /// The operation keyword.
        span: Range<usize>,
        /// The operation as written, lowercased.
        op: String,
    },

    /// A keep/drop operation count was zero.
    #[error("operation count must be at least 1")]
    ZeroOperationCount {
        /// The count literal.
        span: Range<usize>,
    },

    /// A keep/drop operation count did not fit the supported range.
    #[error("operation count too large (max {})", u32::MAX)]
    OperationCountOutOfRange {
        /// The count literal.
        span: Range<usize>,
    },

    /// A `k` or `d` clause that is not one of `kh`, `kl`, `dh`, `dl`.
    #[error("unknown operation {found} at position {} (expected kh, kl, dh, or dl)", .span.start)]
    UnknownOperation {
        /// The clause as found.
        span: Range<usize>,
        /// A description of the clause.
        found: String,
    },

    /// A `+` or `-` was not followed by digits.
    #[error("expected number after '{sign}' at position {}", .span.start)]
    MissingModifier {
        /// The sign character.
        span: Range<usize>,
        /// Either `+` or `-`.
        sign: char,
    },

    /// The modifier did not fit a 32-bit signed integer.
    #[error("modifier out of range ({}..={})", i32::MIN, i32::MAX)]
    ModifierOutOfRange {
        /// The modifier literal including its sign.
        span: Range<usize>,
    },

    /// A character that is not part of the notation grammar.
    #[error("unexpected character '{ch}' at position {}", .span.start)]
    UnexpectedCharacter {
        /// The character.
        span: Range<usize>,
        /// The offending character.
        ch: char,
    },
}

impl NotationError {
    /// Byte range in the original input that this error refers to.
    ///
    /// Empty input has no meaningful location and reports `0..0`.
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Empty => 0..0,
            Self::MissingSeparator { span, .. }
            | Self::MissingSides { span, .. }
            | Self::CountTooSmall { span }
            | Self::CountTooLarge { span, .. }
            | Self::TooFewSides { span }
            | Self::SidesOutOfRange { span }
            | Self::MissingOperationCount { span, .. }
            | Self::ZeroOperationCount { span }
            | Self::OperationCountOutOfRange { span }
            | Self::UnknownOperation { span, .. }
            | Self::MissingModifier { span, .. }
            | Self::ModifierOutOfRange { span }
            | Self::UnexpectedCharacter { span, .. } => span.clone(),
        }
    }
}

/// A failure while evaluating an already validated expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RollError {
    /// The secure random source could not produce a value.
    #[error("random source failed: {0}")]
    Entropy(String),

    /// The expression was built outside the parser and breaks its bounds.
    #[error("invalid expression: {0}")]
    InvalidExpression(String),
}

/// Any error produced by parsing and then rolling a notation string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    /// The notation was rejected by the parser.
    #[error(transparent)]
    Notation(#[from] NotationError),

    /// The roll itself failed.
    #[error(transparent)]
    Roll(#[from] RollError),
}

/// Convenience result type for dice operations.
pub type DiceResult<T> = Result<T, DiceError>;
