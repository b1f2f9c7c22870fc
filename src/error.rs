use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Line #{line_number}: cannot parse \"{text}\"")]
    UnparseableLine { line_number: usize, text: String },

    #[error("Cannot read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised by the strict [`Chord::parse`](crate::Chord::parse).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid chord \"{text}\": {}", .messages.join("; "))]
pub struct ChordParseError {
    pub text: String,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown dialect \"{0}\" (expected chordpro, chord-over-lyric or mobilesheets)")]
pub struct UnknownDialectError(pub String);
