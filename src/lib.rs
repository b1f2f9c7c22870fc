//! Chord sheet parsing and conversion.
//!
//! Reads chords-over-lyrics sheets, bracketed section headers and ChordPro
//! into a [`Document`], and converts documents between those dialects while
//! keeping comments, fret diagrams and links that sit on the same lines.

pub mod cleaner;
pub mod document;
pub mod error;
pub mod groupers;
pub mod line_context;
pub mod line_parser;
pub mod parser;
pub mod transforms;
pub mod types;
pub mod util;

// Re-export commonly used types
pub use cleaner::clean_text;
pub use document::Document;
pub use error::{ChordParseError, ParseError};
pub use parser::{DocumentParser, ParserConfig, parse_document};
pub use transforms::{Dialect, Transformer, transform};
pub use types::chord::{Chord, Notation};
pub use types::chord_definition::ChordDefinition;
pub use types::directive::DirectiveNamePreference;
pub use types::entry::{Entry, EntryContainer, EntryKind, Section};
