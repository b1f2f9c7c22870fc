pub mod chord_over_lyric;
pub mod chordpro;
pub mod environment;
pub mod mobilesheets;

use crate::document::Document;
use crate::error::UnknownDialectError;
use crate::types::directive::DirectiveNamePreference;
use crate::types::entry::{Entry, EntryContainer, Section};
use log::debug;
use std::fmt;
use std::str::FromStr;

pub use chord_over_lyric::ChordOverLyricTransformer;
pub use chordpro::ChordProTransformer;
pub use mobilesheets::MobileSheetsTransformer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    ChordPro,
    ChordOverLyric,
    MobileSheets,
}

impl FromStr for Dialect {
    type Err = UnknownDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chordpro" | "cho" => Ok(Dialect::ChordPro),
            "chord-over-lyric" | "text" => Ok(Dialect::ChordOverLyric),
            "mobilesheets" => Ok(Dialect::MobileSheets),
            _ => Err(UnknownDialectError(s.to_string())),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::ChordPro => write!(f, "chordpro"),
            Dialect::ChordOverLyric => write!(f, "chord-over-lyric"),
            Dialect::MobileSheets => write!(f, "mobilesheets"),
        }
    }
}

pub trait Transformer {
    fn transform_entries(&self, entries: &[Entry]) -> Vec<Entry>;

    fn transform(&self, document: &Document) -> Document {
        let sections = document
            .sections()
            .iter()
            .map(|section| Section::new(self.transform_entries(section.entries())))
            .filter(|section| !section.entries().is_empty())
            .collect();
        Document::new(sections).with_file_name(document.file_name().map(str::to_string))
    }
}

pub fn transform(
    document: &Document,
    dialect: Dialect,
    preference: DirectiveNamePreference,
) -> Document {
    debug!("transforming {} sections to {}", document.sections().len(), dialect);
    match dialect {
        Dialect::ChordPro => ChordProTransformer::new(preference).transform(document),
        Dialect::ChordOverLyric => ChordOverLyricTransformer.transform(document),
        Dialect::MobileSheets => MobileSheetsTransformer::new(preference).transform(document),
    }
}
