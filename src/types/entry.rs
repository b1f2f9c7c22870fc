use crate::types::chord_definition::ChordDefinition;
use crate::types::directive::{DirectiveLine, MetaDirectiveLine};
use crate::types::segment::SegmentedLine;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    Parenthesis,
    Asterisks,
    Remark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub style: CommentStyle,
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            CommentStyle::Parenthesis => write!(f, "({})", self.text),
            CommentStyle::Asterisks => write!(f, "**{}**", self.text),
            CommentStyle::Remark => write!(f, "#{}", self.text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    Bracketed,
    Colon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    pub name: String,
    pub style: HeaderStyle,
}

impl fmt::Display for HeaderLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            HeaderStyle::Bracketed => write!(f, "[{}]", self.name),
            HeaderStyle::Colon => write!(f, "{}:", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

impl fmt::Display for MetadataEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

pub trait EntryContainer {
    fn entries(&self) -> &[Entry];
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChordLyricPair {
    lines: Vec<Entry>,
}

impl ChordLyricPair {
    pub fn new(chords: Entry, lyrics: Entry) -> Self {
        debug_assert!(matches!(chords.kind(), EntryKind::ChordLine(_)));
        debug_assert!(matches!(lyrics.kind(), EntryKind::LyricLine(_)));
        Self {
            lines: vec![chords, lyrics],
        }
    }

    pub fn chords(&self) -> &Entry {
        &self.lines[0]
    }

    pub fn lyrics(&self) -> &Entry {
        &self.lines[1]
    }

    pub fn chord_line(&self) -> Option<&SegmentedLine> {
        match self.chords().kind() {
            EntryKind::ChordLine(line) => Some(line),
            _ => None,
        }
    }

    pub fn lyric_text(&self) -> &str {
        match self.lyrics().kind() {
            EntryKind::LyricLine(text) => text,
            _ => "",
        }
    }
}

impl EntryContainer for ChordLyricPair {
    fn entries(&self) -> &[Entry] {
        &self.lines
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    entries: Vec<Entry>,
}

impl Section {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}

impl EntryContainer for Section {
    fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    BlankLine,
    Comment(Comment),
    Header(HeaderLine),
    Metadata(MetadataEntry),
    Title(String),
    Uri(String),
    ChordLine(SegmentedLine),
    LyricLine(String),
    ChordLyricPair(ChordLyricPair),
    Directive(DirectiveLine),
    MetaDirective(MetaDirectiveLine),
    GridLine(SegmentedLine),
    ChordProLyric(SegmentedLine),
    Tablature(String),
    ChordDefinitions(Vec<ChordDefinition>),
    Section(Section),
    Composite(Vec<Entry>),
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::BlankLine => Ok(()),
            EntryKind::Comment(comment) => write!(f, "{}", comment),
            EntryKind::Header(header) => write!(f, "{}", header),
            EntryKind::Metadata(metadata) => write!(f, "{}", metadata),
            EntryKind::Title(text)
            | EntryKind::Uri(text)
            | EntryKind::LyricLine(text)
            | EntryKind::Tablature(text) => write!(f, "{}", text),
            EntryKind::ChordLine(line)
            | EntryKind::GridLine(line)
            | EntryKind::ChordProLyric(line) => write!(f, "{}", line),
            EntryKind::ChordLyricPair(pair) => {
                write!(f, "{}\n{}", pair.chords(), pair.lyrics())
            }
            EntryKind::Directive(directive) => write!(f, "{}", directive),
            EntryKind::MetaDirective(meta) => write!(f, "{}", meta),
            EntryKind::ChordDefinitions(definitions) => {
                for (i, definition) in definitions.iter().enumerate() {
                    if i > 0 {
                        write!(f, "  ")?;
                    }
                    write!(f, "{}", definition)?;
                }
                Ok(())
            }
            EntryKind::Section(section) => write_lines(f, section.entries()),
            EntryKind::Composite(entries) => write_lines(f, entries),
        }
    }
}

fn write_lines(f: &mut fmt::Formatter<'_>, entries: &[Entry]) -> fmt::Result {
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        write!(f, "{}", entry)?;
    }
    Ok(())
}

/// One parsed unit of a chord sheet, with the annotations found after it on
/// the same source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    kind: EntryKind,
    annotations: Vec<Entry>,
}

impl Entry {
    pub const BLANK_LINE: Entry = Entry {
        kind: EntryKind::BlankLine,
        annotations: Vec::new(),
    };

    pub fn new(kind: EntryKind) -> Self {
        Self {
            kind,
            annotations: Vec::new(),
        }
    }

    pub fn section(entries: Vec<Entry>) -> Self {
        Self::new(EntryKind::Section(Section::new(entries)))
    }

    pub fn directive(name: &str, argument: Option<String>) -> Self {
        Self::new(EntryKind::Directive(DirectiveLine::new(name, argument)))
    }

    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    pub fn annotations(&self) -> &[Entry] {
        &self.annotations
    }

    pub fn into_parts(self) -> (EntryKind, Vec<Entry>) {
        (self.kind, self.annotations)
    }

    pub fn with_annotations(&self, annotations: Vec<Entry>) -> Self {
        Self {
            kind: self.kind.clone(),
            annotations,
        }
    }

    pub fn add_annotations(mut self, annotations: impl IntoIterator<Item = Entry>) -> Self {
        self.annotations.extend(annotations);
        self
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            EntryKind::BlankLine => "BlankLine",
            EntryKind::Comment(_) => "Comment",
            EntryKind::Header(_) => "HeaderLine",
            EntryKind::Metadata(_) => "MetadataEntry",
            EntryKind::Title(_) => "TitleLine",
            EntryKind::Uri(_) => "UriLine",
            EntryKind::ChordLine(_) => "ChordLine",
            EntryKind::LyricLine(_) => "LyricLine",
            EntryKind::ChordLyricPair(_) => "ChordLyricPair",
            EntryKind::Directive(_) => "ChordProDirectiveLine",
            EntryKind::MetaDirective(_) => "ChordProMetaDirectiveLine",
            EntryKind::GridLine(_) => "ChordProGridLine",
            EntryKind::ChordProLyric(_) => "ChordProLyricLine",
            EntryKind::Tablature(_) => "TablatureLine",
            EntryKind::ChordDefinitions(_) => "ChordDefinitions",
            EntryKind::Section(_) => "Section",
            EntryKind::Composite(_) => "CompositeEntry",
        }
    }

    pub fn children(&self) -> Option<&[Entry]> {
        match &self.kind {
            EntryKind::ChordLyricPair(pair) => Some(pair.entries()),
            EntryKind::Section(section) => Some(section.entries()),
            EntryKind::Composite(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self.kind, EntryKind::BlankLine)
    }

    pub fn is_section(&self) -> bool {
        matches!(self.kind, EntryKind::Section(_))
    }

    pub fn is_header(&self) -> bool {
        matches!(self.kind, EntryKind::Header(_))
    }

    pub fn is_chord_line(&self) -> bool {
        matches!(self.kind, EntryKind::ChordLine(_))
    }

    pub fn is_lyric_line(&self) -> bool {
        matches!(self.kind, EntryKind::LyricLine(_))
    }

    pub fn is_tablature(&self) -> bool {
        matches!(self.kind, EntryKind::Tablature(_))
    }

    pub fn is_grid_line(&self) -> bool {
        matches!(self.kind, EntryKind::GridLine(_))
    }

    pub fn as_directive(&self) -> Option<&DirectiveLine> {
        match &self.kind {
            EntryKind::Directive(directive) => Some(directive),
            _ => None,
        }
    }

    pub fn is_directive(&self, long_name: &str) -> bool {
        self.as_directive()
            .is_some_and(|directive| directive.is(long_name))
    }

    pub fn plain_comment_text(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Comment(comment) if self.annotations.is_empty() => Some(&comment.text),
            _ => None,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered = self.kind.to_string();
        for annotation in &self.annotations {
            if !rendered.is_empty() && !rendered.ends_with(char::is_whitespace) {
                rendered.push(' ');
            }
            rendered.push_str(&annotation.to_string());
        }
        f.write_str(&rendered)
    }
}

impl From<EntryKind> for Entry {
    fn from(kind: EntryKind) -> Self {
        Entry::new(kind)
    }
}
