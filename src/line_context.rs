use crate::types::chord_definition::ChordDefinition;
use crate::types::entry::{Comment, CommentStyle, Entry, EntryKind};
use crate::types::token::{Token, tokenize};
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use unicase::UniCase;

pub const TAB_STATE: &str = "tab";
pub const GRID_STATE: &str = "grid";

static PAREN_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)(\(([^()]*)\))\s*$").unwrap());

static ASTERISK_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)(\*\*([^*]+)\*\*)\s*$").unwrap());

static FRET_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|\s)((\S+?)\s*(?:=\s*|\s+)([xX0-9]{4,}|(?:[xX]|[0-9]{1,2})(?:-(?:[xX]|[0-9]{1,2})){3,}))\s*$",
    )
    .unwrap()
});

#[derive(Debug, Default, Clone)]
pub struct StateBag {
    values: HashMap<UniCase<String>, String>,
}

impl StateBag {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&UniCase::new(key.to_string()))
            .map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(UniCase::new(key.to_string()), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(&UniCase::new(key.to_string()))
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.values.contains_key(&UniCase::new(key.to_string()))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[derive(Debug, Default)]
pub struct LineContext {
    line_number: usize,
    content_index: usize,
    line: String,
    prefix_end: usize,
    annotations: Vec<Entry>,
    tokens: Vec<Token>,
    state: StateBag,
}

impl LineContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, line_number: usize, content_index: usize, line: &str) {
        let (prefix_end, annotations) = extract_annotations(line);
        self.line_number = line_number;
        self.content_index = content_index;
        self.line = line.to_string();
        self.prefix_end = prefix_end;
        self.annotations = annotations;
        self.tokens = tokenize(&self.line[..prefix_end]);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn is_first_content_line(&self) -> bool {
        self.content_index == 0
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    /// The line without its trailing annotations.
    pub fn text(&self) -> &str {
        &self.line[..self.prefix_end]
    }

    pub fn annotations(&self) -> &[Entry] {
        &self.annotations
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn entry(&self, kind: EntryKind) -> Entry {
        Entry::new(kind).add_annotations(self.annotations.iter().cloned())
    }

    pub fn state(&self) -> &StateBag {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StateBag {
        &mut self.state
    }
}

/// Replaces tabs with spaces up to the next multiple of `width`. `Some(0)`
/// deletes tabs and `None` leaves the line alone.
pub fn expand_tabs(line: &str, width: Option<usize>) -> Cow<'_, str> {
    let Some(width) = width else {
        return Cow::Borrowed(line);
    };
    if !line.contains('\t') {
        return Cow::Borrowed(line);
    }
    if width == 0 {
        return Cow::Owned(line.replace('\t', ""));
    }

    let mut out = String::with_capacity(line.len() + width);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = width - column % width;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    Cow::Owned(out)
}

/// Strips trailing `(comment)`, `**comment**` and `chord frets` annotations
/// from the end inward. Returns the length of the remaining prefix.
pub fn extract_annotations(line: &str) -> (usize, Vec<Entry>) {
    let mut end = line.len();
    let mut annotations = Vec::new();

    // each pass matches against the prefix left by the previous one
    while let Some((start, annotation)) = match_trailing_annotation(&line[..end]) {
        if line[..start].trim().is_empty() {
            break;
        }
        trace!("annotation {:?} at byte {}", annotation.to_string(), start);
        annotations.push(annotation);
        end = start;
    }

    annotations.reverse();
    (end, annotations)
}

fn match_trailing_annotation(head: &str) -> Option<(usize, Entry)> {
    if let Some(captures) = PAREN_ANNOTATION.captures(head) {
        let comment = Comment {
            text: captures[2].to_string(),
            style: CommentStyle::Parenthesis,
        };
        return Some((captures.get(1)?.start(), Entry::new(EntryKind::Comment(comment))));
    }

    if let Some(captures) = ASTERISK_ANNOTATION.captures(head) {
        let comment = Comment {
            text: captures[2].to_string(),
            style: CommentStyle::Asterisks,
        };
        return Some((captures.get(1)?.start(), Entry::new(EntryKind::Comment(comment))));
    }

    let captures = FRET_ANNOTATION.captures(head)?;
    // digit runs without a chord name are too easily tablature
    let definition = ChordDefinition::try_parse(&captures[2], &captures[3])?;
    Some((
        captures.get(1)?.start(),
        Entry::new(EntryKind::ChordDefinitions(vec![definition])),
    ))
}
