use crate::error::ChordParseError;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    Name,
    Nashville,
    Roman,
}

const ACCIDENTALS: &[char] = &['#', 'b', '♯', '♭'];

const ROMAN_NUMERALS: &[&str] = &[
    "VII", "III", "IV", "VI", "II", "V", "I", "vii", "iii", "iv", "vi", "ii", "v", "i",
];

// Longest first, so that `maj` wins over `m`.
const WORD_MODIFIERS: &[&str] = &[
    "maj", "Maj", "MAJ", "min", "dim", "aug", "sus", "add", "alt", "no", "M", "m", "+", "-", "°",
    "ø", "Δ", "^", "(", ")", ",",
];

/// A chord name split into root, modifiers and optional bass note.
///
/// `name` always equals `root + modifiers + ("/" + bass)?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord {
    name: String,
    root: String,
    modifiers: Vec<String>,
    bass: Option<String>,
    notation: Notation,
}

impl Chord {
    pub fn new(
        root: impl Into<String>,
        modifiers: Vec<String>,
        bass: Option<String>,
        notation: Notation,
    ) -> Self {
        let root = root.into();
        let mut name = root.clone();
        for modifier in &modifiers {
            name.push_str(modifier);
        }
        if let Some(bass) = &bass {
            name.push('/');
            name.push_str(bass);
        }
        Self {
            name,
            root,
            modifiers,
            bass,
            notation,
        }
    }

    pub fn parse(text: &str) -> Result<Self, ChordParseError> {
        let mut parser = ChordParser::new(text);
        match parser.parse_chord() {
            Some(chord) => Ok(chord),
            None => Err(ChordParseError {
                text: text.to_string(),
                messages: parser.messages,
            }),
        }
    }

    pub fn try_parse(text: &str) -> Option<Self> {
        ChordParser::new(text).parse_chord()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    pub fn bass(&self) -> Option<&str> {
        self.bass.as_deref()
    }

    pub fn notation(&self) -> Notation {
        self.notation
    }

    /// Rewrites theoretical enharmonic spellings (`B#`, `E#`, `Cb`, `Fb`).
    ///
    /// Returns the borrowed chord itself when nothing needs rewriting.
    pub fn normalize(&self) -> Cow<'_, Chord> {
        if self.notation != Notation::Name {
            return Cow::Borrowed(self);
        }

        let root = normalize_note(&self.root);
        let bass = self.bass.as_deref().and_then(normalize_note);
        if root.is_none() && bass.is_none() {
            return Cow::Borrowed(self);
        }

        Cow::Owned(Chord::new(
            root.unwrap_or(&self.root),
            self.modifiers.clone(),
            bass.map(str::to_string).or_else(|| self.bass.clone()),
            Notation::Name,
        ))
    }
}

fn normalize_note(note: &str) -> Option<&'static str> {
    match note {
        "B#" | "B♯" => Some("C"),
        "E#" | "E♯" => Some("F"),
        "Cb" | "C♭" => Some("B"),
        "Fb" | "F♭" => Some("E"),
        _ => None,
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl FromStr for Chord {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chord::parse(s)
    }
}

fn root_len(text: &str, notation: Notation) -> Option<usize> {
    match notation {
        Notation::Name => {
            let first = text.chars().next().filter(|c| ('A'..='G').contains(c))?;
            let accidental = text[first.len_utf8()..]
                .chars()
                .next()
                .filter(|c| ACCIDENTALS.contains(c))
                .map_or(0, char::len_utf8);
            Some(first.len_utf8() + accidental)
        }
        Notation::Nashville => {
            let prefix = accidental_prefix_len(text);
            let degree = text[prefix..].chars().next()?;
            ('1'..='7').contains(&degree).then_some(prefix + 1)
        }
        Notation::Roman => {
            let prefix = accidental_prefix_len(text);
            ROMAN_NUMERALS
                .iter()
                .find(|numeral| text[prefix..].starts_with(*numeral))
                .map(|numeral| prefix + numeral.len())
        }
    }
}

fn accidental_prefix_len(text: &str) -> usize {
    text.chars()
        .next()
        .filter(|c| ACCIDENTALS.contains(c))
        .map_or(0, char::len_utf8)
}

fn numeric_modifier_len(text: &str) -> Option<usize> {
    let prefix = accidental_prefix_len(text);
    let digits = text[prefix..]
        .chars()
        .take(2)
        .take_while(char::is_ascii_digit)
        .count();
    (digits > 0).then_some(prefix + digits)
}

struct ChordParser<'a> {
    input: &'a str,
    position: usize,
    messages: Vec<String>,
}

impl<'a> ChordParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            messages: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn error(&mut self, message: String) {
        self.messages.push(message);
    }

    fn take(&mut self, len: usize) -> &'a str {
        let taken = &self.input[self.position..self.position + len];
        self.position += len;
        taken
    }

    fn parse_chord(&mut self) -> Option<Chord> {
        if self.input.is_empty() {
            self.error("Chord is empty".to_string());
            return None;
        }

        let (root, notation) = self.parse_root()?;
        let mut modifiers = Vec::new();
        let mut bass = None;

        while !self.rest().is_empty() {
            if let Some(after_slash) = self.rest().strip_prefix('/') {
                if let Some(len) = root_len(after_slash, notation)
                    && len == after_slash.len()
                {
                    self.take(1);
                    bass = Some(self.take(len).to_string());
                    break;
                }
                if let Some(len) = numeric_modifier_len(after_slash) {
                    modifiers.push(self.take(len + 1).to_string());
                    continue;
                }
                self.error(format!(
                    "Invalid bass note \"{}\" at position {}",
                    after_slash,
                    self.position + 1
                ));
                return None;
            }

            match self.parse_modifier() {
                Some(modifier) => modifiers.push(modifier),
                None => {
                    self.error(format!(
                        "Unexpected \"{}\" at position {}",
                        self.rest(),
                        self.position
                    ));
                    return None;
                }
            }
        }

        Some(Chord::new(root, modifiers, bass, notation))
    }

    fn parse_root(&mut self) -> Option<(String, Notation)> {
        for notation in [Notation::Name, Notation::Nashville, Notation::Roman] {
            if let Some(len) = root_len(self.rest(), notation) {
                return Some((self.take(len).to_string(), notation));
            }
        }
        self.error(format!("Expected root note in \"{}\"", self.input));
        None
    }

    fn parse_modifier(&mut self) -> Option<String> {
        if let Some(len) = numeric_modifier_len(self.rest()) {
            return Some(self.take(len).to_string());
        }
        let word = WORD_MODIFIERS
            .iter()
            .find(|word| self.rest().starts_with(*word))?;
        Some(self.take(word.len()).to_string())
    }
}
