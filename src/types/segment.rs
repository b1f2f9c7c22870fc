use crate::types::chord::Chord;
use crate::types::token::{TokenKind, tokenize};
use std::fmt;

/// A chord inside a line, with the literal text it was written as
/// (`A*`, `(A)` or `[A]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordSegment {
    chord: Chord,
    text: String,
}

impl ChordSegment {
    pub fn new(chord: Chord, text: impl Into<String>) -> Self {
        Self {
            chord,
            text: text.into(),
        }
    }

    pub fn chord(&self) -> &Chord {
        &self.chord
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bare_text(&self) -> &str {
        self.text
            .strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .unwrap_or(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    WhiteSpace(String),
    Chord(ChordSegment),
    /// Inline `[*text]` comment.
    Annotation(String),
}

impl Segment {
    pub fn annotation(text: &str) -> Self {
        Segment::Annotation(format!("[*{}]", text))
    }

    pub fn text(&self) -> &str {
        match self {
            Segment::Text(text) | Segment::WhiteSpace(text) | Segment::Annotation(text) => text,
            Segment::Chord(chord) => chord.text(),
        }
    }

    pub fn width(&self) -> usize {
        self.text().chars().count()
    }

    pub fn annotation_text(&self) -> Option<&str> {
        match self {
            Segment::Annotation(text) => text
                .strip_prefix("[*")
                .and_then(|inner| inner.strip_suffix(']')),
            _ => None,
        }
    }

    fn is_marker(&self) -> bool {
        matches!(self, Segment::Chord(_) | Segment::Annotation(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SegmentedLine {
    segments: Vec<Segment>,
}

impl SegmentedLine {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn chordpro(text: &str) -> Self {
        let segments = tokenize(text)
            .into_iter()
            .map(|token| match token.kind {
                TokenKind::WhiteSpace => Segment::WhiteSpace(token.text),
                TokenKind::Text => Segment::Text(token.text),
                TokenKind::Bracketed if token.text.starts_with('*') => {
                    Segment::Annotation(token.to_string())
                }
                TokenKind::Bracketed => match Chord::try_parse(&token.text) {
                    Some(chord) => Segment::Chord(ChordSegment::new(chord, token.to_string())),
                    None => Segment::Text(token.to_string()),
                },
            })
            .collect();
        Self { segments }
    }

    /// Interlaces a chord line with the lyric line below it, placing each
    /// chord at its column. Lyrics shorter than the chord line are padded.
    pub fn interlace(chords: &SegmentedLine, lyrics: &str) -> Self {
        let lyrics: Vec<char> = lyrics.chars().collect();
        let mut out = String::new();
        let mut cursor = 0;

        for (column, segment) in chords.columns() {
            let marker = match segment {
                Segment::WhiteSpace(_) => continue,
                Segment::Chord(chord) => format!("[{}]", chord.bare_text()),
                Segment::Annotation(text) => text.clone(),
                Segment::Text(text) => format!("[*{}]", text),
            };

            if column > cursor {
                let end = column.min(lyrics.len());
                if end > cursor {
                    out.extend(&lyrics[cursor..end]);
                }
                out.extend(std::iter::repeat_n(' ', column - end.max(cursor)));
                cursor = column;
            }
            out.push_str(&marker);
        }

        if cursor < lyrics.len() {
            out.extend(&lyrics[cursor..]);
        }

        Self::chordpro(&out)
    }

    /// Splits an interlaced line back into a chord line and the lyrics.
    /// Where chords would touch, the lyrics are padded with spaces.
    pub fn split(&self) -> (SegmentedLine, String) {
        let mut lyrics = String::new();
        let mut column = 0;
        let mut chord_segments = Vec::new();
        let mut chord_width = 0;

        for segment in &self.segments {
            let marker = match segment {
                Segment::Text(text) | Segment::WhiteSpace(text) => {
                    lyrics.push_str(text);
                    column += segment.width();
                    continue;
                }
                Segment::Chord(chord) => {
                    Segment::Chord(ChordSegment::new(chord.chord().clone(), chord.bare_text()))
                }
                Segment::Annotation(_) => segment.clone(),
            };

            let position = if chord_width == 0 {
                column
            } else {
                column.max(chord_width + 1)
            };
            // the lyrics make room so the chord stays over its syllable
            if position > column {
                lyrics.extend(std::iter::repeat_n(' ', position - column));
                column = position;
            }
            if position > chord_width {
                chord_segments.push(Segment::WhiteSpace(" ".repeat(position - chord_width)));
            }
            chord_width = position + marker.width();
            chord_segments.push(marker);
        }

        (SegmentedLine::new(chord_segments), lyrics)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn columns(&self) -> impl Iterator<Item = (usize, &Segment)> {
        self.segments.iter().scan(0, |column, segment| {
            let start = *column;
            *column += segment.width();
            Some((start, segment))
        })
    }

    pub fn chords(&self) -> impl Iterator<Item = &ChordSegment> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Chord(chord) => Some(chord),
            _ => None,
        })
    }

    pub fn has_markers(&self) -> bool {
        self.segments.iter().any(Segment::is_marker)
    }

    pub fn has_lyrics(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Text(_)))
    }

    pub fn ends_with_whitespace(&self) -> bool {
        self.segments
            .last()
            .is_some_and(|segment| segment.text().ends_with(char::is_whitespace))
    }

    pub fn with_annotation(&self, text: &str) -> Self {
        let mut segments = self.segments.clone();
        if !segments.is_empty() && !self.ends_with_whitespace() {
            segments.push(Segment::WhiteSpace(" ".to_string()));
        }
        segments.push(Segment::annotation(text));
        Self { segments }
    }
}

impl fmt::Display for SegmentedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment.text())?;
        }
        Ok(())
    }
}
