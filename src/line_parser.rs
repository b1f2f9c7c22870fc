use crate::line_context::{GRID_STATE, LineContext, TAB_STATE};
use crate::types::chord::{Chord, Notation};
use crate::types::chord_definition::ChordDefinition;
use crate::types::directive::{DirectiveLine, MetaDirectiveLine};
use crate::types::entry::{
    Comment, CommentStyle, Entry, EntryKind, HeaderLine, HeaderStyle, MetadataEntry,
};
use crate::types::segment::{ChordSegment, Segment, SegmentedLine};
use crate::types::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

pub type LineParser = fn(&mut LineContext) -> Option<Entry>;

pub const CHORDPRO_LINE_PARSERS: &[LineParser] = &[
    try_parse_remark,
    try_parse_directive,
    try_parse_grid,
    try_parse_chordpro_lyric,
    try_parse_tablature,
    try_parse_lyric,
];

// order matters: the first parser returning an entry wins
pub const DEFAULT_LINE_PARSERS: &[LineParser] = &[
    try_parse_directive,
    try_parse_comment,
    try_parse_uri,
    try_parse_grid,
    try_parse_tablature,
    try_parse_header,
    try_parse_chordpro_lyric,
    try_parse_chord_definitions,
    try_parse_chord_line,
    try_parse_metadata,
    try_parse_title,
    try_parse_lyric,
];

const MAX_TITLE_LENGTH: usize = 80;

static PAREN_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\(([^()]*)\)\s*$").unwrap());

static ASTERISK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\*\*([^*]+)\*\*\s*$").unwrap());

static URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*((?:https?|ftp)://\S+|www\.\S+)\s*$").unwrap());

static TAB_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[A-Ga-g][#b]?\s?\|").unwrap());

static GRID_SYMBOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\|\|?|\|:|:\||\|\.|:\|\|?:|\.|/|%|%%|~|-|[xX]\d+)$").unwrap());

static CHORD_LINE_SYMBOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\|\|?|\|:|:\||/|%|-|N\.C\.?|NC|[xX]\d+|\d+[xX])$").unwrap()
});

static COLON_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*((?:intro|verse|pre-?chorus|chorus|bridge|outro|solo|interlude|instrumental|refrain|tag|coda|ending|break)(?:\s+\w+)*)\s*:\s*$",
    )
    .unwrap()
});

static METADATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(title|subtitle|artist|composer|lyricist|arranger|copyright|album|year|key|time|tempo|duration|capo|tuning)\s*:\s*(\S.*?)\s*$",
    )
    .unwrap()
});

fn content_tokens(tokens: &[Token]) -> impl Iterator<Item = &Token> {
    tokens.iter().filter(|token| !token.is_whitespace())
}

pub fn try_parse_remark(context: &mut LineContext) -> Option<Entry> {
    let text = context.line().trim_start().strip_prefix('#')?;
    Some(Entry::new(EntryKind::Comment(Comment {
        text: text.to_string(),
        style: CommentStyle::Remark,
    })))
}

pub fn try_parse_comment(context: &mut LineContext) -> Option<Entry> {
    if let Some(remark) = try_parse_remark(context) {
        return Some(remark);
    }

    let (captures, style) = match PAREN_COMMENT.captures(context.text()) {
        Some(captures) => (captures, CommentStyle::Parenthesis),
        None => (
            ASTERISK_COMMENT.captures(context.text())?,
            CommentStyle::Asterisks,
        ),
    };
    let comment = Comment {
        text: captures[1].to_string(),
        style,
    };
    Some(context.entry(EntryKind::Comment(comment)))
}

pub fn try_parse_directive(context: &mut LineContext) -> Option<Entry> {
    let directive = DirectiveLine::parse(context.text())?;

    if let Some(environment) = directive.name().environment_start() {
        if environment == TAB_STATE || environment == GRID_STATE {
            context.state_mut().set(environment, "1");
        }
    } else if let Some(environment) = directive.name().environment_end() {
        context.state_mut().remove(environment);
    }

    let kind = match MetaDirectiveLine::from_directive(&directive) {
        Some(meta) => EntryKind::MetaDirective(meta),
        None => EntryKind::Directive(directive),
    };
    Some(context.entry(kind))
}

pub fn try_parse_grid(context: &mut LineContext) -> Option<Entry> {
    if context.state().is_set(GRID_STATE) {
        let segments = context
            .tokens()
            .iter()
            .map(|token| match token.kind {
                TokenKind::WhiteSpace => Segment::WhiteSpace(token.text.clone()),
                _ => chord_or_text(token),
            })
            .collect();
        return Some(context.entry(EntryKind::GridLine(SegmentedLine::new(segments))));
    }

    if context.text().matches('|').count() < 2 {
        return None;
    }
    let mut tokens = content_tokens(context.tokens());
    if !tokens.next().is_some_and(|token| token.text.starts_with('|')) {
        return None;
    }

    let mut has_chord = false;
    let mut segments = Vec::new();
    for token in context.tokens() {
        let segment = match token.kind {
            TokenKind::WhiteSpace => Segment::WhiteSpace(token.text.clone()),
            TokenKind::Bracketed => return None,
            TokenKind::Text if GRID_SYMBOL.is_match(&token.text) => {
                Segment::Text(token.text.clone())
            }
            TokenKind::Text => {
                let chord = Chord::try_parse(&token.text)?;
                has_chord = true;
                Segment::Chord(ChordSegment::new(chord, token.text.clone()))
            }
        };
        segments.push(segment);
    }

    has_chord.then(|| context.entry(EntryKind::GridLine(SegmentedLine::new(segments))))
}

fn chord_or_text(token: &Token) -> Segment {
    match Chord::try_parse(&token.text) {
        Some(chord) => Segment::Chord(ChordSegment::new(chord, token.to_string())),
        None => Segment::Text(token.to_string()),
    }
}

pub fn try_parse_chordpro_lyric(context: &mut LineContext) -> Option<Entry> {
    let line = SegmentedLine::chordpro(context.text());
    if !line.has_markers() {
        return None;
    }
    // `A  G  [*x2]` is a chord line carrying an inline comment
    if line.chords().next().is_none() && chord_line_segments(context.tokens()).is_some() {
        return None;
    }
    Some(context.entry(EntryKind::ChordProLyric(line)))
}

pub fn try_parse_tablature(context: &mut LineContext) -> Option<Entry> {
    let line = context.line();
    let is_tab = context.state().is_set(TAB_STATE)
        || (TAB_LINE.is_match(line) && line.matches('-').count() >= 3);
    is_tab.then(|| Entry::new(EntryKind::Tablature(line.to_string())))
}

pub fn try_parse_uri(context: &mut LineContext) -> Option<Entry> {
    let captures = URI.captures(context.line())?;
    Some(Entry::new(EntryKind::Uri(captures[1].to_string())))
}

pub fn try_parse_header(context: &mut LineContext) -> Option<Entry> {
    let mut tokens = content_tokens(context.tokens());
    if let (Some(token), None) = (tokens.next(), tokens.next()) {
        if token.kind == TokenKind::Bracketed
            && !token.text.trim().is_empty()
            && !token.text.starts_with('*')
            && Chord::try_parse(&token.text).is_none()
        {
            let header = HeaderLine {
                name: token.text.clone(),
                style: HeaderStyle::Bracketed,
            };
            return Some(context.entry(EntryKind::Header(header)));
        }
    }

    let captures = COLON_HEADER.captures(context.text())?;
    let header = HeaderLine {
        name: captures[1].to_string(),
        style: HeaderStyle::Colon,
    };
    Some(context.entry(EntryKind::Header(header)))
}

pub fn try_parse_chord_definitions(context: &mut LineContext) -> Option<Entry> {
    let spaced = context.text().replace('=', " = ");
    let mut words = spaced.split_whitespace();
    let mut definitions = Vec::new();
    while let Some(name) = words.next() {
        let mut frets = words.next()?;
        if frets == "=" {
            frets = words.next()?;
        }
        definitions.push(ChordDefinition::try_parse(name, frets)?);
    }
    if definitions.is_empty() {
        return None;
    }

    let mut annotations = context.annotations().iter().peekable();
    while let Some(EntryKind::ChordDefinitions(more)) = annotations.peek().map(|a| a.kind()) {
        definitions.extend(more.iter().cloned());
        annotations.next();
    }

    Some(Entry::new(EntryKind::ChordDefinitions(definitions)).add_annotations(annotations.cloned()))
}

/// `A   G*  (D)  | Bm [*riff]`
pub fn try_parse_chord_line(context: &mut LineContext) -> Option<Entry> {
    let line = chord_line_segments(context.tokens())?;
    Some(context.entry(EntryKind::ChordLine(line)))
}

fn chord_line_segments(tokens: &[Token]) -> Option<SegmentedLine> {
    let mut segments = Vec::new();
    let mut notation = None;
    let mut chord_count = 0;

    for token in tokens {
        let segment = match token.kind {
            TokenKind::WhiteSpace => Segment::WhiteSpace(token.text.clone()),
            TokenKind::Bracketed if token.text.starts_with('*') => {
                Segment::Annotation(token.to_string())
            }
            TokenKind::Text if CHORD_LINE_SYMBOL.is_match(&token.text) => {
                Segment::Text(token.text.clone())
            }
            TokenKind::Bracketed => {
                Segment::Chord(ChordSegment::new(Chord::try_parse(&token.text)?, token.to_string()))
            }
            TokenKind::Text => {
                let chord = Chord::try_parse(bare_chord_text(&token.text))?;
                Segment::Chord(ChordSegment::new(chord, token.text.clone()))
            }
        };

        if let Segment::Chord(chord) = &segment {
            let current = chord.chord().notation();
            if *notation.get_or_insert(current) != current {
                return None;
            }
            chord_count += 1;
        }
        segments.push(segment);
    }

    // a lone `I` or `V` is far more likely a lyric than a chord
    if notation? == Notation::Roman && chord_count < 2 {
        return None;
    }
    Some(SegmentedLine::new(segments))
}

fn bare_chord_text(text: &str) -> &str {
    let text = text.trim_end_matches('*');
    text.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(text)
}

pub fn try_parse_metadata(context: &mut LineContext) -> Option<Entry> {
    let captures = METADATA.captures(context.text())?;
    let metadata = MetadataEntry {
        key: captures[1].to_string(),
        value: captures[2].to_string(),
    };
    Some(context.entry(EntryKind::Metadata(metadata)))
}

pub fn try_parse_title(context: &mut LineContext) -> Option<Entry> {
    let title = context.text().trim();
    if !context.is_first_content_line() || title.chars().count() > MAX_TITLE_LENGTH {
        return None;
    }
    let title = title.to_string();
    Some(context.entry(EntryKind::Title(title)))
}

pub fn try_parse_lyric(context: &mut LineContext) -> Option<Entry> {
    let text = context.text().to_string();
    Some(context.entry(EntryKind::LyricLine(text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_with(parser: LineParser, lines: &[&str]) -> Vec<Option<String>> {
        let mut context = LineContext::new();
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                context.load(i + 1, i, line);
                parser(&mut context).map(|entry| format!("{}: {}", entry.type_name(), entry))
            })
            .collect()
    }

    fn parse_one(parser: LineParser, line: &str) -> Option<Entry> {
        let mut context = LineContext::new();
        context.load(2, 1, line);
        parser(&mut context)
    }

    #[test]
    fn test_directive_tracks_environments() {
        let mut context = LineContext::new();
        context.load(1, 0, "{sot}");
        assert!(try_parse_directive(&mut context).is_some());
        assert!(context.state().is_set(TAB_STATE));

        context.load(2, 1, "|--1-2-3---|");
        let tab = try_parse_tablature(&mut context).unwrap();
        assert_eq!(tab.type_name(), "TablatureLine");

        context.load(3, 2, "{end_of_tab}");
        assert!(try_parse_directive(&mut context).is_some());
        assert!(!context.state().is_set(TAB_STATE));

        context.load(4, 3, "|--1-2-3---|");
        assert!(try_parse_tablature(&mut context).is_none());
    }

    #[test]
    fn test_meta_directive() {
        let entry = parse_one(try_parse_directive, "{meta: tuning DADGAD}").unwrap();
        assert_eq!(entry.type_name(), "ChordProMetaDirectiveLine");
        assert!(parse_one(try_parse_directive, "not {a} directive").is_none());
    }

    #[test]
    fn test_tablature_outside_environment() {
        assert!(parse_one(try_parse_tablature, "e|---0---3---|").is_some());
        assert!(parse_one(try_parse_tablature, "B |-1-----|").is_some());
        assert!(parse_one(try_parse_tablature, "Hello |world|").is_none());
        assert!(parse_one(try_parse_tablature, "e|0|").is_none());
    }

    #[test]
    fn test_grid_lines() {
        assert_eq!(
            parse_with(try_parse_grid, &["| C . . . | G . . . |", "A | G | D", "|| . . ||"]),
            vec![
                Some("ChordProGridLine: | C . . . | G . . . |".to_string()),
                None,
                None,
            ]
        );

        let mut context = LineContext::new();
        context.state_mut().set(GRID_STATE, "1");
        context.load(1, 0, "anything goes here");
        assert!(try_parse_grid(&mut context).is_some());
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            parse_with(try_parse_comment, &["(Repeat x2)", "**Solo**", "# remark", "(a) (b)", "la (x)"]),
            vec![
                Some("Comment: (Repeat x2)".to_string()),
                Some("Comment: **Solo**".to_string()),
                Some("Comment: # remark".to_string()),
                Some("Comment: (a) (b)".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_headers() {
        assert_eq!(
            parse_with(
                try_parse_header,
                &["[Verse 1]", "  [Chorus]  ", "Pre-Chorus:", "verse 2 :", "[Am]", "[*riff]", "[Intro] la", "Chorus: la la"]
            ),
            vec![
                Some("HeaderLine: [Verse 1]".to_string()),
                Some("HeaderLine: [Chorus]".to_string()),
                Some("HeaderLine: Pre-Chorus:".to_string()),
                Some("HeaderLine: verse 2:".to_string()),
                None,
                None,
                None,
                None,
            ]
        );
    }

    #[test]
    fn test_chord_lines() {
        assert_eq!(
            parse_with(
                try_parse_chord_line,
                &["A        G", "Am7  (G)  D*  | C/G", "N.C.  E  [*riff]", "A  IV", "All right now", "[Intro]"]
            ),
            vec![
                Some("ChordLine: A        G".to_string()),
                Some("ChordLine: Am7  (G)  D*  | C/G".to_string()),
                Some("ChordLine: N.C.  E  [*riff]".to_string()),
                None,
                None,
                None,
            ]
        );

        let entry = parse_one(try_parse_chord_line, "A  G  (x2)").unwrap();
        assert_eq!(entry.annotations().len(), 1);
        assert_eq!(entry.to_string(), "A  G  (x2)");
    }

    #[test]
    fn test_lone_roman_numeral_is_not_a_chord_line() {
        assert_eq!(
            parse_with(try_parse_chord_line, &["I", "  V  ", "I  IV  V", "vi (x2)"]),
            vec![
                None,
                None,
                Some("ChordLine: I  IV  V".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_chordpro_lyric_needs_chords_or_lyrics() {
        assert_eq!(
            parse_with(
                try_parse_chordpro_lyric,
                &["[A]All right[G] now", "la la [*softly]", "A        G    [*x2]", "[*Riff]", "plain"]
            ),
            vec![
                Some("ChordProLyricLine: [A]All right[G] now".to_string()),
                Some("ChordProLyricLine: la la [*softly]".to_string()),
                None,
                Some("ChordProLyricLine: [*Riff]".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_chord_definitions_merge_annotations() {
        let entry = parse_one(try_parse_chord_definitions, "Am x02210 C=x32010  Em 0-2-2-0-0-0").unwrap();
        let EntryKind::ChordDefinitions(definitions) = entry.kind() else {
            panic!("expected chord definitions");
        };
        assert_eq!(definitions.len(), 3);
        assert!(entry.annotations().is_empty());
        assert_eq!(entry.to_string(), "Am x02210  C x32010  Em 022000");

        assert!(parse_one(try_parse_chord_definitions, "Am x02210 and more").is_none());
        assert!(parse_one(try_parse_chord_definitions, "Hello x02210").is_none());
    }

    #[test]
    fn test_metadata_uri_title() {
        let entry = parse_one(try_parse_metadata, "Capo: 2").unwrap();
        assert_eq!(entry.to_string(), "Capo: 2");
        assert!(parse_one(try_parse_metadata, "Mood: happy").is_none());

        let entry = parse_one(try_parse_uri, "  https://example.com/song  ").unwrap();
        assert_eq!(entry.to_string(), "https://example.com/song");

        assert_eq!(
            parse_with(try_parse_title, &["All Right Now", "second line"]),
            vec![Some("TitleLine: All Right Now".to_string()), None]
        );
    }

    #[test]
    fn test_lyric_keeps_annotations() {
        let entry = parse_one(try_parse_lyric, "la la la (x3)").unwrap();
        assert_eq!(entry.kind(), &EntryKind::LyricLine("la la la ".to_string()));
        assert_eq!(entry.to_string(), "la la la (x3)");
    }
}
