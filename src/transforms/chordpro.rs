use crate::transforms::Transformer;
use crate::transforms::environment::group_by_environment;
use crate::types::directive::{
    DirectiveLine, DirectiveNamePreference, END_PREFIX, MetaDirectiveLine, START_PREFIX,
    is_metadata_directive,
};
use crate::types::entry::{CommentStyle, Entry, EntryContainer, EntryKind, HeaderLine};
use crate::types::segment::SegmentedLine;

/// Converts any parsed document into canonical ChordPro.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChordProTransformer {
    preference: DirectiveNamePreference,
}

impl ChordProTransformer {
    pub fn new(preference: DirectiveNamePreference) -> Self {
        Self { preference }
    }

    pub fn preference(&self) -> DirectiveNamePreference {
        self.preference
    }

    pub(crate) fn directive(&self, name: &str, argument: Option<String>) -> Entry {
        let directive = DirectiveLine::new(name, argument).with_preference(self.preference);
        Entry::new(EntryKind::Directive(directive))
    }

    fn emit(&self, entry: &Entry, result: &mut Vec<Entry>) {
        let mut annotations: Vec<&Entry> = Vec::new();
        if let EntryKind::ChordLyricPair(pair) = entry.kind() {
            annotations.extend(pair.chords().annotations());
            annotations.extend(pair.lyrics().annotations());
        }
        annotations.extend(entry.annotations());

        let mut converted = self.convert(entry);
        let mut siblings = Vec::new();
        let mut inline = Vec::new();
        for annotation in annotations {
            match annotation.plain_comment_text() {
                Some(text) if converted.first().is_some_and(supports_inline_comments) => {
                    inline.push(text)
                }
                _ => self.emit(annotation, &mut siblings),
            }
        }

        if let Some(first) = converted.first_mut() {
            *first = with_inline_comments(first, &inline);
        }
        result.append(&mut converted);
        result.append(&mut siblings);
    }

    fn convert(&self, entry: &Entry) -> Vec<Entry> {
        let kind = match entry.kind() {
            EntryKind::Comment(comment) if comment.style != CommentStyle::Remark => {
                return vec![self.directive("comment", Some(comment.text.clone()))];
            }
            EntryKind::Header(header) => {
                return vec![self.directive(
                    &format!("{}{}", START_PREFIX, environment_for(header)),
                    Some(header.name.clone()),
                )];
            }
            EntryKind::Metadata(metadata) => {
                let key = metadata.key.to_lowercase();
                if is_metadata_directive(&key) {
                    return vec![self.directive(&key, Some(metadata.value.clone()))];
                }
                let meta = MetaDirectiveLine::new(key, metadata.value.clone());
                EntryKind::MetaDirective(meta.with_preference(self.preference))
            }
            EntryKind::Title(title) => return vec![self.directive("title", Some(title.clone()))],
            EntryKind::ChordLine(line) => {
                EntryKind::ChordProLyric(SegmentedLine::interlace(line, ""))
            }
            EntryKind::ChordLyricPair(pair) => match pair.chord_line() {
                Some(line) => {
                    EntryKind::ChordProLyric(SegmentedLine::interlace(line, pair.lyric_text()))
                }
                None => EntryKind::LyricLine(pair.lyric_text().to_string()),
            },
            EntryKind::Directive(directive) => {
                EntryKind::Directive(directive.with_preference(self.preference))
            }
            EntryKind::MetaDirective(meta) => {
                EntryKind::MetaDirective(meta.with_preference(self.preference))
            }
            EntryKind::ChordDefinitions(definitions) => {
                return definitions
                    .iter()
                    .map(|definition| {
                        self.directive("define", Some(definition.to_define_argument()))
                    })
                    .collect();
            }
            EntryKind::Section(section) => {
                return vec![Entry::section(self.transform_entries(section.entries()))];
            }
            EntryKind::Composite(entries) => {
                let mut children = Vec::new();
                for child in entries {
                    self.emit(child, &mut children);
                }
                EntryKind::Composite(children)
            }
            other => other.clone(),
        };
        vec![Entry::new(kind)]
    }
}

impl Transformer for ChordProTransformer {
    fn transform_entries(&self, entries: &[Entry]) -> Vec<Entry> {
        let entries = group_by_environment(entries.to_vec(), "tab", Entry::is_tablature);
        let entries = group_by_environment(entries, "grid", Entry::is_grid_line);

        let mut result = Vec::with_capacity(entries.len());
        // a header opens an environment that the next header closes
        let mut pending_end: Option<Entry> = None;

        for entry in &entries {
            if let EntryKind::Header(header) = entry.kind() {
                if let Some(end) = pending_end.take() {
                    insert_before_trailing_blanks(&mut result, end);
                }
                pending_end = Some(self.directive(
                    &format!("{}{}", END_PREFIX, environment_for(header)),
                    None,
                ));
            }
            self.emit(entry, &mut result);
        }

        if let Some(end) = pending_end {
            insert_before_trailing_blanks(&mut result, end);
        }
        result
    }
}

fn environment_for(header: &HeaderLine) -> &'static str {
    let name = header.name.trim().to_lowercase();
    if name.starts_with("chorus") {
        "chorus"
    } else if name.starts_with("verse") {
        "verse"
    } else {
        "bridge"
    }
}

fn insert_before_trailing_blanks(entries: &mut Vec<Entry>, entry: Entry) {
    let blanks = entries.iter().rev().take_while(|e| e.is_blank()).count();
    entries.insert(entries.len() - blanks, entry);
}

fn supports_inline_comments(entry: &Entry) -> bool {
    matches!(
        entry.kind(),
        EntryKind::ChordProLyric(_) | EntryKind::ChordLine(_) | EntryKind::LyricLine(_)
    )
}

fn with_inline_comments(entry: &Entry, comments: &[&str]) -> Entry {
    let line = match entry.kind() {
        EntryKind::LyricLine(text) if comments.is_empty() => {
            return Entry::new(EntryKind::LyricLine(text.trim_end().to_string()));
        }
        EntryKind::LyricLine(text) => SegmentedLine::chordpro(text),
        EntryKind::ChordProLyric(line) | EntryKind::ChordLine(line) => {
            SegmentedLine::chordpro(line.to_string().trim_end())
        }
        _ => return entry.clone(),
    };

    let line = comments
        .iter()
        .fold(line, |line, comment| line.with_annotation(comment));
    let kind = match entry.kind() {
        EntryKind::ChordLine(_) => EntryKind::ChordLine(line),
        _ => EntryKind::ChordProLyric(line),
    };
    Entry::new(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParserConfig, parse_document};
    use crate::util::assert_transformed;
    use pretty_assertions::assert_eq;

    fn chordpro() -> ChordProTransformer {
        ChordProTransformer::default()
    }

    #[test]
    fn test_chords_over_lyrics() {
        let input = r#"
All Right Now
Artist: Free
Tuning: Standard

[Verse 1]
A        G
All right now
D  A
"#;
        let expected = r#"
{title: All Right Now}
{artist: Free}
{meta: tuning Standard}

{start_of_verse: Verse 1}
[A]All right[G] now
[D]   [A]
{end_of_verse}
"#;
        assert_transformed(input, &chordpro(), expected);
    }

    #[test]
    fn test_header_end_goes_before_trailing_blank_lines() {
        let input = r#"
[Chorus]
la la

[Bridge 2]
lo

"#;
        let expected = r#"
{start_of_chorus: Chorus}
la la
{end_of_chorus}

{start_of_bridge: Bridge 2}
lo
{end_of_bridge}

"#;
        assert_transformed(input, &chordpro(), expected);
    }

    #[test]
    fn test_lone_roman_numeral_stays_a_lyric() {
        assert_transformed("Song\nG\nI\nla la", &chordpro(), "{title: Song}\n[G]I\nla la\n");
    }

    #[test]
    fn test_unknown_headers_become_bridges() {
        assert_transformed(
            "[Solo]\nA  G",
            &chordpro(),
            "{start_of_bridge: Solo}\n[A]   [G]\n{end_of_bridge}\n",
        );
    }

    #[test]
    fn test_comments_and_annotations() {
        let input = r#"
Song
(Slowly)
# keep me
A        G  (x2)
All right now
la la la **softly** (repeat)
[Intro] Am x02210
"#;
        let expected = r#"
{title: Song}
{comment: Slowly}
# keep me
[A]All right[G] now [*x2]
la la la [*softly] [*repeat]
{start_of_bridge: Intro}
{define: Am base-fret 1 frets x 0 2 2 1 0}
{end_of_bridge}
"#;
        assert_transformed(input, &chordpro(), expected);
    }

    #[test]
    fn test_chord_definitions_and_uri() {
        let input = r#"
Song
Em 12-14-14-13-12-12  C x32010
https://example.com/tabs
"#;
        let expected = r#"
{title: Song}
{define: Em base-fret 12 frets 1 3 3 2 1 1}
{define: C base-fret 1 frets x 3 2 0 1 0}
https://example.com/tabs
"#;
        assert_transformed(input, &chordpro(), expected);
    }

    #[test]
    fn test_implicit_tab_and_grid_environments() {
        let input = r#"
Song
e|---0---3---|
B|---1---0---|
| C . . . | G . . . |
{start_of_tab}
e|---0---|
{end_of_tab}
"#;
        let expected = r#"
{title: Song}
{start_of_tab}
e|---0---3---|
B|---1---0---|
{end_of_tab}
{start_of_grid}
| C . . . | G . . . |
{end_of_grid}
{start_of_tab}
e|---0---|
{end_of_tab}
"#;
        assert_transformed(input, &chordpro(), expected);
    }

    #[test]
    fn test_directive_name_preference() {
        let input = "{t: Song}\n{start_of_chorus}\n[C]la\n{eoc}";
        assert_transformed(
            input,
            &ChordProTransformer::new(DirectiveNamePreference::Long),
            "{title: Song}\n{start_of_chorus}\n[C]la\n{end_of_chorus}\n",
        );
        assert_transformed(
            input,
            &ChordProTransformer::new(DirectiveNamePreference::Short),
            "{t: Song}\n{soc}\n[C]la\n{eoc}\n",
        );
        assert_transformed(input, &chordpro(), "{t: Song}\n{start_of_chorus}\n[C]la\n{eoc}\n");
    }

    #[test]
    fn test_output_is_a_fixed_point() {
        let samples = [
            "All Right Now\nArtist: Free\n\n[Verse 1]\nA        G\nAll right now  (x2)\n\n[Chorus]\nD  A\nla la\n\nKey: A\nCapo: 2\n",
            "Song\nCm7   F7/A  Bb\n  Hello  darling\n**Solo**\ne|---0---3---|\nB|---1---0---|\n",
            "{title: Song}\n{soc}\n[C]la la [G]la\n{eoc}\n\n{sot}\ne|--0--|\n",
            "Song\nAm x02210  C x32010\nhttp://example.com\n(Fade out)\n| Am . . . | G . . . |\n",
        ];
        for sample in samples {
            let once = chordpro().transform(&parse_document(sample, &ParserConfig::default()).unwrap());
            let rendered = once.to_string();
            let twice =
                chordpro().transform(&parse_document(&rendered, &ParserConfig::default()).unwrap());
            assert_eq!(twice.to_string(), rendered);
        }
    }
}
