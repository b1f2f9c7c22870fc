use crate::transforms::Transformer;
use crate::types::chord_definition::ChordDefinition;
use crate::types::directive::{DirectiveLine, is_metadata_directive};
use crate::types::entry::{
    ChordLyricPair, Comment, CommentStyle, Entry, EntryContainer, EntryKind, HeaderLine,
    HeaderStyle, MetadataEntry,
};
use crate::types::segment::SegmentedLine;
use crate::util::title_case;

#[derive(Debug, Clone, Copy, Default)]
pub struct ChordOverLyricTransformer;

impl ChordOverLyricTransformer {
    fn emit(&self, entry: &Entry, result: &mut Vec<Entry>) {
        let mut annotations = Vec::new();
        for annotation in entry.annotations() {
            self.emit(annotation, &mut annotations);
        }

        let mut converted = self.convert(entry).into_iter();
        match converted.next() {
            Some(first) => {
                result.push(first.add_annotations(annotations));
                result.extend(converted);
            }
            // the entry itself was dropped; keep what was attached to it
            None => result.extend(annotations),
        }
    }

    fn convert(&self, entry: &Entry) -> Vec<Entry> {
        match entry.kind() {
            EntryKind::ChordProLyric(line) => split_line(line),
            EntryKind::Directive(directive) => convert_directive(directive),
            EntryKind::MetaDirective(meta) => vec![Entry::new(EntryKind::Metadata(MetadataEntry {
                key: title_case(meta.key()),
                value: meta.value().to_string(),
            }))],
            EntryKind::Section(section) => {
                let entries = self.transform_entries(section.entries());
                if entries.is_empty() {
                    Vec::new()
                } else {
                    vec![Entry::section(entries)]
                }
            }
            EntryKind::Composite(entries) => {
                vec![Entry::new(EntryKind::Composite(self.transform_entries(entries)))]
            }
            other => vec![Entry::new(other.clone())],
        }
    }
}

impl Transformer for ChordOverLyricTransformer {
    fn transform_entries(&self, entries: &[Entry]) -> Vec<Entry> {
        let mut result = Vec::with_capacity(entries.len());
        for entry in entries {
            self.emit(entry, &mut result);
        }
        result
    }
}

fn split_line(line: &SegmentedLine) -> Vec<Entry> {
    if line.chords().next().is_none() {
        let mut text = String::new();
        let mut comments = Vec::new();
        for segment in line.segments() {
            match segment.annotation_text() {
                Some(comment) => comments.push(Entry::new(EntryKind::Comment(Comment {
                    text: comment.to_string(),
                    style: CommentStyle::Parenthesis,
                }))),
                None => text.push_str(segment.text()),
            }
        }
        if text.trim().is_empty() {
            return comments;
        }
        let lyrics = Entry::new(EntryKind::LyricLine(text.trim_end().to_string()));
        return vec![lyrics.add_annotations(comments)];
    }

    let (chords, lyrics) = line.split();
    let chords = Entry::new(EntryKind::ChordLine(chords));
    let lyrics = lyrics.trim_end();
    if lyrics.trim_start().is_empty() {
        return vec![chords];
    }
    let lyrics = Entry::new(EntryKind::LyricLine(lyrics.to_string()));
    vec![Entry::new(EntryKind::ChordLyricPair(ChordLyricPair::new(chords, lyrics)))]
}

fn convert_directive(directive: &DirectiveLine) -> Vec<Entry> {
    let name = directive.name().name();
    let argument = directive.argument().unwrap_or_default().to_string();
    let lyric = |text: String| vec![Entry::new(EntryKind::LyricLine(text))];

    if let Some(environment) = directive.name().environment_start() {
        if environment == "tab" || environment == "grid" {
            return Vec::new();
        }
        let header = HeaderLine {
            name: directive
                .argument()
                .map_or_else(|| title_case(environment), str::to_string),
            style: HeaderStyle::Bracketed,
        };
        return vec![Entry::new(EntryKind::Header(header))];
    }
    if directive.name().environment_end().is_some() {
        return Vec::new();
    }

    match name {
        "comment" | "comment_italic" | "comment_box" | "highlight" if !argument.is_empty() => {
            lyric(argument)
        }
        "tempo" => lyric(format!("Tempo: {}", argument)),
        "key" => lyric(format!("Key: {}", argument)),
        "title" => vec![Entry::new(EntryKind::Title(argument))],
        _ if is_metadata_directive(name) => vec![Entry::new(EntryKind::Metadata(MetadataEntry {
            key: title_case(name),
            value: argument,
        }))],
        "define" | "chord" => match ChordDefinition::from_define_argument(&argument) {
            Some(definition) => vec![Entry::new(EntryKind::ChordDefinitions(vec![definition]))],
            None => vec![Entry::new(EntryKind::Directive(directive.clone()))],
        },
        _ => vec![Entry::new(EntryKind::Directive(directive.clone()))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::assert_transformed;

    #[test]
    fn test_chordpro_to_chords_over_lyrics() {
        let input = r#"
{title: All Right Now}
{artist: Free}
{meta: tuning Standard}
{tempo: 120}

{start_of_verse: Verse 1}
[A]All right[G] now [*x2]
[D]   [A]
{end_of_verse}

{soc}
[C]la [*softly]
{comment: Slowly}
{eoc}
{define: Am base-fret 1 frets x 0 2 2 1 0}
{sot}
e|--0--|
{eot}
"#;
        let expected = r#"
All Right Now
Artist: Free
Tuning: Standard
Tempo: 120

[Verse 1]
A        G    [*x2]
All right now
D  A

[Chorus]
C  [*softly]
la
Slowly
Am x02210
e|--0--|
"#;
        assert_transformed(input, &ChordOverLyricTransformer, expected);
    }

    #[test]
    fn test_annotation_only_lines_become_comments() {
        assert_transformed(
            "{c: x}\nla la [*softly]\n[*Riff]\n{key: G}",
            &ChordOverLyricTransformer,
            "x\nla la (softly)\n(Riff)\nKey: G\n",
        );
    }

    #[test]
    fn test_unknown_directives_pass_through() {
        assert_transformed(
            "{textsize: 12}\n{new_page}\n{define: nonsense}",
            &ChordOverLyricTransformer,
            "{textsize: 12}\n{new_page}\n{define: nonsense}\n",
        );
    }

    #[test]
    fn test_header_names() {
        let line = DirectiveLine::parse("{start_of_chorus: Refrain}").unwrap();
        assert_eq!(convert_directive(&line)[0].to_string(), "[Refrain]");
        let line = DirectiveLine::parse("{start_of_pre_chorus}").unwrap();
        assert_eq!(convert_directive(&line)[0].to_string(), "[Pre Chorus]");
        let line = DirectiveLine::parse("{start_of_grid}").unwrap();
        assert!(convert_directive(&line).is_empty());
    }
}
