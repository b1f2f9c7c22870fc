pub mod blank_lines;
pub mod environments;
pub mod headers;
pub mod pairs;

use crate::types::entry::Entry;
use log::debug;

pub type Grouper = fn(Vec<Entry>) -> Vec<Entry>;

// each pass must see the units built by the ones before it
pub const DEFAULT_GROUPERS: &[Grouper] = &[
    pairs::group,
    environments::group,
    headers::group,
    blank_lines::group,
];

pub fn apply_groupers(entries: Vec<Entry>, groupers: &[Grouper]) -> Vec<Entry> {
    let mut current = entries;

    // order is important here
    for grouper in groupers {
        let before = current.len();
        current = grouper(current);
        debug!("grouped {} entries into {}", before, current.len());
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_context::LineContext;
    use crate::line_parser::DEFAULT_LINE_PARSERS;
    use crate::types::entry::EntryKind;
    use pretty_assertions::assert_eq;

    pub(crate) fn group_lines(lines: &str, groupers: &[Grouper]) -> Vec<String> {
        let mut context = LineContext::new();
        let mut content_index = 0;
        let entries = lines
            .lines()
            .enumerate()
            .map(|(i, line)| {
                if line.trim().is_empty() {
                    return Entry::BLANK_LINE;
                }
                context.load(i + 1, content_index, line);
                content_index += 1;
                DEFAULT_LINE_PARSERS
                    .iter()
                    .find_map(|parser| parser(&mut context))
                    .unwrap()
            })
            .collect();
        apply_groupers(entries, groupers)
            .iter()
            .map(outline)
            .collect()
    }

    fn outline(entry: &Entry) -> String {
        match entry.children() {
            Some(children) if !matches!(entry.kind(), EntryKind::ChordLyricPair(_)) => {
                let inner: Vec<String> = children.iter().map(outline).collect();
                format!("{}[{}]", entry.type_name(), inner.join(", "))
            }
            _ => entry.type_name().to_string(),
        }
    }

    #[test]
    fn test_headers_outrank_blank_lines() {
        let input = "[Verse]\nA        G\nAll right now\n\nla la\n[Chorus]\nHey\n\nWhat\n";
        assert_eq!(
            group_lines(input, DEFAULT_GROUPERS),
            vec![
                "Section[HeaderLine, ChordLyricPair, BlankLine, LyricLine]",
                "Section[HeaderLine, LyricLine, BlankLine, LyricLine]",
            ]
        );
    }

    #[test]
    fn test_tab_environment_scenario() {
        let input = "{start_of_tab}\n|--1-2-3---|\n{end_of_tab}\nNot tab";
        assert_eq!(
            group_lines(input, DEFAULT_GROUPERS),
            vec![
                "Section[ChordProDirectiveLine, TablatureLine, ChordProDirectiveLine]",
                "LyricLine",
            ]
        );
    }

    #[test]
    fn test_without_groupers() {
        assert_eq!(
            group_lines("A\nla\n\nla", &[]),
            vec!["ChordLine", "LyricLine", "BlankLine", "LyricLine"]
        );
    }
}
