use crate::types::entry::{Entry, EntryContainer, EntryKind, Section};
use std::fmt;

/// Renders a document as plain text, one source line per output line.
/// Lines in nested sections are prefixed with `indent` once per level.
pub struct DocumentFormatter<'a> {
    document: &'a Document,
    indent: Option<&'a str>,
}

impl DocumentFormatter<'_> {
    fn write_entries(&self, f: &mut fmt::Formatter<'_>, entries: &[Entry], depth: usize) -> fmt::Result {
        for entry in entries {
            match entry.kind() {
                EntryKind::Section(section) => self.write_entries(f, section.entries(), depth + 1)?,
                EntryKind::Composite(children) => self.write_entries(f, children, depth)?,
                _ => {
                    for line in entry.to_string().split('\n') {
                        if let Some(indent) = self.indent.filter(|_| !line.is_empty()) {
                            write!(f, "{}", indent.repeat(depth))?;
                        }
                        writeln!(f, "{}", line)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for DocumentFormatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.document.sections {
            self.write_entries(f, section.entries(), 0)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    file_name: Option<String>,
    sections: Vec<Section>,
}

impl Document {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            file_name: None,
            sections,
        }
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut sections = Vec::new();
        let mut loose = Vec::new();

        for entry in entries {
            let (kind, annotations) = entry.into_parts();
            match kind {
                EntryKind::Section(section) if annotations.is_empty() => {
                    if !loose.is_empty() {
                        sections.push(Section::new(std::mem::take(&mut loose)));
                    }
                    sections.push(section);
                }
                kind => loose.push(Entry::new(kind).add_annotations(annotations)),
            }
        }
        if !loose.is_empty() {
            sections.push(Section::new(loose));
        }

        Self::new(sections)
    }

    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn display_with_indent<'a>(&'a self, indent: Option<&'a str>) -> DocumentFormatter<'a> {
        DocumentFormatter {
            document: self,
            indent,
        }
    }

    pub fn render_text(&self, indent: Option<&str>) -> String {
        self.display_with_indent(indent).to_string()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_with_indent(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParserConfig, parse_document};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_loose_entries_become_sections() {
        let document = Document::from_entries(vec![
            Entry::new(EntryKind::Title("Song".to_string())),
            Entry::BLANK_LINE,
            Entry::section(vec![Entry::directive("start_of_chorus", None)]),
            Entry::new(EntryKind::LyricLine("la".to_string())),
        ]);
        let sizes: Vec<usize> = document
            .sections()
            .iter()
            .map(|section| section.entries().len())
            .collect();
        assert_eq!(sizes, vec![2, 1, 1]);
        assert_eq!(document.to_string(), "Song\n\n{start_of_chorus}\nla\n");
    }

    #[test]
    fn test_render_with_indent() {
        let input = r#"[Verse]
{start_of_tab}
e|--0--|
{end_of_tab}

la
"#;
        let document = parse_document(input, &ParserConfig::default()).unwrap();
        assert_eq!(document.to_string(), input);
        assert_eq!(
            document.render_text(Some("  ")),
            "[Verse]\n  {start_of_tab}\n  e|--0--|\n  {end_of_tab}\n\nla\n"
        );
    }

    #[test]
    fn test_file_name() {
        let document = Document::default().with_file_name(Some("song.txt".to_string()));
        assert_eq!(document.file_name(), Some("song.txt"));
        assert!(document.sections().is_empty());
        assert_eq!(document.to_string(), "");
    }
}
