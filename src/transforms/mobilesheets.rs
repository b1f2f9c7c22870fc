use crate::transforms::Transformer;
use crate::transforms::chordpro::ChordProTransformer;
use crate::types::chord_definition::ChordDefinition;
use crate::types::directive::DirectiveNamePreference;
use crate::types::entry::{Entry, EntryKind};

/// Canonical ChordPro, adjusted for what MobileSheets renders: chord
/// definitions become comments, bridges become verses and the tempo is
/// repeated as a comment.
#[derive(Debug, Clone, Copy, Default)]
pub struct MobileSheetsTransformer {
    chordpro: ChordProTransformer,
}

impl MobileSheetsTransformer {
    pub fn new(preference: DirectiveNamePreference) -> Self {
        Self {
            chordpro: ChordProTransformer::new(preference),
        }
    }

    fn adapt(&self, entries: Vec<Entry>) -> Vec<Entry> {
        let preference = self.chordpro.preference();
        let mut result = Vec::with_capacity(entries.len());

        for entry in entries {
            let (kind, annotations) = entry.into_parts();
            let kind = match kind {
                EntryKind::Directive(directive) if directive.is("define") || directive.is("chord") => {
                    let argument = directive.argument().unwrap_or_default();
                    let text = ChordDefinition::from_define_argument(argument)
                        .map_or_else(|| argument.to_string(), |definition| definition.to_string());
                    result.push(self.chordpro.directive("comment", Some(text)).add_annotations(annotations));
                    continue;
                }
                EntryKind::Directive(directive) if directive.is("start_of_bridge") => {
                    EntryKind::Directive(directive.renamed("start_of_verse", preference))
                }
                EntryKind::Directive(directive) if directive.is("end_of_bridge") => {
                    EntryKind::Directive(directive.renamed("end_of_verse", preference))
                }
                EntryKind::Directive(directive) if directive.is("tempo") => {
                    let tempo = directive
                        .argument()
                        .map(|argument| format!("Tempo: {}", argument));
                    result.push(Entry::new(EntryKind::Directive(directive)).add_annotations(annotations));
                    if let Some(tempo) = tempo {
                        result.push(self.chordpro.directive("comment", Some(tempo)));
                    }
                    continue;
                }
                EntryKind::Section(section) => {
                    let entries = self.adapt(section.into_entries());
                    result.push(Entry::section(entries).add_annotations(annotations));
                    continue;
                }
                EntryKind::Composite(entries) => EntryKind::Composite(self.adapt(entries)),
                kind => kind,
            };
            result.push(Entry::new(kind).add_annotations(annotations));
        }

        result
    }
}

impl Transformer for MobileSheetsTransformer {
    fn transform_entries(&self, entries: &[Entry]) -> Vec<Entry> {
        self.adapt(self.chordpro.transform_entries(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::assert_transformed;

    #[test]
    fn test_mobilesheets_subset() {
        let input = r#"
{title: Song}
{tempo: 96}
{define: Am base-fret 1 frets x 0 2 2 1 0}
{start_of_bridge: Middle}
[Am]la
{end_of_bridge}
"#;
        let expected = r#"
{title: Song}
{tempo: 96}
{comment: Tempo: 96}
{comment: Am x02210}
{start_of_verse: Middle}
[Am]la
{end_of_verse}
"#;
        assert_transformed(input, &MobileSheetsTransformer::default(), expected);
    }

    #[test]
    fn test_headers_and_fret_lines() {
        let input = r#"
[Bridge]
Em 12-14-14-13-12-12
"#;
        let expected = r#"
{sov: Bridge}
{c: Em 12-14-14-13-12-12}
{eov}
"#;
        assert_transformed(
            input,
            &MobileSheetsTransformer::new(DirectiveNamePreference::Short),
            expected,
        );
    }
}
