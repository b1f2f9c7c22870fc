use crate::types::entry::Entry;

pub fn group(entries: Vec<Entry>) -> Vec<Entry> {
    if !entries.iter().any(Entry::is_blank) {
        return entries;
    }

    let mut result = Vec::new();
    let mut run = Vec::new();

    for entry in entries {
        if entry.is_blank() || entry.is_section() {
            close(&mut run, &mut result);
            result.push(entry);
        } else {
            run.push(entry);
        }
    }
    close(&mut run, &mut result);

    result
}

fn close(run: &mut Vec<Entry>, result: &mut Vec<Entry>) {
    if run.len() > 1 {
        result.push(Entry::section(std::mem::take(run)));
    } else {
        result.append(run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groupers::tests::group_lines;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_groups_paragraphs() {
        assert_eq!(
            group_lines("Song\nby me\n\nla\nlo\n\n\nhey\n{soc}", &[group]),
            vec![
                "Section[TitleLine, LyricLine]",
                "BlankLine",
                "Section[LyricLine, LyricLine]",
                "BlankLine",
                "BlankLine",
                "Section[LyricLine, ChordProDirectiveLine]",
            ]
        );
    }

    #[test]
    fn test_sections_bound_runs() {
        let groupers: &[crate::groupers::Grouper] = &[crate::groupers::environments::group, group];
        assert_eq!(
            group_lines("la\n{soc}\nhey\n{eoc}\nlo\n\nend", groupers),
            vec![
                "TitleLine",
                "Section[ChordProDirectiveLine, LyricLine, ChordProDirectiveLine]",
                "LyricLine",
                "BlankLine",
                "LyricLine",
            ]
        );
    }
}
