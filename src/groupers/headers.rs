use crate::types::entry::Entry;

pub fn group(entries: Vec<Entry>) -> Vec<Entry> {
    if !entries.iter().any(Entry::is_header) {
        return entries;
    }

    let mut result = Vec::new();
    let mut section: Option<Vec<Entry>> = None;

    for entry in entries {
        if entry.is_header() {
            close(section.take(), &mut result);
            section = Some(vec![entry]);
            continue;
        }
        match section.as_mut() {
            Some(section) => section.push(entry),
            None => result.push(entry),
        }
    }
    close(section, &mut result);

    result
}

fn close(section: Option<Vec<Entry>>, result: &mut Vec<Entry>) {
    match section {
        Some(mut entries) if entries.len() == 1 => result.extend(entries.pop()),
        Some(entries) => result.push(Entry::section(entries)),
        None => {}
    }
}
