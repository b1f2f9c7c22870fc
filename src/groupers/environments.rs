use crate::types::entry::Entry;

/// Puts the entries between `{start_of_X}` and `{end_of_X}` into a section,
/// directives included. Environments nest; an end directive only closes the
/// innermost environment when the names match, and environments still open
/// at the end are closed there.
pub fn group(entries: Vec<Entry>) -> Vec<Entry> {
    let mut result = Vec::with_capacity(entries.len());
    let mut open: Vec<(String, Vec<Entry>)> = Vec::new();

    for entry in entries {
        let Some(name) = entry.as_directive().map(|directive| directive.name()) else {
            push(entry, &mut open, &mut result);
            continue;
        };

        if let Some(environment) = name.environment_start() {
            open.push((environment.to_string(), vec![entry]));
            continue;
        }

        let closes = name.environment_end().is_some_and(|environment| {
            open.last()
                .is_some_and(|(current, _)| current == environment)
        });
        match open.pop() {
            Some((_, mut section)) if closes => {
                section.push(entry);
                push(Entry::section(section), &mut open, &mut result);
            }
            Some(current) => {
                open.push(current);
                push(entry, &mut open, &mut result);
            }
            None => result.push(entry),
        }
    }

    while let Some((_, section)) = open.pop() {
        push(Entry::section(section), &mut open, &mut result);
    }

    result
}

fn push(entry: Entry, open: &mut [(String, Vec<Entry>)], result: &mut Vec<Entry>) {
    match open.last_mut() {
        Some((_, section)) => section.push(entry),
        None => result.push(entry),
    }
}
