use crate::types::directive::{END_PREFIX, START_PREFIX};
use crate::types::entry::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    Implicit,
    Explicit,
}

pub fn group_by_environment(
    entries: Vec<Entry>,
    environment: &str,
    is_member: fn(&Entry) -> bool,
) -> Vec<Entry> {
    let start = format!("{}{}", START_PREFIX, environment);
    let end = format!("{}{}", END_PREFIX, environment);

    let mut result = Vec::with_capacity(entries.len());
    let mut run = Vec::new();
    let mut state = State::Outside;

    for entry in entries {
        if state == State::Implicit && !is_member(&entry) {
            run.push(Entry::directive(&end, None));
            result.push(Entry::section(std::mem::take(&mut run)));
            state = State::Outside;
        }

        match state {
            State::Outside if entry.is_directive(&start) => {
                state = State::Explicit;
                result.push(entry);
            }
            State::Outside if is_member(&entry) => {
                state = State::Implicit;
                run.push(Entry::directive(&start, None));
                run.push(entry);
            }
            State::Outside => result.push(entry),
            State::Implicit => run.push(entry),
            State::Explicit => {
                if entry.is_directive(&end) {
                    state = State::Outside;
                }
                result.push(entry);
            }
        }
    }

    match state {
        State::Implicit => {
            run.push(Entry::directive(&end, None));
            result.push(Entry::section(run));
        }
        State::Explicit => result.push(Entry::directive(&end, None)),
        State::Outside => {}
    }

    result
}
