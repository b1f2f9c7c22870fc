use crate::types::entry::{ChordLyricPair, Entry, EntryKind};

pub fn group(entries: Vec<Entry>) -> Vec<Entry> {
    let mut result = Vec::with_capacity(entries.len());
    let mut entries = entries.into_iter().peekable();

    while let Some(entry) = entries.next() {
        if entry.is_chord_line() {
            if let Some(lyrics) = entries.next_if(Entry::is_lyric_line) {
                let pair = ChordLyricPair::new(entry, lyrics);
                result.push(Entry::new(EntryKind::ChordLyricPair(pair)));
                continue;
            }
        }
        result.push(entry);
    }

    result
}
