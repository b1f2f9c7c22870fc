use crate::types::chord::Chord;
use std::fmt;

/// A chord shape: one optional fret per string, `None` for an unplayed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordDefinition {
    chord: Chord,
    frets: Vec<Option<u8>>,
}

impl ChordDefinition {
    pub const MIN_POSITIONS: usize = 4;

    const DIAGRAM_FRETS: u8 = 4;

    pub fn new(chord: Chord, frets: Vec<Option<u8>>) -> Option<Self> {
        if frets.len() < Self::MIN_POSITIONS || frets.iter().all(Option::is_none) {
            return None;
        }
        Some(Self { chord, frets })
    }

    pub fn try_parse(name: &str, frets: &str) -> Option<Self> {
        let chord = Chord::try_parse(name)?;
        Self::new(chord, parse_frets(frets)?)
    }

    pub fn chord(&self) -> &Chord {
        &self.chord
    }

    pub fn frets(&self) -> &[Option<u8>] {
        &self.frets
    }

    pub fn frets_to_string(&self) -> String {
        let dashed = self.frets.iter().flatten().any(|&fret| fret >= 10);
        let positions: Vec<String> = self
            .frets
            .iter()
            .map(|fret| fret.map_or_else(|| "x".to_string(), |f| f.to_string()))
            .collect();
        if dashed {
            positions.join("-")
        } else {
            positions.concat()
        }
    }

    /// Shapes above the fourth fret get a base fret, with the frets relative to it.
    pub fn to_define_argument(&self) -> String {
        let played: Vec<u8> = self.frets.iter().flatten().copied().filter(|&f| f > 0).collect();
        let highest = played.iter().copied().max().unwrap_or(0);
        let base = if highest > Self::DIAGRAM_FRETS {
            played.iter().copied().min().unwrap_or(1)
        } else {
            1
        };

        let frets: Vec<String> = self
            .frets
            .iter()
            .map(|fret| match fret {
                None => "x".to_string(),
                Some(0) => "0".to_string(),
                Some(f) => (f - base + 1).to_string(),
            })
            .collect();

        format!(
            "{} base-fret {} frets {}",
            self.chord.name(),
            base,
            frets.join(" ")
        )
    }

    pub fn from_define_argument(argument: &str) -> Option<Self> {
        let mut words = argument.split_whitespace();
        let chord = Chord::try_parse(words.next()?)?;

        let mut base: u8 = 1;
        let mut relative = Vec::new();
        let mut in_frets = false;
        for word in words {
            match word {
                "base-fret" => in_frets = false,
                "frets" => in_frets = true,
                "fingers" | "keys" | "display" | "format" | "diagram" | "copy" => break,
                _ if in_frets => relative.push(parse_define_fret(word)?),
                _ => base = word.parse().ok()?,
            }
        }

        let frets = relative
            .into_iter()
            .map(|fret| match fret {
                Some(f) if f > 0 => f.checked_add(base.saturating_sub(1)),
                other => other,
            })
            .collect();
        Self::new(chord, frets)
    }
}

fn parse_define_fret(word: &str) -> Option<Option<u8>> {
    match word {
        "x" | "X" | "N" | "-1" => Some(None),
        _ => word.parse::<u8>().ok().map(Some),
    }
}

fn parse_position(position: &str) -> Option<Option<u8>> {
    match position {
        "x" | "X" => Some(None),
        _ if !position.is_empty()
            && position.len() <= 2
            && position.chars().all(|c| c.is_ascii_digit()) =>
        {
            position.parse::<u8>().ok().map(Some)
        }
        _ => None,
    }
}

pub fn parse_frets(frets: &str) -> Option<Vec<Option<u8>>> {
    if frets.contains('-') {
        frets.split('-').map(parse_position).collect()
    } else {
        frets
            .chars()
            .map(|c| parse_position(c.encode_utf8(&mut [0; 4])))
            .collect()
    }
}

impl fmt::Display for ChordDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.chord, self.frets_to_string())
    }
}
