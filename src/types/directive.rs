use std::fmt;
use std::str::FromStr;

const DIRECTIVES: &[(&str, Option<&str>)] = &[
    ("title", Some("t")),
    ("subtitle", Some("st")),
    ("artist", None),
    ("composer", None),
    ("lyricist", None),
    ("arranger", None),
    ("copyright", None),
    ("album", None),
    ("year", None),
    ("key", None),
    ("time", None),
    ("tempo", None),
    ("duration", None),
    ("capo", None),
    ("meta", None),
    ("comment", Some("c")),
    ("comment_italic", Some("ci")),
    ("comment_box", Some("cb")),
    ("highlight", None),
    ("image", None),
    ("chorus", None),
    ("start_of_chorus", Some("soc")),
    ("end_of_chorus", Some("eoc")),
    ("start_of_verse", Some("sov")),
    ("end_of_verse", Some("eov")),
    ("start_of_bridge", Some("sob")),
    ("end_of_bridge", Some("eob")),
    ("start_of_tab", Some("sot")),
    ("end_of_tab", Some("eot")),
    ("start_of_grid", Some("sog")),
    ("end_of_grid", Some("eog")),
    ("define", None),
    ("chord", None),
    ("new_song", Some("ns")),
    ("new_page", Some("np")),
    ("new_physical_page", Some("npp")),
    ("column_break", Some("colb")),
    ("columns", Some("col")),
    ("grid", Some("g")),
    ("no_grid", Some("ng")),
    ("titles", None),
    ("textfont", Some("tf")),
    ("textsize", Some("ts")),
    ("textcolour", None),
    ("chordfont", Some("cf")),
    ("chordsize", Some("cs")),
    ("chordcolour", None),
    ("tabfont", None),
    ("tabsize", None),
];

const METADATA_DIRECTIVES: &[&str] = &[
    "title",
    "subtitle",
    "artist",
    "composer",
    "lyricist",
    "arranger",
    "copyright",
    "album",
    "year",
    "key",
    "time",
    "tempo",
    "duration",
    "capo",
];

pub const START_PREFIX: &str = "start_of_";
pub const END_PREFIX: &str = "end_of_";

pub fn long_name(name: &str) -> String {
    let lower = name.to_lowercase();
    DIRECTIVES
        .iter()
        .find(|(_, short)| *short == Some(lower.as_str()))
        .map_or(lower, |(long, _)| long.to_string())
}

pub fn short_name(long: &str) -> Option<&'static str> {
    DIRECTIVES
        .iter()
        .find(|(name, _)| *name == long)
        .and_then(|(_, short)| *short)
}

pub fn is_metadata_directive(name: &str) -> bool {
    METADATA_DIRECTIVES.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectiveNamePreference {
    Long,
    Short,
    /// Keep the name as written; synthesized directives use the long name.
    #[default]
    Original,
}

/// Canonical directive identity: long name plus optional `-selector` /
/// `-!selector` condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChordProDirectiveName {
    name: String,
    selector: Option<String>,
    invert: bool,
}

impl ChordProDirectiveName {
    pub fn new(name: &str) -> Self {
        Self {
            name: long_name(name),
            selector: None,
            invert: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn short_name(&self) -> Option<&'static str> {
        short_name(&self.name)
    }

    pub fn environment_start(&self) -> Option<&str> {
        self.name.strip_prefix(START_PREFIX)
    }

    pub fn environment_end(&self) -> Option<&str> {
        self.name.strip_prefix(END_PREFIX)
    }

    fn selector_suffix(&self) -> String {
        match &self.selector {
            Some(selector) if self.invert => format!("-!{}", selector),
            Some(selector) => format!("-{}", selector),
            None => String::new(),
        }
    }
}

impl FromStr for ChordProDirectiveName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, selector) = match s.split_once('-') {
            Some((base, selector)) => (base, Some(selector)),
            None => (s, None),
        };
        if base.is_empty()
            || !base
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_')
        {
            return Err(());
        }

        let (selector, invert) = match selector {
            Some(sel) => match sel.strip_prefix('!') {
                Some(inverted) if !inverted.is_empty() => (Some(inverted.to_string()), true),
                _ if !sel.is_empty() && !sel.starts_with('!') => (Some(sel.to_string()), false),
                _ => return Err(()),
            },
            None => (None, false),
        };

        Ok(Self {
            name: long_name(base),
            selector,
            invert,
        })
    }
}

impl fmt::Display for ChordProDirectiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.selector_suffix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveLine {
    name: ChordProDirectiveName,
    // as written, without the selector
    written: String,
    argument: Option<String>,
}

impl DirectiveLine {
    pub fn new(name: &str, argument: Option<String>) -> Self {
        let name = ChordProDirectiveName::new(name);
        Self {
            written: name.name().to_string(),
            name,
            argument,
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let inner = text.trim().strip_prefix('{')?.strip_suffix('}')?.trim();
        let name_end = inner
            .find(|c: char| c == ':' || c.is_whitespace())
            .unwrap_or(inner.len());
        let written_full = &inner[..name_end];
        let name: ChordProDirectiveName = written_full.parse().ok()?;
        let written = written_full
            .split_once('-')
            .map_or(written_full, |(base, _)| base);

        let rest = inner[name_end..].trim_start();
        let rest = rest.strip_prefix(':').unwrap_or(rest).trim();
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        Some(Self {
            name,
            written: written.to_string(),
            argument,
        })
    }

    pub fn name(&self) -> &ChordProDirectiveName {
        &self.name
    }

    pub fn written_name(&self) -> &str {
        &self.written
    }

    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    pub fn is(&self, long_name: &str) -> bool {
        self.name.name() == long_name
    }

    pub fn with_preference(&self, preference: DirectiveNamePreference) -> Self {
        let written = match preference {
            DirectiveNamePreference::Long => self.name.name().to_string(),
            DirectiveNamePreference::Short => self
                .name
                .short_name()
                .unwrap_or(self.name.name())
                .to_string(),
            DirectiveNamePreference::Original => self.written.clone(),
        };
        Self {
            name: self.name.clone(),
            written,
            argument: self.argument.clone(),
        }
    }

    pub fn renamed(&self, long_name: &str, preference: DirectiveNamePreference) -> Self {
        let renamed = Self {
            name: ChordProDirectiveName {
                name: long_name.to_string(),
                ..self.name.clone()
            },
            written: long_name.to_string(),
            argument: self.argument.clone(),
        };
        renamed.with_preference(preference)
    }
}

impl fmt::Display for DirectiveLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}{}", self.written, self.name.selector_suffix())?;
        if let Some(argument) = &self.argument {
            write!(f, ": {}", argument)?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaDirectiveLine {
    written: String,
    key: String,
    value: String,
}

impl MetaDirectiveLine {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            written: "meta".to_string(),
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn from_directive(directive: &DirectiveLine) -> Option<Self> {
        if !directive.is("meta") || directive.name().selector().is_some() {
            return None;
        }
        let argument = directive.argument()?;
        let (key, value) = argument
            .split_once(char::is_whitespace)
            .map_or((argument, ""), |(key, value)| (key, value.trim()));
        Some(Self {
            written: directive.written_name().to_string(),
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn with_preference(&self, preference: DirectiveNamePreference) -> Self {
        let written = match preference {
            DirectiveNamePreference::Original => self.written.clone(),
            _ => "meta".to_string(),
        };
        Self {
            written,
            ..self.clone()
        }
    }
}

impl fmt::Display for MetaDirectiveLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "{{{}: {}}}", self.written, self.key)
        } else {
            write!(f, "{{{}: {} {}}}", self.written, self.key, self.value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_directive_forms() {
        let d = DirectiveLine::parse("{title: All Right Now}").unwrap();
        assert!(d.is("title"));
        assert_eq!(d.argument(), Some("All Right Now"));
        assert_eq!(d.to_string(), "{title: All Right Now}");

        let d = DirectiveLine::parse("  {soc}  ").unwrap();
        assert!(d.is("start_of_chorus"));
        assert_eq!(d.name().environment_start(), Some("chorus"));
        assert_eq!(d.argument(), None);
        assert_eq!(d.to_string(), "{soc}");

        let d = DirectiveLine::parse("{c:Slowly}").unwrap();
        assert!(d.is("comment"));
        assert_eq!(d.to_string(), "{c: Slowly}");

        let d = DirectiveLine::parse("{Title Hello}").unwrap();
        assert!(d.is("title"));
        assert_eq!(d.argument(), Some("Hello"));
        assert_eq!(d.written_name(), "Title");
    }

    #[test]
    fn test_rejects_non_directives() {
        assert!(DirectiveLine::parse("{}").is_none());
        assert!(DirectiveLine::parse("{title: x").is_none());
        assert!(DirectiveLine::parse("title: x}").is_none());
        assert!(DirectiveLine::parse("{: x}").is_none());
        assert!(DirectiveLine::parse("{tit.le: x}").is_none());
    }

    #[test]
    fn test_selectors() {
        let d = DirectiveLine::parse("{sot-guitar}").unwrap();
        assert!(d.is("start_of_tab"));
        assert_eq!(d.name().selector(), Some("guitar"));
        assert!(!d.name().invert());
        assert_eq!(d.to_string(), "{sot-guitar}");

        let d = DirectiveLine::parse("{textsize-!piano: 12}").unwrap();
        assert!(d.name().invert());
        assert_eq!(d.name().to_string(), "textsize-!piano");
        assert_eq!(d.to_string(), "{textsize-!piano: 12}");

        let plain: ChordProDirectiveName = "ts".parse().unwrap();
        let selected: ChordProDirectiveName = "ts-piano".parse().unwrap();
        let inverted: ChordProDirectiveName = "textsize-!piano".parse().unwrap();
        assert_ne!(plain, selected);
        assert_ne!(selected, inverted);
        assert_eq!(plain, ChordProDirectiveName::new("textsize"));
        assert!("sot-".parse::<ChordProDirectiveName>().is_err());
    }

    #[test]
    fn test_name_preference() {
        let d = DirectiveLine::parse("{Start_Of_Chorus: Refrain}").unwrap();
        assert_eq!(
            d.with_preference(DirectiveNamePreference::Short).to_string(),
            "{soc: Refrain}"
        );
        assert_eq!(
            d.with_preference(DirectiveNamePreference::Long).to_string(),
            "{start_of_chorus: Refrain}"
        );
        assert_eq!(
            d.with_preference(DirectiveNamePreference::Original).to_string(),
            "{Start_Of_Chorus: Refrain}"
        );

        let no_short = DirectiveLine::new("artist", Some("Free".into()));
        assert_eq!(
            no_short.with_preference(DirectiveNamePreference::Short).to_string(),
            "{artist: Free}"
        );
    }

    #[test]
    fn test_renamed_keeps_argument() {
        let d = DirectiveLine::parse("{sob: Middle 8}").unwrap();
        let renamed = d.renamed("start_of_verse", DirectiveNamePreference::Short);
        assert_eq!(renamed.to_string(), "{sov: Middle 8}");
    }

    #[test]
    fn test_meta_directive() {
        let d = DirectiveLine::parse("{meta: tuning Drop D}").unwrap();
        let meta = MetaDirectiveLine::from_directive(&d).unwrap();
        assert_eq!(meta.key(), "tuning");
        assert_eq!(meta.value(), "Drop D");
        assert_eq!(meta.to_string(), "{meta: tuning Drop D}");
        assert!(MetaDirectiveLine::from_directive(&DirectiveLine::parse("{meta}").unwrap()).is_none());
    }

    #[test]
    fn test_name_tables() {
        assert_eq!(long_name("SOT"), "start_of_tab");
        assert_eq!(long_name("x_custom"), "x_custom");
        assert_eq!(short_name("comment"), Some("c"));
        assert_eq!(short_name("artist"), None);
        assert!(is_metadata_directive("capo"));
        assert!(!is_metadata_directive("comment"));
    }
}
