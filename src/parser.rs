use crate::document::Document;
use crate::error::ParseError;
use crate::groupers::{DEFAULT_GROUPERS, Grouper, apply_groupers};
use crate::line_context::{LineContext, expand_tabs};
use crate::line_parser::{CHORDPRO_LINE_PARSERS, DEFAULT_LINE_PARSERS, LineParser};
use crate::types::entry::Entry;
use log::debug;
use std::io::BufRead;

pub const DEFAULT_TAB_WIDTH: usize = 8;

#[derive(Clone)]
pub struct ParserConfig {
    pub line_parsers: Vec<LineParser>,
    pub groupers: Vec<Grouper>,
    /// `None` keeps tabs, `Some(0)` deletes them.
    pub tab_width: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            line_parsers: DEFAULT_LINE_PARSERS.to_vec(),
            groupers: DEFAULT_GROUPERS.to_vec(),
            tab_width: Some(DEFAULT_TAB_WIDTH),
        }
    }
}

impl ParserConfig {
    pub fn chordpro() -> Self {
        Self {
            line_parsers: CHORDPRO_LINE_PARSERS.to_vec(),
            ..Self::default()
        }
    }
}

pub fn parse_document(content: &str, config: &ParserConfig) -> Result<Document, ParseError> {
    let mut parser = DocumentParser::new(config.clone());
    parser.parse(content)
}

pub struct DocumentParser {
    config: ParserConfig,
    context: LineContext,
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl DocumentParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            context: LineContext::new(),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse(&mut self, content: &str) -> Result<Document, ParseError> {
        self.parse_lines(content.lines())
    }

    pub fn parse_reader(&mut self, reader: impl BufRead) -> Result<Document, ParseError> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        self.parse_lines(lines)
    }

    pub fn parse_lines<I>(&mut self, lines: I) -> Result<Document, ParseError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let entries = self.parse_entries(lines)?;
        let grouped = apply_groupers(entries, &self.config.groupers);
        Ok(Document::from_entries(grouped))
    }

    pub fn parse_entries<I>(&mut self, lines: I) -> Result<Vec<Entry>, ParseError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.context.reset();
        let mut entries = Vec::new();
        let mut content_index = 0;

        for (line_idx, line) in lines.into_iter().enumerate() {
            let expanded = expand_tabs(line.as_ref(), self.config.tab_width);
            let line = expanded.trim_end();
            if line.trim_start().is_empty() {
                entries.push(Entry::BLANK_LINE);
                continue;
            }

            self.context.load(line_idx + 1, content_index, line);
            content_index += 1;

            let parsed = self
                .config
                .line_parsers
                .iter()
                .find_map(|parser| parser(&mut self.context));
            match parsed {
                Some(entry) => {
                    debug!("Line #{}: {}", line_idx + 1, entry.type_name());
                    entries.push(entry);
                }
                None => {
                    return Err(ParseError::UnparseableLine {
                        line_number: line_idx + 1,
                        text: line.to_string(),
                    });
                }
            }
        }

        Ok(entries)
    }
}
