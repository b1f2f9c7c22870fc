use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    WhiteSpace,
    /// Text between `[` and `]`, brackets stripped.
    Bracketed,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub index: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind, index: usize) -> Self {
        Self {
            text: text.into(),
            kind,
            index,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::WhiteSpace
    }

    pub fn width(&self) -> usize {
        match self.kind {
            TokenKind::Bracketed => self.text.chars().count() + 2,
            _ => self.text.chars().count(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Bracketed => write!(f, "[{}]", self.text),
            _ => write!(f, "{}", self.text),
        }
    }
}

/// Splits a single line into whitespace, bracketed and text tokens.
///
/// Every line tokenizes completely: an unterminated `[` turns the rest of the
/// line into a single `Text` token.
pub struct Tokenizer {
    chars: Vec<char>,
    position: usize,
    current: Option<Token>,
}

impl Tokenizer {
    pub fn new(line: &str) -> Self {
        Self {
            chars: line.chars().collect(),
            position: 0,
            current: None,
        }
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Returns `false` at end of line.
    pub fn read(&mut self) -> bool {
        let start = self.position;
        let Some(&first) = self.chars.get(start) else {
            self.current = None;
            return false;
        };

        let token = if first.is_whitespace() {
            self.advance_while(|c| c.is_whitespace());
            Token::new(self.slice(start, self.position), TokenKind::WhiteSpace, start)
        } else if first == '[' {
            match self.chars[start + 1..].iter().position(|&c| c == ']') {
                Some(offset) => {
                    let close = start + 1 + offset;
                    self.position = close + 1;
                    Token::new(self.slice(start + 1, close), TokenKind::Bracketed, start)
                }
                None => {
                    self.position = self.chars.len();
                    Token::new(self.slice(start, self.position), TokenKind::Text, start)
                }
            }
        } else {
            self.position += 1;
            self.advance_while(|c| !c.is_whitespace() && c != '[');
            Token::new(self.slice(start, self.position), TokenKind::Text, start)
        };

        self.current = Some(token);
        true
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self
            .chars
            .get(self.position)
            .is_some_and(|&c| predicate(c))
        {
            self.position += 1;
        }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.read() {
            self.current.clone()
        } else {
            None
        }
    }
}

pub fn tokenize(line: &str) -> Vec<Token> {
    Tokenizer::new(line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(line: &str) -> Vec<(TokenKind, String, usize)> {
        tokenize(line)
            .into_iter()
            .map(|t| (t.kind, t.text, t.index))
            .collect()
    }

    #[test]
    fn test_tokenize_mixed_line() {
        assert_eq!(
            kinds("[A]All  right[G7] now"),
            vec![
                (TokenKind::Bracketed, "A".to_string(), 0),
                (TokenKind::Text, "All".to_string(), 3),
                (TokenKind::WhiteSpace, "  ".to_string(), 6),
                (TokenKind::Text, "right".to_string(), 8),
                (TokenKind::Bracketed, "G7".to_string(), 13),
                (TokenKind::WhiteSpace, " ".to_string(), 17),
                (TokenKind::Text, "now".to_string(), 18),
            ]
        );
    }

    #[test]
    fn test_unterminated_bracket_is_text() {
        assert_eq!(
            kinds("la [Am no close"),
            vec![
                (TokenKind::Text, "la".to_string(), 0),
                (TokenKind::WhiteSpace, " ".to_string(), 2),
                (TokenKind::Text, "[Am no close".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_read_and_current_token() {
        let mut tokenizer = Tokenizer::new("C  G");
        assert!(tokenizer.current_token().is_none());
        assert!(tokenizer.read());
        assert_eq!(tokenizer.current_token().map(|t| t.text.as_str()), Some("C"));
        assert!(tokenizer.read());
        assert!(tokenizer.current_token().is_some_and(Token::is_whitespace));
        assert!(tokenizer.read());
        assert!(!tokenizer.read());
        assert!(tokenizer.current_token().is_none());
    }

    #[test]
    fn test_tokens_reconstruct_line() {
        for line in [
            "",
            "   ",
            "[Verse 1]",
            "{title: Hello [x] world}",
            "  e|--0--[2]--|  ",
            "[*rit.] slowly[",
            "a]b[c]]d",
            "\tC\t G ",
        ] {
            let rebuilt: String = tokenize(line).iter().map(|t| t.to_string()).collect();
            assert_eq!(rebuilt, line);
        }
    }

    #[test]
    fn test_width_counts_brackets() {
        let tokens = tokenize("[Am]x");
        assert_eq!(tokens[0].width(), 4);
        assert_eq!(tokens[1].index, 4);
    }
}
