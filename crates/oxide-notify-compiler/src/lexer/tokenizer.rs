//! SQL tokenizer.

use super::{CommentStyle, Keyword, Span, Token, TokenKind};

/// A lexer over `.sq` source text.
///
/// The statement parser pulls tokens with [`Lexer::next_token`], which skips
/// comments and whitespace. The source-file parser needs those as sibling
/// nodes, so it pulls with [`Lexer::next_token_with_trivia`] instead.
#[derive(Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    /// Start of the token being scanned.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn scan_whitespace(&mut self) -> Token {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
        self.make_token(TokenKind::Whitespace)
    }

    /// Scans `-- ...` up to, not including, the newline.
    fn scan_line_comment(&mut self) -> Token {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
        let text = &self.input[self.start..self.pos];
        self.make_token(TokenKind::Comment(
            CommentStyle::Line,
            text.trim_end_matches('\r').to_string(),
        ))
    }

    fn scan_block_comment(&mut self) -> Token {
        self.advance(); // /
        self.advance(); // *
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    break;
                }
                Some(_) => {}
                None => {
                    return self.make_token(TokenKind::Error(String::from(
                        "Unterminated block comment",
                    )));
                }
            }
        }
        let text = &self.input[self.start..self.pos];
        self.make_token(TokenKind::Comment(CommentStyle::Block, text.to_string()))
    }

    fn scan_identifier(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match Keyword::from_str(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier(text.to_string())),
        }
    }

    /// Scans a quoted identifier (`"column name"`, `` `column` `` or `[column]`).
    fn scan_quoted_identifier(&mut self, open: char, close: char) -> Token {
        self.advance();
        let mut value = String::new();

        loop {
            match self.advance() {
                Some(c) if c == close => {
                    // A doubled closing quote is an escaped quote.
                    if open != '[' && self.peek() == Some(close) {
                        self.advance();
                        value.push(close);
                    } else {
                        break;
                    }
                }
                Some(c) => value.push(c),
                None => {
                    return self.make_token(TokenKind::Error(String::from(
                        "Unterminated quoted identifier",
                    )));
                }
            }
        }

        self.make_token(TokenKind::Identifier(value))
    }

    fn scan_number(&mut self) -> Token {
        let mut is_float = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            is_float = true;
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.input[self.start..self.pos];
        if is_float {
            match text.parse::<f64>() {
                Ok(f) => self.make_token(TokenKind::Float(f)),
                Err(e) => self.make_token(TokenKind::Error(format!("Invalid float: {e}"))),
            }
        } else {
            match text.parse::<i64>() {
                Ok(i) => self.make_token(TokenKind::Integer(i)),
                Err(e) => self.make_token(TokenKind::Error(format!("Invalid integer: {e}"))),
            }
        }
    }

    fn scan_string(&mut self) -> Token {
        self.advance();
        let mut value = String::new();

        loop {
            match self.advance() {
                Some('\'') => {
                    if self.peek() == Some('\'') {
                        self.advance();
                        value.push('\'');
                    } else {
                        break;
                    }
                }
                Some(c) => value.push(c),
                None => {
                    return self.make_token(TokenKind::Error(String::from(
                        "Unterminated string literal",
                    )));
                }
            }
        }

        self.make_token(TokenKind::String(value))
    }

    /// Scans a blob literal (`X'...'`).
    fn scan_blob(&mut self) -> Token {
        self.advance(); // X
        self.advance(); // '
        let mut hex = String::new();

        loop {
            match self.advance() {
                Some('\'') => break,
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                Some(_) => {
                    return self.make_token(TokenKind::Error(String::from(
                        "Invalid character in blob literal",
                    )));
                }
                None => {
                    return self
                        .make_token(TokenKind::Error(String::from("Unterminated blob literal")));
                }
            }
        }

        if hex.len() % 2 != 0 {
            return self.make_token(TokenKind::Error(String::from(
                "Odd number of hex digits in blob literal",
            )));
        }

        let bytes = hex
            .as_bytes()
            .chunks(2)
            .filter_map(|pair| {
                core::str::from_utf8(pair)
                    .ok()
                    .and_then(|s| u8::from_str_radix(s, 16).ok())
            })
            .collect();
        self.make_token(TokenKind::Blob(bytes))
    }

    /// Scans the next token, including comments and whitespace.
    pub fn next_token_with_trivia(&mut self) -> Token {
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            c if c.is_whitespace() => return self.scan_whitespace(),
            '-' if self.peek_next() == Some('-') => return self.scan_line_comment(),
            '/' if self.peek_next() == Some('*') => return self.scan_block_comment(),
            '\'' => return self.scan_string(),
            '"' => return self.scan_quoted_identifier('"', '"'),
            '`' => return self.scan_quoted_identifier('`', '`'),
            '[' => return self.scan_quoted_identifier('[', ']'),
            'X' | 'x' if self.peek_next() == Some('\'') => return self.scan_blob(),
            c if c.is_ascii_digit() => return self.scan_number(),
            c if c.is_alphabetic() || c == '_' => return self.scan_identifier(),
            _ => {}
        }

        self.advance();
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '~' => TokenKind::BitNot,
            '&' => TokenKind::BitAnd,
            '=' => {
                // SQLite accepts `==` as equality.
                if self.peek() == Some('=') {
                    self.advance();
                }
                TokenKind::Eq
            }
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    TokenKind::LtEq
                }
                Some('>') => {
                    self.advance();
                    TokenKind::NotEq
                }
                Some('<') => {
                    self.advance();
                    TokenKind::LeftShift
                }
                _ => TokenKind::Lt,
            },
            '>' => match self.peek() {
                Some('=') => {
                    self.advance();
                    TokenKind::GtEq
                }
                Some('>') => {
                    self.advance();
                    TokenKind::RightShift
                }
                _ => TokenKind::Gt,
            },
            '!' if self.peek() == Some('=') => {
                self.advance();
                TokenKind::NotEq
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    TokenKind::Concat
                } else {
                    TokenKind::BitOr
                }
            }
            other => TokenKind::Error(format!("Unexpected character: {other}")),
        };
        self.make_token(kind)
    }

    /// Scans the next significant token, skipping comments and whitespace.
    pub fn next_token(&mut self) -> Token {
        loop {
            let token = self.next_token_with_trivia();
            if !token.kind.is_trivia() {
                return token;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every token up to and including `Eof`, trivia skipped.
    fn tokenize(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                return tokens;
            }
        }
    }

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn trivia_kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut kinds = Vec::new();
        loop {
            let token = lexer.next_token_with_trivia();
            if token.is_eof() {
                return kinds;
            }
            kinds.push(token.kind);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(token_kinds(""), vec![TokenKind::Eof]);
        assert_eq!(token_kinds("  \n\t "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            token_kinds("SELECT -- comment\n/* block */ FROM"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_trivia_is_preserved() {
        assert_eq!(
            trivia_kinds("-- @CustomKey all_users\nselectAll:"),
            vec![
                TokenKind::Comment(CommentStyle::Line, String::from("-- @CustomKey all_users")),
                TokenKind::Whitespace,
                TokenKind::Identifier(String::from("selectAll")),
                TokenKind::Colon,
            ]
        );
    }

    #[test]
    fn test_line_comment_drops_carriage_return() {
        assert_eq!(
            trivia_kinds("-- note\r\n"),
            vec![
                TokenKind::Comment(CommentStyle::Line, String::from("-- note")),
                TokenKind::Whitespace,
            ]
        );
    }

    #[test]
    fn test_block_comment_text() {
        assert_eq!(
            trivia_kinds("/* a\n b */"),
            vec![TokenKind::Comment(
                CommentStyle::Block,
                String::from("/* a\n b */")
            )]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert!(matches!(
            trivia_kinds("/* open").as_slice(),
            [TokenKind::Error(_)]
        ));
    }

    #[test]
    fn test_identifiers_and_quoted_identifiers() {
        assert_eq!(
            token_kinds("foo _bar \"two words\" `tick` [bracket]"),
            vec![
                TokenKind::Identifier(String::from("foo")),
                TokenKind::Identifier(String::from("_bar")),
                TokenKind::Identifier(String::from("two words")),
                TokenKind::Identifier(String::from("tick")),
                TokenKind::Identifier(String::from("bracket")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            token_kinds("42 3.5 1e3"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Float(3.5),
                TokenKind::Float(1e3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_strings_and_blobs() {
        assert_eq!(
            token_kinds("'it''s' X'0aFF'"),
            vec![
                TokenKind::String(String::from("it's")),
                TokenKind::Blob(vec![0x0a, 0xff]),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            token_kinds("= == != <> <= >= << >> || |"),
            vec![
                TokenKind::Eq,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::LeftShift,
                TokenKind::RightShift,
                TokenKind::Concat,
                TokenKind::BitOr,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_named_parameter_and_braces() {
        assert_eq!(
            token_kinds("{ :id ? }"),
            vec![
                TokenKind::LeftBrace,
                TokenKind::Colon,
                TokenKind::Identifier(String::from("id")),
                TokenKind::Question,
                TokenKind::RightBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("SELECT id");
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens[1].span, Span::new(7, 9));
    }
}
