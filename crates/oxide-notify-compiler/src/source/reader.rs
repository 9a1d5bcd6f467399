//! Splits a source file into sibling nodes.

use super::{Comment, NamedStatement, Node, SqlStatement, StatementBody};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};
use crate::parser::{ParseError, Parser};

/// Reads every top-level node of `source`.
pub(super) fn read(source: &str) -> Result<Vec<Node>, ParseError> {
    Reader {
        source,
        lexer: Lexer::new(source),
    }
    .read_nodes()
}

struct Reader<'a> {
    source: &'a str,
    lexer: Lexer<'a>,
}

impl Reader<'_> {
    fn read_nodes(mut self) -> Result<Vec<Node>, ParseError> {
        let mut nodes = vec![];
        loop {
            let token = self.next()?;
            let node = match token.kind {
                TokenKind::Eof => return Ok(nodes),
                TokenKind::Comment(style, text) => Node::Comment(Comment {
                    style,
                    text,
                    span: token.span,
                }),
                TokenKind::Whitespace => Node::Whitespace(token.span),
                // Labels may be keywords: `insert:` and `delete:` are common.
                TokenKind::Identifier(_) | TokenKind::Keyword(_) => {
                    match self.peek_significant().kind {
                        TokenKind::Colon => {
                            let name = self.label(&token);
                            Node::Statement(self.read_single(name, token.span)?)
                        }
                        TokenKind::LeftBrace => {
                            let name = self.label(&token);
                            Node::Statement(self.read_block(name, token.span)?)
                        }
                        _ => Node::Other(self.read_other(&token)?),
                    }
                }
                _ => Node::Other(self.read_other(&token)?),
            };
            nodes.push(node);
        }
    }

    fn label(&self, token: &Token) -> String {
        match &token.kind {
            TokenKind::Identifier(name) => name.clone(),
            _ => token.span.slice(self.source).to_string(),
        }
    }

    /// `name: <sql>;`, with the lexer positioned after `name`.
    fn read_single(&mut self, name: String, label: Span) -> Result<NamedStatement, ParseError> {
        let colon = self.next_significant()?;
        let (statement, terminator) = self.read_sql(colon.span.end, false)?;
        Ok(NamedStatement {
            name,
            body: StatementBody::Single(statement),
            span: label.merge(terminator),
        })
    }

    /// `name { <sql>; ... }`, with the lexer positioned after `name`.
    fn read_block(&mut self, name: String, label: Span) -> Result<NamedStatement, ParseError> {
        let open = self.next_significant()?;
        let mut start = open.span.end;
        let mut statements = vec![];

        let close = loop {
            match self.peek_significant().kind {
                TokenKind::RightBrace => break self.next_significant()?,
                TokenKind::Eof => {
                    let eof = self.next_significant()?;
                    return Err(ParseError::unexpected("'}'", eof.kind, eof.span));
                }
                _ => {
                    let (statement, terminator) = self.read_sql(start, true)?;
                    start = terminator.end;
                    statements.push(statement);
                }
            }
        };

        let mut end = close.span;
        let mut ahead = self.lexer.clone();
        let next = ahead.next_token_with_trivia();
        if next.kind == TokenKind::Semicolon {
            self.lexer = ahead;
            end = next.span;
        }

        Ok(NamedStatement {
            name,
            body: StatementBody::Block(statements),
            span: label.merge(end),
        })
    }

    /// Reads statement text from `start` up to its `;` and parses it.
    /// Returns the statement and the span of the `;`.
    fn read_sql(&mut self, start: usize, in_block: bool) -> Result<(SqlStatement, Span), ParseError> {
        let mut depth = 0usize;
        let terminator = loop {
            let token = self.next_significant()?;
            match token.kind {
                TokenKind::Semicolon if depth == 0 => break token.span,
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                TokenKind::RightBrace if in_block && depth == 0 => {
                    return Err(ParseError::unexpected("';'", token.kind, token.span));
                }
                TokenKind::Eof => {
                    return Err(ParseError::unexpected("';'", token.kind, token.span));
                }
                _ => {}
            }
        };

        let text = &self.source[start..terminator.start];
        let leading = text.len() - text.trim_start().len();
        let sql = text.trim();
        let span_start = start + leading;

        // Spans inside the statement are relative to `sql`.
        let statement = Parser::new(sql)
            .parse_single()
            .map_err(|e| e.offset(span_start))?;
        Ok((
            SqlStatement {
                sql: sql.to_string(),
                statement,
                span: Span::new(span_start, span_start + sql.len()),
            },
            terminator,
        ))
    }

    /// Skips an unlabeled statement through its `;` or the end of input.
    /// `BEGIN ... END` bodies (triggers) may contain `;`.
    fn read_other(&mut self, first: &Token) -> Result<Span, ParseError> {
        let mut span = first.span;
        let mut depth = 0usize;
        let mut token = first.clone();
        loop {
            match &token.kind {
                TokenKind::Semicolon if depth == 0 => return Ok(span),
                TokenKind::Eof => return Ok(span),
                TokenKind::LeftParen | TokenKind::Keyword(Keyword::Case) => depth += 1,
                TokenKind::Identifier(word) if word.eq_ignore_ascii_case("BEGIN") => depth += 1,
                TokenKind::RightParen | TokenKind::Keyword(Keyword::End) => {
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
            span = span.merge(token.span);

            let mut ahead = self.lexer.clone();
            let next = ahead.next_token();
            if let TokenKind::Error(message) = next.kind {
                return Err(ParseError::new(message, next.span));
            }
            if next.is_eof() {
                return Ok(span);
            }
            self.lexer = ahead;
            token = next;
        }
    }

    fn next(&mut self) -> Result<Token, ParseError> {
        let token = self.lexer.next_token_with_trivia();
        match token.kind {
            TokenKind::Error(message) => Err(ParseError::new(message, token.span)),
            _ => Ok(token),
        }
    }

    fn next_significant(&mut self) -> Result<Token, ParseError> {
        let token = self.lexer.next_token();
        match token.kind {
            TokenKind::Error(message) => Err(ParseError::new(message, token.span)),
            _ => Ok(token),
        }
    }

    fn peek_significant(&self) -> Token {
        self.lexer.clone().next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Statement;

    fn named(nodes: &[Node]) -> Vec<&NamedStatement> {
        nodes
            .iter()
            .filter_map(|node| match node {
                Node::Statement(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_statement() {
        let source = "selectAll:\nSELECT *\nFROM users;";
        let nodes = read(source).unwrap();
        assert_eq!(nodes.len(), 1);
        let statement = named(&nodes)[0];
        assert_eq!(statement.name, "selectAll");
        let StatementBody::Single(sql) = &statement.body else {
            panic!("Expected single statement");
        };
        assert_eq!(sql.sql, "SELECT *\nFROM users");
        assert_eq!(sql.span.slice(source), sql.sql);
        assert_eq!(statement.span.slice(source), source);
    }

    #[test]
    fn test_keyword_labels() {
        let nodes = read("insert:\nINSERT INTO t VALUES (1);\ndelete: DELETE FROM t;").unwrap();
        let names: Vec<_> = named(&nodes).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["insert", "delete"]);
    }

    #[test]
    fn test_block_with_trailing_semicolon() {
        let source = "moveMessage {\n  DELETE FROM inbox WHERE id = :id;\n  INSERT INTO archive (id) VALUES (:id);\n};\n";
        let nodes = read(source).unwrap();
        let statement = named(&nodes)[0];
        let StatementBody::Block(statements) = &statement.body else {
            panic!("Expected block");
        };
        assert_eq!(statements.len(), 2);
        assert!(matches!(statements[0].statement, Statement::Delete(_)));
        assert!(matches!(statements[1].statement, Statement::Insert(_)));
        assert!(statement.span.slice(source).ends_with("};"));
        assert!(matches!(nodes.last(), Some(Node::Whitespace(_))));
    }

    #[test]
    fn test_empty_block() {
        let nodes = read("noop { }").unwrap();
        let statement = named(&nodes)[0];
        assert_eq!(statement.body, StatementBody::Block(vec![]));
    }

    #[test]
    fn test_other_nodes() {
        let source = "CREATE TABLE users (\n  id INTEGER PRIMARY KEY\n);\n\
                      CREATE TRIGGER t AFTER INSERT ON users BEGIN SELECT 1; SELECT 2; END;\n\
                      q: SELECT 1;";
        let nodes = read(source).unwrap();
        let others: Vec<_> = nodes
            .iter()
            .filter_map(|node| match node {
                Node::Other(span) => Some(span.slice(source)),
                _ => None,
            })
            .collect();
        assert_eq!(others.len(), 2);
        assert!(others[0].starts_with("CREATE TABLE") && others[0].ends_with(");"));
        assert!(others[1].ends_with("END;"));
        assert_eq!(named(&nodes).len(), 1);
    }

    #[test]
    fn test_missing_semicolon() {
        let err = read("q: SELECT 1").unwrap_err();
        assert_eq!(err.expected.as_deref(), Some("';'"));

        let err = read("b { DELETE FROM t }").unwrap_err();
        assert_eq!(err.found, Some(TokenKind::RightBrace));
    }

    #[test]
    fn test_body_error_position_is_file_relative() {
        let source = "ok: SELECT 1;\nbad: SELECT FROM;";
        let err = read(source).unwrap_err();
        assert_eq!(err.span.slice(source), "FROM");
    }

    #[test]
    fn test_unterminated_comment() {
        assert!(read("/* never closed").is_err());
    }
}
