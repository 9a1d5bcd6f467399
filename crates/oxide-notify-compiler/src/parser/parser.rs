//! SQL statement parser.

use super::error::ParseError;
use super::pratt::{
    infix_binding_power, prefix_binding_power, token_to_binary_op, token_to_unary_op,
};
use crate::ast::{
    Assignment, BinaryOp, ConflictResolution, DeleteStatement, Expr, FunctionCall, InList,
    InsertSource, InsertStatement, JoinClause, JoinType, Literal, NullOrdering, OrderBy,
    OrderDirection, Parameter, SelectColumn, SelectStatement, Statement, TableRef,
    UpdateStatement, Upsert, UpsertAction,
};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};

/// Parser for a single SQL statement.
pub struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    current: Token,
    /// End offset of the last consumed token.
    previous_end: usize,
    /// Counter for `?` placeholders.
    param_counter: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            input,
            lexer,
            current,
            previous_end: 0,
            param_counter: 0,
        }
    }

    /// Parses one SQL statement, leaving any following tokens unread.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input does not start with a valid
    /// SELECT, INSERT, REPLACE, UPDATE or DELETE statement.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Select) => {
                Ok(Statement::Select(self.parse_select_statement()?))
            }
            TokenKind::Keyword(Keyword::Insert) => {
                Ok(Statement::Insert(self.parse_insert_statement()?))
            }
            TokenKind::Identifier(word) if word.eq_ignore_ascii_case("REPLACE") => {
                Ok(Statement::Insert(self.parse_insert_statement()?))
            }
            TokenKind::Keyword(Keyword::Update) => {
                Ok(Statement::Update(self.parse_update_statement()?))
            }
            TokenKind::Keyword(Keyword::Delete) => {
                Ok(Statement::Delete(self.parse_delete_statement()?))
            }
            _ => Err(self.unexpected("SELECT, INSERT, REPLACE, UPDATE, or DELETE")),
        }
    }

    /// Parses exactly one statement, optionally followed by `;`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the statement is invalid or anything but a
    /// semicolon follows it.
    pub fn parse_single(&mut self) -> Result<Statement, ParseError> {
        let statement = self.parse_statement()?;
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        if !self.current.is_eof() {
            return Err(self.unexpected("end of statement"));
        }
        Ok(statement)
    }

    fn parse_select_statement(&mut self) -> Result<SelectStatement, ParseError> {
        self.expect_keyword(Keyword::Select)?;

        let distinct = if self.check_keyword(Keyword::Distinct) {
            self.advance();
            true
        } else {
            if self.check_keyword(Keyword::All) {
                self.advance();
            }
            false
        };

        let columns = self.parse_select_columns()?;

        let from = if self.check_keyword(Keyword::From) {
            self.advance();
            Some(self.parse_table_ref()?)
        } else {
            None
        };

        let where_clause = self.parse_optional_where()?;

        let group_by = if self.check_keyword(Keyword::Group) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            self.parse_expression_list()?
        } else {
            vec![]
        };

        let having = if self.check_keyword(Keyword::Having) {
            self.advance();
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        let order_by = if self.check_keyword(Keyword::Order) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            vec![]
        };

        let (limit, offset) = self.parse_limit()?;

        Ok(SelectStatement {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            having,
            order_by,
            limit,
            offset,
        })
    }

    fn parse_select_columns(&mut self) -> Result<Vec<SelectColumn>, ParseError> {
        let mut columns = vec![];
        loop {
            let expr = self.parse_expression(0)?;
            let alias = self.parse_optional_alias()?;
            columns.push(SelectColumn { expr, alias });

            if !self.check(&TokenKind::Comma) {
                return Ok(columns);
            }
            self.advance();
        }
    }

    /// `LIMIT n [OFFSET m]` or SQLite's `LIMIT m, n`.
    fn parse_limit(&mut self) -> Result<(Option<Expr>, Option<Expr>), ParseError> {
        if !self.check_keyword(Keyword::Limit) {
            return Ok((None, None));
        }
        self.advance();
        let first = self.parse_expression(0)?;

        if self.check(&TokenKind::Comma) {
            self.advance();
            let count = self.parse_expression(0)?;
            return Ok((Some(count), Some(first)));
        }

        let offset = if self.check_keyword(Keyword::Offset) {
            self.advance();
            Some(self.parse_expression(0)?)
        } else {
            None
        };
        Ok((Some(first), offset))
    }

    /// Parses a FROM list: table references joined by JOIN clauses or commas.
    fn parse_table_ref(&mut self) -> Result<TableRef, ParseError> {
        let mut table_ref = self.parse_table_primary()?;

        loop {
            let join_type = if self.check(&TokenKind::Comma) {
                self.advance();
                JoinType::Cross
            } else if self.is_join_keyword() {
                self.parse_join_type()?
            } else {
                return Ok(table_ref);
            };

            let table = self.parse_table_primary()?;

            let (on, using) = if self.check_keyword(Keyword::On) {
                self.advance();
                (Some(self.parse_expression(0)?), vec![])
            } else if self.check_keyword(Keyword::Using) {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let columns = self.parse_identifier_list()?;
                self.expect(&TokenKind::RightParen)?;
                (None, columns)
            } else if join_type == JoinType::Cross {
                (None, vec![])
            } else {
                return Err(ParseError::new(
                    "Expected ON or USING clause",
                    self.current.span,
                ));
            };

            table_ref = TableRef::Join {
                left: Box::new(table_ref),
                join: Box::new(JoinClause {
                    join_type,
                    table,
                    on,
                    using,
                }),
            };
        }
    }

    fn parse_table_primary(&mut self) -> Result<TableRef, ParseError> {
        if self.check(&TokenKind::LeftParen) {
            self.advance();
            if self.check_keyword(Keyword::Select) {
                let query = self.parse_select_statement()?;
                self.expect(&TokenKind::RightParen)?;
                let alias = self.parse_optional_alias()?;
                return Ok(TableRef::Subquery {
                    query: Box::new(query),
                    alias,
                });
            }
            let inner = self.parse_table_ref()?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(inner);
        }

        let (schema, name) = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;
        Ok(TableRef::Table {
            schema,
            name,
            alias,
        })
    }

    /// Parses `name` or `schema.name`.
    fn parse_qualified_name(&mut self) -> Result<(Option<String>, String), ParseError> {
        let first = self.expect_identifier()?;
        if self.check(&TokenKind::Dot) {
            self.advance();
            let name = self.expect_identifier()?;
            Ok((Some(first), name))
        } else {
            Ok((None, first))
        }
    }

    fn is_join_keyword(&self) -> bool {
        matches!(
            &self.current.kind,
            TokenKind::Keyword(
                Keyword::Join
                    | Keyword::Inner
                    | Keyword::Left
                    | Keyword::Right
                    | Keyword::Full
                    | Keyword::Cross
            )
        )
    }

    fn parse_join_type(&mut self) -> Result<JoinType, ParseError> {
        let join_type = match self.current.as_keyword() {
            Some(Keyword::Join) => return self.advance_then(JoinType::Inner),
            Some(Keyword::Inner) => JoinType::Inner,
            Some(Keyword::Left) => JoinType::Left,
            Some(Keyword::Right) => JoinType::Right,
            Some(Keyword::Full) => JoinType::Full,
            Some(Keyword::Cross) => JoinType::Cross,
            _ => return Err(self.unexpected("JOIN keyword")),
        };
        self.advance();
        if matches!(join_type, JoinType::Left | JoinType::Right | JoinType::Full)
            && self.check_keyword(Keyword::Outer)
        {
            self.advance();
        }
        self.expect_keyword(Keyword::Join)?;
        Ok(join_type)
    }

    fn parse_optional_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.check_keyword(Keyword::As) {
            self.advance();
            return Ok(Some(self.expect_identifier()?));
        }
        if matches!(self.current.kind, TokenKind::Identifier(_)) {
            return Ok(Some(self.expect_identifier()?));
        }
        Ok(None)
    }

    fn parse_optional_where(&mut self) -> Result<Option<Expr>, ParseError> {
        if self.check_keyword(Keyword::Where) {
            self.advance();
            Ok(Some(self.parse_expression(0)?))
        } else {
            Ok(None)
        }
    }

    /// Parses `OR <resolution>` after INSERT or UPDATE.
    fn parse_or_conflict(&mut self) -> Result<Option<ConflictResolution>, ParseError> {
        if !self.check_keyword(Keyword::Or) {
            return Ok(None);
        }
        self.advance();
        let resolution = match &self.current.kind {
            TokenKind::Identifier(word) => ConflictResolution::from_word(word),
            _ => None,
        };
        match resolution {
            Some(resolution) => {
                self.advance();
                Ok(Some(resolution))
            }
            None => Err(self.unexpected("ROLLBACK, ABORT, FAIL, IGNORE, or REPLACE")),
        }
    }

    fn parse_insert_statement(&mut self) -> Result<InsertStatement, ParseError> {
        let or_conflict = if self.check_word("REPLACE") {
            self.advance();
            Some(ConflictResolution::Replace)
        } else {
            self.expect_keyword(Keyword::Insert)?;
            self.parse_or_conflict()?
        };
        self.expect_keyword(Keyword::Into)?;

        let (schema, table) = self.parse_qualified_name()?;

        let columns = if self.check(&TokenKind::LeftParen) {
            self.advance();
            let columns = self.parse_identifier_list()?;
            self.expect(&TokenKind::RightParen)?;
            columns
        } else {
            vec![]
        };

        let source = if self.check_keyword(Keyword::Values) {
            self.advance();
            let mut rows = vec![];
            loop {
                self.expect(&TokenKind::LeftParen)?;
                rows.push(self.parse_expression_list()?);
                self.expect(&TokenKind::RightParen)?;
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
            InsertSource::Values(rows)
        } else if self.check_keyword(Keyword::Select) {
            InsertSource::Query(Box::new(self.parse_select_statement()?))
        } else if self.check_keyword(Keyword::Default) {
            self.advance();
            self.expect_keyword(Keyword::Values)?;
            InsertSource::DefaultValues
        } else {
            return Err(self.unexpected("VALUES, SELECT, or DEFAULT VALUES"));
        };

        let upsert = if self.check_keyword(Keyword::On) {
            Some(self.parse_upsert()?)
        } else {
            None
        };

        Ok(InsertStatement {
            or_conflict,
            schema,
            table,
            columns,
            source,
            upsert,
        })
    }

    /// `ON CONFLICT [(columns)] DO NOTHING | DO UPDATE SET ... [WHERE ...]`
    fn parse_upsert(&mut self) -> Result<Upsert, ParseError> {
        self.expect_keyword(Keyword::On)?;
        self.expect_word("CONFLICT")?;

        let columns = if self.check(&TokenKind::LeftParen) {
            self.advance();
            let columns = self.parse_identifier_list()?;
            self.expect(&TokenKind::RightParen)?;
            columns
        } else {
            vec![]
        };

        self.expect_word("DO")?;
        let action = if self.check_word("NOTHING") {
            self.advance();
            UpsertAction::Nothing
        } else {
            self.expect_keyword(Keyword::Update)?;
            self.expect_keyword(Keyword::Set)?;
            let assignments = self.parse_assignments()?;
            let where_clause = self.parse_optional_where()?;
            UpsertAction::Update {
                assignments,
                where_clause,
            }
        };

        Ok(Upsert { columns, action })
    }

    fn parse_update_statement(&mut self) -> Result<UpdateStatement, ParseError> {
        self.expect_keyword(Keyword::Update)?;
        let or_conflict = self.parse_or_conflict()?;
        let (schema, table) = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;

        self.expect_keyword(Keyword::Set)?;
        let assignments = self.parse_assignments()?;

        let from = if self.check_keyword(Keyword::From) {
            self.advance();
            Some(self.parse_table_ref()?)
        } else {
            None
        };

        let where_clause = self.parse_optional_where()?;

        Ok(UpdateStatement {
            or_conflict,
            schema,
            table,
            alias,
            assignments,
            from,
            where_clause,
        })
    }

    fn parse_assignments(&mut self) -> Result<Vec<Assignment>, ParseError> {
        let mut assignments = vec![];
        loop {
            let column = self.expect_identifier()?;
            self.expect(&TokenKind::Eq)?;
            let value = self.parse_expression(0)?;
            assignments.push(Assignment { column, value });

            if !self.check(&TokenKind::Comma) {
                return Ok(assignments);
            }
            self.advance();
        }
    }

    fn parse_delete_statement(&mut self) -> Result<DeleteStatement, ParseError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let (schema, table) = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;
        let where_clause = self.parse_optional_where()?;

        Ok(DeleteStatement {
            schema,
            table,
            alias,
            where_clause,
        })
    }

    fn parse_order_by_list(&mut self) -> Result<Vec<OrderBy>, ParseError> {
        let mut items = vec![];
        loop {
            let expr = self.parse_expression(0)?;
            let direction = match self.current.as_keyword() {
                Some(Keyword::Desc) => self.advance_then(OrderDirection::Desc)?,
                Some(Keyword::Asc) => self.advance_then(OrderDirection::Asc)?,
                _ => OrderDirection::Asc,
            };
            let nulls = if self.check_word("NULLS") {
                self.advance();
                if self.check_word("FIRST") {
                    self.advance_then(Some(NullOrdering::First))?
                } else {
                    self.expect_word("LAST")?;
                    Some(NullOrdering::Last)
                }
            } else {
                None
            };

            items.push(OrderBy {
                expr,
                direction,
                nulls,
            });

            if !self.check(&TokenKind::Comma) {
                return Ok(items);
            }
            self.advance();
        }
    }

    /// Parses an expression using Pratt parsing.
    fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        while let Some((l_bp, r_bp)) = infix_binding_power(&self.current.kind) {
            if l_bp < min_bp {
                break;
            }

            match self.current.as_keyword() {
                Some(Keyword::Is) => {
                    self.advance();
                    let negated = self.check_keyword(Keyword::Not);
                    if negated {
                        self.advance();
                    }
                    self.expect_keyword(Keyword::Null)?;
                    lhs = Expr::IsNull {
                        expr: Box::new(lhs),
                        negated,
                    };
                }
                Some(Keyword::Not) => {
                    self.advance();
                    lhs = self.parse_negatable(lhs, true, r_bp)?;
                }
                Some(Keyword::In | Keyword::Between | Keyword::Like) => {
                    lhs = self.parse_negatable(lhs, false, r_bp)?;
                }
                _ => {
                    let Some(op) = token_to_binary_op(&self.current.kind) else {
                        break;
                    };
                    self.advance();
                    let rhs = self.parse_expression(r_bp)?;
                    lhs = lhs.binary(op, rhs);
                }
            }
        }

        Ok(lhs)
    }

    /// Parses the `IN`, `BETWEEN` or `LIKE` tail of a (possibly negated)
    /// predicate.
    fn parse_negatable(&mut self, lhs: Expr, negated: bool, r_bp: u8) -> Result<Expr, ParseError> {
        match self.current.as_keyword() {
            Some(Keyword::In) => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let list = if self.check_keyword(Keyword::Select) {
                    InList::Subquery(Box::new(self.parse_select_statement()?))
                } else if self.check(&TokenKind::RightParen) {
                    InList::Values(vec![])
                } else {
                    InList::Values(self.parse_expression_list()?)
                };
                self.expect(&TokenKind::RightParen)?;
                Ok(Expr::In {
                    expr: Box::new(lhs),
                    list,
                    negated,
                })
            }
            Some(Keyword::Between) => {
                self.advance();
                // Bind above AND so `a BETWEEN x AND y` splits at the AND.
                let low = self.parse_expression(r_bp)?;
                self.expect_keyword(Keyword::And)?;
                let high = self.parse_expression(r_bp)?;
                Ok(Expr::Between {
                    expr: Box::new(lhs),
                    low: Box::new(low),
                    high: Box::new(high),
                    negated,
                })
            }
            Some(Keyword::Like) => {
                self.advance();
                let pattern = self.parse_expression(r_bp)?;
                let op = if negated {
                    BinaryOp::NotLike
                } else {
                    BinaryOp::Like
                };
                Ok(lhs.binary(op, pattern))
            }
            _ => Err(self.unexpected("IN, BETWEEN, or LIKE")),
        }
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        if let Some(op) = token_to_unary_op(&self.current.kind) {
            self.advance();
            if op == crate::ast::UnaryOp::Not && self.check_keyword(Keyword::Exists) {
                return self.parse_exists(true);
            }
            let operand = self.parse_expression(prefix_binding_power(op))?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current.clone();

        match token.kind {
            TokenKind::Integer(n) => self.advance_then(Expr::Literal(Literal::Integer(n))),
            TokenKind::Float(f) => self.advance_then(Expr::Literal(Literal::Float(f))),
            TokenKind::String(s) => self.advance_then(Expr::Literal(Literal::String(s))),
            TokenKind::Blob(b) => self.advance_then(Expr::Literal(Literal::Blob(b))),
            TokenKind::Keyword(Keyword::True) => {
                self.advance_then(Expr::Literal(Literal::Boolean(true)))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance_then(Expr::Literal(Literal::Boolean(false)))
            }
            TokenKind::Keyword(Keyword::Null) => self.advance_then(Expr::Literal(Literal::Null)),

            TokenKind::Question => {
                self.param_counter += 1;
                let position = self.param_counter;
                self.advance_then(Expr::Parameter(Parameter {
                    name: None,
                    position,
                    span: token.span,
                }))
            }
            TokenKind::Colon => {
                self.advance();
                let name_token = self.current.clone();
                let name = match &name_token.kind {
                    TokenKind::Identifier(name) => name.clone(),
                    // Keywords are fine as parameter names (`:limit`).
                    TokenKind::Keyword(_) => name_token.span.slice(self.input).to_string(),
                    _ => return Err(self.unexpected("parameter name")),
                };
                if name_token.span.start != token.span.end {
                    return Err(ParseError::new(
                        "Expected parameter name directly after ':'",
                        name_token.span,
                    ));
                }
                self.advance_then(Expr::Parameter(Parameter {
                    name: Some(name),
                    position: 0,
                    span: token.span.merge(name_token.span),
                }))
            }

            TokenKind::Star => self.advance_then(Expr::Wildcard { table: None }),

            TokenKind::LeftParen => {
                self.advance();
                if self.check_keyword(Keyword::Select) {
                    let query = self.parse_select_statement()?;
                    self.expect(&TokenKind::RightParen)?;
                    return Ok(Expr::Subquery(Box::new(query)));
                }
                let mut items = self.parse_expression_list()?;
                self.expect(&TokenKind::RightParen)?;
                if items.len() == 1 {
                    Ok(Expr::Paren(Box::new(items.remove(0))))
                } else {
                    Ok(Expr::Tuple(items))
                }
            }

            TokenKind::Keyword(Keyword::Case) => self.parse_case_expression(),
            TokenKind::Keyword(Keyword::Cast) => self.parse_cast_expression(),
            TokenKind::Keyword(Keyword::Exists) => self.parse_exists(false),

            TokenKind::Identifier(name) => {
                let span = token.span;
                self.advance();

                if self.check(&TokenKind::LeftParen) {
                    return self.parse_function_call(name);
                }

                if self.check(&TokenKind::Dot) {
                    self.advance();
                    if self.check(&TokenKind::Star) {
                        return self.advance_then(Expr::Wildcard { table: Some(name) });
                    }
                    let column = self.expect_identifier()?;
                    return Ok(Expr::Column {
                        table: Some(name),
                        name: column,
                        span: span.merge(self.previous_span()),
                    });
                }

                Ok(Expr::Column {
                    table: None,
                    name,
                    span,
                })
            }

            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_exists(&mut self, negated: bool) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Exists)?;
        self.expect(&TokenKind::LeftParen)?;
        let query = self.parse_select_statement()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::Exists {
            query: Box::new(query),
            negated,
        })
    }

    fn parse_function_call(&mut self, name: String) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;

        let distinct = self.check_keyword(Keyword::Distinct);
        if distinct {
            self.advance();
        }

        let args = if self.check(&TokenKind::RightParen) {
            vec![]
        } else if self.check(&TokenKind::Star) {
            self.advance();
            vec![Expr::Wildcard { table: None }]
        } else {
            self.parse_expression_list()?
        };

        self.expect(&TokenKind::RightParen)?;

        Ok(Expr::Function(FunctionCall {
            name,
            args,
            distinct,
        }))
    }

    /// `CAST(expr AS type-name)`; the type name may span several words,
    /// e.g. `VARCHAR(20)` or `DOUBLE PRECISION`.
    fn parse_cast_expression(&mut self) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Cast)?;
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expression(0)?;
        self.expect_keyword(Keyword::As)?;

        let start = self.current.span;
        let mut end = start;
        let mut depth = 0usize;
        let mut words = 0usize;
        loop {
            match &self.current.kind {
                TokenKind::RightParen if depth == 0 => break,
                TokenKind::RightParen => depth -= 1,
                TokenKind::LeftParen => depth += 1,
                TokenKind::Eof => return Err(self.unexpected("type name")),
                _ => {}
            }
            end = self.current.span;
            words += 1;
            self.advance();
        }
        if words == 0 {
            return Err(self.unexpected("type name"));
        }
        let type_name = start.merge(end).slice(self.input).to_string();
        self.expect(&TokenKind::RightParen)?;

        Ok(Expr::Cast {
            expr: Box::new(expr),
            type_name,
        })
    }

    fn parse_case_expression(&mut self) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Case)?;

        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expression(0)?))
        };

        let mut when_clauses = vec![];
        while self.check_keyword(Keyword::When) {
            self.advance();
            let when_expr = self.parse_expression(0)?;
            self.expect_keyword(Keyword::Then)?;
            let then_expr = self.parse_expression(0)?;
            when_clauses.push((when_expr, then_expr));
        }
        if when_clauses.is_empty() {
            return Err(self.unexpected("WHEN"));
        }

        let else_clause = if self.check_keyword(Keyword::Else) {
            self.advance();
            Some(Box::new(self.parse_expression(0)?))
        } else {
            None
        };

        self.expect_keyword(Keyword::End)?;

        Ok(Expr::Case {
            operand,
            when_clauses,
            else_clause,
        })
    }

    fn parse_expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![];
        loop {
            exprs.push(self.parse_expression(0)?);
            if !self.check(&TokenKind::Comma) {
                return Ok(exprs);
            }
            self.advance();
        }
    }

    fn parse_identifier_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut idents = vec![];
        loop {
            idents.push(self.expect_identifier()?);
            if !self.check(&TokenKind::Comma) {
                return Ok(idents);
            }
            self.advance();
        }
    }

    // --- Helper methods ---

    fn advance(&mut self) {
        self.previous_end = self.current.span.end;
        self.current = self.lexer.next_token();
    }

    /// Advances and returns `value`; keeps single-token arms on one line.
    #[allow(clippy::unnecessary_wraps)]
    fn advance_then<T>(&mut self, value: T) -> Result<T, ParseError> {
        self.advance();
        Ok(value)
    }

    fn previous_span(&self) -> crate::lexer::Span {
        crate::lexer::Span::new(self.previous_end, self.previous_end)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current.kind) == core::mem::discriminant(kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.current.kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Checks for a contextual word, lexed as an identifier.
    fn check_word(&self, word: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Identifier(w) if w.eq_ignore_ascii_case(word))
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::unexpected(expected, self.current.kind.clone(), self.current.span)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("{kind:?}")))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    fn expect_word(&mut self, word: &str) -> Result<(), ParseError> {
        if self.check_word(word) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(word))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }
}
