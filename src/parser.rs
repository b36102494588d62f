use crate::ast::{Block, Expr, InfixOp, PrefixOp, Program, Stmt};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Binding strength of operators, ascending.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

/// Precedence of the operator a token kind stands for; `Lowest` for
/// anything that is not an infix operator.
fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::EqualEqual | TokenKind::BangEqual => Precedence::Equals,
        TokenKind::Less | TokenKind::Greater => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Star | TokenKind::Slash => Precedence::Product,
        TokenKind::LeftParen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

type PrefixFn = fn(&mut Parser) -> Option<Expr>;
type InfixFn = fn(&mut Parser, Expr) -> Option<Expr>;

// The Pratt dispatch tables. A match over the kind compiles to a dense
// jump table, so these play the role of the classic handler maps.

fn prefix_fn(kind: TokenKind) -> Option<PrefixFn> {
    match kind {
        TokenKind::Identifier => Some(Parser::parse_identifier),
        TokenKind::Int => Some(Parser::parse_integer_literal),
        TokenKind::String => Some(Parser::parse_string_literal),
        TokenKind::True | TokenKind::False => Some(Parser::parse_boolean),
        TokenKind::Bang | TokenKind::Minus => Some(Parser::parse_prefix_expression),
        TokenKind::LeftParen => Some(Parser::parse_grouped_expression),
        TokenKind::If => Some(Parser::parse_if_expression),
        TokenKind::Function => Some(Parser::parse_function_literal),
        _ => None,
    }
}

fn infix_fn(kind: TokenKind) -> Option<InfixFn> {
    match kind {
        TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Star
        | TokenKind::Slash
        | TokenKind::EqualEqual
        | TokenKind::BangEqual
        | TokenKind::Less
        | TokenKind::Greater => Some(Parser::parse_infix_expression),
        TokenKind::LeftParen => Some(Parser::parse_call_expression),
        _ => None,
    }
}

fn prefix_op(kind: TokenKind) -> Option<PrefixOp> {
    match kind {
        TokenKind::Bang => Some(PrefixOp::Bang),
        TokenKind::Minus => Some(PrefixOp::Minus),
        _ => None,
    }
}

fn infix_op(kind: TokenKind) -> Option<InfixOp> {
    match kind {
        TokenKind::Plus => Some(InfixOp::Plus),
        TokenKind::Minus => Some(InfixOp::Minus),
        TokenKind::Star => Some(InfixOp::Star),
        TokenKind::Slash => Some(InfixOp::Slash),
        TokenKind::Less => Some(InfixOp::Less),
        TokenKind::Greater => Some(InfixOp::Greater),
        TokenKind::EqualEqual => Some(InfixOp::Equal),
        TokenKind::BangEqual => Some(InfixOp::NotEqual),
        _ => None,
    }
}

/// Recursive-descent parser with Pratt-style expression parsing.
///
/// Syntax errors accumulate in [`Parser::errors`] and never halt parsing;
/// statements that fail a structural assertion are dropped from the
/// program, so a tree produced alongside errors may be partial.
#[derive(Debug)]
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    peek_token: Token,
    errors: Vec<String>,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Parser {
        let mut parser = Parser {
            lexer,
            // Both slots are primed by the two advance calls below.
            current_token: Token::new(TokenKind::Eof, ""),
            peek_token: Token::new(TokenKind::Eof, ""),
            errors: vec![],
        };
        parser.advance();
        parser.advance();
        parser
    }

    /// The error messages accumulated so far, in source order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while !self.current_token_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt);
            }
            self.advance();
        }
        program
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.current_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Stmt> {
        if !self.expect_peek(TokenKind::Identifier) {
            return None;
        }
        let name = self.current_token.literal.clone();

        if !self.expect_peek(TokenKind::Equal) {
            return None;
        }
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_token_is(TokenKind::Semicolon) {
            self.advance();
        }
        Some(Stmt::Let(name, value))
    }

    fn parse_return_statement(&mut self) -> Option<Stmt> {
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_token_is(TokenKind::Semicolon) {
            self.advance();
        }
        Some(Stmt::Return(value))
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        // The semicolon is consumed even when the expression failed, so a
        // bad statement produces one error rather than a cascade.
        let expr = self.parse_expression(Precedence::Lowest);
        if self.peek_token_is(TokenKind::Semicolon) {
            self.advance();
        }
        expr.map(Stmt::Expr)
    }

    /// The Pratt core: parse the prefix form under the current token, then
    /// fold infix operators onto it while the peek token binds tighter
    /// than `precedence`.
    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let prefix = match prefix_fn(self.current_token.kind) {
            Some(prefix) => prefix,
            None => {
                self.no_prefix_fn_error(self.current_token.kind);
                return None;
            }
        };
        let mut left = prefix(self)?;

        while !self.peek_token_is(TokenKind::Semicolon)
            && precedence < precedence_of(self.peek_token.kind)
        {
            let infix = match infix_fn(self.peek_token.kind) {
                Some(infix) => infix,
                None => return Some(left),
            };
            self.advance();
            left = infix(self, left)?;
        }
        Some(left)
    }

    fn parse_identifier(&mut self) -> Option<Expr> {
        Some(Expr::Ident(self.current_token.literal.clone()))
    }

    fn parse_integer_literal(&mut self) -> Option<Expr> {
        match self.current_token.literal.parse::<i64>() {
            Ok(value) => Some(Expr::Int(value)),
            Err(_) => {
                let msg = format!(
                    "could not parse {:?} as integer",
                    self.current_token.literal
                );
                self.errors.push(msg);
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expr> {
        Some(Expr::Str(self.current_token.literal.clone()))
    }

    fn parse_boolean(&mut self) -> Option<Expr> {
        Some(Expr::Bool(self.current_token_is(TokenKind::True)))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let op = prefix_op(self.current_token.kind)?;
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expr::Prefix(op, Box::new(right)))
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let op = infix_op(self.current_token.kind)?;
        let precedence = precedence_of(self.current_token.kind);
        self.advance();
        let right = self.parse_expression(precedence)?;
        Some(Expr::Infix(op, Box::new(left), Box::new(right)))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.advance();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RightParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expr> {
        if !self.expect_peek(TokenKind::LeftParen) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RightParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LeftCurly) {
            return None;
        }
        let consequence = self.parse_block();

        let alternative = if self.peek_token_is(TokenKind::Else) {
            self.advance();
            if !self.expect_peek(TokenKind::LeftCurly) {
                return None;
            }
            Some(self.parse_block())
        } else {
            None
        };

        Some(Expr::If(Box::new(condition), consequence, alternative))
    }

    /// Parse the statements between `{` and `}`.
    /// Current token is the opening curly.
    fn parse_block(&mut self) -> Block {
        let mut statements = vec![];
        self.advance();
        while !self.current_token_is(TokenKind::RightCurly)
            && !self.current_token_is(TokenKind::Eof)
        {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }
        Block { statements }
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        if !self.expect_peek(TokenKind::LeftParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::LeftCurly) {
            return None;
        }
        let body = self.parse_block();

        Some(Expr::Function(parameters, body))
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<String>> {
        let mut parameters = vec![];

        if self.peek_token_is(TokenKind::RightParen) {
            self.advance();
            return Some(parameters);
        }

        self.advance();
        parameters.push(self.current_token.literal.clone());

        while self.peek_token_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            parameters.push(self.current_token.literal.clone());
        }

        if !self.expect_peek(TokenKind::RightParen) {
            return None;
        }
        Some(parameters)
    }

    fn parse_call_expression(&mut self, callee: Expr) -> Option<Expr> {
        let arguments = self.parse_call_arguments()?;
        Some(Expr::Call(Box::new(callee), arguments))
    }

    fn parse_call_arguments(&mut self) -> Option<Vec<Expr>> {
        let mut arguments = vec![];

        if self.peek_token_is(TokenKind::RightParen) {
            self.advance();
            return Some(arguments);
        }

        self.advance();
        arguments.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            arguments.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(TokenKind::RightParen) {
            return None;
        }
        Some(arguments)
    }

    fn advance(&mut self) {
        self.current_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    fn current_token_is(&self, kind: TokenKind) -> bool {
        self.current_token.kind == kind
    }

    fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    /// Advance if the peek token has the expected kind; otherwise record
    /// an error and stay put.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_token_is(kind) {
            self.advance();
            true
        } else {
            self.peek_error(kind);
            false
        }
    }

    fn peek_error(&mut self, kind: TokenKind) {
        let msg = format!(
            "expected next token to be {}, got {} instead",
            kind, self.peek_token.kind
        );
        self.errors.push(msg);
    }

    fn no_prefix_fn_error(&mut self, kind: TokenKind) {
        let msg = format!("no prefix parse function for {} found", kind);
        self.errors.push(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Program {
        let mut parser = Parser::new(Lexer::new(input));
        let program = parser.parse_program();
        assert_eq!(
            parser.errors(),
            &[] as &[String],
            "unexpected parser errors for {:?}",
            input
        );
        program
    }

    fn parse_with_errors(input: &str) -> (Program, Vec<String>) {
        let mut parser = Parser::new(Lexer::new(input));
        let program = parser.parse_program();
        (program, parser.errors().to_vec())
    }

    fn parse_expr(input: &str) -> Expr {
        let mut program = parse(input);
        assert_eq!(program.statements.len(), 1, "program: {:?}", program);
        match program.statements.remove(0) {
            Stmt::Expr(expr) => expr,
            stmt => panic!("expected expression statement, got {:?}", stmt),
        }
    }

    fn ident(name: &str) -> Expr {
        Expr::Ident(name.to_string())
    }

    #[test]
    fn let_statements() {
        assert_eq!(
            parse("let x = 5; let y = true; let foobar = y;").statements,
            vec![
                Stmt::Let("x".to_string(), Expr::Int(5)),
                Stmt::Let("y".to_string(), Expr::Bool(true)),
                Stmt::Let("foobar".to_string(), ident("y")),
            ]
        );
    }

    #[test]
    fn let_statement_without_identifier() {
        let (_, errors) = parse_with_errors("let = 5;");
        assert_eq!(
            errors[0],
            "expected next token to be IDENT, got = instead"
        );
    }

    #[test]
    fn let_statement_without_assign() {
        let (_, errors) = parse_with_errors("let x 5;");
        assert_eq!(
            errors[0],
            "expected next token to be =, got INT instead"
        );
    }

    #[test]
    fn return_statements() {
        assert_eq!(
            parse("return 5; return true; return foobar;").statements,
            vec![
                Stmt::Return(Expr::Int(5)),
                Stmt::Return(Expr::Bool(true)),
                Stmt::Return(ident("foobar")),
            ]
        );
    }

    #[test]
    fn identifier_expression() {
        assert_eq!(parse_expr("foobar;"), ident("foobar"));
    }

    #[test]
    fn integer_literal() {
        assert_eq!(parse_expr("5;"), Expr::Int(5));
    }

    #[test]
    fn integer_literal_out_of_range() {
        let (_, errors) = parse_with_errors("92233720368547758080;");
        assert_eq!(
            errors,
            vec!["could not parse \"92233720368547758080\" as integer".to_string()]
        );
    }

    #[test]
    fn boolean_literals() {
        assert_eq!(parse_expr("true;"), Expr::Bool(true));
        assert_eq!(parse_expr("false;"), Expr::Bool(false));
    }

    #[test]
    fn string_literal() {
        assert_eq!(
            parse_expr(r#""hello world";"#),
            Expr::Str("hello world".to_string())
        );
    }

    #[test]
    fn prefix_expressions() {
        assert_eq!(
            parse_expr("!5;"),
            Expr::Prefix(PrefixOp::Bang, Box::new(Expr::Int(5)))
        );
        assert_eq!(
            parse_expr("-15;"),
            Expr::Prefix(PrefixOp::Minus, Box::new(Expr::Int(15)))
        );
        assert_eq!(
            parse_expr("!true;"),
            Expr::Prefix(PrefixOp::Bang, Box::new(Expr::Bool(true)))
        );
    }

    #[test]
    fn infix_expressions() {
        let cases = vec![
            ("5 + 5;", InfixOp::Plus),
            ("5 - 5;", InfixOp::Minus),
            ("5 * 5;", InfixOp::Star),
            ("5 / 5;", InfixOp::Slash),
            ("5 < 5;", InfixOp::Less),
            ("5 > 5;", InfixOp::Greater),
            ("5 == 5;", InfixOp::Equal),
            ("5 != 5;", InfixOp::NotEqual),
        ];
        for (input, op) in cases {
            assert_eq!(
                parse_expr(input),
                Expr::Infix(op, Box::new(Expr::Int(5)), Box::new(Expr::Int(5)))
            );
        }
    }

    #[test]
    fn operator_precedence() {
        let cases = vec![
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            ("a == b < c", "(a == (b < c))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("true", "true"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g))",
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(parse(input).to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn canonical_form_reparses_to_same_tree() {
        // The canonical forms of blocks drop their braces, so only
        // block-free programs round-trip through the printer.
        let inputs = vec![
            "let x = 1 + 2 * 3;",
            "-a * b;",
            "return 5 < 4 != 3 > 4;",
            "add(1, 2 * 3, 4 + 5);",
        ];
        for input in inputs {
            let first = parse(input);
            let second = parse(&first.to_string());
            assert_eq!(first, second, "input: {}", input);
        }
    }

    #[test]
    fn if_expression() {
        assert_eq!(
            parse_expr("if (x < y) { x }"),
            Expr::If(
                Box::new(Expr::Infix(
                    InfixOp::Less,
                    Box::new(ident("x")),
                    Box::new(ident("y"))
                )),
                Block {
                    statements: vec![Stmt::Expr(ident("x"))],
                },
                None,
            )
        );
    }

    #[test]
    fn if_else_expression() {
        assert_eq!(
            parse_expr("if (x < y) { x } else { y }"),
            Expr::If(
                Box::new(Expr::Infix(
                    InfixOp::Less,
                    Box::new(ident("x")),
                    Box::new(ident("y"))
                )),
                Block {
                    statements: vec![Stmt::Expr(ident("x"))],
                },
                Some(Block {
                    statements: vec![Stmt::Expr(ident("y"))],
                }),
            )
        );
    }

    #[test]
    fn if_without_condition_paren() {
        let (_, errors) = parse_with_errors("if x { x }");
        assert_eq!(
            errors[0],
            "expected next token to be (, got IDENT instead"
        );
    }

    #[test]
    fn function_literal() {
        assert_eq!(
            parse_expr("fn(x, y) { x + y; }"),
            Expr::Function(
                vec!["x".to_string(), "y".to_string()],
                Block {
                    statements: vec![Stmt::Expr(Expr::Infix(
                        InfixOp::Plus,
                        Box::new(ident("x")),
                        Box::new(ident("y"))
                    ))],
                },
            )
        );
    }

    #[test]
    fn function_parameters() {
        let cases = vec![
            ("fn() {};", vec![]),
            ("fn(x) {};", vec!["x"]),
            ("fn(x, y, z) {};", vec!["x", "y", "z"]),
        ];
        for (input, expected) in cases {
            let expected = expected.into_iter().map(str::to_string).collect::<Vec<_>>();
            match parse_expr(input) {
                Expr::Function(parameters, _) => assert_eq!(parameters, expected),
                expr => panic!("expected function literal, got {:?}", expr),
            }
        }
    }

    #[test]
    fn call_expression() {
        assert_eq!(
            parse_expr("add(1, 2 * 3, 4 + 5);"),
            Expr::Call(
                Box::new(ident("add")),
                vec![
                    Expr::Int(1),
                    Expr::Infix(InfixOp::Star, Box::new(Expr::Int(2)), Box::new(Expr::Int(3))),
                    Expr::Infix(InfixOp::Plus, Box::new(Expr::Int(4)), Box::new(Expr::Int(5))),
                ],
            )
        );
    }

    #[test]
    fn call_without_arguments() {
        assert_eq!(parse_expr("f();"), Expr::Call(Box::new(ident("f")), vec![]));
    }

    #[test]
    fn stray_assignment_is_not_a_statement() {
        // Assignment is not in the grammar: `a = 2;` is the expression
        // statement `a` followed by a stray `=`.
        let (program, errors) = parse_with_errors("let a = 1; a = 2;");
        assert_eq!(errors, vec!["no prefix parse function for = found".to_string()]);
        assert_eq!(
            program.statements,
            vec![
                Stmt::Let("a".to_string(), Expr::Int(1)),
                Stmt::Expr(ident("a")),
                Stmt::Expr(Expr::Int(2)),
            ]
        );
    }

    #[test]
    fn errors_accumulate_across_statements() {
        let (_, errors) = parse_with_errors("let x 5; let = 7;");
        assert_eq!(
            errors,
            vec![
                "expected next token to be =, got INT instead".to_string(),
                "expected next token to be IDENT, got = instead".to_string(),
                "no prefix parse function for = found".to_string(),
            ]
        );
    }
}
