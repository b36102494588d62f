use std::fmt;

/// An ordered sequence of top-level statements.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

// Clone is needed because function objects carry their parameter list and
// body out of the tree they were parsed from.
#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Let(String, Expr),
    Return(Expr),
    Expr(Expr),
}

/// A brace-delimited sequence of statements, as found in `if` arms and
/// function bodies.
#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Ident(String),
    Int(i64),
    Bool(bool),
    Str(String),
    Prefix(PrefixOp, Box<Expr>),
    Infix(InfixOp, Box<Expr>, Box<Expr>),
    If(Box<Expr>, Block, Option<Block>),
    Function(Vec<String>, Block),
    Call(Box<Expr>, Vec<Expr>),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PrefixOp {
    Bang,
    Minus,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InfixOp {
    Plus,
    Minus,
    Star,
    Slash,
    Less,
    Greater,
    Equal,
    NotEqual,
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOp::Bang => write!(f, "!"),
            PrefixOp::Minus => write!(f, "-"),
        }
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfixOp::Plus => write!(f, "+"),
            InfixOp::Minus => write!(f, "-"),
            InfixOp::Star => write!(f, "*"),
            InfixOp::Slash => write!(f, "/"),
            InfixOp::Less => write!(f, "<"),
            InfixOp::Greater => write!(f, ">"),
            InfixOp::Equal => write!(f, "=="),
            InfixOp::NotEqual => write!(f, "!="),
        }
    }
}

// The Display forms below are the canonical, fully parenthesized source
// reconstruction. Reparsing the canonical form of any valid program yields
// a structurally identical tree.

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let(name, value) => write!(f, "let {} = {};", name, value),
            Stmt::Return(value) => write!(f, "return {};", value),
            Stmt::Expr(expr) => write!(f, "{}", expr),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::Int(value) => write!(f, "{}", value),
            Expr::Bool(value) => write!(f, "{}", value),
            Expr::Str(value) => write!(f, "{}", value),
            Expr::Prefix(op, right) => write!(f, "({}{})", op, right),
            Expr::Infix(op, left, right) => write!(f, "({} {} {})", left, op, right),
            Expr::If(condition, consequence, alternative) => {
                write!(f, "if{} {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, "else {}", alternative)?;
                }
                Ok(())
            }
            Expr::Function(parameters, body) => {
                write!(f, "fn({}) {}", parameters.join(", "), body)
            }
            Expr::Call(callee, arguments) => {
                let arguments = arguments
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}({})", callee, arguments)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn let_statement() {
        let program = Program {
            statements: vec![Stmt::Let(
                "myVar".to_string(),
                Expr::Ident("anotherVar".to_string()),
            )],
        };
        assert_eq!(program.to_string(), "let myVar = anotherVar;");
    }

    #[test]
    fn return_statement() {
        let program = Program {
            statements: vec![Stmt::Return(Expr::Int(5))],
        };
        assert_eq!(program.to_string(), "return 5;");
    }

    #[test]
    fn nested_expressions_are_parenthesized() {
        let expr = Expr::Infix(
            InfixOp::Star,
            Box::new(Expr::Prefix(
                PrefixOp::Minus,
                Box::new(Expr::Ident("a".to_string())),
            )),
            Box::new(Expr::Ident("b".to_string())),
        );
        assert_eq!(expr.to_string(), "((-a) * b)");
    }

    #[test]
    fn if_expression_with_alternative() {
        let expr = Expr::If(
            Box::new(Expr::Infix(
                InfixOp::Less,
                Box::new(Expr::Ident("x".to_string())),
                Box::new(Expr::Ident("y".to_string())),
            )),
            Block {
                statements: vec![Stmt::Expr(Expr::Ident("x".to_string()))],
            },
            Some(Block {
                statements: vec![Stmt::Expr(Expr::Ident("y".to_string()))],
            }),
        );
        assert_eq!(expr.to_string(), "if(x < y) xelse y");
    }

    #[test]
    fn function_literal() {
        let expr = Expr::Function(
            vec!["x".to_string(), "y".to_string()],
            Block {
                statements: vec![Stmt::Expr(Expr::Infix(
                    InfixOp::Plus,
                    Box::new(Expr::Ident("x".to_string())),
                    Box::new(Expr::Ident("y".to_string())),
                ))],
            },
        );
        assert_eq!(expr.to_string(), "fn(x, y) (x + y)");
    }

    #[test]
    fn call_expression() {
        let expr = Expr::Call(
            Box::new(Expr::Ident("add".to_string())),
            vec![
                Expr::Int(1),
                Expr::Infix(InfixOp::Star, Box::new(Expr::Int(2)), Box::new(Expr::Int(3))),
            ],
        );
        assert_eq!(expr.to_string(), "add(1, (2 * 3))");
    }
}
