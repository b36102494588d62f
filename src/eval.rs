use std::rc::Rc;

use crate::ast::{Block, Expr, InfixOp, PrefixOp, Program, Stmt};
use crate::object::{Environment, Function, Object};

/// Evaluate a program against `env`.
///
/// Runtime errors come back as [`Object::Error`]; a top-level `return`
/// unwraps to its inner value.
pub fn eval(program: &Program, env: &Rc<Environment>) -> Object {
    let mut result = Object::Null;
    for stmt in &program.statements {
        result = eval_statement(stmt, env);
        match result {
            Object::ReturnValue(inner) => return *inner,
            Object::Error(message) => return Object::Error(message),
            _ => (),
        }
    }
    result
}

fn eval_statement(stmt: &Stmt, env: &Rc<Environment>) -> Object {
    match stmt {
        Stmt::Expr(expr) => eval_expression(expr, env),
        Stmt::Return(value) => {
            let value = eval_expression(value, env);
            if let Object::Error(_) = value {
                return value;
            }
            Object::ReturnValue(Box::new(value))
        }
        Stmt::Let(name, value) => {
            let value = eval_expression(value, env);
            if let Object::Error(_) = value {
                return value;
            }
            env.set(name, value);
            Object::Null
        }
    }
}

/// Evaluate the statements of a block in order.
///
/// Unlike [`eval`], a `ReturnValue` passes through unwrapped so that
/// enclosing blocks stop too; it is unwrapped at the function call or
/// program boundary.
fn eval_block(block: &Block, env: &Rc<Environment>) -> Object {
    let mut result = Object::Null;
    for stmt in &block.statements {
        result = eval_statement(stmt, env);
        if matches!(result, Object::ReturnValue(_) | Object::Error(_)) {
            return result;
        }
    }
    result
}

fn eval_expression(expr: &Expr, env: &Rc<Environment>) -> Object {
    match expr {
        Expr::Int(value) => Object::Integer(*value),
        Expr::Bool(value) => Object::Boolean(*value),
        Expr::Str(value) => Object::Str(value.clone()),
        Expr::Ident(name) => match env.get(name) {
            Some(value) => value,
            None => Object::Error(format!("identifier not found: {}", name)),
        },
        Expr::Prefix(op, right) => {
            let right = eval_expression(right, env);
            if let Object::Error(_) = right {
                return right;
            }
            eval_prefix_expression(*op, right)
        }
        Expr::Infix(op, left, right) => {
            let left = eval_expression(left, env);
            if let Object::Error(_) = left {
                return left;
            }
            let right = eval_expression(right, env);
            if let Object::Error(_) = right {
                return right;
            }
            eval_infix_expression(*op, left, right)
        }
        Expr::If(condition, consequence, alternative) => {
            let condition = eval_expression(condition, env);
            if let Object::Error(_) = condition {
                return condition;
            }
            if condition.is_truthy() {
                eval_block(consequence, env)
            } else if let Some(alternative) = alternative {
                eval_block(alternative, env)
            } else {
                Object::Null
            }
        }
        Expr::Function(parameters, body) => Object::Function(Function {
            parameters: parameters.clone(),
            body: body.clone(),
            env: env.clone(),
        }),
        Expr::Call(callee, arguments) => {
            let callee = eval_expression(callee, env);
            if let Object::Error(_) = callee {
                return callee;
            }
            let arguments = match eval_expressions(arguments, env) {
                Ok(arguments) => arguments,
                Err(error) => return error,
            };
            apply_function(callee, arguments)
        }
    }
}

fn eval_prefix_expression(op: PrefixOp, right: Object) -> Object {
    match op {
        PrefixOp::Bang => Object::Boolean(!right.is_truthy()),
        PrefixOp::Minus => match right {
            Object::Integer(value) => Object::Integer(value.wrapping_neg()),
            right => Object::Error(format!("unknown operator: -{}", right.type_name())),
        },
    }
}

fn eval_infix_expression(op: InfixOp, left: Object, right: Object) -> Object {
    match (left, right) {
        (Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix_expression(op, left, right)
        }
        (Object::Str(left), Object::Str(right)) => {
            eval_string_infix_expression(op, &left, &right)
        }
        (left, right) => {
            if left.type_name() != right.type_name() {
                return Object::Error(format!(
                    "type mismatch: {} {} {}",
                    left.type_name(),
                    op,
                    right.type_name()
                ));
            }
            match op {
                InfixOp::Equal => Object::Boolean(left == right),
                InfixOp::NotEqual => Object::Boolean(left != right),
                op => Object::Error(format!(
                    "unknown operator: {} {} {}",
                    left.type_name(),
                    op,
                    right.type_name()
                )),
            }
        }
    }
}

// Arithmetic wraps, as two's-complement 64-bit arithmetic does in the
// reference implementation. wrapping_div keeps i64::MIN / -1 from
// trapping.
fn eval_integer_infix_expression(op: InfixOp, left: i64, right: i64) -> Object {
    match op {
        InfixOp::Plus => Object::Integer(left.wrapping_add(right)),
        InfixOp::Minus => Object::Integer(left.wrapping_sub(right)),
        InfixOp::Star => Object::Integer(left.wrapping_mul(right)),
        InfixOp::Slash => {
            if right == 0 {
                Object::Error("division by zero".to_string())
            } else {
                Object::Integer(left.wrapping_div(right))
            }
        }
        InfixOp::Less => Object::Boolean(left < right),
        InfixOp::Greater => Object::Boolean(left > right),
        InfixOp::Equal => Object::Boolean(left == right),
        InfixOp::NotEqual => Object::Boolean(left != right),
    }
}

fn eval_string_infix_expression(op: InfixOp, left: &str, right: &str) -> Object {
    match op {
        InfixOp::Plus => Object::Str(format!("{}{}", left, right)),
        op => Object::Error(format!("unknown operator: STRING {} STRING", op)),
    }
}

fn eval_expressions(exprs: &[Expr], env: &Rc<Environment>) -> Result<Vec<Object>, Object> {
    let mut results = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let value = eval_expression(expr, env);
        if let Object::Error(_) = value {
            return Err(value);
        }
        results.push(value);
    }
    Ok(results)
}

/// Call a function value: bind arguments in a fresh environment enclosed
/// by the function's captured environment (lexical, not dynamic scope)
/// and unwrap a returned value.
fn apply_function(callee: Object, arguments: Vec<Object>) -> Object {
    let function = match callee {
        Object::Function(function) => function,
        callee => return Object::Error(format!("not a function: {}", callee.type_name())),
    };

    if arguments.len() != function.parameters.len() {
        return Object::Error(format!(
            "wrong number of arguments: want={}, got={}",
            function.parameters.len(),
            arguments.len()
        ));
    }

    let env = Environment::new_enclosed(function.env.clone());
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        env.set(parameter, argument);
    }

    match eval_block(&function.body, &env) {
        Object::ReturnValue(inner) => *inner,
        value => value,
    }
}
