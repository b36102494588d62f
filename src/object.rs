//! Runtime values and the environment they live in.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::Block;

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
    Str(String),
    ReturnValue(Box<Object>),
    Error(String),
    Function(Function),
}

impl Object {
    /// The stable type tag used in runtime error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::Null => "NULL",
            Object::Str(_) => "STRING",
            Object::ReturnValue(_) => "RETURN_VALUE",
            Object::Error(_) => "ERROR",
            Object::Function(_) => "FUNCTION",
        }
    }

    /// Render the value for display to the user.
    pub fn inspect(&self) -> String {
        match self {
            Object::Integer(value) => value.to_string(),
            Object::Boolean(value) => value.to_string(),
            Object::Null => "null".to_string(),
            Object::Str(value) => value.clone(),
            Object::ReturnValue(inner) => inner.inspect(),
            Object::Error(message) => format!("ERROR: {}", message),
            Object::Function(function) => format!(
                "fn({}) {{\n{}\n}}",
                function.parameters.join(", "),
                function.body
            ),
        }
    }

    /// `null` and `false` are false; every other value is true.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }
}

/// A function value: parameter names, a body, and the environment that was
/// current when the literal was evaluated.
#[derive(Clone)]
pub struct Function {
    pub parameters: Vec<String>,
    pub body: Block,
    pub env: Rc<Environment>,
}

// A function bound by `let` is usually reachable from its own captured
// environment, so the derived Debug would recurse forever.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.env, &other.env)
            && self.parameters == other.parameters
            && self.body == other.body
    }
}

/// A frame mapping names to values, chained to the enclosing scope.
///
/// Environments are shared (a closure keeps its definition environment
/// alive past the call that created it), hence the `Rc` and the interior
/// mutability of the store. Frames only ever point outward, so the chain
/// is acyclic and reference counting suffices.
#[derive(Debug)]
pub struct Environment {
    store: RefCell<HashMap<String, Object>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new_root() -> Rc<Environment> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    pub fn new_enclosed(outer: Rc<Environment>) -> Rc<Environment> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// Look `name` up here, walking enclosing scopes on a miss.
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.borrow().get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.get(name)),
        }
    }

    /// Bind `name` in this frame only.
    pub fn set(&self, name: &str, value: Object) {
        self.store.borrow_mut().insert(name.to_string(), value);
    }
}
