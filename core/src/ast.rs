//! Syntax tree.
//!
//! Produced by the parser and by macro expansion; evaluated by
//! [`Node::eval`](crate::interpreter).

use std::fmt;

use crate::value::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Literal value
    Const(Value),
    /// Variable lookup; unbound names evaluate to nil
    Ref(String),
    /// Application or macro expansion
    Call { callee: Box<Node>, args: Vec<Node> },
    /// Binds `key` in the innermost scope
    Assign { key: String, value: Box<Node> },
    /// First branch with a truthy condition wins
    Switch(Vec<Branch>),
    /// Sequential evaluation, yields the last value
    Block(Vec<Node>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub cond: Node,
    pub body: Node,
}

impl Node {
    pub fn nil() -> Self {
        Node::Const(Value::Nil)
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Node::Const(value.into())
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Node::Ref(name.into())
    }

    /// Call of a named callee, the only shape the parser produces.
    pub fn call(callee: impl Into<String>, args: Vec<Node>) -> Self {
        Node::Call {
            callee: Box::new(Node::Ref(callee.into())),
            args,
        }
    }

    pub fn assign(key: impl Into<String>, value: Node) -> Self {
        Node::Assign {
            key: key.into(),
            value: Box::new(value),
        }
    }

    /// Collapse a statement list: nothing is nil, one statement is itself.
    pub fn block(mut nodes: Vec<Node>) -> Self {
        match nodes.len() {
            0 => Node::nil(),
            1 => nodes.remove(0),
            _ => Node::Block(nodes),
        }
    }

    pub fn as_ref_name(&self) -> Option<&str> {
        match self {
            Node::Ref(name) => Some(name),
            _ => None,
        }
    }
}

// Nodes render back as surface syntax
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Const(Value::Number(n)) => write!(f, "{n}"),
            Node::Const(Value::String(s)) => write!(f, "{s:?}"),
            Node::Const(value) => write!(f, "{value}"),
            Node::Ref(name) => write!(f, "{name}"),
            Node::Call { callee, args } => {
                write!(f, "({callee}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                write!(f, ")")
            }
            Node::Assign { key, value } => write!(f, "(let {key} {value})"),
            Node::Switch(branches) => {
                write!(f, "(switch")?;
                for branch in branches {
                    write!(f, " {} {}", branch.cond, branch.body)?;
                }
                write!(f, ")")
            }
            Node::Block(nodes) => {
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{node}")?;
                }
                Ok(())
            }
        }
    }
}
