use crate::node::*;
use crate::show::expr::{show_arguments, show_expr};

/// `name(args)` or `name(args) -> returns` for a function definition.
pub fn render_signature(node: Node<'_>) -> Result<String, NodeError> {
    match node {
        Node::Stmt(Stmt::FunctionDef(f)) => Ok(show_function_def(f)),
        other => Err(NodeError::UnsupportedNodeKind {
            kind: other.kind(),
            context: "signature rendering",
        }),
    }
}

pub fn show_function_def(f: &FunctionDef) -> String {
    let args = show_arguments(&f.args);
    match &f.returns {
        Some(ret) => format!("{}({}) -> {}", f.name, args, show_expr(ret)),
        None => format!("{}({})", f.name, args),
    }
}
