use crate::node::*;

/// Stable name of a node: identifiers, dotted attribute chains, and declared
/// names of function/class definitions. Everything else resolves to `""`, which
/// still takes a slot in a scope path.
pub fn resolve(node: Node<'_>) -> String {
    match node {
        Node::Expr(e) => resolve_expr(e),
        Node::Stmt(Stmt::FunctionDef(f)) => f.name.clone(),
        Node::Stmt(Stmt::ClassDef(c)) => c.name.clone(),
        _ => String::new(),
    }
}

pub fn resolve_expr(e: &Expr) -> String {
    match e {
        Expr::Name { id } => id.clone(),
        Expr::Attribute { value, attr } => format!("{}.{}", resolve_expr(value), attr),
        _ => String::new(),
    }
}

/// Text of an optional annotation, `"undefined"` when absent.
pub fn annotation_name(ann: Option<&Expr>) -> String {
    match ann {
        Some(e) => resolve_expr(e),
        None => UNDEFINED.to_string(),
    }
}

pub const UNDEFINED: &str = "undefined";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_and_attribute_chains() {
        assert_eq!(resolve(Node::Expr(&Expr::name("int"))), "int");
        let chain = Expr::attr(Expr::attr(Expr::name("os"), "path"), "join");
        assert_eq!(resolve(Node::Expr(&chain)), "os.path.join");
    }

    #[test]
    fn declared_names() {
        let f = Stmt::FunctionDef(FunctionDef {
            name: "fuga".into(),
            args: Arguments::default(),
            body: vec![],
            returns: None,
        });
        assert_eq!(resolve(Node::Stmt(&f)), "fuga");
        let c = Stmt::ClassDef(ClassDef { name: "Hoge".into(), bases: vec![], keywords: vec![], body: vec![] });
        assert_eq!(resolve(Node::Stmt(&c)), "Hoge");
    }

    #[test]
    fn everything_else_is_empty() {
        assert_eq!(resolve(Node::Expr(&Expr::int(1))), "");
        assert_eq!(resolve(Node::Stmt(&Stmt::Pass)), "");
        assert_eq!(resolve(Node::Arg(&Arg::new("x"))), "");
        let sub = Expr::subscript(Expr::name("List"), Slice::index(Expr::name("int")));
        assert_eq!(resolve(Node::Expr(&sub)), "");
        // attribute on an unnamed base keeps the dot
        let call_attr = Expr::attr(Expr::call(Expr::name("f"), vec![], vec![]), "x");
        assert_eq!(resolve(Node::Expr(&call_attr)), ".x");
    }

    #[test]
    fn missing_annotation_is_undefined() {
        assert_eq!(annotation_name(None), "undefined");
        assert_eq!(annotation_name(Some(&Expr::name("str"))), "str");
    }
}
