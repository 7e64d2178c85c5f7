use crate::node::*;

/// Render an expression-level node (expressions, slices, argument lists and
/// their parts). Statements and modules have no expression form.
pub fn render(node: Node<'_>) -> Result<String, NodeError> {
    match node {
        Node::Expr(e) => Ok(show_expr(e)),
        Node::Slice(s) => Ok(show_slice(s)),
        Node::Arguments(a) => Ok(show_arguments(a)),
        Node::Arg(a) => Ok(show_arg(a)),
        Node::Keyword(k) => Ok(show_keyword(k)),
        Node::Comprehension(c) => Ok(show_comprehension(c)),
        Node::Module(_) | Node::Stmt(_) => Err(NodeError::UnsupportedNodeKind {
            kind: node.kind(),
            context: "expression rendering",
        }),
    }
}

pub fn show_expr(e: &Expr) -> String {
    match e {
        Expr::BoolOp { op, values } => {
            let sep = format!(" {} ", boolop_str(*op));
            join(values.iter().map(show_expr), &sep)
        }
        Expr::BinOp { left, op, right } => {
            format!("{} {} {}", show_expr(left), operator_str(*op), show_expr(right))
        }
        Expr::UnaryOp { op, operand } => format!("{} {}", unaryop_str(*op), show_expr(operand)),
        Expr::Lambda { args, body } => {
            if args.is_empty() {
                format!("lambda: {}", show_expr(body))
            } else {
                format!("lambda {}: {}", show_arguments(args), show_expr(body))
            }
        }
        Expr::IfExp { test, body, orelse } => format!(
            "{} if {} else {}",
            show_expr(body),
            show_expr(test),
            show_expr(orelse)
        ),
        Expr::Dict { entries } => {
            let items = entries.iter().map(|(k, v)| format!("{}:{}", show_expr(k), show_expr(v)));
            format!("{{{}}}", join(items, ", "))
        }
        Expr::Set { elts } => format!("{{{}}}", join(elts.iter().map(show_expr), ", ")),
        Expr::List { elts } => format!("[{}]", join(elts.iter().map(show_expr), ", ")),
        Expr::Tuple { elts } => match elts.as_slice() {
            [only] => format!("({},)", show_expr(only)),
            _ => format!("({})", join(elts.iter().map(show_expr), ", ")),
        },
        Expr::ListComp { elt, generators } => {
            format!("[{} {}]", show_expr(elt), show_generators(generators))
        }
        Expr::SetComp { elt, generators } => {
            format!("{{{} {}}}", show_expr(elt), show_generators(generators))
        }
        Expr::DictComp { key, value, generators } => format!(
            "{{{}: {} {}}}",
            show_expr(key),
            show_expr(value),
            show_generators(generators)
        ),
        Expr::GeneratorExp { elt, generators } => {
            format!("({} {})", show_expr(elt), show_generators(generators))
        }
        Expr::Yield { value: None } => "yield".to_string(),
        Expr::Yield { value: Some(v) } => format!("yield {}", show_expr(v)),
        Expr::YieldFrom { value } => format!("yield from {}", show_expr(value)),
        Expr::Compare { left, ops } => {
            let mut s = show_expr(left);
            for (op, comparator) in ops {
                s.push(' ');
                s.push_str(cmpop_str(*op));
                s.push(' ');
                s.push_str(&show_expr(comparator));
            }
            s
        }
        Expr::Call { func, args, keywords } => {
            let parts = args.iter().map(show_expr).chain(keywords.iter().map(show_keyword));
            format!("{}({})", show_expr(func), join(parts, ", "))
        }
        Expr::Constant { value } => show_constant(value),
        Expr::Ellipsis => "...".to_string(),
        Expr::Attribute { value, attr } => format!("{}.{}", show_expr(value), attr),
        Expr::Subscript { value, slice } => format!("{}[{}]", show_expr(value), show_slice(slice)),
        Expr::Starred { value } => format!("*{}", show_expr(value)),
        Expr::Name { id } => id.clone(),
    }
}

pub fn show_slice(s: &Slice) -> String {
    match s {
        // brackets belong to the enclosing subscript
        Slice::Index { value } => show_expr(value),
        Slice::Slice { lower, upper, step } => {
            let bound = |b: &Option<Box<Expr>>| b.as_deref().map(show_expr).unwrap_or_default();
            match step {
                Some(step) => format!("{}:{}:{}", bound(lower), bound(upper), show_expr(step)),
                None => format!("{}:{}", bound(lower), bound(upper)),
            }
        }
        Slice::ExtSlice { dims } => join(dims.iter().map(show_slice), ", "),
    }
}

/// Argument list text. An argument that has a default renders as `name=default`
/// and drops its annotation; only bare arguments show `name: annotation`.
pub fn show_arguments(a: &Arguments) -> String {
    let mut parts: Vec<String> = a
        .positional()
        .map(|(arg, default)| match default {
            Some(d) => format!("{}={}", arg.name, show_expr(d)),
            None => show_arg(arg),
        })
        .collect();

    match a.vararg() {
        Some(v) => parts.push(format!("*{}", show_arg(v))),
        None if !a.kwonlyargs().is_empty() => parts.push("*".to_string()),
        None => {}
    }

    for (arg, default) in a.kwonlyargs().iter().zip(a.kw_defaults()) {
        parts.push(match default {
            Some(d) => format!("{}={}", arg.name, show_expr(d)),
            None => show_arg(arg),
        });
    }

    if let Some(k) = a.kwarg() {
        parts.push(format!("**{}", show_arg(k)));
    }

    parts.join(", ")
}

pub fn show_arg(a: &Arg) -> String {
    match &a.annotation {
        Some(ann) => format!("{}: {}", a.name, show_expr(ann)),
        None => a.name.clone(),
    }
}

pub fn show_keyword(k: &Keyword) -> String {
    match &k.name {
        Some(name) => format!("{}={}", name, show_expr(&k.value)),
        None => format!("**{}", show_expr(&k.value)),
    }
}

pub fn show_comprehension(c: &Comprehension) -> String {
    let mut s = format!("for {} in {}", show_expr(&c.target), show_expr(&c.iter));
    for cond in &c.ifs {
        s.push_str(" if ");
        s.push_str(&show_expr(cond));
    }
    s
}

fn show_generators(generators: &[Comprehension]) -> String {
    join(generators.iter().map(show_comprehension), " ")
}

fn show_constant(c: &Constant) -> String {
    match c {
        Constant::Int(n) => n.to_string(),
        Constant::Float(f) => format!("{f:?}"),
        Constant::Str(s) => quote_str(s),
        Constant::Bytes(b) => quote_bytes(b),
        Constant::Bool(true) => "True".to_string(),
        Constant::Bool(false) => "False".to_string(),
        Constant::None => "None".to_string(),
    }
}

// Always single quotes, whatever the source used.
fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn quote_bytes(b: &[u8]) -> String {
    let mut out = String::from("b'");
    for &byte in b {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\x{byte:02x}")),
        }
    }
    out.push('\'');
    out
}

fn join(items: impl Iterator<Item = String>, sep: &str) -> String {
    items.collect::<Vec<_>>().join(sep)
}

fn boolop_str(op: BoolOp) -> &'static str {
    match op {
        BoolOp::And => "and",
        BoolOp::Or => "or",
    }
}

fn operator_str(op: Operator) -> &'static str {
    match op {
        Operator::Add => "+",
        Operator::Sub => "-",
        Operator::Mult => "*",
        Operator::Div => "/",
        Operator::Mod => "%",
        Operator::Pow => "**",
        Operator::LShift => "<<",
        Operator::RShift => ">>",
        Operator::BitOr => "|",
        Operator::BitXor => "^",
        Operator::BitAnd => "&",
        Operator::FloorDiv => "//",
    }
}

fn unaryop_str(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Invert => "~",
        UnaryOp::Not => "not",
        UnaryOp::UAdd => "+",
        UnaryOp::USub => "-",
    }
}

fn cmpop_str(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Eq => "==",
        CmpOp::NotEq => "!=",
        CmpOp::Lt => "<",
        CmpOp::LtE => "<=",
        CmpOp::Gt => ">",
        CmpOp::GtE => ">=",
        CmpOp::Is => "is",
        CmpOp::IsNot => "is not",
        CmpOp::In => "in",
        CmpOp::NotIn => "not in",
    }
}
