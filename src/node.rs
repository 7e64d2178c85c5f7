//! Syntax tree handed over by the external parser.
//!
//! Trees are built once (in code or from JSON) and never mutated afterwards. Every
//! kind is a variant of a closed enum so dispatch over it is an exhaustive `match`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error("unsupported node kind `{kind}` for {context}")]
    UnsupportedNodeKind { kind: NodeKind, context: &'static str },

    #[error("malformed `{kind}` node: {reason}")]
    MalformedNode { kind: NodeKind, reason: String },
}

fn malformed(kind: NodeKind, reason: String) -> NodeError {
    NodeError::MalformedNode { kind, reason }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Module,
    // statements
    FunctionDef,
    ClassDef,
    Return,
    Assign,
    ExprStmt,
    If,
    For,
    While,
    Pass,
    // expressions
    BoolOp,
    BinOp,
    UnaryOp,
    Lambda,
    IfExp,
    Dict,
    Set,
    List,
    Tuple,
    ListComp,
    SetComp,
    DictComp,
    GeneratorExp,
    Yield,
    YieldFrom,
    Compare,
    Call,
    Constant,
    Ellipsis,
    Attribute,
    Subscript,
    Starred,
    Name,
    // slices
    Index,
    Slice,
    ExtSlice,
    // auxiliary
    Arguments,
    Arg,
    Keyword,
    Comprehension,
}

impl NodeKind {
    /// Class name of the kind in the source grammar. The root kind name seeds scope paths.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Module => "Module",
            NodeKind::FunctionDef => "FunctionDef",
            NodeKind::ClassDef => "ClassDef",
            NodeKind::Return => "Return",
            NodeKind::Assign => "Assign",
            NodeKind::ExprStmt => "Expr",
            NodeKind::If => "If",
            NodeKind::For => "For",
            NodeKind::While => "While",
            NodeKind::Pass => "Pass",
            NodeKind::BoolOp => "BoolOp",
            NodeKind::BinOp => "BinOp",
            NodeKind::UnaryOp => "UnaryOp",
            NodeKind::Lambda => "Lambda",
            NodeKind::IfExp => "IfExp",
            NodeKind::Dict => "Dict",
            NodeKind::Set => "Set",
            NodeKind::List => "List",
            NodeKind::Tuple => "Tuple",
            NodeKind::ListComp => "ListComp",
            NodeKind::SetComp => "SetComp",
            NodeKind::DictComp => "DictComp",
            NodeKind::GeneratorExp => "GeneratorExp",
            NodeKind::Yield => "Yield",
            NodeKind::YieldFrom => "YieldFrom",
            NodeKind::Compare => "Compare",
            NodeKind::Call => "Call",
            NodeKind::Constant => "Constant",
            NodeKind::Ellipsis => "Ellipsis",
            NodeKind::Attribute => "Attribute",
            NodeKind::Subscript => "Subscript",
            NodeKind::Starred => "Starred",
            NodeKind::Name => "Name",
            NodeKind::Index => "Index",
            NodeKind::Slice => "Slice",
            NodeKind::ExtSlice => "ExtSlice",
            NodeKind::Arguments => "arguments",
            NodeKind::Arg => "arg",
            NodeKind::Keyword => "keyword",
            NodeKind::Comprehension => "comprehension",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// operators

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mult,
    Div,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    FloorDiv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Invert,
    Not,
    UAdd,
    USub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

// tree

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Module {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Stmt {
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Return {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Expr>,
    },
    Assign {
        targets: Vec<Expr>,
        value: Expr,
    },
    Expr {
        value: Expr,
    },
    If {
        test: Expr,
        body: Vec<Stmt>,
        #[serde(default)]
        orelse: Vec<Stmt>,
    },
    For {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        #[serde(default)]
        orelse: Vec<Stmt>,
    },
    While {
        test: Expr,
        body: Vec<Stmt>,
        #[serde(default)]
        orelse: Vec<Stmt>,
    },
    Pass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub args: Arguments,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    #[serde(default)]
    pub bases: Vec<Expr>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Expr {
    BoolOp {
        op: BoolOp,
        values: Vec<Expr>,
    },
    BinOp {
        left: Box<Expr>,
        op: Operator,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Lambda {
        args: Arguments,
        body: Box<Expr>,
    },
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    /// Key/value pairs; build from separate sequences with [`Expr::dict`].
    Dict {
        entries: Vec<(Expr, Expr)>,
    },
    Set {
        elts: Vec<Expr>,
    },
    List {
        elts: Vec<Expr>,
    },
    Tuple {
        elts: Vec<Expr>,
    },
    ListComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    SetComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    DictComp {
        key: Box<Expr>,
        value: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    GeneratorExp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    Yield {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Box<Expr>>,
    },
    YieldFrom {
        value: Box<Expr>,
    },
    /// Flat chain `left op1 c1 op2 c2 ...`; a nested comparison is a `Compare` inside an operand.
    Compare {
        left: Box<Expr>,
        ops: Vec<(CmpOp, Expr)>,
    },
    Call {
        func: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
        #[serde(default)]
        keywords: Vec<Keyword>,
    },
    Constant {
        value: Constant,
    },
    Ellipsis,
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    Subscript {
        value: Box<Expr>,
        slice: Box<Slice>,
    },
    Starred {
        value: Box<Expr>,
    },
    Name {
        id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Constant {
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Bool(bool),
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Slice {
    Index {
        value: Box<Expr>,
    },
    Slice {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lower: Option<Box<Expr>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        upper: Option<Box<Expr>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<Box<Expr>>,
    },
    ExtSlice {
        dims: Vec<Slice>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arg {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    /// `None` for `**value` unpacking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comprehension {
    pub target: Expr,
    pub iter: Expr,
    #[serde(default)]
    pub ifs: Vec<Expr>,
}

/// Argument list of a function or lambda.
///
/// `defaults` bind to the trailing `args`; `kw_defaults` pair one-to-one with
/// `kwonlyargs`. Both are checked on construction and on deserialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawArguments", into = "RawArguments")]
pub struct Arguments {
    args: Vec<Arg>,
    defaults: Vec<Expr>,
    vararg: Option<Box<Arg>>,
    kwonlyargs: Vec<Arg>,
    kw_defaults: Vec<Option<Expr>>,
    kwarg: Option<Box<Arg>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawArguments {
    #[serde(default)]
    args: Vec<Arg>,
    #[serde(default)]
    defaults: Vec<Expr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vararg: Option<Arg>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    kwonlyargs: Vec<Arg>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    kw_defaults: Vec<Option<Expr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kwarg: Option<Arg>,
}

impl TryFrom<RawArguments> for Arguments {
    type Error = NodeError;

    fn try_from(raw: RawArguments) -> Result<Self, Self::Error> {
        let mut out = Arguments::new(raw.args, raw.defaults)?;
        out = out.with_keyword_only(raw.kwonlyargs, raw.kw_defaults)?;
        out.vararg = raw.vararg.map(Box::new);
        out.kwarg = raw.kwarg.map(Box::new);
        Ok(out)
    }
}

impl From<Arguments> for RawArguments {
    fn from(a: Arguments) -> Self {
        RawArguments {
            args: a.args,
            defaults: a.defaults,
            vararg: a.vararg.map(|b| *b),
            kwonlyargs: a.kwonlyargs,
            kw_defaults: a.kw_defaults,
            kwarg: a.kwarg.map(|b| *b),
        }
    }
}

impl Arguments {
    pub fn new(args: Vec<Arg>, defaults: Vec<Expr>) -> Result<Self, NodeError> {
        if defaults.len() > args.len() {
            return Err(malformed(
                NodeKind::Arguments,
                format!("{} defaults for {} arguments", defaults.len(), args.len()),
            ));
        }
        Ok(Arguments { args, defaults, ..Default::default() })
    }

    /// Attach keyword-only arguments. An empty `kw_defaults` means none of them has a default.
    pub fn with_keyword_only(
        mut self,
        kwonlyargs: Vec<Arg>,
        kw_defaults: Vec<Option<Expr>>,
    ) -> Result<Self, NodeError> {
        let kw_defaults = if kw_defaults.is_empty() {
            vec![None; kwonlyargs.len()]
        } else {
            kw_defaults
        };
        if kw_defaults.len() != kwonlyargs.len() {
            return Err(malformed(
                NodeKind::Arguments,
                format!(
                    "{} keyword-only defaults for {} keyword-only arguments",
                    kw_defaults.len(),
                    kwonlyargs.len()
                ),
            ));
        }
        self.kwonlyargs = kwonlyargs;
        self.kw_defaults = kw_defaults;
        Ok(self)
    }

    pub fn with_vararg(mut self, arg: Arg) -> Self { self.vararg = Some(Box::new(arg)); self }
    pub fn with_kwarg(mut self, arg: Arg) -> Self { self.kwarg = Some(Box::new(arg)); self }

    pub fn args(&self) -> &[Arg] { &self.args }
    pub fn defaults(&self) -> &[Expr] { &self.defaults }
    pub fn vararg(&self) -> Option<&Arg> { self.vararg.as_deref() }
    pub fn kwonlyargs(&self) -> &[Arg] { &self.kwonlyargs }
    pub fn kw_defaults(&self) -> &[Option<Expr>] { &self.kw_defaults }
    pub fn kwarg(&self) -> Option<&Arg> { self.kwarg.as_deref() }

    /// Positional arguments paired with their default, aligned to the trailing arguments.
    pub fn positional(&self) -> impl Iterator<Item = (&Arg, Option<&Expr>)> {
        let bare = self.args.len() - self.defaults.len();
        self.args.iter().enumerate().map(move |(i, a)| {
            let default = if i < bare { None } else { self.defaults.get(i - bare) };
            (a, default)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.vararg.is_none() && self.kwonlyargs.is_empty() && self.kwarg.is_none()
    }
}

// convenience constructors

impl Expr {
    pub fn name(id: impl Into<String>) -> Self { Expr::Name { id: id.into() } }
    pub fn int(n: i64) -> Self { Expr::Constant { value: Constant::Int(n) } }
    pub fn float(n: f64) -> Self { Expr::Constant { value: Constant::Float(n) } }
    pub fn str(s: impl Into<String>) -> Self { Expr::Constant { value: Constant::Str(s.into()) } }
    pub fn bool(b: bool) -> Self { Expr::Constant { value: Constant::Bool(b) } }
    pub fn none() -> Self { Expr::Constant { value: Constant::None } }

    pub fn binop(left: Expr, op: Operator, right: Expr) -> Self {
        Expr::BinOp { left: Box::new(left), op, right: Box::new(right) }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::UnaryOp { op, operand: Box::new(operand) }
    }

    pub fn attr(value: Expr, attr: impl Into<String>) -> Self {
        Expr::Attribute { value: Box::new(value), attr: attr.into() }
    }

    pub fn call(func: Expr, args: Vec<Expr>, keywords: Vec<Keyword>) -> Self {
        Expr::Call { func: Box::new(func), args, keywords }
    }

    pub fn list(elts: Vec<Expr>) -> Self { Expr::List { elts } }

    pub fn subscript(value: Expr, slice: Slice) -> Self {
        Expr::Subscript { value: Box::new(value), slice: Box::new(slice) }
    }

    pub fn dict(keys: Vec<Expr>, values: Vec<Expr>) -> Result<Self, NodeError> {
        if keys.len() != values.len() {
            return Err(malformed(
                NodeKind::Dict,
                format!("{} keys for {} values", keys.len(), values.len()),
            ));
        }
        Ok(Expr::Dict { entries: keys.into_iter().zip(values).collect() })
    }

    pub fn compare(left: Expr, ops: Vec<CmpOp>, comparators: Vec<Expr>) -> Result<Self, NodeError> {
        if ops.len() != comparators.len() {
            return Err(malformed(
                NodeKind::Compare,
                format!("{} operators for {} comparators", ops.len(), comparators.len()),
            ));
        }
        Ok(Expr::Compare { left: Box::new(left), ops: ops.into_iter().zip(comparators).collect() })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::BoolOp { .. } => NodeKind::BoolOp,
            Expr::BinOp { .. } => NodeKind::BinOp,
            Expr::UnaryOp { .. } => NodeKind::UnaryOp,
            Expr::Lambda { .. } => NodeKind::Lambda,
            Expr::IfExp { .. } => NodeKind::IfExp,
            Expr::Dict { .. } => NodeKind::Dict,
            Expr::Set { .. } => NodeKind::Set,
            Expr::List { .. } => NodeKind::List,
            Expr::Tuple { .. } => NodeKind::Tuple,
            Expr::ListComp { .. } => NodeKind::ListComp,
            Expr::SetComp { .. } => NodeKind::SetComp,
            Expr::DictComp { .. } => NodeKind::DictComp,
            Expr::GeneratorExp { .. } => NodeKind::GeneratorExp,
            Expr::Yield { .. } => NodeKind::Yield,
            Expr::YieldFrom { .. } => NodeKind::YieldFrom,
            Expr::Compare { .. } => NodeKind::Compare,
            Expr::Call { .. } => NodeKind::Call,
            Expr::Constant { .. } => NodeKind::Constant,
            Expr::Ellipsis => NodeKind::Ellipsis,
            Expr::Attribute { .. } => NodeKind::Attribute,
            Expr::Subscript { .. } => NodeKind::Subscript,
            Expr::Starred { .. } => NodeKind::Starred,
            Expr::Name { .. } => NodeKind::Name,
        }
    }
}

impl Slice {
    pub fn index(value: Expr) -> Self { Slice::Index { value: Box::new(value) } }

    pub fn range(lower: Option<Expr>, upper: Option<Expr>, step: Option<Expr>) -> Self {
        Slice::Slice {
            lower: lower.map(Box::new),
            upper: upper.map(Box::new),
            step: step.map(Box::new),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Slice::Index { .. } => NodeKind::Index,
            Slice::Slice { .. } => NodeKind::Slice,
            Slice::ExtSlice { .. } => NodeKind::ExtSlice,
        }
    }
}

impl Stmt {
    pub fn kind(&self) -> NodeKind {
        match self {
            Stmt::FunctionDef(_) => NodeKind::FunctionDef,
            Stmt::ClassDef(_) => NodeKind::ClassDef,
            Stmt::Return { .. } => NodeKind::Return,
            Stmt::Assign { .. } => NodeKind::Assign,
            Stmt::Expr { .. } => NodeKind::ExprStmt,
            Stmt::If { .. } => NodeKind::If,
            Stmt::For { .. } => NodeKind::For,
            Stmt::While { .. } => NodeKind::While,
            Stmt::Pass => NodeKind::Pass,
        }
    }
}

impl Arg {
    pub fn new(name: impl Into<String>) -> Self { Arg { name: name.into(), annotation: None } }

    pub fn annotated(name: impl Into<String>, annotation: Expr) -> Self {
        Arg { name: name.into(), annotation: Some(annotation) }
    }
}

impl Keyword {
    pub fn new(name: impl Into<String>, value: Expr) -> Self { Keyword { name: Some(name.into()), value } }
}

impl Comprehension {
    pub fn new(target: Expr, iter: Expr, ifs: Vec<Expr>) -> Self { Comprehension { target, iter, ifs } }
}

/// Borrowed view over any node of a tree.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Module(&'a Module),
    Stmt(&'a Stmt),
    Expr(&'a Expr),
    Slice(&'a Slice),
    Arguments(&'a Arguments),
    Arg(&'a Arg),
    Keyword(&'a Keyword),
    Comprehension(&'a Comprehension),
}

impl<'a> From<&'a Module> for Node<'a> { fn from(n: &'a Module) -> Self { Node::Module(n) } }
impl<'a> From<&'a Stmt> for Node<'a> { fn from(n: &'a Stmt) -> Self { Node::Stmt(n) } }
impl<'a> From<&'a Expr> for Node<'a> { fn from(n: &'a Expr) -> Self { Node::Expr(n) } }
impl<'a> From<&'a Slice> for Node<'a> { fn from(n: &'a Slice) -> Self { Node::Slice(n) } }
impl<'a> From<&'a Arguments> for Node<'a> { fn from(n: &'a Arguments) -> Self { Node::Arguments(n) } }
impl<'a> From<&'a Arg> for Node<'a> { fn from(n: &'a Arg) -> Self { Node::Arg(n) } }
impl<'a> From<&'a Keyword> for Node<'a> { fn from(n: &'a Keyword) -> Self { Node::Keyword(n) } }
impl<'a> From<&'a Comprehension> for Node<'a> { fn from(n: &'a Comprehension) -> Self { Node::Comprehension(n) } }

impl<'a> Node<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Module(_) => NodeKind::Module,
            Node::Stmt(s) => s.kind(),
            Node::Expr(e) => e.kind(),
            Node::Slice(s) => s.kind(),
            Node::Arguments(_) => NodeKind::Arguments,
            Node::Arg(_) => NodeKind::Arg,
            Node::Keyword(_) => NodeKind::Keyword,
            Node::Comprehension(_) => NodeKind::Comprehension,
        }
    }

    /// Direct children, in field order. Operator tags are not nodes.
    pub fn children(&self) -> Vec<Node<'a>> {
        let mut out: Vec<Node<'a>> = Vec::new();
        match *self {
            Node::Module(m) => out.extend(m.body.iter().map(Node::Stmt)),
            Node::Stmt(s) => match s {
                Stmt::FunctionDef(f) => {
                    out.push(Node::Arguments(&f.args));
                    out.extend(f.body.iter().map(Node::Stmt));
                    out.extend(f.returns.iter().map(Node::Expr));
                }
                Stmt::ClassDef(c) => {
                    out.extend(c.bases.iter().map(Node::Expr));
                    out.extend(c.keywords.iter().map(Node::Keyword));
                    out.extend(c.body.iter().map(Node::Stmt));
                }
                Stmt::Return { value } => out.extend(value.iter().map(Node::Expr)),
                Stmt::Assign { targets, value } => {
                    out.extend(targets.iter().map(Node::Expr));
                    out.push(Node::Expr(value));
                }
                Stmt::Expr { value } => out.push(Node::Expr(value)),
                Stmt::If { test, body, orelse } | Stmt::While { test, body, orelse } => {
                    out.push(Node::Expr(test));
                    out.extend(body.iter().map(Node::Stmt));
                    out.extend(orelse.iter().map(Node::Stmt));
                }
                Stmt::For { target, iter, body, orelse } => {
                    out.push(Node::Expr(target));
                    out.push(Node::Expr(iter));
                    out.extend(body.iter().map(Node::Stmt));
                    out.extend(orelse.iter().map(Node::Stmt));
                }
                Stmt::Pass => {}
            },
            Node::Expr(e) => match e {
                Expr::BoolOp { values, .. } => out.extend(values.iter().map(Node::Expr)),
                Expr::BinOp { left, right, .. } => {
                    out.push(Node::Expr(left));
                    out.push(Node::Expr(right));
                }
                Expr::UnaryOp { operand, .. } => out.push(Node::Expr(operand)),
                Expr::Lambda { args, body } => {
                    out.push(Node::Arguments(args));
                    out.push(Node::Expr(body));
                }
                Expr::IfExp { test, body, orelse } => {
                    out.push(Node::Expr(test));
                    out.push(Node::Expr(body));
                    out.push(Node::Expr(orelse));
                }
                Expr::Dict { entries } => {
                    out.extend(entries.iter().map(|(k, _)| Node::Expr(k)));
                    out.extend(entries.iter().map(|(_, v)| Node::Expr(v)));
                }
                Expr::Set { elts } | Expr::List { elts } | Expr::Tuple { elts } => {
                    out.extend(elts.iter().map(Node::Expr))
                }
                Expr::ListComp { elt, generators }
                | Expr::SetComp { elt, generators }
                | Expr::GeneratorExp { elt, generators } => {
                    out.push(Node::Expr(elt));
                    out.extend(generators.iter().map(Node::Comprehension));
                }
                Expr::DictComp { key, value, generators } => {
                    out.push(Node::Expr(key));
                    out.push(Node::Expr(value));
                    out.extend(generators.iter().map(Node::Comprehension));
                }
                Expr::Yield { value } => out.extend(value.iter().map(|v| Node::Expr(v))),
                Expr::YieldFrom { value } | Expr::Starred { value } | Expr::Attribute { value, .. } => {
                    out.push(Node::Expr(value))
                }
                Expr::Compare { left, ops } => {
                    out.push(Node::Expr(left));
                    out.extend(ops.iter().map(|(_, c)| Node::Expr(c)));
                }
                Expr::Call { func, args, keywords } => {
                    out.push(Node::Expr(func));
                    out.extend(args.iter().map(Node::Expr));
                    out.extend(keywords.iter().map(Node::Keyword));
                }
                Expr::Subscript { value, slice } => {
                    out.push(Node::Expr(value));
                    out.push(Node::Slice(slice));
                }
                Expr::Constant { .. } | Expr::Ellipsis | Expr::Name { .. } => {}
            },
            Node::Slice(s) => match s {
                Slice::Index { value } => out.push(Node::Expr(value)),
                Slice::Slice { lower, upper, step } => {
                    for part in [lower, upper, step].into_iter().flatten() {
                        out.push(Node::Expr(part));
                    }
                }
                Slice::ExtSlice { dims } => out.extend(dims.iter().map(Node::Slice)),
            },
            Node::Arguments(a) => {
                out.extend(a.args.iter().map(Node::Arg));
                out.extend(a.vararg.as_deref().map(Node::Arg));
                out.extend(a.kwonlyargs.iter().map(Node::Arg));
                out.extend(a.kw_defaults.iter().flatten().map(Node::Expr));
                out.extend(a.kwarg.as_deref().map(Node::Arg));
                out.extend(a.defaults.iter().map(Node::Expr));
            }
            Node::Arg(a) => out.extend(a.annotation.iter().map(Node::Expr)),
            Node::Keyword(k) => out.push(Node::Expr(&k.value)),
            Node::Comprehension(c) => {
                out.push(Node::Expr(&c.target));
                out.push(Node::Expr(&c.iter));
                out.extend(c.ifs.iter().map(Node::Expr));
            }
        }
        out
    }
}
