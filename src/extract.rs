use crate::model::*;
use crate::node::*;
use crate::resolve::{annotation_name, resolve};
use crate::show::show_function_def;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Scope-path walk over one tree.
///
/// The stack starts with the root's kind name; every visited node pushes its
/// resolved name (possibly empty) for the duration of its subtree. Each
/// function definition is recorded under the dot-joined stack, replacing any
/// earlier entry at the same path.
///
/// Each [`Extractor::run`] starts from an empty registry.
#[derive(Debug, Default)]
pub struct Extractor {
    stack: Vec<String>,
    registry: Registry,
    texts: BTreeMap<String, String>,
    shadowed: Vec<String>,
}

impl Extractor {
    pub fn new() -> Self { Self::default() }

    pub fn run<'a>(&mut self, root: impl Into<Node<'a>>) -> Result<(), NodeError> {
        let root = root.into();
        self.stack.clear();
        self.registry.clear();
        self.texts.clear();
        self.shadowed.clear();

        self.stack.push(root.kind().name().to_string());
        self.visit(root);
        self.stack.clear();
        Ok(())
    }

    fn visit(&mut self, node: Node<'_>) {
        if let Node::Stmt(Stmt::FunctionDef(f)) = node {
            let path = self.stack.join(".");
            self.record(path, function_signature(f), show_function_def(f));
        }

        for child in node.children() {
            let segment = resolve(child);
            trace!(kind = %child.kind(), segment = %segment, depth = self.stack.len(), "enter");
            self.stack.push(segment);
            self.visit(child);
            self.stack.pop();
        }
    }

    fn record(&mut self, path: String, sig: FunctionSignature, text: String) {
        debug!(scope_path = %path, signature = %text, "recorded signature");
        if self.registry.insert(path.clone(), sig).is_some() {
            debug!(scope_path = %path, "signature overwritten by later definition");
            self.shadowed.push(path.clone());
        }
        self.texts.insert(path, text);
    }

    pub fn registry(&self) -> &Registry { &self.registry }
    pub fn into_registry(self) -> Registry { self.registry }

    /// Rendered signature text per scope path.
    pub fn texts(&self) -> &BTreeMap<String, String> { &self.texts }

    /// Scope paths that were recorded more than once, in order of overwrite.
    pub fn shadowed(&self) -> &[String] { &self.shadowed }
}

/// Signature record for one definition: positional arguments with their
/// resolved annotation, and the resolved return annotation.
pub fn function_signature(f: &FunctionDef) -> FunctionSignature {
    let args = f
        .args
        .args()
        .iter()
        .map(|a| ArgBinding { symbol: a.name.clone(), ty: annotation_name(a.annotation.as_ref()) })
        .collect();
    FunctionSignature { args, ret: annotation_name(f.returns.as_ref()) }
}

pub fn extract(root: &Module) -> Result<Registry, NodeError> {
    extract_node(Node::Module(root))
}

pub fn extract_node(root: Node<'_>) -> Result<Registry, NodeError> {
    let mut ex = Extractor::new();
    ex.run(root)?;
    Ok(ex.into_registry())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(symbol: &str, ty: &str) -> ArgBinding {
        ArgBinding { symbol: symbol.into(), ty: ty.into() }
    }

    fn def(name: &str, args: Vec<Arg>, returns: Option<Expr>, body: Vec<Stmt>) -> Stmt {
        Stmt::FunctionDef(FunctionDef {
            name: name.into(),
            args: Arguments::new(args, vec![]).unwrap(),
            body,
            returns,
        })
    }

    fn class(name: &str, body: Vec<Stmt>) -> Stmt {
        Stmt::ClassDef(ClassDef {
            name: name.into(),
            bases: vec![Expr::name("object")],
            keywords: vec![],
            body,
        })
    }

    fn fuga_args() -> Vec<Arg> {
        vec![Arg::new("self"), Arg::annotated("x", Expr::name("int")), Arg::new("y")]
    }

    fn hoge_module() -> Module {
        Module {
            body: vec![
                class(
                    "Hoge",
                    vec![def(
                        "fuga",
                        fuga_args(),
                        Some(Expr::name("int")),
                        vec![Stmt::Return { value: Some(Expr::name("x")) }],
                    )],
                ),
                def(
                    "hoge",
                    vec![Arg::new("self"), Arg::annotated("x", Expr::name("int")), Arg::annotated("y", Expr::name("str"))],
                    Some(Expr::name("int")),
                    vec![Stmt::Return { value: Some(Expr::name("x")) }],
                ),
            ],
        }
    }

    #[test]
    fn method_in_class() {
        let reg = extract(&hoge_module()).unwrap();
        let fuga = &reg["Module.Hoge.fuga"];
        assert_eq!(
            fuga.args,
            vec![binding("self", "undefined"), binding("x", "int"), binding("y", "undefined")]
        );
        assert_eq!(fuga.ret, "int");

        let hoge = &reg["Module.hoge"];
        assert_eq!(hoge.args, vec![binding("self", "undefined"), binding("x", "int"), binding("y", "str")]);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn class_method_is_the_only_key() {
        let mut m = hoge_module();
        m.body.truncate(1);
        let reg = extract(&m).unwrap();
        assert_eq!(reg.keys().collect::<Vec<_>>(), vec!["Module.Hoge.fuga"]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let m = hoge_module();
        assert_eq!(extract(&m).unwrap(), extract(&m).unwrap());

        let mut ex = Extractor::new();
        ex.run(&m).unwrap();
        ex.run(&m).unwrap();
        assert_eq!(ex.registry(), &extract(&m).unwrap());
    }

    #[test]
    fn rerun_does_not_report_shadowing() {
        let m = Module {
            body: vec![def("f", vec![], None, vec![]), def("g", vec![], None, vec![])],
        };
        let mut ex = Extractor::new();
        ex.run(&m).unwrap();
        ex.run(&m).unwrap();
        assert!(ex.shadowed().is_empty());
        assert_eq!(ex.texts().keys().collect::<Vec<_>>(), vec!["Module.f", "Module.g"]);
    }

    #[test]
    fn run_replaces_previous_tree() {
        let mut ex = Extractor::new();
        ex.run(&hoge_module()).unwrap();
        let other = Module { body: vec![def("solo", vec![], None, vec![])] };
        ex.run(&other).unwrap();
        assert_eq!(ex.registry().keys().collect::<Vec<_>>(), vec!["Module.solo"]);
    }

    #[test]
    fn unnamed_scopes_leave_empty_segments() {
        let m = Module {
            body: vec![Stmt::If {
                test: Expr::bool(true),
                body: vec![def("fuga", vec![], None, vec![Stmt::Pass])],
                orelse: vec![],
            }],
        };
        let reg = extract(&m).unwrap();
        assert_eq!(reg.keys().collect::<Vec<_>>(), vec!["Module..fuga"]);
        assert_eq!(reg["Module..fuga"].ret, "undefined");
    }

    #[test]
    fn nested_definitions() {
        let inner = def("inner", vec![Arg::annotated("n", Expr::attr(Expr::name("np"), "int64"))], None, vec![]);
        let m = Module { body: vec![def("outer", vec![], None, vec![inner])] };
        let reg = extract(&m).unwrap();
        assert!(reg.contains_key("Module.outer"));
        assert_eq!(reg["Module.outer.inner"].args, vec![binding("n", "np.int64")]);
    }

    #[test]
    fn later_definition_overwrites() {
        let m = Module {
            body: vec![
                def("f", vec![Arg::new("a")], None, vec![]),
                def("f", vec![Arg::annotated("a", Expr::name("int"))], None, vec![]),
            ],
        };
        let mut ex = Extractor::new();
        ex.run(&m).unwrap();
        assert_eq!(ex.registry()["Module.f"].args, vec![binding("a", "int")]);
        assert_eq!(ex.shadowed(), &["Module.f".to_string()]);
        assert_eq!(ex.texts()["Module.f"], "f(a: int)");
    }

    #[test]
    fn root_kind_seeds_the_path() {
        let c = class("Hoge", vec![def("fuga", vec![], None, vec![])]);
        let reg = extract_node(Node::Stmt(&c)).unwrap();
        assert_eq!(reg.keys().collect::<Vec<_>>(), vec!["ClassDef.fuga"]);
    }

    #[test]
    fn root_function_is_recorded_under_its_kind() {
        let f = def("solo", vec![], None, vec![]);
        let reg = extract_node(Node::Stmt(&f)).unwrap();
        assert_eq!(reg.keys().collect::<Vec<_>>(), vec!["FunctionDef"]);
    }
}
