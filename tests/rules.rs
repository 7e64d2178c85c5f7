//! Default rules, snapshots and reports over in-memory trees.

use std::path::PathBuf;

use ::sigshow::*;

fn def(name: &str, args: Vec<Arg>, returns: Option<Expr>) -> Stmt {
    Stmt::FunctionDef(FunctionDef {
        name: name.into(),
        args: Arguments::new(args, vec![]).unwrap(),
        body: vec![Stmt::Pass],
        returns,
    })
}

fn tree() -> Module {
    Module {
        body: vec![
            Stmt::ClassDef(ClassDef {
                name: "Hoge".into(),
                bases: vec![],
                keywords: vec![],
                body: vec![def("fuga", vec![Arg::new("self"), Arg::new("y")], Some(Expr::name("int")))],
            }),
            def("f", vec![Arg::new("a")], None),
            def("f", vec![Arg::annotated("a", Expr::name("int"))], None),
        ],
    }
}

fn load() -> Sigshow {
    Sigshow::from_trees("mem", vec![(PathBuf::from("mem.json"), tree())]).unwrap()
}

#[test]
fn default_rules_report_gaps() {
    let k = load();
    let findings = k.rules().with_default_rules().run();
    let codes: Vec<(&str, &str)> = findings.iter().map(|f| (f.code.as_str(), f.scope_path.as_str())).collect();
    assert_eq!(
        codes,
        vec![
            ("SIG001", "Module.Hoge.fuga"),
            ("SIG002", "Module.f"),
            ("SIG003", "Module.f"),
        ]
    );
    assert_eq!(findings[0].extra["argument"], "y");

    let table = findings_to_table(&findings);
    assert!(table.contains("SIG003"));
    let md = findings_to_markdown(&findings);
    assert!(md.starts_with("# Sigshow Report"));
    assert!(findings_to_json(&findings).unwrap().contains("\"code\": \"SIG002\""));
}

#[test]
fn custom_rule() {
    struct EveryFunction;
    impl Rule for EveryFunction {
        fn code(&self) -> &'static str { "X001" }
        fn name(&self) -> &'static str { "every function" }
        fn run(&self, k: &Sigshow) -> Vec<Finding> {
            k.signatures
                .iter()
                .map(|s| Finding {
                    severity: Severity::Info,
                    code: self.code().into(),
                    message: s.text.clone(),
                    file: s.file.clone(),
                    scope_path: s.scope_path.clone(),
                    extra: serde_json::Value::Null,
                })
                .collect()
        }
    }

    let k = load();
    let findings = k.rules().add_rule(EveryFunction).run();
    let messages: Vec<&str> = findings.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(messages, vec!["fuga(self, y) -> int", "f(a: int)"]);
}

#[test]
fn snapshot_diff_tracks_signature_changes() {
    let before = load().snapshot();

    let mut changed = tree();
    changed.body.pop();
    changed.body.push(def("g", vec![], None));
    let after = Sigshow::from_trees("mem", vec![(PathBuf::from("mem.json"), changed)]).unwrap();

    let diff = after.diff_snapshot(&before);
    assert_eq!(diff.added.iter().map(|f| f.scope_path.as_str()).collect::<Vec<_>>(), vec!["Module.g"]);
    assert!(diff.removed.is_empty());
    assert_eq!(diff.changed.len(), 1);
    assert_eq!(diff.changed[0].0.text, "f(a: int)");
    assert_eq!(diff.changed[0].1.text, "f(a)");

    let json = before.to_json_string().unwrap();
    assert!(load().diff_snapshot(&Snapshot::from_json_str(&json).unwrap()).is_empty());
}
