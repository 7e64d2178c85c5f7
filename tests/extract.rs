//! Loading JSON trees from disk and extracting signature registries.

use std::path::PathBuf;

use sigshow::{ArgBinding, Sigshow, SigshowError, extract, Module};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn binding(symbol: &str, ty: &str) -> ArgBinding {
    ArgBinding { symbol: symbol.into(), ty: ty.into() }
}

#[test]
fn class_method_and_free_function() {
    let k = Sigshow::new("fixtures").scan_file(fixtures().join("hoge.json")).parse().unwrap();

    let fuga = k.lookup("Module.Hoge.fuga");
    assert_eq!(fuga.len(), 1);
    assert_eq!(
        fuga[0].signature.args,
        vec![binding("self", "undefined"), binding("x", "int"), binding("y", "undefined")]
    );
    assert_eq!(fuga[0].signature.ret, "int");
    assert_eq!(fuga[0].text, "fuga(self, x: int, y) -> int");
    assert_eq!(fuga[0].name, "fuga");

    let hoge = k.lookup("Module.hoge");
    assert_eq!(hoge[0].signature.args[2], binding("y", "str"));
    assert_eq!(k.signatures.len(), 2);
}

#[test]
fn registry_json_matches_record_shape() {
    let path = fixtures().join("hoge.json");
    let k = Sigshow::new("fixtures").scan_file(&path).parse().unwrap();
    let json = serde_json::to_value(k.registry_for(&path)).unwrap();
    assert_eq!(
        json["Module.Hoge.fuga"],
        serde_json::json!({
            "args": [
                {"symbol": "self", "type": "undefined"},
                {"symbol": "x", "type": "int"},
                {"symbol": "y", "type": "undefined"}
            ],
            "return": "int"
        })
    );
}

#[test]
fn folder_scan_uses_include_globs() {
    let k = Sigshow::new("fixtures").scan_in_folder(fixtures()).parse().unwrap();
    assert_eq!(k.files.len(), 2);

    let scale = k.lookup("Module.scale");
    assert_eq!(scale[0].text, "scale(xs, factor=1.5)");
    assert_eq!(scale[0].signature.args, vec![binding("xs", "undefined"), binding("factor", "float")]);

    // `if __name__ == ...` contributes an empty segment
    let main = k.lookup("Module..main");
    assert_eq!(main[0].signature.ret, "typing.NoReturn");
    assert_eq!(main[0].text, "main() -> typing.NoReturn");
}

#[test]
fn exclude_glob_and_queries() {
    let k = Sigshow::new("fixtures")
        .scan_in_folder(fixtures())
        .exclude_glob("**/pkg/**")
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(k.files.len(), 1);

    assert_eq!(k.signatures().in_scope("Module.Hoge").count(), 1);
    assert_eq!(k.signatures().in_scope("Module.Hog").count(), 0);
    assert_eq!(k.signatures().takes_type("str").collect()[0].scope_path, "Module.hoge");
    assert_eq!(k.signatures().returns("int").count(), 2);
    assert_eq!(k.signatures().name_matches("^fu").unwrap().count(), 1);
    assert!(k.signatures().name_matches("(").is_err());
    assert_eq!(k.signatures().fully_typed().count(), 0);
    assert_eq!(k.untyped().count(), 0);
}

#[test]
fn malformed_tree_is_rejected_or_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(
        &bad,
        r#"{"body": [{"kind": "FunctionDef", "name": "f",
            "args": {"args": [], "defaults": [{"kind": "Name", "id": "d"}]}}]}"#,
    )
    .unwrap();
    std::fs::copy(fixtures().join("hoge.json"), dir.path().join("good.json")).unwrap();

    let err = Sigshow::new("tmp").scan_in_folder(dir.path()).parse().unwrap_err();
    match err {
        SigshowError::Parse { path, source } => {
            assert_eq!(path, bad);
            assert!(source.to_string().contains("malformed `arguments` node"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let k = Sigshow::new("tmp").scan_in_folder(dir.path()).ignore_parse_errors(true).parse().unwrap();
    assert_eq!(k.files.len(), 1);
    assert_eq!(k.signatures.len(), 2);
}

#[test]
fn oversized_files_are_skipped() {
    let k = Sigshow::new("fixtures").scan_in_folder(fixtures()).max_file_size(16).parse().unwrap();
    assert!(k.files.is_empty());
    assert!(k.signatures.is_empty());
}

#[test]
fn same_tree_extracts_identically() {
    let src = std::fs::read_to_string(fixtures().join("hoge.json")).unwrap();
    let tree: Module = serde_json::from_str(&src).unwrap();
    let shared = std::sync::Arc::new(tree);

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let t = shared.clone();
            std::thread::spawn(move || extract(&t).unwrap())
        })
        .collect();
    let regs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(regs[0], regs[1]);
    assert_eq!(regs[0], extract(&shared).unwrap());
}
