use crate::model::*;

pub fn registry_to_json(registry: &Registry) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(registry)
}

pub fn signatures_to_json(sigs: &[CapturedSig]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(sigs)
}

pub fn signatures_to_markdown(sigs: &[CapturedSig]) -> String {
    let mut s = String::new();
    s.push_str("# Signatures\n\n");
    for sig in sigs {
        s.push_str(&format!(
            "- `{}` ({}): `{}`\n",
            sig.scope_path,
            sig.file.display(),
            sig.text,
        ));
    }
    s
}

// simple ASCII table (no deps)
pub fn signatures_to_table(sigs: &[CapturedSig]) -> String {
    let mut out = String::new();
    out.push_str("SCOPE PATH                       RETURN       SIGNATURE\n");
    out.push_str("-------------------------------  -----------  ------------------------------\n");
    for sig in sigs {
        out.push_str(&format!(
            "{:<31}  {:<11}  {}\n",
            truncate(&sig.scope_path, 31),
            truncate(&sig.signature.ret, 11),
            sig.text
        ));
    }
    out
}

pub fn findings_to_json(findings: &[Finding]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(findings)
}

pub fn findings_to_markdown(findings: &[Finding]) -> String {
    let mut s = String::new();
    s.push_str("# Sigshow Report\n\n");
    for f in findings {
        s.push_str(&format!(
            "- **{:?} {}**: {} (`{}` in `{}`)\n",
            f.severity,
            f.code,
            f.message,
            f.scope_path,
            f.file.display(),
        ));
    }
    s
}

pub fn findings_to_table(findings: &[Finding]) -> String {
    let mut out = String::new();
    out.push_str("SEV  CODE    SCOPE PATH                       MESSAGE\n");
    out.push_str("---- ------- -------------------------------  ------------------------------\n");
    for f in findings {
        out.push_str(&format!(
            "{:<4} {:<7} {:<31}  {}\n",
            format!("{:?}", f.severity),
            f.code,
            truncate(&f.scope_path, 31),
            f.message
        ));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { return s.to_string(); }
    let mut t: String = s.chars().take(max.saturating_sub(3)).collect();
    t.push_str("...");
    t
}
