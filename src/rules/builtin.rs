use crate::model::*;
use crate::resolve::UNDEFINED;
use crate::rules::Rule;
use crate::sigshow::Sigshow;
use serde_json::json;

pub struct UnannotatedArgument;
impl Rule for UnannotatedArgument {
    fn code(&self) -> &'static str { "SIG001" }
    fn name(&self) -> &'static str { "Unannotated argument" }

    fn run(&self, k: &Sigshow) -> Vec<Finding> {
        let mut out = Vec::new();
        for s in &k.signatures {
            for (i, a) in s.signature.args.iter().enumerate() {
                // receiver is conventionally left bare
                if i == 0 && matches!(a.symbol.as_str(), "self" | "cls") { continue; }
                if a.ty != UNDEFINED { continue; }
                out.push(Finding {
                    severity: Severity::Warn,
                    code: self.code().into(),
                    message: format!("argument `{}` of {} has no annotation", a.symbol, s.scope_path),
                    file: s.file.clone(),
                    scope_path: s.scope_path.clone(),
                    extra: json!({ "argument": a.symbol, "position": i, "signature": s.text }),
                });
            }
        }
        out
    }
}

pub struct MissingReturnAnnotation;
impl Rule for MissingReturnAnnotation {
    fn code(&self) -> &'static str { "SIG002" }
    fn name(&self) -> &'static str { "Missing return annotation" }

    fn run(&self, k: &Sigshow) -> Vec<Finding> {
        k.signatures.iter()
            .filter(|s| s.signature.ret == UNDEFINED)
            .map(|s| Finding {
                severity: Severity::Info,
                code: self.code().into(),
                message: format!("{} has no return annotation", s.scope_path),
                file: s.file.clone(),
                scope_path: s.scope_path.clone(),
                extra: json!({ "signature": s.text }),
            })
            .collect()
    }
}

pub struct ShadowedDefinition;
impl Rule for ShadowedDefinition {
    fn code(&self) -> &'static str { "SIG003" }
    fn name(&self) -> &'static str { "Shadowed definition" }

    fn run(&self, k: &Sigshow) -> Vec<Finding> {
        k.shadowed.iter()
            .map(|d| Finding {
                severity: Severity::Warn,
                code: self.code().into(),
                message: format!("{} is defined more than once; the last definition wins", d.scope_path),
                file: d.file.clone(),
                scope_path: d.scope_path.clone(),
                extra: json!({}),
            })
            .collect()
    }
}
