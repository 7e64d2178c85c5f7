use globset::GlobSetBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgBinding {
    pub symbol: String,
    #[serde(rename = "type")]
    pub ty: String, // resolved annotation or "undefined"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub args: Vec<ArgBinding>,
    #[serde(rename = "return")]
    pub ret: String,
}

impl FunctionSignature {
    pub fn is_fully_typed(&self) -> bool {
        self.ret != crate::resolve::UNDEFINED
            && self.args.iter().all(|a| a.ty != crate::resolve::UNDEFINED)
    }

    pub fn is_untyped(&self) -> bool {
        self.ret == crate::resolve::UNDEFINED
            && self.args.iter().all(|a| a.ty == crate::resolve::UNDEFINED)
    }
}

/// Scope path (`Module.Hoge.fuga`) -> signature record, for one extraction run.
pub type Registry = BTreeMap<String, FunctionSignature>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedSig {
    pub scope_path: String,
    pub name: String, // last scope segment
    pub file: PathBuf,
    pub signature: FunctionSignature,
    pub text: String, // fuga(self, x: int, y) -> int
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowedDef {
    pub scope_path: String,
    pub file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warn,
    Deny,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub code: String, // stable rule code: SIG001
    pub message: String,
    pub file: PathBuf,
    pub scope_path: String,
    pub extra: serde_json::Value,
}

pub struct SigshowGlobSetBuilder(pub GlobSetBuilder);

impl Default for SigshowGlobSetBuilder {
    fn default() -> Self {
        Self(GlobSetBuilder::new())
    }
}

impl std::ops::Deref for SigshowGlobSetBuilder {
    type Target = GlobSetBuilder;
    fn deref(&self) -> &Self::Target { &self.0 }
}
impl std::ops::DerefMut for SigshowGlobSetBuilder {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.0 }
}
