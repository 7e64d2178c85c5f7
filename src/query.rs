use crate::model::*;
use crate::sigshow::Sigshow;
use regex::Regex;
use std::path::PathBuf;

pub struct SigQuery<'k> {
    k: &'k Sigshow,

    scope_prefix: Option<String>,
    file: Option<PathBuf>,

    name_contains: Option<String>,
    name_regex: Option<Regex>,

    returns: Option<String>,
    takes_type: Option<String>,

    untyped_only: bool,
    fully_typed: bool,
}

impl<'k> SigQuery<'k> {
    pub(crate) fn new(k: &'k Sigshow) -> Self {
        Self {
            k,
            scope_prefix: None,
            file: None,
            name_contains: None,
            name_regex: None,
            returns: None,
            takes_type: None,
            untyped_only: false,
            fully_typed: false,
        }
    }

    // structure filters
    pub fn in_scope(mut self, prefix: impl Into<String>) -> Self { self.scope_prefix = Some(prefix.into()); self }
    pub fn in_file(mut self, path: impl Into<PathBuf>) -> Self { self.file = Some(path.into()); self }

    // name filters
    pub fn named(mut self, s: impl Into<String>) -> Self { self.name_contains = Some(s.into()); self }
    pub fn name_matches(mut self, re: &str) -> Result<Self, regex::Error> {
        self.name_regex = Some(Regex::new(re)?);
        Ok(self)
    }

    // annotation filters (exact resolved type)
    pub fn returns(mut self, ty: impl Into<String>) -> Self { self.returns = Some(ty.into()); self }
    pub fn takes_type(mut self, ty: impl Into<String>) -> Self { self.takes_type = Some(ty.into()); self }

    pub fn untyped_only(mut self) -> Self { self.untyped_only = true; self }
    pub fn fully_typed(mut self) -> Self { self.fully_typed = true; self }

    pub fn filter<F>(self, f: F) -> Vec<CapturedSig>
    where F: Fn(&CapturedSig) -> bool
    {
        self.collect().into_iter().filter(|x| f(x)).collect()
    }

    pub fn collect(self) -> Vec<CapturedSig> {
        let mut v = self.k.signatures.clone();

        // whole segments only: `Module.Hoge` must not match `Module.Hogehoge.f`
        if let Some(p) = &self.scope_prefix {
            v.retain(|s| s.scope_path == *p || s.scope_path.starts_with(&format!("{p}.")));
        }
        if let Some(f) = &self.file { v.retain(|s| &s.file == f); }

        if let Some(n) = &self.name_contains { v.retain(|s| s.name.contains(n.as_str())); }
        if let Some(re) = &self.name_regex { v.retain(|s| re.is_match(&s.name)); }

        if let Some(r) = &self.returns { v.retain(|s| &s.signature.ret == r); }
        if let Some(t) = &self.takes_type {
            v.retain(|s| s.signature.args.iter().any(|a| &a.ty == t));
        }

        if self.untyped_only { v.retain(|s| s.signature.is_untyped()); }
        if self.fully_typed { v.retain(|s| s.signature.is_fully_typed()); }

        v
    }

    pub fn count(self) -> usize { self.collect().len() }
}
