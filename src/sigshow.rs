use crate::extract::Extractor;
use crate::model::*;
use crate::node::{Module, NodeError};
use crate::query::*;
use crate::rules::*;
use crate::snapshot::*;

use globset::{Glob, GlobSet};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum SigshowError {
    #[error("io error reading {path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("tree parse error in {path}: {source}")]
    Parse { path: PathBuf, #[source] source: serde_json::Error },

    #[error("glob error: {0}")]
    Glob(#[from] globset::Error),

    #[error("extraction failed in {path}: {source}")]
    Node { path: PathBuf, #[source] source: NodeError },
}

#[derive(Debug, Clone)]
pub struct ParsedTree {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub tree: Module,
}

#[derive(Debug, Clone)]
pub struct Sigshow {
    pub name: String,
    pub files: Vec<ParsedTree>,

    // extracted caches
    pub signatures: Vec<CapturedSig>,
    pub shadowed: Vec<ShadowedDef>,
}

impl Sigshow {
    pub fn new(name: impl Into<String>) -> SigshowBuilder {
        SigshowBuilder::new(name)
    }

    /// Build from trees already in memory (e.g. straight from a parser).
    pub fn from_trees(
        name: impl Into<String>,
        trees: Vec<(PathBuf, Module)>,
    ) -> Result<Sigshow, SigshowError> {
        let files = trees
            .into_iter()
            .map(|(path, tree)| ParsedTree { path, modified: SystemTime::UNIX_EPOCH, tree })
            .collect();
        assemble(name.into(), files)
    }

    // Queries
    pub fn signatures(&self) -> SigQuery<'_> { SigQuery::new(self) }
    pub fn untyped(&self) -> SigQuery<'_> { self.signatures().untyped_only() }

    pub fn lookup(&self, scope_path: &str) -> Vec<&CapturedSig> {
        self.signatures.iter().filter(|s| s.scope_path == scope_path).collect()
    }

    /// Registry of one file, as a single extraction run would produce it.
    pub fn registry_for(&self, file: &Path) -> Registry {
        self.signatures
            .iter()
            .filter(|s| s.file == file)
            .map(|s| (s.scope_path.clone(), s.signature.clone()))
            .collect()
    }

    // Snapshot / diff
    pub fn snapshot(&self) -> Snapshot { Snapshot::from_sigshow(self) }
    pub fn diff_snapshot(&self, old: &Snapshot) -> SnapshotDiff { self.snapshot().diff(old) }

    // Rules
    pub fn rules(&self) -> RuleRunner<'_> { RuleRunner::new(self) }
}

#[derive(Default)]
pub struct SigshowBuilder {
    name: String,
    roots: Vec<PathBuf>,
    include: SigshowGlobSetBuilder,
    exclude: SigshowGlobSetBuilder,
    follow_links: bool,
    max_file_size: Option<u64>,
    ignore_parse_errors: bool,
    only_newest: Option<usize>,
}

impl SigshowBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let mut b = Self { name: name.into(), ..Default::default() };
        // literal pattern, always valid
        if let Ok(g) = Glob::new("**/*.json") {
            b.include.add(g);
        }
        b
    }

    pub fn scan_in_folder(mut self, path: impl Into<PathBuf>) -> Self {
        self.roots.push(path.into());
        self
    }

    pub fn scan_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.roots.push(path.into());
        self
    }

    pub fn include_glob(mut self, pat: &str) -> Result<Self, SigshowError> {
        self.include.add(Glob::new(pat)?);
        Ok(self)
    }

    pub fn exclude_glob(mut self, pat: &str) -> Result<Self, SigshowError> {
        self.exclude.add(Glob::new(pat)?);
        Ok(self)
    }

    pub fn exclude_generated(mut self) -> Result<Self, SigshowError> {
        self = self.exclude_glob("**/target/**")?;
        self = self.exclude_glob("**/node_modules/**")?;
        self = self.exclude_glob("**/.git/**")?;
        self = self.exclude_glob("**/__pycache__/**")?;
        Ok(self)
    }

    pub fn follow_links(mut self, yes: bool) -> Self { self.follow_links = yes; self }
    pub fn max_file_size(mut self, bytes: u64) -> Self { self.max_file_size = Some(bytes); self }
    pub fn ignore_parse_errors(mut self, yes: bool) -> Self { self.ignore_parse_errors = yes; self }
    pub fn only_newest(mut self, n: usize) -> Self { self.only_newest = Some(n); self }

    pub fn parse(self) -> Result<Sigshow, SigshowError> {
        let include: GlobSet = self.include.build()?;
        let exclude: GlobSet = self.exclude.build()?;

        let mut candidates: Vec<(PathBuf, SystemTime)> = Vec::new();

        for root in &self.roots {
            if root.is_file() {
                // explicitly named files skip the include globs
                if !exclude.is_match(root) {
                    candidates.push((root.clone(), modified_time(root)));
                }
                continue;
            }
            for entry in WalkDir::new(root)
                .follow_links(self.follow_links)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if !p.is_file() { continue; }
                push_if_match(p, &include, &exclude, &mut candidates);
            }
        }

        candidates.sort_by_key(|(_, m)| *m);
        candidates.reverse();
        if let Some(n) = self.only_newest { candidates.truncate(n); }

        #[cfg(feature = "parallel")]
        let loaded: Vec<Result<Option<ParsedTree>, SigshowError>> = {
            use rayon::prelude::*;
            candidates
                .par_iter()
                .map(|(path, modified)| load_one(path, *modified, self.max_file_size))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let loaded: Vec<Result<Option<ParsedTree>, SigshowError>> = candidates
            .iter()
            .map(|(path, modified)| load_one(path, *modified, self.max_file_size))
            .collect();

        let mut files = Vec::new();
        for r in loaded {
            match r {
                Ok(Some(pt)) => files.push(pt),
                Ok(None) => {}
                Err(e) if self.ignore_parse_errors => warn!(error = %e, "skipping unreadable tree"),
                Err(e) => return Err(e),
            }
        }

        info!(files = files.len(), roots = self.roots.len(), "loaded syntax trees");
        assemble(self.name, files)
    }
}

fn assemble(name: String, files: Vec<ParsedTree>) -> Result<Sigshow, SigshowError> {
    #[cfg(feature = "parallel")]
    let per_file: Vec<Result<FileSigs, SigshowError>> = {
        use rayon::prelude::*;
        files.par_iter().map(extract_file).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let per_file: Vec<Result<FileSigs, SigshowError>> = files.iter().map(extract_file).collect();

    let mut signatures = Vec::new();
    let mut shadowed = Vec::new();
    for r in per_file {
        let (sigs, shadows) = r?;
        signatures.extend(sigs);
        shadowed.extend(shadows);
    }

    info!(signatures = signatures.len(), shadowed = shadowed.len(), "extracted signatures");
    Ok(Sigshow { name, files, signatures, shadowed })
}

type FileSigs = (Vec<CapturedSig>, Vec<ShadowedDef>);

// one extractor per file: each run owns its own stack and registry
fn extract_file(pt: &ParsedTree) -> Result<FileSigs, SigshowError> {
    let mut ex = Extractor::new();
    ex.run(&pt.tree).map_err(|e| SigshowError::Node { path: pt.path.clone(), source: e })?;

    let sigs = ex
        .registry()
        .iter()
        .map(|(path, sig)| CapturedSig {
            scope_path: path.clone(),
            name: path.rsplit('.').next().unwrap_or_default().to_string(),
            file: pt.path.clone(),
            signature: sig.clone(),
            text: ex.texts().get(path).cloned().unwrap_or_default(),
        })
        .collect();

    let shadows = ex
        .shadowed()
        .iter()
        .map(|p| ShadowedDef { scope_path: p.clone(), file: pt.path.clone() })
        .collect();

    Ok((sigs, shadows))
}

fn modified_time(p: &Path) -> SystemTime {
    std::fs::metadata(p).and_then(|m| m.modified()).unwrap_or(SystemTime::UNIX_EPOCH)
}

fn push_if_match(p: &Path, include: &GlobSet, exclude: &GlobSet, out: &mut Vec<(PathBuf, SystemTime)>) {
    if !include.is_match(p) { return; }
    if exclude.is_match(p) { return; }
    out.push((p.to_path_buf(), modified_time(p)));
}

fn load_one(path: &Path, modified: SystemTime, max_size: Option<u64>) -> Result<Option<ParsedTree>, SigshowError> {
    let meta = std::fs::metadata(path).map_err(|e| SigshowError::Io { path: path.to_path_buf(), source: e })?;
    if let Some(max) = max_size {
        if meta.len() > max {
            debug!(path = %path.display(), size = meta.len(), "skipping oversized tree");
            return Ok(None);
        }
    }
    let source = std::fs::read_to_string(path).map_err(|e| SigshowError::Io { path: path.to_path_buf(), source: e })?;
    let tree: Module = serde_json::from_str(&source).map_err(|e| SigshowError::Parse { path: path.to_path_buf(), source: e })?;
    debug!(path = %path.display(), statements = tree.body.len(), "parsed tree");
    Ok(Some(ParsedTree { path: path.to_path_buf(), modified, tree }))
}
