use crate::sigshow::Sigshow;
use blake3::Hasher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigFinger {
    pub scope_path: String,
    pub file: PathBuf,
    pub sig_hash: String,
    pub text: String,
}

impl SigFinger {
    fn key(&self) -> (PathBuf, String) {
        (self.file.clone(), self.scope_path.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub signatures: Vec<SigFinger>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDiff {
    pub added: Vec<SigFinger>,
    pub removed: Vec<SigFinger>,
    pub changed: Vec<(SigFinger, SigFinger)>, // (old,new)
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

fn hash_sig(s: &str) -> String {
    let mut h = Hasher::new();
    h.update(s.as_bytes());
    h.finalize().to_hex().to_string()
}

impl Snapshot {
    pub fn from_sigshow(k: &Sigshow) -> Self {
        let mut signatures: Vec<SigFinger> = k
            .signatures
            .iter()
            .map(|s| SigFinger {
                scope_path: s.scope_path.clone(),
                file: s.file.clone(),
                sig_hash: hash_sig(&s.text),
                text: s.text.clone(),
            })
            .collect();
        signatures.sort_by_key(|f| f.key());
        Snapshot { name: k.name.clone(), signatures }
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn diff(&self, old: &Snapshot) -> SnapshotDiff {
        let old_map: BTreeMap<(PathBuf, String), &SigFinger> = old.signatures.iter().map(|f| (f.key(), f)).collect();
        let new_map: BTreeMap<(PathBuf, String), &SigFinger> = self.signatures.iter().map(|f| (f.key(), f)).collect();

        let mut diff = SnapshotDiff::default();

        for (k, nf) in &new_map {
            match old_map.get(k) {
                None => diff.added.push((*nf).clone()),
                Some(of) if of.sig_hash != nf.sig_hash => diff.changed.push(((*of).clone(), (*nf).clone())),
                Some(_) => {}
            }
        }
        for (k, of) in &old_map {
            if !new_map.contains_key(k) {
                diff.removed.push((*of).clone());
            }
        }
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finger(path: &str, text: &str) -> SigFinger {
        SigFinger { scope_path: path.into(), file: "a.json".into(), sig_hash: hash_sig(text), text: text.into() }
    }

    #[test]
    fn diff_reports_added_removed_changed() {
        let old = Snapshot {
            name: "t".into(),
            signatures: vec![finger("Module.f", "f(x)"), finger("Module.g", "g()")],
        };
        let new = Snapshot {
            name: "t".into(),
            signatures: vec![finger("Module.f", "f(x: int)"), finger("Module.h", "h()")],
        };
        let d = new.diff(&old);
        assert_eq!(d.added, vec![finger("Module.h", "h()")]);
        assert_eq!(d.removed, vec![finger("Module.g", "g()")]);
        assert_eq!(d.changed.len(), 1);
        assert_eq!(d.changed[0].1.text, "f(x: int)");
        assert!(new.diff(&new).is_empty());
    }

    #[test]
    fn json_round_trip() {
        let s = Snapshot { name: "t".into(), signatures: vec![finger("Module.f", "f()")] };
        let back = Snapshot::from_json_str(&s.to_json_string().unwrap()).unwrap();
        assert_eq!(back.signatures, s.signatures);
    }
}
