//! ADM catalog (C4): an in-memory index of ADM JSON documents, grounded in
//! `original_source/src/ace/models.py` and `adm_set.py`.
//!
//! The original backs the catalog with a SQLAlchemy ORM over SQLite; spec.md
//! §9 explicitly permits substituting an in-memory index, which is what
//! [`AdmCatalog`] does here — a `Vec<AdmFile>` plus lookup by normalized
//! name/namespace/enum.

mod error;
mod json;

pub use error::AdmError;
pub use json::{decode_adm, encode_adm};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::ari::StructType;
use crate::diag::normalize_ident;

/// Schema version stored alongside any persisted catalog (spec.md §6); this
/// crate keeps the catalog in memory only, but a caller that persists it
/// should store this value and discard-and-recreate on mismatch.
pub const CATALOG_SCHEMA_VERSION: u32 = 12;

/// One `{ type, name }` pair inside a [`TypeNameList`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeNameItem {
    pub type_name: String,
    pub name: String,
}

/// An ordered list of typed, named items — used for a Ctrl/Edd/Mac/Rptt's
/// `parmspec` and for a Tblt's `columns`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeNameList {
    pub items: Vec<TypeNameItem>,
}

/// One `{ type, value }` parameter of an [`EmbeddedAri`].
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedParam {
    pub type_name: String,
    pub value: String,
}

/// A reduced ARI representation used inside `Mac.action`, `Rptt.definition`,
/// and `Var.initializer.postfix` (original: `models.py: ARI`/`AriAP`). `nm`
/// carries `TYPE.name` (e.g. `"CTRL.control_a"`), distinct from the full ARI
/// tree's separately-typed [`crate::ari::Identity`] (spec.md §3 "ORM form").
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedAri {
    pub ns: String,
    pub nm: String,
    pub ap: Option<Vec<EmbeddedParam>>,
}

/// An ordered sequence of [`EmbeddedAri`] — the ORM-form AC used by
/// `Mac.action` and `Rptt.definition`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmbeddedAc {
    pub items: Vec<EmbeddedAri>,
}

/// The ORM-form EXPR used by `Var.initializer`.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedExpr {
    pub type_name: String,
    pub postfix: EmbeddedAc,
}

/// Metadata about the ADM itself (`name`, `namespace`, `enum`, `version`,
/// and any other declared Mdat entry).
#[derive(Debug, Clone, PartialEq)]
pub struct Mdat {
    pub name: String,
    pub norm_name: String,
    pub description: Option<String>,
    pub type_name: Option<String>,
    pub value: String,
    pub enum_value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Const {
    pub name: String,
    pub norm_name: String,
    pub description: Option<String>,
    pub type_name: Option<String>,
    pub value: Option<String>,
    pub enum_value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ctrl {
    pub name: String,
    pub norm_name: String,
    pub description: Option<String>,
    pub parmspec: Option<TypeNameList>,
    pub enum_value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edd {
    pub name: String,
    pub norm_name: String,
    pub description: Option<String>,
    pub parmspec: Option<TypeNameList>,
    pub type_name: String,
    pub enum_value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mac {
    pub name: String,
    pub norm_name: String,
    pub description: Option<String>,
    pub parmspec: Option<TypeNameList>,
    pub action: EmbeddedAc,
    pub enum_value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Oper {
    pub name: String,
    pub norm_name: String,
    pub description: Option<String>,
    pub result_type: String,
    pub in_type: Vec<String>,
    pub enum_value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rptt {
    pub name: String,
    pub norm_name: String,
    pub description: Option<String>,
    pub parmspec: Option<TypeNameList>,
    pub definition: EmbeddedAc,
    pub enum_value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tblt {
    pub name: String,
    pub norm_name: String,
    pub description: Option<String>,
    pub columns: TypeNameList,
    pub enum_value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    pub name: String,
    pub norm_name: String,
    pub description: Option<String>,
    pub type_name: String,
    pub initializer: Option<EmbeddedExpr>,
    pub enum_value: i64,
}

/// One `uses` entry: a positional reference to another ADM by namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct AdmUses {
    pub namespace: String,
    pub norm_namespace: String,
}

/// One ingested ADM JSON document plus its derived metadata and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdmFile {
    pub abs_file_path: Option<PathBuf>,
    pub last_modified: Option<DateTime<Local>>,
    pub norm_name: String,
    pub norm_namespace: Option<String>,
    pub adm_ns: Option<String>,
    pub enum_value: Option<i64>,
    pub uses: Vec<AdmUses>,
    pub mdat: Vec<Mdat>,
    pub const_: Vec<Const>,
    pub ctrl: Vec<Ctrl>,
    pub edd: Vec<Edd>,
    pub mac: Vec<Mac>,
    pub oper: Vec<Oper>,
    pub rptt: Vec<Rptt>,
    pub tblt: Vec<Tblt>,
    pub var: Vec<Var>,
}

/// A reference to one child object of an [`AdmFile`], typed uniformly so
/// the nickname resolver and constraint checker can work across sections
/// without nine parallel code paths.
#[derive(Debug, Clone, Copy)]
pub enum AdmChildRef<'a> {
    Mdat(&'a Mdat),
    Const(&'a Const),
    Ctrl(&'a Ctrl),
    Edd(&'a Edd),
    Mac(&'a Mac),
    Oper(&'a Oper),
    Rptt(&'a Rptt),
    Tblt(&'a Tblt),
    Var(&'a Var),
}

impl<'a> AdmChildRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            AdmChildRef::Mdat(o) => &o.name,
            AdmChildRef::Const(o) => &o.name,
            AdmChildRef::Ctrl(o) => &o.name,
            AdmChildRef::Edd(o) => &o.name,
            AdmChildRef::Mac(o) => &o.name,
            AdmChildRef::Oper(o) => &o.name,
            AdmChildRef::Rptt(o) => &o.name,
            AdmChildRef::Tblt(o) => &o.name,
            AdmChildRef::Var(o) => &o.name,
        }
    }

    pub fn norm_name(&self) -> &'a str {
        match self {
            AdmChildRef::Mdat(o) => &o.norm_name,
            AdmChildRef::Const(o) => &o.norm_name,
            AdmChildRef::Ctrl(o) => &o.norm_name,
            AdmChildRef::Edd(o) => &o.norm_name,
            AdmChildRef::Mac(o) => &o.norm_name,
            AdmChildRef::Oper(o) => &o.norm_name,
            AdmChildRef::Rptt(o) => &o.norm_name,
            AdmChildRef::Tblt(o) => &o.norm_name,
            AdmChildRef::Var(o) => &o.norm_name,
        }
    }

    pub fn enum_value(&self) -> i64 {
        match self {
            AdmChildRef::Mdat(o) => o.enum_value,
            AdmChildRef::Const(o) => o.enum_value,
            AdmChildRef::Ctrl(o) => o.enum_value,
            AdmChildRef::Edd(o) => o.enum_value,
            AdmChildRef::Mac(o) => o.enum_value,
            AdmChildRef::Oper(o) => o.enum_value,
            AdmChildRef::Rptt(o) => o.enum_value,
            AdmChildRef::Tblt(o) => o.enum_value,
            AdmChildRef::Var(o) => o.enum_value,
        }
    }

    /// The declared `parmspec` of this object, if its kind has one
    /// (Ctrl/Edd/Mac/Rptt) — used by the nickname resolver to detect
    /// `TNVC`-typed parameters.
    pub fn parmspec(&self) -> Option<&'a TypeNameList> {
        match self {
            AdmChildRef::Ctrl(o) => o.parmspec.as_ref(),
            AdmChildRef::Edd(o) => o.parmspec.as_ref(),
            AdmChildRef::Mac(o) => o.parmspec.as_ref(),
            AdmChildRef::Rptt(o) => o.parmspec.as_ref(),
            _ => None,
        }
    }
}

impl AdmFile {
    /// All nine sections paired with a human-readable label, in the JSON
    /// section-key order of spec.md §4.3 — used by constraints that need
    /// to walk every section uniformly.
    pub fn sections(&self) -> [(&'static str, Vec<AdmChildRef<'_>>); 9] {
        [
            ("Mdat", self.mdat.iter().map(AdmChildRef::Mdat).collect()),
            ("Const", self.const_.iter().map(AdmChildRef::Const).collect()),
            ("Ctrl", self.ctrl.iter().map(AdmChildRef::Ctrl).collect()),
            ("Edd", self.edd.iter().map(AdmChildRef::Edd).collect()),
            ("Mac", self.mac.iter().map(AdmChildRef::Mac).collect()),
            ("Oper", self.oper.iter().map(AdmChildRef::Oper).collect()),
            ("Rptt", self.rptt.iter().map(AdmChildRef::Rptt).collect()),
            ("Tblt", self.tblt.iter().map(AdmChildRef::Tblt).collect()),
            ("Var", self.var.iter().map(AdmChildRef::Var).collect()),
        ]
    }

    /// `get_child(adm, kind, *, norm_name?, enum?)` (spec.md §4.3 "Lookup
    /// contracts"): scoped to this AdmFile, filtered by any combination of
    /// the two keys. `kind` must be one of the nine object `StructType`
    /// categories (Mdat/Const/Ctrl/Edd/Mac/Oper/Rptt/Tblt/Var); any other
    /// kind matches nothing.
    pub fn get_child(
        &self,
        kind: StructType,
        norm_name: Option<&str>,
        enum_value: Option<i64>,
    ) -> Option<AdmChildRef<'_>> {
        let matches = |nn: &str, ev: i64| -> bool {
            norm_name.map_or(true, |n| n == nn) && enum_value.map_or(true, |e| e == ev)
        };
        match kind {
            StructType::Mdat => self
                .mdat
                .iter()
                .find(|o| matches(&o.norm_name, o.enum_value))
                .map(AdmChildRef::Mdat),
            StructType::Const => self
                .const_
                .iter()
                .find(|o| matches(&o.norm_name, o.enum_value))
                .map(AdmChildRef::Const),
            StructType::Ctrl => self
                .ctrl
                .iter()
                .find(|o| matches(&o.norm_name, o.enum_value))
                .map(AdmChildRef::Ctrl),
            StructType::Edd => self
                .edd
                .iter()
                .find(|o| matches(&o.norm_name, o.enum_value))
                .map(AdmChildRef::Edd),
            StructType::Mac => self
                .mac
                .iter()
                .find(|o| matches(&o.norm_name, o.enum_value))
                .map(AdmChildRef::Mac),
            StructType::Oper => self
                .oper
                .iter()
                .find(|o| matches(&o.norm_name, o.enum_value))
                .map(AdmChildRef::Oper),
            StructType::Rptt => self
                .rptt
                .iter()
                .find(|o| matches(&o.norm_name, o.enum_value))
                .map(AdmChildRef::Rptt),
            StructType::Tblt => self
                .tblt
                .iter()
                .find(|o| matches(&o.norm_name, o.enum_value))
                .map(AdmChildRef::Tblt),
            StructType::Var => self
                .var
                .iter()
                .find(|o| matches(&o.norm_name, o.enum_value))
                .map(AdmChildRef::Var),
            _ => None,
        }
    }

    fn mdat_value(&self, name: &str) -> Option<&str> {
        self.mdat
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.value.as_str())
    }

    /// Recompute `norm_name`/`norm_namespace`/`adm_ns`/`enum_value` from the
    /// `name`/`namespace`/`enum` Mdat entries (spec.md §4.3 "At the AdmFile
    /// level").
    fn derive_identity(&mut self) {
        if let Some(v) = self.mdat_value("name") {
            self.norm_name = normalize_ident(v);
        }
        if let Some(v) = self.mdat_value("namespace") {
            self.norm_namespace = Some(normalize_ident(v));
            self.adm_ns = Some(v.to_string());
        }
        if let Some(v) = self.mdat_value("enum") {
            self.enum_value = v.parse::<i64>().ok();
        }
    }
}

/// An in-memory catalog of ingested ADM files (spec.md §4.3).
#[derive(Debug, Default)]
pub struct AdmCatalog {
    files: Vec<AdmFile>,
    pending: Vec<(AdmFile, Vec<String>)>,
}

impl AdmCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdmFile> {
        self.files.iter()
    }

    /// All loaded ADM normalized names.
    pub fn names(&self) -> std::collections::HashSet<&str> {
        self.files.iter().map(|a| a.norm_name.as_str()).collect()
    }

    pub fn contains_namespace(&self, namespace: &str) -> bool {
        let norm = normalize_ident(namespace);
        self.files
            .iter()
            .any(|a| a.norm_namespace.as_deref() == Some(norm.as_str()))
    }

    /// `by_norm_name(name)`: exact case-folded match, error if not found.
    pub fn by_norm_name(&self, name: &str) -> Result<&AdmFile, AdmError> {
        let norm = normalize_ident(name);
        self.files
            .iter()
            .find(|a| a.norm_name == norm)
            .ok_or_else(|| AdmError::new(format!("no ADM found with name {norm}")))
    }

    /// `by_enum(e)`: exact ADM enumeration match.
    pub fn by_enum(&self, enum_value: i64) -> Result<&AdmFile, AdmError> {
        self.files
            .iter()
            .find(|a| a.enum_value == Some(enum_value))
            .ok_or_else(|| AdmError::new(format!("no ADM found with enum {enum_value}")))
    }

    /// Ingest one already-decoded [`AdmFile`], applying `uses` dependency
    /// ordering and `del_dupe` replacement semantics (spec.md §4.3).
    /// Mirrors `AdmSet._post_load`.
    pub fn insert(&mut self, adm_new: AdmFile, del_dupe: bool) -> Result<(), AdmError> {
        if adm_new.norm_name.is_empty() {
            return Err(AdmError::new("ADM has no \"name\" mdat object"));
        }

        let uses: Vec<String> = adm_new
            .uses
            .iter()
            .map(|u| u.norm_namespace.clone())
            .collect();
        let pending = uses.iter().any(|ns| !self.contains_namespace(ns));

        if pending {
            log::debug!(
                "ADM {} has unresolved uses, holding pending",
                adm_new.norm_name
            );
            self.pending.push((adm_new, uses));
            return Ok(());
        }

        self.add_resolved(adm_new, del_dupe);
        Ok(())
    }

    /// Add an ADM whose dependencies are already satisfied, then walk the
    /// pending set for anything that was waiting on it (spec.md §4.3
    /// "Dependency ordering" — "one-pass fixed-point"). Recurses over any
    /// cascade of ADMs this unblocks.
    fn add_resolved(&mut self, adm_new: AdmFile, del_dupe: bool) {
        if del_dupe {
            let before = self.files.len();
            self.files.retain(|a| a.norm_name != adm_new.norm_name);
            let removed = before - self.files.len();
            if removed > 0 {
                log::debug!(
                    "removed {removed} old AdmFile objects named {}",
                    adm_new.norm_name
                );
            }
        }

        let norm_namespace = adm_new.norm_namespace.clone();
        self.files.push(adm_new);

        let Some(norm_namespace) = norm_namespace else { return };
        for (_, remaining) in self.pending.iter_mut() {
            remaining.retain(|ns| ns != &norm_namespace);
        }
        while let Some(idx) = self.pending.iter().position(|(_, r)| r.is_empty()) {
            let (adm, _) = self.pending.remove(idx);
            self.add_resolved(adm, del_dupe);
        }
    }

    /// The ADMs still waiting on an unresolved `uses` dependency. Cycles
    /// remain pending indefinitely (spec.md §4.3); exposed so a caller can
    /// surface them as warnings.
    pub fn pending_names(&self) -> Vec<&str> {
        self.pending.iter().map(|(a, _)| a.norm_name.as_str()).collect()
    }

    /// Load ADM JSON from in-memory bytes (spec.md §6 `load_from_data`).
    pub fn load_from_data(&mut self, data: &[u8], del_dupe: bool) -> Result<(), AdmError> {
        let value: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| AdmError::new(format!("invalid ADM JSON: {e}")))?;
        let adm = decode_adm(value, None, None)?;
        self.insert(adm, del_dupe)
    }

    /// Load a single ADM JSON file (spec.md §6 `load_from_file`).
    pub fn load_from_file(&mut self, path: impl AsRef<Path>, del_dupe: bool) -> Result<(), AdmError> {
        let path = path.as_ref();
        let abs_path = std::fs::canonicalize(path)
            .map_err(|e| AdmError::new(format!("cannot resolve path {}: {e}", path.display())))?;
        let last_modified = file_mtime(&abs_path)?;

        if let Ok(existing) = self.by_norm_name_for_path(&abs_path) {
            if existing.last_modified.map_or(false, |lm| lm >= last_modified) {
                log::debug!(
                    "skipping file {} already loaded from time {:?}",
                    abs_path.display(),
                    existing.last_modified
                );
                return Ok(());
            }
        }

        log::debug!("loading ADM from {}", abs_path.display());
        let data = std::fs::read(&abs_path)
            .map_err(|e| AdmError::new(format!("failed to read {}: {e}", abs_path.display())))?;
        let value: serde_json::Value = serde_json::from_slice(&data)
            .map_err(|e| AdmError::new(format!("invalid ADM JSON in {}: {e}", abs_path.display())))?;
        let adm = decode_adm(value, Some(abs_path), Some(last_modified))?;
        self.insert(adm, del_dupe)
    }

    fn by_norm_name_for_path(&self, path: &Path) -> Result<&AdmFile, AdmError> {
        self.files
            .iter()
            .find(|a| a.abs_file_path.as_deref() == Some(path))
            .ok_or_else(|| AdmError::new("not previously loaded"))
    }

    /// Scan a directory (non-recursively, as the original's `os.scandir`
    /// does) for `*.json` files, skipping `index.json` (spec.md §4.3,
    /// original: `AdmSet._is_usable`). Returns the number of files read.
    pub fn load_from_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, AdmError> {
        let dir = dir.as_ref();
        log::debug!("scanning directory {}", dir.display());
        if !dir.is_dir() {
            return Ok(0);
        }

        let mut count = 0;
        let entries = std::fs::read_dir(dir)
            .map_err(|e| AdmError::new(format!("cannot read directory {}: {e}", dir.display())))?;
        for entry in entries {
            let entry = entry.map_err(|e| AdmError::new(e.to_string()))?;
            let path = entry.path();
            let is_usable = path.is_file()
                && path.file_name().and_then(|n| n.to_str()) != Some("index.json")
                && path.extension().and_then(|e| e.to_str()) == Some("json");
            if !is_usable {
                continue;
            }
            self.load_from_file(&path, true)?;
            count += 1;
        }
        Ok(count)
    }

    /// Load every ADM JSON file found under `dirs`, plus any directories
    /// listed in the `ADM_PATH` environment variable (spec.md §6
    /// "Environment"; SPEC_FULL.md C11). `ADM_PATH` is treated as a
    /// platform path list (`:`-separated on Unix) rather than a single
    /// directory, so more than one extra source can be supplied without
    /// repeating `--adm-dir`. XDG discovery of `dirs` itself is the
    /// caller's responsibility (spec.md §1 treats it as an external
    /// collaborator); this only walks the directories it is handed.
    /// Returns the total number of files read across all directories.
    pub fn load_default_dirs(&mut self, dirs: &[PathBuf]) -> Result<usize, AdmError> {
        let mut total = 0;
        for dir in dirs {
            total += self.load_from_dir(dir)?;
        }
        if let Ok(extra) = std::env::var("ADM_PATH") {
            for dir in std::env::split_paths(&extra) {
                total += self.load_from_dir(&dir)?;
            }
        }
        Ok(total)
    }
}

fn file_mtime(path: &Path) -> Result<DateTime<Local>, AdmError> {
    let meta = std::fs::metadata(path)
        .map_err(|e| AdmError::new(format!("cannot stat {}: {e}", path.display())))?;
    let modified = meta
        .modified()
        .map_err(|e| AdmError::new(format!("cannot read mtime of {}: {e}", path.display())))?;
    Ok(DateTime::<Local>::from(modified))
}

impl Default for Mdat {
    fn default() -> Self {
        Self {
            name: String::new(),
            norm_name: String::new(),
            description: None,
            type_name: None,
            value: String::new(),
            enum_value: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_adm(name: &str, namespace: &str, enum_value: i64) -> AdmFile {
        let mut adm = AdmFile {
            mdat: vec![
                Mdat {
                    name: "name".into(),
                    norm_name: "name".into(),
                    value: name.into(),
                    ..Default::default()
                },
                Mdat {
                    name: "namespace".into(),
                    norm_name: "namespace".into(),
                    value: namespace.into(),
                    ..Default::default()
                },
                Mdat {
                    name: "enum".into(),
                    norm_name: "enum".into(),
                    value: enum_value.to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        adm.derive_identity();
        adm
    }

    #[test]
    fn insert_and_lookup_by_name_and_enum() {
        let mut cat = AdmCatalog::new();
        cat.insert(sample_adm("amp_agent", "IANA:AMP.AGENT", 20), true)
            .unwrap();
        assert_eq!(cat.len(), 1);
        assert_eq!(cat.by_norm_name("amp_agent").unwrap().enum_value, Some(20));
        assert_eq!(cat.by_enum(20).unwrap().norm_name, "amp_agent");
    }

    #[test]
    fn del_dupe_replaces_existing_adm_with_same_name() {
        let mut cat = AdmCatalog::new();
        cat.insert(sample_adm("amp_agent", "IANA:AMP.AGENT", 20), true)
            .unwrap();
        cat.insert(sample_adm("amp_agent", "IANA:AMP.AGENT", 21), true)
            .unwrap();
        assert_eq!(cat.len(), 1);
        assert_eq!(cat.by_norm_name("amp_agent").unwrap().enum_value, Some(21));
    }

    #[test]
    fn without_del_dupe_both_copies_remain() {
        let mut cat = AdmCatalog::new();
        cat.insert(sample_adm("amp_agent", "IANA:AMP.AGENT", 20), false)
            .unwrap();
        cat.insert(sample_adm("amp_agent", "IANA:AMP.AGENT", 21), false)
            .unwrap();
        assert_eq!(cat.len(), 2);
    }

    #[test]
    fn adm_with_unresolved_uses_is_pending_until_dependency_arrives() {
        let mut cat = AdmCatalog::new();
        let mut dependent = sample_adm("amp_core", "IANA:AMP.CORE", 1);
        dependent.uses.push(AdmUses {
            namespace: "IANA:AMP.AGENT".into(),
            norm_namespace: normalize_ident("IANA:AMP.AGENT"),
        });

        cat.insert(dependent, true).unwrap();
        assert_eq!(cat.len(), 0);
        assert_eq!(cat.pending_names(), vec!["amp_core"]);

        cat.insert(sample_adm("amp_agent", "IANA:AMP.AGENT", 20), true)
            .unwrap();
        assert_eq!(cat.len(), 2);
        assert!(cat.pending_names().is_empty());
    }

    #[test]
    fn get_child_filters_by_norm_name_and_enum() {
        let mut adm = sample_adm("amp_agent", "IANA:AMP.AGENT", 20);
        adm.rptt.push(Rptt {
            name: "full_report".into(),
            norm_name: "full_report".into(),
            description: None,
            parmspec: None,
            definition: EmbeddedAc::default(),
            enum_value: 0,
        });

        assert!(adm
            .get_child(StructType::Rptt, Some("full_report"), None)
            .is_some());
        assert!(adm.get_child(StructType::Rptt, None, Some(0)).is_some());
        assert!(adm.get_child(StructType::Rptt, Some("nope"), None).is_none());
    }
}
