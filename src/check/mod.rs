//! Constraint checker (C6): a registry of catalog consistency checks
//! producing structured [`Issue`] records. Grounded in
//! `original_source/src/ace/constraints/{core,basic}.py`.

use std::collections::{HashMap, HashSet};

use crate::adm::{AdmCatalog, AdmChildRef, AdmFile};
use crate::ari::StructType;
use crate::diag::normalize_ident;

/// One constraint violation (original: `constraints.core.Issue`).
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub check_name: String,
    pub adm_name: Option<String>,
    pub detail: String,
}

impl Issue {
    fn new(check_name: &str, adm_name: Option<String>, detail: String) -> Self {
        Self {
            check_name: check_name.to_string(),
            adm_name,
            detail,
        }
    }
}

/// One registered check. Global constraints run once against the whole
/// catalog; non-global constraints run once per [`AdmFile`] (original:
/// `register`'s `is_global` flag).
pub trait Constraint {
    fn name(&self) -> &'static str;

    fn is_global(&self) -> bool {
        false
    }

    fn check_global(&self, _catalog: &AdmCatalog) -> Vec<Issue> {
        Vec::new()
    }

    fn check_adm(&self, _adm: &AdmFile) -> Vec<Issue> {
        Vec::new()
    }
}

/// Runs every registered [`Constraint`] against a catalog (original:
/// `constraints.core.Checker`).
pub struct Checker {
    constraints: Vec<Box<dyn Constraint>>,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    pub fn new() -> Self {
        Self {
            constraints: vec![
                Box::new(MinimalMetadata),
                Box::new(UniqueAdmNames),
                Box::new(SameFileName),
                Box::new(UniqueObjectNames),
                Box::new(ValidTypeName),
                Box::new(ValidReferenceAri),
            ],
        }
    }

    /// Check the whole catalog, or a single ADM if `only` is given
    /// (original: `Checker.check(src=...)`).
    pub fn check(&self, catalog: &AdmCatalog, only: Option<&AdmFile>) -> Vec<Issue> {
        let mut issues = Vec::new();

        for constraint in &self.constraints {
            if !constraint.is_global() {
                continue;
            }
            log::debug!("running global constraint check: {}", constraint.name());
            for mut issue in constraint.check_global(catalog) {
                if issue.check_name.is_empty() {
                    issue.check_name = constraint.name().to_string();
                }
                issues.push(issue);
            }
        }

        let adm_list: Vec<&AdmFile> = match only {
            Some(adm) => vec![adm],
            None => catalog.iter().collect(),
        };

        for adm in adm_list {
            log::debug!("checking ADM: {}", adm.norm_name);
            for constraint in &self.constraints {
                if constraint.is_global() {
                    continue;
                }
                log::debug!("running constraint check: {}", constraint.name());
                for mut issue in constraint.check_adm(adm) {
                    if issue.adm_name.is_none() {
                        issue.adm_name = Some(adm.norm_name.clone());
                    }
                    if issue.check_name.is_empty() {
                        issue.check_name = constraint.name().to_string();
                    }
                    issues.push(issue);
                }
            }
        }

        log::info!(
            "checked {} rules and produced {} issues",
            self.constraints.len(),
            issues.len()
        );
        issues
    }
}

/// Ensures an ADM declares the minimum required metadata. Per-ADM, not
/// global: the original's `obj is None` guard means this check silently
/// never runs against any real ADM.
struct MinimalMetadata;

impl Constraint for MinimalMetadata {
    fn name(&self) -> &'static str {
        "minimal_metadata"
    }

    fn check_adm(&self, adm: &AdmFile) -> Vec<Issue> {
        let mut issues = Vec::new();
        for name in ["name", "namespace", "enum", "version"] {
            if !adm.mdat.iter().any(|m| m.name == name) {
                issues.push(Issue::new(
                    self.name(),
                    None,
                    format!("ADM is missing required metadata \"{name}\""),
                ));
            }
        }
        issues
    }
}

/// Ensures no two loaded ADMs share a name, namespace, or enumeration.
struct UniqueAdmNames;

impl Constraint for UniqueAdmNames {
    fn name(&self) -> &'static str {
        "unique_adm_names"
    }

    fn is_global(&self) -> bool {
        true
    }

    fn check_global(&self, catalog: &AdmCatalog) -> Vec<Issue> {
        let mut issues = Vec::new();
        let files: Vec<&AdmFile> = catalog.iter().collect();

        let mut by_norm_name: HashMap<&str, Vec<&AdmFile>> = HashMap::new();
        for adm in &files {
            by_norm_name.entry(adm.norm_name.as_str()).or_default().push(adm);
        }
        for (name, group) in &by_norm_name {
            if group.len() > 1 {
                for adm in group {
                    issues.push(Issue::new(
                        self.name(),
                        Some(adm.norm_name.clone()),
                        format!("Multiple ADMs with metadata \"norm_name\" of \"{name}\""),
                    ));
                }
            }
        }

        let mut by_namespace: HashMap<&str, Vec<&AdmFile>> = HashMap::new();
        for adm in &files {
            if let Some(ns) = adm.norm_namespace.as_deref() {
                by_namespace.entry(ns).or_default().push(adm);
            }
        }
        for (ns, group) in &by_namespace {
            if group.len() > 1 {
                for adm in group {
                    issues.push(Issue::new(
                        self.name(),
                        Some(adm.norm_name.clone()),
                        format!("Multiple ADMs with metadata \"norm_namespace\" of \"{ns}\""),
                    ));
                }
            }
        }

        let mut by_enum: HashMap<i64, Vec<&AdmFile>> = HashMap::new();
        for adm in &files {
            if let Some(e) = adm.enum_value {
                by_enum.entry(e).or_default().push(adm);
            }
        }
        for (e, group) in &by_enum {
            if group.len() > 1 {
                for adm in group {
                    issues.push(Issue::new(
                        self.name(),
                        Some(adm.norm_name.clone()),
                        format!("Multiple ADMs with metadata \"enum\" of \"{e}\""),
                    ));
                }
            }
        }

        issues
    }
}

/// Ensures an ADM's declared name matches the basename of its source file.
struct SameFileName;

impl Constraint for SameFileName {
    fn name(&self) -> &'static str {
        "same_file_name"
    }

    fn check_adm(&self, adm: &AdmFile) -> Vec<Issue> {
        let Some(path) = &adm.abs_file_path else {
            return Vec::new();
        };
        let ext_name = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        if adm.norm_name != ext_name {
            vec![Issue::new(
                self.name(),
                Some(adm.norm_name.clone()),
                format!(
                    "ADM name \"{}\" stored in differently named file {}",
                    adm.norm_name,
                    path.display()
                ),
            )]
        } else {
            Vec::new()
        }
    }
}

/// Ensures every object within one ADM section (Mdat, Const, ...) has a
/// unique name.
struct UniqueObjectNames;

impl Constraint for UniqueObjectNames {
    fn name(&self) -> &'static str {
        "unique_object_names"
    }

    fn check_adm(&self, adm: &AdmFile) -> Vec<Issue> {
        let mut issues = Vec::new();
        for (section, items) in adm.sections() {
            let mut seen: HashSet<&str> = HashSet::new();
            let mut duped: HashSet<&str> = HashSet::new();
            for item in &items {
                let name = item.name();
                if seen.contains(name) && !duped.contains(name) {
                    issues.push(Issue::new(
                        self.name(),
                        Some(adm.norm_name.clone()),
                        format!(
                            "Within the set of {section} objects the name \"{name}\" is duplicated"
                        ),
                    ));
                    duped.insert(name);
                }
                seen.insert(name);
            }
        }
        issues
    }
}

/// Ensures type names referenced by Const/Edd/Oper/Var are known
/// `StructType` names.
struct ValidTypeName;

impl ValidTypeName {
    fn check_type(&self, adm_name: &str, obj_name: &str, type_name: &str) -> Option<Issue> {
        if StructType::from_name(type_name).is_ok() {
            None
        } else {
            Some(Issue::new(
                self.name(),
                Some(adm_name.to_string()),
                format!(
                    "Within the object named \"{obj_name}\" the type name \"{type_name}\" is not known"
                ),
            ))
        }
    }
}

impl Constraint for ValidTypeName {
    fn name(&self) -> &'static str {
        "valid_type_name"
    }

    fn check_adm(&self, adm: &AdmFile) -> Vec<Issue> {
        let mut issues = Vec::new();

        for c in &adm.const_ {
            if let Some(t) = &c.type_name {
                issues.extend(self.check_type(&adm.norm_name, &c.name, t));
            }
        }
        for e in &adm.edd {
            issues.extend(self.check_type(&adm.norm_name, &e.name, &e.type_name));
        }
        for o in &adm.oper {
            issues.extend(self.check_type(&adm.norm_name, &o.name, &o.result_type));
            for parm in &o.in_type {
                issues.extend(self.check_type(&adm.norm_name, &o.name, parm));
            }
        }
        for v in &adm.var {
            issues.extend(self.check_type(&adm.norm_name, &v.name, &v.type_name));
            if let Some(init) = &v.initializer {
                issues.extend(self.check_type(&adm.norm_name, &v.name, &init.type_name));
            }
        }

        issues
    }
}

/// Ensures every embedded ARI reference inside `Mac.action`, `Rptt.definition`,
/// and `Var.initializer.postfix` resolves to a real ADM object.
struct ValidReferenceAri;

impl ValidReferenceAri {
    /// `ns` here is the adm's namespace directly, not `AUTHORITY:adm_name`
    /// form (spec.md §3 "ORM form" — distinct from a full ARI's nickname
    /// namespace convention).
    fn find_ident<'a>(
        &self,
        catalog: &'a AdmCatalog,
        ns: &str,
        kind: StructType,
        name: &str,
    ) -> Option<AdmChildRef<'a>> {
        let adm_ns = normalize_ident(ns);
        let obj_name = normalize_ident(name);
        let adm = catalog.iter().find(|a| a.norm_namespace.as_deref() == Some(adm_ns.as_str()))?;
        adm.get_child(kind, Some(obj_name.as_str()), None)
    }

    fn check_ac(
        &self,
        catalog: &AdmCatalog,
        adm_name: &str,
        obj_name: &str,
        items: &[crate::adm::EmbeddedAri],
    ) -> Vec<Issue> {
        let mut issues = Vec::new();
        for ari in items {
            let Some((type_name, ident_name)) = ari.nm.split_once('.') else {
                issues.push(Issue::new(
                    self.name(),
                    Some(adm_name.to_string()),
                    format!(
                        "Within the object named \"{obj_name}\" the reference \"{}\" is not in TYPE.name form",
                        ari.nm
                    ),
                ));
                continue;
            };
            let Ok(kind) = StructType::from_name(type_name) else {
                issues.push(Issue::new(
                    self.name(),
                    Some(adm_name.to_string()),
                    format!(
                        "Within the object named \"{obj_name}\" the reference type \"{type_name}\" is not known"
                    ),
                ));
                continue;
            };
            if self.find_ident(catalog, &ari.ns, kind, ident_name).is_none() {
                issues.push(Issue::new(
                    self.name(),
                    Some(adm_name.to_string()),
                    format!(
                        "Within the object named \"{obj_name}\" the reference ARI for {}/{} is not resolvable",
                        ari.ns, ari.nm
                    ),
                ));
            }
        }
        issues
    }
}

impl Constraint for ValidReferenceAri {
    fn name(&self) -> &'static str {
        "valid_reference_ari"
    }

    fn check_global(&self, catalog: &AdmCatalog) -> Vec<Issue> {
        let mut issues = Vec::new();
        for adm in catalog.iter() {
            for m in &adm.mac {
                issues.extend(self.check_ac(catalog, &adm.norm_name, &m.name, &m.action.items));
            }
            for r in &adm.rptt {
                issues.extend(self.check_ac(catalog, &adm.norm_name, &r.name, &r.definition.items));
            }
            for v in &adm.var {
                if let Some(init) = &v.initializer {
                    issues.extend(self.check_ac(catalog, &adm.norm_name, &v.name, &init.postfix.items));
                }
            }
        }
        issues
    }

    fn is_global(&self) -> bool {
        // Reference resolution may cross ADM boundaries (via `uses`), so
        // this runs once over the whole catalog rather than per-file.
        true
    }
}
