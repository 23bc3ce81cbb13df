//! Dependency audit: declared imports against an allow-list.

use std::collections::BTreeSet;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::discovery::ProjectTree;
use crate::types::{Finding, FindingKind};

/// One entry of the dependency allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedDependency {
    /// Package name as it appears in import statements.
    pub name: String,
    /// Version constraint the project standard pins (informational here;
    /// the audit matches on names).
    pub version: String,
}

impl AllowedDependency {
    /// Creates an allow-list entry.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

const DISALLOWED_TEMPLATE: &str = "The project declares dependencies outside the approved set of \
tools and libraries. Please clear the following dependencies with the backend team lead:\n";

/// Project-level pass comparing top-level import identifiers against an
/// allow-list. A static enumeration pass, not model-driven.
pub struct DependencyAuditor {
    allowed: Vec<AllowedDependency>,
    import_re: Regex,
    from_re: Regex,
}

impl DependencyAuditor {
    /// Creates an auditor for the given allow-list.
    ///
    /// # Panics
    ///
    /// Panics if the built-in import patterns fail to compile, which they
    /// cannot for the literal patterns used here.
    #[must_use]
    pub fn new(allowed: Vec<AllowedDependency>) -> Self {
        Self {
            allowed,
            import_re: Regex::new(r"^\s*import\s+(.+)$").expect("import pattern is valid"),
            from_re: Regex::new(r"^\s*from\s+([A-Za-z_][A-Za-z0-9_]*)")
                .expect("from pattern is valid"),
        }
    }

    /// Scans every discovered file for top-level imports and returns one
    /// project-level finding listing disallowed names in lexicographic
    /// order, or `None` when everything found is allowed.
    ///
    /// Local top-level modules (file stems and first-level directory names
    /// under the root) are not counted as dependencies. Per the shared "no
    /// positive comments" policy, a clean audit emits nothing.
    #[must_use]
    pub fn audit(&self, root: &Path, tree: &ProjectTree) -> Option<Finding> {
        let found = self.collect_imports(root, tree);
        let locals = local_module_names(tree);
        let allowed: BTreeSet<&str> = self.allowed.iter().map(|d| d.name.as_str()).collect();

        let disallowed: Vec<&String> = found
            .iter()
            .filter(|name| !allowed.contains(name.as_str()) && !locals.contains(name.as_str()))
            .collect();
        if disallowed.is_empty() {
            return None;
        }

        let mut message = String::from(DISALLOWED_TEMPLATE);
        for name in disallowed {
            message.push_str(&format!("  - {name}\n"));
        }
        Some(Finding::project(FindingKind::DisallowedDeps, message))
    }

    /// Enumerates top-level import identifiers across the tree.
    fn collect_imports(&self, root: &Path, tree: &ProjectTree) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for (dir, files) in tree {
            for name in files {
                let path = if dir == Path::new(".") {
                    root.join(name)
                } else {
                    root.join(dir).join(name)
                };
                let content = match std::fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!("dependency audit skipping {}: {e}", path.display());
                        continue;
                    }
                };
                for line in content.lines() {
                    self.scan_line(line, &mut found);
                }
            }
        }
        found
    }

    /// Extracts top-level identifiers from one line.
    ///
    /// Handles `import a.b`, `import a, b`, `import a as x` and
    /// `from a.b import c`; relative imports (`from . import c`) carry no
    /// top-level name and are skipped.
    fn scan_line(&self, line: &str, found: &mut BTreeSet<String>) {
        if let Some(caps) = self.from_re.captures(line) {
            found.insert(caps[1].to_string());
            return;
        }
        let Some(caps) = self.import_re.captures(line) else {
            return;
        };
        for piece in caps[1].split(',') {
            let module = piece.split_whitespace().next().unwrap_or_default();
            let top = module.split('.').next().unwrap_or_default();
            if !top.is_empty() && is_identifier(top) {
                found.insert(top.to_string());
            }
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Names the project defines itself: file stems plus first-level directory
/// names. Importing your own modules is not a dependency.
fn local_module_names(tree: &ProjectTree) -> BTreeSet<String> {
    let mut locals = BTreeSet::new();
    for (dir, files) in tree {
        if let Some(std::path::Component::Normal(first)) = dir.components().next() {
            if let Some(s) = first.to_str() {
                if s != "." {
                    locals.insert(s.to_string());
                }
            }
        }
        for name in files {
            if let Some(stem) = Path::new(name).file_stem().and_then(|s| s.to_str()) {
                locals.insert(stem.to_string());
            }
        }
    }
    locals
}
