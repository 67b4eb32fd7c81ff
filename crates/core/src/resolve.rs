//! Dotted module names
//!
//! A scanned file is identified by its path relative to the scanned root,
//! extension dropped and separators replaced by dots: `pkg/sub/mod.py`
//! becomes `pkg.sub.mod`.

use std::path::{Component, Path};

/// Dotted module name of `file` relative to `root`
///
/// Returns `None` when `file` is not under `root` or a path component is not
/// valid UTF-8.
pub fn module_name(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let without_ext = relative.with_extension("");

    let mut parts = Vec::new();
    for component in without_ext.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some(parts.join("."))
}

/// Resolve a relative import against the importing module
///
/// `level` is the number of leading dots. The first dot drops the importer's
/// own name, each further dot climbs one package. `module` is whatever
/// follows the dots, if anything.
///
/// ```
/// use import_graph_core::resolve::resolve_relative;
///
/// assert_eq!(resolve_relative("pkg.sub.mod", 1, Some("util")), "pkg.sub.util");
/// assert_eq!(resolve_relative("pkg.sub.mod", 2, None), "pkg");
/// ```
pub fn resolve_relative(importer: &str, level: usize, module: Option<&str>) -> String {
    let parts: Vec<&str> = importer.split('.').collect();
    let keep = parts.len().saturating_sub(level);

    let mut resolved: Vec<&str> = parts.into_iter().take(keep).collect();
    if let Some(module) = module.filter(|m| !m.is_empty()) {
        resolved.push(module);
    }
    resolved.join(".")
}

/// Join a base path and a name with a dot, tolerating an empty base
pub(crate) fn join(base: &str, name: &str) -> String {
    match (base.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (_, true) => base.to_string(),
        _ => format!("{base}.{name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_module_name_top_level() {
        let root = PathBuf::from("/project");
        assert_eq!(
            module_name(&root, &root.join("main.py")),
            Some("main".to_string())
        );
    }

    #[test]
    fn test_module_name_nested() {
        let root = PathBuf::from("/project");
        assert_eq!(
            module_name(&root, &root.join("pkg/sub/mod.py")),
            Some("pkg.sub.mod".to_string())
        );
        assert_eq!(
            module_name(&root, &root.join("pkg/__init__.py")),
            Some("pkg.__init__".to_string())
        );
    }

    #[test]
    fn test_module_name_only_strips_extension() {
        let root = PathBuf::from("/project");
        assert_eq!(
            module_name(&root, &root.join("copy.py.bak/mod.py")),
            Some("copy.py.bak.mod".to_string())
        );
    }

    #[test]
    fn test_module_name_outside_root() {
        let root = PathBuf::from("/project");
        assert_eq!(module_name(&root, Path::new("/elsewhere/a.py")), None);
        assert_eq!(module_name(&root, &root), None);
    }

    #[test]
    fn test_resolve_single_dot() {
        assert_eq!(resolve_relative("pkg.mod", 1, None), "pkg");
        assert_eq!(resolve_relative("pkg.mod", 1, Some("helpers")), "pkg.helpers");
    }

    #[test]
    fn test_resolve_parent_package() {
        assert_eq!(resolve_relative("pkg.sub.mod", 2, Some("util")), "pkg.util");
    }

    #[test]
    fn test_resolve_top_level_module() {
        assert_eq!(resolve_relative("main", 1, Some("helpers")), "helpers");
        assert_eq!(resolve_relative("main", 1, None), "");
    }

    #[test]
    fn test_resolve_beyond_root() {
        assert_eq!(resolve_relative("pkg.mod", 5, Some("x")), "x");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("pkg", "x"), "pkg.x");
        assert_eq!(join("", "x"), "x");
        assert_eq!(join("pkg", ""), "pkg");
    }
}
