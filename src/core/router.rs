//! # Update routing: result label → registry index.
//!
//! Results come back tagged with whatever label the engine used for the
//! acquisition. Resolution is two-step:
//!
//! 1. **Exact**: the label equals a canonical id → its index.
//! 2. **No-args fallback**: strip the trailing call-argument suffix
//!    (everything from the first `'('`) from both the label and each
//!    canonical id; the first match by ascending index wins. A source
//!    invoked with parameters is the same logical source as its bare form.
//!
//! No match under either rule → `None`; the caller forwards the update
//! anyway and reports a diagnostic.

use super::registry::SourceRegistry;

/// Strips a trailing call-argument suffix: everything from the first `'('`.
pub(crate) fn strip_args(label: &str) -> &str {
    match label.find('(') {
        Some(i) => &label[..i],
        None => label,
    }
}

/// Resolves a result label to a registry index.
pub(crate) fn resolve(registry: &SourceRegistry, raw: &str) -> Option<i32> {
    if let Some(index) = registry.index_of(raw) {
        return Some(index);
    }
    let bare = strip_args(raw);
    registry
        .iter()
        .find(|(_, id)| strip_args(id) == bare)
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn registry(entries: &[(i32, &str)]) -> SourceRegistry {
        let mut reg = SourceRegistry::new();
        for (i, id) in entries {
            reg.insert(*i, Arc::from(*id));
        }
        reg
    }

    #[test]
    fn test_strip_args() {
        assert_eq!(strip_args("cmd(1,2)"), "cmd");
        assert_eq!(strip_args("cmd"), "cmd");
        assert_eq!(strip_args("(weird"), "");
        assert_eq!(strip_args(""), "");
    }

    #[test]
    fn test_exact_match_wins() {
        let reg = registry(&[(0, "a/b/c"), (1, "a/b/c(2)")]);
        assert_eq!(resolve(&reg, "a/b/c(2)"), Some(1));
    }

    #[test]
    fn test_no_args_fallback() {
        let reg = registry(&[(0, "x"), (1, "cmd"), (2, "y")]);
        assert_eq!(resolve(&reg, "cmd(1,2)"), Some(1));
    }

    #[test]
    fn test_no_args_strips_both_sides() {
        let reg = registry(&[(3, "cmd(7)")]);
        assert_eq!(resolve(&reg, "cmd(1,2)"), Some(3));
        assert_eq!(resolve(&reg, "cmd"), Some(3));
    }

    #[test]
    fn test_first_match_by_ascending_index() {
        let reg = registry(&[(5, "cmd(b)"), (2, "cmd(a)")]);
        assert_eq!(resolve(&reg, "cmd(zzz)"), Some(2));
    }

    #[test]
    fn test_unresolvable() {
        let reg = registry(&[(0, "a")]);
        assert_eq!(resolve(&reg, "b"), None);
        assert_eq!(resolve(&SourceRegistry::new(), "a"), None);
    }
}
