//! Merges freshly extracted variables with the user-maintained list.

use std::collections::HashSet;

use crate::state::layout::TemplateVariable;

/// Reconciles the variables `discovered` in the current content with the
/// records the user already `current`ly holds.
///
/// Records whose name still occurs in `discovered` survive untouched and
/// keep their relative order; names seen for the first time are appended
/// in first-occurrence order with the discovered defaults; records whose
/// name no longer occurs are dropped. The result never repeats a name.
/// When `current` itself carries duplicates, the earliest record wins.
///
/// Running the merge twice against the same `discovered` set returns the
/// first result unchanged.
pub fn reconcile(
    discovered: &[TemplateVariable],
    current: &[TemplateVariable],
) -> Vec<TemplateVariable> {
    let wanted: HashSet<&str> = discovered.iter().map(|v| v.name.as_str()).collect();

    let mut merged = Vec::with_capacity(discovered.len());
    let mut kept: HashSet<&str> = HashSet::new();
    for var in current {
        if wanted.contains(var.name.as_str()) && kept.insert(var.name.as_str()) {
            merged.push(var.clone());
        }
    }
    for var in discovered {
        if kept.insert(var.name.as_str()) {
            merged.push(var.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::layout::VariableType;

    fn var(name: &str) -> TemplateVariable {
        TemplateVariable::new(name, VariableType::String)
    }

    fn edited(name: &str, default: &str) -> TemplateVariable {
        TemplateVariable {
            default_value: Some(default.to_string()),
            required: true,
            ..var(name)
        }
    }

    fn names(vars: &[TemplateVariable]) -> Vec<&str> {
        vars.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn appends_new_names_in_discovery_order() {
        let discovered = [var("a"), var("b"), var("c")];
        let merged = reconcile(&discovered, &[]);
        assert_eq!(names(&merged), ["a", "b", "c"]);
    }

    #[test]
    fn keeps_edited_records_for_surviving_names() {
        // Adding one variable must not reset the metadata of the others.
        let current = [edited("user", "Jane"), edited("link", "https://x.io")];
        let discovered = [var("user"), var("link"), var("greeting")];
        let merged = reconcile(&discovered, &current);
        assert_eq!(merged[0], current[0]);
        assert_eq!(merged[1], current[1]);
        assert_eq!(merged[2], var("greeting"));
    }

    #[test]
    fn drops_names_no_longer_discovered() {
        let current = [edited("old", "x"), edited("kept", "y")];
        let discovered = [var("kept")];
        let merged = reconcile(&discovered, &current);
        assert_eq!(names(&merged), ["kept"]);
        assert_eq!(merged[0].default_value.as_deref(), Some("y"));
    }

    #[test]
    fn survivors_come_before_additions() {
        let current = [var("b")];
        let discovered = [var("a"), var("b"), var("c")];
        let merged = reconcile(&discovered, &current);
        assert_eq!(names(&merged), ["b", "a", "c"]);
    }

    #[test]
    fn duplicate_discoveries_collapse_to_one_record() {
        let discovered = [var("a"), var("b"), var("a")];
        let merged = reconcile(&discovered, &[]);
        assert_eq!(names(&merged), ["a", "b"]);
    }

    #[test]
    fn earliest_duplicate_in_current_wins() {
        let current = [edited("a", "first"), edited("a", "second")];
        let discovered = [var("a")];
        let merged = reconcile(&discovered, &current);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].default_value.as_deref(), Some("first"));
    }

    #[test]
    fn result_names_match_discovered_names_exactly() {
        let current = [var("stale"), edited("b", "kept")];
        let discovered = [var("c"), var("b"), var("c")];
        let merged = reconcile(&discovered, &current);

        let merged_names: HashSet<&str> = merged.iter().map(|v| v.name.as_str()).collect();
        let discovered_names: HashSet<&str> = discovered.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(merged_names, discovered_names);
    }

    #[test]
    fn merge_is_idempotent() {
        let current = [edited("a", "x"), var("dead")];
        let discovered = [var("b"), var("a"), var("b")];
        let once = reconcile(&discovered, &current);
        let twice = reconcile(&discovered, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_discovery_clears_everything() {
        let current = [edited("a", "x")];
        assert!(reconcile(&[], &current).is_empty());
    }
}
