//! Name validation, auto-naming and version successors.

use super::NodeKind;
use crate::error::ValidationError;
use std::collections::HashSet;

/// Check a proposed name against the names of its siblings.
///
/// `siblings` must already exclude the node being renamed.
pub(crate) fn check_name<'a>(
    kind: NodeKind,
    name: &str,
    mut siblings: impl Iterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName { kind });
    }
    if siblings.any(|sibling| sibling == name) {
        return Err(ValidationError::DuplicateName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// First free name among `base`, `base1`, `base2`, ...
pub(crate) fn unique_name<'a>(base: &str, siblings: impl Iterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = siblings.collect();
    let mut name = base.to_string();
    let mut count = 0u64;
    while taken.contains(name.as_str()) {
        count += 1;
        name = format!("{base}{count}");
    }
    name
}

/// Version that follows `current`.
///
/// The last `.`-separated component is incremented when numeric; otherwise
/// `.1` is appended. An empty version yields `initial`.
pub fn next_version(current: &str, initial: &str) -> String {
    if current.is_empty() {
        return initial.to_string();
    }
    let (prefix, last) = match current.rsplit_once('.') {
        Some((prefix, last)) => (Some(prefix), last),
        None => (None, current),
    };
    match last.parse::<u64>() {
        Ok(n) => match prefix {
            Some(prefix) => format!("{prefix}.{}", n.saturating_add(1)),
            None => n.saturating_add(1).to_string(),
        },
        Err(_) => format!("{current}.1"),
    }
}
