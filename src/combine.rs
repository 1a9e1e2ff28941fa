//! Merging of equation fragments and of their default parameter tables.
//!
//! Fragments are merged line by line. A later fragment can remove or replace
//! the explicit definition of a variable written by an earlier one by prefixing
//! the variable with [`OVERRIDE_MARKER`]:
//!
//! - `%x = gamma : 1` removes every line defining `x` (or `dx/dt`) and appends `x = gamma : 1`;
//! - `%x` alone removes those lines and nothing is appended.
//!
//! Every overridden or deleted name is collected in a deletion set, which is later used to
//! prune the merged parameter table.
use log::debug;
use std::collections::BTreeSet;

use super::error::ModelError;
use super::quantity::ParameterMap;
use super::templates::Fragment;

/// The character marking an override or a deletion of a variable.
pub const OVERRIDE_MARKER: char = '%';

/// The result of merging a sequence of fragments.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct CombinedEquations {
    /// The merged model equations.
    pub model: String,
    /// The merged statements executed on a pre-synaptic (or threshold) event.
    pub pre: String,
    /// The merged statements executed on a post-synaptic (or reset) event.
    pub post: String,
    /// The names of all overridden or deleted variables.
    pub deleted: BTreeSet<String>,
}

/// Returns the variable targeted by an override line, i.e., the token following the marker.
/// A differential target `dx/dt` is reduced to its base name `x`.
fn override_target(line: &str) -> Result<String, ModelError> {
    let target = line
        .split_once(OVERRIDE_MARKER)
        .and_then(|(_, rest)| rest.split_whitespace().next())
        .ok_or_else(|| ModelError::MalformedOverride(line.trim().to_string()))?;

    let name = match target.split_once('/') {
        // drop the leading `d` of `dx/dt`
        Some((head, _)) => head.chars().skip(1).collect::<String>(),
        None => target.to_string(),
    };

    if name.is_empty() {
        return Err(ModelError::MalformedOverride(line.trim().to_string()));
    }
    Ok(name)
}

/// Returns the left-hand side token of an equation line, i.e., the first word before any `=` or `:`.
fn defined_name(line: &str) -> Option<&str> {
    line.split(['=', ':'])
        .next()
        .and_then(|lhs| lhs.split_whitespace().next())
}

/// Returns true if the line is an explicit definition of `name`, either algebraic or differential.
fn defines(line: &str, name: &str) -> bool {
    if !line.contains(name) {
        return false;
    }
    match defined_name(line) {
        Some(lhs) => lhs == name || lhs.contains(&format!("d{}/dt", name)),
        None => false,
    }
}

/// Merge `overrides` into `accumulator`, resolving every override-marked line.
///
/// Each marked line removes the definitions of its target from the accumulator *as rebuilt so far*,
/// so later marked lines never see replacements appended by earlier ones.
/// Replacement lines and unmarked lines are appended after the rebuilt accumulator, in their original order.
/// The name of every target is recorded, even if nothing was removed.
pub fn resolve_overrides(
    accumulator: &str,
    overrides: &str,
) -> Result<(String, BTreeSet<String>), ModelError> {
    let mut deleted = BTreeSet::new();
    let mut accumulator = accumulator.to_string();
    let mut appended = String::new();

    for line in overrides.lines() {
        if !line.contains(OVERRIDE_MARKER) {
            appended.push_str(line);
            appended.push('\n');
            continue;
        }

        let name = override_target(line)?;
        // later markers on the line are modulo operators
        let clean_line = line.replacen(OVERRIDE_MARKER, "", 1);

        let mut rebuilt = String::new();
        for previous in accumulator.lines() {
            if defines(previous, &name) {
                debug!("Override of '{}' removes '{}'", name, previous.trim());
            } else {
                rebuilt.push_str(previous);
                rebuilt.push('\n');
            }
        }
        accumulator = rebuilt;

        if clean_line.split_whitespace().count() > 1 {
            appended.push_str(&clean_line);
            appended.push('\n');
        } else {
            debug!("Variable '{}' deleted", name);
        }
        deleted.insert(name);
    }

    accumulator.push_str(&appended);
    Ok((accumulator, deleted))
}

/// Append `text` to `accumulator`, resolving overrides if `text` contains any marker.
fn merge_block(
    accumulator: &mut String,
    text: &str,
    deleted: &mut BTreeSet<String>,
) -> Result<(), ModelError> {
    if text.contains(OVERRIDE_MARKER) {
        let (merged, names) = resolve_overrides(accumulator, text)?;
        *accumulator = merged;
        deleted.extend(names);
    } else {
        accumulator.push_str(text);
    }
    Ok(())
}

/// Merge the fragments in the given order, block by block.
/// Fragments without any override marker are simply concatenated.
pub fn combine_equations(fragments: &[Fragment]) -> Result<CombinedEquations, ModelError> {
    let mut combined = CombinedEquations::default();
    for fragment in fragments {
        merge_block(&mut combined.model, fragment.model, &mut combined.deleted)?;
        merge_block(&mut combined.pre, fragment.pre, &mut combined.deleted)?;
        merge_block(&mut combined.post, fragment.post, &mut combined.deleted)?;
    }
    Ok(combined)
}

/// Merge parameter tables in the given order, later tables replacing colliding entries,
/// then remove every deleted variable from the result.
pub fn combine_parameters<'a, I>(tables: I, deleted: &BTreeSet<String>) -> ParameterMap
where
    I: IntoIterator<Item = &'a ParameterMap>,
{
    let mut merged = ParameterMap::new();
    for table in tables {
        let collisions: Vec<String> = merged
            .keys()
            .filter(|key| table.contains_key(*key))
            .cloned()
            .collect();
        for key in collisions {
            merged.remove(&key);
        }
        merged.extend(table.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    for name in deleted {
        merged.remove(name);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::{parameter_map, Quantity};

    fn names(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_override_target() {
        assert_eq!(override_target("  %x = a : 1").unwrap(), "x");
        assert_eq!(override_target("%dIadapt/dt = -Iadapt/tau : amp").unwrap(), "Iadapt");
        assert_eq!(override_target("%d{synvar_e}/dt = 0 : {unit}").unwrap(), "{synvar_e}");
        assert_eq!(override_target("%Vm = c;").unwrap(), "Vm");
        assert_eq!(
            override_target("x = 1 %"),
            Err(ModelError::MalformedOverride("x = 1 %".to_string()))
        );
        assert!(override_target("%/dt = 1").is_err());
    }

    #[test]
    fn test_defined_name() {
        assert_eq!(defined_name("  x = a + b : 1"), Some("x"));
        assert_eq!(defined_name("Iconst  : amp   # input"), Some("Iconst"));
        assert_eq!(defined_name("dVm/dt = I/Cm : volt"), Some("dVm/dt"));
        assert_eq!(defined_name("   "), None);
        assert_eq!(defined_name(" = x"), None);
    }

    #[test]
    fn test_override_replace() {
        let (merged, deleted) =
            resolve_overrides("x = a + b : 1\ny = c : 1\n", "%x = d * e : 1\n").unwrap();
        assert_eq!(merged, "y = c : 1\nx = d * e : 1\n");
        assert_eq!(deleted, names(&["x"]));
    }

    #[test]
    fn test_override_delete() {
        let (merged, deleted) = resolve_overrides("x = a : 1\ny = c : 1\n", "%y\n").unwrap();
        assert_eq!(merged, "x = a : 1\n");
        assert_eq!(deleted, names(&["y"]));
    }

    #[test]
    fn test_override_absent_variable() {
        let (merged, deleted) = resolve_overrides("y = c : 1\n", "%x").unwrap();
        assert_eq!(merged, "y = c : 1\n");
        assert_eq!(deleted, names(&["x"]));

        let (merged, deleted) = resolve_overrides("", "%x").unwrap();
        assert_eq!(merged, "");
        assert_eq!(deleted, names(&["x"]));
    }

    #[test]
    fn test_override_differential() {
        let accumulator = "dIadapt/dt = -Iadapt/tau : amp\nIadapt_max : amp\ntau : second\n";
        let (merged, deleted) =
            resolve_overrides(accumulator, "%dIadapt/dt = 0 * amp/second : amp").unwrap();
        // `Iadapt_max` contains the name but does not define it
        assert_eq!(
            merged,
            "Iadapt_max : amp\ntau : second\ndIadapt/dt = 0 * amp/second : amp\n"
        );
        assert_eq!(deleted, names(&["Iadapt"]));

        // a plain override also removes the differential form
        let (merged, _) = resolve_overrides(accumulator, "%Iadapt = 0 * amp : amp").unwrap();
        assert_eq!(merged, "Iadapt_max : amp\ntau : second\nIadapt = 0 * amp : amp\n");
    }

    #[test]
    fn test_override_keeps_unmarked_lines_in_order() {
        let (merged, deleted) = resolve_overrides(
            "a : 1\nb = a : 1\n",
            "c : 1\n%b = 2*a : 1\nd : 1\n%a\n",
        )
        .unwrap();
        assert_eq!(merged, "c : 1\nb = 2*a : 1\nd : 1\n");
        assert_eq!(deleted, names(&["a", "b"]));
    }

    #[test]
    fn test_sequential_overrides_see_partial_state() {
        // the second marker does not see the replacement appended by the first one
        let (merged, deleted) =
            resolve_overrides("x = 1 : 1\n", "%x = 2 : 1\n%x = 3 : 1\n").unwrap();
        assert_eq!(merged, "x = 2 : 1\nx = 3 : 1\n");
        assert_eq!(deleted, names(&["x"]));
    }

    #[test]
    fn test_combine_without_markers_concatenates() {
        let a = Fragment::new("x : 1\n", "x += 1", " ");
        let b = Fragment::new("  y = x : 1\n", "", "x = 0");
        let combined = combine_equations(&[a, b]).unwrap();
        assert_eq!(combined.model, "x : 1\n  y = x : 1\n");
        assert_eq!(combined.pre, "x += 1");
        assert_eq!(combined.post, " x = 0");
        assert!(combined.deleted.is_empty());
    }

    #[test]
    fn test_combine_with_markers() {
        let base = Fragment::new("Vm : volt\nVthr : volt\n", "Vm > Vthr", "Vm = Vres;\n");
        let exp = Fragment::new("%Vthr = VT + 5*DeltaT : volt\nVT : volt\n", "", "");
        let quad = Fragment::new("", "", "%Vm = c;\nIadapt += wIadapt;\n");
        let combined = combine_equations(&[base, exp, quad]).unwrap();

        assert_eq!(combined.model, "Vm : volt\nVthr = VT + 5*DeltaT : volt\nVT : volt\n");
        assert_eq!(combined.pre, "Vm > Vthr");
        assert_eq!(combined.post, "Vm = c;\nIadapt += wIadapt;\n");
        assert_eq!(combined.deleted, names(&["Vm", "Vthr"]));
    }

    #[test]
    fn test_override_keeps_modulo() {
        let (merged, deleted) =
            resolve_overrides("p : 1\n", "%p = (seed+t) % period : 1\n").unwrap();
        assert_eq!(merged, "p = (seed+t) % period : 1\n");
        assert_eq!(deleted, names(&["p"]));
    }

    #[test]
    fn test_combine_malformed() {
        let base = Fragment::new("x : 1\n", "", "");
        let broken = Fragment::new("y : 1 %\n", "", "");
        assert!(matches!(
            combine_equations(&[base, broken]),
            Err(ModelError::MalformedOverride(_))
        ));
    }

    #[test]
    fn test_combine_parameters() {
        let first = parameter_map(&[("x", Quantity::scalar(1.0)), ("y", Quantity::scalar(2.0))]);
        let second = parameter_map(&[("x", Quantity::scalar(5.0))]);

        let merged = combine_parameters([&first, &second], &names(&["x"]));
        assert_eq!(merged, parameter_map(&[("y", Quantity::scalar(2.0))]));

        let merged = combine_parameters([&first, &second], &BTreeSet::new());
        assert_eq!(
            merged,
            parameter_map(&[("x", Quantity::scalar(5.0)), ("y", Quantity::scalar(2.0))])
        );
    }

    #[test]
    fn test_combine_parameters_replaces_whole_entry() {
        let first = parameter_map(&[("tau", Quantity::new(5.0, "ms"))]);
        let second = parameter_map(&[("tau", Quantity::scalar(2.0))]);
        let merged = combine_parameters([&first, &second], &names(&["absent"]));
        assert_eq!(merged["tau"], Quantity::scalar(2.0));
    }

    #[test]
    fn test_combine_parameters_order_free_without_collisions() {
        let first = parameter_map(&[("a", Quantity::scalar(1.0))]);
        let second = parameter_map(&[("b", Quantity::new(2.0, "ms"))]);
        assert_eq!(
            combine_parameters([&first, &second], &BTreeSet::new()),
            combine_parameters([&second, &first], &BTreeSet::new())
        );
    }
}
