//! Registries of reusable equation fragments and of their default parameters.
//!
//! - [`synapse`]: base units, temporal kernels and plasticity rules of synapses
//! - [`neuron`]: base units and equation sets (adaptation, integration, leak, position, noise) of neurons
//!
//! Registries are built once, on first use, and are read-only afterwards.
//! Fragment text may contain the placeholders `{input_number}`, `{unit}`, `{synvar_e}` and `{synvar_i}`,
//! which are bound by the builders (see [`crate::builder`]).
use std::collections::BTreeMap;

use super::error::ModelError;

pub mod neuron;
pub mod synapse;

/// A named table indexed by family name.
pub type Registry<T> = BTreeMap<&'static str, T>;

/// A reusable bundle of equations.
///
/// For synapses, `pre` and `post` hold the statements executed on pre- and post-synaptic spikes.
/// For neurons, they hold the threshold condition and the reset statements.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Fragment<'a> {
    pub model: &'a str,
    pub pre: &'a str,
    pub post: &'a str,
}

impl<'a> Fragment<'a> {
    /// Create a new fragment from its three blocks.
    pub const fn new(model: &'a str, pre: &'a str, post: &'a str) -> Self {
        Fragment { model, pre, post }
    }
}

/// An empty fragment, for families that add nothing to the base model.
pub const NONE: Fragment<'static> = Fragment::new("", "", "");

/// Returns the entry of `registry` named `name`, or an error listing the valid choices for `axis`.
pub fn lookup<'r, T>(registry: &'r Registry<T>, axis: &str, name: &str) -> Result<&'r T, ModelError> {
    registry.get(name).ok_or_else(|| ModelError::UnknownSelector {
        axis: axis.to_string(),
        name: name.to_string(),
        choices: registry.keys().map(|k| k.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let registry: Registry<u8> = [("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(lookup(&registry, "kernel", "a"), Ok(&1));
        assert_eq!(
            lookup(&registry, "kernel", "c"),
            Err(ModelError::UnknownSelector {
                axis: "kernel".to_string(),
                name: "c".to_string(),
                choices: vec!["a".to_string(), "b".to_string()],
            })
        );
    }
}
