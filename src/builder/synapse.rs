//! Synapse model builder.
use log::debug;
use std::collections::BTreeSet;

use super::{check_kind, EquationSet, ModelBuilder, ModelKind, SYNVAR_E, SYNVAR_I, UNIT};
use crate::combine::{combine_equations, combine_parameters};
use crate::error::ModelError;
use crate::templates::lookup;
use crate::templates::synapse::{
    UnitBinding, BASE_UNITS, CURRENT_BINDING, KERNELS, PLASTICITY_MODELS,
};

/// Names of the registry entries a synapse model is built from.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SynapseModel {
    /// One of `current`, `conductance` or `DPI`.
    pub base_unit: String,
    /// One of `exponential`, `alpha`, `resonant` or `gaussian`.
    pub kernel: String,
    /// One of `non_plastic`, `fusi` or `stdp`.
    pub plasticity: String,
}

impl SynapseModel {
    pub fn new(base_unit: &str, kernel: &str, plasticity: &str) -> Self {
        SynapseModel {
            base_unit: base_unit.to_string(),
            kernel: kernel.to_string(),
            plasticity: plasticity.to_string(),
        }
    }
}

impl Default for SynapseModel {
    fn default() -> Self {
        SynapseModel::new("current", "exponential", "non_plastic")
    }
}

fn bindings(binding: &UnitBinding) -> [(&'static str, &'static str); 3] {
    [
        (SYNVAR_E, binding.synvar_e),
        (SYNVAR_I, binding.synvar_i),
        (UNIT, binding.unit),
    ]
}

/// Builds the equations of a synapse population.
#[derive(Debug, PartialEq, Clone)]
pub struct SynapseEquationBuilder {
    template: EquationSet,
    equations: EquationSet,
}

impl SynapseEquationBuilder {
    /// Build the synapse model made of a base unit, a kernel and a plasticity rule.
    ///
    /// Every name is checked against the registries before any equation is merged.
    /// The kernel and plasticity rule must also be supported by the base unit, e.g.,
    /// `DPI` synapses only come with the `exponential` kernel.
    pub fn new(model: &SynapseModel) -> Result<Self, ModelError> {
        let mode = lookup(&BASE_UNITS, "base_unit", &model.base_unit)?;
        let kernel = lookup(&KERNELS, "kernel", &model.kernel)?;
        let plasticity = lookup(&PLASTICITY_MODELS, "plasticity", &model.plasticity)?;
        let kernel_parameters = lookup(&mode.kernel_parameters, "kernel", &model.kernel)?;
        let plasticity_parameters =
            lookup(&mode.plasticity_parameters, "plasticity", &model.plasticity)?;

        let mut fragments = mode.fragments.clone();
        fragments.extend([*kernel, *plasticity]);
        let combined = combine_equations(&fragments)?;

        let bindings = bindings(&mode.binding);
        let deleted: BTreeSet<String> = combined
            .deleted
            .iter()
            .map(|name| super::substitute(name, &bindings))
            .collect();
        let parameters = combine_parameters(
            [&mode.parameters, kernel_parameters, plasticity_parameters],
            &deleted,
        );

        let mut equations = EquationSet::new(
            ModelKind::Synapse,
            &combined.model,
            &combined.pre,
            &combined.post,
            parameters,
        );
        equations.substitute(&bindings);

        debug!(
            "Synapse model {}/{}/{} built, {} parameters, deleted: {:?}",
            model.base_unit,
            model.kernel,
            model.plasticity,
            equations.parameters.len(),
            deleted
        );

        Ok(SynapseEquationBuilder {
            template: equations.clone(),
            equations,
        })
    }
}

impl ModelBuilder for SynapseEquationBuilder {
    const KIND: ModelKind = ModelKind::Synapse;

    fn template(&self) -> &EquationSet {
        &self.template
    }

    fn equations(&self) -> &EquationSet {
        &self.equations
    }

    fn equations_mut(&mut self) -> &mut EquationSet {
        &mut self.equations
    }

    /// Wrap ready-made synapse equations. Generic synaptic variables are bound to current-based names.
    fn from_equations(mut equations: EquationSet) -> Result<Self, ModelError> {
        check_kind(&equations, Self::KIND)?;
        equations.substitute(&bindings(&CURRENT_BINDING));
        Ok(SynapseEquationBuilder {
            template: equations.clone(),
            equations,
        })
    }
}
