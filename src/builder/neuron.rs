//! Neuron model builder.
use itertools::Itertools;
use log::debug;

use super::{check_kind, EquationSet, ModelBuilder, ModelKind};
use crate::combine::{combine_equations, combine_parameters, resolve_overrides, OVERRIDE_MARKER};
use crate::error::ModelError;
use crate::templates::lookup;
use crate::templates::neuron::BASE_UNITS;

/// Names of the registry entries a neuron model is built from.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NeuronModel {
    /// One of `current`, `voltage` or `quantized`.
    pub base_unit: String,
    pub adaptation: String,
    pub integration_mode: String,
    pub leak: String,
    pub position: String,
    pub noise: String,
}

impl NeuronModel {
    pub fn new(
        base_unit: &str,
        adaptation: &str,
        integration_mode: &str,
        leak: &str,
        position: &str,
        noise: &str,
    ) -> Self {
        NeuronModel {
            base_unit: base_unit.to_string(),
            adaptation: adaptation.to_string(),
            integration_mode: integration_mode.to_string(),
            leak: leak.to_string(),
            position: position.to_string(),
            noise: noise.to_string(),
        }
    }

    /// Returns the equation sets, with the name of their axis, in merge order.
    fn equation_sets(&self) -> [(&'static str, &str); 5] {
        [
            ("adaptation", self.adaptation.as_str()),
            ("integration_mode", self.integration_mode.as_str()),
            ("leak", self.leak.as_str()),
            ("position", self.position.as_str()),
            ("noise", self.noise.as_str()),
        ]
    }
}

impl Default for NeuronModel {
    fn default() -> Self {
        NeuronModel::new(
            "current",
            "calcium_feedback",
            "exponential",
            "leaky",
            "spatial",
            "none",
        )
    }
}

/// Builds the equations of a neuron population.
#[derive(Debug, PartialEq, Clone)]
pub struct NeuronEquationBuilder {
    template: EquationSet,
    equations: EquationSet,
}

impl NeuronEquationBuilder {
    /// Build the neuron model made of a base unit and five equation sets.
    /// Every name must be an equation set of the chosen base unit.
    pub fn new(model: &NeuronModel) -> Result<Self, ModelError> {
        let mode = lookup(&BASE_UNITS, "base_unit", &model.base_unit)?;
        let blocks = model
            .equation_sets()
            .into_iter()
            .map(|(axis, name)| lookup(&mode.equation_sets, axis, name))
            .collect::<Result<Vec<_>, ModelError>>()?;

        let blocks: Vec<_> = std::iter::once(&mode.template).chain(blocks).collect();
        let fragments: Vec<_> = blocks.iter().map(|block| block.fragment).collect();
        let combined = combine_equations(&fragments)?;
        let parameters = combine_parameters(
            blocks.iter().map(|block| &block.parameters),
            &combined.deleted,
        );

        debug!(
            "Neuron model {:?} built, {} parameters, deleted: {:?}",
            model,
            parameters.len(),
            combined.deleted
        );

        let equations = EquationSet::new(
            ModelKind::Neuron,
            &combined.model,
            &combined.pre,
            &combined.post,
            parameters,
        );
        Ok(NeuronEquationBuilder {
            template: equations.clone(),
            equations,
        })
    }

    /// Declare `num_inputs` input slots, `Ie0` and `Ii0` to `Ie{num_inputs-1}` and `Ii{num_inputs-1}`,
    /// and define the total input current `Iin` as their sum.
    /// Replaces the sum and the slot declarations of a previous call.
    pub fn add_input_currents(&mut self, num_inputs: usize) -> Result<(), ModelError> {
        if num_inputs == 0 {
            return Err(ModelError::InvalidParameter(
                "A neuron needs at least one input".to_string(),
            ));
        }

        let sum = (0..num_inputs)
            .map(|k| format!("Ie{} + Ii{}", k, k))
            .join(" + ");
        let mut overrides = format!("        {}Iin = {} : amp\n", OVERRIDE_MARKER, sum);
        for k in 0..num_inputs {
            overrides.push_str(&format!("        {}Ie{} : amp\n", OVERRIDE_MARKER, k));
            overrides.push_str(&format!("        {}Ii{} : amp\n", OVERRIDE_MARKER, k));
        }

        for equations in [&mut self.template, &mut self.equations] {
            // slots left over from a previous call with more inputs
            let mut stale = String::new();
            let mut k = num_inputs;
            while equations.model.contains(&format!("Ie{} : amp", k)) {
                stale.push_str(&format!("        {}Ie{}\n", OVERRIDE_MARKER, k));
                stale.push_str(&format!("        {}Ii{}\n", OVERRIDE_MARKER, k));
                k += 1;
            }
            let (model, _) = resolve_overrides(&equations.model, &(overrides.clone() + &stale))?;
            equations.model = model;
        }
        Ok(())
    }
}

impl ModelBuilder for NeuronEquationBuilder {
    const KIND: ModelKind = ModelKind::Neuron;

    fn template(&self) -> &EquationSet {
        &self.template
    }

    fn equations(&self) -> &EquationSet {
        &self.equations
    }

    fn equations_mut(&mut self) -> &mut EquationSet {
        &mut self.equations
    }

    fn from_equations(equations: EquationSet) -> Result<Self, ModelError> {
        check_kind(&equations, Self::KIND)?;
        Ok(NeuronEquationBuilder {
            template: equations.clone(),
            equations,
        })
    }
}
