//! Ready-made neuron and synapse models.
//!
//! Each preset is a plain registry selection, e.g., [`izhikevich`] is the `voltage` base unit with
//! `calcium_feedback` adaptation and `quadratic` integration.
//! [`NEURON_PRESETS`] and [`SYNAPSE_PRESETS`] list every preset under the name it is exported with.
use crate::builder::neuron::{NeuronEquationBuilder, NeuronModel};
use crate::builder::synapse::{SynapseEquationBuilder, SynapseModel};
use crate::error::ModelError;

/// A neuron preset, built with the given number of inputs.
pub type NeuronPreset = fn(usize) -> Result<NeuronEquationBuilder, ModelError>;
/// A synapse preset.
pub type SynapsePreset = fn() -> Result<SynapseEquationBuilder, ModelError>;

fn neuron(model: NeuronModel, num_inputs: usize) -> Result<NeuronEquationBuilder, ModelError> {
    let mut builder = NeuronEquationBuilder::new(&model)?;
    builder.add_input_currents(num_inputs)?;
    Ok(builder)
}

fn synapse(base_unit: &str, kernel: &str, plasticity: &str) -> Result<SynapseEquationBuilder, ModelError> {
    SynapseEquationBuilder::new(&SynapseModel::new(base_unit, kernel, plasticity))
}

/// Adaptive exponential integrate and fire neuron.
pub fn exp_adapt_if(num_inputs: usize) -> Result<NeuronEquationBuilder, ModelError> {
    neuron(
        NeuronModel::new(
            "voltage",
            "calcium_feedback",
            "exponential",
            "non_leaky",
            "spatial",
            "none",
        ),
        num_inputs,
    )
}

/// Izhikevich neuron.
pub fn izhikevich(num_inputs: usize) -> Result<NeuronEquationBuilder, ModelError> {
    neuron(
        NeuronModel::new(
            "voltage",
            "calcium_feedback",
            "quadratic",
            "non_leaky",
            "spatial",
            "none",
        ),
        num_inputs,
    )
}

/// Current-based adaptive exponential leaky integrate and fire neuron, following the silicon DPI neuron.
pub fn dpi_neuron(num_inputs: usize) -> Result<NeuronEquationBuilder, ModelError> {
    neuron(NeuronModel::default(), num_inputs)
}

/// Leaky integrate and fire neuron with stochastic decay, for quantized simulations.
pub fn quantized_stochastic_lif(num_inputs: usize) -> Result<NeuronEquationBuilder, ModelError> {
    neuron(
        NeuronModel::new("quantized", "none", "none", "none", "spatial", "none"),
        num_inputs,
    )
}

/// Current-based synapse with exponential decay.
pub fn exp_syn() -> Result<SynapseEquationBuilder, ModelError> {
    synapse("current", "exponential", "non_plastic")
}

pub fn alpha_syn() -> Result<SynapseEquationBuilder, ModelError> {
    synapse("current", "alpha", "non_plastic")
}

pub fn resonant_syn() -> Result<SynapseEquationBuilder, ModelError> {
    synapse("current", "resonant", "non_plastic")
}

/// Conductance-based synapse with reversal potentials.
pub fn reversal_syn() -> Result<SynapseEquationBuilder, ModelError> {
    synapse("conductance", "exponential", "non_plastic")
}

pub fn stdp_syn() -> Result<SynapseEquationBuilder, ModelError> {
    synapse("current", "exponential", "stdp")
}

/// Silicon DPI synapse.
pub fn dpi_syn() -> Result<SynapseEquationBuilder, ModelError> {
    synapse("DPI", "exponential", "non_plastic")
}

/// Silicon DPI synapse with STDP.
pub fn dpi_stdp() -> Result<SynapseEquationBuilder, ModelError> {
    synapse("DPI", "exponential", "stdp")
}

/// Neuron presets and their export names.
pub const NEURON_PRESETS: [(&str, NeuronPreset); 4] = [
    ("ExpAdaptIF", exp_adapt_if),
    ("Izhikevich", izhikevich),
    ("DPI", dpi_neuron),
    ("QuantStochLIF", quantized_stochastic_lif),
];

/// Synapse presets and their export names.
pub const SYNAPSE_PRESETS: [(&str, SynapsePreset); 7] = [
    ("ExpSyn", exp_syn),
    ("Alpha", alpha_syn),
    ("Resonant", resonant_syn),
    ("ReversalSynV", reversal_syn),
    ("StdpSyn", stdp_syn),
    ("DPISyn", dpi_syn),
    ("DPIstdp", dpi_stdp),
];
