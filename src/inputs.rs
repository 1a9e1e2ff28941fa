//! Allocation of the input slots of a neuron population.
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Counts the synapse populations targeting a neuron population and hands out their input slots.
///
/// A population declared with `n` inputs (see
/// [`NeuronEquationBuilder::add_input_currents`](crate::builder::neuron::NeuronEquationBuilder::add_input_currents))
/// exposes the slots `0` to `n-1`.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct InputSlots {
    num_inputs: usize,
    num_synapses: usize,
}

impl InputSlots {
    pub fn new(num_inputs: usize) -> Self {
        InputSlots {
            num_inputs,
            num_synapses: 0,
        }
    }

    /// Returns the number of declared inputs.
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    /// Returns the number of registered synapse populations.
    pub fn num_synapses(&self) -> usize {
        self.num_synapses
    }

    /// Register a new synapse population and return its (zero-based) input slot.
    /// The count is left unchanged on error.
    pub fn register_synapse(&mut self) -> Result<usize, ModelError> {
        if self.num_synapses >= self.num_inputs {
            return Err(ModelError::TooManyInputs {
                num_inputs: self.num_inputs,
                num_synapses: self.num_synapses + 1,
            });
        }
        self.num_synapses += 1;
        Ok(self.num_synapses - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_synapse() {
        let mut slots = InputSlots::new(2);
        assert_eq!(slots.register_synapse(), Ok(0));
        assert_eq!(slots.register_synapse(), Ok(1));
        assert_eq!(
            slots.register_synapse(),
            Err(ModelError::TooManyInputs {
                num_inputs: 2,
                num_synapses: 3
            })
        );
        assert_eq!(slots.num_synapses(), 2);
    }

    #[test]
    fn test_no_inputs() {
        let mut slots = InputSlots::new(0);
        assert!(slots.register_synapse().is_err());
        assert_eq!(slots.num_synapses(), 0);
    }
}
