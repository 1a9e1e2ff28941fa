//! Error module for the Rusty SNN models library.
use std::error::Error;
use std::fmt;

use itertools::Itertools;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum ModelError {
    /// Error for a model family that is absent from its registry, e.g., an unknown kernel name.
    UnknownSelector {
        axis: String,
        name: String,
        choices: Vec<String>,
    },
    /// Error for an override marker that is not followed by a variable name.
    MalformedOverride(String),
    /// Error for invalid parameters
    InvalidParameter(String),
    /// Error for too many synapses registered on a population, i.e., more than its declared inputs.
    TooManyInputs {
        num_inputs: usize,
        num_synapses: usize,
    },
    /// Error while parsing an exported model or a quantity.
    ParseError(String),
    /// Error for I/O operations.
    IOError(String),
    /// Error for invalid operation.
    InvalidOperation(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModelError::UnknownSelector {
                axis,
                name,
                choices,
            } => write!(
                f,
                "Model not present in dictionaries: unknown {} '{}', choose between: {}",
                axis,
                name,
                choices.iter().map(|c| format!("'{}'", c)).join(", ")
            ),
            ModelError::MalformedOverride(e) => write!(f, "Malformed override line: {}", e),
            ModelError::InvalidParameter(e) => write!(f, "Invalid parameters: {}", e),
            ModelError::TooManyInputs {
                num_inputs,
                num_synapses,
            } => write!(
                f,
                "Too many connections: {} synapses registered for {} inputs, please increase num_inputs",
                num_synapses, num_inputs
            ),
            ModelError::ParseError(e) => write!(f, "Parse error: {}", e),
            ModelError::IOError(e) => write!(f, "I/O error: {}", e),
            ModelError::InvalidOperation(e) => write!(f, "Invalid operation: {}", e),
        }
    }
}

impl Error for ModelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_selector_message() {
        let error = ModelError::UnknownSelector {
            axis: "kernel".to_string(),
            name: "square".to_string(),
            choices: vec!["alpha".to_string(), "exponential".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Model not present in dictionaries: unknown kernel 'square', choose between: 'alpha', 'exponential'"
        );
    }

    #[test]
    fn test_too_many_inputs_message() {
        let error = ModelError::TooManyInputs {
            num_inputs: 2,
            num_synapses: 3,
        };
        assert!(error.to_string().contains("3 synapses registered for 2 inputs"));
    }
}
