//! Model builders and the equation sets they produce.
//!
//! A builder resolves a selection of registry entries (see [`crate::templates`]) into a single
//! [`EquationSet`], binding the generic placeholders of the fragments on the way.
//! The `{input_number}` placeholder is kept until [`ModelBuilder::set_input_number`] is called on a
//! working copy obtained with [`ModelBuilder::instantiate`].
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ModelError;
use crate::quantity::ParameterMap;

pub mod io;
pub mod neuron;
pub mod synapse;

/// Placeholder of the input slot a synapse writes into.
pub const INPUT_NUMBER: &str = "{input_number}";
/// Placeholder of the unit of the synaptic variables.
pub const UNIT: &str = "{unit}";
/// Placeholder of the excitatory synaptic variable.
pub const SYNVAR_E: &str = "{synvar_e}";
/// Placeholder of the inhibitory synaptic variable.
pub const SYNVAR_I: &str = "{synvar_i}";

/// Separator between the sections of a printed equation set.
const RULER: &str = "-_-_-_-_-_-_-_-";

/// The kind of population an equation set describes.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum ModelKind {
    Neuron,
    Synapse,
}

impl ModelKind {
    /// Returns the names of the three text blocks, as used by the simulator.
    pub fn keys(&self) -> [&'static str; 3] {
        match self {
            ModelKind::Neuron => ["model", "threshold", "reset"],
            ModelKind::Synapse => ["model", "on_pre", "on_post"],
        }
    }

    /// Returns the variables that can safely be changed once a population is instantiated.
    pub fn changeable_parameters(&self) -> Vec<String> {
        match self {
            ModelKind::Neuron => vec![],
            ModelKind::Synapse => vec!["weight".to_string()],
        }
    }
}

/// A merged model: equations, event statements and default parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct EquationSet {
    pub kind: ModelKind,
    /// The model equations.
    pub model: String,
    /// The `on_pre` statements of a synapse, or the threshold condition of a neuron.
    pub pre: String,
    /// The `on_post` statements of a synapse, or the reset statements of a neuron.
    pub post: String,
    pub parameters: ParameterMap,
    pub changeable_parameters: Vec<String>,
}

impl EquationSet {
    /// Create a new equation set, with the changeable parameters of its kind.
    pub fn new(kind: ModelKind, model: &str, pre: &str, post: &str, parameters: ParameterMap) -> Self {
        EquationSet {
            kind,
            model: model.to_string(),
            pre: pre.to_string(),
            post: post.to_string(),
            parameters,
            changeable_parameters: kind.changeable_parameters(),
        }
    }

    /// Returns the three text blocks, in the order of [`ModelKind::keys`].
    pub fn blocks(&self) -> [&str; 3] {
        [&self.model, &self.pre, &self.post]
    }

    /// Replace every placeholder in the three text blocks by its bound value.
    pub fn substitute(&mut self, bindings: &[(&str, &str)]) {
        self.model = substitute(&self.model, bindings);
        self.pre = substitute(&self.pre, bindings);
        self.post = substitute(&self.post, bindings);
    }

    /// Save the equation set to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let file = File::create(path).map_err(|e| ModelError::IOError(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| ModelError::IOError(e.to_string()))?;
        writer.flush().map_err(|e| ModelError::IOError(e.to_string()))
    }

    /// Load an equation set from a JSON file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let file = File::open(path).map_err(|e| ModelError::IOError(e.to_string()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| ModelError::IOError(e.to_string()))
    }
}

impl fmt::Display for EquationSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let titles = match self.kind {
            ModelKind::Neuron => ["Model equation:", "Threshold condition:", "Reset equation:"],
            ModelKind::Synapse => ["Model equation:", "Pre spike equation:", "Post spike equation:"],
        };
        for (title, block) in titles.iter().zip(self.blocks()) {
            writeln!(f, "{}", title)?;
            writeln!(f, "{}", block)?;
            writeln!(f, "{}", RULER)?;
        }
        writeln!(f, "Parameters:")?;
        for (name, value) in self.parameters.iter() {
            writeln!(f, "{}: {}", name, value)?;
        }
        write!(f, "{}", RULER)
    }
}

/// Replace every occurrence of each placeholder of `bindings` in `text`.
pub fn substitute(text: &str, bindings: &[(&str, &str)]) -> String {
    bindings
        .iter()
        .fold(text.to_string(), |text, (placeholder, value)| {
            text.replace(placeholder, value)
        })
}

/// Behavior shared by the neuron and synapse builders.
///
/// A builder keeps a pristine template next to its working equations.
/// Only the working equations are ever modified by the per-instance operations.
pub trait ModelBuilder: Clone + Sized {
    /// The kind of model the builder produces.
    const KIND: ModelKind;

    /// Returns the pristine equations, with the `{input_number}` placeholder unbound.
    fn template(&self) -> &EquationSet;

    /// Returns the working equations.
    fn equations(&self) -> &EquationSet;

    /// Returns a mutable reference to the working equations.
    fn equations_mut(&mut self) -> &mut EquationSet;

    /// Wrap ready-made equations, bypassing the registries.
    fn from_equations(equations: EquationSet) -> Result<Self, ModelError>;

    /// Returns an independent copy whose working equations are reset to the template.
    fn instantiate(&self) -> Self {
        let mut builder = self.clone();
        *builder.equations_mut() = self.template().clone();
        builder
    }

    /// Bind the input slot of the working equations to `input_number` (zero-based).
    /// Has no effect once the slot is bound; call it on a fresh instance.
    fn set_input_number(&mut self, input_number: usize) {
        let input_number = input_number.to_string();
        self.equations_mut()
            .substitute(&[(INPUT_NUMBER, input_number.as_str())]);
    }

    /// Log the working equations and their parameters.
    fn print_all(&self) {
        info!("\n{}", self.equations());
    }

    /// Export the working equations to `<path>.py`, see [`io::export_eq`].
    fn export_eq<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, ModelError> {
        io::export_eq(path, self.equations())
    }

    /// Import equations previously exported with [`ModelBuilder::export_eq`].
    fn import_eq<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        Self::from_equations(io::import_eq(path, Self::KIND)?)
    }
}

/// Check that `equations` describes a model of the expected kind.
fn check_kind(equations: &EquationSet, kind: ModelKind) -> Result<(), ModelError> {
    if equations.kind != kind {
        return Err(ModelError::InvalidParameter(format!(
            "Expected {:?} equations, got {:?} equations",
            kind, equations.kind
        )));
    }
    Ok(())
}
