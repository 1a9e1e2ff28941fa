//! This crate provides composable equation templates for spiking neural network simulators.
//!
//! Neuron and synapse models are assembled from reusable fragments of equations,
//! which can override the variables of the fragments merged before them (see [`combine`]).
//!
//! # Building Synapses
//!
//! ```rust
//! use rusty_snn_models::builder::ModelBuilder;
//! use rusty_snn_models::builder::synapse::{SynapseEquationBuilder, SynapseModel};
//!
//! // A conductance-based synapse with an alpha kernel
//! let builder = SynapseEquationBuilder::new(&SynapseModel::new("conductance", "alpha", "non_plastic")).unwrap();
//!
//! // Every population gets its own copy, wired to its own input slot
//! let mut first = builder.instantiate();
//! first.set_input_number(0);
//! let mut second = builder.instantiate();
//! second.set_input_number(1);
//!
//! assert!(first.equations().model.contains("Ie0_post"));
//! assert!(second.equations().model.contains("Ie1_post"));
//! assert!(builder.equations().model.contains("Ie{input_number}_post"));
//! ```
//!
//! Unknown names are rejected before anything is merged:
//!
//! ```rust
//! use rusty_snn_models::builder::synapse::{SynapseEquationBuilder, SynapseModel};
//! use rusty_snn_models::error::ModelError;
//!
//! let result = SynapseEquationBuilder::new(&SynapseModel::new("current", "square", "non_plastic"));
//! assert!(matches!(result, Err(ModelError::UnknownSelector { .. })));
//! ```
//!
//! # Building Neurons
//!
//! ```rust
//! use rusty_snn_models::builder::ModelBuilder;
//! use rusty_snn_models::builder::neuron::{NeuronEquationBuilder, NeuronModel};
//!
//! let mut builder = NeuronEquationBuilder::new(&NeuronModel::new(
//!     "voltage",
//!     "calcium_feedback",
//!     "exponential",
//!     "leaky",
//!     "spatial",
//!     "none",
//! ))
//! .unwrap();
//! builder.add_input_currents(2).unwrap();
//!
//! assert_eq!(builder.equations().pre, "Vm > Vthr");
//! assert!(builder.equations().model.contains("Iin = Ie0 + Ii0 + Ie1 + Ii1 : amp"));
//! ```
//!
//! # Exporting Models
//!
//! ```rust
//! use rusty_snn_models::builder::ModelBuilder;
//! use rusty_snn_models::builder::synapse::SynapseEquationBuilder;
//! use rusty_snn_models::models;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let builder = models::dpi_syn().unwrap();
//!
//! // Written to DPISyn.py, as a Python dictionary named DPISyn
//! builder.export_eq(dir.path().join("DPISyn")).unwrap();
//! let imported = SynapseEquationBuilder::import_eq(dir.path().join("DPISyn")).unwrap();
//!
//! assert_eq!(imported.equations(), builder.equations());
//! ```

pub mod builder;
pub mod combine;
pub mod error;
pub mod inputs;
pub mod models;
pub mod quantity;
pub mod templates;

/// The dark current of the silicon transistors, in pA.
pub const I0: f64 = 0.5;
/// The thermal voltage, in mV.
pub const UT: f64 = 25.0;
/// The subthreshold slope factor of n-type transistors.
pub const KAPPA_N: f64 = 0.75;
/// The subthreshold slope factor of p-type transistors.
pub const KAPPA_P: f64 = 0.66;
/// The directory searched for models imported by name only.
pub const DEFAULT_EQUATION_DIR: &str = "equations";
