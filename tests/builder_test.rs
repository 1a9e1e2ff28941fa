use rusty_snn_models::builder::neuron::NeuronEquationBuilder;
use rusty_snn_models::builder::synapse::{SynapseEquationBuilder, SynapseModel};
use rusty_snn_models::builder::{EquationSet, ModelBuilder, INPUT_NUMBER};
use rusty_snn_models::error::ModelError;
use rusty_snn_models::inputs::InputSlots;
use rusty_snn_models::models;
use rusty_snn_models::templates::synapse::TEMPLATE;
use tempfile::tempdir;

#[test]
fn test_export_import_synapses() {
    let dir = tempdir().unwrap();

    for (base_unit, kernel, plasticity) in [
        ("current", "alpha", "non_plastic"),
        ("conductance", "resonant", "fusi"),
        ("DPI", "exponential", "stdp"),
    ] {
        let builder =
            SynapseEquationBuilder::new(&SynapseModel::new(base_unit, kernel, plasticity)).unwrap();
        let path = dir.path().join(format!("{}_syn", base_unit));

        builder.export_eq(&path).unwrap();
        let imported = SynapseEquationBuilder::import_eq(&path).unwrap();

        assert_eq!(imported.equations(), builder.equations(), "{}", base_unit);
    }
}

#[test]
fn test_export_import_renumbered_synapse() {
    let dir = tempdir().unwrap();
    let mut builder = models::reversal_syn().unwrap().instantiate();
    builder.set_input_number(2);

    builder.export_eq(dir.path().join("ReversalSynV")).unwrap();
    let imported = SynapseEquationBuilder::import_eq(dir.path().join("ReversalSynV.py")).unwrap();

    assert_eq!(imported.equations(), builder.equations());
    assert!(imported.equations().model.contains("Ie2_post = Ie_syn"));
}

#[test]
fn test_export_import_neurons() {
    let dir = tempdir().unwrap();

    for (name, preset) in models::NEURON_PRESETS {
        let builder = preset(2).unwrap();
        builder.export_eq(dir.path().join(name)).unwrap();
        let imported = NeuronEquationBuilder::import_eq(dir.path().join(name)).unwrap();

        assert_eq!(imported.equations(), builder.equations(), "{}", name);
    }
}

#[test]
fn test_exported_file_layout() {
    let dir = tempdir().unwrap();
    let path = models::exp_syn().unwrap().export_eq(dir.path().join("ExpSyn")).unwrap();
    let text = std::fs::read_to_string(path).unwrap();

    assert!(text.starts_with("from brian2.units import * \nExpSyn = {'model':\n'''"));
    assert!(text.contains("''',\n'on_pre':\n'''\n"));
    assert!(text.contains("'tausyne' : '5 * ms',\n"));
    assert!(text.ends_with(",\n}\n}"));
}

#[test]
fn test_import_as_wrong_kind() {
    let dir = tempdir().unwrap();
    models::dpi_syn().unwrap().export_eq(dir.path().join("DPISyn")).unwrap();

    assert!(matches!(
        NeuronEquationBuilder::import_eq(dir.path().join("DPISyn")),
        Err(ModelError::ParseError(_))
    ));
}

#[test]
fn test_independent_instances() {
    let builder = models::dpi_stdp().unwrap();

    let mut first = builder.instantiate();
    let mut second = builder.instantiate();
    first.set_input_number(0);
    second.set_input_number(1);

    assert!(TEMPLATE.model.contains(INPUT_NUMBER));
    assert!(builder.equations().model.contains(INPUT_NUMBER));
    assert_eq!(
        first.equations().model,
        builder.equations().model.replace(INPUT_NUMBER, "0")
    );
    assert_eq!(
        second.equations().model,
        builder.equations().model.replace(INPUT_NUMBER, "1")
    );
    assert_eq!(first.equations().parameters, second.equations().parameters);
}

#[test]
fn test_unknown_selector_fails_fast() {
    let result = SynapseEquationBuilder::new(&SynapseModel::new("current", "exponential", "bcm"));
    match result {
        Err(ModelError::UnknownSelector { axis, name, choices }) => {
            assert_eq!(axis, "plasticity");
            assert_eq!(name, "bcm");
            assert_eq!(choices, vec!["fusi", "non_plastic", "stdp"]);
        }
        other => panic!("Expected an unknown selector error, got {:?}", other),
    }
}

#[test]
fn test_wire_synapses_to_population() {
    let neuron = models::dpi_neuron(2).unwrap();
    let mut slots = InputSlots::new(2);
    let template = models::dpi_syn().unwrap();

    let synapses: Vec<SynapseEquationBuilder> = (0..2)
        .map(|_| {
            let mut synapse = template.instantiate();
            synapse.set_input_number(slots.register_synapse().unwrap());
            synapse
        })
        .collect();

    for (k, synapse) in synapses.iter().enumerate() {
        let target = format!("Ie{}_post", k);
        assert!(synapse.equations().model.contains(&target));
        assert!(neuron.equations().model.contains(&format!("Ie{} : amp", k)));
    }
    assert!(matches!(
        slots.register_synapse(),
        Err(ModelError::TooManyInputs { .. })
    ));
}

#[test]
fn test_json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("izhikevich.json");
    let builder = models::izhikevich(1).unwrap();

    builder.equations().save_to(&path).unwrap();
    let equations = EquationSet::load_from(&path).unwrap();
    let loaded = NeuronEquationBuilder::from_equations(equations).unwrap();

    assert_eq!(loaded.equations(), builder.equations());
}

#[test]
fn test_export_refuses_trailing_quote() {
    let dir = tempdir().unwrap();
    let mut builder = models::exp_syn().unwrap().instantiate();
    builder.equations_mut().pre = "x = 'a'".to_string();

    assert!(matches!(
        builder.export_eq(dir.path().join("QuotedSyn")),
        Err(ModelError::InvalidOperation(_))
    ));
    assert!(!dir.path().join("QuotedSyn.py").exists());
}
