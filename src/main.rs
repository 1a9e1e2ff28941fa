use log::info;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use rusty_snn_models::builder::ModelBuilder;
use rusty_snn_models::error::ModelError;
use rusty_snn_models::models::{NEURON_PRESETS, SYNAPSE_PRESETS};
use rusty_snn_models::DEFAULT_EQUATION_DIR;

/// Export every preset model to `dir`.
fn export_presets(dir: &Path) -> Result<(), ModelError> {
    fs::create_dir_all(dir).map_err(|e| ModelError::IOError(e.to_string()))?;

    for (name, preset) in NEURON_PRESETS {
        let path = preset(1)?.export_eq(dir.join(name))?;
        info!("Neuron model {} written to {}", name, path.display());
    }
    for (name, preset) in SYNAPSE_PRESETS {
        let path = preset()?.export_eq(dir.join(name))?;
        info!("Synapse model {} written to {}", name, path.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let dir = PathBuf::from(args.get(1).map(|s| s.as_str()).unwrap_or(DEFAULT_EQUATION_DIR));

    match export_presets(&dir) {
        Ok(()) => println!(
            "Exported {} models to {}",
            NEURON_PRESETS.len() + SYNAPSE_PRESETS.len(),
            dir.display()
        ),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
