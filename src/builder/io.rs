//! Export and import of equation sets as Python dictionaries.
//!
//! The exported file holds a single dictionary literal, named after the file:
//!
//! ```text
//! from brian2.units import *
//! exp_syn = {'model':
//! '''<model>''',
//! 'on_pre':
//! '''
//! <on_pre>''',
//! 'on_post':
//! '''
//! <on_post>
//! ''',
//! 'parameters':
//! {
//! 'tausyne' : '5 * ms',
//! }
//! }
//! ```
//!
//! Neuron models use the keys `threshold` and `reset` instead of `on_pre` and `on_post`.
use log::{debug, warn};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::{EquationSet, ModelKind};
use crate::error::ModelError;
use crate::quantity::{ParameterMap, Quantity};
use crate::DEFAULT_EQUATION_DIR;

const HEADER: &str = "from brian2.units import * \n";
const QUOTES: &str = "'''";

/// Render the equations as a Python dictionary assigned to `name`.
pub fn to_python(name: &str, equations: &EquationSet) -> Result<String, ModelError> {
    if let Some(block) = equations.blocks().iter().find(|block| block.contains(QUOTES)) {
        return Err(ModelError::InvalidOperation(format!(
            "Cannot export a text block containing {}: {}",
            QUOTES,
            block.trim()
        )));
    }
    // the closing quotes of model and pre follow the text directly
    if let Some(block) = [&equations.model, &equations.pre]
        .into_iter()
        .find(|block| block.ends_with('\''))
    {
        return Err(ModelError::InvalidOperation(format!(
            "Cannot export a text block ending with a quote: {}",
            block.trim()
        )));
    }

    let [k1, k2, k3] = equations.kind.keys();
    let mut text = String::from(HEADER);
    text.push_str(&format!("{} = {{", name));
    text.push_str(&format!("'{}':\n{}{}{},\n", k1, QUOTES, equations.model, QUOTES));
    text.push_str(&format!("'{}':\n{}\n{}{},\n", k2, QUOTES, equations.pre, QUOTES));
    text.push_str(&format!("'{}':\n{}\n{}\n{},\n", k3, QUOTES, equations.post, QUOTES));
    text.push_str("'parameters':\n{\n");
    for (key, value) in equations.parameters.iter() {
        text.push_str(&format!("'{}' : '{}',\n", key, value));
    }
    text.push_str("}\n}");
    Ok(text)
}

/// Consume `expected` at the start of `text`.
fn expect<'a>(text: &'a str, expected: &str) -> Result<&'a str, ModelError> {
    text.strip_prefix(expected).ok_or_else(|| {
        ModelError::ParseError(format!(
            "Expected '{}' near '{}'",
            expected.escape_debug(),
            text.chars().take(32).collect::<String>().escape_debug()
        ))
    })
}

/// Split `text` at the next occurrence of `delimiter`, consuming the delimiter.
fn take_until<'a>(text: &'a str, delimiter: &str) -> Result<(&'a str, &'a str), ModelError> {
    text.split_once(delimiter).ok_or_else(|| {
        ModelError::ParseError(format!("Missing closing '{}'", delimiter.escape_debug()))
    })
}

/// Parse a `'<name>' : '<value>'` parameter entry.
fn parse_parameter(line: &str) -> Result<(String, Quantity), ModelError> {
    let entry = line.trim().trim_end_matches(',');
    let (key, value) = entry
        .split_once(':')
        .ok_or_else(|| ModelError::ParseError(format!("Invalid parameter entry '{}'", entry)))?;

    let unquote = |s: &str| -> Result<String, ModelError> {
        let s = s.trim();
        s.strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .map(|s| s.to_string())
            .ok_or_else(|| ModelError::ParseError(format!("Expected a quoted string, got '{}'", s)))
    };

    let key = unquote(key)?;
    let value = unquote(value)?.parse::<Quantity>()?;
    Ok((key, value))
}

/// Parse a Python dictionary produced by [`to_python`], returning its name and the equations.
pub fn from_python(text: &str, kind: ModelKind) -> Result<(String, EquationSet), ModelError> {
    let [k1, k2, k3] = kind.keys();

    let rest = expect(text, HEADER)?;
    let (name, rest) = take_until(rest, " = {")?;

    let rest = expect(rest, &format!("'{}':\n{}", k1, QUOTES))?;
    let (model, rest) = take_until(rest, QUOTES)?;

    let rest = expect(rest, &format!(",\n'{}':\n{}\n", k2, QUOTES))?;
    let (pre, rest) = take_until(rest, QUOTES)?;

    let rest = expect(rest, &format!(",\n'{}':\n{}\n", k3, QUOTES))?;
    let (post, rest) = take_until(rest, &format!("\n{}", QUOTES))?;

    let rest = expect(rest, ",\n'parameters':\n{\n")?;
    let (entries, rest) = take_until(rest, "}\n}")?;
    if !rest.trim().is_empty() {
        return Err(ModelError::ParseError(format!(
            "Unexpected trailing content '{}'",
            rest.trim()
        )));
    }

    let parameters = entries
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_parameter)
        .collect::<Result<ParameterMap, ModelError>>()?;

    Ok((
        name.trim().to_string(),
        EquationSet::new(kind, model, pre, post, parameters),
    ))
}

/// Write the equations to `<path>.py`, as a dictionary named after the last component of `path`.
/// Returns the path of the written file.
pub fn export_eq<P: AsRef<Path>>(path: P, equations: &EquationSet) -> Result<PathBuf, ModelError> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ModelError::InvalidParameter(format!("Invalid export path '{}'", path.display()))
        })?;

    let text = to_python(name, equations)?;

    let mut file_name = OsString::from(path.as_os_str());
    file_name.push(".py");
    let file_path = PathBuf::from(file_name);
    fs::write(&file_path, text).map_err(|e| ModelError::IOError(e.to_string()))?;

    debug!("Equations '{}' exported to {}", name, file_path.display());
    Ok(file_path)
}

/// Resolve the file an import refers to.
/// A bare name is looked up in [`DEFAULT_EQUATION_DIR`] and `.py` is appended unless already present.
pub fn resolve_import_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let mut resolved = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => path.to_path_buf(),
        _ => Path::new(DEFAULT_EQUATION_DIR).join(path),
    };
    if resolved.extension().map_or(true, |extension| extension != "py") {
        let mut file_name = OsString::from(resolved.as_os_str());
        file_name.push(".py");
        resolved = PathBuf::from(file_name);
    }
    resolved
}

/// Read equations exported with [`export_eq`].
pub fn import_eq<P: AsRef<Path>>(path: P, kind: ModelKind) -> Result<EquationSet, ModelError> {
    let file_path = resolve_import_path(path);
    let text = fs::read_to_string(&file_path)
        .map_err(|e| ModelError::IOError(format!("{}: {}", file_path.display(), e)))?;
    let (name, equations) = from_python(&text, kind)?;

    match file_path.file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) if stem == name => {}
        stem => warn!(
            "Dictionary '{}' imported from a file named {:?}",
            name,
            stem.unwrap_or_default()
        ),
    }

    debug!("Equations '{}' imported from {}", name, file_path.display());
    Ok(equations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::parameter_map;
    use tempfile::tempdir;

    fn neuron_equations() -> EquationSet {
        EquationSet::new(
            ModelKind::Neuron,
            "\n        dVm/dt = -Vm/tau : volt\n        tau : second\n        ",
            "Vm > Vthr",
            "\n        Vm = Vres;\n        ",
            parameter_map(&[
                ("tau", Quantity::new(20.0, "ms")),
                ("Vthr", Quantity::new(-50.4, "mV")),
                ("n", Quantity::scalar(3.0)),
            ]),
        )
    }

    #[test]
    fn test_to_python_layout() {
        let equations = EquationSet::new(
            ModelKind::Synapse,
            "x : 1\n",
            "x += 1",
            " ",
            parameter_map(&[("a", Quantity::new(5.0, "ms")), ("b", Quantity::scalar(1.0))]),
        );
        assert_eq!(
            to_python("syn", &equations).unwrap(),
            "from brian2.units import * \nsyn = {'model':\n'''x : 1\n''',\n'on_pre':\n'''\nx += 1''',\n'on_post':\n'''\n \n''',\n'parameters':\n{\n'a' : '5 * ms',\n'b' : '1',\n}\n}"
        );
    }

    #[test]
    fn test_neuron_keys() {
        let text = to_python("lif", &neuron_equations()).unwrap();
        assert!(text.contains("'threshold':\n'''\nVm > Vthr''',\n"));
        assert!(text.contains("'reset':\n"));
        assert!(!text.contains("on_pre"));
    }

    #[test]
    fn test_python_round_trip() {
        let equations = neuron_equations();
        let text = to_python("lif", &equations).unwrap();
        let (name, parsed) = from_python(&text, ModelKind::Neuron).unwrap();
        assert_eq!(name, "lif");
        assert_eq!(parsed, equations);
    }

    #[test]
    fn test_triple_quotes_rejected() {
        let mut equations = neuron_equations();
        equations.post = "'''".to_string();
        assert!(matches!(
            to_python("lif", &equations),
            Err(ModelError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_trailing_quote_rejected() {
        let mut equations = neuron_equations();
        equations.pre = "x = 'a'".to_string();
        assert!(matches!(
            to_python("lif", &equations),
            Err(ModelError::InvalidOperation(_))
        ));

        let mut equations = neuron_equations();
        equations.model = "name = 'lif'".to_string();
        assert!(matches!(
            to_python("lif", &equations),
            Err(ModelError::InvalidOperation(_))
        ));

        // quotes inside the text are fine
        let mut equations = neuron_equations();
        equations.pre = "x == 'a' and y".to_string();
        let text = to_python("lif", &equations).unwrap();
        assert_eq!(from_python(&text, ModelKind::Neuron).unwrap().1, equations);
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let text = to_python("lif", &neuron_equations()).unwrap();
        assert!(matches!(
            from_python(&text, ModelKind::Synapse),
            Err(ModelError::ParseError(_))
        ));
    }

    #[test]
    fn test_invalid_parameter_entry() {
        assert!(parse_parameter("'tau' : '20 * ms',").is_ok());
        assert!(matches!(parse_parameter("tau : 20"), Err(ModelError::ParseError(_))));
        assert!(matches!(
            parse_parameter("'tau' : 'fast'"),
            Err(ModelError::ParseError(_))
        ));
    }

    #[test]
    fn test_resolve_import_path() {
        assert_eq!(
            resolve_import_path("DPISyn"),
            Path::new(DEFAULT_EQUATION_DIR).join("DPISyn.py")
        );
        assert_eq!(
            resolve_import_path("models/DPISyn"),
            PathBuf::from("models/DPISyn.py")
        );
        assert_eq!(
            resolve_import_path("models/DPISyn.py"),
            PathBuf::from("models/DPISyn.py")
        );
        assert_eq!(
            resolve_import_path("models/syn.v1"),
            PathBuf::from("models/syn.v1.py")
        );
    }

    #[test]
    fn test_export_import_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lif");

        let file_path = export_eq(&path, &neuron_equations()).unwrap();
        assert_eq!(file_path, dir.path().join("lif.py"));
        assert_eq!(import_eq(&path, ModelKind::Neuron).unwrap(), neuron_equations());
        assert_eq!(import_eq(&file_path, ModelKind::Neuron).unwrap(), neuron_equations());
    }

    #[test]
    fn test_export_import_dotted_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lif.v1");

        let file_path = export_eq(&path, &neuron_equations()).unwrap();
        assert_eq!(file_path, dir.path().join("lif.v1.py"));
        assert_eq!(import_eq(&path, ModelKind::Neuron).unwrap(), neuron_equations());
    }

    #[test]
    fn test_import_renamed_file() {
        let dir = tempdir().unwrap();
        let file_path = export_eq(dir.path().join("lif"), &neuron_equations()).unwrap();
        let renamed = dir.path().join("other.py");
        fs::rename(&file_path, &renamed).unwrap();

        // the dictionary name no longer matches the file, which is only worth a warning
        assert_eq!(import_eq(&renamed, ModelKind::Neuron).unwrap(), neuron_equations());
    }

    #[test]
    fn test_import_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            import_eq(dir.path().join("missing"), ModelKind::Synapse),
            Err(ModelError::IOError(_))
        ));
    }
}
