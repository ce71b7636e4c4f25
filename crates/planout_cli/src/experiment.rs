//! Experiment files and command-line assignments.
//!
//! An experiment file is a JSON object:
//!
//! ```text
//! {
//!   "name": "button_color",          optional, defaults to the file stem
//!   "salt": "bc1",                   optional, defaults to the name
//!   "code": { "op": "seq", ... },    required
//!   "inputs": { "userid": 42 },      optional
//!   "overrides": { "color": "red" }  optional
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use planout_eval::InterpreterBuilder;
use planout_value::{Value, ValueMap};
use serde::Deserialize;

type JsonMap = serde_json::Map<String, serde_json::Value>;

/// A parsed experiment file.
#[derive(Debug, Deserialize)]
pub struct ExperimentFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub salt: Option<String>,
    pub code: serde_json::Value,
    #[serde(default)]
    pub inputs: JsonMap,
    #[serde(default)]
    pub overrides: JsonMap,
}

/// Failure to load an experiment file.
#[derive(Debug)]
pub enum LoadError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Read { path, source } => {
                write!(f, "cannot read '{}': {source}", path.display())
            }
            LoadError::Parse { path, source } => {
                write!(f, "invalid experiment file '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Read { source, .. } => Some(source),
            LoadError::Parse { source, .. } => Some(source),
        }
    }
}

impl ExperimentFile {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Read and parse a file. An unnamed experiment takes the file stem.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut file = Self::parse(&text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if file.name.is_empty() {
            if let Some(stem) = path.file_stem() {
                file.name = stem.to_string_lossy().into_owned();
            }
        }
        tracing::debug!(name = %file.name, path = %path.display(), "loaded experiment");
        Ok(file)
    }

    /// Interpreter for this experiment with command-line options applied.
    ///
    /// Command-line inputs and overrides replace file entries of the same name.
    pub fn into_builder(self, options: &RunOptions) -> InterpreterBuilder {
        let mut builder = InterpreterBuilder::new(Value::from(self.code))
            .name(self.name)
            .inputs(to_value_map(self.inputs))
            .overrides(to_value_map(self.overrides));
        if let Some(salt) = options.salt.clone().or(self.salt) {
            builder = builder.salt(salt);
        }
        for (name, value) in &options.inputs {
            builder = builder.input(name.clone(), value.clone());
        }
        for (name, value) in &options.overrides {
            builder = builder.override_value(name.clone(), value.clone());
        }
        builder
    }
}

fn to_value_map(map: JsonMap) -> ValueMap {
    map.into_iter()
        .map(|(key, value)| (key, Value::from(value)))
        .collect()
}

/// Options accepted by `planout run`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunOptions {
    /// Replaces the file's salt.
    pub salt: Option<String>,
    pub inputs: Vec<(String, Value)>,
    pub overrides: Vec<(String, Value)>,
    /// Pretty-print the result.
    pub pretty: bool,
}

/// Parse the arguments after `run`: the file path, then options.
pub fn parse_run_args(args: &[String]) -> Result<(String, RunOptions), String> {
    let mut options = RunOptions::default();
    let mut path = None;
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if let Some(salt) = arg.strip_prefix("--salt=") {
            options.salt = Some(salt.to_string());
        } else if arg == "--salt" {
            i += 1;
            let salt = args.get(i).ok_or("--salt requires a value")?;
            options.salt = Some(salt.clone());
        } else if let Some(assignment) = arg.strip_prefix("--input=") {
            options.inputs.push(parse_assignment(assignment)?);
        } else if arg == "--input" {
            i += 1;
            let assignment = args.get(i).ok_or("--input requires k=v")?;
            options.inputs.push(parse_assignment(assignment)?);
        } else if let Some(assignment) = arg.strip_prefix("--override=") {
            options.overrides.push(parse_assignment(assignment)?);
        } else if arg == "--override" {
            i += 1;
            let assignment = args.get(i).ok_or("--override requires k=v")?;
            options.overrides.push(parse_assignment(assignment)?);
        } else if arg == "--pretty" {
            options.pretty = true;
        } else if arg.starts_with('-') {
            return Err(format!("unknown option '{arg}'"));
        } else if path.is_none() {
            path = Some(arg.to_string());
        } else {
            return Err(format!("unexpected argument '{arg}'"));
        }
        i += 1;
    }
    let path = path.ok_or("missing experiment file")?;
    Ok((path, options))
}

/// Parse `name=value`. The value is JSON when it parses as JSON, otherwise
/// it is taken as a plain string.
pub fn parse_assignment(text: &str) -> Result<(String, Value), String> {
    let Some((name, raw)) = text.split_once('=') else {
        return Err(format!("expected name=value, got '{text}'"));
    };
    if name.is_empty() {
        return Err(format!("missing name in '{text}'"));
    }
    let value = Value::from_json_str(raw).unwrap_or_else(|_| Value::from(raw));
    Ok((name.to_string(), value))
}
