//! The `run` command: evaluate an experiment file and print its assignment.

use std::path::Path;

use planout_value::{EvalError, Value, ValueMap};
use serde_json::json;

use crate::experiment::{ExperimentFile, RunOptions};

/// Outcome of one successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub name: String,
    pub salt: String,
    pub in_experiment: bool,
    pub params: ValueMap,
}

impl RunReport {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "salt": self.salt,
            "in_experiment": self.in_experiment,
            "params": Value::Map(self.params.clone()).to_json(),
        })
    }

    pub fn render(&self, pretty: bool) -> String {
        let json = self.to_json();
        if pretty {
            format!("{json:#}")
        } else {
            json.to_string()
        }
    }
}

/// Run an experiment with command-line options applied.
pub fn evaluate(file: ExperimentFile, options: &RunOptions) -> Result<RunReport, EvalError> {
    let mut interp = file.into_builder(options).build();
    let params = interp.run()?.clone();
    Ok(RunReport {
        name: interp.name().to_string(),
        salt: interp.salt().to_string(),
        in_experiment: interp.in_experiment(),
        params,
    })
}

/// Load, evaluate and print. Exits with status 1 on any failure.
pub fn run_file(path: &str, options: &RunOptions) {
    let file = match ExperimentFile::load(Path::new(path)) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    match evaluate(file, options) {
        Ok(report) => println!("{}", report.render(options.pretty)),
        Err(err) => {
            eprintln!("error: {path}: {err}");
            std::process::exit(1);
        }
    }
}
