//! Operator registry for looking up operators by name.
//!
//! The built-in catalog is fixed at compile time and built once per process.
//! Interpreters consult their own overrides before falling back to it.

use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap;

use crate::operator::Operator;
use crate::ops;

static BUILTIN_REGISTRY: OnceLock<OperatorRegistry> = OnceLock::new();

/// Registry of operators keyed by the name trees use in `"op"`.
pub struct OperatorRegistry {
    operators: FxHashMap<&'static str, Arc<dyn Operator>>,
}

/// Name and argument keys of one registered operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorSignature {
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

impl OperatorRegistry {
    /// The shared registry of built-in operators.
    pub fn builtin() -> &'static OperatorRegistry {
        BUILTIN_REGISTRY.get_or_init(|| {
            let mut operators = FxHashMap::default();
            for operator in ops::builtin_operators() {
                operators.insert(operator.name(), operator);
            }
            OperatorRegistry { operators }
        })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Operator>> {
        self.operators.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Every operator's signature, sorted by name.
    pub fn vocabulary(&self) -> Vec<OperatorSignature> {
        let mut signatures: Vec<_> = self
            .operators
            .values()
            .map(|op| OperatorSignature {
                name: op.name(),
                required: op.required_keys(),
                optional: op.optional_keys(),
            })
            .collect();
        signatures.sort_by_key(|signature| signature.name);
        signatures
    }
}

impl std::fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.operators.keys().collect();
        names.sort();
        f.debug_struct("OperatorRegistry")
            .field("operators", &names)
            .finish()
    }
}
