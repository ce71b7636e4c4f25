//! The `ops` command: print the operator vocabulary.

use planout_eval::{OperatorRegistry, OperatorSignature};

pub fn list_operators() {
    let vocabulary = OperatorRegistry::builtin().vocabulary();
    print!("{}", format_vocabulary(&vocabulary));
}

/// One line per operator: name, required keys, optional keys.
pub fn format_vocabulary(signatures: &[OperatorSignature]) -> String {
    let width = signatures.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for signature in signatures {
        let required = if signature.required.is_empty() {
            "(any)".to_string()
        } else {
            signature.required.join(", ")
        };
        out.push_str(&format!("  {:<width$}  {required}", signature.name));
        if !signature.optional.is_empty() {
            out.push_str(&format!("  [{}]", signature.optional.join(", ")));
        }
        out.push('\n');
    }
    out
}
