//! The built-in operator catalog.
//!
//! Operators are zero-sized (or const-configured) values. The registry owns
//! one shared instance of each for the whole process.

mod arithmetic;
mod collections;
mod control;
mod logic;
mod random;

use std::sync::Arc;

use crate::operator::Operator;

/// One instance of every built-in operator.
pub(crate) fn builtin_operators() -> Vec<Arc<dyn Operator>> {
    vec![
        // Control flow and environment
        Arc::new(control::Seq),
        Arc::new(control::Return),
        Arc::new(control::Set),
        Arc::new(control::Get),
        Arc::new(control::Literal),
        Arc::new(control::Cond),
        // Collections
        Arc::new(collections::Array),
        Arc::new(collections::MapOp("map")),
        Arc::new(collections::MapOp("dict")),
        Arc::new(collections::Index),
        Arc::new(collections::Length),
        Arc::new(collections::Coalesce),
        // Logic
        Arc::new(logic::And),
        Arc::new(logic::Or),
        Arc::new(logic::Not),
        Arc::new(logic::EQUALS),
        Arc::new(logic::GREATER),
        Arc::new(logic::GREATER_EQUAL),
        Arc::new(logic::LESS),
        Arc::new(logic::LESS_EQUAL),
        // Arithmetic
        Arc::new(arithmetic::Sum),
        Arc::new(arithmetic::Product),
        Arc::new(arithmetic::Negative),
        Arc::new(arithmetic::Round),
        Arc::new(arithmetic::Modulo),
        Arc::new(arithmetic::Divide),
        Arc::new(arithmetic::MIN),
        Arc::new(arithmetic::MAX),
        // Randomization
        Arc::new(random::UniformChoice),
        Arc::new(random::BernoulliTrial),
        Arc::new(random::BernoulliFilter),
        Arc::new(random::WeightedChoice),
        Arc::new(random::RandomInteger),
        Arc::new(random::RandomFloat),
        Arc::new(random::Sample),
    ]
}
