use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while building an engine.
///
/// Every variant describes a configuration mistake. Inference itself never
/// fails once an engine has been built.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("invalid universe: {reason}")]
    InvalidUniverse { reason: String },

    #[error("invalid {shape} parameters {params:?}: {reason}")]
    InvalidShape {
        shape: &'static str,
        params: Vec<f64>,
        reason: &'static str,
    },

    #[error("membership degree {value} at sample {index} is outside [0, 1]")]
    InvalidDegree { index: usize, value: f64 },

    #[error("singleton at {value} does not fall on any sample of variable `{variable}`")]
    SingletonOffGrid { variable: String, value: f64 },

    #[error("term `{term}` of variable `{variable}` has {actual} samples, universe has {expected}")]
    LengthMismatch {
        variable: String,
        term: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("term `{term}` is already defined on variable `{variable}`")]
    DuplicateTerm { variable: String, term: &'static str },

    #[error("rule #{rule} references term `{term}`, which is not defined on variable `{variable}`")]
    UnknownTerm {
        rule: usize,
        variable: String,
        term: &'static str,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
