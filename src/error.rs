use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, OptimErr>;

/// The crate's error type.
///
/// All variants are programmer or input errors; none of them is transient,
/// so callers are not expected to retry.
#[derive(Debug)]
pub enum OptimErr {
    /// Two operands have incompatible dimensions.
    DimMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },

    /// A configuration value is outside its valid range.
    InvalidConfig(&'static str),

    /// An input is invalid for domain reasons (e.g. an empty dataset).
    InvalidInput(&'static str),
}

impl Display for OptimErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimErr::DimMismatch {
                a,
                b,
                got,
                expected,
            } => {
                write!(
                    f,
                    "dimension mismatch between {a} and {b}: got {got}, expected {expected}"
                )
            }
            OptimErr::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            OptimErr::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl Error for OptimErr {}
