pub mod error;
pub mod objective;
pub mod optimization;

pub use error::{OptimErr, Result};
pub use optimization::{
    DescentOptions, DescentResult, FitOptions, Strategy, fit, fit_with, steepest_descent, step,
};
