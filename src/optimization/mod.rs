mod least_squares;
mod steepest;
mod strategy;

pub use least_squares::{FitOptions, fit, fit_with, step};
pub use steepest::{DescentOptions, DescentResult, steepest_descent};
pub use strategy::Strategy;
