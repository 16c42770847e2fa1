//! Model drivers that materialize run directories and input files.

mod forecast;

pub use crate::fs::ExistAction;
pub use forecast::Fv3Forecast;
