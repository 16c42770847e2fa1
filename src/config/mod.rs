//! The layered configuration object model.
//!
//! A [`Config`] is an ordered, format-agnostic tree bound to one
//! [`FileType`]. It is loaded from a file, mutated in place by
//! [`Config::update_values`] and [`Config::dereference_all`], and consumed by
//! [`Config::dump_file`].

mod dereference;
mod inspect;
mod merge;
mod model;
pub mod types;
pub mod value;

#[cfg(test)]
mod tests;

// Re-export public API
pub use dereference::{UnresolvedPolicy, has_reference};
pub use inspect::{Difference, ValuesReport};
pub use merge::deep_merge;
pub use model::Config;
pub use types::FileType;
pub use value::{Tree, Value, get_path};
