//! Configuration for crudgen

pub mod defaults;
mod settings;

pub use settings::*;
