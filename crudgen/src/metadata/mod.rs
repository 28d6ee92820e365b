//! Schema metadata: model types and the providers that produce them

mod model;
#[cfg(feature = "mysql")]
mod mysql;
mod provider;
mod snapshot;

pub use model::*;
#[cfg(feature = "mysql")]
pub use mysql::*;
pub use provider::*;
pub use snapshot::*;
