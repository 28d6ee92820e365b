//! Code generation module

mod business_layer;
mod data_layer;
mod fragment;
mod mode;
mod naming;
mod orchestrator;
mod type_mapper;

pub use business_layer::*;
pub use data_layer::*;
pub use fragment::*;
pub use mode::*;
pub use naming::*;
pub use orchestrator::*;
pub use type_mapper::*;

use tracing::debug;

use crate::metadata::{MetadataProvider, ParameterMetadata};

/// Fetch a routine's parameters, noting the routine in `failed` when the fetch
/// failed. A failed fetch is used exactly like an empty parameter list.
pub(crate) async fn fetch_parameters(
    provider: &dyn MetadataProvider,
    routine: &str,
    failed: &mut Vec<String>,
) -> Vec<ParameterMetadata> {
    let result = provider.list_parameters(routine).await;
    if result.is_failed() {
        failed.push(routine.to_string());
    }
    debug!("{}: {} parameters", routine, result.len());
    result.rows
}

/// Parameters an insert passes in; OUT and INOUT are returned by the store
pub(crate) fn insert_parameters(params: &[ParameterMetadata]) -> Vec<&ParameterMetadata> {
    params.iter().filter(|p| !p.direction.is_output()).collect()
}
