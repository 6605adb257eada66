mod binder;
mod refs;
mod registry;

pub use binder::{BindingTable, PropertyBinder};
pub use refs::{REF_PROP, resolve_refs};
pub use registry::{ClassBuilder, PropField, RefField, RefTarget, RefValue, ViewRegistry};
