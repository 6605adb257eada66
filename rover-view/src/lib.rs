pub mod binding;
pub mod config;
pub mod error;
pub mod host;
pub mod observer;
pub mod pool;
pub mod tree;
pub mod view;

// Re-export key types
pub use binding::{ClassBuilder, PropertyBinder, RefTarget, RefValue, ViewRegistry};
pub use config::TreeConfig;
pub use error::{Diagnostic, Result, ViewError};
pub use host::{Dimension, Host, LayoutParams, NativeHandle, Navigator, StubHost, StubWidget};
pub use observer::ViewObserver;
pub use pool::RecyclePool;
pub use tree::ViewTree;
pub use view::{
    Callback, Capability, Element, FromProp, LayoutTemplate, Node, NodeId, PropKey, PropValue,
    Props, View, ViewNode, ViewType, WeakNode,
};

/// Build a [`Props`] map from `key => value` pairs
#[macro_export]
macro_rules! props {
    () => {
        $crate::Props::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut props = $crate::Props::new();
        $(props.insert($crate::PropKey::from($key), $crate::PropValue::from($value));)+
        props
    }};
}
