pub mod stub;

pub use stub::{StubHost, StubWidget};

use crate::view::{Node, ViewNode};
use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    MatchParent,
    WrapContent,
    Px(u32),
}

/// Size request attached to a native handle when it is first mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    pub width: Dimension,
    pub height: Dimension,
}

impl LayoutParams {
    pub fn new(width: Dimension, height: Dimension) -> Self {
        Self { width, height }
    }

    pub fn match_parent() -> Self {
        Self::new(Dimension::MatchParent, Dimension::MatchParent)
    }

    pub fn wrap_content() -> Self {
        Self::new(Dimension::WrapContent, Dimension::WrapContent)
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::match_parent()
    }
}

/// Opaque platform view created by a [`Host`]. Equality is identity.
#[derive(Clone)]
pub struct NativeHandle(Rc<dyn Any>);

impl NativeHandle {
    pub fn new<T: Any>(widget: T) -> Self {
        Self(Rc::new(widget))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    /// Type of the wrapped platform view
    pub fn payload_type(&self) -> TypeId {
        Any::type_id(&*self.0)
    }

    pub fn ptr_eq(&self, other: &NativeHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for NativeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeHandle({:p})", Rc::as_ptr(&self.0))
    }
}

/// Platform-specific native view toolkit
///
/// Implementations create platform views for leaf and container nodes
/// and assemble them into the native hierarchy.
pub trait Host {
    /// Platform state needed to create views (activity, window, screen)
    type Context: Clone;

    /// Create the native view for a leaf or container node
    fn create_handle(&mut self, node: &ViewNode, cx: &Self::Context) -> NativeHandle;

    /// Attach a child view into a container view.
    ///
    /// Called on every mount traversal, so implementations must tolerate a
    /// child that is already attached to `parent`.
    fn attach_child(&mut self, parent: &NativeHandle, child: &NativeHandle);

    /// Called once per handle, when it receives its first layout params
    fn apply_layout_params(&mut self, _handle: &NativeHandle, _params: &LayoutParams) {}

    fn default_layout_params(&self) -> LayoutParams {
        LayoutParams::match_parent()
    }
}

/// Screen-level navigation shell
pub trait Navigator {
    /// Present `node` on a new screen, launched from the `caller` view
    fn show(&mut self, caller: &NativeHandle, node: Node);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_handle_identity() {
        let a = NativeHandle::new(1u32);
        let b = NativeHandle::new(1u32);

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_native_handle_payload() {
        let handle = NativeHandle::new(String::from("button"));

        assert!(handle.is::<String>());
        assert_eq!(handle.payload_type(), TypeId::of::<String>());
        assert_eq!(handle.downcast_ref::<String>().map(String::as_str), Some("button"));
        assert!(handle.downcast_ref::<u32>().is_none());
    }

    #[test]
    fn test_default_layout_params_match_parent() {
        let params = LayoutParams::default();
        assert_eq!(params.width, Dimension::MatchParent);
        assert_eq!(params.height, Dimension::MatchParent);
    }
}
