mod element;
mod node;
mod props;

pub use element::{Element, LayoutTemplate};
pub use node::{Node, NodeId, ViewNode, WeakNode};
pub use props::{Callback, FromProp, PropKey, PropValue, Props};

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// How a view takes part in the native tree.
///
/// Assigned once when the node is constructed, from [`View::capability`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Owns a native handle with no native children
    Leaf,
    /// Owns a native handle and attaches its rendered children into it
    Container,
    /// Has no handle of its own, delegates to its single rendered child
    PassThrough,
}

impl Capability {
    /// Whether nodes with this capability own a native handle
    pub fn is_native(self) -> bool {
        !matches!(self, Capability::PassThrough)
    }

    /// Whether the static children list feeds reconciliation
    pub fn is_container(self) -> bool {
        matches!(self, Capability::Container)
    }
}

/// Concrete kind of a view, used as the reuse and pool key.
#[derive(Clone, Copy)]
pub struct ViewType {
    id: TypeId,
    name: &'static str,
}

impl ViewType {
    pub fn of<V: Any>() -> Self {
        Self {
            id: TypeId::of::<V>(),
            name: std::any::type_name::<V>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full type path, as reported by `std::any::type_name`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for ViewType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ViewType {}

impl Hash for ViewType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Upcast helper so `dyn View` can be downcast to its concrete type
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A declarative view.
///
/// Implementors hold the typed fields that props and refs are bound onto
/// (see [`crate::binding::ViewRegistry`]). The default implementation is a
/// pass-through view with no layout that always re-renders on prop updates.
pub trait View: AsAny + 'static {
    fn capability(&self) -> Capability {
        Capability::PassThrough
    }

    /// Produce the single element this view renders as.
    ///
    /// Called after props are bound, so fields reflect the current props.
    fn layout(&self) -> Option<Element> {
        None
    }

    /// Called when a reconciliation reuses this view with new props.
    /// Returning false skips re-rendering its subtree.
    fn on_props_updated(&mut self, _old_props: &Props) -> bool {
        true
    }

    fn on_view_will_mount(&mut self) {}

    fn on_view_mounted(&mut self) {}

    /// The embedded base view, if this view extends another one.
    ///
    /// Field bindings declared on a base class are applied through this.
    fn base_mut(&mut self) -> Option<&mut dyn View> {
        None
    }
}

impl dyn View {
    pub fn is<V: View>(&self) -> bool {
        self.as_any().is::<V>()
    }

    pub fn downcast_ref<V: View>(&self) -> Option<&V> {
        self.as_any().downcast_ref::<V>()
    }

    pub fn downcast_mut<V: View>(&mut self) -> Option<&mut V> {
        self.as_any_mut().downcast_mut::<V>()
    }
}

/// Find `V` in the view itself or along its chain of base views
pub(crate) fn find_in_chain<V: View>(view: &mut dyn View) -> Option<&mut V> {
    if view.is::<V>() {
        return view.downcast_mut::<V>();
    }
    view.base_mut().and_then(find_in_chain::<V>)
}
