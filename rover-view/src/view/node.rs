use super::element::LayoutTemplate;
use super::props::{PropKey, PropValue, Props};
use super::{Capability, View, ViewType};
use crate::error::{Result, ViewError};
use crate::host::{LayoutParams, NativeHandle};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Unique identifier for a node within a view tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// One declarative unit of the view tree together with its rendered state
pub struct ViewNode {
    pub(crate) id: NodeId,
    pub(crate) view_type: ViewType,
    pub(crate) capability: Capability,
    pub(crate) view: Box<dyn View>,
    pub(crate) props: Props,
    pub(crate) children: Vec<Node>,
    pub(crate) layout: Option<LayoutTemplate>,
    pub(crate) rendered: Vec<Node>,
    pub(crate) handle: Option<NativeHandle>,
    pub(crate) layout_params: Option<LayoutParams>,
    pub(crate) parent: Option<WeakNode>,
    pub(crate) mounted: bool,
    pub(crate) scratch: HashMap<PropKey, PropValue>,
}

impl ViewNode {
    pub(crate) fn new(id: NodeId, view_type: ViewType, view: Box<dyn View>, props: Props) -> Self {
        let capability = view.capability();
        Self {
            id,
            view_type,
            capability,
            view,
            props,
            children: Vec::new(),
            layout: None,
            rendered: Vec::new(),
            handle: None,
            layout_params: None,
            parent: None,
            mounted: false,
            scratch: HashMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn view(&self) -> &dyn View {
        self.view.as_ref()
    }

    /// Downcast the view to its concrete type
    pub fn view_as<V: View>(&self) -> Option<&V> {
        self.view.as_ref().downcast_ref::<V>()
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn prop(&self, key: &str) -> Option<&PropValue> {
        self.props.get(key)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn rendered(&self) -> &[Node] {
        &self.rendered
    }

    /// Handle owned by this node, not following delegation
    pub fn handle(&self) -> Option<&NativeHandle> {
        self.handle.as_ref()
    }

    pub fn layout_params(&self) -> Option<&LayoutParams> {
        self.layout_params.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn has_layout_template(&self) -> bool {
        self.layout.is_some()
    }
}

impl fmt::Debug for ViewNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewNode")
            .field("id", &self.id)
            .field("view_type", &self.view_type)
            .field("capability", &self.capability)
            .field("props", &self.props.keys().collect::<Vec<_>>())
            .field("children", &self.children)
            .field("rendered", &self.rendered)
            .field("mounted", &self.mounted)
            .finish()
    }
}

/// Shared reference to a [`ViewNode`]. Equality is identity.
#[derive(Clone)]
pub struct Node(Rc<RefCell<ViewNode>>);

/// Non-owning back-reference to a [`Node`]
#[derive(Clone)]
pub struct WeakNode(Weak<RefCell<ViewNode>>);

impl WeakNode {
    pub fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(Node)
    }
}

impl Node {
    pub(crate) fn new(node: ViewNode) -> Self {
        Self(Rc::new(RefCell::new(node)))
    }

    pub fn borrow(&self) -> Ref<'_, ViewNode> {
        self.0.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, ViewNode> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.0))
    }

    pub fn id(&self) -> NodeId {
        self.borrow().id
    }

    pub fn view_type(&self) -> ViewType {
        self.borrow().view_type
    }

    pub fn is_mounted(&self) -> bool {
        self.borrow().mounted
    }

    pub fn parent(&self) -> Option<Node> {
        self.borrow().parent.as_ref().and_then(WeakNode::upgrade)
    }

    pub fn children(&self) -> Vec<Node> {
        self.borrow().children.clone()
    }

    pub fn rendered(&self) -> Vec<Node> {
        self.borrow().rendered.clone()
    }

    pub fn prop(&self, key: &str) -> Option<PropValue> {
        self.borrow().props.get(key).cloned()
    }

    /// The integer `id` prop, if declared
    pub fn id_prop(&self) -> Option<i64> {
        self.borrow().props.get("id").and_then(PropValue::as_int)
    }

    /// Append a declared child. Takes effect on the next render.
    pub fn add_child(&self, child: Node) {
        self.borrow_mut().children.push(child);
    }

    /// Set a declared prop. Takes effect on the next render.
    pub fn set_prop(&self, key: impl Into<PropKey>, value: impl Into<PropValue>) {
        self.borrow_mut().props.insert(key.into(), value.into());
    }

    pub fn remove_prop(&self, key: &str) -> Option<PropValue> {
        self.borrow_mut().props.remove(key)
    }

    /// Replace the node-level layout template
    pub fn set_layout(&self, template: LayoutTemplate) {
        self.borrow_mut().layout = Some(template);
    }

    pub fn data(&self, key: &str) -> Option<PropValue> {
        self.borrow().scratch.get(key).cloned()
    }

    /// Store node-local data and return the stored value
    pub fn put_data(&self, key: impl Into<PropKey>, value: impl Into<PropValue>) -> PropValue {
        let value = value.into();
        self.borrow_mut().scratch.insert(key.into(), value.clone());
        value
    }

    /// Read node-local data, storing `default` first if the key is absent
    pub fn data_or_put(&self, key: impl Into<PropKey>, default: impl Into<PropValue>) -> PropValue {
        self.borrow_mut()
            .scratch
            .entry(key.into())
            .or_insert_with(|| default.into())
            .clone()
    }

    pub fn with_view<V: View, R>(&self, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.borrow().view_as::<V>().map(f)
    }

    pub fn with_view_mut<V: View, R>(&self, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        self.borrow_mut().view.as_mut().downcast_mut::<V>().map(f)
    }

    /// Native handle of this node, following `rendered[0]` through
    /// pass-through nodes until a handle owner is found.
    pub fn effective_handle(&self) -> Result<NativeHandle> {
        let mut current = self.clone();
        loop {
            let next = {
                let node = current.borrow();
                if let Some(handle) = &node.handle {
                    return Ok(handle.clone());
                }
                match node.rendered.first() {
                    Some(next) => next.clone(),
                    None => {
                        return Err(ViewError::EmptyPassThrough {
                            node: node.id,
                            view: node.view_type.name(),
                        });
                    }
                }
            };
            current = next;
        }
    }

    /// Layout params of the effective handle owner
    pub fn effective_layout_params(&self) -> Option<LayoutParams> {
        let mut current = self.clone();
        loop {
            let next = {
                let node = current.borrow();
                if node.handle.is_some() {
                    return node.layout_params;
                }
                node.rendered.first()?.clone()
            };
            current = next;
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(node) => write!(f, "Node({:?} {})", node.id, node.view_type),
            Err(_) => f.write_str("Node(<borrowed>)"),
        }
    }
}
