use super::node::ViewNode;
use super::props::{PropKey, PropValue, Props};
use super::{View, ViewType};
use std::fmt;
use std::rc::Rc;

/// Node-level layout producer. Receives the node after its props are bound.
pub type LayoutTemplate = Rc<dyn Fn(&ViewNode) -> Element>;

/// Declarative description of a node that is not part of a tree yet.
///
/// Layout templates return elements; the tree materializes them into nodes
/// before reconciling them against the previous output.
pub struct Element {
    pub(crate) view_type: ViewType,
    pub(crate) view: Box<dyn View>,
    pub(crate) props: Props,
    pub(crate) children: Vec<Element>,
    pub(crate) layout: Option<LayoutTemplate>,
}

impl Element {
    pub fn new<V: View>(view: V) -> Self {
        Self {
            view_type: ViewType::of::<V>(),
            view: Box::new(view),
            props: Props::new(),
            children: Vec::new(),
            layout: None,
        }
    }

    pub fn prop(mut self, key: impl Into<PropKey>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn props(mut self, props: Props) -> Self {
        self.props.extend(props);
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn layout(mut self, template: impl Fn(&ViewNode) -> Element + 'static) -> Self {
        self.layout = Some(Rc::new(template));
        self
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("view_type", &self.view_type)
            .field("props", &self.props)
            .field("children", &self.children)
            .finish()
    }
}
