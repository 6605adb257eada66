mod mount;
mod reconcile;

use crate::binding::{PropertyBinder, ViewRegistry};
use crate::config::TreeConfig;
use crate::error::{Diagnostic, Result, ViewError};
use crate::host::{Host, LayoutParams, NativeHandle, Navigator};
use crate::observer::ViewObserver;
use crate::pool::RecyclePool;
use crate::view::{Element, Node, NodeId, Props, View, ViewNode, ViewType};

/// One root view tree and everything scoped to it.
///
/// Owns the host, the binding tables and their cache, the recycle pool and
/// the observer list. Rendering is single-threaded and must not be
/// re-entered for the same node while a cycle is in progress.
pub struct ViewTree<H: Host> {
    host: H,
    config: TreeConfig,
    registry: ViewRegistry,
    binder: PropertyBinder,
    pool: RecyclePool,
    observers: Vec<Box<dyn ViewObserver>>,
    context: Option<H::Context>,
    next_id: u32,
}

impl<H: Host> ViewTree<H> {
    pub fn new(host: H, registry: ViewRegistry) -> Self {
        Self::with_config(host, registry, TreeConfig::default())
    }

    pub fn with_config(host: H, registry: ViewRegistry, config: TreeConfig) -> Self {
        Self {
            host,
            config,
            registry,
            binder: PropertyBinder::new(),
            pool: RecyclePool::new(),
            observers: Vec::new(),
            context: None,
            next_id: 0,
        }
    }

    pub fn add_observer(&mut self, observer: impl ViewObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn pool(&self) -> &RecyclePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut RecyclePool {
        &mut self.pool
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Create a node and run `init` against it to declare its children
    pub fn create<V: View>(
        &mut self,
        view: V,
        props: Props,
        init: impl FnOnce(&mut Self, &Node),
    ) -> Node {
        let id = self.next_id();
        let node = Node::new(ViewNode::new(id, ViewType::of::<V>(), Box::new(view), props));
        init(self, &node);
        node
    }

    /// Create a node and append it to `parent`'s declared children
    pub fn create_child<V: View>(
        &mut self,
        parent: &Node,
        view: V,
        props: Props,
        init: impl FnOnce(&mut Self, &Node),
    ) -> Node {
        let child = self.create(view, props, init);
        parent.add_child(child.clone());
        child
    }

    /// Turn a declarative element into a fresh, unrendered node
    pub fn materialize(&mut self, element: Element) -> Node {
        let Element {
            view_type,
            view,
            props,
            children,
            layout,
        } = element;
        let id = self.next_id();
        let node = Node::new(ViewNode::new(id, view_type, view, props));
        let children: Vec<Node> = children
            .into_iter()
            .map(|child| self.materialize(child))
            .collect();
        {
            let mut state = node.borrow_mut();
            state.children = children;
            state.layout = layout;
        }
        node
    }

    /// Render `node` and mount it onto the native tree.
    ///
    /// The context is kept for later [`ViewTree::notify_state_changed`] calls.
    pub fn build_native_tree(
        &mut self,
        node: &Node,
        cx: H::Context,
        layout_params: Option<LayoutParams>,
    ) -> Result<NativeHandle> {
        self.context = Some(cx.clone());
        self.render_tree(node);
        self.mount(node, &cx, layout_params)
    }

    /// Re-render and remount an already built node after its state changed.
    ///
    /// Uses the tree's host context and the layout params of the node's
    /// current effective handle.
    pub fn notify_state_changed(&mut self, node: &Node) -> Result<NativeHandle> {
        let cx = self.context.clone().ok_or(ViewError::NotBuilt(node.id()))?;
        // read before rendering, the render may hand the handle to a new owner
        let layout_params = node.effective_layout_params();
        self.render_tree(node);
        let handle = self.mount(node, &cx, layout_params)?;
        self.notify(node, |observer, state| observer.on_view_rendered(state));
        Ok(handle)
    }

    /// Copy `node` with its props and recursively copied children.
    ///
    /// Requires the view type to be registered as constructible.
    pub fn copy(&mut self, node: &Node) -> Result<Node> {
        let (view_type, props, children, layout) = {
            let state = node.borrow();
            (
                state.view_type,
                state.props.clone(),
                state.children.clone(),
                state.layout.clone(),
            )
        };
        let view = self
            .registry
            .construct(view_type)
            .ok_or(ViewError::NotConstructible(view_type.name()))?;
        let children = children
            .iter()
            .map(|child| self.copy(child))
            .collect::<Result<Vec<_>>>()?;

        let id = self.next_id();
        let copy = Node::new(ViewNode::new(id, view_type, view, props));
        {
            let mut state = copy.borrow_mut();
            state.children = children;
            state.layout = layout;
        }
        Ok(copy)
    }

    /// Ask the navigator to present `node` on a new screen, launched from
    /// `caller`'s native view
    pub fn show(&self, node: &Node, caller: &Node, navigator: &mut dyn Navigator) -> Result<()> {
        let handle = caller.effective_handle()?;
        tracing::debug!(node = ?node.id(), caller = ?caller.id(), "showing view on new screen");
        navigator.show(&handle, node.clone());
        Ok(())
    }

    pub(crate) fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn notify(&mut self, node: &Node, mut f: impl FnMut(&mut dyn ViewObserver, &ViewNode)) {
        if self.observers.is_empty() {
            return;
        }
        let state = node.borrow();
        for observer in &mut self.observers {
            f(observer.as_mut(), &*state);
        }
    }

    pub(crate) fn report(&mut self, diagnostics: Vec<Diagnostic>) {
        for diagnostic in diagnostics {
            tracing::warn!("{}", diagnostic);
            for observer in &mut self.observers {
                observer.on_diagnostic(&diagnostic);
            }
        }
    }
}
