use super::ViewTree;
use crate::host::Host;
use crate::view::{Node, ViewType};

impl<H: Host> ViewTree<H> {
    /// Recompute the rendered output of `node` from its declarative input.
    ///
    /// Slots are matched by position: a previous output of the same view
    /// type is updated in place, otherwise a pooled node of the declared type
    /// is reused, otherwise the declaration itself becomes the output.
    /// Previous outputs that do not survive are recycled.
    pub fn render_tree(&mut self, node: &Node) {
        let diagnostics = self.binder.bind(&self.registry, node);
        self.report(diagnostics);

        let declared = self.declared_children(node);
        let previous = node.rendered();

        let mut output = Vec::with_capacity(declared.len());
        for (index, decl) in declared.into_iter().enumerate() {
            let chosen = self.reconcile_one(node, index, decl, &previous);
            output.push(chosen);
        }

        for old in previous {
            if !output.iter().any(|kept| kept.ptr_eq(&old)) {
                self.recycle(old);
            }
        }

        node.borrow_mut().rendered = output;
    }

    /// The declarations feeding this cycle: the layout result if the node
    /// has a layout, else its static children if it is a container.
    fn declared_children(&mut self, node: &Node) -> Vec<Node> {
        let element = {
            let state = node.borrow();
            match &state.layout {
                Some(template) => Some(template(&*state)),
                None => state.view.layout(),
            }
        };
        if let Some(element) = element {
            return vec![self.materialize(element)];
        }

        let state = node.borrow();
        if state.capability.is_container() {
            state.children.clone()
        } else {
            Vec::new()
        }
    }

    fn reconcile_one(&mut self, parent: &Node, index: usize, decl: Node, previous: &[Node]) -> Node {
        if let Some(existing) = previous.get(index) {
            if existing.view_type() == decl.view_type() {
                tracing::trace!(parent = ?parent.id(), index, node = ?existing.id(), "reusing view in place");
                self.update_in_place(existing, &decl);
                return existing.clone();
            }
        }

        let chosen = match self.take_recycled(decl.view_type()) {
            Some(recycled) => {
                if !recycled.ptr_eq(&decl) {
                    let source = decl.borrow();
                    let mut target = recycled.borrow_mut();
                    target.children = source.children.clone();
                    target.props = source.props.clone();
                }
                recycled.borrow_mut().mounted = false;
                recycled
            }
            None => {
                tracing::trace!(parent = ?parent.id(), index, node = ?decl.id(), "rendering fresh view");
                decl
            }
        };
        chosen.borrow_mut().parent = Some(parent.downgrade());
        self.render_tree(&chosen);
        chosen
    }

    /// Move the declaration's children and props onto a reused node and
    /// re-render it unless the view declines.
    fn update_in_place(&mut self, existing: &Node, decl: &Node) {
        let old_props = {
            let mut target = existing.borrow_mut();
            if existing.ptr_eq(decl) {
                target.props.clone()
            } else {
                let source = decl.borrow();
                target.children = source.children.clone();
                std::mem::replace(&mut target.props, source.props.clone())
            }
        };

        self.notify(existing, |observer, state| {
            observer.on_props_updated(state, state.props())
        });

        let rerender = existing.borrow_mut().view.on_props_updated(&old_props);
        if rerender {
            self.render_tree(existing);
        }
    }

    fn recycle(&mut self, node: Node) {
        if self.config.recycle {
            self.pool.recycle(node);
        } else {
            tracing::trace!(node = ?node.id(), "dropping displaced view");
            node.borrow_mut().parent = None;
        }
    }

    fn take_recycled(&mut self, view_type: ViewType) -> Option<Node> {
        if !self.config.recycle {
            return None;
        }
        self.pool.take_for(view_type)
    }
}
