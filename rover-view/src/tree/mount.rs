use super::ViewTree;
use crate::binding::resolve_refs;
use crate::error::{Result, ViewError};
use crate::host::{Host, LayoutParams, NativeHandle};
use crate::view::{Capability, Node};

impl<H: Host> ViewTree<H> {
    /// Mirror the rendered tree under `node` onto the native tree and
    /// return `node`'s effective handle.
    ///
    /// Existing handles are never recreated; container children are
    /// re-attached on every traversal. First-mount hooks and ref resolution
    /// run once per node, again only after the node is reused from the pool.
    pub fn mount(
        &mut self,
        node: &Node,
        cx: &H::Context,
        layout_params: Option<LayoutParams>,
    ) -> Result<NativeHandle> {
        let first_mount = !node.is_mounted();
        if first_mount {
            self.notify(node, |observer, state| observer.on_view_will_mount(state));
            node.borrow_mut().view.on_view_will_mount();
        }

        let capability = node.borrow().capability();
        let handle = match capability {
            Capability::Leaf | Capability::Container => {
                self.mount_native(node, cx, layout_params, capability)?
            }
            Capability::PassThrough => {
                let delegate = node.borrow().rendered().first().cloned();
                let Some(delegate) = delegate else {
                    let state = node.borrow();
                    return Err(ViewError::EmptyPassThrough {
                        node: state.id(),
                        view: state.view_type().name(),
                    });
                };
                self.mount(&delegate, cx, layout_params)?
            }
        };

        if first_mount {
            self.finish_first_mount(node);
        }
        Ok(handle)
    }

    fn mount_native(
        &mut self,
        node: &Node,
        cx: &H::Context,
        layout_params: Option<LayoutParams>,
        capability: Capability,
    ) -> Result<NativeHandle> {
        let existing = node.borrow().handle().cloned();
        let handle = match existing {
            Some(handle) => handle,
            None => {
                let handle = self.host.create_handle(&node.borrow(), cx);
                tracing::debug!(node = ?node.id(), view = %node.view_type(), "created native handle");
                node.borrow_mut().handle = Some(handle.clone());
                handle
            }
        };

        if node.borrow().layout_params().is_none() {
            let params = layout_params.unwrap_or_else(|| self.host.default_layout_params());
            self.host.apply_layout_params(&handle, &params);
            node.borrow_mut().layout_params = Some(params);
        }

        if capability.is_container() {
            for child in node.rendered() {
                let child_handle = self.mount(&child, cx, None)?;
                self.host.attach_child(&handle, &child_handle);
            }
        }

        Ok(handle)
    }

    fn finish_first_mount(&mut self, node: &Node) {
        node.borrow_mut().mounted = true;
        tracing::debug!(node = ?node.id(), view = %node.view_type(), "view mounted");

        let diagnostics = resolve_refs(&self.registry, node);
        self.report(diagnostics);

        self.notify(node, |observer, state| observer.on_view_mounted(state));
        node.borrow_mut().view.on_view_mounted();
    }
}
