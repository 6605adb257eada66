use super::{Host, LayoutParams, NativeHandle};
use crate::view::ViewNode;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Native view produced by [`StubHost`]
#[derive(Debug)]
pub struct StubWidget {
    pub id: u32,
    pub view: &'static str,
    children: RefCell<Vec<u32>>,
    layout_params: Cell<Option<LayoutParams>>,
}

impl StubWidget {
    /// Ids of attached child widgets, in attach order
    pub fn children(&self) -> Vec<u32> {
        self.children.borrow().clone()
    }

    pub fn layout_params(&self) -> Option<LayoutParams> {
        self.layout_params.get()
    }
}

/// Debug/testing host that records native operations
///
/// Widgets are plain [`StubWidget`] values; every operation is appended to
/// an optional log buffer so tests can assert on the native side effects.
pub struct StubHost {
    next_id: u32,
    created: usize,
    log_buffer: Option<Rc<RefCell<Vec<String>>>>,
}

impl StubHost {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            created: 0,
            log_buffer: None,
        }
    }

    /// Create a StubHost with a log buffer for testing
    pub fn with_buffer(buffer: Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            log_buffer: Some(buffer),
            ..Self::new()
        }
    }

    /// Number of widgets created so far
    pub fn created(&self) -> usize {
        self.created
    }

    fn log(&self, msg: String) {
        tracing::trace!(target: "rover_view::stub", "{}", msg);
        if let Some(buffer) = &self.log_buffer {
            buffer.borrow_mut().push(msg);
        }
    }
}

impl Default for StubHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for StubHost {
    type Context = ();

    fn create_handle(&mut self, node: &ViewNode, _cx: &()) -> NativeHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.created += 1;
        let view = node.view_type().short_name();
        self.log(format!("create {} #{}", view, id));
        NativeHandle::new(StubWidget {
            id,
            view,
            children: RefCell::new(Vec::new()),
            layout_params: Cell::new(None),
        })
    }

    fn attach_child(&mut self, parent: &NativeHandle, child: &NativeHandle) {
        let (Some(parent), Some(child)) = (
            parent.downcast_ref::<StubWidget>(),
            child.downcast_ref::<StubWidget>(),
        ) else {
            return;
        };
        let mut children = parent.children.borrow_mut();
        if children.contains(&child.id) {
            return;
        }
        children.push(child.id);
        drop(children);
        self.log(format!("attach #{} -> #{}", child.id, parent.id));
    }

    fn apply_layout_params(&mut self, handle: &NativeHandle, params: &LayoutParams) {
        if let Some(widget) = handle.downcast_ref::<StubWidget>() {
            widget.layout_params.set(Some(*params));
            self.log(format!(
                "layout #{} {:?} x {:?}",
                widget.id, params.width, params.height
            ));
        }
    }
}
