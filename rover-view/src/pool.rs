use crate::view::{Node, ViewType};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Type-keyed store of detached nodes awaiting reuse.
///
/// Unbounded: nothing is evicted until [`RecyclePool::clear`] or the owning
/// tree is dropped.
pub struct RecyclePool {
    entries: HashMap<ViewType, SmallVec<[Node; 2]>>,
    len: usize,
}

impl RecyclePool {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            len: 0,
        }
    }

    /// Detach a node and keep it for reuse.
    ///
    /// The node's own rendered output is left as is; it is reconciled again
    /// if the node is reused.
    pub fn recycle(&mut self, node: Node) {
        let view_type = node.view_type();
        let slot = self.entries.entry(view_type).or_default();
        if slot.iter().any(|pooled| pooled.ptr_eq(&node)) {
            return;
        }
        node.borrow_mut().parent = None;
        tracing::debug!(node = ?node.id(), view = %view_type, "recycled view");
        slot.push(node);
        self.len += 1;
    }

    /// Take a pooled node of the given type, most recently recycled first
    pub fn take_for(&mut self, view_type: ViewType) -> Option<Node> {
        let slot = self.entries.get_mut(&view_type)?;
        let node = slot.pop()?;
        if slot.is_empty() {
            self.entries.remove(&view_type);
        }
        self.len -= 1;
        tracing::debug!(node = ?node.id(), view = %view_type, "reusing recycled view");
        Some(node)
    }

    pub fn count_for(&self, view_type: ViewType) -> usize {
        self.entries.get(&view_type).map_or(0, |slot| slot.len())
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.entries
            .get(&node.view_type())
            .is_some_and(|slot| slot.iter().any(|pooled| pooled.ptr_eq(node)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Release every pooled node
    pub fn clear(&mut self) {
        self.entries.clear();
        self.len = 0;
    }
}

impl Default for RecyclePool {
    fn default() -> Self {
        Self::new()
    }
}
