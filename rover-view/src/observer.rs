use crate::error::Diagnostic;
use crate::view::{Props, ViewNode};

/// Listener for render and mount lifecycle events of a view tree.
///
/// Within one render + mount cycle the hooks fire in this relative order:
/// props updated, will mount, mounted, rendered.
pub trait ViewObserver {
    fn on_view_will_mount(&mut self, _node: &ViewNode) {}

    fn on_view_mounted(&mut self, _node: &ViewNode) {}

    /// A reused node received new props (`new_props` is already installed)
    fn on_props_updated(&mut self, _node: &ViewNode, _new_props: &Props) {}

    /// A re-render requested through `notify_state_changed` completed
    fn on_view_rendered(&mut self, _node: &ViewNode) {}

    fn on_diagnostic(&mut self, _diagnostic: &Diagnostic) {}
}
