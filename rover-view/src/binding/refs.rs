use super::registry::{RefTarget, RefValue, ViewRegistry};
use crate::error::Diagnostic;
use crate::view::{Node, PropKey};

/// Prop naming the owner field a descendant should be assigned to
pub const REF_PROP: &str = "ref";

/// Wire the `ref` props of `owner`'s rendered subtree onto fields of
/// `owner`'s own view type.
///
/// Descendants are visited depth-first in declared order, so a later
/// descendant naming the same field wins. A field accepting the descendant's
/// type receives the node; a handle field receives the descendant's
/// effective native handle if its platform type matches. Owners without ref
/// fields resolve and report nothing.
pub fn resolve_refs(registry: &ViewRegistry, owner: &Node) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let (owner_id, owner_type) = {
        let node = owner.borrow();
        (node.id(), node.view_type())
    };
    if !registry.has_refs(owner_type) {
        return diagnostics;
    }

    let mut stack: Vec<Node> = owner.rendered().into_iter().rev().collect();
    while let Some(descendant) = stack.pop() {
        let (name, target_type, target_id) = {
            let node = descendant.borrow();
            stack.extend(node.rendered().iter().rev().cloned());
            let name: Option<PropKey> = node
                .prop(REF_PROP)
                .and_then(|value| value.as_str())
                .map(Into::into);
            (name, node.view_type(), node.id())
        };
        let Some(name) = name else {
            continue;
        };

        let value = registry
            .ref_field(owner_type, &name)
            .and_then(|field| match field.target() {
                RefTarget::AnyView => Some((field, RefValue::View(descendant.clone()))),
                RefTarget::View(accepted) if registry.is_a(target_type, accepted) => {
                    Some((field, RefValue::View(descendant.clone())))
                }
                RefTarget::View(_) => None,
                RefTarget::Handle(platform) => descendant
                    .effective_handle()
                    .ok()
                    .filter(|handle| handle.payload_type() == platform)
                    .map(|handle| (field, RefValue::Handle(handle))),
            });

        match value {
            Some((field, value)) => {
                tracing::trace!(owner = ?owner_id, target = ?target_id, %name, "resolved ref");
                field.assign(&mut *owner.borrow_mut().view, value);
            }
            None => diagnostics.push(Diagnostic::ReferenceUnresolved {
                owner: owner_id,
                view: owner_type.name(),
                target: target_id,
                name,
            }),
        }
    }

    diagnostics
}
