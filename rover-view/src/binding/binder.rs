use super::registry::{PropField, ViewRegistry};
use crate::error::Diagnostic;
use crate::view::{Node, ViewType};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::rc::Rc;

/// Resolved prop fields of one view type, in discovery order
pub type BindingTable = SmallVec<[PropField; 8]>;

/// Binds declared props onto typed view fields.
///
/// Field tables are discovered once per view type and cached.
pub struct PropertyBinder {
    cache: HashMap<ViewType, Rc<BindingTable>>,
}

impl PropertyBinder {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Fields bound for `view_type`, walking its base chain from most
    /// derived to least derived. The first field found for a prop name wins.
    pub fn fields(&mut self, registry: &ViewRegistry, view_type: ViewType) -> Rc<BindingTable> {
        if let Some(table) = self.cache.get(&view_type) {
            return table.clone();
        }

        let mut table = BindingTable::new();
        for class in registry.chain(view_type) {
            for field in &class.props {
                if table.iter().any(|known| known.prop_name() == field.prop_name()) {
                    continue;
                }
                table.push(field.clone());
            }
        }
        tracing::debug!(
            view = %view_type,
            fields = table.len(),
            "discovered prop fields"
        );

        let table = Rc::new(table);
        self.cache.insert(view_type, table.clone());
        table
    }

    /// Bind the node's props onto its view.
    ///
    /// Fields whose prop is absent are cleared first, then every present prop
    /// is assigned. Values that do not fit their field leave it unchanged and
    /// produce a diagnostic. Never fails.
    pub fn bind(&mut self, registry: &ViewRegistry, node: &Node) -> Vec<Diagnostic> {
        let view_type = node.view_type();
        let table = self.fields(registry, view_type);
        let mut diagnostics = Vec::new();
        if table.is_empty() {
            return diagnostics;
        }

        let mut guard = node.borrow_mut();
        let state = &mut *guard;
        let view = &mut *state.view;

        for field in table.iter() {
            if !state.props.contains_key(field.prop_name()) {
                field.clear(view);
            }
        }

        for (key, value) in &state.props {
            let Some(field) = table.iter().find(|field| field.prop_name() == key.as_str()) else {
                continue;
            };
            if !field.set(view, value) {
                diagnostics.push(Diagnostic::BindingMismatch {
                    node: state.id,
                    view: view_type.name(),
                    prop: key.clone(),
                    expected: field.expected(),
                    found: value.kind_name(),
                });
            }
        }

        diagnostics
    }

    /// Number of view types with a cached field table
    pub fn cached_types(&self) -> usize {
        self.cache.len()
    }
}

impl Default for PropertyBinder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Callback, NodeId, PropValue, Props, View, ViewNode};

    #[derive(Default)]
    struct Field {
        enabled: Option<bool>,
        label: Option<String>,
    }

    impl View for Field {}

    #[derive(Default)]
    struct Form {
        field: Field,
        label: Option<i64>,
        on_submit: Option<Callback>,
    }

    impl View for Form {
        fn base_mut(&mut self) -> Option<&mut dyn View> {
            Some(&mut self.field)
        }
    }

    fn registry() -> ViewRegistry {
        let mut registry = ViewRegistry::new();
        registry
            .register::<Field>()
            .prop("enabled", |f| &mut f.enabled)
            .prop("label", |f| &mut f.label);
        registry
            .register::<Form>()
            .extends::<Field>()
            .prop("label", |f| &mut f.label)
            .prop_as("onSubmit", "on_submit", |f| &mut f.on_submit);
        registry
    }

    fn form(props: Props) -> Node {
        Node::new(ViewNode::new(
            NodeId(0),
            ViewType::of::<Form>(),
            Box::new(Form::default()),
            props,
        ))
    }

    #[test]
    fn test_derived_field_shadows_base() {
        let registry = registry();
        let mut binder = PropertyBinder::new();

        let table = binder.fields(&registry, ViewType::of::<Form>());
        let names: Vec<_> = table.iter().map(|f| f.prop_name().to_string()).collect();

        assert_eq!(names, vec!["label", "onSubmit", "enabled"]);
        assert_eq!(table[0].expected(), "i64");
    }

    #[test]
    fn test_fields_are_cached_per_type() {
        let registry = registry();
        let mut binder = PropertyBinder::new();

        let first = binder.fields(&registry, ViewType::of::<Form>());
        let second = binder.fields(&registry, ViewType::of::<Form>());

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(binder.cached_types(), 1);
    }

    #[test]
    fn test_bind_sets_and_clears_callback() {
        let registry = registry();
        let mut binder = PropertyBinder::new();
        let submit = Callback::new(|| {});
        let mut props = Props::new();
        props.insert("onSubmit".into(), submit.clone().into());
        let node = form(props);

        assert!(binder.bind(&registry, &node).is_empty());
        node.with_view::<Form, _>(|f| {
            assert!(f.on_submit.as_ref().is_some_and(|cb| cb.ptr_eq(&submit)));
        });

        node.remove_prop("onSubmit");
        binder.bind(&registry, &node);
        node.with_view::<Form, _>(|f| assert!(f.on_submit.is_none()));
    }

    #[test]
    fn test_bind_reaches_base_fields() {
        let registry = registry();
        let mut binder = PropertyBinder::new();
        let mut props = Props::new();
        props.insert("enabled".into(), true.into());
        let node = form(props);

        binder.bind(&registry, &node);

        node.with_view::<Form, _>(|f| assert_eq!(f.field.enabled, Some(true)));
    }

    #[test]
    fn test_mismatch_leaves_field_and_reports() {
        let registry = registry();
        let mut binder = PropertyBinder::new();
        let mut props = Props::new();
        props.insert("label".into(), PropValue::Int(3));
        let node = form(props);
        binder.bind(&registry, &node);

        node.set_prop("label", "three");
        let diagnostics = binder.bind(&registry, &node);

        assert_eq!(diagnostics.len(), 1);
        match &diagnostics[0] {
            Diagnostic::BindingMismatch {
                prop,
                expected,
                found,
                ..
            } => {
                assert_eq!(prop.as_str(), "label");
                assert_eq!(*expected, "i64");
                assert_eq!(*found, "string");
            }
            other => panic!("unexpected diagnostic {other:?}"),
        }
        node.with_view::<Form, _>(|f| assert_eq!(f.label, Some(3)));
    }

    /// Declares `Field` as its base without exposing it through `base_mut`
    #[derive(Default)]
    struct Detached {
        field: Field,
    }

    impl View for Detached {}

    #[test]
    fn test_unreachable_base_field_is_skipped_without_mismatch() {
        let mut registry = registry();
        registry.register::<Detached>().extends::<Field>();
        let mut binder = PropertyBinder::new();
        let mut props = Props::new();
        props.insert("enabled".into(), true.into());
        let node = Node::new(ViewNode::new(
            NodeId(1),
            ViewType::of::<Detached>(),
            Box::new(Detached::default()),
            props,
        ));

        assert!(binder.bind(&registry, &node).is_empty());
        node.with_view::<Detached, _>(|d| assert_eq!(d.field.enabled, None));
    }

    #[test]
    fn test_unregistered_type_binds_nothing() {
        let registry = ViewRegistry::new();
        let mut binder = PropertyBinder::new();
        let mut props = Props::new();
        props.insert("label".into(), "x".into());

        assert!(binder.bind(&registry, &form(props)).is_empty());
    }
}
