use crate::host::NativeHandle;
use crate::view::{FromProp, Node, PropKey, PropValue, View, ViewType, find_in_chain};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;

type AssignProp = Rc<dyn Fn(&mut dyn View, Option<&PropValue>) -> bool>;
type AssignRef = Rc<dyn Fn(&mut dyn View, RefValue)>;
type Constructor = Rc<dyn Fn() -> Box<dyn View>>;

/// A typed field that receives the prop of the same resolved name
#[derive(Clone)]
pub struct PropField {
    field: &'static str,
    prop: PropKey,
    expected: &'static str,
    assign: AssignProp,
}

impl PropField {
    pub fn field_name(&self) -> &'static str {
        self.field
    }

    /// Resolved prop name: the override if one was declared, else the field name
    pub fn prop_name(&self) -> &str {
        &self.prop
    }

    /// Type name of the field, for diagnostics
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    /// Assign a prop value. Returns false if the value is not assignable,
    /// in which case the field is left unchanged.
    pub(crate) fn set(&self, view: &mut dyn View, value: &PropValue) -> bool {
        (self.assign)(view, Some(value))
    }

    pub(crate) fn clear(&self, view: &mut dyn View) {
        (self.assign)(view, None);
    }
}

/// What a ref field is able to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefTarget {
    /// Any view node
    AnyView,
    /// A node of this view type, or of a type extending it
    View(ViewType),
    /// A native handle wrapping this platform type
    Handle(TypeId),
}

/// Value delivered to a ref field
#[derive(Debug, Clone)]
pub enum RefValue {
    View(Node),
    Handle(NativeHandle),
}

/// A field on an owner view that a descendant's `ref` prop can fill
#[derive(Clone)]
pub struct RefField {
    name: &'static str,
    target: RefTarget,
    assign: AssignRef,
}

impl RefField {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn target(&self) -> RefTarget {
        self.target
    }

    pub(crate) fn assign(&self, view: &mut dyn View, value: RefValue) {
        (self.assign)(view, value)
    }
}

pub(crate) struct ViewClass {
    pub(crate) view_type: ViewType,
    pub(crate) base: Option<ViewType>,
    pub(crate) props: Vec<PropField>,
    pub(crate) refs: Vec<RefField>,
    pub(crate) constructor: Option<Constructor>,
}

impl ViewClass {
    fn new(view_type: ViewType) -> Self {
        Self {
            view_type,
            base: None,
            props: Vec::new(),
            refs: Vec::new(),
            constructor: None,
        }
    }
}

/// Binding tables for view types, built at registration time.
///
/// Stands in for runtime field discovery: each registered type declares the
/// fields props and refs are bound onto, and which type it extends.
pub struct ViewRegistry {
    classes: HashMap<TypeId, ViewClass>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
        }
    }

    /// Register `V`, or extend its existing registration
    pub fn register<V: View>(&mut self) -> ClassBuilder<'_, V> {
        let view_type = ViewType::of::<V>();
        let class = self
            .classes
            .entry(view_type.id())
            .or_insert_with(|| ViewClass::new(view_type));
        ClassBuilder {
            class,
            _marker: PhantomData,
        }
    }

    pub fn is_registered(&self, view_type: ViewType) -> bool {
        self.classes.contains_key(&view_type.id())
    }

    pub(crate) fn class(&self, view_type: ViewType) -> Option<&ViewClass> {
        self.classes.get(&view_type.id())
    }

    /// Registered classes from `view_type` up through its bases
    pub(crate) fn chain(&self, view_type: ViewType) -> Vec<&ViewClass> {
        let mut chain = Vec::new();
        let mut next = Some(view_type);
        while let Some(current) = next {
            if chain.len() > self.classes.len() {
                tracing::warn!(view = %view_type, "cyclic base chain, stopping discovery");
                break;
            }
            let Some(class) = self.class(current) else {
                break;
            };
            chain.push(class);
            next = class.base;
        }
        chain
    }

    /// Whether `view_type` is `ancestor` or extends it
    pub fn is_a(&self, view_type: ViewType, ancestor: ViewType) -> bool {
        view_type == ancestor
            || self
                .chain(view_type)
                .iter()
                .any(|class| class.view_type == ancestor)
    }

    /// Whether `owner` declares any ref field of its own
    pub fn has_refs(&self, owner: ViewType) -> bool {
        self.class(owner).is_some_and(|class| !class.refs.is_empty())
    }

    /// Ref field declared directly on `owner`, base classes excluded
    pub fn ref_field(&self, owner: ViewType, name: &str) -> Option<&RefField> {
        self.class(owner)?.refs.iter().find(|field| field.name == name)
    }

    pub(crate) fn construct(&self, view_type: ViewType) -> Option<Box<dyn View>> {
        let constructor = self.class(view_type)?.constructor.as_ref()?;
        Some(constructor())
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Declares the binding table of one view type
pub struct ClassBuilder<'a, V> {
    class: &'a mut ViewClass,
    _marker: PhantomData<fn() -> V>,
}

impl<V: View> ClassBuilder<'_, V> {
    /// Inherit the prop fields registered for `B`.
    ///
    /// `V` must return its embedded `B` from [`View::base_mut`].
    pub fn extends<B: View>(self) -> Self {
        self.class.base = Some(ViewType::of::<B>());
        self
    }

    /// Bind the prop named `field` onto a field of `V`
    pub fn prop<T: FromProp>(self, field: &'static str, access: fn(&mut V) -> &mut Option<T>) -> Self {
        self.prop_as(field, field, access)
    }

    /// Bind the prop `prop` onto the field `field`, overriding the default
    /// name resolution
    pub fn prop_as<T: FromProp>(
        self,
        prop: &str,
        field: &'static str,
        access: fn(&mut V) -> &mut Option<T>,
    ) -> Self {
        let assign = move |view: &mut dyn View, value: Option<&PropValue>| -> bool {
            let Some(target) = find_in_chain::<V>(view) else {
                tracing::warn!(
                    field,
                    declared_on = std::any::type_name::<V>(),
                    "view does not expose its base through base_mut; prop field skipped"
                );
                return true;
            };
            let slot = access(target);
            match value {
                None => {
                    *slot = None;
                    true
                }
                Some(value) => match T::from_prop(value) {
                    Some(converted) => {
                        *slot = Some(converted);
                        true
                    }
                    None => false,
                },
            }
        };
        self.class.props.push(PropField {
            field,
            prop: prop.into(),
            expected: std::any::type_name::<T>(),
            assign: Rc::new(assign),
        });
        self
    }

    /// Ref field accepting a node whose view is `T` or extends it
    pub fn view_ref<T: View>(self, name: &'static str, access: fn(&mut V) -> &mut Option<Node>) -> Self {
        self.node_ref(name, RefTarget::View(ViewType::of::<T>()), access)
    }

    /// Ref field accepting any view node
    pub fn any_view_ref(self, name: &'static str, access: fn(&mut V) -> &mut Option<Node>) -> Self {
        self.node_ref(name, RefTarget::AnyView, access)
    }

    /// Ref field accepting the native handle of the descendant, when that
    /// handle wraps a `W`
    pub fn handle_ref<W: Any>(
        self,
        name: &'static str,
        access: fn(&mut V) -> &mut Option<NativeHandle>,
    ) -> Self {
        let assign = move |view: &mut dyn View, value: RefValue| {
            if let (Some(target), RefValue::Handle(handle)) = (find_in_chain::<V>(view), value) {
                *access(target) = Some(handle);
            }
        };
        self.class.refs.push(RefField {
            name,
            target: RefTarget::Handle(TypeId::of::<W>()),
            assign: Rc::new(assign),
        });
        self
    }

    fn node_ref(
        self,
        name: &'static str,
        target: RefTarget,
        access: fn(&mut V) -> &mut Option<Node>,
    ) -> Self {
        let assign = move |view: &mut dyn View, value: RefValue| {
            if let (Some(owner), RefValue::View(node)) = (find_in_chain::<V>(view), value) {
                *access(owner) = Some(node);
            }
        };
        self.class.refs.push(RefField {
            name,
            target,
            assign: Rc::new(assign),
        });
        self
    }

    /// Enable copying nodes of this type through `ViewTree::copy`
    pub fn constructible(self) -> Self
    where
        V: Default,
    {
        self.class.constructor = Some(Rc::new(|| Box::new(V::default()) as Box<dyn View>));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Widget {
        enabled: Option<bool>,
    }

    impl View for Widget {}

    #[derive(Default)]
    struct Button {
        widget: Widget,
        label: Option<String>,
    }

    impl View for Button {
        fn base_mut(&mut self) -> Option<&mut dyn View> {
            Some(&mut self.widget)
        }
    }

    struct Unrelated;

    impl View for Unrelated {}

    fn registry() -> ViewRegistry {
        let mut registry = ViewRegistry::new();
        registry
            .register::<Widget>()
            .prop("enabled", |w| &mut w.enabled);
        registry
            .register::<Button>()
            .extends::<Widget>()
            .prop_as("text", "label", |b| &mut b.label)
            .constructible();
        registry
    }

    #[test]
    fn test_chain_walks_derived_to_base() {
        let registry = registry();
        let chain = registry.chain(ViewType::of::<Button>());

        let types: Vec<_> = chain.iter().map(|class| class.view_type).collect();
        assert_eq!(types, vec![ViewType::of::<Button>(), ViewType::of::<Widget>()]);
    }

    #[test]
    fn test_is_a() {
        let registry = registry();

        assert!(registry.is_a(ViewType::of::<Button>(), ViewType::of::<Widget>()));
        assert!(registry.is_a(ViewType::of::<Widget>(), ViewType::of::<Widget>()));
        assert!(!registry.is_a(ViewType::of::<Widget>(), ViewType::of::<Button>()));
        assert!(!registry.is_a(ViewType::of::<Unrelated>(), ViewType::of::<Widget>()));
    }

    #[test]
    fn test_prop_field_sets_base_through_chain() {
        let registry = registry();
        let widget_class = registry.class(ViewType::of::<Widget>()).unwrap();
        let mut button = Button::default();

        assert!(widget_class.props[0].set(&mut button, &true.into()));
        assert_eq!(button.widget.enabled, Some(true));

        widget_class.props[0].clear(&mut button);
        assert_eq!(button.widget.enabled, None);
    }

    #[test]
    fn test_prop_override_name() {
        let registry = registry();
        let field = &registry.class(ViewType::of::<Button>()).unwrap().props[0];

        assert_eq!(field.prop_name(), "text");
        assert_eq!(field.field_name(), "label");
    }

    #[test]
    fn test_constructible() {
        let registry = registry();

        let view = registry.construct(ViewType::of::<Button>()).unwrap();
        assert!(view.is::<Button>());
        assert!(registry.construct(ViewType::of::<Widget>()).is_none());
    }

    #[test]
    fn test_registration_and_ref_fields() {
        let mut registry = registry();
        assert!(registry.is_registered(ViewType::of::<Button>()));
        assert!(!registry.is_registered(ViewType::of::<Unrelated>()));
        assert!(!registry.has_refs(ViewType::of::<Button>()));

        #[derive(Default)]
        struct Card {
            target: Option<Node>,
        }

        impl View for Card {}

        registry
            .register::<Card>()
            .any_view_ref("target", |c| &mut c.target);
        assert!(registry.has_refs(ViewType::of::<Card>()));
        assert_eq!(
            registry
                .ref_field(ViewType::of::<Card>(), "target")
                .map(RefField::target),
            Some(RefTarget::AnyView)
        );
    }

    #[test]
    fn test_cyclic_chain_terminates() {
        let mut registry = ViewRegistry::new();
        registry.register::<Widget>().extends::<Button>();
        registry.register::<Button>().extends::<Widget>();

        assert!(registry.chain(ViewType::of::<Button>()).len() <= 3);
    }
}
