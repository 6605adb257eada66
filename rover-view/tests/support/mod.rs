#![allow(dead_code)]

use rover_view::{
    Callback, Capability, Diagnostic, Element, NativeHandle, Node, Props, StubHost, StubWidget,
    View, ViewNode, ViewObserver, ViewRegistry, ViewTree,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
pub struct Label {
    pub label: Option<String>,
}

impl View for Label {
    fn capability(&self) -> Capability {
        Capability::Leaf
    }
}

#[derive(Default)]
pub struct Image {
    pub src: Option<String>,
}

impl View for Image {
    fn capability(&self) -> Capability {
        Capability::Leaf
    }
}

#[derive(Default)]
pub struct Button {
    pub label: Label,
    pub on_click: Option<Callback>,
}

impl View for Button {
    fn capability(&self) -> Capability {
        Capability::Leaf
    }

    fn base_mut(&mut self) -> Option<&mut dyn View> {
        Some(&mut self.label)
    }
}

#[derive(Default)]
pub struct Stack;

impl View for Stack {
    fn capability(&self) -> Capability {
        Capability::Container
    }
}

/// Container holding a ref to one of its declared descendants
#[derive(Default)]
pub struct Panel {
    pub title: Option<Node>,
}

impl View for Panel {
    fn capability(&self) -> Capability {
        Capability::Container
    }
}

/// Pass-through view whose layout comes from a node-level template
#[derive(Default)]
pub struct Screen;

impl View for Screen {}

/// Pass-through view with nothing to render
#[derive(Default)]
pub struct Empty;

impl View for Empty {}

/// Form with a title label and a submit button wired through refs
#[derive(Default)]
pub struct Form {
    pub heading: Option<String>,
    pub on_submit: Option<Callback>,
    pub title: Option<Node>,
    pub submit: Option<NativeHandle>,
    pub title_ready_on_mount: bool,
}

impl View for Form {
    fn layout(&self) -> Option<Element> {
        let heading = self.heading.clone().unwrap_or_default();
        Some(
            Element::new(Stack)
                .child(Element::new(Label::default()).prop("label", heading).prop("ref", "title"))
                .child(Element::new(Button::default()).prop("label", "Send").prop("ref", "submit"))
                .child(Element::new(Image::default()).prop("ref", "missing")),
        )
    }

    fn on_view_mounted(&mut self) {
        self.title_ready_on_mount = self.title.is_some();
    }
}

/// View that declines re-rendering on prop updates and counts layouts
#[derive(Default)]
pub struct Frozen {
    pub layouts: Rc<Cell<u32>>,
}

impl View for Frozen {
    fn layout(&self) -> Option<Element> {
        self.layouts.set(self.layouts.get() + 1);
        Some(Element::new(Label::default()))
    }

    fn on_props_updated(&mut self, _old_props: &Props) -> bool {
        false
    }
}

pub fn registry() -> ViewRegistry {
    let mut registry = ViewRegistry::new();
    registry
        .register::<Label>()
        .prop("label", |l| &mut l.label)
        .constructible();
    registry
        .register::<Image>()
        .prop("src", |i| &mut i.src);
    registry
        .register::<Button>()
        .extends::<Label>()
        .prop_as("onClick", "on_click", |b| &mut b.on_click);
    registry.register::<Stack>().constructible();
    registry
        .register::<Panel>()
        .view_ref::<Label>("title", |p| &mut p.title);
    registry
        .register::<Form>()
        .prop("heading", |f| &mut f.heading)
        .prop_as("onSubmit", "on_submit", |f| &mut f.on_submit)
        .view_ref::<Label>("title", |f| &mut f.title)
        .handle_ref::<StubWidget>("submit", |f| &mut f.submit);
    registry
}

/// Observer recording lifecycle events as `event:View#id` lines
pub struct EventLog(pub Log);

impl EventLog {
    fn push(&self, event: &str, node: &ViewNode) {
        self.0.borrow_mut().push(format!(
            "{}:{}#{}",
            event,
            node.view_type().short_name(),
            node.id().raw()
        ));
    }
}

impl ViewObserver for EventLog {
    fn on_view_will_mount(&mut self, node: &ViewNode) {
        self.push("will_mount", node);
    }

    fn on_view_mounted(&mut self, node: &ViewNode) {
        self.push("mounted", node);
    }

    fn on_props_updated(&mut self, node: &ViewNode, _new_props: &Props) {
        self.push("props_updated", node);
    }

    fn on_view_rendered(&mut self, node: &ViewNode) {
        self.push("rendered", node);
    }

    fn on_diagnostic(&mut self, diagnostic: &Diagnostic) {
        self.0.borrow_mut().push(format!("diagnostic:{}", diagnostic));
    }
}

pub struct Fixture {
    pub tree: ViewTree<StubHost>,
    pub events: Log,
    pub native: Log,
}

pub fn fixture() -> Fixture {
    fixture_with(rover_view::TreeConfig::default())
}

pub fn fixture_with(config: rover_view::TreeConfig) -> Fixture {
    init_tracing();
    let events: Log = Rc::new(RefCell::new(Vec::new()));
    let native: Log = Rc::new(RefCell::new(Vec::new()));
    let mut tree = ViewTree::with_config(StubHost::with_buffer(native.clone()), registry(), config);
    tree.add_observer(EventLog(events.clone()));
    Fixture {
        tree,
        events,
        native,
    }
}

impl Fixture {
    pub fn events_matching(&self, prefix: &str) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|line| line.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }
}

/// Screen that renders a Label or an Image depending on its `kind` prop,
/// labelled with its `text` prop
pub fn switching_screen(tree: &mut ViewTree<StubHost>) -> Node {
    tree.materialize(
        Element::new(Screen)
            .prop("kind", "label")
            .prop("text", "hi")
            .layout(|node: &ViewNode| {
                let text = node
                    .prop("text")
                    .and_then(|value| value.as_str())
                    .unwrap_or_default()
                    .to_string();
                match node.prop("kind").and_then(|value| value.as_str()) {
                    Some("image") => Element::new(Image::default()).prop("src", text),
                    _ => Element::new(Label::default()).prop("label", text),
                }
            }),
    )
}

/// Every node reachable through rendered output from `root`
pub fn active_nodes(root: &Node) -> Vec<Node> {
    let mut nodes = vec![root.clone()];
    let mut index = 0;
    while index < nodes.len() {
        let rendered = nodes[index].rendered();
        nodes.extend(rendered);
        index += 1;
    }
    nodes
}

pub fn widget(handle: &NativeHandle) -> &StubWidget {
    handle.downcast_ref::<StubWidget>().expect("stub widget")
}
