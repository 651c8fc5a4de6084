use folio_dom::{
	host::Host,
	memory::{MemoryDocument, MemoryNode},
	mount::ElementMount,
	widget::{Context, DocumentWidget, Widget, WidgetEvent, WidgetKind},
	Descriptor, DescriptorError, Element, Renderer, WidgetError,
};
use serde_json::json;

/// A price knob with a step button.
struct Knob;

#[derive(Default)]
struct KnobConfig {
	step: i64,
}

impl Widget for Knob {
	type Config = KnobConfig;
	type State = i64;

	fn config(&self) -> KnobConfig {
		KnobConfig { step: 5 }
	}

	fn create_state(&self, config: &KnobConfig) -> i64 {
		config.step * 2
	}

	fn on_update(&self, state: &mut i64, event: &WidgetEvent) {
		*state += event.payload.as_i64().unwrap_or(0);
	}

	fn render(&self, context: &Context, state: &i64, config: &KnobConfig) -> Result<Descriptor, DescriptorError> {
		Ok(Element::new("div")?
			.data("pass", context.pass.to_string())
			.child(Element::new("output")?.child(*state as i32))
			.child(Element::new("button")?.on("click", json!(config.step)).child("+"))
			.into())
	}
}

struct Chart;

impl Widget for Chart {
	type Config = ();
	type State = ();

	fn kind(&self) -> WidgetKind {
		WidgetKind::Canvas2d
	}

	fn create_state(&self, _: &()) {}

	fn render(&self, _: &Context, _: &(), _: &()) -> Result<Descriptor, DescriptorError> {
		Ok(Descriptor::empty())
	}
}

struct Broken;

impl Widget for Broken {
	type Config = ();
	type State = ();

	fn create_state(&self, _: &()) {}

	fn render(&self, _: &Context, _: &(), _: &()) -> Result<Descriptor, DescriptorError> {
		Element::new("not a tag").map(Descriptor::from)
	}
}

fn mount<W: Widget>(widget: W) -> Result<DocumentWidget<W, MemoryDocument, ElementMount<MemoryDocument>>, WidgetError> {
	let renderer = Renderer::new(MemoryDocument::new());
	let container = renderer.host().create_container("main");
	DocumentWidget::mount(widget, "knob", renderer, ElementMount::new(container))
}

fn button(widget: &DocumentWidget<Knob, MemoryDocument, ElementMount<MemoryDocument>>) -> MemoryNode {
	let host = widget.renderer().host();
	let root = &widget.root().nodes()[0];
	host.children(root)[1].clone()
}

#[test]
fn events_update_state_and_rerender() {
	let mut widget = mount(Knob).unwrap();
	assert_eq!(*widget.state(), 10);
	assert_eq!(widget.context().pass, 1);

	let button = button(&widget);
	let label = widget.renderer().host().children(&button)[0].clone();
	assert!(widget.dispatch("click", &label).unwrap());
	assert!(!widget.dispatch("keydown", &label).unwrap());

	assert_eq!(*widget.state(), 15);
	assert_eq!(widget.context().pass, 2);
	let host = widget.renderer().host();
	assert_eq!(
		host.outer_html(widget.root().container()),
		r#"<main><div data-pass="2"><output>15</output><button data-eventsource="0">+</button></div></main>"#
	);
}

#[test]
fn rerender_keeps_nodes_and_ids() {
	let mut widget = mount(Knob).unwrap();
	let before = button(&widget);
	widget.rerender().unwrap();
	widget.rerender().unwrap();
	assert_eq!(button(&widget), before);
	assert_eq!(widget.renderer().event_registry().borrow().len(), 1);
	assert_eq!(
		widget.renderer().host().attribute(&before, "data-eventsource").as_deref(),
		Some("0")
	);
}

#[test]
fn non_document_widgets_are_rejected() {
	assert_eq!(mount(Chart).err(), Some(WidgetError::UnsupportedKind(WidgetKind::Canvas2d)));
}

#[test]
fn invalid_descriptors_fail_the_pass() {
	assert!(matches!(mount(Broken), Err(WidgetError::Render(_))));
}

#[test]
fn widget_kinds_use_module_names() {
	assert_eq!(serde_json::to_value(WidgetKind::Document).unwrap(), json!("document"));
	assert_eq!(serde_json::from_value::<WidgetKind>(json!("Canvas2d")).unwrap(), WidgetKind::Canvas2d);
	assert_eq!(serde_json::from_value::<WidgetKind>(json!("remote")).unwrap(), WidgetKind::Remote);
}

#[test]
fn styles_can_be_installed() {
	let mut widget = mount(Knob).unwrap();
	widget.install_styles("output { font-weight: bold }").unwrap();
	let host = widget.renderer().host();
	let first = host.children(widget.root().container())[0].clone();
	assert_eq!(host.local_name(&first).as_deref(), Some("style"));
}
