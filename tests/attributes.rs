use folio_dom::{
	host::{Host, PropertyValue},
	memory::{MemoryDocument, MemoryNode, Mutation},
	AttrValue, Descriptor, Element, HostError, Renderer,
};
use serde_json::json;

fn element(tag: &str) -> Element {
	Element::new(tag).unwrap()
}

fn render(renderer: &mut Renderer<MemoryDocument>, descriptor: impl Into<Descriptor>) -> MemoryNode {
	let node = renderer.render(&descriptor.into()).unwrap().node().unwrap();
	renderer.host().clear_mutations();
	node
}

fn update(renderer: &mut Renderer<MemoryDocument>, node: &MemoryNode, descriptor: impl Into<Descriptor>) -> Vec<Mutation> {
	assert_eq!(renderer.update(node, &descriptor.into()).unwrap(), None);
	renderer.host().take_mutations()
}

fn set_attribute(name: &str, value: &str) -> Mutation {
	Mutation::SetAttribute {
		name: name.to_owned(),
		value: value.to_owned(),
	}
}

#[test]
fn undefined_class_name_is_literal_but_null_removes() {
	let mut renderer = Renderer::new(MemoryDocument::new());
	let literal = Descriptor::from_literal(&json!(["div", {"className": "undefined"}])).unwrap();
	let node = renderer.render(&literal).unwrap().node().unwrap();
	assert_eq!(renderer.host().attribute(&node, "class").as_deref(), Some("undefined"));
	renderer.host().clear_mutations();

	let cleared = Descriptor::from_literal(&json!(["div", {"className": null}])).unwrap();
	assert_eq!(
		update(&mut renderer, &node, cleared),
		vec![Mutation::RemoveAttribute { name: "class".to_owned() }]
	);
	assert_eq!(renderer.host().attribute(&node, "class"), None);
}

#[test]
fn only_changed_attributes_are_written() {
	let mut renderer = Renderer::new(MemoryDocument::new());
	let node = render(&mut renderer, element("a").attr("href", "/notes").attr("title", "Notes").class("nav"));

	let mutations = update(&mut renderer, &node, element("a").attr("href", "/lectures").attr("title", "Notes").class("nav"));
	assert_eq!(mutations, vec![set_attribute("href", "/lectures")]);

	let mutations = update(&mut renderer, &node, element("a").attr("href", "/lectures").attr("title", AttrValue::Null).class("nav"));
	assert_eq!(mutations, vec![Mutation::RemoveAttribute { name: "title".to_owned() }]);
}

#[test]
fn lists_and_numbers_serialize_like_attribute_strings() {
	let mut renderer = Renderer::new(MemoryDocument::new());
	let node = render(
		&mut renderer,
		element("polyline").attr("points", vec![vec![0, 0], vec![1, 2]]).attr("width", 1.5).attr("height", 2.0).attr("hidden-by", false),
	);
	let host = renderer.host();
	assert_eq!(host.attribute(&node, "points").as_deref(), Some("0,0 1,2"));
	assert_eq!(host.attribute(&node, "width").as_deref(), Some("1.5"));
	assert_eq!(host.attribute(&node, "height").as_deref(), Some("2"));
	assert_eq!(host.attribute(&node, "hidden-by").as_deref(), Some("false"));
}

#[test]
fn unchanged_value_is_not_rewritten() {
	let mut renderer = Renderer::new(MemoryDocument::new());
	let input = |value: &str| element("input").attr("type", "text").attr("value", value);
	let node = render(&mut renderer, input("12"));
	assert_eq!(renderer.host().property(&node, "value"), Some(PropertyValue::Text("12".to_owned())));
	// `value` is a property, not an attribute.
	assert_eq!(renderer.host().attribute(&node, "value"), None);

	renderer.host().user_input(&node, "value", PropertyValue::Text("123".to_owned())).unwrap();
	assert_eq!(update(&mut renderer, &node, input("123")), vec![]);

	assert_eq!(
		update(&mut renderer, &node, input("0")),
		vec![Mutation::SetProperty {
			name: "value".to_owned(),
			value: PropertyValue::Text("0".to_owned())
		}]
	);
}

#[test]
fn absent_live_properties_keep_user_state() {
	let mut renderer = Renderer::new(MemoryDocument::new());
	let node = render(&mut renderer, element("input").attr("type", "checkbox"));
	renderer.host().user_input(&node, "checked", PropertyValue::Bool(true)).unwrap();

	assert_eq!(update(&mut renderer, &node, element("input").attr("type", "checkbox")), vec![]);
	assert_eq!(renderer.host().property(&node, "checked"), Some(PropertyValue::Bool(true)));
}

#[test]
fn boolean_properties_are_coerced() {
	let mut renderer = Renderer::new(MemoryDocument::new());
	let button = |disabled: AttrValue| element("button").attr("disabled", disabled);
	let node = render(&mut renderer, button(true.into()));
	assert_eq!(renderer.host().property(&node, "disabled"), Some(PropertyValue::Bool(true)));
	assert_eq!(renderer.host().attribute(&node, "disabled"), None);

	assert_eq!(update(&mut renderer, &node, button("disabled".into())), vec![]);
	assert_eq!(
		update(&mut renderer, &node, button(1.into())),
		vec![Mutation::SetProperty {
			name: "disabled".to_owned(),
			value: PropertyValue::Bool(false)
		}]
	);
	assert_eq!(update(&mut renderer, &node, element("button")), vec![]);
}

#[test]
fn style_properties_are_kebab_cased_and_removed() {
	let mut renderer = Renderer::new(MemoryDocument::new());
	let node = render(&mut renderer, element("div").style("fontSize", "12px").style("--accent", "teal").style("color", "red"));
	assert_eq!(renderer.host().style_property(&node, "font-size").as_deref(), Some("12px"));
	assert_eq!(renderer.host().style_property(&node, "--accent").as_deref(), Some("teal"));

	let mutations = update(&mut renderer, &node, element("div").style("fontSize", "14px").style("color", "red"));
	assert_eq!(
		mutations,
		vec![
			Mutation::SetStyle {
				name: "font-size".to_owned(),
				value: "14px".to_owned()
			},
			Mutation::RemoveStyle { name: "--accent".to_owned() },
		]
	);

	let mutations = update(&mut renderer, &node, element("div").style("fontSize", "14px").remove_style("color"));
	assert_eq!(mutations, vec![Mutation::RemoveStyle { name: "color".to_owned() }]);
	assert_eq!(renderer.host().outer_html(&node), r#"<div style="font-size: 14px"></div>"#);
}

#[test]
fn dataset_maps_to_data_attributes() {
	let mut renderer = Renderer::new(MemoryDocument::new());
	let node = render(&mut renderer, element("div").data("chartId", "supply").data("step", "2"));
	assert_eq!(renderer.host().attribute(&node, "data-chart-id").as_deref(), Some("supply"));

	let mutations = update(&mut renderer, &node, element("div").data("chartId", "supply"));
	assert_eq!(mutations, vec![Mutation::RemoveAttribute { name: "data-step".to_owned() }]);
}

#[test]
fn invalid_attribute_names_are_skipped() {
	let mut renderer = Renderer::new(MemoryDocument::new());
	let node = render(&mut renderer, element("div").attr("bad name", "x").attr("title", "ok"));
	assert_eq!(renderer.host().attribute_names(&node), vec!["title".to_owned()]);
}

#[test]
fn unchanged_numeric_value_is_not_rewritten() {
	let mut renderer = Renderer::new(MemoryDocument::new());
	let node = render(&mut renderer, element("input").attr("value", 12));
	assert_eq!(renderer.host().property(&node, "value"), Some(PropertyValue::Text("12".to_owned())));
	assert_eq!(update(&mut renderer, &node, element("input").attr("value", 12)), vec![]);
	assert_eq!(
		update(&mut renderer, &node, element("input").attr("value", 12.5)),
		vec![Mutation::SetProperty {
			name: "value".to_owned(),
			value: PropertyValue::Text("12.5".to_owned())
		}]
	);
}

#[test]
fn user_input_needs_an_element() {
	let document = MemoryDocument::new();
	let text = document.create_text("plain");
	assert_eq!(document.user_input(&text, "value", PropertyValue::Text("1".to_owned())), Err(HostError::NotAnElement));
	assert_eq!(document.property(&text, "value"), None);
}
