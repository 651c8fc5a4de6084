use folio_dom::{
	host::{Host, PropertyValue},
	load::{load, load_child_nodes},
	memory::MemoryDocument,
	namespace, AttrValue, Descriptor, Element, Renderer,
};
use serde_json::json;

fn element(tag: &str) -> Element {
	Element::new(tag).unwrap()
}

#[test]
fn rendered_tree_loads_back() {
	let mut renderer = Renderer::new(MemoryDocument::new());
	let tree: Descriptor = element("div")
		.class("plot")
		.style("marginTop", "1em")
		.data("curveId", "supply")
		.attr("title", "Supply")
		.child(element("svg").ns(namespace::SVG).child(element("path").attr("d", "M0 0")))
		.child("caption")
		.into();
	let root = renderer.render(&tree).unwrap().node().unwrap();

	assert_eq!(load(renderer.host(), &root), Some(tree));
}

#[test]
fn event_stamps_and_comments_are_dropped() {
	let mut renderer = Renderer::new(MemoryDocument::new());
	let container = renderer.host().create_container("main");
	for node in renderer
		.render(&Descriptor::fragment(vec![
			Descriptor::from(element("button").on("click", json!(1)).child("Go")),
			Descriptor::empty(),
		]))
		.unwrap()
		.into_nodes()
	{
		renderer.host().append_child(&container, &node).unwrap();
	}
	let placeholder = renderer.host().create_comment("");
	renderer.host().append_child(&container, &placeholder).unwrap();

	assert_eq!(load_child_nodes(renderer.host(), &container), vec![Descriptor::from(element("button").child("Go"))]);
	assert_eq!(load(renderer.host(), &placeholder), None);
}

#[test]
fn properties_are_loaded_as_attributes() {
	let mut renderer = Renderer::new(MemoryDocument::new());
	let input = renderer.render(&element("input").attr("disabled", true).into()).unwrap().node().unwrap();
	renderer.host().user_input(&input, "value", PropertyValue::Text("4".to_owned())).unwrap();

	let loaded = load(renderer.host(), &input).unwrap();
	let attributes = loaded.as_element().unwrap().attributes();
	assert_eq!(attributes.other.get("disabled"), Some(&AttrValue::Bool(true)));
	assert_eq!(attributes.other.get("value"), Some(&AttrValue::Text("4".to_owned())));
}
