use folio_dom::{components::Components, host::Host, memory::MemoryDocument, Descriptor, Element, Renderer};

fn element(tag: &str) -> Element {
	Element::new(tag).unwrap()
}

fn knob(input: &Element) -> Vec<Descriptor> {
	let label = input.attributes().dataset.get("label").cloned().unwrap_or_default();
	let mut content = vec![Descriptor::from(element("label").child(label))];
	content.extend(input.children().iter().cloned());
	content
}

#[test]
fn registered_tag_keeps_its_element_and_expands_content() {
	let components = Components::new().with("x-knob", knob);
	let mut renderer = Renderer::new(MemoryDocument::new()).with_components(components);

	let tree: Descriptor = element("div").child(element("x-knob").data("label", "Price").child("€")).into();
	let root = renderer.render(&tree).unwrap().node().unwrap();
	assert_eq!(
		renderer.host().outer_html(&root),
		r#"<div><x-knob data-label="Price"><label>Price</label>€</x-knob></div>"#
	);

	renderer.host().clear_mutations();
	renderer.update(&root, &tree).unwrap();
	assert_eq!(renderer.host().mutations(), vec![]);
}

#[test]
fn unregistered_tags_render_their_own_children() {
	let mut renderer = Renderer::new(MemoryDocument::new());
	assert!(renderer.components_mut().register("x-knob", knob).is_none());
	assert!(renderer.components_mut().unregister("x-knob").is_some());
	assert!(renderer.components_mut().is_empty());

	let root = renderer.render(&element("x-knob").child("raw").into()).unwrap().node().unwrap();
	assert_eq!(renderer.host().outer_html(&root), "<x-knob>raw</x-knob>");
	assert_eq!(renderer.host().children(&root).len(), 1);
}
