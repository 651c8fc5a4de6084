use folio_dom::{namespace, Atom, AttrValue, Descriptor, DescriptorError, Element};
use serde_json::json;
use std::convert::TryFrom;

fn element(tag: &str) -> Element {
	Element::new(tag).unwrap()
}

#[test]
fn element_literal_shapes() {
	assert_eq!(Descriptor::from_literal(&json!(["hr"])).unwrap(), element("hr").into());
	assert_eq!(Descriptor::from_literal(&json!(["p", "text"])).unwrap(), element("p").child("text").into());
	assert_eq!(Descriptor::from_literal(&json!(["p", null, ["a", 1]])).unwrap(), element("p").child("a").child(1).into());
	assert_eq!(
		Descriptor::from_literal(&json!(["a", {"href": "/notes"}, "Notes"])).unwrap(),
		element("a").attr("href", "/notes").child("Notes").into()
	);
	assert_eq!(
		Descriptor::from_literal(&json!(["ul", {"fragment": [["li"], ["li"]]}])).unwrap(),
		element("ul").child(Descriptor::fragment(vec![element("li"), element("li")])).into()
	);
}

#[test]
fn atoms_and_fragments() {
	assert_eq!(Descriptor::from_literal(&json!(null)).unwrap(), Descriptor::empty());
	assert_eq!(Descriptor::from_literal(&json!(false)).unwrap(), Atom::Bool(false).into());
	assert_eq!(Descriptor::from_literal(&json!(2.5)).unwrap(), Atom::Number(2.5).into());
	assert_eq!(
		Descriptor::from_literal(&json!({"fragment": ["a", ["b"]]})).unwrap(),
		Descriptor::fragment(vec![Descriptor::from("a"), element("b").into()])
	);
}

#[test]
fn attribute_keys_are_sorted_into_place() {
	let literal = json!(["svg", {
		"ns": namespace::SVG,
		"className": "chart",
		"classList": ["wide", "dark"],
		"style": {"strokeWidth": 2, "fill": null},
		"dataset": {"curveId": "demand"},
		"events": {"click": {"select": "demand"}},
		"viewBox": [0, 0, 100, 100],
		"disabled": true
	}]);
	let descriptor = Descriptor::from_literal(&literal).unwrap();
	let attributes = descriptor.as_element().unwrap().attributes();

	assert_eq!(attributes.namespace.as_deref(), Some(namespace::SVG));
	assert_eq!(attributes.class.as_deref(), Some("chart wide dark"));
	assert_eq!(attributes.style.get("strokeWidth"), Some(&Some("2".to_owned())));
	assert_eq!(attributes.style.get("fill"), Some(&None));
	assert_eq!(attributes.dataset.get("curveId").map(String::as_str), Some("demand"));
	assert_eq!(attributes.events.as_ref().unwrap()["click"], json!({"select": "demand"}));
	assert_eq!(attributes.other["viewBox"].to_attribute_value().as_deref(), Some("0 0 100 100"));
	assert_eq!(attributes.other["disabled"], AttrValue::Bool(true));
}

#[test]
fn malformed_literals_are_rejected() {
	assert_eq!(Descriptor::from_literal(&json!([])), Err(DescriptorError::EmptyLiteral));
	assert_eq!(Descriptor::from_literal(&json!([1, "x"])), Err(DescriptorError::NotATag("1".to_owned())));
	assert_eq!(Descriptor::from_literal(&json!(["bad tag"])), Err(DescriptorError::InvalidTag("bad tag".to_owned())));
	assert!(matches!(Descriptor::from_literal(&json!(["p", {}, "a", "b"])), Err(DescriptorError::UnsupportedLiteral(_))));
	assert!(matches!(Descriptor::from_literal(&json!(["p", "a", "b"])), Err(DescriptorError::ExpectedObject { .. })));
	assert!(matches!(Descriptor::from_literal(&json!({"children": []})), Err(DescriptorError::UnsupportedLiteral(_))));
	assert!(matches!(
		Descriptor::from_literal(&json!(["p", {"title": {"nested": true}}])),
		Err(DescriptorError::UnsupportedAttributeValue { .. })
	));
	assert!(matches!(Descriptor::from_literal(&json!(["p", {"style": "color: red"}])), Err(DescriptorError::ExpectedObject { .. })));
}

#[test]
fn literal_form_survives_serde() {
	let descriptor: Descriptor = element("figure")
		.class("plot")
		.style("height", "10em")
		.data("step", "1")
		.on("input", json!(3))
		.attr("aria-label", "Supply and demand")
		.child(element("figcaption").child("Equilibrium at ").child(4.5))
		.child(Descriptor::fragment(vec!["a", "b"]))
		.into();

	let json = serde_json::to_string(&descriptor).unwrap();
	let parsed: Descriptor = serde_json::from_str(&json).unwrap();
	assert_eq!(parsed, descriptor);
	assert_eq!(Descriptor::try_from(&descriptor.to_literal()).unwrap(), descriptor);
	assert!(serde_json::from_str::<Descriptor>("[]").is_err());
}
