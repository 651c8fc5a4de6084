//! Reads existing live nodes back into [`Descriptor`]s, for example to adopt server-rendered markup.
//!
//! Loading is lossy where the live tree doesn't remember the descriptor: Event specs aren't recovered,
//! and [`EVENT_SOURCE_ATTRIBUTE`] stamps are dropped.

use crate::{
	attributes::{camel_case, BOOLEAN_PROPERTIES, LIVE_PROPERTIES},
	descriptor::{AttrValue, Descriptor, Element},
	events::EVENT_SOURCE_ATTRIBUTE,
	host::{Host, NodeKind, PropertyValue},
	namespace,
};
use tracing::warn;

/// Loads `node` in the namespace context of its parent.
///
/// Comments (including empty placeholders) and other non-element, non-text nodes load as [`None`].
pub fn load<H: Host>(host: &H, node: &H::Node) -> Option<Descriptor> {
	let inherited = host
		.parent(node)
		.filter(|parent| host.kind(parent) == NodeKind::Element)
		.and_then(|parent| host.namespace(&parent))
		.unwrap_or_else(|| namespace::HTML.to_owned());
	load_in(host, node, &inherited)
}

/// Loads all child nodes of `parent` that have a descriptor representation.
pub fn load_child_nodes<H: Host>(host: &H, parent: &H::Node) -> Vec<Descriptor> {
	let namespace = host.namespace(parent).unwrap_or_else(|| namespace::HTML.to_owned());
	load_child_nodes_in(host, parent, &namespace)
}

fn load_in<H: Host>(host: &H, node: &H::Node, inherited: &str) -> Option<Descriptor> {
	match host.kind(node) {
		NodeKind::Element => load_element(host, node, inherited).map(Descriptor::Element),
		NodeKind::Text => Some(Descriptor::text(host.text(node).unwrap_or_default())),
		NodeKind::Comment | NodeKind::Other => None,
	}
}

/// Loads an element and its subtree. The namespace is only made explicit where it differs from `inherited`.
pub fn load_element<H: Host>(host: &H, node: &H::Node, inherited: &str) -> Option<Element> {
	let tag = host.local_name(node)?;
	let mut element = match Element::new(tag) {
		Ok(element) => element,
		Err(error) => {
			warn!("Skipping unloadable element: {}", error);
			return None;
		}
	};
	let namespace = host.namespace(node).unwrap_or_else(|| namespace::HTML.to_owned());

	let attributes = element.attributes_mut();
	if namespace != inherited {
		attributes.namespace = Some(namespace.clone());
	}
	for name in host.attribute_names(node) {
		let value = match host.attribute(node, &name) {
			Some(value) => value,
			None => continue,
		};
		if name == "class" {
			attributes.class = Some(value);
		} else if name == "style" || name == EVENT_SOURCE_ATTRIBUTE {
			continue;
		} else if let Some(key) = name.strip_prefix("data-") {
			attributes.dataset.insert(camel_case(key), value);
		} else {
			attributes.other.insert(name, AttrValue::Text(value));
		}
	}
	for name in host.style_names(node) {
		let value = host.style_property(node, &name);
		let key = if name.starts_with("--") { name } else { camel_case(&name) };
		attributes.style.insert(key, value);
	}
	for &name in BOOLEAN_PROPERTIES.iter().chain(LIVE_PROPERTIES) {
		match host.property(node, name) {
			Some(PropertyValue::Bool(true)) => {
				attributes.other.insert(name.to_owned(), AttrValue::Bool(true));
			}
			Some(PropertyValue::Text(text)) if !text.is_empty() => {
				attributes.other.insert(name.to_owned(), AttrValue::Text(text));
			}
			_ => (),
		}
	}

	let children = load_child_nodes_in(host, node, &namespace);
	*element.children_mut() = children;
	Some(element)
}

fn load_child_nodes_in<H: Host>(host: &H, parent: &H::Node, namespace: &str) -> Vec<Descriptor> {
	host.children(parent).iter().filter_map(|child| load_in(host, child, namespace)).collect()
}
