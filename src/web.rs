//! The browser [`Host`], backed by [`web_sys`].

use crate::{
	descriptor::format_number,
	error::HostError,
	events::{resolve, Dispatch, ListenerSet, SharedRegistry},
	host::{Host, NodeKind, PropertyValue},
	mount::ElementMount,
};
use core::fmt::{self, Debug, Formatter};
use hashbrown::HashMap;
use js_sys::Reflect;
use std::rc::Rc;
use tracing::{error, instrument, trace, trace_span, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{CharacterData, CssStyleDeclaration, Document, Element, Event, Node, ShadowRootInit, ShadowRootMode};

#[derive(Debug, Clone)]
pub struct WebHost {
	document: Document,
	/// A detached element whose inline style normalises declarations for comparison.
	scratch: Option<CssStyleDeclaration>,
}

impl WebHost {
	#[must_use]
	pub fn new(document: Document) -> Self {
		let scratch = match document.create_element("div") {
			Ok(scratch) => style(&scratch),
			Err(error) => {
				warn!("Could not create style scratch element, comparing raw declarations: {:?}", error);
				None
			}
		};
		Self { document, scratch }
	}

	/// The host for the current window's document, if there is one.
	#[must_use]
	pub fn from_window() -> Option<Self> {
		web_sys::window()?.document().map(Self::new)
	}

	pub fn document(&self) -> &Document {
		&self.document
	}
}

fn describe(error: &JsValue) -> String {
	error.as_string().unwrap_or_else(|| format!("{:?}", error))
}

fn element(node: &Node) -> Result<&Element, HostError> {
	node.dyn_ref::<Element>().ok_or(HostError::NotAnElement)
}

/// `style` is defined separately on `HTMLElement`, `SVGElement` and `MathMLElement`.
fn style(node: &Node) -> Option<CssStyleDeclaration> {
	let style = Reflect::get(node, &JsValue::from_str("style")).ok()?;
	style.dyn_into().ok()
}

impl Host for WebHost {
	type Node = Node;

	fn create_element(&self, namespace: &str, tag: &str) -> Result<Node, HostError> {
		self.document.create_element_ns(Some(namespace), tag).map(Into::into).map_err(|error| HostError::CreateElement {
			tag: tag.to_owned(),
			namespace: namespace.to_owned(),
			message: describe(&error),
		})
	}

	fn create_text(&self, data: &str) -> Node {
		self.document.create_text_node(data).into()
	}

	fn create_comment(&self, data: &str) -> Node {
		self.document.create_comment(data).into()
	}

	fn kind(&self, node: &Node) -> NodeKind {
		match node.node_type() {
			Node::ELEMENT_NODE => NodeKind::Element,
			Node::TEXT_NODE => NodeKind::Text,
			Node::COMMENT_NODE => NodeKind::Comment,
			_ => NodeKind::Other,
		}
	}

	fn same_node(&self, a: &Node, b: &Node) -> bool {
		a.is_same_node(Some(b))
	}

	fn local_name(&self, node: &Node) -> Option<String> {
		node.dyn_ref::<Element>().map(Element::local_name)
	}

	fn namespace(&self, node: &Node) -> Option<String> {
		node.dyn_ref::<Element>()?.namespace_uri()
	}

	fn text(&self, node: &Node) -> Option<String> {
		node.dyn_ref::<CharacterData>().map(CharacterData::data)
	}

	fn set_text(&self, node: &Node, data: &str) {
		match node.dyn_ref::<CharacterData>() {
			Some(character_data) => character_data.set_data(data),
			None => warn!("Can't set text of {:?}.", node),
		}
	}

	fn children(&self, node: &Node) -> Vec<Node> {
		let child_nodes = node.child_nodes();
		(0..child_nodes.length()).filter_map(|i| child_nodes.item(i)).collect()
	}

	fn parent(&self, node: &Node) -> Option<Node> {
		node.parent_node()
	}

	fn next_sibling(&self, node: &Node) -> Option<Node> {
		node.next_sibling()
	}

	fn insert_before(&self, parent: &Node, node: &Node, reference: Option<&Node>) -> Result<(), HostError> {
		parent.insert_before(node, reference).map(drop).map_err(|error| HostError::Insert(describe(&error)))
	}

	fn replace_child(&self, parent: &Node, new: &Node, old: &Node) -> Result<(), HostError> {
		parent.replace_child(new, old).map(drop).map_err(|error| HostError::Replace(describe(&error)))
	}

	fn remove_child(&self, parent: &Node, child: &Node) -> Result<(), HostError> {
		parent.remove_child(child).map(drop).map_err(|error| HostError::Remove(describe(&error)))
	}

	fn attribute(&self, element: &Node, name: &str) -> Option<String> {
		element.dyn_ref::<Element>()?.get_attribute(name)
	}

	fn attribute_names(&self, element: &Node) -> Vec<String> {
		match element.dyn_ref::<Element>() {
			Some(element) => element.get_attribute_names().iter().filter_map(|name| name.as_string()).collect(),
			None => Vec::new(),
		}
	}

	fn set_attribute(&self, node: &Node, name: &str, value: &str) -> Result<(), HostError> {
		element(node)?.set_attribute(name, value).map_err(|error| HostError::Attribute {
			name: name.to_owned(),
			message: describe(&error),
		})
	}

	fn remove_attribute(&self, node: &Node, name: &str) -> Result<(), HostError> {
		element(node)?.remove_attribute(name).map_err(|error| HostError::Attribute {
			name: name.to_owned(),
			message: describe(&error),
		})
	}

	fn style_property(&self, element: &Node, name: &str) -> Option<String> {
		let value = style(element)?.get_property_value(name).ok()?;
		if value.is_empty() {
			None
		} else {
			Some(value)
		}
	}

	fn style_names(&self, element: &Node) -> Vec<String> {
		match style(element) {
			Some(style) => (0..style.length()).map(|i| style.item(i)).collect(),
			None => Vec::new(),
		}
	}

	fn style_matches(&self, element: &Node, name: &str, value: &str) -> bool {
		let live = match self.style_property(element, name) {
			Some(live) => live,
			None => return false,
		};
		if live == value {
			return true;
		}
		let scratch = match &self.scratch {
			Some(scratch) => scratch,
			None => return false,
		};
		if scratch.set_property(name, value).is_err() {
			return false;
		}
		let normalized = scratch.get_property_value(name).ok();
		let _ = scratch.remove_property(name);
		normalized.as_deref() == Some(live.as_str())
	}

	fn set_style_property(&self, element: &Node, name: &str, value: &str) -> Result<(), HostError> {
		let style = style(element).ok_or(HostError::NotAnElement)?;
		style.set_property(name, value).map_err(|error| HostError::Style {
			name: name.to_owned(),
			message: describe(&error),
		})
	}

	fn remove_style_property(&self, element: &Node, name: &str) -> Result<(), HostError> {
		let style = style(element).ok_or(HostError::NotAnElement)?;
		style.remove_property(name).map(drop).map_err(|error| HostError::Style {
			name: name.to_owned(),
			message: describe(&error),
		})
	}

	fn property(&self, element: &Node, name: &str) -> Option<PropertyValue> {
		let value = Reflect::get(element, &JsValue::from_str(name)).ok()?;
		// Numeric properties (`progress.value`, `li.value`) compare as their string form.
		value
			.as_bool()
			.map(PropertyValue::Bool)
			.or_else(|| value.as_string().map(PropertyValue::Text))
			.or_else(|| value.as_f64().map(|number| PropertyValue::Text(format_number(number))))
	}

	fn set_property(&self, element: &Node, name: &str, value: &PropertyValue) -> Result<(), HostError> {
		let value = match value {
			PropertyValue::Bool(value) => JsValue::from_bool(*value),
			PropertyValue::Text(text) => JsValue::from_str(text),
		};
		match Reflect::set(element, &JsValue::from_str(name), &value) {
			Ok(true) => Ok(()),
			Ok(false) => Err(HostError::Property {
				name: name.to_owned(),
				message: "property is read-only".to_owned(),
			}),
			Err(error) => Err(HostError::Property {
				name: name.to_owned(),
				message: describe(&error),
			}),
		}
	}
}

/// Mounts into `element`'s open shadow root, attaching one if necessary.
///
/// # Errors
///
/// Iff `element` can't host a shadow root.
pub fn shadow_mount(element: &Element) -> Result<ElementMount<WebHost>, HostError> {
	let shadow_root = match element.shadow_root() {
		Some(shadow_root) => shadow_root,
		None => element
			.attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))
			.map_err(|error| HostError::Insert(format!("Could not attach shadow root: {}", describe(&error))))?,
	};
	Ok(ElementMount::new(shadow_root.into()))
}

/// Keeps one delegated listener per event type on a container, in line with an [`EventRegistry`](`crate::events::EventRegistry`).
///
/// Call [`EventDelegate::sync`] after each render pass. Listeners are removed when the delegate is dropped.
pub struct EventDelegate {
	container: Node,
	host: WebHost,
	registry: SharedRegistry,
	listeners: ListenerSet,
	closures: HashMap<String, Closure<dyn Fn(Event)>>,
	handler: Rc<dyn Fn(Dispatch)>,
}

impl Debug for EventDelegate {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventDelegate")
			.field("container", &self.container)
			.field("listeners", &self.listeners)
			.field("closures", &self.closures)
			.finish_non_exhaustive()
	}
}

impl EventDelegate {
	#[must_use]
	pub fn new(host: WebHost, container: Node, registry: SharedRegistry, handler: impl Fn(Dispatch) + 'static) -> Self {
		Self {
			container,
			host,
			registry,
			listeners: ListenerSet::new(),
			closures: HashMap::new(),
			handler: Rc::new(handler),
		}
	}

	/// Adds and removes container listeners to match the event types currently in the registry.
	#[instrument(skip(self))]
	pub fn sync(&mut self) {
		let diff = match self.registry.try_borrow() {
			Ok(registry) => self.listeners.sync(&registry),
			Err(error) => return error!("Could not read the event registry: {}", error),
		};

		for event_type in diff.removed {
			if let Some(closure) = self.closures.remove(&event_type) {
				trace!("Removing delegated {:?} listener.", event_type);
				if let Err(error) = self.container.remove_event_listener_with_callback(&event_type, closure.as_ref().unchecked_ref()) {
					error!("Could not remove {:?} listener: {:?}", event_type, error)
				}
			}
		}

		for event_type in diff.added {
			trace!("Adding delegated {:?} listener.", event_type);
			let closure = self.listener();
			if let Err(error) = self.container.add_event_listener_with_callback(&event_type, closure.as_ref().unchecked_ref()) {
				error!("Could not add {:?} listener: {:?}", event_type, error);
				continue;
			}
			self.closures.insert(event_type, closure);
		}
	}

	fn listener(&self) -> Closure<dyn Fn(Event)> {
		let container = self.container.clone();
		let host = self.host.clone();
		let registry = Rc::clone(&self.registry);
		let handler = Rc::clone(&self.handler);
		Closure::wrap(Box::new(move |event: Event| {
			let span = trace_span!("Delegated event", event_type = event.type_().as_str());
			let _enter = span.enter();

			let target = match event.target().and_then(|target| target.dyn_into::<Node>().ok()) {
				Some(target) => target,
				None => return trace!("Event target is not a node."),
			};
			let dispatch = match registry.try_borrow() {
				Ok(registry) => resolve(&host, &registry, &container, &target, &event.type_()),
				Err(error) => return error!("Event registry is busy: {}", error),
			};
			if let Some(dispatch) = dispatch {
				handler(dispatch)
			}
		}) as Box<dyn Fn(Event)>)
	}

	pub fn container(&self) -> &Node {
		&self.container
	}

	pub fn listeners(&self) -> &ListenerSet {
		&self.listeners
	}
}

impl Drop for EventDelegate {
	fn drop(&mut self) {
		for (event_type, closure) in self.closures.drain() {
			if let Err(error) = self.container.remove_event_listener_with_callback(&event_type, closure.as_ref().unchecked_ref()) {
				error!("Could not remove {:?} listener on drop: {:?}", event_type, error)
			}
		}
	}
}
