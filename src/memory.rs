//! A headless [`Host`] that records every mutation it performs.
//!
//! Useful for rendering outside a browser and for asserting exactly which writes a reconciliation pass made.

use crate::{
	error::HostError,
	host::{Host, NodeKind, PropertyValue},
	namespace,
};
use core::fmt::{self, Debug, Formatter, Write as _};
use std::{
	cell::RefCell,
	collections::BTreeMap,
	rc::{Rc, Weak},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
	CreateElement { namespace: String, tag: String },
	CreateText { data: String },
	CreateComment { data: String },
	SetText { data: String },
	Insert,
	Replace,
	Remove,
	SetAttribute { name: String, value: String },
	RemoveAttribute { name: String },
	SetStyle { name: String, value: String },
	RemoveStyle { name: String },
	SetProperty { name: String, value: PropertyValue },
}

/// A handle to a node of a [`MemoryDocument`]. Equality is identity.
#[derive(Clone)]
pub struct MemoryNode(Rc<RefCell<NodeData>>);

struct NodeData {
	data: Data,
	parent: Weak<RefCell<NodeData>>,
	children: Vec<MemoryNode>,
}

enum Data {
	Element(ElementData),
	Text(String),
	Comment(String),
}

struct ElementData {
	namespace: String,
	local_name: String,
	attributes: Vec<(String, String)>,
	style: Vec<(String, String)>,
	properties: BTreeMap<String, PropertyValue>,
}

#[derive(Debug, Default)]
pub struct MemoryDocument {
	journal: RefCell<Vec<Mutation>>,
}

impl PartialEq for MemoryNode {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}
impl Eq for MemoryNode {}

impl Debug for MemoryNode {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match &self.0.borrow().data {
			Data::Element(element) => write!(f, "<{}>", element.local_name),
			Data::Text(text) => {
				if cfg!(feature = "dangerous-logging") {
					write!(f, "#text {:?}", text)
				} else {
					write!(f, "#text ({} bytes)", text.len())
				}
			}
			Data::Comment(_) => f.write_str("#comment"),
		}
	}
}

impl MemoryNode {
	fn new(data: Data) -> Self {
		Self(Rc::new(RefCell::new(NodeData {
			data,
			parent: Weak::new(),
			children: Vec::new(),
		})))
	}

	fn with_element<T>(&self, f: impl FnOnce(&mut ElementData) -> T) -> Result<T, HostError> {
		match &mut self.0.borrow_mut().data {
			Data::Element(element) => Ok(f(element)),
			_ => Err(HostError::NotAnElement),
		}
	}

	fn read_element<T>(&self, f: impl FnOnce(&ElementData) -> Option<T>) -> Option<T> {
		match &self.0.borrow().data {
			Data::Element(element) => f(element),
			_ => None,
		}
	}

	fn parent(&self) -> Option<MemoryNode> {
		self.0.borrow().parent.upgrade().map(MemoryNode)
	}

	fn index_of(&self, child: &MemoryNode) -> Option<usize> {
		self.0.borrow().children.iter().position(|c| c == child)
	}

	fn detach(&self) {
		if let Some(parent) = self.parent() {
			parent.0.borrow_mut().children.retain(|c| c != self);
		}
		self.0.borrow_mut().parent = Weak::new();
	}
}

impl MemoryDocument {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// An unattached HTML element to render into. Its creation isn't journaled.
	#[must_use]
	pub fn create_container(&self, tag: &str) -> MemoryNode {
		MemoryNode::new(Data::Element(ElementData {
			namespace: namespace::HTML.to_owned(),
			local_name: tag.to_owned(),
			attributes: Vec::new(),
			style: Vec::new(),
			properties: BTreeMap::new(),
		}))
	}

	#[must_use]
	pub fn mutations(&self) -> Vec<Mutation> {
		self.journal.borrow().clone()
	}

	pub fn take_mutations(&self) -> Vec<Mutation> {
		self.journal.take()
	}

	pub fn clear_mutations(&self) {
		self.journal.borrow_mut().clear()
	}

	/// Sets a property the way user interaction would, without journaling it.
	///
	/// # Errors
	///
	/// Iff `element` isn't an element.
	pub fn user_input(&self, element: &MemoryNode, name: &str, value: PropertyValue) -> Result<(), HostError> {
		element.with_element(|element| {
			element.properties.insert(name.to_owned(), value);
		})
	}

	/// Serialises `node` as markup, for assertions. Properties aren't included.
	#[must_use]
	pub fn outer_html(&self, node: &MemoryNode) -> String {
		let mut html = String::new();
		write_html(&mut html, node);
		html
	}

	fn record(&self, mutation: Mutation) {
		self.journal.borrow_mut().push(mutation)
	}
}

fn write_html(html: &mut String, node: &MemoryNode) {
	let data = node.0.borrow();
	match &data.data {
		Data::Text(text) => html.push_str(&escape(text)),
		Data::Comment(comment) => {
			let _ = write!(html, "<!--{}-->", comment);
		}
		Data::Element(element) => {
			html.push('<');
			html.push_str(&element.local_name);
			for (name, value) in &element.attributes {
				let _ = write!(html, " {}=\"{}\"", name, escape(value));
			}
			if !element.style.is_empty() {
				let style = element.style.iter().map(|(name, value)| format!("{}: {}", name, value)).collect::<Vec<_>>().join("; ");
				let _ = write!(html, " style=\"{}\"", escape(&style));
			}
			html.push('>');
			for child in &data.children {
				write_html(html, child);
			}
			let _ = write!(html, "</{}>", element.local_name);
		}
	}
}

fn escape(text: &str) -> String {
	text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

impl Host for MemoryDocument {
	type Node = MemoryNode;

	fn create_element(&self, namespace: &str, tag: &str) -> Result<MemoryNode, HostError> {
		if tag.is_empty() || tag.chars().any(char::is_whitespace) {
			return Err(HostError::CreateElement {
				tag: tag.to_owned(),
				namespace: namespace.to_owned(),
				message: "invalid character".to_owned(),
			});
		}
		self.record(Mutation::CreateElement {
			namespace: namespace.to_owned(),
			tag: tag.to_owned(),
		});
		// Like `document.createElementNS`, HTML names are lowercased.
		let local_name = if namespace == namespace::HTML { tag.to_ascii_lowercase() } else { tag.to_owned() };
		Ok(MemoryNode::new(Data::Element(ElementData {
			namespace: namespace.to_owned(),
			local_name,
			attributes: Vec::new(),
			style: Vec::new(),
			properties: BTreeMap::new(),
		})))
	}

	fn create_text(&self, data: &str) -> MemoryNode {
		self.record(Mutation::CreateText { data: data.to_owned() });
		MemoryNode::new(Data::Text(data.to_owned()))
	}

	fn create_comment(&self, data: &str) -> MemoryNode {
		self.record(Mutation::CreateComment { data: data.to_owned() });
		MemoryNode::new(Data::Comment(data.to_owned()))
	}

	fn kind(&self, node: &MemoryNode) -> NodeKind {
		match node.0.borrow().data {
			Data::Element(_) => NodeKind::Element,
			Data::Text(_) => NodeKind::Text,
			Data::Comment(_) => NodeKind::Comment,
		}
	}

	fn same_node(&self, a: &MemoryNode, b: &MemoryNode) -> bool {
		a == b
	}

	fn local_name(&self, node: &MemoryNode) -> Option<String> {
		node.read_element(|element| Some(element.local_name.clone()))
	}

	fn namespace(&self, node: &MemoryNode) -> Option<String> {
		node.read_element(|element| Some(element.namespace.clone()))
	}

	fn text(&self, node: &MemoryNode) -> Option<String> {
		match &node.0.borrow().data {
			Data::Text(data) | Data::Comment(data) => Some(data.clone()),
			Data::Element(_) => None,
		}
	}

	fn set_text(&self, node: &MemoryNode, data: &str) {
		if let Data::Text(text) | Data::Comment(text) = &mut node.0.borrow_mut().data {
			*text = data.to_owned();
			self.record(Mutation::SetText { data: data.to_owned() });
		}
	}

	fn children(&self, node: &MemoryNode) -> Vec<MemoryNode> {
		node.0.borrow().children.clone()
	}

	fn parent(&self, node: &MemoryNode) -> Option<MemoryNode> {
		node.parent()
	}

	fn next_sibling(&self, node: &MemoryNode) -> Option<MemoryNode> {
		let parent = node.parent()?;
		let index = parent.index_of(node)?;
		let next = parent.0.borrow().children.get(index + 1).cloned();
		next
	}

	fn insert_before(&self, parent: &MemoryNode, node: &MemoryNode, reference: Option<&MemoryNode>) -> Result<(), HostError> {
		if reference == Some(node) {
			return Ok(());
		}
		node.detach();
		let index = match reference {
			Some(reference) => parent.index_of(reference).ok_or_else(|| HostError::Insert("reference node is not a child of the parent".to_owned()))?,
			None => parent.0.borrow().children.len(),
		};
		parent.0.borrow_mut().children.insert(index, node.clone());
		node.0.borrow_mut().parent = Rc::downgrade(&parent.0);
		self.record(Mutation::Insert);
		Ok(())
	}

	fn replace_child(&self, parent: &MemoryNode, new: &MemoryNode, old: &MemoryNode) -> Result<(), HostError> {
		if parent.index_of(old).is_none() {
			return Err(HostError::Replace("node to replace is not a child of the parent".to_owned()));
		}
		if new == old {
			return Ok(());
		}
		new.detach();
		let index = parent.index_of(old).ok_or_else(|| HostError::Replace("node to replace was moved".to_owned()))?;
		parent.0.borrow_mut().children[index] = new.clone();
		new.0.borrow_mut().parent = Rc::downgrade(&parent.0);
		old.0.borrow_mut().parent = Weak::new();
		self.record(Mutation::Replace);
		Ok(())
	}

	fn remove_child(&self, parent: &MemoryNode, child: &MemoryNode) -> Result<(), HostError> {
		let index = parent.index_of(child).ok_or_else(|| HostError::Remove("node is not a child of the parent".to_owned()))?;
		parent.0.borrow_mut().children.remove(index);
		child.0.borrow_mut().parent = Weak::new();
		self.record(Mutation::Remove);
		Ok(())
	}

	fn attribute(&self, element: &MemoryNode, name: &str) -> Option<String> {
		element.read_element(|element| element.attributes.iter().find(|(n, _)| n == name).map(|(_, value)| value.clone()))
	}

	fn attribute_names(&self, element: &MemoryNode) -> Vec<String> {
		element.read_element(|element| Some(element.attributes.iter().map(|(name, _)| name.clone()).collect())).unwrap_or_default()
	}

	fn set_attribute(&self, element: &MemoryNode, name: &str, value: &str) -> Result<(), HostError> {
		if name.is_empty() || name.chars().any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '>' | '/' | '=')) {
			return Err(HostError::Attribute {
				name: name.to_owned(),
				message: "invalid character".to_owned(),
			});
		}
		element.with_element(|element| match element.attributes.iter_mut().find(|(n, _)| n == name) {
			Some((_, existing)) => *existing = value.to_owned(),
			None => element.attributes.push((name.to_owned(), value.to_owned())),
		})?;
		self.record(Mutation::SetAttribute {
			name: name.to_owned(),
			value: value.to_owned(),
		});
		Ok(())
	}

	fn remove_attribute(&self, element: &MemoryNode, name: &str) -> Result<(), HostError> {
		element.with_element(|element| element.attributes.retain(|(n, _)| n != name))?;
		self.record(Mutation::RemoveAttribute { name: name.to_owned() });
		Ok(())
	}

	fn style_property(&self, element: &MemoryNode, name: &str) -> Option<String> {
		element.read_element(|element| element.style.iter().find(|(n, _)| n == name).map(|(_, value)| value.clone()))
	}

	fn style_names(&self, element: &MemoryNode) -> Vec<String> {
		element.read_element(|element| Some(element.style.iter().map(|(name, _)| name.clone()).collect())).unwrap_or_default()
	}

	fn set_style_property(&self, element: &MemoryNode, name: &str, value: &str) -> Result<(), HostError> {
		element.with_element(|element| match element.style.iter_mut().find(|(n, _)| n == name) {
			Some((_, existing)) => *existing = value.to_owned(),
			None => element.style.push((name.to_owned(), value.to_owned())),
		})?;
		self.record(Mutation::SetStyle {
			name: name.to_owned(),
			value: value.to_owned(),
		});
		Ok(())
	}

	fn remove_style_property(&self, element: &MemoryNode, name: &str) -> Result<(), HostError> {
		element.with_element(|element| element.style.retain(|(n, _)| n != name))?;
		self.record(Mutation::RemoveStyle { name: name.to_owned() });
		Ok(())
	}

	fn property(&self, element: &MemoryNode, name: &str) -> Option<PropertyValue> {
		element.read_element(|element| element.properties.get(name).cloned())
	}

	fn set_property(&self, element: &MemoryNode, name: &str, value: &PropertyValue) -> Result<(), HostError> {
		element.with_element(|element| element.properties.insert(name.to_owned(), value.clone()))?;
		self.record(Mutation::SetProperty {
			name: name.to_owned(),
			value: value.clone(),
		});
		Ok(())
	}
}
