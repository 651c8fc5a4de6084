//! The live node tree the reconciler works against.
//!
//! [`Renderer`](`crate::render::Renderer`) only ever talks to a [`Host`], which keeps the reconciliation core independent of
//! any particular DOM. [`web::WebHost`](`crate::web::WebHost`) drives a browser document, [`memory::MemoryDocument`](`crate::memory::MemoryDocument`)
//! a headless tree that records every mutation.

use crate::error::HostError;
use core::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
	Element,
	Text,
	Comment,
	Other,
}

/// The value of a DOM property (as opposed to an attribute).
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
	Bool(bool),
	Text(String),
}

/// Live node operations.
///
/// All methods take `&self`. Hosts are single-threaded and the reconciler assumes it's the only writer while it runs.
pub trait Host {
	/// A cheap handle to a live node. Cloning it must not clone the node.
	type Node: Clone + Debug;

	/// # Errors
	///
	/// Iff the host rejects the tag name.
	fn create_element(&self, namespace: &str, tag: &str) -> Result<Self::Node, HostError>;
	fn create_text(&self, data: &str) -> Self::Node;
	fn create_comment(&self, data: &str) -> Self::Node;

	fn kind(&self, node: &Self::Node) -> NodeKind;
	fn same_node(&self, a: &Self::Node, b: &Self::Node) -> bool;
	/// The local name of an element, [`None`] for other nodes.
	fn local_name(&self, node: &Self::Node) -> Option<String>;
	fn namespace(&self, node: &Self::Node) -> Option<String>;
	/// The character data of a text or comment node.
	fn text(&self, node: &Self::Node) -> Option<String>;
	fn set_text(&self, node: &Self::Node, data: &str);
	fn children(&self, node: &Self::Node) -> Vec<Self::Node>;
	fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
	fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

	/// Inserts `node` before `reference`, or appends it if `reference` is [`None`].
	/// `node` is moved if it's already attached somewhere.
	///
	/// # Errors
	///
	/// Iff `reference` isn't a child of `parent` or the host rejects the insertion.
	fn insert_before(&self, parent: &Self::Node, node: &Self::Node, reference: Option<&Self::Node>) -> Result<(), HostError>;
	/// # Errors
	///
	/// Iff `old` isn't a child of `parent`.
	fn replace_child(&self, parent: &Self::Node, new: &Self::Node, old: &Self::Node) -> Result<(), HostError>;
	/// # Errors
	///
	/// Iff `child` isn't a child of `parent`.
	fn remove_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

	fn attribute(&self, element: &Self::Node, name: &str) -> Option<String>;
	fn attribute_names(&self, element: &Self::Node) -> Vec<String>;
	/// # Errors
	///
	/// Iff `element` isn't an element or the attribute name is invalid.
	fn set_attribute(&self, element: &Self::Node, name: &str, value: &str) -> Result<(), HostError>;
	/// # Errors
	///
	/// Iff `element` isn't an element.
	fn remove_attribute(&self, element: &Self::Node, name: &str) -> Result<(), HostError>;

	/// Inline style lookup by kebab-case (or `--custom`) property name.
	fn style_property(&self, element: &Self::Node, name: &str) -> Option<String>;
	fn style_names(&self, element: &Self::Node) -> Vec<String>;
	/// Whether the live inline style of `name` already is `value`, once the host has normalised it.
	///
	/// Hosts that rewrite declarations (`0` as `0px`, `#f00` as `rgb(255, 0, 0)`) should override this.
	fn style_matches(&self, element: &Self::Node, name: &str, value: &str) -> bool {
		self.style_property(element, name).as_deref() == Some(value)
	}
	/// # Errors
	///
	/// Iff `element` has no inline style.
	fn set_style_property(&self, element: &Self::Node, name: &str, value: &str) -> Result<(), HostError>;
	/// # Errors
	///
	/// Iff `element` has no inline style.
	fn remove_style_property(&self, element: &Self::Node, name: &str) -> Result<(), HostError>;

	fn property(&self, element: &Self::Node, name: &str) -> Option<PropertyValue>;
	/// # Errors
	///
	/// Iff the property can't be assigned.
	fn set_property(&self, element: &Self::Node, name: &str, value: &PropertyValue) -> Result<(), HostError>;

	/// # Errors
	///
	/// Iff the host rejects the insertion.
	fn append_child(&self, parent: &Self::Node, node: &Self::Node) -> Result<(), HostError> {
		self.insert_before(parent, node, None)
	}
}
