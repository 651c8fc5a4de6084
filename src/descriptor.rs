//! The plain-data tree literal that describes the desired shape of a DOM subtree.
//!
//! A [`Descriptor`] never refers to a live node.
//! It is validated when it's constructed, so the reconciler only ever sees well-formed trees.

use crate::error::DescriptorError;
use serde_json::Value;
use std::{borrow::Cow, collections::BTreeMap};

/// Inline style declarations keyed by camelCase (or `--custom`) property name.
///
/// A [`None`] value removes the property.
pub type Style = BTreeMap<String, Option<String>>;

/// Event type to payload, as handed to the widget when that event is delegated to the element.
pub type EventSpec = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
	Element(Element),
	/// Spliced into the parent's child list in place. May nest.
	Fragment(Vec<Descriptor>),
	Atom(Atom),
}

/// Leaf values. [`Atom::Null`] stands in for both `null` and `undefined`.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
	Text(String),
	Number(f64),
	Bool(bool),
	Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
	pub(crate) tag: String,
	pub(crate) attributes: Attributes,
	pub(crate) children: Vec<Descriptor>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
	/// Explicit namespace URI. Inherited from the parent context if [`None`].
	pub namespace: Option<String>,
	/// [`None`] removes the `class` attribute entirely.
	pub class: Option<String>,
	pub style: Style,
	/// camelCase keys, rendered as `data-kebab-case` attributes.
	pub dataset: BTreeMap<String, String>,
	pub events: Option<EventSpec>,
	/// Everything else: boolean and live properties as well as generic attributes.
	pub other: BTreeMap<String, AttrValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
	Null,
	Bool(bool),
	Number(f64),
	Text(String),
	/// Serialised space-separated, with nested lists comma-separated (`[[0, 0], [1, 2]]` -> `"0,0 1,2"`).
	List(Vec<AttrValue>),
}

/// A child after fragment flattening: Either an element or the text of an atom.
#[derive(Debug, Clone, PartialEq)]
pub enum Child<'a> {
	Element(&'a Element),
	Text(Cow<'a, str>),
}

impl Descriptor {
	pub fn text(text: impl Into<String>) -> Self {
		Self::Atom(Atom::Text(text.into()))
	}

	/// A descriptor that renders nothing inside a child list.
	#[must_use]
	pub fn empty() -> Self {
		Self::Atom(Atom::Null)
	}

	pub fn fragment<I, D>(children: I) -> Self
	where
		I: IntoIterator<Item = D>,
		D: Into<Descriptor>,
	{
		Self::Fragment(children.into_iter().map(Into::into).collect())
	}

	#[must_use]
	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Self::Element(element) => Some(element),
			_ => None,
		}
	}
}

impl Atom {
	/// Whether this atom renders nothing when it appears in a child list.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		matches!(self, Self::Null | Self::Bool(false))
	}

	#[must_use]
	pub fn text(&self) -> Cow<'_, str> {
		match self {
			Self::Text(text) => Cow::Borrowed(text),
			Self::Number(number) => Cow::Owned(format_number(*number)),
			Self::Bool(true) => Cow::Borrowed("true"),
			Self::Bool(false) => Cow::Borrowed("false"),
			Self::Null => Cow::Borrowed(""),
		}
	}
}

impl Element {
	/// # Errors
	///
	/// Iff `tag` is empty, doesn't start with an ASCII letter or contains whitespace or markup characters.
	pub fn new(tag: impl Into<String>) -> Result<Self, DescriptorError> {
		let tag = tag.into();
		validate_tag(&tag)?;
		Ok(Self {
			tag,
			attributes: Attributes::default(),
			children: Vec::new(),
		})
	}

	#[must_use]
	pub fn tag(&self) -> &str {
		&self.tag
	}

	#[must_use]
	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	pub fn attributes_mut(&mut self) -> &mut Attributes {
		&mut self.attributes
	}

	#[must_use]
	pub fn children(&self) -> &[Descriptor] {
		&self.children
	}

	pub fn children_mut(&mut self) -> &mut Vec<Descriptor> {
		&mut self.children
	}

	#[must_use]
	pub fn ns(mut self, namespace: impl Into<String>) -> Self {
		self.attributes.namespace = Some(namespace.into());
		self
	}

	#[must_use]
	pub fn class(mut self, class: impl Into<String>) -> Self {
		self.attributes.class = Some(class.into());
		self
	}

	/// Explicitly clears `class`. Unlike `.class("undefined")`, this removes the attribute.
	#[must_use]
	pub fn clear_class(mut self) -> Self {
		self.attributes.class = None;
		self
	}

	#[must_use]
	pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.style.insert(property.into(), Some(value.into()));
		self
	}

	#[must_use]
	pub fn remove_style(mut self, property: impl Into<String>) -> Self {
		self.attributes.style.insert(property.into(), None);
		self
	}

	#[must_use]
	pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.dataset.insert(key.into(), value.into());
		self
	}

	#[must_use]
	pub fn on(mut self, event_type: impl Into<String>, payload: impl Into<Value>) -> Self {
		self.attributes.events.get_or_insert_with(EventSpec::new).insert(event_type.into(), payload.into());
		self
	}

	#[must_use]
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
		self.attributes.other.insert(name.into(), value.into());
		self
	}

	#[must_use]
	pub fn child(mut self, child: impl Into<Descriptor>) -> Self {
		self.children.push(child.into());
		self
	}

	#[must_use]
	pub fn children_from<I, D>(mut self, children: I) -> Self
	where
		I: IntoIterator<Item = D>,
		D: Into<Descriptor>,
	{
		self.children.extend(children.into_iter().map(Into::into));
		self
	}
}

impl AttrValue {
	/// The attribute string, or [`None`] if the attribute should be absent.
	#[must_use]
	pub fn to_attribute_value(&self) -> Option<String> {
		match self {
			Self::Null => None,
			value => Some(value.serialize(" ")),
		}
	}

	fn serialize(&self, separator: &str) -> String {
		match self {
			Self::Null => String::new(),
			Self::Bool(value) => value.to_string(),
			Self::Number(number) => format_number(*number),
			Self::Text(text) => text.clone(),
			Self::List(items) => items.iter().map(|item| item.serialize(",")).collect::<Vec<_>>().join(separator),
		}
	}
}

/// Formats `number` the way a JavaScript `String(number)` would.
///
/// Magnitudes from `1e21` up and below `1e-6` use exponent notation (`1e+21`, `1.5e-7`).
#[must_use]
pub fn format_number(number: f64) -> String {
	if number.is_nan() {
		"NaN".to_owned()
	} else if number.is_infinite() {
		let infinity = if number > 0.0 { "Infinity" } else { "-Infinity" };
		infinity.to_owned()
	} else if number == 0.0 {
		// Also covers `-0`.
		"0".to_owned()
	} else if number.abs() >= 1e21 || number.abs() < 1e-6 {
		let exponential = format!("{:e}", number);
		match exponential.find('e') {
			Some(e) if !exponential[e + 1..].starts_with('-') => format!("{}e+{}", &exponential[..e], &exponential[e + 1..]),
			_ => exponential,
		}
	} else {
		number.to_string()
	}
}

fn validate_tag(tag: &str) -> Result<(), DescriptorError> {
	let starts_with_letter = tag.chars().next().map_or(false, |first| first.is_ascii_alphabetic());
	if !starts_with_letter || tag.chars().any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '/' | '"' | '\'' | '=')) {
		return Err(DescriptorError::InvalidTag(tag.to_owned()));
	}
	Ok(())
}

/// Splices (nested) fragments into one list and drops atoms that render nothing.
#[must_use]
pub fn flatten(children: &[Descriptor]) -> Vec<Child<'_>> {
	let mut flat = Vec::with_capacity(children.len());
	flatten_into(children, &mut flat);
	flat
}

fn flatten_into<'a>(children: &'a [Descriptor], flat: &mut Vec<Child<'a>>) {
	for child in children {
		match child {
			Descriptor::Element(element) => flat.push(Child::Element(element)),
			Descriptor::Fragment(nested) => flatten_into(nested, flat),
			Descriptor::Atom(atom) if atom.is_empty() => (),
			Descriptor::Atom(atom) => flat.push(Child::Text(atom.text())),
		}
	}
}

impl From<Element> for Descriptor {
	fn from(element: Element) -> Self {
		Self::Element(element)
	}
}

impl From<Atom> for Descriptor {
	fn from(atom: Atom) -> Self {
		Self::Atom(atom)
	}
}

impl From<&str> for Descriptor {
	fn from(text: &str) -> Self {
		Self::text(text)
	}
}

impl From<String> for Descriptor {
	fn from(text: String) -> Self {
		Self::text(text)
	}
}

impl From<f64> for Descriptor {
	fn from(number: f64) -> Self {
		Self::Atom(Atom::Number(number))
	}
}

impl From<i32> for Descriptor {
	fn from(number: i32) -> Self {
		Self::Atom(Atom::Number(number.into()))
	}
}

impl From<bool> for Descriptor {
	fn from(value: bool) -> Self {
		Self::Atom(Atom::Bool(value))
	}
}

impl<T: Into<Descriptor>> From<Option<T>> for Descriptor {
	fn from(value: Option<T>) -> Self {
		value.map_or_else(Self::empty, Into::into)
	}
}

impl From<&str> for AttrValue {
	fn from(text: &str) -> Self {
		Self::Text(text.to_owned())
	}
}

impl From<String> for AttrValue {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<f64> for AttrValue {
	fn from(number: f64) -> Self {
		Self::Number(number)
	}
}

impl From<i32> for AttrValue {
	fn from(number: i32) -> Self {
		Self::Number(number.into())
	}
}

impl From<bool> for AttrValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl<T: Into<AttrValue>> From<Vec<T>> for AttrValue {
	fn from(items: Vec<T>) -> Self {
		Self::List(items.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numbers_format_like_javascript() {
		assert_eq!(format_number(1.0), "1");
		assert_eq!(format_number(-0.0), "0");
		assert_eq!(format_number(2.5), "2.5");
		assert_eq!(format_number(f64::INFINITY), "Infinity");
		assert_eq!(format_number(f64::NAN), "NaN");
	}

	#[test]
	fn extreme_magnitudes_use_exponents() {
		assert_eq!(format_number(1e21), "1e+21");
		assert_eq!(format_number(-2.5e22), "-2.5e+22");
		assert_eq!(format_number(1e-7), "1e-7");
		assert_eq!(format_number(1.5e-7), "1.5e-7");
		assert_eq!(format_number(123_456_789_012_345_680_000.0), "123456789012345680000");
		assert_eq!(format_number(0.000_001), "0.000001");
	}

	#[test]
	fn nested_lists_join_with_commas() {
		let points = AttrValue::from(vec![vec![0, 0], vec![1, 2]]);
		assert_eq!(points.to_attribute_value().as_deref(), Some("0,0 1,2"));
		let view_box = AttrValue::from(vec![0, 0, 100, 50]);
		assert_eq!(view_box.to_attribute_value().as_deref(), Some("0 0 100 50"));
		assert_eq!(AttrValue::Null.to_attribute_value(), None);
	}

	#[test]
	fn tags_are_validated() {
		assert!(Element::new("div").is_ok());
		assert!(Element::new("x-knob").is_ok());
		assert_eq!(Element::new(""), Err(DescriptorError::InvalidTag(String::new())));
		assert!(Element::new("1div").is_err());
		assert!(Element::new("di v").is_err());
		assert!(Element::new("<div>").is_err());
	}

	#[test]
	fn empty_atoms_are_dropped_by_flatten() {
		let children = vec![Descriptor::empty(), false.into(), true.into(), Descriptor::fragment(vec![Descriptor::empty(), 3.into()])];
		assert_eq!(flatten(&children), vec![Child::Text("true".into()), Child::Text("3".into())]);
	}
}
