//! The `[tagName, attributes?, children?]` literal shape content modules author against.
//!
//! Fragments are written as `{"fragment": [...]}`.

use crate::{
	descriptor::{format_number, Atom, AttrValue, Attributes, Descriptor, Element, EventSpec, Style},
	error::DescriptorError,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::convert::TryFrom;

const FRAGMENT_KEY: &str = "fragment";

impl Descriptor {
	/// # Errors
	///
	/// Iff `literal` isn't a well-formed descriptor literal. This includes element literals with a non-string head.
	pub fn from_literal(literal: &Value) -> Result<Self, DescriptorError> {
		match literal {
			Value::Null => Ok(Self::empty()),
			Value::Bool(value) => Ok(Atom::Bool(*value).into()),
			Value::Number(number) => Ok(Atom::Number(number.as_f64().unwrap_or(f64::NAN)).into()),
			Value::String(text) => Ok(Self::text(text.as_str())),
			Value::Array(items) => element_from_literal(items).map(Self::Element),
			Value::Object(_) => match fragment_children(literal) {
				Some(children) => children.iter().map(Self::from_literal).collect::<Result<_, _>>().map(Self::Fragment),
				None => Err(DescriptorError::UnsupportedLiteral(literal.to_string())),
			},
		}
	}

	/// The literal shape of this descriptor. Elements always come out as `[tag, attributes, children]`.
	#[must_use]
	pub fn to_literal(&self) -> Value {
		match self {
			Self::Atom(Atom::Text(text)) => Value::String(text.clone()),
			Self::Atom(Atom::Number(number)) => Number::from_f64(*number).map_or(Value::Null, Value::Number),
			Self::Atom(Atom::Bool(value)) => Value::Bool(*value),
			Self::Atom(Atom::Null) => Value::Null,
			Self::Fragment(children) => {
				let mut object = Map::new();
				object.insert(FRAGMENT_KEY.to_owned(), Value::Array(children.iter().map(Self::to_literal).collect()));
				Value::Object(object)
			}
			Self::Element(element) => Value::Array(vec![
				Value::String(element.tag.clone()),
				Value::Object(attributes_to_literal(&element.attributes)),
				Value::Array(element.children.iter().map(Self::to_literal).collect()),
			]),
		}
	}
}

fn fragment_children(value: &Value) -> Option<&Vec<Value>> {
	match value {
		Value::Object(object) if object.len() == 1 => object.get(FRAGMENT_KEY).and_then(Value::as_array),
		_ => None,
	}
}

fn element_from_literal(items: &[Value]) -> Result<Element, DescriptorError> {
	let (head, rest) = items.split_first().ok_or(DescriptorError::EmptyLiteral)?;
	let tag = head.as_str().ok_or_else(|| DescriptorError::NotATag(head.to_string()))?;
	let mut element = Element::new(tag)?;

	let (attributes, children) = match rest {
		[] | [Value::Null] => (None, None),
		[attributes @ Value::Object(_)] if fragment_children(attributes).is_none() => (Some(attributes), None),
		[children] => (None, Some(children)),
		[Value::Null, children] => (None, Some(children)),
		[attributes @ Value::Object(_), children] => (Some(attributes), Some(children)),
		[other, _] => {
			return Err(DescriptorError::ExpectedObject {
				name: "attributes".to_owned(),
				value: other.to_string(),
			})
		}
		_ => return Err(DescriptorError::UnsupportedLiteral(Value::Array(items.to_vec()).to_string())),
	};

	if let Some(Value::Object(attributes)) = attributes {
		element.attributes = attributes_from_literal(attributes)?;
	}

	match children {
		None => (),
		Some(Value::Array(children)) => element.children = children.iter().map(Descriptor::from_literal).collect::<Result<_, _>>()?,
		Some(child) => element.children.push(Descriptor::from_literal(child)?),
	}

	Ok(element)
}

fn attributes_from_literal(object: &Map<String, Value>) -> Result<Attributes, DescriptorError> {
	let mut attributes = Attributes::default();
	let mut class_list = None;

	for (name, value) in object {
		match name.as_str() {
			"ns" => {
				attributes.namespace = match value {
					Value::Null => None,
					Value::String(namespace) => Some(namespace.clone()),
					other => return Err(unsupported(name, other)),
				}
			}
			// `null` clears, while the string "undefined" is kept verbatim.
			"className" => attributes.class = attr_value(name, value)?.to_attribute_value(),
			"classList" => class_list = attr_value(name, value)?.to_attribute_value(),
			"style" => attributes.style = style_from_literal(name, value)?,
			"dataset" => {
				for (key, value) in object_entries(name, value)? {
					if let Some(value) = attr_value(name, value)?.to_attribute_value() {
						attributes.dataset.insert(key.clone(), value);
					}
				}
			}
			"events" => {
				let events: EventSpec = object_entries(name, value)?.map(|(event_type, payload)| (event_type.clone(), payload.clone())).collect();
				attributes.events = if value.is_null() { None } else { Some(events) };
			}
			_ => {
				attributes.other.insert(name.clone(), attr_value(name, value)?);
			}
		}
	}

	match class_list {
		Some(list) if !list.is_empty() => {
			attributes.class = Some(match attributes.class.take() {
				Some(class) if !class.is_empty() => format!("{} {}", class, list),
				_ => list,
			})
		}
		_ => (),
	}

	Ok(attributes)
}

/// `null` is treated like an empty object.
fn object_entries<'a>(name: &str, value: &'a Value) -> Result<Box<dyn Iterator<Item = (&'a String, &'a Value)> + 'a>, DescriptorError> {
	match value {
		Value::Object(object) => Ok(Box::new(object.iter())),
		Value::Null => Ok(Box::new(std::iter::empty())),
		other => Err(DescriptorError::ExpectedObject {
			name: name.to_owned(),
			value: other.to_string(),
		}),
	}
}

fn style_from_literal(name: &str, value: &Value) -> Result<Style, DescriptorError> {
	object_entries(name, value)?
		.map(|(property, value)| {
			let value = match value {
				Value::Null => None,
				Value::String(text) => Some(text.clone()),
				Value::Number(number) => Some(format_number(number.as_f64().unwrap_or(f64::NAN))),
				other => return Err(unsupported(property, other)),
			};
			Ok((property.clone(), value))
		})
		.collect()
}

fn attr_value(name: &str, value: &Value) -> Result<AttrValue, DescriptorError> {
	Ok(match value {
		Value::Null => AttrValue::Null,
		Value::Bool(value) => AttrValue::Bool(*value),
		Value::Number(number) => AttrValue::Number(number.as_f64().unwrap_or(f64::NAN)),
		Value::String(text) => AttrValue::Text(text.clone()),
		Value::Array(items) => AttrValue::List(items.iter().map(|item| attr_value(name, item)).collect::<Result<_, _>>()?),
		Value::Object(_) => return Err(unsupported(name, value)),
	})
}

fn unsupported(name: &str, value: &Value) -> DescriptorError {
	DescriptorError::UnsupportedAttributeValue {
		name: name.to_owned(),
		value: value.to_string(),
	}
}

fn attributes_to_literal(attributes: &Attributes) -> Map<String, Value> {
	let mut object = Map::new();
	if let Some(namespace) = &attributes.namespace {
		object.insert("ns".to_owned(), Value::String(namespace.clone()));
	}
	if let Some(class) = &attributes.class {
		object.insert("className".to_owned(), Value::String(class.clone()));
	}
	if !attributes.style.is_empty() {
		let style = attributes
			.style
			.iter()
			.map(|(property, value)| (property.clone(), value.clone().map_or(Value::Null, Value::String)))
			.collect();
		object.insert("style".to_owned(), Value::Object(style));
	}
	if !attributes.dataset.is_empty() {
		let dataset = attributes.dataset.iter().map(|(key, value)| (key.clone(), Value::String(value.clone()))).collect();
		object.insert("dataset".to_owned(), Value::Object(dataset));
	}
	if let Some(events) = &attributes.events {
		object.insert("events".to_owned(), Value::Object(events.clone().into_iter().collect()));
	}
	for (name, value) in &attributes.other {
		object.insert(name.clone(), attr_value_to_literal(value));
	}
	object
}

fn attr_value_to_literal(value: &AttrValue) -> Value {
	match value {
		AttrValue::Null => Value::Null,
		AttrValue::Bool(value) => Value::Bool(*value),
		AttrValue::Number(number) => Number::from_f64(*number).map_or(Value::Null, Value::Number),
		AttrValue::Text(text) => Value::String(text.clone()),
		AttrValue::List(items) => Value::Array(items.iter().map(attr_value_to_literal).collect()),
	}
}

impl TryFrom<&Value> for Descriptor {
	type Error = DescriptorError;

	fn try_from(literal: &Value) -> Result<Self, Self::Error> {
		Self::from_literal(literal)
	}
}

impl Serialize for Descriptor {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.to_literal().serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for Descriptor {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let literal = Value::deserialize(deserializer)?;
		Self::from_literal(&literal).map_err(serde::de::Error::custom)
	}
}
