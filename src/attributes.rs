//! Reconciles a descriptor's [`Attributes`] onto a live element.
//!
//! There's no record of what was applied last time: The current state is read back from the element,
//! and only differing values are written. This makes repeated passes with the same descriptor free of mutations.

use crate::{
	descriptor::{AttrValue, Attributes},
	events::{EventRegistry, EVENT_SOURCE_ATTRIBUTE},
	host::{Host, PropertyValue},
	temp_set::TempNameSet,
};
use std::borrow::Cow;
use tracing::{instrument, trace, warn};

/// Assigned as DOM properties, coerced to `bool`.
pub const BOOLEAN_PROPERTIES: &[&str] = &["disabled", "hidden", "readOnly", "required", "multiple", "autofocus", "open", "muted", "autoplay", "controls", "loop"];

/// Properties the user can change. They are compared against the live value before each write,
/// since redundant writes reset cursor position and selection.
pub const LIVE_PROPERTIES: &[&str] = &["value", "checked", "selected"];

#[instrument(skip(host, attributes, registry, scratch))]
pub(crate) fn reconcile<H: Host>(host: &H, element: &H::Node, attributes: &Attributes, registry: &mut EventRegistry, scratch: &mut TempNameSet) {
	let mut desired = Vec::with_capacity(attributes.other.len() + attributes.dataset.len() + 2);

	if let Some(class) = &attributes.class {
		desired.push((Cow::Borrowed("class"), Cow::Borrowed(class.as_str())));
	}
	for (key, value) in &attributes.dataset {
		desired.push((Cow::Owned(format!("data-{}", kebab_case(key))), Cow::Borrowed(value.as_str())));
	}
	if let Some(events) = &attributes.events {
		let id = registry.register(events.clone());
		desired.push((Cow::Borrowed(EVENT_SOURCE_ATTRIBUTE), Cow::Owned(id.to_string())));
	}
	for (name, value) in &attributes.other {
		if is_property(name) {
			continue;
		}
		if let Some(value) = value.to_attribute_value() {
			desired.push((Cow::Borrowed(name.as_str()), Cow::Owned(value)));
		}
	}

	for (name, value) in &desired {
		if host.attribute(element, name).as_deref() == Some(value.as_ref()) {
			continue;
		}
		if let Err(error) = host.set_attribute(element, name, value) {
			warn!("Could not set attribute {:?}: {}", name, error);
		}
	}

	let keep = scratch.temp();
	keep.extend(desired.into_iter().map(|(name, _)| name.into_owned()));
	for name in host.attribute_names(element) {
		if keep.contains(&name) || name == "style" || is_property(&name) {
			continue;
		}
		trace!("Removing stale attribute {:?}.", name);
		if let Err(error) = host.remove_attribute(element, &name) {
			warn!("Could not remove attribute {:?}: {}", name, error);
		}
	}

	reconcile_style(host, element, attributes, scratch);
	reconcile_properties(host, element, attributes);
}

fn reconcile_style<H: Host>(host: &H, element: &H::Node, attributes: &Attributes, scratch: &mut TempNameSet) {
	let keep = scratch.temp();
	for (property, value) in &attributes.style {
		let name = style_name(property);
		match value {
			Some(value) => {
				if !host.style_matches(element, &name, value) {
					if let Err(error) = host.set_style_property(element, &name, value) {
						warn!("Could not set style property {:?}: {}", name, error);
					}
				}
				keep.insert(name.into_owned());
			}
			None => {
				if host.style_property(element, &name).is_some() {
					if let Err(error) = host.remove_style_property(element, &name) {
						warn!("Could not remove style property {:?}: {}", name, error);
					}
				}
			}
		}
	}

	for name in host.style_names(element) {
		// Shorthands show up as their longhands (`margin` as `margin-top` and so on).
		let covered = keep.contains(&name) || keep.iter().any(|kept| name.starts_with(kept.as_str()) && name[kept.len()..].starts_with('-'));
		if covered {
			continue;
		}
		trace!("Removing stale style property {:?}.", name);
		if let Err(error) = host.remove_style_property(element, &name) {
			warn!("Could not remove style property {:?}: {}", name, error);
		}
	}
}

fn reconcile_properties<H: Host>(host: &H, element: &H::Node, attributes: &Attributes) {
	for &name in BOOLEAN_PROPERTIES {
		let value = attributes.other.get(name).or_else(|| attributes.other.get(&name.to_ascii_lowercase()));
		let desired = value.map_or(false, |value| is_truthy(name, value));
		let live = host.property(element, name) == Some(PropertyValue::Bool(true));
		if desired != live {
			set_property(host, element, name, &PropertyValue::Bool(desired));
		}
	}

	for &name in LIVE_PROPERTIES {
		// Absent keys leave whatever the user did alone.
		let value = match attributes.other.get(name) {
			Some(value) => value,
			None => continue,
		};
		let desired = if name == "value" {
			PropertyValue::Text(value.to_attribute_value().unwrap_or_default())
		} else {
			PropertyValue::Bool(is_truthy(name, value))
		};
		if host.property(element, name).as_ref() == Some(&desired) {
			trace!("Eliding unchanged {:?} write.", name);
			continue;
		}
		set_property(host, element, name, &desired);
	}
}

fn set_property<H: Host>(host: &H, element: &H::Node, name: &str, value: &PropertyValue) {
	if let Err(error) = host.set_property(element, name, value) {
		warn!("Could not set property {:?}: {}", name, error);
	}
}

/// `true`, or the property's own name as a string. Anything else (including `1`) is `false`.
fn is_truthy(name: &str, value: &AttrValue) -> bool {
	match value {
		AttrValue::Bool(value) => *value,
		AttrValue::Text(text) => text == name || text.eq_ignore_ascii_case(name),
		_ => false,
	}
}

fn is_property(name: &str) -> bool {
	BOOLEAN_PROPERTIES.iter().chain(LIVE_PROPERTIES).any(|property| property.eq_ignore_ascii_case(name))
}

fn style_name(property: &str) -> Cow<'_, str> {
	if property.starts_with("--") || !property.bytes().any(|b| b.is_ascii_uppercase()) {
		Cow::Borrowed(property)
	} else {
		Cow::Owned(kebab_case(property))
	}
}

/// `fontSize` -> `font-size`, `WebkitTransform` -> `-webkit-transform`.
#[must_use]
pub fn kebab_case(name: &str) -> String {
	let mut kebab = String::with_capacity(name.len() + 4);
	for c in name.chars() {
		if c.is_ascii_uppercase() {
			kebab.push('-');
			kebab.push(c.to_ascii_lowercase());
		} else {
			kebab.push(c);
		}
	}
	kebab
}

/// The inverse of [`kebab_case`].
#[must_use]
pub fn camel_case(name: &str) -> String {
	let mut camel = String::with_capacity(name.len());
	let mut upper = false;
	for c in name.chars() {
		if c == '-' {
			upper = true;
		} else if upper {
			camel.push(c.to_ascii_uppercase());
			upper = false;
		} else {
			camel.push(c);
		}
	}
	camel
}
