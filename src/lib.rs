#![doc(html_root_url = "https://docs.rs/folio-dom/0.0.3")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

mod attributes;
mod rc_hash_map;
mod temp_set;

pub mod components;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod host;
pub mod literal;
pub mod load;
pub mod memory;
pub mod mount;
pub mod namespace;
pub mod render;
pub mod web;
pub mod widget;

pub use attributes::{camel_case, kebab_case, BOOLEAN_PROPERTIES, LIVE_PROPERTIES};
pub use descriptor::{Atom, AttrValue, Attributes, Descriptor, Element};
pub use error::{DescriptorError, HostError, RenderError, WidgetError};
pub use render::{RenderOptions, Rendered, Renderer};
