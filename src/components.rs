//! Per-renderer component registration.
//!
//! A registered tag still renders as its own element, but its content comes from the component function,
//! which receives the descriptor (attributes and authored children included).

use crate::descriptor::{Descriptor, Element};
use core::fmt::{self, Debug, Formatter};
use hashbrown::HashMap;
use std::rc::Rc;

pub type ComponentFn = dyn Fn(&Element) -> Vec<Descriptor>;

#[derive(Default, Clone)]
pub struct Components {
	map: HashMap<String, Rc<ComponentFn>>,
}

impl Debug for Components {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.map.keys()).finish()
	}
}

impl Components {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `component` for `tag`, returning the previous registration if there was one.
	pub fn register(&mut self, tag: impl Into<String>, component: impl Fn(&Element) -> Vec<Descriptor> + 'static) -> Option<Rc<ComponentFn>> {
		self.map.insert(tag.into(), Rc::new(component))
	}

	#[must_use]
	pub fn with(mut self, tag: impl Into<String>, component: impl Fn(&Element) -> Vec<Descriptor> + 'static) -> Self {
		self.register(tag, component);
		self
	}

	pub fn unregister(&mut self, tag: &str) -> Option<Rc<ComponentFn>> {
		self.map.remove(tag)
	}

	#[must_use]
	pub fn get(&self, tag: &str) -> Option<&ComponentFn> {
		self.map.get(tag).map(|component| &**component)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.map.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}
}
