//! Delegated events.
//!
//! Elements aren't given listeners of their own. Instead, their event spec goes into an [`EventRegistry`] and the element is
//! stamped with the resulting id in [`EVENT_SOURCE_ATTRIBUTE`]. A single listener per event type on the container then
//! [`resolve`]s the closest stamped ancestor of the event target back to its payload.
//!
//! Since handlers are looked up by id rather than captured, descriptors can be rebuilt freely between passes.

use crate::{
	descriptor::EventSpec,
	host::{Host, NodeKind},
	rc_hash_map::RcHashMap,
};
use core::{
	fmt::{self, Display, Formatter},
	num::ParseIntError,
	str::FromStr,
};
use hashbrown::HashMap;
use serde_json::Value;
use std::{cell::RefCell, collections::BTreeSet, rc::Rc};
use tracing::{error, trace, warn};

/// The `data-eventsource` attribute.
pub const EVENT_SOURCE_ATTRIBUTE: &str = "data-eventsource";

/// A registry shared between a renderer (which fills it) and the delegated listeners (which read it).
pub type SharedRegistry = Rc<RefCell<EventRegistry>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventSourceId(u32);

/// Maps stamped ids to the event specs that produced them.
///
/// A [`Renderer`](`crate::render::Renderer`) clears it at the start of each pass. Ids restart at zero, so an unchanged tree is stamped with unchanged ids.
#[derive(Debug, Default)]
pub struct EventRegistry {
	specs: HashMap<EventSourceId, EventSpec>,
	next: u32,
}

/// A resolved delegated event.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
	pub source: EventSourceId,
	pub event_type: String,
	pub payload: Value,
}

/// Which event types currently need a delegated listener, counted per registered element.
#[derive(Debug, Default)]
pub struct ListenerSet {
	counts: RcHashMap<String, u32, ()>,
}

/// Event types to start and stop listening for after a [`ListenerSet::sync`]. Both are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerDiff {
	pub added: Vec<String>,
	pub removed: Vec<String>,
}

impl EventSourceId {
	#[must_use]
	pub fn get(self) -> u32 {
		self.0
	}
}

impl Display for EventSourceId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl FromStr for EventSourceId {
	type Err = ParseIntError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.parse().map(Self)
	}
}

impl EventRegistry {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn shared() -> SharedRegistry {
		Rc::new(RefCell::new(Self::new()))
	}

	pub fn register(&mut self, spec: EventSpec) -> EventSourceId {
		let id = EventSourceId(self.next);
		self.next += 1;
		self.specs.insert(id, spec);
		id
	}

	#[must_use]
	pub fn get(&self, id: EventSourceId) -> Option<&EventSpec> {
		self.specs.get(&id)
	}

	#[must_use]
	pub fn payload(&self, id: EventSourceId, event_type: &str) -> Option<&Value> {
		self.get(id)?.get(event_type)
	}

	/// Every distinct event type across all registered specs.
	#[must_use]
	pub fn event_types(&self) -> BTreeSet<&str> {
		self.specs.values().flat_map(|spec| spec.keys().map(String::as_str)).collect()
	}

	pub fn specs(&self) -> impl Iterator<Item = (EventSourceId, &EventSpec)> {
		self.specs.iter().map(|(id, spec)| (*id, spec))
	}

	pub fn clear(&mut self) {
		self.specs.clear();
		self.next = 0;
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.specs.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.specs.is_empty()
	}
}

/// Finds the payload for an `event_type` event that was dispatched on `target`.
///
/// Walks from `target` up to (and including) `container`. The closest element that carries [`EVENT_SOURCE_ATTRIBUTE`] decides:
/// If its spec doesn't handle `event_type`, nothing does.
pub fn resolve<H: Host>(host: &H, registry: &EventRegistry, container: &H::Node, target: &H::Node, event_type: &str) -> Option<Dispatch> {
	let mut current = Some(target.clone());
	while let Some(node) = current {
		if host.kind(&node) == NodeKind::Element {
			if let Some(id) = host.attribute(&node, EVENT_SOURCE_ATTRIBUTE) {
				let source = match id.parse::<EventSourceId>() {
					Ok(source) => source,
					Err(error) => {
						warn!("Malformed {} {:?}: {}", EVENT_SOURCE_ATTRIBUTE, id, error);
						return None;
					}
				};
				let payload = match registry.payload(source, event_type) {
					Some(payload) => payload.clone(),
					None => {
						trace!("Event source {} has no {:?} handler.", source, event_type);
						return None;
					}
				};
				return Some(Dispatch {
					source,
					event_type: event_type.to_owned(),
					payload,
				});
			}
		}
		if host.same_node(&node, container) {
			break;
		}
		current = host.parent(&node);
	}
	None
}

impl ListenerSet {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Recounts listener references from `registry`.
	pub fn sync(&mut self, registry: &EventRegistry) -> ListenerDiff {
		self.counts.weaken_all();
		let mut added = Vec::new();
		for (_, spec) in registry.specs() {
			for event_type in spec.keys() {
				if self.counts.increment_or_insert_with(event_type.clone(), |event_type| added.push(event_type.clone())).is_err() {
					error!("Too many active references to the {:?} listener.", event_type)
				}
			}
		}
		let mut removed: Vec<_> = self.counts.drain_weak().map(|(event_type, ())| event_type).collect();
		added.sort();
		removed.sort();
		trace!("Listener capacity: {}", self.counts.capacity());
		ListenerDiff { added, removed }
	}

	#[must_use]
	pub fn references(&self, event_type: &str) -> u32 {
		self.counts.count(event_type).copied().unwrap_or(0)
	}

	pub fn event_types(&self) -> impl Iterator<Item = &str> {
		self.counts.keys().map(String::as_str)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.counts.len() == 0
	}
}
