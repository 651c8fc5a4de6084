use crate::{
	attributes,
	components::Components,
	descriptor::{flatten, Child, Descriptor, Element},
	error::RenderError,
	events::{EventRegistry, SharedRegistry},
	host::{Host, NodeKind},
	namespace,
	temp_set::TempNameSet,
};
use std::borrow::Cow;
use tracing::{info, instrument, level_filters::STATIC_MAX_LEVEL, trace, trace_span, warn, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
	/// Maximum element nesting depth of a single pass. Exceeding it fails with [`RenderError::DepthLimit`].
	pub depth_limit: usize,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self { depth_limit: 512 }
	}
}

/// The result of the render entrypoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered<N> {
	Node(N),
	/// A rendered fragment has no single attachment point.
	Fragment(Vec<N>),
}

impl<N> Rendered<N> {
	pub fn into_nodes(self) -> Vec<N> {
		match self {
			Self::Node(node) => vec![node],
			Self::Fragment(nodes) => nodes,
		}
	}

	/// The single node, or [`None`] for a fragment.
	pub fn node(self) -> Option<N> {
		match self {
			Self::Node(node) => Some(node),
			Self::Fragment(_) => None,
		}
	}
}

/// Renders [`Descriptor`]s into live nodes of a [`Host`] and reconciles them in place.
///
/// # Correct Use
///
/// The renderer doesn't hold on to any live node between calls. Keep the node returned by [`Renderer::render`] and
/// pass it to the next [`Renderer::update`], swapping in the replacement if one is returned ([`Root`](`crate::mount::Root`) does this).
///
/// Each entrypoint ([`Renderer::render`], [`Renderer::render_in`], [`Renderer::update`], [`Renderer::reconcile_range`])
/// starts a new pass: The [`EventRegistry`] is cleared and then refilled in document order,
/// so it only describes the tree handed to the latest call and unchanged trees are stamped with unchanged ids.
#[derive(Debug)]
pub struct Renderer<H: Host> {
	host: H,
	registry: SharedRegistry,
	components: Components,
	options: RenderOptions,
	attribute_names: TempNameSet,
}

impl<H: Host> Renderer<H> {
	#[must_use]
	pub fn new(host: H) -> Self {
		Self {
			host,
			registry: EventRegistry::shared(),
			components: Components::new(),
			options: RenderOptions::default(),
			attribute_names: TempNameSet::new(),
		}
	}

	#[must_use]
	pub fn with_options(mut self, options: RenderOptions) -> Self {
		self.options = options;
		self
	}

	#[must_use]
	pub fn with_components(mut self, components: Components) -> Self {
		self.components = components;
		self
	}

	#[must_use]
	pub fn with_event_registry(mut self, registry: SharedRegistry) -> Self {
		self.registry = registry;
		self
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn event_registry(&self) -> &SharedRegistry {
		&self.registry
	}

	pub fn components_mut(&mut self) -> &mut Components {
		&mut self.components
	}

	pub fn options(&self) -> RenderOptions {
		self.options
	}

	/// Creates a new live subtree for `descriptor` without attaching it anywhere.
	///
	/// Atoms become text nodes, except that `false` and `null` become an empty comment placeholder.
	/// Fragments become a list of nodes.
	///
	/// # Errors
	///
	/// Iff the host fails to create or assemble a node, or the depth limit is exceeded.
	#[instrument(skip(self, descriptor))]
	pub fn render(&mut self, descriptor: &Descriptor) -> Result<Rendered<H::Node>, RenderError> {
		self.render_in(descriptor, None)
	}

	/// Like [`Renderer::render`], but in the namespace context `inherited` (the parent's namespace).
	///
	/// # Errors
	///
	/// Iff the host fails to create or assemble a node, or the depth limit is exceeded.
	#[instrument(skip(self, descriptor))]
	pub fn render_in(&mut self, descriptor: &Descriptor, inherited: Option<&str>) -> Result<Rendered<H::Node>, RenderError> {
		self.begin_pass();
		let depth_limit = self.options.depth_limit;
		let rendered = match descriptor {
			Descriptor::Atom(atom) if atom.is_empty() => {
				trace!("Creating placeholder comment.");
				Rendered::Node(self.host.create_comment(""))
			}
			Descriptor::Atom(atom) => Rendered::Node(self.host.create_text(&atom.text())),
			Descriptor::Fragment(children) => {
				let span = trace_span!("Creating fragment", "children.len()" = children.len());
				let _enter = span.enter();
				let mut nodes = Vec::with_capacity(children.len());
				for child in flatten(children) {
					nodes.push(self.create_child(&child, inherited, depth_limit)?);
				}
				Rendered::Fragment(nodes)
			}
			Descriptor::Element(element) => Rendered::Node(self.create_element(element, inherited, depth_limit)?),
		};
		self.log_statistics();
		Ok(rendered)
	}

	/// Reconciles `live` with `descriptor`.
	///
	/// Returns [`None`] if `live` was updated in place.
	/// If the node kind, tag or resolved namespace differ, a freshly rendered replacement is returned instead,
	/// and neither `live` nor its parent are touched. Swapping it in is up to the caller.
	///
	/// The namespace context is taken from `live`'s parent element, if any.
	///
	/// # Errors
	///
	/// Iff `descriptor` is a fragment, the host fails or the depth limit is exceeded.
	#[instrument(skip(self, descriptor))]
	pub fn update(&mut self, live: &H::Node, descriptor: &Descriptor) -> Result<Option<H::Node>, RenderError> {
		self.begin_pass();
		let inherited = self.host.parent(live).filter(|parent| self.host.kind(parent) == NodeKind::Element).and_then(|parent| self.host.namespace(&parent));
		let depth_limit = self.options.depth_limit;

		let replacement = match descriptor {
			Descriptor::Fragment(_) => return Err(RenderError::FragmentRoot),
			Descriptor::Atom(atom) => {
				let kind = self.host.kind(live);
				if atom.is_empty() {
					if kind == NodeKind::Comment {
						None
					} else {
						Some(self.host.create_comment(""))
					}
				} else if kind == NodeKind::Text {
					self.update_text(live, &atom.text());
					None
				} else {
					Some(self.host.create_text(&atom.text()))
				}
			}
			Descriptor::Element(element) => self.update_node(live, element, inherited.as_deref(), depth_limit)?,
		};
		self.log_statistics();
		Ok(replacement)
	}

	/// Reconciles a range of `parent`'s children (`live`, in order) with `children`, returning the new range.
	///
	/// New nodes are inserted before whatever followed the last node of `live`.
	///
	/// # Errors
	///
	/// Iff the host fails or the depth limit is exceeded.
	#[instrument(skip(self, live, children))]
	pub fn reconcile_range(&mut self, parent: &H::Node, live: &[H::Node], children: &[Child<'_>], namespace: &str) -> Result<Vec<H::Node>, RenderError> {
		let mut nodes = Vec::with_capacity(children.len());
		self.reconcile_range_into(parent, live, children, namespace, &mut nodes)?;
		Ok(nodes)
	}

	/// Like [`Renderer::reconcile_range`], but collects the new range into `nodes`.
	///
	/// If this fails, `nodes` holds the children reconciled so far, in place of the same number of leading `live` nodes.
	/// Nodes of `live` past that point haven't been touched yet (apart from trailing removals, which run last).
	pub(crate) fn reconcile_range_into(
		&mut self,
		parent: &H::Node,
		live: &[H::Node],
		children: &[Child<'_>],
		namespace: &str,
		nodes: &mut Vec<H::Node>,
	) -> Result<(), RenderError> {
		self.begin_pass();
		let depth_limit = self.options.depth_limit;
		self.reconcile_children(parent, live, children, namespace, depth_limit, nodes)?;
		self.log_statistics();
		Ok(())
	}

	fn begin_pass(&self) {
		self.registry.borrow_mut().clear();
	}

	fn log_statistics(&self) {
		info!("Attribute diff heap capacity (names): {}", self.attribute_names.capacity());
		if STATIC_MAX_LEVEL >= Level::WARN && self.attribute_names.capacity() >= 1000 {
			warn!(
				"The attribute diff heap capacity is large ({}).\n\
				This may point to elements with an unusual number of attributes or style properties.",
				self.attribute_names.capacity()
			)
		}
	}

	fn create_child(&mut self, child: &Child<'_>, inherited: Option<&str>, depth_limit: usize) -> Result<H::Node, RenderError> {
		match child {
			Child::Element(element) => self.create_element(element, inherited, depth_limit),
			Child::Text(text) => {
				#[allow(clippy::non_ascii_literal)]
				let span = trace_span!("Creating text node", text = if cfg!(feature = "dangerous-logging") { &**text } else { "…" });
				let _enter = span.enter();
				Ok(self.host.create_text(text))
			}
		}
	}

	fn create_element(&mut self, element: &Element, inherited: Option<&str>, depth_limit: usize) -> Result<H::Node, RenderError> {
		if depth_limit == 0 {
			return Err(RenderError::DepthLimit { path: element.tag().to_owned() });
		}
		let namespace = namespace::resolve(element.attributes().namespace.as_deref(), inherited);
		let span = trace_span!("Creating element", tag = element.tag(), namespace);
		let _enter = span.enter();

		let node = self.host.create_element(namespace, element.tag())?;
		self.apply_attributes(&node, element);

		let children = self.content(element);
		for child in flatten(&children) {
			let child_node = self.create_child(&child, Some(namespace), depth_limit - 1).map_err(|error| with_path(error, element.tag()))?;
			self.host.append_child(&node, &child_node)?;
		}
		Ok(node)
	}

	/// Updates `live` in place if it matches `element`, otherwise returns a replacement.
	fn update_node(&mut self, live: &H::Node, element: &Element, inherited: Option<&str>, depth_limit: usize) -> Result<Option<H::Node>, RenderError> {
		let namespace = namespace::resolve(element.attributes().namespace.as_deref(), inherited);
		if !self.matches(live, element.tag(), namespace) {
			let span = trace_span!("Replace mismatching", tag = element.tag(), namespace);
			let _enter = span.enter();
			return self.create_element(element, inherited, depth_limit).map(Some);
		}

		let span = trace_span!("Diffing element", tag = element.tag(), namespace);
		let _enter = span.enter();
		self.update_element(live, element, namespace, depth_limit)?;
		Ok(None)
	}

	fn matches(&self, live: &H::Node, tag: &str, namespace: &str) -> bool {
		if self.host.kind(live) != NodeKind::Element {
			return false;
		}
		if self.host.namespace(live).as_deref() != Some(namespace) {
			return false;
		}
		let local_name = self.host.local_name(live).unwrap_or_default();
		if namespace::tag_matches(namespace, &local_name, tag) {
			return true;
		}
		if STATIC_MAX_LEVEL >= Level::WARN && local_name.eq_ignore_ascii_case(tag) {
			warn!(
				"Recreating element due to different tag name casing: {:?} -> {:?}\n\
				Outside of HTML, tag names are case-sensitive.",
				local_name, tag
			)
		}
		false
	}

	fn update_element(&mut self, live: &H::Node, element: &Element, namespace: &str, depth_limit: usize) -> Result<(), RenderError> {
		if depth_limit == 0 {
			return Err(RenderError::DepthLimit { path: element.tag().to_owned() });
		}
		self.apply_attributes(live, element);

		let children = self.content(element);
		let current = self.host.children(live);
		let mut nodes = Vec::with_capacity(children.len());
		self.reconcile_children(live, &current, &flatten(&children), namespace, depth_limit - 1, &mut nodes)
			.map_err(|error| with_path(error, element.tag()))
	}

	fn reconcile_children(
		&mut self,
		parent: &H::Node,
		live: &[H::Node],
		children: &[Child<'_>],
		namespace: &str,
		depth_limit: usize,
		nodes: &mut Vec<H::Node>,
	) -> Result<(), RenderError> {
		let span = trace_span!("Diffing children", "live.len()" = live.len(), "children.len()" = children.len());
		let _enter = span.enter();

		let next_sibling = live.last().and_then(|last| self.host.next_sibling(last));
		for (i, child) in children.iter().enumerate() {
			let node = match live.get(i) {
				Some(existing) => match self.reconcile_child(existing, child, namespace, depth_limit)? {
					None => existing.clone(),
					Some(replacement) => {
						self.host.replace_child(parent, &replacement, existing)?;
						replacement
					}
				},
				None => {
					let node = self.create_child(child, Some(namespace), depth_limit)?;
					self.host.insert_before(parent, &node, next_sibling.as_ref())?;
					node
				}
			};
			nodes.push(node);
		}

		if live.len() > children.len() {
			trace!("Removing {} trailing node(s).", live.len() - children.len());
			for removed in &live[children.len()..] {
				self.host.remove_child(parent, removed)?;
			}
		}
		Ok(())
	}

	fn reconcile_child(&mut self, existing: &H::Node, child: &Child<'_>, namespace: &str, depth_limit: usize) -> Result<Option<H::Node>, RenderError> {
		match child {
			Child::Text(text) => {
				if self.host.kind(existing) == NodeKind::Text {
					self.update_text(existing, text);
					Ok(None)
				} else {
					trace!("Replacing {:?} with a text node.", existing);
					Ok(Some(self.host.create_text(text)))
				}
			}
			Child::Element(element) => self.update_node(existing, element, Some(namespace), depth_limit),
		}
	}

	fn update_text(&self, live: &H::Node, text: &str) {
		if self.host.text(live).as_deref() == Some(text) {
			return;
		}
		self.host.set_text(live, text)
	}

	fn apply_attributes(&mut self, node: &H::Node, element: &Element) {
		let mut registry = self.registry.borrow_mut();
		attributes::reconcile(&self.host, node, element.attributes(), &mut registry, &mut self.attribute_names);
	}

	/// The children to render for `element`, which come from its component if one is registered for the tag.
	fn content<'e>(&self, element: &'e Element) -> Cow<'e, [Descriptor]> {
		match self.components.get(element.tag()) {
			Some(component) => {
				trace!("Expanding component <{}>.", element.tag());
				Cow::Owned(component(element))
			}
			None => Cow::Borrowed(element.children()),
		}
	}
}

fn with_path(error: RenderError, tag: &str) -> RenderError {
	match error {
		RenderError::DepthLimit { path } if cfg!(feature = "log-paths") => RenderError::DepthLimit { path: format!("{} > {}", tag, path) },
		other => other,
	}
}
