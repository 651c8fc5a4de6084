//! Mount points and the root bookkeeping that ties repeated render passes together.

use crate::{
	descriptor::{flatten, Descriptor},
	error::{HostError, RenderError},
	host::{Host, NodeKind},
	namespace,
	render::Renderer,
};
use core::marker::PhantomData;
use tracing::{instrument, trace, trace_span};

/// Where a widget's nodes live: A plain element or (in the browser) a shadow root.
pub trait MountPoint<H: Host> {
	fn container(&self) -> &H::Node;

	/// Attaches a top-level rendered node. Appends by default.
	///
	/// # Errors
	///
	/// Iff the host refuses the insertion.
	fn attach(&self, host: &H, node: &H::Node) -> Result<(), HostError> {
		host.append_child(self.container(), node)
	}

	/// Installs `css` as a `<style>` element in front of all rendered content.
	/// Calling this again replaces the stylesheet text in place.
	///
	/// # Errors
	///
	/// Iff the host fails to create or insert the style element.
	fn install_styles(&mut self, host: &H, css: &str) -> Result<(), HostError>;
}

#[derive(Debug)]
pub struct ElementMount<H: Host> {
	container: H::Node,
	styles: Option<H::Node>,
}

impl<H: Host> ElementMount<H> {
	#[must_use]
	pub fn new(container: H::Node) -> Self {
		Self { container, styles: None }
	}

	/// The installed `<style>` element, if any.
	pub fn styles(&self) -> Option<&H::Node> {
		self.styles.as_ref()
	}
}

impl<H: Host> MountPoint<H> for ElementMount<H> {
	fn container(&self) -> &H::Node {
		&self.container
	}

	fn install_styles(&mut self, host: &H, css: &str) -> Result<(), HostError> {
		if let Some(style) = &self.styles {
			match host.children(style).first() {
				Some(text) if host.kind(text) == NodeKind::Text => {
					if host.text(text).as_deref() != Some(css) {
						host.set_text(text, css)
					}
				}
				_ => host.append_child(style, &host.create_text(css))?,
			}
			return Ok(());
		}

		let style = host.create_element(namespace::HTML, "style")?;
		host.append_child(&style, &host.create_text(css))?;
		let first = host.children(&self.container).into_iter().next();
		host.insert_before(&self.container, &style, first.as_ref())?;
		self.styles = Some(style);
		Ok(())
	}
}

/// Keeps track of the top-level nodes a descriptor was rendered into, so that the next pass can reconcile against them.
///
#[derive(Debug)]
pub struct Root<H: Host, M: MountPoint<H>> {
	mount: M,
	nodes: Vec<H::Node>,
	painted: bool,
	_host: PhantomData<fn(&H)>,
}

impl<H: Host, M: MountPoint<H>> Root<H, M> {
	#[must_use]
	pub fn new(mount: M) -> Self {
		Self {
			mount,
			nodes: Vec::new(),
			painted: false,
			_host: PhantomData,
		}
	}

	/// Renders `descriptor` into the mount point.
	///
	/// The first pass creates and attaches fresh nodes. Later passes update them in place where possible.
	///
	/// # Errors
	///
	/// Iff rendering fails. The root may then be partially updated, but its node list still reflects the container.
	#[instrument(skip(self, renderer, descriptor))]
	pub fn render(&mut self, renderer: &mut Renderer<H>, descriptor: &Descriptor) -> Result<(), RenderError> {
		let namespace = renderer.host().namespace(self.mount.container());
		let namespace = namespace.as_deref().unwrap_or(namespace::HTML);

		if !self.painted {
			let span = trace_span!("First paint");
			let _enter = span.enter();
			let nodes = renderer.render_in(descriptor, Some(namespace))?.into_nodes();
			self.painted = true;
			for node in nodes {
				self.mount.attach(renderer.host(), &node)?;
				self.nodes.push(node);
			}
			return Ok(());
		}

		match descriptor {
			Descriptor::Fragment(children) => {
				let mut nodes = Vec::with_capacity(self.nodes.len());
				let result = renderer.reconcile_range_into(self.mount.container(), &self.nodes, &flatten(children), namespace, &mut nodes);
				if result.is_err() {
					// Untouched live nodes follow the ones reconciled so far.
					nodes.extend(self.nodes.iter().skip(nodes.len()).cloned());
					let host = renderer.host();
					let container = self.mount.container();
					nodes.retain(|node| host.parent(node).map_or(false, |parent| host.same_node(&parent, container)));
					trace!("Recovered {} attached node(s) after a failed pass.", nodes.len());
				}
				self.nodes = nodes;
				result?;
			}
			_ if self.nodes.len() == 1 => {
				if let Some(replacement) = renderer.update(&self.nodes[0], descriptor)? {
					trace!("Swapping the root node.");
					renderer.host().replace_child(self.mount.container(), &replacement, &self.nodes[0])?;
					self.nodes[0] = replacement;
				}
			}
			_ => {
				trace!("Replacing {} fragment node(s) with a single node.", self.nodes.len());
				let nodes = renderer.render_in(descriptor, Some(namespace))?.into_nodes();
				let host = renderer.host();
				let anchor = self.nodes.last().and_then(|last| host.next_sibling(last));
				let old_len = self.nodes.len();
				for node in nodes {
					host.insert_before(self.mount.container(), &node, anchor.as_ref())?;
					self.nodes.push(node);
				}
				remove_leading(host, self.mount.container(), &mut self.nodes, old_len)?;
			}
		}
		Ok(())
	}

	/// Removes all rendered nodes. The next [`Root::render`] paints from scratch.
	///
	/// # Errors
	///
	/// Iff the host refuses a removal.
	pub fn unmount(&mut self, host: &H) -> Result<(), HostError> {
		let len = self.nodes.len();
		remove_leading(host, self.mount.container(), &mut self.nodes, len)?;
		self.painted = false;
		Ok(())
	}

	/// The current top-level nodes, in order.
	pub fn nodes(&self) -> &[H::Node] {
		&self.nodes
	}

	pub fn container(&self) -> &H::Node {
		self.mount.container()
	}

	pub fn mount(&self) -> &M {
		&self.mount
	}

	pub fn mount_mut(&mut self) -> &mut M {
		&mut self.mount
	}

	#[must_use]
	pub fn is_painted(&self) -> bool {
		self.painted
	}
}

/// Removes the first `count` of `nodes` from `container`, one by one, so that `nodes` stays accurate if the host fails.
fn remove_leading<H: Host>(host: &H, container: &H::Node, nodes: &mut Vec<H::Node>, count: usize) -> Result<(), HostError> {
	for _ in 0..count {
		host.remove_child(container, &nodes[0])?;
		nodes.remove(0);
	}
	Ok(())
}
