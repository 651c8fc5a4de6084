//! The widget module contract and the engine that drives document widgets.
//!
//! A document widget is a small state machine: [`Widget::render`] turns its state into a [`Descriptor`] tree,
//! and delegated events feed back into [`Widget::on_update`]. [`DocumentWidget`] runs that loop against a [`Root`].

use crate::{
	descriptor::Descriptor,
	error::{DescriptorError, RenderError, WidgetError},
	events::{resolve, Dispatch, EventSourceId},
	host::Host,
	mount::{MountPoint, Root},
	render::Renderer,
};
use core::fmt::{self, Debug, Formatter};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, instrument, trace};

/// What a widget module produces. Only [`WidgetKind::Document`] widgets render descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetKind {
	#[serde(rename = "document")]
	Document,
	#[serde(rename = "Canvas2d")]
	Canvas2d,
	#[serde(rename = "multi")]
	Multi,
	#[serde(rename = "remote")]
	Remote,
}

/// Per-pass information handed to [`Widget::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
	pub id: String,
	/// Starts at 1 for the first paint.
	pub pass: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetEvent {
	pub event_type: String,
	pub payload: Value,
	pub source: EventSourceId,
}

pub trait Widget {
	type Config: Default;
	type State;

	fn kind(&self) -> WidgetKind {
		WidgetKind::Document
	}

	fn config(&self) -> Self::Config {
		Self::Config::default()
	}

	fn create_state(&self, config: &Self::Config) -> Self::State;

	fn on_update(&self, state: &mut Self::State, event: &WidgetEvent) {
		let _ = (state, event);
	}

	/// # Errors
	///
	/// Iff the widget builds an invalid descriptor.
	fn render(&self, context: &Context, state: &Self::State, config: &Self::Config) -> Result<Descriptor, DescriptorError>;
}

/// A mounted document widget.
pub struct DocumentWidget<W: Widget, H: Host, M: MountPoint<H>> {
	widget: W,
	config: W::Config,
	state: W::State,
	context: Context,
	renderer: Renderer<H>,
	root: Root<H, M>,
}

impl<W: Widget + Debug, H: Host + Debug, M: MountPoint<H> + Debug> Debug for DocumentWidget<W, H, M> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("DocumentWidget")
			.field("widget", &self.widget)
			.field("context", &self.context)
			.field("renderer", &self.renderer)
			.field("root", &self.root)
			.finish_non_exhaustive()
	}
}

impl<W: Widget, H: Host, M: MountPoint<H>> DocumentWidget<W, H, M> {
	/// Creates the widget's config and state and paints it into `mount`.
	///
	/// # Errors
	///
	/// Iff `widget` isn't a [`WidgetKind::Document`] widget or the first paint fails.
	pub fn mount(widget: W, id: impl Into<String>, renderer: Renderer<H>, mount: M) -> Result<Self, WidgetError> {
		let kind = widget.kind();
		if kind != WidgetKind::Document {
			return Err(WidgetError::UnsupportedKind(kind));
		}

		let config = widget.config();
		let state = widget.create_state(&config);
		let mut this = Self {
			widget,
			config,
			state,
			context: Context { id: id.into(), pass: 0 },
			renderer,
			root: Root::new(mount),
		};
		this.rerender()?;
		Ok(this)
	}

	/// Renders the current state and reconciles it into the mount point.
	///
	/// # Errors
	///
	/// Iff the widget builds an invalid descriptor or rendering fails. Both are logged.
	#[instrument(skip(self))]
	pub fn rerender(&mut self) -> Result<(), WidgetError> {
		self.context.pass += 1;
		let descriptor = match self.widget.render(&self.context, &self.state, &self.config) {
			Ok(descriptor) => descriptor,
			Err(error) => {
				error!("Widget {:?} produced an invalid descriptor: {}", self.context.id, error);
				return Err(RenderError::from(error).into());
			}
		};

		if let Err(error) = self.root.render(&mut self.renderer, &descriptor) {
			if cfg!(feature = "dangerous-logging") {
				error!("Failed to render widget {:?}: {}\nDescriptor: {}", self.context.id, error, descriptor.to_literal());
			} else {
				error!("Failed to render widget {:?}: {}", self.context.id, error);
			}
			return Err(error.into());
		}
		trace!("Rendered pass {}.", self.context.pass);
		Ok(())
	}

	/// Resolves an `event_type` event on `target` and, if an element handles it, updates the state and rerenders.
	///
	/// Returns whether a handler was found.
	///
	/// # Errors
	///
	/// Iff the rerender fails.
	#[instrument(skip(self, target))]
	pub fn dispatch(&mut self, event_type: &str, target: &H::Node) -> Result<bool, WidgetError> {
		let dispatch = {
			let registry = self.renderer.event_registry().borrow();
			resolve(self.renderer.host(), &registry, self.root.container(), target, event_type)
		};
		match dispatch {
			Some(dispatch) => {
				self.apply(dispatch)?;
				Ok(true)
			}
			None => Ok(false),
		}
	}

	/// Feeds an already resolved event (for example from an [`EventDelegate`](`crate::web::EventDelegate`)) to the widget.
	///
	/// # Errors
	///
	/// Iff the rerender fails.
	pub fn apply(&mut self, dispatch: Dispatch) -> Result<(), WidgetError> {
		let event = WidgetEvent {
			event_type: dispatch.event_type,
			payload: dispatch.payload,
			source: dispatch.source,
		};
		self.widget.on_update(&mut self.state, &event);
		self.rerender()
	}

	/// # Errors
	///
	/// Iff the host fails to create or insert the style element.
	pub fn install_styles(&mut self, css: &str) -> Result<(), WidgetError> {
		self.root.mount_mut().install_styles(self.renderer.host(), css).map_err(|error| RenderError::from(error).into())
	}

	pub fn widget(&self) -> &W {
		&self.widget
	}

	pub fn config(&self) -> &W::Config {
		&self.config
	}

	pub fn state(&self) -> &W::State {
		&self.state
	}

	pub fn context(&self) -> &Context {
		&self.context
	}

	pub fn renderer(&self) -> &Renderer<H> {
		&self.renderer
	}

	pub fn root(&self) -> &Root<H, M> {
		&self.root
	}
}
