use thiserror::Error;

/// A descriptor (or descriptor literal) that can't be rendered.
///
/// Descriptors are trusted input, so these indicate a programming error in the code that produced them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DescriptorError {
	#[error("Invalid tag name {0:?}")]
	InvalidTag(String),

	#[error("Expected a tag name string at the start of an element literal but found {0}")]
	NotATag(String),

	#[error("Empty array is not a descriptor literal")]
	EmptyLiteral,

	#[error("Unsupported descriptor literal: {0}")]
	UnsupportedLiteral(String),

	#[error("Attribute {name:?} has an unsupported value: {value}")]
	UnsupportedAttributeValue { name: String, value: String },

	#[error("Attribute {name:?} must be an object, but found {value}")]
	ExpectedObject { name: String, value: String },
}

/// A failed operation on the live node tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
	#[error("Failed to create <{tag}> in namespace {namespace:?}: {message}")]
	CreateElement { tag: String, namespace: String, message: String },

	#[error("Failed to insert node: {0}")]
	Insert(String),

	#[error("Failed to remove node: {0}")]
	Remove(String),

	#[error("Failed to replace node: {0}")]
	Replace(String),

	#[error("Failed to set attribute {name:?}: {message}")]
	Attribute { name: String, message: String },

	#[error("Failed to set style property {name:?}: {message}")]
	Style { name: String, message: String },

	#[error("Failed to set property {name:?}: {message}")]
	Property { name: String, message: String },

	#[error("Node is not an element")]
	NotAnElement,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
	#[error(transparent)]
	Descriptor(#[from] DescriptorError),

	#[error(transparent)]
	Host(#[from] HostError),

	#[error("A fragment can't be reconciled against a single node. Wrap it in an element.")]
	FragmentRoot,

	#[error("Depth limit reached at {path}")]
	DepthLimit { path: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
	#[error("Widgets of kind {0:?} don't produce descriptors")]
	UnsupportedKind(crate::widget::WidgetKind),

	#[error(transparent)]
	Render(#[from] RenderError),
}
