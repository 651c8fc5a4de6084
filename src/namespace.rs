//! Namespace URIs and their resolution.
//!
//! An explicit namespace on a descriptor wins. Otherwise a node inherits the namespace its parent established,
//! and the root of a tree without context falls back to [`HTML`].

pub const HTML: &str = "http://www.w3.org/1999/xhtml";
pub const SVG: &str = "http://www.w3.org/2000/svg";
pub const MATHML: &str = "http://www.w3.org/1998/Math/MathML";
pub const XLINK: &str = "http://www.w3.org/1999/xlink";

#[must_use]
pub fn resolve<'a>(explicit: Option<&'a str>, inherited: Option<&'a str>) -> &'a str {
	explicit.or(inherited).unwrap_or(HTML)
}

/// Whether a live element's local name matches a descriptor's tag in the given namespace.
///
/// HTML tag names are case-insensitive. Everything else (SVG's `foreignObject`, for example) is compared exactly.
#[must_use]
pub fn tag_matches(namespace: &str, live: &str, tag: &str) -> bool {
	if namespace == HTML {
		live.eq_ignore_ascii_case(tag)
	} else {
		live == tag
	}
}
