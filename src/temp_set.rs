use hashbrown::HashSet;

/// A name set that is reused between attribute diffs to avoid reallocating per element.
#[derive(Debug, Default)]
pub struct TempNameSet(HashSet<String>);
impl TempNameSet {
	pub fn new() -> Self {
		Self(HashSet::new())
	}

	/// The collection is cleared before each borrow, so no names leak between diffs.
	pub fn temp(&mut self) -> &mut HashSet<String> {
		self.0.clear();
		&mut self.0
	}

	/// Capacity is kept between borrows, so this reports the largest diff so far.
	pub fn capacity(&self) -> usize {
		self.0.capacity()
	}
}
