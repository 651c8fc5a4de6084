use core::{
	borrow::Borrow,
	fmt::{self, Debug, Formatter},
	hash::{BuildHasher, Hash},
};
use hashbrown::{
	hash_map::{DefaultHashBuilder, DrainFilter, Entry},
	HashMap,
};
use num_traits::{CheckedAdd, One, Zero};

/// A map of reference-counted values. Entries whose count drops to zero stay until drained with [`RcHashMap::drain_weak`].
pub struct RcHashMap<K, C, V, S = DefaultHashBuilder>(HashMap<K, (C, V), S>)
where
	K: Hash + Eq,
	C: CheckedAdd + One + Zero,
	S: BuildHasher;
impl<K, C, V, S> Default for RcHashMap<K, C, V, S>
where
	K: Hash + Eq,
	C: CheckedAdd + One + Zero,
	S: Default + BuildHasher,
{
	fn default() -> Self {
		Self::new()
	}
}
impl<K, C, V, S> Debug for RcHashMap<K, C, V, S>
where
	K: Hash + Eq + Debug,
	C: CheckedAdd + One + Zero + Debug,
	S: BuildHasher,
{
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.0.iter().map(|(k, (c, _))| (k, c))).finish()
	}
}
impl<K, C, V, S> RcHashMap<K, C, V, S>
where
	K: Hash + Eq,
	C: CheckedAdd + One + Zero,
	S: BuildHasher,
{
	#[must_use]
	pub fn new() -> Self
	where
		S: Default,
	{
		Self(HashMap::with_hasher(S::default()))
	}

	/// `v` is only called if `k` wasn't present yet.
	pub fn increment_or_insert_with<F: FnOnce(&K) -> V>(&mut self, k: K, v: F) -> Result<&mut V, CountSaturatedError> {
		match self.0.entry(k) {
			Entry::Occupied(occupied) => {
				let (c, v) = occupied.into_mut();
				*c = c.checked_add(&C::one()).ok_or(CountSaturatedError)?;
				Ok(v)
			}
			Entry::Vacant(vacant) => {
				let value = v(vacant.key());
				let (_, v) = vacant.insert((C::one(), value));
				Ok(v)
			}
		}
	}

	/// Sets every count to zero without dropping any value, so that a following recount can revive them.
	pub fn weaken_all(&mut self) {
		for (c, _) in self.0.values_mut() {
			*c = C::zero();
		}
	}

	pub fn count<Q: ?Sized>(&self, k: &Q) -> Option<&C>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		self.0.get(k).map(|(c, _)| c)
	}

	pub fn keys(&self) -> impl Iterator<Item = &K> {
		self.0.keys()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn capacity(&self) -> usize {
		self.0.capacity()
	}

	pub fn drain_weak(&mut self) -> DrainWeak<'_, K, C, V> {
		DrainWeak(self.0.drain_filter(is_weak::<K, C, V> as fn(&K, &mut (C, V)) -> bool))
	}
}

fn is_weak<K, C: Zero, V>(_: &K, (c, _): &mut (C, V)) -> bool {
	c.is_zero()
}

pub struct DrainWeak<'a, K, C, V>(DrainFilter<'a, K, (C, V), fn(&K, &mut (C, V)) -> bool>);
impl<'a, K, C, V> Iterator for DrainWeak<'a, K, C, V> {
	type Item = (K, V);

	fn next(&mut self) -> Option<Self::Item> {
		self.0.next().map(|(k, (_, v))| (k, v))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.0.size_hint()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountSaturatedError;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn recount_drains_only_unreferenced() {
		let mut map = RcHashMap::<&str, u8, usize>::new();
		map.increment_or_insert_with("click", |_| 1).unwrap();
		map.increment_or_insert_with("click", |_| unreachable!()).unwrap();
		map.increment_or_insert_with("input", |_| 2).unwrap();
		assert_eq!(map.count("click"), Some(&2));

		map.weaken_all();
		map.increment_or_insert_with("input", |_| unreachable!()).unwrap();
		let drained: Vec<_> = map.drain_weak().collect();
		assert_eq!(drained, vec![("click", 1)]);
		assert_eq!(map.len(), 1);
	}

	#[test]
	fn saturation_is_reported() {
		let mut map = RcHashMap::<&str, u8, ()>::new();
		for _ in 0..255 {
			map.increment_or_insert_with("scroll", |_| ()).unwrap();
		}
		assert_eq!(map.increment_or_insert_with("scroll", |_| ()).map(|_| ()), Err(CountSaturatedError));
		map.weaken_all();
		assert_eq!(map.drain_weak().count(), 1);
	}
}
