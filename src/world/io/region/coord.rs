use crate::for_each_int_type;

/// A region file contains up to 1024 chunks, which is 32x32 chunks.
/// This struct represents a chunk coordinate within a region file.
/// The coordinate can be an absolute coordinate and it will be
/// normalized to relative coordinates.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct RegionCoord(u16);

impl RegionCoord {
	/// Create a new RegionCoord.
	/// The x and z will be mathematically transformed into relative coordinates.
	/// So if the coordinate given to `new()` is `(32, 32)`, the result will be
	/// `(0, 0)`.
	pub fn new(x: u16, z: u16) -> Self {
		let xmod = x & 31;
		let zmod = z & 31;
		Self(xmod | zmod.overflowing_shl(5).0)
	}

	/// Create a RegionCoord from an absolute chunk coordinate.
	/// Negative coordinates wrap the same way the game does, so chunk `-1`
	/// is the local coordinate `31`.
	pub fn from_chunk(x: i32, z: i32) -> Self {
		Self::new(x as u16, z as u16)
	}

	/// Create a RegionCoord from a slot index (`x + z * 32`).
	/// Returns None if the index is 1024 or greater.
	pub fn from_index(index: usize) -> Option<Self> {
		(index < 1024).then(|| Self(index as u16))
	}

	/// Every coordinate in a region, in slot order.
	pub fn all() -> impl Iterator<Item = RegionCoord> {
		(0u16..1024).map(RegionCoord)
	}

	pub fn index(&self) -> usize {
		self.0 as usize
	}

	pub fn x(&self) -> i32 {
		(self.0 & 31) as i32
	}

	pub fn z(&self) -> i32 {
		(self.0.overflowing_shr(5).0 & 31) as i32
	}

	pub fn tuple<T>(self) -> (T, T)
	where
	(T, T): From<Self> {
		self.into()
	}
}

macro_rules! __regioncoord_impl {
	($type:ty) => {

		impl From<($type, $type)> for RegionCoord {
			fn from(value: ($type, $type)) -> Self {
				Self::new(value.0 as u16, value.1 as u16)
			}
		}

		/// Converts a slot index. Only the lower 10 bits are used.
		impl From<$type> for RegionCoord {
			fn from(value: $type) -> Self {
				Self((value as u16) & 1023)
			}
		}

		impl From<RegionCoord> for ($type, $type) {
			fn from(value: RegionCoord) -> Self {
				(value.x() as $type, value.z() as $type)
			}
		}

		impl From<RegionCoord> for $type {
			fn from(value: RegionCoord) -> Self {
				value.0 as $type
			}
		}
	};
}

for_each_int_type!(__regioncoord_impl);

impl<T: Into<RegionCoord> + Copy> From<&T> for RegionCoord {
	fn from(value: &T) -> Self {
		T::into(*value)
	}
}

impl std::fmt::Display for RegionCoord {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "({}, {})", self.x(), self.z())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn coord_index() {
		assert_eq!(RegionCoord::new(0, 0).index(), 0);
		assert_eq!(RegionCoord::new(31, 0).index(), 31);
		assert_eq!(RegionCoord::new(0, 1).index(), 32);
		assert_eq!(RegionCoord::new(31, 31).index(), 1023);
		assert_eq!(RegionCoord::new(33, 65), RegionCoord::new(1, 1));
		assert_eq!(RegionCoord::from_chunk(-1, -32), RegionCoord::new(31, 0));
		assert_eq!(RegionCoord::from((-1i64, 2i64)).tuple::<i32>(), (31, 2));
		assert_eq!(RegionCoord::from(1023usize), RegionCoord::new(31, 31));
		assert_eq!(RegionCoord::from_index(1024), None);
		assert_eq!(RegionCoord::all().count(), 1024);
	}

	#[test]
	fn display() {
		let coord = RegionCoord::new(31, 31);
		assert_eq!(coord.to_string(), "(31, 31)");
	}
}
