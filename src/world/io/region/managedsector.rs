use std::{
	ops::Range,
};

use super::{
	sector::*,
};

/// Similar to a RegionSector, but not constrained
/// to only 256 sectors. Used by the [super::sectormanager::SectorManager]
/// to describe unused space.
/// `start` is inclusive, `end` is exclusive, both in 4KiB sectors.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct ManagedSector {
	pub start: u32,
	pub end: u32,
}

impl From<Range<u32>> for ManagedSector{
	fn from(value: Range<u32>) -> Self {
		Self::new(value.start, value.end)
	}
}

impl std::fmt::Display for ManagedSector {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "(start: {}, end: {})", self.start, self.end)
	}
}

impl From<RegionSector> for ManagedSector {
	fn from(value: RegionSector) -> Self {
		ManagedSector::new(
			value.sector_offset() as u32,
			value.sector_end_offset() as u32
		)
	}
}

impl From<ManagedSector> for (u32, u32) {
	fn from(value: ManagedSector) -> Self {
		(value.start, value.end)
	}
}

impl ManagedSector {
	pub const EMPTY: Self = Self::new(0, 0);
	pub const HEADER: Self = Self::new(0, 2);
	/// The first sector offset that a location entry can not point to.
	pub const OFFSET_LIMIT: u32 = (MAX_SECTOR_OFFSET + 1) as u32;

	/// Create a new [ManagedSector] from the start and end offsets.
	/// Ensure that `start` <= `end`.
	pub const fn new(start: u32, end: u32) -> Self {
		Self {
			start,
			end
		}
	}

	/// Creates a new [ManagedSector] that starts at `end_offset` and
	/// ends at the last offset a location entry can address.
	pub const fn end_sector(end_offset: u32) -> Self {
		Self {
			start: end_offset,
			end: Self::OFFSET_LIMIT,
		}
	}

	/// Returns a [ManagedSector] that represents the header of
	/// a region file.
	pub const fn header() -> Self {
		Self::HEADER
	}

	pub fn size(&self) -> u32 {
		self.end.saturating_sub(self.start)
	}

	pub const fn start(&self) -> u32 {
		self.start
	}

	pub const fn end(&self) -> u32 {
		self.end
	}

	/// Determines if this sector has a size of 0.
	pub const fn is_empty(&self) -> bool {
		self.start >= self.end
	}

	/// Determines if this sector has a size greater than 0.
	pub const fn not_empty(&self) -> bool {
		self.start < self.end
	}

	/// Absorbs the other [ManagedSector] and all space in between into
	/// this [ManagedSector].
	pub fn absorb(&mut self, other: Self) {
		self.start = self.start.min(other.start);
		self.end = self.end.max(other.end);
	}

	/// Allocates a [RegionSector] from the front of this [ManagedSector], reducing
	/// the size in the process. Returns `None` if there isn't enough
	/// space.
	pub fn allocate(&mut self, size: u8) -> Option<RegionSector> {
		let new_start = self.start.checked_add(size as u32)?;
		// Not enough space.
		if new_start > self.end {
			return None
		}
		let start = self.start;
		self.start = new_start;
		Some(RegionSector::new(start, size))
	}

	/// Splits off `size` sectors from the front.
	/// Returns `(front, remainder)`, or None if this sector is too small.
	pub fn split_left(&self, size: u32) -> Option<(Self, Self)> {
		let mid = self.start.checked_add(size)?;
		if mid > self.end {
			return None;
		}
		Some((
			ManagedSector::new(self.start, mid),
			ManagedSector::new(mid, self.end),
		))
	}

	/// Checks intersection between two sectors.
	pub fn intersects(&self, other: &Self) -> bool {
		self.start < other.end
		&& other.start < self.end
	}

	/// Whether `other` starts exactly where this one ends, or the other way around.
	pub fn is_adjacent(&self, other: &Self) -> bool {
		self.end == other.start || other.end == self.start
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn allocate_from_front() {
		let mut gap = ManagedSector::new(4, 7);
		assert_eq!(gap.allocate(2), Some(RegionSector::new(4, 2)));
		assert_eq!(gap, ManagedSector::new(6, 7));
		assert_eq!(gap.allocate(2), None);
		assert_eq!(gap.allocate(1), Some(RegionSector::new(6, 1)));
		assert!(gap.is_empty());
	}

	#[test]
	fn split_absorb_intersect() {
		let sector = ManagedSector::new(2, 10);
		let (front, rest) = sector.split_left(3).unwrap();
		assert_eq!((front, rest), (ManagedSector::new(2, 5), ManagedSector::new(5, 10)));
		assert!(sector.split_left(9).is_none());
		assert!(front.is_adjacent(&rest));
		assert!(!front.intersects(&rest));
		let mut merged = front;
		merged.absorb(ManagedSector::new(12, 14));
		assert_eq!(merged, ManagedSector::new(2, 14));
		assert_eq!(ManagedSector::from(RegionSector::new(3, 2)), ManagedSector::new(3, 5));
		assert_eq!(ManagedSector::end_sector(2).end(), 0x100_0000);
	}
}
