use std::ops::Range;
use crate::ioext::*;
use crate::{
	McError,
	McResult,
};
use std::{
	io::{
		Read, Write,
		SeekFrom,
	},
	ops::{
		BitOr,
		Not,
	},
};

/// The largest sector offset that fits in the 24 bits of a location entry.
pub const MAX_SECTOR_OFFSET: u64 = 0xFF_FFFF;

/// The largest number of sectors a single chunk record may span.
pub const MAX_SECTOR_COUNT: u32 = 255;

/// A location entry from the sector table.
/// Offset and size are packed together, exactly as they are on disk.
/// |Offset:3|Size:1|
/// An entry with an offset of 0 marks an empty slot.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct RegionSector(u32);

impl RegionSector {
	/// Provide offset and size in 4KiB chunks.
	/// Offsets wider than 24 bits are truncated. See [RegionSector::try_new].
	pub fn new(offset: u32, size: u8) -> Self {
		Self(offset.overflowing_shl(8).0.bitor(size as u32))
	}

	/// Like [RegionSector::new], but fails instead of truncating when the
	/// range can not be represented in a location entry.
	pub fn try_new(offset: u64, count: u32) -> McResult<Self> {
		if count > MAX_SECTOR_COUNT {
			return Err(McError::ChunkTooLarge(count));
		}
		if offset > MAX_SECTOR_OFFSET {
			return Err(McError::RegionAllocationFailure);
		}
		Ok(Self::new(offset as u32, count as u8))
	}

	/// Creates a new empty RegionSector.
	pub const fn empty() -> Self {
		Self(0)
	}

	/// The raw location entry.
	pub const fn bits(&self) -> u32 {
		self.0
	}

	/// The 4KiB sector offset.
	/// Multiply this by `4096` to get the seek offset.
	pub fn sector_offset(&self) -> u64 {
		self.0.overflowing_shr(8).0 as u64
	}

	/// The 4KiB sector offset that marks the end of this sector and the start of
	/// the next.
	pub fn sector_end_offset(&self) -> u64 {
		self.sector_offset() + self.sector_count()
	}

	/// The 4KiB sector count.
	/// Multiply this by `4096` to get the sector size.
	pub fn sector_count(&self) -> u64 {
		(self.0 & 0xFF) as u64
	}

	/// The offset in bytes that this sector begins
	/// at in the region file.
	pub fn offset(&self) -> u64 {
		self.sector_offset() * 4096
	}

	/// The offset in bytes that this sector ends at in the region file.
	pub fn end_offset(&self) -> u64 {
		self.sector_end_offset() * 4096
	}

	/// The size in bytes that this sector occupies.
	pub fn size(&self) -> u64 {
		self.sector_count() * 4096
	}

	/// Determines if this is an "empty" sector.
	pub fn is_empty(&self) -> bool {
		self.0 == 0
	}

	/// Whether this entry points at a chunk record.
	/// Entries with a zero offset are absent, whatever their count says.
	pub fn is_present(&self) -> bool {
		self.sector_offset() != 0
	}

	/// `(offset, count)` in sectors.
	pub fn range(&self) -> (u64, u64) {
		(self.sector_offset(), self.sector_count())
	}

	/// Tests if two sectors intersect.
	pub fn intersects(self, rhs: Self) -> bool {
		(
			self.sector_end_offset() <= rhs.sector_offset()
			|| rhs.sector_end_offset() <= self.sector_offset()
		).not()
	}

	/// Splits a [RegionSector] into two sectors: the left one with the
	/// requested size, and the right one with whatever remains.
	/// Returns None if this sector is smaller than `sector_count`.
	pub fn split_left(&self, sector_count: u8) -> Option<(Self, Self)> {
		if (sector_count as u64) <= self.sector_count() {
			let lhs_start = self.sector_offset();
			let rhs_start = lhs_start + (sector_count as u64);
			let rhs_count = (self.sector_count() as u8) - sector_count;
			Some((
				RegionSector::new(lhs_start as u32, sector_count),
				RegionSector::new(rhs_start as u32, rhs_count)
			))
		} else {
			None
		}
	}

	/// A [SeekFrom] that points to this [RegionSector]
	pub fn seeker(&self) -> SeekFrom {
		SeekFrom::Start(self.offset())
	}
}

impl From<Range<u32>> for RegionSector {
	fn from(value: Range<u32>) -> Self {
		RegionSector::new(value.start, (value.end - value.start) as u8)
	}
}

impl std::fmt::Display for RegionSector {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "(offset: {}, count: {})", self.sector_offset(), self.sector_count())
	}
}

impl Readable for RegionSector {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
		Ok(Self(reader.read_value()?))
	}
}

impl Writable for RegionSector {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		writer.write_value(self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn packing() {
		let sector = RegionSector::new(2, 1);
		assert_eq!(sector.bits(), 0x0000_0201);
		assert_eq!(sector.range(), (2, 1));
		assert_eq!(sector.offset(), 8192);
		assert_eq!(sector.end_offset(), 12288);
		assert!(sector.is_present());
		assert!(RegionSector::empty().is_empty());
		// A count without an offset is still absent.
		assert!(!RegionSector::new(0, 3).is_present());
		assert_eq!(RegionSector::from(5u32..9), RegionSector::new(5, 4));
	}

	#[test]
	fn limits() {
		assert!(RegionSector::try_new(MAX_SECTOR_OFFSET, 255).is_ok());
		assert!(matches!(RegionSector::try_new(2, 256), Err(McError::ChunkTooLarge(256))));
		assert!(matches!(RegionSector::try_new(MAX_SECTOR_OFFSET + 1, 1), Err(McError::RegionAllocationFailure)));
	}

	#[test]
	fn split_and_intersect() {
		let sector = RegionSector::new(10, 5);
		let (left, right) = sector.split_left(2).unwrap();
		assert_eq!(left, RegionSector::new(10, 2));
		assert_eq!(right, RegionSector::new(12, 3));
		assert!(sector.split_left(6).is_none());
		assert!(sector.intersects(RegionSector::new(14, 1)));
		assert!(!sector.intersects(RegionSector::new(15, 1)));
		assert!(!left.intersects(right));
	}

	#[test]
	fn io() {
		let mut buffer = Vec::new();
		buffer.write_value(RegionSector::new(0x010203, 4)).unwrap();
		assert_eq!(buffer, [1, 2, 3, 4]);
		let sector: RegionSector = std::io::Cursor::new(buffer).read_value().unwrap();
		assert_eq!(sector, RegionSector::new(0x010203, 4));
	}
}
