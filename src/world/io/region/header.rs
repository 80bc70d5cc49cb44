use crate::{
	ioext::*,
	McResult,
};

use super::sector::*;
use super::timestamp::*;
use super::coord::*;

use std::{
	io::{
		Read, Write,
	},
	ops::{
		Index, IndexMut,
	},
};

/// Defines the offset in a region file where the table
/// of a specific entry type can be found.
/// Implemented for [RegionSector] and [Timestamp].
pub trait RegionTableItem {
	/// The offset in the file that this type's table begins.
	const OFFSET: u64;
}

impl RegionTableItem for RegionSector {
	// Determines the offset of the table for the RegionSector type.
	const OFFSET: u64 = 0;
}

impl RegionTableItem for Timestamp {
	// Determines the offset of the table for the Timestamp type.
	const OFFSET: u64 = 4096;
}

/// A table of 1024 elements that contain information related to
/// a Minecraft chunk within a Region file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTable<T: RegionTableItem>(Box<[T; 1024]>);

/// A table of 1024 [RegionSector] elements for each potential chunk in
/// a 32x32 chunk region file.
pub type SectorTable = RegionTable<RegionSector>;

/// A table of 1024 [Timestamp] elements for each potential chunk in a
/// 32x32 chunk region file.
pub type TimestampTable = RegionTable<Timestamp>;

/// The location entry and timestamp of one chunk slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChunkSlot {
	pub sector: RegionSector,
	pub timestamp: Timestamp,
}

impl ChunkSlot {
	/// Whether the slot holds a chunk.
	pub fn is_present(&self) -> bool {
		self.sector.is_present()
	}
}

/// The header at the beginning of every region file.
/// It contains 1024 [RegionSector] elements and 1024 [Timestamp] elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionHeader {
	/// The sector table, containing information about where chunks exist
	/// in the file.
	pub sectors: SectorTable,
	/// The timestamp table, which tells the last modification time for the chunk.
	pub timestamps: TimestampTable,
}

impl<T: RegionTableItem> RegionTable<T> {
	pub const OFFSET: u64 = T::OFFSET;

	/// Returns an iterator of the elements in the table.
	pub fn iter(&self) -> std::slice::Iter<T> {
		self.0.iter()
	}

	/// Returns a mutable iterator of the elements in the table.
	pub fn iter_mut(&mut self) -> std::slice::IterMut<T> {
		self.0.iter_mut()
	}

	/// The position of the entry for `coord` in the file.
	pub fn entry_offset(coord: RegionCoord) -> u64 {
		Self::OFFSET + coord.index() as u64 * 4
	}
}

impl<T: RegionTableItem> IntoIterator for RegionTable<T> {
	type Item = T;
	type IntoIter = std::array::IntoIter<T, 1024>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<T: Default + Copy + RegionTableItem> Default for RegionTable<T> {
	fn default() -> Self {
		Self(Box::new([T::default(); 1024]))
	}
}

impl<C: Into<RegionCoord>,T: RegionTableItem> Index<C> for RegionTable<T> {
	type Output = T;

	fn index(&self, index: C) -> &Self::Output {
		let coord: RegionCoord = index.into();
		&self.0[coord.index()]
	}
}

impl<C: Into<RegionCoord>,T: RegionTableItem> IndexMut<C> for RegionTable<T> {
	fn index_mut(&mut self, index: C) -> &mut Self::Output {
		let coord: RegionCoord = index.into();
		&mut self.0[coord.index()]
	}
}

impl<T: Readable + Default + Copy + RegionTableItem> Readable for RegionTable<T> {
	/// Reads all 1024 entries. There is no special case for the final entry.
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
		let mut table = Box::new([T::default(); 1024]);
		for entry in table.iter_mut() {
			*entry = T::read_from(reader)?;
		}
		Ok(Self(table))
	}
}

impl<T: Writable + RegionTableItem> Writable for RegionTable<T> {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		self.0.iter().try_fold(0, |write_size, entry| -> McResult<usize> {
			Ok(write_size + entry.write_to(writer)?)
		})
	}
}

impl<T: RegionTableItem> From<[T; 1024]> for RegionTable<T> {
	fn from(value: [T; 1024]) -> Self {
		Self(Box::new(value))
	}
}


impl RegionHeader {
	/// The size of the header in bytes (two tables of 1024 4-byte entries).
	pub const SIZE: u64 = 8192;

	pub fn slot<C: Into<RegionCoord>>(&self, coord: C) -> ChunkSlot {
		let coord: RegionCoord = coord.into();
		ChunkSlot {
			sector: self.sectors[coord],
			timestamp: self.timestamps[coord],
		}
	}
}

impl Readable for RegionHeader {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
		Ok(Self {
			sectors: SectorTable::read_from(reader)?,
			timestamps: TimestampTable::read_from(reader)?,
		})
	}
}

impl Writable for RegionHeader {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		Ok(
			self.sectors.write_to(writer)? + self.timestamps.write_to(writer)?
		)
	}
}
#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	#[test]
	fn header_round_trip() {
		let mut header = RegionHeader::default();
		header.sectors[(31, 31)] = RegionSector::new(2, 1);
		header.timestamps[(31, 31)] = Timestamp::from(1_700_000_000u32);
		header.sectors[(0, 0)] = RegionSector::new(3, 2);
		let mut buffer = Vec::new();
		assert_eq!(header.write_to(&mut buffer).unwrap(), 8192);
		assert_eq!(buffer.len() as u64, RegionHeader::SIZE);
		// The very last location entry is at 4092..4096.
		assert_eq!(&buffer[4092..4096], &[0, 0, 2, 1]);
		assert_eq!(&buffer[0..4], &[0, 0, 3, 2]);
		let read = RegionHeader::read_from(&mut Cursor::new(buffer)).unwrap();
		assert_eq!(read.slot((31, 31)), ChunkSlot {
			sector: RegionSector::new(2, 1),
			timestamp: Timestamp::from(1_700_000_000u32),
		});
		assert!(read.slot((0, 0)).is_present());
		assert!(!read.slot((1, 0)).is_present());
		assert_eq!(SectorTable::entry_offset(RegionCoord::new(31, 31)), 4092);
		assert_eq!(TimestampTable::entry_offset(RegionCoord::new(0, 1)), 4096 + 128);
	}

	#[test]
	fn short_header_fails() {
		let result = RegionHeader::read_from(&mut Cursor::new(vec![0u8; 8191]));
		assert!(matches!(result, Err(crate::McError::IoError(_))));
	}
}
