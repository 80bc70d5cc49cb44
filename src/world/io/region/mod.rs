pub mod header;
pub mod sector;
pub mod timestamp;
pub mod coord;
pub mod compressionscheme;
pub mod managedsector;
pub mod sectormanager;
pub mod record;
pub mod regionfile;

pub use compressionscheme::{
	CompressionScheme,
	decode,
	encode,
};
pub use coord::RegionCoord;
pub use header::{
	ChunkSlot,
	RegionHeader,
	SectorTable,
	TimestampTable,
};
pub use record::ChunkRecord;
pub use regionfile::{
	RegionFile,
	RegionOptions,
};
pub use sector::RegionSector;
pub use sectormanager::{
	SectorAllocator,
	SectorManager,
};
pub use timestamp::Timestamp;

/// Tests if a value is a multiple of 4096.
pub const fn is_multiple_of_4096(n: u64) -> bool {
	(n & 4095) == 0
}

/// Counts the number of 4KiB sectors required to accomodate `size` bytes.
pub const fn required_sectors(size: u32) -> u32 {
	let sub = size.overflowing_shr(12).0;
	// true => 1 | false => 0
	let overflow = !is_multiple_of_4096(size as u64) as u32;
	sub + overflow
}

/// Returns the 4KiB pad size for the given size.
/// The pad size is the number of bytes required
/// to add to the size in order to make it a
/// multiple of 4096.
pub const fn pad_size(size: u64) -> u64 {
	(4096 - (size & 4095)) & 4095
}
