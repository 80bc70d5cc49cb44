use std::io;

use thiserror::Error;

use crate::nbt::{
	NbtError,
	tagpath::TagPathError,
};
use crate::world::io::region::coord::RegionCoord;

/// The master error type.
#[derive(Debug, Error)]
pub enum McError {
	#[error("IO Error: {0}")]
	IoError(#[from] io::Error),
	#[error("Unsupported compression scheme: {0}")]
	UnsupportedCompression(u8),
	#[error("Compressed payload is corrupt: {0}")]
	CorruptPayload(#[source] io::Error),
	#[error("NBT Error: {0}")]
	Nbt(#[from] NbtError),
	#[error("Declared chunk length of {declared} bytes exceeds the {available} bytes available.")]
	TruncatedPayload {
		declared: u64,
		available: u64,
	},
	#[error("Chunk slot is empty.")]
	EmptySlot,
	#[error("Chunk data requires {0} sectors, but a slot can hold at most 255.")]
	ChunkTooLarge(u32),
	#[error("Region file is too small to contain a header ({0} bytes).")]
	InvalidRegionFile(u64),
	#[error("Failed to allocate RegionSector.")]
	RegionAllocationFailure,
	#[error("Nothing found at path \"{0}\".")]
	PathNotFound(String),
	#[error("Tag at \"{0}\" can not contain children.")]
	NotAContainer(String),
	#[error("Tag at \"{0}\" is not a List.")]
	NotAList(String),
	#[error("An empty path does not name a child tag.")]
	EmptyPath,
	#[error("Tag Path Error: {0}")]
	TagPath(#[from] TagPathError),
}

impl McError {
	/// Attach the coordinate of the chunk slot that this error belongs to.
	pub fn at(self, coord: RegionCoord) -> ChunkError {
		ChunkError {
			coord,
			error: self,
		}
	}
}

pub type McResult<T> = Result<T,McError>;

/// An error that happened while working with a single chunk slot.
/// Errors on one slot never affect its siblings, so callers that walk a
/// whole region can record these and keep going.
#[derive(Debug, Error)]
#[error("Chunk {coord}: {error}")]
pub struct ChunkError {
	pub coord: RegionCoord,
	#[source]
	pub error: McError,
}

impl ChunkError {
	pub fn kind(&self) -> &McError {
		&self.error
	}

	pub fn into_inner(self) -> McError {
		self.error
	}
}

pub type ChunkResult<T> = Result<T,ChunkError>;

/// Extension for attaching a chunk coordinate to a failing [McResult].
pub trait AtChunk<T> {
	fn at(self, coord: RegionCoord) -> ChunkResult<T>;
}

impl<T, E: Into<McError>> AtChunk<T> for Result<T, E> {
	fn at(self, coord: RegionCoord) -> ChunkResult<T> {
		self.map_err(|error| McError::at(error.into(), coord))
	}
}
