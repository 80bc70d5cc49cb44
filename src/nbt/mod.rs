//! The NBT (Named Binary Tag) tree model and its binary codec.

pub mod tag;
pub mod tagtype;
pub mod io;
pub mod format;
pub mod tagpath;
pub mod tagref;
pub mod macros;

use thiserror::Error;

use tag::TagID;

pub use tag::{
	Tag,
	ListTag,
	NamedTag,
};
pub use tagpath::{
	TagPath,
	TagPathPart,
	IntoTagPath,
};
pub use tagref::TagContainer;
pub use io::{
	parse,
	serialize,
};

/// Compound entries keep the order they were read (or inserted) in so that
/// a tree serializes back to the same bytes it was parsed from.
pub type MapType<T> = indexmap::IndexMap<String, T>;

pub type Map = MapType<Tag>;

#[derive(Debug, Error)]
pub enum NbtError {
	#[error("IO Error: {0}")]
	IoError(#[from] std::io::Error),
	#[error("Unknown Tag ID: {0}")]
	UnknownTagKind(u8),
	#[error("Array length can not be negative ({0}).")]
	NegativeArrayLength(i32),
	#[error("Input ended before the Compound was closed by an End tag.")]
	UnterminatedCompound,
	#[error("Input ended in the middle of a value.")]
	UnexpectedEof,
	#[error("String is not valid modified UTF-8.")]
	InvalidString,
	#[error("List of End tags claims to contain {0} elements.")]
	NonEmptyEndList(i32),
	#[error("Root tag must be a Compound, found {0:?}.")]
	RootNotCompound(TagID),
	#[error("Tags are nested deeper than {} levels.", io::MAX_DEPTH)]
	DepthLimitExceeded,
	#[error("Length of {0} does not fit in its length prefix.")]
	LengthOverflow(usize),
	#[error("List holds {expected:?} elements, but a {found:?} was given.")]
	ListKindMismatch {
		expected: TagID,
		found: TagID,
	},
}

pub type NbtResult<T> = Result<T, NbtError>;
