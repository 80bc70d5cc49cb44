use crate::nbt::Map;
use crate::nbt::tag::{
	TagID,
	ListTag,
};

pub type Byte = i8;
pub type Short = i16;
pub type Int = i32;
pub type Long = i64;
pub type Float = f32;
pub type Double = f64;
pub type ByteArray = Vec<i8>;
pub type String = std::string::String; // Lol (for solidarity and isomorphism)
pub type Compound = Map;
pub type IntArray = Vec<i32>;
pub type LongArray = Vec<i64>;

/// Rust types that map onto exactly one NBT tag kind.
pub trait TypeId {
	fn tag_id() -> TagID;
}

macro_rules! typeid_impls {
	($($types:ty => $id:expr;)+) => {
		$(
			impl TypeId for $types {
				fn tag_id() -> TagID {
					$id
				}
			}
		)+
	};
}

typeid_impls!(
	Byte => TagID::Byte;
	Short => TagID::Short;
	Int => TagID::Int;
	Long => TagID::Long;
	Float => TagID::Float;
	Double => TagID::Double;
	ByteArray => TagID::ByteArray;
	String => TagID::String;
	&str => TagID::String;
	bool => TagID::Byte;
	ListTag => TagID::List;
	Compound => TagID::Compound;
	IntArray => TagID::IntArray;
	LongArray => TagID::LongArray;
);

/// The smallest number of bytes the payload of a tag of this kind can
/// occupy on the wire. Used to reject element counts that the remaining
/// input could never satisfy before allocating for them.
pub const fn min_payload_size(id: TagID) -> usize {
	match id {
		TagID::End => 0,
		TagID::Byte => 1,
		TagID::Short => 2,
		TagID::Int => 4,
		TagID::Long => 8,
		TagID::Float => 4,
		TagID::Double => 8,
		TagID::ByteArray => 4,
		TagID::String => 2,
		TagID::List => 5,
		TagID::Compound => 1,
		TagID::IntArray => 4,
		TagID::LongArray => 4,
	}
}
