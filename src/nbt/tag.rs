use crate::nbt::{
	Map,
	NbtError,
	NbtResult,
	tagtype::TypeId,
};

/// The kind byte that precedes every named tag (and every list) on the wire.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TagID {
	/// Terminates a Compound. Also the element kind of an untyped empty List.
	#[default]
	End = 0,
	Byte = 1,
	Short = 2,
	Int = 3,
	Long = 4,
	Float = 5,
	Double = 6,
	ByteArray = 7,
	String = 8,
	List = 9,
	Compound = 10,
	IntArray = 11,
	LongArray = 12,
}

impl TagID {
	pub const fn id(self) -> u8 {
		self as u8
	}

	pub const fn title(self) -> &'static str {
		match self {
			TagID::End => "End",
			TagID::Byte => "Byte",
			TagID::Short => "Short",
			TagID::Int => "Int",
			TagID::Long => "Long",
			TagID::Float => "Float",
			TagID::Double => "Double",
			TagID::ByteArray => "ByteArray",
			TagID::String => "String",
			TagID::List => "List",
			TagID::Compound => "Compound",
			TagID::IntArray => "IntArray",
			TagID::LongArray => "LongArray",
		}
	}
}

impl TryFrom<u8> for TagID {
	type Error = NbtError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Ok(match value {
			0 => TagID::End,
			1 => TagID::Byte,
			2 => TagID::Short,
			3 => TagID::Int,
			4 => TagID::Long,
			5 => TagID::Float,
			6 => TagID::Double,
			7 => TagID::ByteArray,
			8 => TagID::String,
			9 => TagID::List,
			10 => TagID::Compound,
			11 => TagID::IntArray,
			12 => TagID::LongArray,
			unknown => return Err(NbtError::UnknownTagKind(unknown)),
		})
	}
}

/// A single NBT value.
/// The End tag is never a value; see [TagID::End].
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
	Byte(i8),
	Short(i16),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	ByteArray(Vec<i8>),
	String(String),
	List(ListTag),
	Compound(Map),
	IntArray(Vec<i32>),
	LongArray(Vec<i64>),
}

macro_rules! tag_accessors {
	($($variant:ident => $as_fn:ident -> $type:ty;)+) => {
		$(
			pub fn $as_fn(&self) -> Option<$type> {
				match self {
					Tag::$variant(value) => Some(*value),
					_ => None,
				}
			}
		)+
	};
	(@ref $($variant:ident => $as_fn:ident, $as_mut_fn:ident -> $type:ty;)+) => {
		$(
			pub fn $as_fn(&self) -> Option<&$type> {
				match self {
					Tag::$variant(value) => Some(value),
					_ => None,
				}
			}

			pub fn $as_mut_fn(&mut self) -> Option<&mut $type> {
				match self {
					Tag::$variant(value) => Some(value),
					_ => None,
				}
			}
		)+
	};
}

impl Tag {
	pub fn id(&self) -> TagID {
		match self {
			Tag::Byte(_) => TagID::Byte,
			Tag::Short(_) => TagID::Short,
			Tag::Int(_) => TagID::Int,
			Tag::Long(_) => TagID::Long,
			Tag::Float(_) => TagID::Float,
			Tag::Double(_) => TagID::Double,
			Tag::ByteArray(_) => TagID::ByteArray,
			Tag::String(_) => TagID::String,
			Tag::List(_) => TagID::List,
			Tag::Compound(_) => TagID::Compound,
			Tag::IntArray(_) => TagID::IntArray,
			Tag::LongArray(_) => TagID::LongArray,
		}
	}

	tag_accessors!{
		Byte => as_byte -> i8;
		Short => as_short -> i16;
		Int => as_int -> i32;
		Long => as_long -> i64;
		Float => as_float -> f32;
		Double => as_double -> f64;
	}

	tag_accessors!{@ref
		ByteArray => as_byte_array, as_byte_array_mut -> Vec<i8>;
		String => as_string, as_string_mut -> String;
		List => as_list, as_list_mut -> ListTag;
		Compound => as_compound, as_compound_mut -> Map;
		IntArray => as_int_array, as_int_array_mut -> Vec<i32>;
		LongArray => as_long_array, as_long_array_mut -> Vec<i64>;
	}

	pub fn as_str(&self) -> Option<&str> {
		self.as_string().map(String::as_str)
	}
}

macro_rules! tag_from_impls {
	($($type:ty => $variant:ident;)+) => {
		$(
			impl From<$type> for Tag {
				fn from(value: $type) -> Self {
					Tag::$variant(value)
				}
			}
		)+
	};
}

tag_from_impls!{
	i8 => Byte;
	i16 => Short;
	i32 => Int;
	i64 => Long;
	f32 => Float;
	f64 => Double;
	Vec<i8> => ByteArray;
	String => String;
	ListTag => List;
	Map => Compound;
	Vec<i32> => IntArray;
	Vec<i64> => LongArray;
}

impl From<bool> for Tag {
	fn from(value: bool) -> Self {
		Tag::Byte(value as i8)
	}
}

impl From<&str> for Tag {
	fn from(value: &str) -> Self {
		Tag::String(value.to_owned())
	}
}

/// A List tag. Every element has the same [TagID], and that kind is kept
/// even when the list is empty so that it serializes back the same way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListTag {
	kind: TagID,
	items: Vec<Tag>,
}

impl ListTag {
	/// An empty list without an element kind. The kind is taken from the
	/// first element pushed into it.
	pub fn new() -> Self {
		Self::default()
	}

	/// An empty list that only accepts elements of `kind`.
	pub fn with_kind(kind: TagID) -> Self {
		Self {
			kind,
			items: Vec::new(),
		}
	}

	/// Builds a list from already constructed tags.
	/// Fails if the tags are not all of the same kind.
	pub fn from_tags(items: Vec<Tag>) -> NbtResult<Self> {
		let mut list = ListTag::new();
		list.items.reserve(items.len());
		items.into_iter().try_for_each(|tag| list.push(tag))?;
		Ok(list)
	}

	pub fn kind(&self) -> TagID {
		self.kind
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&Tag> {
		self.items.get(index)
	}

	pub fn get_mut(&mut self, index: usize) -> Option<&mut Tag> {
		self.items.get_mut(index)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
		self.items.iter()
	}

	pub fn as_slice(&self) -> &[Tag] {
		&self.items
	}

	fn accept(&mut self, found: TagID) -> NbtResult<()> {
		if self.kind == TagID::End && self.items.is_empty() {
			self.kind = found;
		}
		if self.kind == found {
			Ok(())
		} else {
			Err(NbtError::ListKindMismatch {
				expected: self.kind,
				found,
			})
		}
	}

	pub fn push(&mut self, tag: Tag) -> NbtResult<()> {
		self.accept(tag.id())?;
		self.items.push(tag);
		Ok(())
	}

	/// Inserts `tag` at `index`, shifting everything after it.
	/// Panics if `index > len`, like [Vec::insert].
	pub fn insert(&mut self, index: usize, tag: Tag) -> NbtResult<()> {
		self.accept(tag.id())?;
		self.items.insert(index, tag);
		Ok(())
	}

	/// Replaces the element at `index`, returning the old element.
	pub fn replace(&mut self, index: usize, tag: Tag) -> NbtResult<Option<Tag>> {
		if index >= self.items.len() {
			return Ok(None);
		}
		self.accept(tag.id())?;
		Ok(Some(std::mem::replace(&mut self.items[index], tag)))
	}

	/// Removes the element at `index`. The element kind is kept.
	pub fn remove(&mut self, index: usize) -> Option<Tag> {
		(index < self.items.len()).then(|| self.items.remove(index))
	}

	pub(crate) fn from_parts(kind: TagID, items: Vec<Tag>) -> Self {
		Self {
			kind,
			items,
		}
	}
}

impl<'a> IntoIterator for &'a ListTag {
	type Item = &'a Tag;
	type IntoIter = std::slice::Iter<'a, Tag>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}

impl IntoIterator for ListTag {
	type Item = Tag;
	type IntoIter = std::vec::IntoIter<Tag>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.into_iter()
	}
}

impl<T: TypeId + Into<Tag>> From<Vec<T>> for ListTag {
	fn from(value: Vec<T>) -> Self {
		Self {
			kind: T::tag_id(),
			items: value.into_iter().map(T::into).collect(),
		}
	}
}

/// The root of an NBT document: a named Compound.
/// Chunk roots are conventionally unnamed (empty name).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamedTag {
	pub name: String,
	pub root: Map,
}

impl NamedTag {
	pub fn new<S: Into<String>>(name: S, root: Map) -> Self {
		Self {
			name: name.into(),
			root,
		}
	}

	pub fn unnamed(root: Map) -> Self {
		Self::new(String::new(), root)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn root(&self) -> &Map {
		&self.root
	}

	pub fn root_mut(&mut self) -> &mut Map {
		&mut self.root
	}

	pub fn into_root(self) -> Map {
		self.root
	}
}

impl From<Map> for NamedTag {
	fn from(value: Map) -> Self {
		NamedTag::unnamed(value)
	}
}
