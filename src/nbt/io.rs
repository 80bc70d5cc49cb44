//! Binary reading and writing of NBT trees.
//!
//! Reading works on a [ByteCursor] over the whole decompressed payload. Every
//! length read from the input is checked against what is left in the input
//! before anything is allocated for it.

use std::io::{
	Read,
	Write,
};

use byteorder::{
	BigEndian,
	ByteOrder,
	WriteBytesExt,
};

use crate::nbt::{
	Map,
	NbtError,
	NbtResult,
	tag::*,
	tagtype::min_payload_size,
};

/// Maximum nesting of Lists and Compounds.
pub const MAX_DEPTH: usize = 512;

/// A read cursor over a byte slice that refuses to read past its end.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
	data: &'a [u8],
	position: usize,
}

macro_rules! cursor_reads {
	($($name:ident -> $type:ty = $size:literal, $read:path;)+) => {
		$(
			pub fn $name(&mut self) -> NbtResult<$type> {
				Ok($read(self.take($size)?))
			}
		)+
	};
}

impl<'a> ByteCursor<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			position: 0,
		}
	}

	pub fn position(&self) -> usize {
		self.position
	}

	pub fn remaining(&self) -> usize {
		self.data.len() - self.position
	}

	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// Takes the next `count` bytes, failing if fewer are left.
	pub fn take(&mut self, count: usize) -> NbtResult<&'a [u8]> {
		if count > self.remaining() {
			return Err(NbtError::UnexpectedEof);
		}
		let start = self.position;
		self.position += count;
		Ok(&self.data[start..self.position])
	}

	pub fn read_u8(&mut self) -> NbtResult<u8> {
		Ok(self.take(1)?[0])
	}

	pub fn read_i8(&mut self) -> NbtResult<i8> {
		Ok(self.read_u8()? as i8)
	}

	cursor_reads!{
		read_u16 -> u16 = 2, BigEndian::read_u16;
		read_i16 -> i16 = 2, BigEndian::read_i16;
		read_i32 -> i32 = 4, BigEndian::read_i32;
		read_i64 -> i64 = 8, BigEndian::read_i64;
		read_f32 -> f32 = 4, BigEndian::read_f32;
		read_f64 -> f64 = 8, BigEndian::read_f64;
	}

	/// Reads a u16 length prefix followed by that many bytes of modified UTF-8.
	pub fn read_string(&mut self) -> NbtResult<String> {
		let length = self.read_u16()? as usize;
		let bytes = self.take(length)?;
		cesu8::from_java_cesu8(bytes)
			.map(|text| text.into_owned())
			.map_err(|_| NbtError::InvalidString)
	}

	/// Reads an i32 element count and makes sure that `count` elements of
	/// at least `element_size` bytes each can still be read.
	fn read_array_length(&mut self, element_size: usize) -> NbtResult<usize> {
		let count = self.read_i32()?;
		if count < 0 {
			return Err(NbtError::NegativeArrayLength(count));
		}
		let count = count as usize;
		if count.saturating_mul(element_size) > self.remaining() {
			return Err(NbtError::UnexpectedEof);
		}
		Ok(count)
	}
}

/// Parses a complete NBT document: a named root Compound.
/// A lone End byte is read as an empty, unnamed root.
pub fn parse(bytes: &[u8]) -> NbtResult<NamedTag> {
	let mut cursor = ByteCursor::new(bytes);
	read_root(&mut cursor)
}

/// Reads a whole stream and parses it with [parse].
pub fn read_nbt<R: Read>(reader: &mut R) -> NbtResult<NamedTag> {
	let mut bytes = Vec::new();
	reader.read_to_end(&mut bytes)?;
	parse(&bytes)
}

pub fn read_root(cursor: &mut ByteCursor<'_>) -> NbtResult<NamedTag> {
	let id = TagID::try_from(cursor.read_u8()?)?;
	match id {
		TagID::End => Ok(NamedTag::default()),
		TagID::Compound => {
			let name = cursor.read_string()?;
			let root = read_compound(cursor, 1)?;
			Ok(NamedTag {
				name,
				root,
			})
		}
		other => Err(NbtError::RootNotCompound(other)),
	}
}

fn read_compound(cursor: &mut ByteCursor<'_>, depth: usize) -> NbtResult<Map> {
	let mut map = Map::new();
	loop {
		if cursor.is_empty() {
			return Err(NbtError::UnterminatedCompound);
		}
		let id = TagID::try_from(cursor.read_u8()?)?;
		if id == TagID::End {
			return Ok(map);
		}
		let name = cursor.read_string()?;
		let tag = read_payload(cursor, id, depth)?;
		map.insert(name, tag);
	}
}

fn read_list(cursor: &mut ByteCursor<'_>, depth: usize) -> NbtResult<ListTag> {
	let kind = TagID::try_from(cursor.read_u8()?)?;
	let count = cursor.read_i32()?;
	if count <= 0 {
		return Ok(ListTag::with_kind(kind));
	}
	if kind == TagID::End {
		return Err(NbtError::NonEmptyEndList(count));
	}
	let count = count as usize;
	if count.saturating_mul(min_payload_size(kind)) > cursor.remaining() {
		return Err(NbtError::UnexpectedEof);
	}
	let items = (0..count)
		.map(|_| read_payload(cursor, kind, depth))
		.collect::<NbtResult<Vec<Tag>>>()?;
	Ok(ListTag::from_parts(kind, items))
}

/// Reads the payload of a tag whose kind is already known.
fn read_payload(cursor: &mut ByteCursor<'_>, id: TagID, depth: usize) -> NbtResult<Tag> {
	Ok(match id {
		TagID::End => return Err(NbtError::UnknownTagKind(0)),
		TagID::Byte => Tag::Byte(cursor.read_i8()?),
		TagID::Short => Tag::Short(cursor.read_i16()?),
		TagID::Int => Tag::Int(cursor.read_i32()?),
		TagID::Long => Tag::Long(cursor.read_i64()?),
		TagID::Float => Tag::Float(cursor.read_f32()?),
		TagID::Double => Tag::Double(cursor.read_f64()?),
		TagID::ByteArray => {
			let count = cursor.read_array_length(1)?;
			Tag::ByteArray(cursor.take(count)?.iter().map(|&b| b as i8).collect())
		}
		TagID::String => Tag::String(cursor.read_string()?),
		TagID::List => {
			check_depth(depth + 1)?;
			Tag::List(read_list(cursor, depth + 1)?)
		}
		TagID::Compound => {
			check_depth(depth + 1)?;
			Tag::Compound(read_compound(cursor, depth + 1)?)
		}
		TagID::IntArray => {
			let count = cursor.read_array_length(4)?;
			let mut values = vec![0i32; count];
			BigEndian::read_i32_into(cursor.take(count * 4)?, &mut values);
			Tag::IntArray(values)
		}
		TagID::LongArray => {
			let count = cursor.read_array_length(8)?;
			let mut values = vec![0i64; count];
			BigEndian::read_i64_into(cursor.take(count * 8)?, &mut values);
			Tag::LongArray(values)
		}
	})
}

fn check_depth(depth: usize) -> NbtResult<()> {
	if depth > MAX_DEPTH {
		Err(NbtError::DepthLimitExceeded)
	} else {
		Ok(())
	}
}

/// Serializes a named root Compound to bytes.
pub fn serialize(named: &NamedTag) -> NbtResult<Vec<u8>> {
	let mut buffer = Vec::new();
	write_nbt(&mut buffer, named)?;
	Ok(buffer)
}

/// Writes a named root Compound. Returns the number of bytes written.
pub fn write_nbt<W: Write>(writer: &mut W, named: &NamedTag) -> NbtResult<usize> {
	writer.write_u8(TagID::Compound.id())?;
	let size = write_string(writer, &named.name)?;
	Ok(1 + size + write_compound(writer, &named.root, 1)?)
}

fn write_string<W: Write>(writer: &mut W, value: &str) -> NbtResult<usize> {
	let bytes = cesu8::to_java_cesu8(value);
	if bytes.len() > u16::MAX as usize {
		return Err(NbtError::LengthOverflow(bytes.len()));
	}
	writer.write_u16::<BigEndian>(bytes.len() as u16)?;
	writer.write_all(&bytes)?;
	Ok(2 + bytes.len())
}

fn write_length<W: Write>(writer: &mut W, length: usize) -> NbtResult<usize> {
	if length > i32::MAX as usize {
		return Err(NbtError::LengthOverflow(length));
	}
	writer.write_i32::<BigEndian>(length as i32)?;
	Ok(4)
}

fn write_compound<W: Write>(writer: &mut W, map: &Map, depth: usize) -> NbtResult<usize> {
	let mut size = 1;
	for (name, tag) in map {
		writer.write_u8(tag.id().id())?;
		size += 1 + write_string(writer, name)?;
		size += write_payload(writer, tag, depth)?;
	}
	writer.write_u8(TagID::End.id())?;
	Ok(size)
}

fn write_payload<W: Write>(writer: &mut W, tag: &Tag, depth: usize) -> NbtResult<usize> {
	Ok(match tag {
		Tag::Byte(value) => {
			writer.write_i8(*value)?;
			1
		}
		Tag::Short(value) => {
			writer.write_i16::<BigEndian>(*value)?;
			2
		}
		Tag::Int(value) => {
			writer.write_i32::<BigEndian>(*value)?;
			4
		}
		Tag::Long(value) => {
			writer.write_i64::<BigEndian>(*value)?;
			8
		}
		Tag::Float(value) => {
			writer.write_f32::<BigEndian>(*value)?;
			4
		}
		Tag::Double(value) => {
			writer.write_f64::<BigEndian>(*value)?;
			8
		}
		Tag::ByteArray(values) => {
			write_length(writer, values.len())?;
			let bytes = values.iter().map(|&b| b as u8).collect::<Vec<u8>>();
			writer.write_all(&bytes)?;
			4 + bytes.len()
		}
		Tag::String(value) => write_string(writer, value)?,
		Tag::List(list) => {
			check_depth(depth + 1)?;
			writer.write_u8(list.kind().id())?;
			let mut size = 1 + write_length(writer, list.len())?;
			for item in list {
				if item.id() != list.kind() {
					return Err(NbtError::ListKindMismatch {
						expected: list.kind(),
						found: item.id(),
					});
				}
				size += write_payload(writer, item, depth + 1)?;
			}
			size
		}
		Tag::Compound(map) => {
			check_depth(depth + 1)?;
			write_compound(writer, map, depth + 1)?
		}
		Tag::IntArray(values) => {
			write_length(writer, values.len())?;
			for value in values {
				writer.write_i32::<BigEndian>(*value)?;
			}
			4 + values.len() * 4
		}
		Tag::LongArray(values) => {
			write_length(writer, values.len())?;
			for value in values {
				writer.write_i64::<BigEndian>(*value)?;
			}
			4 + values.len() * 8
		}
	})
}
