use std::{
	fs::File,
	io::{
		self,
		Cursor,
		Read, Write,
		Seek, SeekFrom,
	},
};

use byteorder::{
	BigEndian,
	ReadBytesExt,
	WriteBytesExt,
};

use crate::McResult;

/// A type that can be read from a big-endian byte stream.
pub trait Readable: Sized {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self>;
}

/// A type that can be written to a big-endian byte stream.
/// Returns the number of bytes written.
pub trait Writable {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize>;
}

macro_rules! __primitive_io {
	($type:ty, $read:ident, $write:ident, $size:expr) => {
		impl Readable for $type {
			fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
				Ok(reader.$read::<BigEndian>()?)
			}
		}

		impl Writable for $type {
			fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
				writer.$write::<BigEndian>(*self)?;
				Ok($size)
			}
		}
	};
}

__primitive_io!(u16, read_u16, write_u16, 2);
__primitive_io!(u32, read_u32, write_u32, 4);
__primitive_io!(i32, read_i32, write_i32, 4);
__primitive_io!(u64, read_u64, write_u64, 8);

impl Readable for u8 {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
		Ok(reader.read_u8()?)
	}
}

impl Writable for u8 {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		writer.write_u8(*self)?;
		Ok(1)
	}
}

pub trait ReadExt: Read + Sized {
	fn read_value<T: Readable>(&mut self) -> McResult<T> {
		T::read_from(self)
	}
}

impl<R: Read> ReadExt for R {}

pub trait WriteExt: Write + Sized {
	fn write_value<T: Writable>(&mut self, value: T) -> McResult<usize> {
		value.write_to(self)
	}
}

impl<W: Write> WriteExt for W {}

pub trait SeekExt: Seek {
	/// The total length of the stream. The stream position is preserved.
	fn stream_size(&mut self) -> io::Result<u64> {
		let ret = self.stream_position()?;
		let len = self.seek(SeekFrom::End(0))?;
		if ret != len {
			self.seek(SeekFrom::Start(ret))?;
		}
		Ok(len)
	}
}

impl<S: Seek> SeekExt for S {}

pub trait WriteZeroes {
	fn write_zeroes(&mut self, count: u64) -> io::Result<u64>;
}

impl<T: Write> WriteZeroes for T {
	fn write_zeroes(&mut self, count: u64) -> io::Result<u64> {
		const ZEROES: &'static [u8; 4096] = &[0u8; 4096];
		let mut remainder = count;
		while remainder >= ZEROES.len() as u64 {
			self.write_all(ZEROES)?;
			remainder -= ZEROES.len() as u64;
		}
		if remainder != 0 {
			self.write_all(&ZEROES[0..remainder as usize])?;
		}
		Ok(count)
	}
}

/// The storage a region file lives in.
/// On top of reading, writing, and seeking, a store must be able to
/// grow or shrink to an exact length.
pub trait RegionStore: Read + Write + Seek {
	fn set_len(&mut self, len: u64) -> io::Result<()>;

	/// Flush written bytes down to the underlying medium.
	fn sync(&mut self) -> io::Result<()> {
		self.flush()
	}
}

impl RegionStore for File {
	fn set_len(&mut self, len: u64) -> io::Result<()> {
		File::set_len(self, len)
	}

	fn sync(&mut self) -> io::Result<()> {
		self.flush()?;
		self.sync_data()
	}
}

impl RegionStore for Cursor<Vec<u8>> {
	fn set_len(&mut self, len: u64) -> io::Result<()> {
		self.get_mut().resize(len as usize, 0);
		Ok(())
	}
}

impl<T: RegionStore + ?Sized> RegionStore for &mut T {
	fn set_len(&mut self, len: u64) -> io::Result<()> {
		(**self).set_len(len)
	}

	fn sync(&mut self) -> io::Result<()> {
		(**self).sync()
	}
}
