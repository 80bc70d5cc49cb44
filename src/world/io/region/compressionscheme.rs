use std::io::{Read, Write};

use flate2::{
	Compression,
	read::{
		GzDecoder,
		ZlibDecoder,
	},
	write::{
		GzEncoder,
		ZlibEncoder,
	},
};

use crate::{
	McResult, McError,
	ioext::*,
};

/// Compression scheme used for writing or reading.
/// The id of the scheme is stored in the byte that follows the length of a chunk record.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionScheme {
	/// GZip compression is used.
	GZip = 1,
	/// ZLib compression is used.
	#[default]
	ZLib = 2,
	/// Data is uncompressed.
	Uncompressed = 3,
	/// LZ4 block stream, as written by newer versions of the game.
	#[cfg(feature = "lz4")]
	Lz4 = 4,
}

impl CompressionScheme {
	pub fn from_id(id: u8) -> McResult<Self> {
		Ok(match id {
			1 => Self::GZip,
			2 => Self::ZLib,
			3 => Self::Uncompressed,
			#[cfg(feature = "lz4")]
			4 => Self::Lz4,
			unexpected => return Err(McError::UnsupportedCompression(unexpected)),
		})
	}

	pub const fn id(self) -> u8 {
		self as u8
	}

	/// Decompress a chunk payload. Data that can not be decompressed results
	/// in [McError::CorruptPayload].
	pub fn decompress(self, data: &[u8]) -> McResult<Vec<u8>> {
		let mut buffer = Vec::new();
		let result = match self {
			Self::GZip => GzDecoder::new(data).read_to_end(&mut buffer),
			Self::ZLib => ZlibDecoder::new(data).read_to_end(&mut buffer),
			Self::Uncompressed => return Ok(data.to_vec()),
			#[cfg(feature = "lz4")]
			Self::Lz4 => lz4_java_wrc::Lz4BlockInput::new(data).read_to_end(&mut buffer),
		};
		result.map_err(McError::CorruptPayload)?;
		Ok(buffer)
	}

	/// Compress a chunk payload. `level` is ignored by schemes that have no levels.
	pub fn compress(self, data: &[u8], level: Compression) -> McResult<Vec<u8>> {
		Ok(match self {
			Self::GZip => {
				let mut encoder = GzEncoder::new(Vec::new(), level);
				encoder.write_all(data)?;
				encoder.finish()?
			}
			Self::ZLib => {
				let mut encoder = ZlibEncoder::new(Vec::new(), level);
				encoder.write_all(data)?;
				encoder.finish()?
			}
			Self::Uncompressed => data.to_vec(),
			#[cfg(feature = "lz4")]
			Self::Lz4 => {
				let mut buffer = Vec::new();
				let mut encoder = lz4_java_wrc::Lz4BlockOutput::new(&mut buffer);
				encoder.write_all(data)?;
				encoder.flush()?;
				drop(encoder);
				buffer
			}
		})
	}
}

/// Decompress `data` that was stored with the scheme `scheme_id`.
/// The id is checked before the data is looked at.
pub fn decode(scheme_id: u8, data: &[u8]) -> McResult<Vec<u8>> {
	CompressionScheme::from_id(scheme_id)?.decompress(data)
}

/// Compress `data` with the default level of `scheme`.
pub fn encode(scheme: CompressionScheme, data: &[u8]) -> McResult<Vec<u8>> {
	scheme.compress(data, Compression::default())
}

impl TryFrom<u8> for CompressionScheme {
	type Error = McError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Self::from_id(value)
	}
}

impl Writable for CompressionScheme {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		writer.write_value(self.id())
	}
}

impl Readable for CompressionScheme {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
		Self::from_id(reader.read_value::<u8>()?)
	}
}
