use std::io::{
	self,
	Read, Write,
	Seek,
};

use flate2::Compression;

use crate::{
	McResult, McError,
	ioext::*,
	nbt::{
		self,
		NamedTag,
	},
};

use super::{
	compressionscheme::CompressionScheme,
	sector::{
		RegionSector,
		MAX_SECTOR_COUNT,
	},
	pad_size,
	required_sectors,
};

/// The bytes that precede the payload of a record: a u32 length and the compression scheme.
pub const RECORD_HEADER_SIZE: u64 = 5;

/// One chunk as it is stored in a region file: the id of the compression
/// scheme and the compressed NBT payload.
///
/// On disk, a record is framed as a 4-byte big-endian length (counting the
/// scheme byte and the payload), the scheme byte, and the payload, followed
/// by zero padding up to the next sector boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
	pub compression_scheme: CompressionScheme,
	pub payload: Vec<u8>,
}

impl ChunkRecord {
	pub fn new(compression_scheme: CompressionScheme, payload: Vec<u8>) -> Self {
		Self {
			compression_scheme,
			payload,
		}
	}

	/// Serializes and compresses a tree.
	pub fn compress(tag: &NamedTag, compression_scheme: CompressionScheme, level: Compression) -> McResult<Self> {
		let data = nbt::serialize(tag)?;
		Ok(Self::new(compression_scheme, compression_scheme.compress(&data, level)?))
	}

	/// The decompressed payload.
	pub fn decompress(&self) -> McResult<Vec<u8>> {
		self.compression_scheme.decompress(&self.payload)
	}

	/// Decompresses and parses the payload.
	pub fn to_nbt(&self) -> McResult<NamedTag> {
		Ok(nbt::parse(&self.decompress()?)?)
	}

	/// The value of the length field: the scheme byte plus the payload.
	pub fn compressed_length(&self) -> u64 {
		1 + self.payload.len() as u64
	}

	/// The size of the record without padding.
	pub fn framed_size(&self) -> u64 {
		4 + self.compressed_length()
	}

	/// The number of sectors needed to store this record.
	pub fn sector_count(&self) -> McResult<u8> {
		let framed_size = self.framed_size();
		let count = u32::try_from(framed_size)
			.map(required_sectors)
			.unwrap_or(u32::MAX);
		if count > MAX_SECTOR_COUNT {
			return Err(McError::ChunkTooLarge(count));
		}
		Ok(count as u8)
	}

	/// Reads the record stored in `sector`.
	/// `stream_len` is the size of the region file, used to detect records
	/// that claim more bytes than the file has.
	pub fn read_from_sector<R: Read + Seek>(reader: &mut R, sector: RegionSector, stream_len: u64) -> McResult<Self> {
		let available = sector.size().min(stream_len.saturating_sub(sector.offset()));
		if available < RECORD_HEADER_SIZE {
			return Err(McError::TruncatedPayload {
				declared: RECORD_HEADER_SIZE,
				available,
			});
		}
		reader.seek(sector.seeker())?;
		let length: u32 = reader.read_value()?;
		if length == 0 {
			return Err(McError::CorruptPayload(io::Error::new(
				io::ErrorKind::InvalidData,
				"Chunk record has a length of zero.",
			)));
		}
		if length as u64 > available - 4 {
			return Err(McError::TruncatedPayload {
				declared: length as u64,
				available: available - 4,
			});
		}
		let compression_scheme: CompressionScheme = reader.read_value()?;
		let mut payload = vec![0u8; length as usize - 1];
		reader.read_exact(&mut payload)?;
		Ok(Self::new(compression_scheme, payload))
	}
}

impl Writable for ChunkRecord {
	/// Writes the framed record including the padding to the next sector boundary.
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		let length = u32::try_from(self.compressed_length())
			.map_err(|_| McError::ChunkTooLarge(u32::MAX))?;
		writer.write_value(length)?;
		writer.write_value(self.compression_scheme)?;
		writer.write_all(&self.payload)?;
		let padding = pad_size(self.framed_size());
		writer.write_zeroes(padding)?;
		Ok((self.framed_size() + padding) as usize)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	#[test]
	fn framing() {
		let record = ChunkRecord::new(CompressionScheme::Uncompressed, vec![10, 0, 0, 0]);
		let mut buffer = Vec::new();
		assert_eq!(record.write_to(&mut buffer).unwrap(), 4096);
		assert_eq!(&buffer[..9], &[0, 0, 0, 5, 3, 10, 0, 0, 0]);
		assert!(buffer[9..].iter().all(|&b| b == 0));
		assert_eq!(record.sector_count().unwrap(), 1);

		let mut file = vec![0u8; 8192];
		file.extend_from_slice(&buffer);
		let len = file.len() as u64;
		let read = ChunkRecord::read_from_sector(&mut Cursor::new(file), RegionSector::new(2, 1), len).unwrap();
		assert_eq!(read, record);
		assert_eq!(read.to_nbt().unwrap(), NamedTag::default());
	}

	#[test]
	fn sector_counts() {
		let exact = ChunkRecord::new(CompressionScheme::Uncompressed, vec![0; 4091]);
		assert_eq!(exact.sector_count().unwrap(), 1);
		let over = ChunkRecord::new(CompressionScheme::Uncompressed, vec![0; 4092]);
		assert_eq!(over.sector_count().unwrap(), 2);
		let huge = ChunkRecord::new(CompressionScheme::Uncompressed, vec![0; 255 * 4096]);
		assert!(matches!(huge.sector_count(), Err(McError::ChunkTooLarge(256))));
	}

	#[test]
	fn truncated_records() {
		let mut file = vec![0u8; 8192 + 4096];
		// Claims 5000 bytes inside a single sector.
		file[8192..8197].copy_from_slice(&[0, 0, 0x13, 0x88, 2]);
		let len = file.len() as u64;
		let mut reader = Cursor::new(file);
		let result = ChunkRecord::read_from_sector(&mut reader, RegionSector::new(2, 1), len);
		assert!(matches!(result, Err(McError::TruncatedPayload { declared: 5000, available: 4092 })));
		// The sector table claims more sectors than the file has.
		let result = ChunkRecord::read_from_sector(&mut reader, RegionSector::new(3, 1), len);
		assert!(matches!(result, Err(McError::TruncatedPayload { declared: 5, available: 0 })));
	}

	#[test]
	fn scheme_is_checked_before_payload() {
		let mut file = vec![0u8; 8192 + 4096];
		file[8192..8197].copy_from_slice(&[0, 0, 0, 3, 5]);
		let len = file.len() as u64;
		let result = ChunkRecord::read_from_sector(&mut Cursor::new(file), RegionSector::new(2, 1), len);
		assert!(matches!(result, Err(McError::UnsupportedCompression(5))));
	}
}
