use std::{
	io::{
		BufReader,
		Read,
		SeekFrom,
	},
	fs::{
		File,
	},
	path::{
		Path,
	},
};

use flate2::Compression;
use log::{
	debug,
	trace,
	warn,
};

use crate::{
	McResult, McError,
	continue_if,
	return_if,
	error::{
		AtChunk,
		ChunkResult,
	},
	ioext::*,
	nbt::NamedTag,
};

use super::{
	compressionscheme::CompressionScheme,
	coord::*,
	header::*,
	is_multiple_of_4096,
	pad_size,
	record::ChunkRecord,
	sector::*,
	sectormanager::*,
	timestamp::*,
};

/// Settings that control how chunks are written back to a region file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionOptions {
	/// The scheme used to compress written chunks.
	pub scheme: CompressionScheme,
	/// The compression level for schemes that support levels.
	pub level: Compression,
	/// Whether writes stamp the slot with the current time.
	/// When this is off, the previous timestamp is kept.
	pub update_timestamps: bool,
}

impl Default for RegionOptions {
	fn default() -> Self {
		Self {
			scheme: CompressionScheme::default(),
			level: Compression::default(),
			update_timestamps: true,
		}
	}
}

impl RegionOptions {
	pub fn scheme(mut self, scheme: CompressionScheme) -> Self {
		self.scheme = scheme;
		self
	}

	pub fn level(mut self, level: Compression) -> Self {
		self.level = level;
		self
	}

	pub fn update_timestamps(mut self, update_timestamps: bool) -> Self {
		self.update_timestamps = update_timestamps;
		self
	}
}

/// A construct for working with RegionFiles.
/// Allows for reading and writing chunks in a region file.
///
/// The header is kept in memory and mirrors the header on disk. Chunk
/// records are only read from the store when they are requested.
/// Every write puts the chunk's bytes in place before the header entry
/// that points to them is written, so a failed write never leaves the
/// header pointing at half-written data.
#[derive(Debug)]
pub struct RegionFile<S = File> {
	header: RegionHeader,
	options: RegionOptions,
	store: S,
}

impl RegionFile<File> {
	/// Opens an existing region file for reading and writing.
	/// The file must be at least 8192 bytes so that it can hold a header.
	pub fn open<P: AsRef<Path>>(path: P) -> McResult<Self> {
		let path = path.as_ref();
		debug!("Opening region file {}.", path.display());
		let file = File::options().read(true).write(true).open(path)?;
		Self::from_store(file)
	}

	/// Creates a region file with an empty header, replacing any file that
	/// already exists at the path.
	pub fn create<P: AsRef<Path>>(path: P) -> McResult<Self> {
		let path = path.as_ref();
		debug!("Creating region file {}.", path.display());
		let file = File::options()
			.read(true)
			.write(true)
			.create(true)
			.truncate(true)
			.open(path)?;
		Self::create_in(file)
	}

	/// Opens the region file at the path, or creates it if there is no file there.
	pub fn open_or_create<P: AsRef<Path>>(path: P) -> McResult<Self> {
		let path = path.as_ref();
		if path.is_file() {
			Self::open(path)
		} else {
			Self::create(path)
		}
	}
}

impl<S: RegionStore> RegionFile<S> {
	/// Reads the header of a region file from the given store.
	pub fn from_store(mut store: S) -> McResult<Self> {
		let stream_len = store.stream_size()?;
		if stream_len < RegionHeader::SIZE {
			return Err(McError::InvalidRegionFile(stream_len));
		}
		store.seek(SeekFrom::Start(0))?;
		let header = {
			let mut reader = BufReader::new((&mut store).take(RegionHeader::SIZE));
			RegionHeader::read_from(&mut reader)?
		};
		for coord in RegionCoord::all() {
			let sector = header.sectors[coord];
			continue_if!(!sector.is_present());
			trace!("Chunk {coord} at {sector}.");
			if sector.sector_offset() < 2 {
				warn!("Chunk {coord} points into the region header {sector}.");
			} else if sector.end_offset() > stream_len {
				warn!("Chunk {coord} extends past the end of the file {sector}.");
			}
		}
		Ok(Self {
			header,
			options: RegionOptions::default(),
			store,
		})
	}

	/// Writes an empty header to the store, discarding anything that was in it.
	pub fn create_in(mut store: S) -> McResult<Self> {
		store.set_len(0)?;
		store.seek(SeekFrom::Start(0))?;
		let header = RegionHeader::default();
		header.write_to(&mut store)?;
		store.sync()?;
		Ok(Self {
			header,
			options: RegionOptions::default(),
			store,
		})
	}

	pub fn with_options(mut self, options: RegionOptions) -> Self {
		self.options = options;
		self
	}

	pub fn set_options(&mut self, options: RegionOptions) {
		self.options = options;
	}

	pub fn options(&self) -> &RegionOptions {
		&self.options
	}

	pub fn header(&self) -> &RegionHeader {
		&self.header
	}

	pub fn slot<C: Into<RegionCoord>>(&self, coord: C) -> ChunkSlot {
		self.header.slot(coord)
	}

	pub fn get_sector<C: Into<RegionCoord>>(&self, coord: C) -> RegionSector {
		self.header.sectors[coord]
	}

	pub fn get_timestamp<C: Into<RegionCoord>>(&self, coord: C) -> Timestamp {
		self.header.timestamps[coord]
	}

	pub fn has_chunk<C: Into<RegionCoord>>(&self, coord: C) -> bool {
		self.header.sectors[coord].is_present()
	}

	/// The coordinates of all populated slots, in slot order.
	pub fn chunks(&self) -> impl Iterator<Item = RegionCoord> + '_ {
		RegionCoord::all().filter(|&coord| self.has_chunk(coord))
	}

	pub fn chunk_count(&self) -> usize {
		self.header.sectors.iter()
			.filter(|sector| sector.is_present())
			.count()
	}

	/// The `(offset, count)` ranges of all populated slots, sorted by offset.
	pub fn occupied_ranges(&self) -> Vec<(u64, u64)> {
		let mut ranges = self.header.sectors.iter()
			.filter(|sector| sector.is_present())
			.map(RegionSector::range)
			.collect::<Vec<_>>();
		ranges.sort();
		ranges
	}

	/// The size of the store in 4KiB sectors, rounded up.
	pub fn sector_count(&mut self) -> McResult<u64> {
		let len = self.store.stream_size()?;
		Ok((len + pad_size(len)) / 4096)
	}

	/// Builds a [SectorManager] that reflects the current sector table.
	pub fn sector_manager(&self) -> SectorManager {
		SectorManager::from_table(&self.header.sectors)
	}

	/// Reads the raw record of a chunk without decompressing it.
	pub fn read_record<C: Into<RegionCoord>>(&mut self, coord: C) -> ChunkResult<ChunkRecord> {
		let coord: RegionCoord = coord.into();
		let sector = self.header.sectors[coord];
		if !sector.is_present() {
			return Err(McError::EmptySlot.at(coord));
		}
		let stream_len = self.store.stream_size().at(coord)?;
		trace!("Reading chunk {coord} from {sector}.");
		ChunkRecord::read_from_sector(&mut self.store, sector, stream_len).at(coord)
	}

	/// Reads, decompresses, and parses a chunk.
	pub fn read_chunk<C: Into<RegionCoord>>(&mut self, coord: C) -> ChunkResult<NamedTag> {
		let coord: RegionCoord = coord.into();
		self.read_record(coord)?.to_nbt().at(coord)
	}

	/// Reads every populated slot. A slot that fails to read has its error
	/// recorded and does not stop the others from being read.
	pub fn read_all(&mut self) -> Vec<(RegionCoord, ChunkResult<NamedTag>)> {
		let coords = self.chunks().collect::<Vec<_>>();
		coords.into_iter()
			.map(|coord| (coord, self.read_chunk(coord)))
			.collect()
	}

	/// Writes a chunk with the configured compression scheme.
	pub fn write_chunk<C: Into<RegionCoord>>(&mut self, coord: C, tag: &NamedTag) -> ChunkResult<RegionSector> {
		let scheme = self.options.scheme;
		self.write_chunk_with(coord, tag, scheme)
	}

	/// Writes a chunk with a specific compression scheme.
	pub fn write_chunk_with<C: Into<RegionCoord>>(&mut self, coord: C, tag: &NamedTag, scheme: CompressionScheme) -> ChunkResult<RegionSector> {
		let coord: RegionCoord = coord.into();
		let record = ChunkRecord::compress(tag, scheme, self.options.level).at(coord)?;
		self.write_record(coord, &record)
	}

	/// Writes a raw record into the slot at `coord`.
	/// The slot keeps its sectors when the record fits in them. Otherwise the
	/// record goes into the first gap that is large enough, or at the end of
	/// the file. Returns the sector the record was written to.
	pub fn write_record<C: Into<RegionCoord>>(&mut self, coord: C, record: &ChunkRecord) -> ChunkResult<RegionSector> {
		let coord: RegionCoord = coord.into();
		self.write_record_at(coord, record).at(coord)
	}

	fn write_record_at(&mut self, coord: RegionCoord, record: &ChunkRecord) -> McResult<RegionSector> {
		let required = record.sector_count()?;
		let old_sector = self.header.sectors[coord];
		let sector = self.sector_manager().reallocate_err(old_sector, required)?;
		let mut buffer = Vec::with_capacity(sector.size() as usize);
		record.write_to(&mut buffer)?;
		self.store.seek(sector.seeker())?;
		self.store.write_all(&buffer)?;
		let stream_len = self.store.stream_size()?;
		if !is_multiple_of_4096(stream_len) {
			self.store.set_len(stream_len + pad_size(stream_len))?;
		}
		self.store.sync()?;
		let timestamp = if self.options.update_timestamps {
			Timestamp::utc_now()
		} else {
			self.header.timestamps[coord]
		};
		self.write_slot(coord, sector, timestamp)?;
		debug!("Wrote chunk {coord} ({} bytes) to {sector}.", record.framed_size());
		Ok(sector)
	}

	/// Writes a header entry to the store.
	/// Each table entry is mirrored in memory as soon as it is on disk.
	fn write_slot(&mut self, coord: RegionCoord, sector: RegionSector, timestamp: Timestamp) -> McResult<()> {
		self.store.seek(SeekFrom::Start(SectorTable::entry_offset(coord)))?;
		self.store.write_value(sector)?;
		self.header.sectors[coord] = sector;
		self.store.seek(SeekFrom::Start(TimestampTable::entry_offset(coord)))?;
		self.store.write_value(timestamp)?;
		self.header.timestamps[coord] = timestamp;
		self.store.sync()?;
		Ok(())
	}

	/// Removes a chunk by zeroing its header entry and timestamp.
	/// Its sectors become available to the next write. Deleting an empty
	/// slot does nothing.
	pub fn delete_chunk<C: Into<RegionCoord>>(&mut self, coord: C) -> ChunkResult<()> {
		let coord: RegionCoord = coord.into();
		let sector = self.header.sectors[coord];
		return_if!(!sector.is_present() => Ok(()));
		self.write_slot(coord, RegionSector::empty(), Timestamp::default()).at(coord)?;
		debug!("Deleted chunk {coord}, freeing {sector}.");
		Ok(())
	}

	/// Truncates unused sectors from the end of the store.
	/// Returns the new length of the store in bytes.
	pub fn trim(&mut self) -> McResult<u64> {
		let end = self.header.sectors.iter()
			.filter(|sector| sector.is_present())
			.map(RegionSector::end_offset)
			.max()
			.unwrap_or(0)
			.max(RegionHeader::SIZE);
		let stream_len = self.store.stream_size()?;
		if stream_len > end {
			debug!("Trimming region file from {stream_len} to {end} bytes.");
			self.store.set_len(end)?;
			self.store.sync()?;
		}
		Ok(end.min(stream_len))
	}

	/// A reference to the underlying store.
	pub fn get_ref(&self) -> &S {
		&self.store
	}

	/// Gives back the underlying store.
	pub fn into_inner(self) -> S {
		self.store
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;
	use rand::{
		Rng, SeedableRng,
		rngs::StdRng,
	};
	use crate::nbt::{Map, Tag};

	type MemoryRegion = RegionFile<Cursor<Vec<u8>>>;

	fn memory_region() -> MemoryRegion {
		RegionFile::create_in(Cursor::new(Vec::new())).unwrap()
	}

	/// A chunk whose compressed size is roughly `size` bytes when written uncompressed.
	fn chunk(x: i32, size: usize) -> NamedTag {
		let mut root = Map::new();
		root.insert("xPos".to_owned(), Tag::Int(x));
		root.insert("data".to_owned(), Tag::ByteArray(vec![7; size]));
		NamedTag::unnamed(root)
	}

	fn assert_consistent(region: &MemoryRegion) {
		let len = region.store.get_ref().len() as u64;
		assert!(len >= RegionHeader::SIZE);
		assert!(is_multiple_of_4096(len));
		let ranges = region.occupied_ranges();
		for pair in ranges.windows(2) {
			assert!(pair[0].0 + pair[0].1 <= pair[1].0, "{:?} overlaps {:?}", pair[0], pair[1]);
		}
		for (offset, count) in ranges {
			assert!(offset >= 2);
			assert!((offset + count) * 4096 <= len);
		}
	}

	/// A region with a single raw record for (0, 0) at offset 2.
	fn raw_region(entry: [u8; 4], record: &[u8]) -> Cursor<Vec<u8>> {
		let mut bytes = vec![0u8; 8192];
		bytes[0..4].copy_from_slice(&entry);
		bytes.extend_from_slice(record);
		bytes.resize(8192 + 4096, 0);
		Cursor::new(bytes)
	}

	#[test]
	fn create_empty_region() {
		let mut region = memory_region();
		assert_eq!(region.store.get_ref().len(), 8192);
		assert_eq!(region.chunk_count(), 0);
		assert_eq!(region.sector_count().unwrap(), 2);
		assert!(region.read_all().is_empty());
		let store = region.into_inner();
		let reopened = RegionFile::from_store(store).unwrap();
		assert_eq!(reopened.header(), &RegionHeader::default());
	}

	#[test]
	fn small_file_is_invalid() {
		let result = RegionFile::from_store(Cursor::new(vec![0u8; 100]));
		assert!(matches!(result, Err(McError::InvalidRegionFile(100))));
	}

	#[test]
	fn end_byte_record_is_empty_root() {
		let payload = CompressionScheme::ZLib.compress(&[0], Compression::default()).unwrap();
		let mut record = Vec::new();
		record.extend_from_slice(&(payload.len() as u32 + 1).to_be_bytes());
		record.push(2);
		record.extend_from_slice(&payload);
		let mut region = RegionFile::from_store(raw_region([0, 0, 2, 1], &record)).unwrap();
		assert!(region.has_chunk((0, 0)));
		assert_eq!(region.read_chunk((0, 0)).unwrap(), NamedTag::default());
	}

	#[test]
	fn zero_entry_is_empty_slot() {
		let mut region = RegionFile::from_store(raw_region([0, 0, 0, 0], &[])).unwrap();
		let error = region.read_chunk((0, 0)).unwrap_err();
		assert!(matches!(error.kind(), McError::EmptySlot));
		assert_eq!(error.coord, RegionCoord::new(0, 0));
	}

	#[test]
	fn unknown_scheme_is_reported() {
		let mut region = RegionFile::from_store(raw_region([0, 0, 2, 1], &[0, 0, 0, 2, 5, 0])).unwrap();
		let error = region.read_chunk((0, 0)).unwrap_err();
		assert!(matches!(error.into_inner(), McError::UnsupportedCompression(5)));
	}

	#[test]
	fn write_then_read() {
		let mut region = memory_region();
		let tag = chunk(3, 100);
		let sector = region.write_chunk((3, 1), &tag).unwrap();
		assert_eq!(sector, RegionSector::new(2, 1));
		assert_eq!(region.read_chunk((3, 1)).unwrap(), tag);
		assert!(!region.get_timestamp((3, 1)).is_zero());
		assert_consistent(&region);
		// The header on disk matches the header in memory.
		let header = region.header().clone();
		let store = region.into_inner();
		let index = RegionCoord::new(3, 1).index() * 4;
		assert_eq!(&store.get_ref()[index..index + 4], &[0, 0, 2, 1]);
		let mut reopened = RegionFile::from_store(store).unwrap();
		assert_eq!(reopened.header(), &header);
		assert_eq!(reopened.read_chunk((3, 1)).unwrap(), tag);
	}

	#[test]
	fn schemes_are_recorded_per_chunk() {
		let mut region = memory_region();
		region.write_chunk_with((0, 0), &chunk(0, 10), CompressionScheme::GZip).unwrap();
		region.write_chunk((1, 0), &chunk(1, 10)).unwrap();
		assert_eq!(region.read_record((0, 0)).unwrap().compression_scheme, CompressionScheme::GZip);
		assert_eq!(region.read_record((1, 0)).unwrap().compression_scheme, CompressionScheme::ZLib);
		assert_eq!(region.read_chunk((0, 0)).unwrap(), chunk(0, 10));
	}

	#[test]
	fn smaller_chunk_is_written_in_place() {
		let mut region = memory_region().with_options(RegionOptions::default().scheme(CompressionScheme::Uncompressed));
		let first = region.write_chunk((0, 0), &chunk(0, 10_000)).unwrap();
		assert_eq!(first, RegionSector::new(2, 3));
		region.write_chunk((1, 0), &chunk(1, 100)).unwrap();
		let second = region.write_chunk((0, 0), &chunk(0, 100)).unwrap();
		assert_eq!(second, RegionSector::new(2, 1));
		// The freed tail is the first gap that fits.
		assert_eq!(region.write_chunk((2, 0), &chunk(2, 5000)).unwrap(), RegionSector::new(3, 2));
		assert_consistent(&region);
	}

	#[test]
	fn growing_chunk_moves() {
		let mut region = memory_region().with_options(RegionOptions::default().scheme(CompressionScheme::Uncompressed));
		region.write_chunk((0, 0), &chunk(0, 100)).unwrap();
		region.write_chunk((1, 0), &chunk(1, 100)).unwrap();
		let moved = region.write_chunk((0, 0), &chunk(0, 6000)).unwrap();
		assert_eq!(moved, RegionSector::new(4, 2));
		assert_eq!(region.occupied_ranges(), [(3, 1), (4, 2)]);
		// The old sector is the first gap for the next small chunk.
		assert_eq!(region.write_chunk((2, 0), &chunk(2, 100)).unwrap(), RegionSector::new(2, 1));
		assert_eq!(region.read_chunk((0, 0)).unwrap(), chunk(0, 6000));
		assert_consistent(&region);
	}

	#[test]
	fn delete_frees_the_slot() {
		let mut region = memory_region();
		region.write_chunk((5, 5), &chunk(5, 10)).unwrap();
		region.delete_chunk((5, 5)).unwrap();
		assert_eq!(region.slot((5, 5)), ChunkSlot::default());
		assert!(matches!(region.read_chunk((5, 5)).unwrap_err().kind(), McError::EmptySlot));
		// Deleting again is a no-op.
		region.delete_chunk((5, 5)).unwrap();
		assert_eq!(region.write_chunk((6, 5), &chunk(6, 10)).unwrap(), RegionSector::new(2, 1));
		let store = region.into_inner();
		let reopened = RegionFile::from_store(store).unwrap();
		assert!(!reopened.has_chunk((5, 5)));
		assert_eq!(reopened.chunk_count(), 1);
	}

	#[test]
	fn read_all_keeps_going_after_errors() {
		let mut region = memory_region();
		region.write_chunk((0, 0), &chunk(0, 10)).unwrap();
		region.write_chunk((1, 0), &chunk(1, 10)).unwrap();
		// Corrupt the scheme byte of the first chunk.
		let offset = region.get_sector((0, 0)).offset() as usize;
		region.store.get_mut()[offset + 4] = 5;
		let results = region.read_all();
		assert_eq!(results.len(), 2);
		assert!(matches!(results[0].1.as_ref().unwrap_err().kind(), McError::UnsupportedCompression(5)));
		assert_eq!(results[1].1.as_ref().unwrap(), &chunk(1, 10));
	}

	#[test]
	fn timestamps_can_be_kept() {
		let mut region = memory_region().with_options(RegionOptions::default().update_timestamps(false));
		region.write_chunk((0, 0), &chunk(0, 10)).unwrap();
		assert!(region.get_timestamp((0, 0)).is_zero());
		region.set_options(RegionOptions::default());
		region.write_chunk((0, 0), &chunk(0, 10)).unwrap();
		assert!(!region.get_timestamp((0, 0)).is_zero());
	}

	#[test]
	fn oversized_chunk_is_rejected() {
		let mut region = memory_region().with_options(RegionOptions::default().scheme(CompressionScheme::Uncompressed));
		let error = region.write_chunk((0, 0), &chunk(0, 256 * 4096)).unwrap_err();
		assert!(matches!(error.kind(), McError::ChunkTooLarge(_)));
		assert!(!region.has_chunk((0, 0)));
		assert_eq!(region.store.get_ref().len(), 8192);
	}

	#[test]
	fn trim_removes_trailing_sectors() {
		let mut region = memory_region().with_options(RegionOptions::default().scheme(CompressionScheme::Uncompressed));
		region.write_chunk((0, 0), &chunk(0, 100)).unwrap();
		region.write_chunk((1, 0), &chunk(1, 10_000)).unwrap();
		region.delete_chunk((1, 0)).unwrap();
		assert_eq!(region.sector_count().unwrap(), 6);
		assert_eq!(region.trim().unwrap(), 3 * 4096);
		assert_eq!(region.sector_count().unwrap(), 3);
		assert_eq!(region.read_chunk((0, 0)).unwrap(), chunk(0, 100));
	}

	#[test]
	fn mixed_writes_and_deletes_never_overlap() {
		let mut rng = StdRng::seed_from_u64(0xA11C);
		let mut region = memory_region().with_options(RegionOptions::default().scheme(CompressionScheme::Uncompressed));
		let mut expected: Vec<Option<NamedTag>> = vec![None; 16];
		for _ in 0..300 {
			let slot = rng.gen_range(0..16usize);
			let coord = RegionCoord::from_index(slot).unwrap();
			if rng.gen_bool(0.2) {
				region.delete_chunk(coord).unwrap();
				expected[slot] = None;
			} else {
				let tag = chunk(slot as i32, rng.gen_range(0..20_000));
				region.write_chunk(coord, &tag).unwrap();
				expected[slot] = Some(tag);
			}
			assert_consistent(&region);
		}
		for (slot, tag) in expected.into_iter().enumerate() {
			let coord = RegionCoord::from_index(slot).unwrap();
			match tag {
				Some(tag) => assert_eq!(region.read_chunk(coord).unwrap(), tag),
				None => assert!(!region.has_chunk(coord)),
			}
		}
	}

	/// A store that fails every write once its write budget is used up.
	#[derive(Debug)]
	struct FailingStore {
		inner: Cursor<Vec<u8>>,
		writes_left: Option<usize>,
	}

	impl std::io::Read for FailingStore {
		fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
			std::io::Read::read(&mut self.inner, buf)
		}
	}

	impl std::io::Write for FailingStore {
		fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
			match self.writes_left {
				Some(0) => return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full")),
				Some(ref mut left) => *left -= 1,
				None => (),
			}
			std::io::Write::write(&mut self.inner, buf)
		}

		fn flush(&mut self) -> std::io::Result<()> {
			std::io::Write::flush(&mut self.inner)
		}
	}

	impl std::io::Seek for FailingStore {
		fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
			std::io::Seek::seek(&mut self.inner, pos)
		}
	}

	impl RegionStore for FailingStore {
		fn set_len(&mut self, len: u64) -> std::io::Result<()> {
			RegionStore::set_len(&mut self.inner, len)
		}
	}

	fn header_pointing_region() -> MemoryRegion {
		let mut bytes = vec![0u8; 8192 + 4096];
		// (0, 0) points at the timestamp table, (1, 0) owns sector 2.
		bytes[0..4].copy_from_slice(&[0, 0, 1, 1]);
		bytes[4..8].copy_from_slice(&[0, 0, 2, 1]);
		bytes[4100..4104].copy_from_slice(&[11, 22, 33, 44]);
		let mut record = Vec::new();
		ChunkRecord::compress(&chunk(1, 10), CompressionScheme::ZLib, Compression::default())
			.unwrap()
			.write_to(&mut record)
			.unwrap();
		bytes[8192..].copy_from_slice(&record);
		RegionFile::from_store(Cursor::new(bytes)).unwrap()
	}

	#[test]
	fn header_pointing_slot_is_moved() {
		let mut region = header_pointing_region();
		let sector = region.write_chunk((0, 0), &chunk(0, 10)).unwrap();
		assert_eq!(sector, RegionSector::new(3, 1));
		assert_eq!(&region.get_ref().get_ref()[4100..4104], &[11, 22, 33, 44]);
		assert_eq!(region.get_timestamp((1, 0)), Timestamp::new(0x0B16212C));
		assert_eq!(region.read_chunk((1, 0)).unwrap(), chunk(1, 10));
		assert_eq!(region.read_chunk((0, 0)).unwrap(), chunk(0, 10));
		assert_consistent(&region);
	}

	#[test]
	fn shared_sectors_are_not_overwritten() {
		let mut region = header_pointing_region();
		// Both slots now claim sector 2.
		region.store.get_mut()[0..4].copy_from_slice(&[0, 0, 2, 1]);
		let mut region = RegionFile::from_store(region.into_inner()).unwrap();
		let sector = region.write_chunk((0, 0), &chunk(0, 10)).unwrap();
		assert_eq!(sector, RegionSector::new(3, 1));
		assert_eq!(region.read_chunk((1, 0)).unwrap(), chunk(1, 10));
		// Without the overlap, (1, 0) is rewritten in place again.
		assert_eq!(region.write_chunk((1, 0), &chunk(1, 20)).unwrap(), RegionSector::new(2, 1));
		assert_consistent(&region);
	}

	#[test]
	fn failed_header_write_keeps_memory_in_sync() {
		let store = FailingStore {
			inner: Cursor::new(Vec::new()),
			writes_left: None,
		};
		let mut region = RegionFile::create_in(store).unwrap();
		// The record and the location entry are written, the timestamp is not.
		region.store.writes_left = Some(2);
		let error = region.write_chunk((0, 0), &chunk(0, 10)).unwrap_err();
		assert!(matches!(error.kind(), McError::IoError(_)));
		let on_disk = RegionSector::new(2, 1);
		assert_eq!(&region.store.inner.get_ref()[0..4], &on_disk.bits().to_be_bytes());
		assert_eq!(region.get_sector((0, 0)), on_disk);
		assert!(region.get_timestamp((0, 0)).is_zero());

		region.store.writes_left = None;
		let other = region.write_chunk((1, 0), &chunk(1, 10)).unwrap();
		assert!(!other.intersects(on_disk));
		assert_eq!(region.read_chunk((0, 0)).unwrap(), chunk(0, 10));
	}

	#[test]
	fn region_on_disk() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("r.0.0.mca");
		{
			let mut region = RegionFile::open_or_create(&path).unwrap();
			region.write_chunk((31, 31), &chunk(31, 50)).unwrap();
		}
		assert_eq!(std::fs::metadata(&path).unwrap().len(), 3 * 4096);
		let mut region = RegionFile::open_or_create(&path).unwrap();
		assert_eq!(region.get_sector((31, 31)), RegionSector::new(2, 1));
		assert_eq!(region.read_chunk((31, 31)).unwrap(), chunk(31, 50));
		assert!(matches!(RegionFile::open(dir.path().join("missing.mca")), Err(McError::IoError(_))));
	}
}
