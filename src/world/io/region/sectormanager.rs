use log::{
	debug,
	warn,
};

use crate::{
	McResult, McError,
};

use super::{
	header::SectorTable,
	managedsector::ManagedSector,
	sector::RegionSector,
};

pub trait SectorAllocator {
	fn free(&mut self, sector: RegionSector);
	#[must_use]
	fn allocate(&mut self, size: u8) -> Option<RegionSector>;
	#[must_use]
	fn reallocate(&mut self, free: RegionSector, new_size: u8) -> Option<RegionSector>;

	fn allocate_err(&mut self, size: u8) -> McResult<RegionSector> {
		self.allocate(size).ok_or(McError::RegionAllocationFailure)
	}

	fn reallocate_err(&mut self, free: RegionSector, new_size: u8) -> McResult<RegionSector> {
		self.reallocate(free, new_size).ok_or(McError::RegionAllocationFailure)
	}
}

/// Manages unused sectors in a region file so that chunks can be stored
/// without intersecting each other. Also manages the end-offset so that it
/// can determine where to start writing new sectors if there is no unused
/// space large enough.
///
/// A region file has no free-list of its own, so a [SectorManager] is
/// always built from the sector table with [SectorManager::from_table] and
/// only lives for a single write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorManager {
	/// The unused sectors in a region file, sorted by offset.
	/// No two of them touch; adjacent free space is always merged.
	pub(super) unused_sectors: Vec<ManagedSector>,
	/// This represents all the occupyable space beyond all
	/// used sectors.
	/// This is where new or too large sectors will be allocated.
	pub(super) end_sector: ManagedSector,
	/// Occupied ranges that overlap the header or another chunk, sorted.
	/// These are never reused in place and never freed.
	pub(super) conflicts: Vec<ManagedSector>,
}

impl SectorAllocator for SectorManager {
	/// Frees a sector, allowing it to be reused.
	/// Free space on either side is merged into it, and free space that
	/// reaches the end sector becomes part of the end sector.
	fn free(&mut self, sector: RegionSector) {
		// Early return if the sector is empty (nothing to free)
		if !sector.is_present() || sector.sector_count() == 0 {
			return;
		}
		let mut freed_sector = ManagedSector::from(sector);
		// The header is never free space.
		freed_sector.start = freed_sector.start.max(ManagedSector::HEADER.end);
		if freed_sector.is_empty() {
			return;
		}
		let index = self.unused_sectors.partition_point(|unused| unused.start < freed_sector.start);
		// Absorb the right neighbor first so that `index - 1` stays valid.
		if let Some(right) = self.unused_sectors.get(index) {
			if right.start <= freed_sector.end {
				freed_sector.absorb(self.unused_sectors.remove(index));
			}
		}
		let index = if index > 0 && self.unused_sectors[index - 1].end >= freed_sector.start {
			freed_sector.absorb(self.unused_sectors.remove(index - 1));
			index - 1
		} else {
			index
		};
		// If the freed sector borders the end_sector, absorb it into
		// the end_sector
		if freed_sector.end >= self.end_sector.start {
			self.end_sector.absorb(freed_sector);
		// otherwise add the freed sector to the unused_sectors.
		} else {
			self.unused_sectors.insert(index, freed_sector);
		}
	}

	/// Allocate a sector of a specified size.
	/// The first unused sector that is large enough is used. When there is
	/// none, the sector is placed at the end of the file.
	fn allocate(&mut self, size: u8) -> Option<RegionSector> {
		if size == 0 {
			return None;
		}
		let found = self.unused_sectors
			.iter()
			.position(|sector| sector.size() >= (size as u32));
		match found {
			Some(index) => {
				let sector = self.unused_sectors[index].allocate(size)?;
				if self.unused_sectors[index].is_empty() {
					self.unused_sectors.remove(index);
				}
				debug!("Allocated {size} sector(s) from unused space at offset {}.", sector.sector_offset());
				Some(sector)
			}
			None => {
				let sector = self.end_sector.allocate(size);
				if let Some(sector) = sector {
					debug!("Allocated {size} sector(s) at the end of the file, offset {}.", sector.sector_offset());
				}
				sector
			}
		}
	}

	/// Finds a place for a chunk that currently occupies `free`.
	///
	/// If `free` is big enough, it is reused in place and any sectors past
	/// `new_size` are freed. Otherwise a new sector is allocated elsewhere and
	/// only then is `free` released, so the new sector never overlaps the
	/// data it replaces.
	/// A `free` that overlaps the header or another chunk is neither reused
	/// nor released.
	fn reallocate(&mut self, free: RegionSector, new_size: u8) -> Option<RegionSector> {
		// There's no need to free the sector if there is no reallocation happening.
		if new_size == 0 {
			return None;
		}
		let conflicting = self.is_conflicting(free);
		if conflicting {
			debug!("Not reusing {free}, it overlaps other data.");
		}
		if free.is_present() && !conflicting && free.sector_count() >= (new_size as u64) {
			debug!("Reusing {free} in place for {new_size} sector(s).");
			// Use split_left so that when the right side is freed, it can be absorbed
			// into the end_sector if they are adjacent.
			let (new, old) = free.split_left(new_size)?;
			self.free(old);
			Some(new)
		} else {
			let sector = self.allocate(new_size)?;
			if !conflicting {
				self.free(free);
			}
			Some(sector)
		}
	}
}

impl SectorManager {
	/// A [SectorManager] for a region file without any chunks.
	pub fn new() -> Self {
		Self {
			unused_sectors: Vec::new(),
			end_sector: ManagedSector::end_sector(ManagedSector::HEADER.end),
			conflicts: Vec::new(),
		}
	}

	/// Creates a [SectorManager] from a [SectorTable].
	pub fn from_table(table: &SectorTable) -> Self {
		table.iter().copied().collect()
	}

	/// Computes the unused space between the given occupied sectors.
	/// Sectors that overlap the header or each other are tolerated: the
	/// overlapping space is simply treated as occupied.
	pub fn from_sectors<I: IntoIterator<Item = RegionSector>>(sectors: I) -> Self {
		let mut occupied = sectors.into_iter()
			.filter(|sector| sector.is_present())
			.map(ManagedSector::from)
			.filter(ManagedSector::not_empty)
			.collect::<Vec<ManagedSector>>();
		occupied.sort();
		let mut unused_sectors = Vec::new();
		let mut conflicts = Vec::new();
		// Everything before `covered.end` is in use. Initialized with the header sectors.
		let mut covered = ManagedSector::header();
		for (index, &sector) in occupied.iter().enumerate() {
			// Sorted by start, so only the next sector can be the first to overlap this one.
			let overlaps_next = occupied.get(index + 1)
				.map_or(false, |next| next.start < sector.end);
			if sector.start < ManagedSector::HEADER.end {
				warn!("Sector {sector} overlaps the region header.");
				conflicts.push(sector);
			} else if sector.start < covered.end {
				warn!("Sector {sector} overlaps sectors used by another chunk.");
				conflicts.push(sector);
			} else {
				if sector.start > covered.end {
					unused_sectors.push(ManagedSector::new(covered.end, sector.start));
				}
				if overlaps_next {
					conflicts.push(sector);
				}
			}
			covered.end = covered.end.max(sector.end);
		}
		conflicts.dedup();
		Self {
			unused_sectors,
			end_sector: ManagedSector::end_sector(covered.end),
			conflicts,
		}
	}

	/// Whether `sector` overlaps the header or the sectors of another chunk.
	pub fn is_conflicting(&self, sector: RegionSector) -> bool {
		sector.is_present()
			&& self.conflicts.binary_search(&ManagedSector::from(sector)).is_ok()
	}

	pub fn unused_sectors(&self) -> &[ManagedSector] {
		&self.unused_sectors
	}

	pub fn end_sector(&self) -> &ManagedSector {
		&self.end_sector
	}

	/// Counts the number of unused 4KiB blocks. This is helpful for determining
	/// if the region file needs to be optimized.
	pub fn count_unused_blocks(&self) -> u32 {
		self.unused_sectors.iter()
			.map(|sect| sect.size())
			.sum()
	}
}

impl Default for SectorManager {
	fn default() -> Self {
		Self::new()
	}
}

impl FromIterator<RegionSector> for SectorManager {
	fn from_iter<T: IntoIterator<Item = RegionSector>>(iter: T) -> Self {
		Self::from_sectors(iter)
	}
}

impl<'a> IntoIterator for &'a SectorManager {
	type Item = &'a ManagedSector;
	type IntoIter = std::slice::Iter<'a, ManagedSector>;

	fn into_iter(self) -> Self::IntoIter {
		self.unused_sectors.iter()
	}
}
