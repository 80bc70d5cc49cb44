use log::debug;

use crate::{
	error::{
		AtChunk,
		ChunkResult,
	},
	ioext::RegionStore,
	nbt::{
		IntoTagPath,
		NamedTag,
		Tag,
		TagContainer,
	},
	world::io::region::{
		RegionCoord,
		RegionFile,
		RegionSector,
	},
};

/// An open edit of a single chunk.
///
/// The chunk's tree is loaded when the session begins and lives in the
/// session until it is either committed back into the region file or
/// discarded. Dropping a session writes nothing.
#[derive(Debug)]
pub struct EditSession<'a, S: RegionStore> {
	region: &'a mut RegionFile<S>,
	coord: RegionCoord,
	tag: NamedTag,
	modified: bool,
}

impl<'a, S: RegionStore> EditSession<'a, S> {
	/// Loads the chunk at `coord`. Fails the same way [RegionFile::read_chunk] does.
	pub fn begin<C: Into<RegionCoord>>(region: &'a mut RegionFile<S>, coord: C) -> ChunkResult<Self> {
		let coord: RegionCoord = coord.into();
		let tag = region.read_chunk(coord)?;
		debug!("Editing chunk {coord}.");
		Ok(Self {
			region,
			coord,
			tag,
			modified: false,
		})
	}

	pub fn coord(&self) -> RegionCoord {
		self.coord
	}

	pub fn root(&self) -> &NamedTag {
		&self.tag
	}

	/// Mutable access to the whole tree. The session counts as modified afterwards.
	pub fn root_mut(&mut self) -> &mut NamedTag {
		self.modified = true;
		&mut self.tag
	}

	/// Whether anything has been changed through this session.
	pub fn is_modified(&self) -> bool {
		self.modified
	}

	pub fn get<P: IntoTagPath>(&self, path: P) -> ChunkResult<&Tag> {
		self.tag.get_path(path).at(self.coord)
	}

	/// The session counts as modified once this succeeds.
	pub fn get_mut<P: IntoTagPath>(&mut self, path: P) -> ChunkResult<&mut Tag> {
		let tag = self.tag.get_path_mut(path).at(self.coord)?;
		self.modified = true;
		Ok(tag)
	}

	/// Replaces the tag at `path` and returns the old one.
	pub fn set<P: IntoTagPath, T: Into<Tag>>(&mut self, path: P, value: T) -> ChunkResult<Tag> {
		let old = self.tag.set_path(path, value).at(self.coord)?;
		self.modified = true;
		Ok(old)
	}

	/// Inserts a Compound entry or List element at `path`.
	pub fn insert<P: IntoTagPath, T: Into<Tag>>(&mut self, path: P, value: T) -> ChunkResult<Option<Tag>> {
		let old = self.tag.insert_path(path, value).at(self.coord)?;
		self.modified = true;
		Ok(old)
	}

	pub fn remove<P: IntoTagPath>(&mut self, path: P) -> ChunkResult<Tag> {
		let old = self.tag.remove_path(path).at(self.coord)?;
		self.modified = true;
		Ok(old)
	}

	/// Appends to the List at `path`.
	pub fn push<P: IntoTagPath, T: Into<Tag>>(&mut self, path: P, value: T) -> ChunkResult<()> {
		self.tag.push_path(path, value).at(self.coord)?;
		self.modified = true;
		Ok(())
	}

	/// Writes the tree back into its slot, whether or not it was modified.
	pub fn commit(self) -> ChunkResult<RegionSector> {
		debug!("Committing chunk {} (modified: {}).", self.coord, self.modified);
		self.region.write_chunk(self.coord, &self.tag)
	}

	/// Ends the session without writing and returns the edited tree.
	pub fn discard(self) -> NamedTag {
		debug!("Discarding edits to chunk {}.", self.coord);
		self.tag
	}
}

impl<S: RegionStore> RegionFile<S> {
	/// Begins an [EditSession] for the chunk at `coord`.
	pub fn begin_edit<C: Into<RegionCoord>>(&mut self, coord: C) -> ChunkResult<EditSession<'_, S>> {
		EditSession::begin(self, coord)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;
	use crate::{
		McError,
		nbt::{
			ListTag,
			Map,
		},
	};

	fn region_with_chunk() -> RegionFile<Cursor<Vec<u8>>> {
		let mut region = RegionFile::create_in(Cursor::new(Vec::new())).unwrap();
		let mut level = Map::new();
		level.insert("LastUpdate".to_owned(), Tag::Long(10));
		let mut root = Map::new();
		root.insert("xPos".to_owned(), Tag::Int(4));
		root.insert("Level".to_owned(), Tag::Compound(level));
		root.insert("Entities".to_owned(), Tag::List(ListTag::new()));
		region.write_chunk((4, 2), &NamedTag::unnamed(root)).unwrap();
		region
	}

	#[test]
	fn commit_writes_changes() {
		let mut region = region_with_chunk();
		let mut session = region.begin_edit((4, 2)).unwrap();
		assert!(!session.is_modified());
		assert_eq!(session.get("Level.LastUpdate").unwrap(), &Tag::Long(10));
		assert_eq!(session.set("Level.LastUpdate", 20i64).unwrap(), Tag::Long(10));
		session.insert("Status", "full").unwrap();
		session.push("Entities", Tag::Int(1)).unwrap();
		session.remove("xPos").unwrap();
		assert!(session.is_modified());
		session.commit().unwrap();

		let chunk = region.read_chunk((4, 2)).unwrap();
		assert_eq!(chunk.get_path("Level.LastUpdate").unwrap(), &Tag::Long(20));
		assert_eq!(chunk.get_path("Status").unwrap(), &Tag::from("full"));
		assert_eq!(chunk.get_path("Entities[0]").unwrap(), &Tag::Int(1));
		assert!(chunk.get_path("xPos").is_err());
	}

	#[test]
	fn discard_and_drop_write_nothing() {
		let mut region = region_with_chunk();
		let before = region.get_ref().get_ref().clone();
		{
			let mut session = region.begin_edit((4, 2)).unwrap();
			*session.get_mut("xPos").unwrap() = Tag::Int(99);
		}
		let mut session = region.begin_edit((4, 2)).unwrap();
		session.root_mut().root.clear();
		let edited = session.discard();
		assert!(edited.root.is_empty());
		assert_eq!(region.get_ref().get_ref().clone(), before);
		assert_eq!(region.read_chunk((4, 2)).unwrap().get_path("xPos").unwrap(), &Tag::Int(4));
	}

	#[test]
	fn errors_name_the_chunk() {
		let mut region = region_with_chunk();
		let error = region.begin_edit((0, 0)).unwrap_err();
		assert!(matches!(error.kind(), McError::EmptySlot));
		let mut session = region.begin_edit((4, 2)).unwrap();
		let error = session.set("Missing", 1i32).unwrap_err();
		assert_eq!(error.coord, RegionCoord::new(4, 2));
		assert!(matches!(error.kind(), McError::PathNotFound(path) if path == "Missing"));
		let error = session.push("xPos", 1i32).unwrap_err();
		assert!(matches!(error.kind(), McError::NotAList(_)));
		assert!(!session.is_modified());
	}
}
