use crate::{
	McError,
	McResult,
	nbt::{
		Map,
		NbtResult,
		tag::*,
		tagpath::{
			IntoTagPath,
			TagPath,
			TagPathPart,
		},
	},
};

/*
Path access into a tag tree.
A TagContainer knows how to reach its direct children by a single TagPathPart.
Everything that works on whole paths is built on top of that: walk to the
parent of the final part, then let the parent do the actual work.
*/

/// Resolves a possibly negative index into a position inside `0..len`.
fn resolve_index(index: i64, len: usize) -> Option<usize> {
	let resolved = if index < 0 {
		len as i64 + index
	} else {
		index
	};
	(0..len as i64).contains(&resolved).then_some(resolved as usize)
}

/// Like [resolve_index], but for insertion points, which range over `0..=len`.
/// `-1` is the position after the last element.
fn resolve_insert_index(index: i64, len: usize) -> Option<usize> {
	resolve_index(index, len + 1)
}

/// A tag that has children addressable by [TagPathPart]:
/// Compounds by key, Lists by index.
pub trait TagContainer {
	fn child(&self, part: &TagPathPart) -> Option<&Tag>;

	fn child_mut(&mut self, part: &TagPathPart) -> Option<&mut Tag>;

	/// Inserts a child, returning the child it replaced (if any).
	/// Returns None if `part` can not address a child of this container.
	fn insert_child(&mut self, part: &TagPathPart, tag: Tag) -> Option<NbtResult<Option<Tag>>>;

	/// Replaces an existing child. Returns None if there is no such child.
	fn replace_child(&mut self, part: &TagPathPart, tag: Tag) -> Option<NbtResult<Tag>>;

	fn remove_child(&mut self, part: &TagPathPart) -> Option<Tag>;

	fn is_container(&self) -> bool {
		true
	}

	/// Gets the tag at `path`.
	fn get_path<P: IntoTagPath>(&self, path: P) -> McResult<&Tag>
	where Self: Sized {
		let path = path.into_tag_path()?;
		let (last, parents) = path.split_last().ok_or(McError::EmptyPath)?;
		descend(self, parents, &path)?
			.child(last)
			.ok_or_else(|| McError::PathNotFound(path.to_string()))
	}

	/// Gets the tag at `path` mutably.
	fn get_path_mut<P: IntoTagPath>(&mut self, path: P) -> McResult<&mut Tag>
	where Self: Sized {
		let path = path.into_tag_path()?;
		let (last, parents) = path.split_last().ok_or(McError::EmptyPath)?;
		descend_mut(self, parents, &path)?
			.child_mut(last)
			.ok_or_else(|| McError::PathNotFound(path.to_string()))
	}

	/// Replaces the existing tag at `path`, returning the old one.
	/// Elements of a List must keep the List's element kind.
	fn set_path<P: IntoTagPath, T: Into<Tag>>(&mut self, path: P, value: T) -> McResult<Tag>
	where Self: Sized {
		let path = path.into_tag_path()?;
		let (last, parents) = path.split_last().ok_or(McError::EmptyPath)?;
		match descend_mut(self, parents, &path)?.replace_child(last, value.into()) {
			Some(result) => Ok(result?),
			None => Err(McError::PathNotFound(path.to_string())),
		}
	}

	/// Inserts a tag at `path`.
	/// For a Compound entry, an existing entry is replaced and returned.
	/// For a List index, the tag is inserted before that index (`-1` appends).
	fn insert_path<P: IntoTagPath, T: Into<Tag>>(&mut self, path: P, value: T) -> McResult<Option<Tag>>
	where Self: Sized {
		let path = path.into_tag_path()?;
		let (last, parents) = path.split_last().ok_or(McError::EmptyPath)?;
		match descend_mut(self, parents, &path)?.insert_child(last, value.into()) {
			Some(result) => Ok(result?),
			None => Err(McError::PathNotFound(path.to_string())),
		}
	}

	/// Removes the tag at `path` and returns it.
	fn remove_path<P: IntoTagPath>(&mut self, path: P) -> McResult<Tag>
	where Self: Sized {
		let path = path.into_tag_path()?;
		let (last, parents) = path.split_last().ok_or(McError::EmptyPath)?;
		descend_mut(self, parents, &path)?
			.remove_child(last)
			.ok_or_else(|| McError::PathNotFound(path.to_string()))
	}

	/// Appends a tag to the List at `path`.
	fn push_path<P: IntoTagPath, T: Into<Tag>>(&mut self, path: P, value: T) -> McResult<()>
	where Self: Sized {
		let path = path.into_tag_path()?;
		let list = self.get_path_mut(&path)?
			.as_list_mut()
			.ok_or_else(|| McError::NotAList(path.to_string()))?;
		Ok(list.push(value.into())?)
	}
}

fn path_prefix(path: &TagPath, length: usize) -> String {
	TagPath::from(path.parts()[..length].to_vec()).to_string()
}

/// Walks `parts` down from `node`. Every tag along the way has to be a container.
fn descend<'a>(
	mut node: &'a dyn TagContainer,
	parts: &[TagPathPart],
	path: &TagPath,
) -> McResult<&'a dyn TagContainer> {
	for (depth, part) in parts.iter().enumerate() {
		let child = node.child(part)
			.ok_or_else(|| McError::PathNotFound(path_prefix(path, depth + 1)))?;
		if !child.is_container() {
			return Err(McError::NotAContainer(path_prefix(path, depth + 1)));
		}
		node = child;
	}
	Ok(node)
}

fn descend_mut<'a>(
	mut node: &'a mut dyn TagContainer,
	parts: &[TagPathPart],
	path: &TagPath,
) -> McResult<&'a mut dyn TagContainer> {
	for (depth, part) in parts.iter().enumerate() {
		let Some(child) = node.child_mut(part) else {
			return Err(McError::PathNotFound(path_prefix(path, depth + 1)));
		};
		if !child.is_container() {
			return Err(McError::NotAContainer(path_prefix(path, depth + 1)));
		}
		node = child;
	}
	Ok(node)
}

impl TagContainer for Map {
	fn child(&self, part: &TagPathPart) -> Option<&Tag> {
		match part {
			TagPathPart::AtKey(key) => self.get(key),
			TagPathPart::AtIndex(_) => None,
		}
	}

	fn child_mut(&mut self, part: &TagPathPart) -> Option<&mut Tag> {
		match part {
			TagPathPart::AtKey(key) => self.get_mut(key),
			TagPathPart::AtIndex(_) => None,
		}
	}

	fn insert_child(&mut self, part: &TagPathPart, tag: Tag) -> Option<NbtResult<Option<Tag>>> {
		match part {
			TagPathPart::AtKey(key) => Some(Ok(self.insert(key.to_owned(), tag))),
			TagPathPart::AtIndex(_) => None,
		}
	}

	fn replace_child(&mut self, part: &TagPathPart, tag: Tag) -> Option<NbtResult<Tag>> {
		self.child_mut(part).map(|child| Ok(std::mem::replace(child, tag)))
	}

	fn remove_child(&mut self, part: &TagPathPart) -> Option<Tag> {
		match part {
			// shift_remove keeps the order of the remaining entries.
			TagPathPart::AtKey(key) => self.shift_remove(key),
			TagPathPart::AtIndex(_) => None,
		}
	}
}

impl TagContainer for ListTag {
	fn child(&self, part: &TagPathPart) -> Option<&Tag> {
		match part {
			&TagPathPart::AtIndex(index) => self.get(resolve_index(index, self.len())?),
			TagPathPart::AtKey(_) => None,
		}
	}

	fn child_mut(&mut self, part: &TagPathPart) -> Option<&mut Tag> {
		match part {
			&TagPathPart::AtIndex(index) => {
				let index = resolve_index(index, self.len())?;
				self.get_mut(index)
			},
			TagPathPart::AtKey(_) => None,
		}
	}

	fn insert_child(&mut self, part: &TagPathPart, tag: Tag) -> Option<NbtResult<Option<Tag>>> {
		match part {
			&TagPathPart::AtIndex(index) => {
				let index = resolve_insert_index(index, self.len())?;
				Some(self.insert(index, tag).map(|_| None))
			},
			TagPathPart::AtKey(_) => None,
		}
	}

	fn replace_child(&mut self, part: &TagPathPart, tag: Tag) -> Option<NbtResult<Tag>> {
		match part {
			&TagPathPart::AtIndex(index) => {
				let index = resolve_index(index, self.len())?;
				self.replace(index, tag).transpose()
			},
			TagPathPart::AtKey(_) => None,
		}
	}

	fn remove_child(&mut self, part: &TagPathPart) -> Option<Tag> {
		match part {
			&TagPathPart::AtIndex(index) => self.remove(resolve_index(index, self.len())?),
			TagPathPart::AtKey(_) => None,
		}
	}
}

macro_rules! delegate_container {
	($self:ident.$method:ident($($arg:ident),*)) => {
		match $self {
			Tag::Compound(map) => map.$method($($arg),*),
			Tag::List(list) => list.$method($($arg),*),
			_ => None,
		}
	};
}

/// Only Compound and List tags have children.
impl TagContainer for Tag {
	fn child(&self, part: &TagPathPart) -> Option<&Tag> {
		delegate_container!(self.child(part))
	}

	fn child_mut(&mut self, part: &TagPathPart) -> Option<&mut Tag> {
		delegate_container!(self.child_mut(part))
	}

	fn insert_child(&mut self, part: &TagPathPart, tag: Tag) -> Option<NbtResult<Option<Tag>>> {
		delegate_container!(self.insert_child(part, tag))
	}

	fn replace_child(&mut self, part: &TagPathPart, tag: Tag) -> Option<NbtResult<Tag>> {
		delegate_container!(self.replace_child(part, tag))
	}

	fn remove_child(&mut self, part: &TagPathPart) -> Option<Tag> {
		delegate_container!(self.remove_child(part))
	}

	fn is_container(&self) -> bool {
		matches!(self, Tag::Compound(_) | Tag::List(_))
	}
}

impl TagContainer for NamedTag {
	fn child(&self, part: &TagPathPart) -> Option<&Tag> {
		self.root.child(part)
	}

	fn child_mut(&mut self, part: &TagPathPart) -> Option<&mut Tag> {
		self.root.child_mut(part)
	}

	fn insert_child(&mut self, part: &TagPathPart, tag: Tag) -> Option<NbtResult<Option<Tag>>> {
		self.root.insert_child(part, tag)
	}

	fn replace_child(&mut self, part: &TagPathPart, tag: Tag) -> Option<NbtResult<Tag>> {
		self.root.replace_child(part, tag)
	}

	fn remove_child(&mut self, part: &TagPathPart) -> Option<Tag> {
		self.root.remove_child(part)
	}
}
