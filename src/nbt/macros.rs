/// Shorthand way to create a Tag::Compound.
/// Entries keep the order they are written in.
/// Example:
/// ```
/// # use mcaedit::{compound, nbt::Tag};
/// let tag = compound!{
///     ("Item One", 0i8),
///     (String::from("Item Two"), 2i32),
///     ("Item Three", Tag::Byte(1))
/// };
/// ```
#[macro_export]
macro_rules! compound {
	($(($name:expr, $value:expr)),+$(,)?) => {
		$crate::nbt::Tag::Compound([
			$(
				(::std::string::String::from($name), $crate::nbt::Tag::from($value)),
			)+
		].into_iter().collect::<$crate::nbt::Map>())
	};
	() => {
		$crate::nbt::Tag::Compound($crate::nbt::Map::new())
	};
}

/// Shorthand way to create a Tag::List.
/// Example:
/// ```
/// # use mcaedit::list;
/// list!{ 1, 2, 3, 4, 5, 6, 7, 8, 9, 10 };
/// list![
///     "One",
///     "Two",
///     "Three"
/// ];
/// ```
#[macro_export]
macro_rules! list {
	($($item:expr),+$(,)?) => {
		$crate::nbt::Tag::List($crate::nbt::ListTag::from(::std::vec![$($item),+]))
	};
	($value:expr; $repetitions:expr) => {
		$crate::nbt::Tag::List($crate::nbt::ListTag::from(::std::vec![$value; $repetitions]))
	};
	() => {
		$crate::nbt::Tag::List($crate::nbt::ListTag::new())
	};
}

#[cfg(test)]
mod tests {
	use crate::nbt::tag::{Tag, TagID};

	#[test]
	fn compound_keeps_order() {
		let tag = compound! {
			("zeta", "The quick brown fox jumps over the lazy dog."),
			("alpha", 1i32),
			("list", list![1i64, 2, 3]),
		};
		let map = tag.as_compound().unwrap();
		let keys = map.keys().map(String::as_str).collect::<Vec<_>>();
		assert_eq!(keys, ["zeta", "alpha", "list"]);
		assert_eq!(map["list"].as_list().unwrap().kind(), TagID::Long);
		assert_eq!(compound!(), Tag::Compound(Default::default()));
	}

	#[test]
	fn list_literals() {
		let tag = list!["One", "Two"];
		let list = tag.as_list().unwrap();
		assert_eq!(list.kind(), TagID::String);
		assert_eq!(list.get(0).and_then(Tag::as_str), Some("One"));
		let repeated = list![0i8; 3];
		assert_eq!(repeated.as_list().map(|list| list.len()), Some(3));
		assert_eq!(list!().as_list().map(|list| list.kind()), Some(TagID::End));
	}
}
