//! Stringified NBT (SNBT) output, used by the [Display] impls of tags.
//!
//! ```text
//! {Level:{xPos:3,Status:"full",Heightmap:[L;1L,2L]},DataVersion:3465}
//! ```

use std::fmt::{
	Display,
	Formatter,
	Result as FmtResult,
	Write,
};

use crate::nbt::{
	Map,
	tag::*,
};

/// Whether `text` can appear unquoted as a Compound key or path segment.
pub fn is_identifier(text: &str) -> bool {
	!text.is_empty()
	&& text.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '_'))
}

/// Writes `text` with backslash escapes for quotes, backslashes, and
/// the control characters that have a short escape.
pub fn write_escaped_string<W: Write>(writer: &mut W, text: &str) -> FmtResult {
	text.chars().try_for_each(|c| {
		match c {
			'"' => writer.write_str("\\\""),
			'\\' => writer.write_str("\\\\"),
			'\n' => writer.write_str("\\n"),
			'\r' => writer.write_str("\\r"),
			'\t' => writer.write_str("\\t"),
			'\x08' => writer.write_str("\\b"),
			'\x0C' => writer.write_str("\\f"),
			other => writer.write_char(other),
		}
	})
}

fn write_quoted(f: &mut Formatter<'_>, text: &str) -> FmtResult {
	f.write_char('"')?;
	write_escaped_string(f, text)?;
	f.write_char('"')
}

fn write_key(f: &mut Formatter<'_>, key: &str) -> FmtResult {
	if is_identifier(key) {
		f.write_str(key)
	} else {
		write_quoted(f, key)
	}
}

fn write_array<T: Display>(f: &mut Formatter<'_>, prefix: char, suffix: &str, values: &[T]) -> FmtResult {
	write!(f, "[{prefix};")?;
	values.iter().enumerate().try_for_each(|(i, value)| {
		if i > 0 {
			f.write_char(',')?;
		}
		write!(f, "{value}{suffix}")
	})?;
	f.write_char(']')
}

fn write_compound(f: &mut Formatter<'_>, map: &Map) -> FmtResult {
	f.write_char('{')?;
	map.iter().enumerate().try_for_each(|(i, (key, tag))| {
		if i > 0 {
			f.write_char(',')?;
		}
		write_key(f, key)?;
		write!(f, ":{tag}")
	})?;
	f.write_char('}')
}

impl Display for Tag {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		match self {
			Tag::Byte(value) => write!(f, "{value}b"),
			Tag::Short(value) => write!(f, "{value}s"),
			Tag::Int(value) => write!(f, "{value}"),
			Tag::Long(value) => write!(f, "{value}L"),
			Tag::Float(value) => write!(f, "{value:?}f"),
			Tag::Double(value) => write!(f, "{value:?}d"),
			Tag::ByteArray(values) => write_array(f, 'B', "b", values),
			Tag::String(value) => write_quoted(f, value),
			Tag::List(list) => list.fmt(f),
			Tag::Compound(map) => write_compound(f, map),
			Tag::IntArray(values) => write_array(f, 'I', "", values),
			Tag::LongArray(values) => write_array(f, 'L', "L", values),
		}
	}
}

impl Display for ListTag {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_char('[')?;
		self.iter().enumerate().try_for_each(|(i, tag)| {
			if i > 0 {
				f.write_char(',')?;
			}
			write!(f, "{tag}")
		})?;
		f.write_char(']')
	}
}

impl Display for NamedTag {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		if !self.name.is_empty() {
			write_key(f, &self.name)?;
			f.write_char(':')?;
		}
		write_compound(f, &self.root)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{compound, list};

	#[test]
	fn snbt_output() {
		let tag = compound!{
			("xPos", 3i32),
			("Status", "full"),
			("odd key", 1i8),
			("Heights", vec![1i64, -2]),
			("Bytes", vec![1i8]),
			("Scale", 0.5f32),
			("Sections", ListTag::from_tags(vec![compound!{ ("Y", -4i8) }]).unwrap()),
			("Empty", list![]),
		};
		assert_eq!(
			tag.to_string(),
			r#"{xPos:3,Status:"full","odd key":1b,Heights:[L;1L,-2L],Bytes:[B;1b],Scale:0.5f,Sections:[{Y:-4b}],Empty:[]}"#
		);
	}

	#[test]
	fn named_root() {
		let map = match compound!(("a", 1i16)) {
			Tag::Compound(map) => map,
			_ => unreachable!(),
		};
		assert_eq!(NamedTag::unnamed(map.clone()).to_string(), "{a:1s}");
		assert_eq!(NamedTag::new("hello world", map).to_string(), r#""hello world":{a:1s}"#);
	}

	#[test]
	fn escapes() {
		assert_eq!(Tag::from("say \"hi\"\n\\").to_string(), r#""say \"hi\"\n\\""#);
		assert!(is_identifier("Block_States-1+"));
		assert!(!is_identifier(""));
		assert!(!is_identifier("a.b"));
	}
}
