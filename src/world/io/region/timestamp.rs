use std::io::{Read, Write};
use chrono::{DateTime, Utc, TimeZone};
use crate::{
	McResult,
	for_each_int_type,
	ioext::*,
};

/// A 32-bit Unix timestamp.
/// Zero means that the slot has never been written (or was deleted).
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default, Hash)]
pub struct Timestamp(u32);

impl Timestamp {
	pub const fn new(seconds: u32) -> Self {
		Self(seconds)
	}

	pub const fn seconds(&self) -> u32 {
		self.0
	}

	pub const fn is_zero(&self) -> bool {
		self.0 == 0
	}

	pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
		DateTime::<Utc>::try_from(*self).ok()
	}

	/// Get a [Timestamp] for the current time (in Utc).
	pub fn utc_now() -> Timestamp {
		Timestamp::from(Utc::now())
	}
}

macro_rules! __timestamp_impls {
	($type:ty) => {
		impl From<$type> for Timestamp {
			fn from(value: $type) -> Self {
				Self(value as u32)
			}
		}

		impl From<Timestamp> for $type {
			fn from(value: Timestamp) -> Self {
				value.0 as $type
			}
		}
	};
}

for_each_int_type!(__timestamp_impls);

impl<T: Into<Timestamp> + Copy> From<&T> for Timestamp {
	fn from(value: &T) -> Self {
		T::into(*value)
	}
}

impl Readable for Timestamp {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
		Ok(Self(reader.read_value()?))
	}
}

impl Writable for Timestamp {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		writer.write_value(self.0)
	}
}

impl From<DateTime<Utc>> for Timestamp {
	/// Times outside of the range of a u32 are clamped.
	fn from(value: DateTime<Utc>) -> Self {
		Timestamp(value.timestamp().clamp(0, u32::MAX as i64) as u32)
	}
}

impl TryFrom<Timestamp> for DateTime<Utc> {
	type Error = ();

	fn try_from(value: Timestamp) -> Result<Self, Self::Error> {
		Utc.timestamp_opt(value.0 as i64, 0).single().ok_or(())
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.to_datetime() {
			Some(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S UTC")),
			None => write!(f, "{}", self.0),
		}
	}
}
