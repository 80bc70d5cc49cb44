pub mod nbt;
pub mod world;
pub mod ioext;
pub mod error;
pub mod macros;

pub use flate2;

pub use error::McError;
pub use error::McResult;
pub use error::ChunkError;
pub use error::ChunkResult;

pub use world::{
	EditSession,
	RegionCoord,
	RegionFile,
	RegionOptions,
};
pub use world::io::region::CompressionScheme;
