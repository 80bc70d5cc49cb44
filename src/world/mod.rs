pub mod io;
pub mod editor;

pub use editor::EditSession;
pub use io::region::{
	RegionCoord,
	RegionFile,
	RegionOptions,
};
