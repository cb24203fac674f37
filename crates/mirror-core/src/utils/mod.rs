//! Small naming and formatting helpers shared by the engine and adapters.

pub mod archive;
pub mod format;

pub use archive::{ARCHIVE_EXTENSIONS, archive_base_name, duplicate_candidate_name};
pub use format::{readable_file_size, readable_time};
