pub mod file_format;
pub mod log_setup;
pub mod serde_io;

pub use file_format::FileFormat;
