pub mod file_name;
pub mod sanitize;
pub mod unique;

pub use file_name::{resolve_file_name, NameSources};
pub use sanitize::{sanitize_file_name, sanitize_folder_name, MAX_FOLDER_NAME_CHARS, UNKNOWN_SEGMENT};
pub use unique::unique_path;
