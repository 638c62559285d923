pub mod file_magic;
pub mod file_name;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod sql;
pub mod validate;

pub use file_magic::is_pdf;
pub use file_name::{is_safe_file_name, stored_file_name};
pub use parameter_error_handler::{json_error_handler, path_error_handler, query_error_handler};
pub use sql::escape_like_pattern;
