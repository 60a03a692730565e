pub mod string;

pub use string::{escape_c_string, is_identifier};
