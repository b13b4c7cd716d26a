// Load layer: everything written to disk after the fetch.

pub mod csv;
pub mod table_image;

pub use self::csv::{csv_file_name, save_indicator_data};
pub use self::table_image::{format_percentage, save_all_tables};
