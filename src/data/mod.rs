//! Vendor schedule acquisition: page retrieval and table parsing.

pub mod fetch;
pub mod html;

pub use fetch::{PageClient, load_html, read_html_file};
pub use html::parse_first_table;
