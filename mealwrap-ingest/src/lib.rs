//! mealwrap-ingest: uploaded-batch loading (.eml files and ZIP archives),
//! MIME body selection, and receipt-format parsers.

pub mod header;
pub mod loader;
pub mod message;
pub mod parsers;
pub mod text;

pub use header::{humanize_address, name_from_header};
pub use loader::{ingest_upload, load_uploads};
pub use message::parse_eml;
pub use parsers::parse_receipt_text;
pub use text::html_to_text;
