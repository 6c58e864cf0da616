pub mod borrower_field;
pub mod label_tree;
pub mod nested;
pub mod noise;

pub use borrower_field::{extract_document_borrower, BorrowerFieldIndicators};
pub use label_tree::{extract_document, CleanedDocument, CleanedValue};
pub use nested::extract_any_nested;
pub use noise::{strip_noise, strip_noise_value};
