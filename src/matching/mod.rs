pub mod consolidate;
pub mod name;
pub mod resolve;

pub use consolidate::{consolidate_borrowers, BorrowerGroup};
pub use name::{clean_name, decompose_name, MatchThresholds, NameComponents, NameMatcher};
pub use resolve::{resolve_borrower, resolve_single_borrower, split_borrower_names};
