// src/utils/constants.rs

/// Field carrying the top-level borrower name on every batch item.
pub const BORROWER_NAME_KEY: &str = "BorrowerName";

/// Placeholder the extraction service writes when it could not attribute a file.
pub const UNIDENTIFIED_BORROWER: &str = "Unidentified Borrower";

/// Leaf values the extractor writes for "no value found".
pub const NOT_AVAILABLE: &str = "N/A";

/// Keys removed from every level of a cleaned document before it is stored.
pub const NOISE_KEYS: [&str; 11] = [
    "Link",
    "ConfidenceScore",
    "Url",
    "LabelOrder",
    "ScreenshotUrl",
    "GeneratedOn",
    "DocTitle",
    "PageNumber",
    "StageName",
    "Title",
    "SkillName",
];

/// Top-level document metadata copied onto the label extraction output.
pub const METADATA_KEYS: [&str; 4] = ["Title", "Url", "StageName", "GeneratedOn"];

/// Label names that identify the person a document belongs to.
pub const DEFAULT_BORROWER_INDICATORS: [&str; 6] = [
    "borrower name",
    "employee name",
    "account holder name",
    "applicant name",
    "employee full name",
    "full name",
];

/// Label names that identify an organisation rather than a person.
pub const DEFAULT_EMPLOYER_INDICATORS: [&str; 10] = [
    "employer",
    "company",
    "organization",
    "business",
    "corp",
    "inc",
    "llc",
    "ltd",
    "bank",
    "association",
];

/// Income document types kept in the `filtered_data` view.
pub const INCOME_SECTIONS: [&str; 5] = ["BorrowerName", "W2", "VOE", "Paystubs", "Paystub"];

/// Income document types plus bank statements, kept in `filtered_data_with_bs`.
pub const INCOME_SECTIONS_WITH_BANK_STATEMENT: [&str; 6] =
    ["BorrowerName", "W2", "VOE", "Paystubs", "Paystub", "Bank Statement"];

/// Document types kept in the `only_bs` view.
pub const BANK_STATEMENT_SECTIONS: [&str; 1] = ["Bank Statement"];

/// Borrower key used by summary-section aggregation when no name label is found.
pub const UNKNOWN_BORROWER: &str = "UNKNOWN_BORROWER";
