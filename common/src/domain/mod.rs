use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;

pub mod store;

pub use store::{DocumentBody, DocumentStore, OrderBy, SortDirection, StoreError, StoredDocument};

// A regex for names that end up quoted inside generated SQL: ASCII letters, digits and underscore,
// not starting with a digit.
// Example: "publications" or "datePub" are valid; "pub-lications", "1st" or "a'b" are not.
pub const ELIGIBLE_SYMBOLS_REGEX: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

static ELIGIBLE_SYMBOLS_REGEX_COMPILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(ELIGIBLE_SYMBOLS_REGEX).expect("ELIGIBLE_SYMBOLS_REGEX must be a valid regex")
});

pub fn is_eligible_id(id: &str) -> bool {
    !id.starts_with("pg_") && ELIGIBLE_SYMBOLS_REGEX_COMPILED.is_match(id)
}

/// Name of a collection of documents, one table per collection.
#[nutype(
    sanitize(trim, lowercase),
    validate(not_empty, len_char_max = 63, predicate = is_eligible_id),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct CollectionName(String);

/// Top level field of a document body. Case is preserved, bodies use camelCase keys.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 63, predicate = is_eligible_id),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct FieldName(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_name_is_normalized() {
        let name = CollectionName::try_new("  Publications ").unwrap();
        assert_eq!(name.as_ref(), "publications");
    }

    #[test]
    fn test_collection_name_rejects_sql_symbols() {
        assert!(CollectionName::try_new("publications; drop table x").is_err());
        assert!(CollectionName::try_new("pub\"lications").is_err());
        assert!(CollectionName::try_new("").is_err());
        assert!(CollectionName::try_new("pg_catalog").is_err());
    }

    #[test]
    fn test_field_name_keeps_case() {
        let field = FieldName::try_new("datePub").unwrap();
        assert_eq!(field.as_ref(), "datePub");
        assert!(FieldName::try_new("popularity'--").is_err());
    }
}
