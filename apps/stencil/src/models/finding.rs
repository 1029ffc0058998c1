//! Linter findings and the fixed category table.

use serde::Serialize;
use std::cmp::Ordering;

/// Minimum number of colon-separated fields a finding line must carry.
pub const FINDING_FIELDS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
/// Message categories emitted by the linter, ordered by severity.
pub enum Category {
    Convention,
    Refactor,
    Warning,
    Error,
    Fatal,
}

impl Category {
    /// All categories in ascending severity.
    pub const ALL: [Category; 5] = [
        Category::Convention,
        Category::Refactor,
        Category::Warning,
        Category::Error,
        Category::Fatal,
    ];

    /// Single-letter code used in linter output.
    pub fn code(self) -> &'static str {
        match self {
            Category::Convention => "C",
            Category::Refactor => "R",
            Category::Warning => "W",
            Category::Error => "E",
            Category::Fatal => "F",
        }
    }

    /// Display name shown in the index table header.
    pub fn name(self) -> &'static str {
        match self {
            Category::Convention => "Convention",
            Category::Refactor => "Refactor",
            Category::Warning => "Warning",
            Category::Error => "Error",
            Category::Fatal => "Fatal Error",
        }
    }

    pub fn from_code(code: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.code() == code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One issue reported by the linter.
///
/// Fields are kept as the linter printed them; `category` may hold codes
/// outside [`Category`], which are rendered but never counted.
pub struct Finding {
    pub category: String,
    pub category_name: String,
    pub message_id: String,
    pub line: String,
    pub column: String,
    pub object: String,
    pub message: String,
    pub symbol: String,
}

impl Finding {
    /// Build a finding from one colon-delimited record.
    ///
    /// Returns `None` for records with fewer than [`FINDING_FIELDS`] fields.
    /// Messages containing colons are rejoined: the first six fields are
    /// fixed, the last one is the symbol, and whatever sits in between is
    /// the message text.
    pub fn from_record(record: &str) -> Option<Finding> {
        let fields: Vec<&str> = record.split(':').collect();
        if fields.len() < FINDING_FIELDS {
            return None;
        }
        let last = fields.len() - 1;
        Some(Finding {
            category: fields[0].to_string(),
            category_name: fields[1].to_string(),
            message_id: fields[2].to_string(),
            line: fields[3].to_string(),
            column: fields[4].to_string(),
            object: fields[5].to_string(),
            message: fields[6..last].join(":"),
            symbol: fields[last].to_string(),
        })
    }

    /// Known category of this finding, if any.
    pub fn known_category(&self) -> Option<Category> {
        Category::from_code(self.category.trim())
    }

    /// Numeric line number, when the field parses as one.
    pub fn line_number(&self) -> Option<u64> {
        self.line.trim().parse().ok()
    }

    /// Ordering by numeric line; unparsable lines sort after numeric ones.
    pub fn cmp_line(&self, other: &Finding) -> Ordering {
        match (self.line_number(), other.line_number()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_record_maps_fields_in_order() {
        let f = Finding::from_record("C:convention:C0111:12:4:Dummy:Missing docstring:missing-docstring")
            .unwrap();
        assert_eq!(f.category, "C");
        assert_eq!(f.category_name, "convention");
        assert_eq!(f.message_id, "C0111");
        assert_eq!(f.line, "12");
        assert_eq!(f.column, "4");
        assert_eq!(f.object, "Dummy");
        assert_eq!(f.message, "Missing docstring");
        assert_eq!(f.symbol, "missing-docstring");
        assert_eq!(f.known_category(), Some(Category::Convention));
    }

    #[test]
    fn test_from_record_drops_short_records() {
        assert!(Finding::from_record("C:1,2:C0111:myobj:no docstring:msg-id").is_none());
        assert!(Finding::from_record("").is_none());
        assert!(Finding::from_record("Your code has been rated at 10.00/10").is_none());
    }

    #[test]
    fn test_from_record_field_count_boundary() {
        assert!(Finding::from_record("C:convention:C0111:1:0:obj:msg").is_none());
        let f = Finding::from_record("C:convention:C0111:1:0:obj:msg:sym").unwrap();
        assert_eq!(f.message, "msg");
        assert_eq!(f.symbol, "sym");
    }

    #[test]
    fn test_from_record_keeps_colons_in_message() {
        let f = Finding::from_record("W:warning:W0611:3:0::Unused import: os:unused-import").unwrap();
        assert_eq!(f.object, "");
        assert_eq!(f.message, "Unused import: os");
        assert_eq!(f.symbol, "unused-import");
    }

    #[test]
    fn test_cmp_line_is_numeric() {
        let a = Finding::from_record("C:c:C1:9:0:o:m:s").unwrap();
        let b = Finding::from_record("C:c:C1:10:0:o:m:s").unwrap();
        let c = Finding::from_record("C:c:C1:??:0:o:m:s").unwrap();
        assert_eq!(a.cmp_line(&b), Ordering::Less);
        assert_eq!(c.cmp_line(&a), Ordering::Greater);
    }

    #[test]
    fn test_unknown_category_code() {
        let f = Finding::from_record("I:info:I0011:1:0:o:m:s").unwrap();
        assert_eq!(f.known_category(), None);
        assert_eq!(Category::from_code("F"), Some(Category::Fatal));
        assert_eq!(Category::Fatal.name(), "Fatal Error");
    }
}
