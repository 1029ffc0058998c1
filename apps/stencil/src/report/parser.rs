//! Parser for the linter's text output.
//!
//! The linter prints one block per checked module, each introduced by a
//! delimiter line followed by the module name. Finding records inside a
//! block are colon-delimited; anything that does not carry enough fields
//! (score lines, wrapped messages, blank lines) is dropped.

use crate::models::{Finding, ParsedReport};

/// Marker that opens every module block.
pub const MODULE_DELIMITER: &str = "************* Module ";

/// Parse raw linter output into module name -> findings sorted by line.
///
/// Text before the first delimiter is discarded. A module whose block holds
/// no parsable records is still present, with an empty list. When the same
/// module name appears twice the later block wins.
pub fn parse_report(raw: &str) -> ParsedReport {
    let mut result = ParsedReport::new();
    for segment in raw.split(MODULE_DELIMITER).skip(1) {
        let mut lines = segment.lines();
        let name = lines.next().unwrap_or("").trim().to_string();
        result.insert(name, parse_module(lines));
    }
    result
}

/// Parse the records of a single module block.
pub fn parse_module<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Finding> {
    let mut findings: Vec<Finding> = lines
        .into_iter()
        .filter_map(Finding::from_record)
        .collect();
    // sort_by is stable: equal lines keep linter order
    findings.sort_by(|a, b| a.cmp_line(b));
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Using config file /repo/pylintrc
************* Module package.dummy
C:convention:C0111:12:0:Dummy.add:Missing method docstring:missing-docstring
W:warning:W0612:3:4:Dummy:Unused variable 'x':unused-variable
this line is wrapped and
  does not parse
************* Module package.service
E:error:E0602:40:8:get_version:Undefined variable 'datetime':undefined-variable

------------------------------------------------------------------
Your code has been rated at 7.50/10
";

    #[test]
    fn test_parse_report_one_entry_per_segment() {
        let parsed = parse_report(SAMPLE);
        let keys: Vec<_> = parsed.keys().cloned().collect();
        assert_eq!(keys, vec!["package.dummy", "package.service"]);
        assert_eq!(parsed["package.dummy"].len(), 2);
        assert_eq!(parsed["package.service"].len(), 1);
    }

    #[test]
    fn test_parse_report_sorts_by_line() {
        let parsed = parse_report(SAMPLE);
        let lines: Vec<_> = parsed["package.dummy"].iter().map(|f| f.line.as_str()).collect();
        assert_eq!(lines, vec!["3", "12"]);
    }

    #[test]
    fn test_parse_report_preamble_only() {
        assert!(parse_report("No config file found, using default configuration\n").is_empty());
        assert!(parse_report("").is_empty());
    }

    #[test]
    fn test_parse_report_empty_module_kept() {
        let parsed = parse_report("************* Module clean  \n\n");
        assert_eq!(parsed.len(), 1);
        assert!(parsed["clean"].is_empty());
    }

    #[test]
    fn test_parse_module_stable_for_equal_lines() {
        let findings = parse_module(vec![
            "C:c:C1:10:0:o:first:s",
            "C:c:C1:2:0:o:early:s",
            "C:c:C1:10:0:o:second:s",
        ]);
        let msgs: Vec<_> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(msgs, vec!["early", "first", "second"]);
    }

    #[test]
    fn test_parse_module_handles_crlf() {
        let parsed = parse_report("************* Module win\r\nR:refactor:R0201:5:4:A.b:Method could be a function:no-self-use\r\n");
        assert_eq!(parsed["win"][0].symbol, "no-self-use");
    }
}
