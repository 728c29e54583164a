use std::fmt;

/// Lower bound used when a date range has no start.
pub const OPEN_RANGE_START: &str = "1900-01-01";
/// Upper bound used when a date range has no end.
pub const OPEN_RANGE_END: &str = "2999-12-31";

/// openFDA `search=` expression: clauses joined with `AND`.
///
/// Blank values are skipped, so callers can pass optional request fields
/// straight through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    clauses: Vec<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// `field:"value"` phrase match.
    pub fn phrase(mut self, field: &str, value: &str) -> Self {
        // openFDA has no escape for quotes inside a phrase.
        let value = value.trim().replace('"', "");
        if !value.is_empty() {
            self.clauses.push(format!("{field}:\"{value}\""));
        }
        self
    }

    /// `field:value` unquoted term.
    pub fn term(mut self, field: &str, value: &str) -> Self {
        let value = value.trim();
        if !value.is_empty() {
            self.clauses.push(format!("{field}:{value}"));
        }
        self
    }

    /// `field:[from TO to]`. Skipped when both ends are blank; a missing end
    /// is left open.
    pub fn date_range(mut self, field: &str, from: &str, to: &str) -> Self {
        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() && to.is_empty() {
            return self;
        }
        let from = if from.is_empty() { OPEN_RANGE_START } else { from };
        let to = if to.is_empty() { OPEN_RANGE_END } else { to };
        self.clauses.push(format!("{field}:[{from} TO {to}]"));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clauses.join(" AND "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_clauses_with_and() {
        let query = SearchQuery::new()
            .phrase("product_description", "heart valve")
            .phrase("recalling_firm", "Acme")
            .phrase("classification", "Class II");
        assert_eq!(
            query.to_string(),
            r#"product_description:"heart valve" AND recalling_firm:"Acme" AND classification:"Class II""#
        );
    }

    #[test]
    fn blank_values_are_skipped() {
        let query = SearchQuery::new()
            .phrase("applicant", "")
            .phrase("device_name", "  ")
            .term("year", "")
            .date_range("decision_date", "", "");
        assert!(query.is_empty());
        assert_eq!(query.to_string(), "");
    }

    #[test]
    fn quotes_inside_values_are_removed() {
        let query = SearchQuery::new().phrase("device_name", r#"the "best" pump"#);
        assert_eq!(query.to_string(), r#"device_name:"the best pump""#);
    }

    #[test]
    fn date_range_fills_open_ends() {
        let both = SearchQuery::new().date_range("decision_date", "2020-01-01", "2020-12-31");
        assert_eq!(both.to_string(), "decision_date:[2020-01-01 TO 2020-12-31]");

        let from_only = SearchQuery::new().date_range("decision_date", "2020-01-01", "");
        assert_eq!(from_only.to_string(), "decision_date:[2020-01-01 TO 2999-12-31]");

        let to_only = SearchQuery::new().date_range("decision_date", "", "2020-12-31");
        assert_eq!(to_only.to_string(), "decision_date:[1900-01-01 TO 2020-12-31]");
    }

    #[test]
    fn term_is_unquoted() {
        let query = SearchQuery::new().phrase("text", "catheter").term("year", "1978");
        assert_eq!(query.to_string(), r#"text:"catheter" AND year:1978"#);
    }
}
