//! CQL query construction.

/// Escape a value for use inside a double-quoted CQL string.
///
/// Backslashes are doubled before quotes are escaped, so `a\"b` cannot break
/// out of the literal.
pub fn escape_cql_value(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Builder for the conjunctive CQL queries the facade issues.
///
/// ```
/// use confluence_content::CqlQuery;
///
/// let cql = CqlQuery::of_type("page").text("release").space(Some("DEV")).build();
/// assert_eq!(cql, r#"type=page AND text ~ "release" AND space="DEV""#);
/// ```
#[derive(Debug, Clone)]
pub struct CqlQuery {
    clauses: Vec<String>,
}

impl CqlQuery {
    /// Start a query restricted to a content type.
    pub fn of_type(content_type: &str) -> Self {
        Self {
            clauses: vec![format!("type={}", content_type)],
        }
    }

    /// Full-text match. The text is escaped and trimmed.
    pub fn text(mut self, query: &str) -> Self {
        let query = escape_cql_value(query);
        self.clauses.push(format!("text ~ \"{}\"", query.trim()));
        self
    }

    /// Label match.
    pub fn label(mut self, label: &str) -> Self {
        self.clauses
            .push(format!("label=\"{}\"", escape_cql_value(label)));
        self
    }

    /// Restrict to a space when a non-empty key is given.
    pub fn space(mut self, space_key: Option<&str>) -> Self {
        if let Some(key) = space_key.filter(|k| !k.is_empty()) {
            self.clauses
                .push(format!("space=\"{}\"", escape_cql_value(key)));
        }
        self
    }

    pub fn build(self) -> String {
        self.clauses.join(" AND ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_cql_value(r#"He said "hi""#), r#"He said \"hi\""#);
    }

    #[test]
    fn test_escape_backslash_before_quote() {
        assert_eq!(escape_cql_value(r#"a\"b"#), r#"a\\\"b"#);
        assert_eq!(escape_cql_value(r"C:\temp"), r"C:\\temp");
    }

    #[test]
    fn test_text_query_trims() {
        let cql = CqlQuery::of_type("page").text("  release notes ").build();
        assert_eq!(cql, r#"type=page AND text ~ "release notes""#);
    }

    #[test]
    fn test_label_query_with_space() {
        let cql = CqlQuery::of_type("blogpost")
            .label("how-to")
            .space(Some("OPS"))
            .build();
        assert_eq!(cql, r#"type=blogpost AND label="how-to" AND space="OPS""#);
    }

    #[test]
    fn test_empty_space_is_ignored() {
        let cql = CqlQuery::of_type("page").label("x").space(Some("")).build();
        assert_eq!(cql, r#"type=page AND label="x""#);
    }

    #[test]
    fn test_label_is_escaped() {
        let cql = CqlQuery::of_type("page").label(r#"bad"label"#).build();
        assert_eq!(cql, r#"type=page AND label="bad\"label""#);
    }
}
