use datafusion::sql::sqlparser::dialect::GenericDialect;
use datafusion::sql::sqlparser::keywords::{
    ALL_KEYWORDS, ALL_KEYWORDS_INDEX, RESERVED_FOR_COLUMN_ALIAS, RESERVED_FOR_TABLE_ALIAS,
};
use datafusion::sql::sqlparser::parser::Parser;

use crate::core::CsvqlError;

/// Word replaced by the bound table name when placeholder substitution is on.
pub const TABLE_PLACEHOLDER: &str = "table";

/// Rejects empty and whitespace-only query text.
pub fn validate_query(query_text: &str) -> Result<&str, CsvqlError> {
    let trimmed = query_text.trim();
    if trimmed.is_empty() {
        return Err(CsvqlError::ValidationError("empty query".to_string()));
    }
    Ok(trimmed)
}

/// Replaces every occurrence of [`TABLE_PLACEHOLDER`] with `table_name`.
///
/// This is plain text replacement: `table` inside string literals and longer
/// identifiers (`tablet`, `timetable`) is rewritten as well.
pub fn substitute_table_placeholder(query_text: &str, table_name: &str) -> String {
    query_text.replace(TABLE_PLACEHOLDER, table_name)
}

/// Query text offered to the user before they type anything.
pub fn default_query(table_name: Option<&str>) -> String {
    match table_name {
        Some(name) => format!("SELECT * FROM {}", quote_identifier(name)),
        None => format!("SELECT * FROM {TABLE_PLACEHOLDER}"),
    }
}

/// Double-quotes `name` unless it is a plain identifier that parses back as
/// itself in `FROM` position. Reserved clause keywords (`select`, `from`) are
/// quoted; other keywords such as `data` stay bare.
pub fn quote_identifier(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if plain && !is_reserved(name) && parses_as_table(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

fn is_reserved(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    match ALL_KEYWORDS.binary_search(&upper.as_str()) {
        Ok(pos) => {
            let keyword = ALL_KEYWORDS_INDEX[pos];
            RESERVED_FOR_TABLE_ALIAS.contains(&keyword)
                || RESERVED_FOR_COLUMN_ALIAS.contains(&keyword)
        }
        Err(_) => false,
    }
}

fn parses_as_table(name: &str) -> bool {
    let sql = format!("SELECT * FROM {name}");
    match Parser::parse_sql(&GenericDialect {}, &sql) {
        Ok(statements) => statements.len() == 1 && statements[0].to_string() == sql,
        Err(_) => false,
    }
}
