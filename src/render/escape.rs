//! Quoting rules for values interpolated into generated SQL and shell text
//!
//! Every value a user supplies reaches the bootstrap script through one of
//! these functions, so none of them can end a literal early or smuggle a
//! raw newline into the heredoc that feeds the database client.

use crate::error::{Error, Result};
use std::fmt::Write;

/// `PostgreSQL` reserved key words, which cannot be used as bare identifiers
const PG_RESERVED: &[&str] = &[
    "all",
    "analyse",
    "analyze",
    "and",
    "any",
    "array",
    "as",
    "asc",
    "asymmetric",
    "both",
    "case",
    "cast",
    "check",
    "collate",
    "column",
    "constraint",
    "create",
    "current_catalog",
    "current_date",
    "current_role",
    "current_time",
    "current_timestamp",
    "current_user",
    "default",
    "deferrable",
    "desc",
    "distinct",
    "do",
    "else",
    "end",
    "except",
    "false",
    "fetch",
    "for",
    "foreign",
    "from",
    "grant",
    "group",
    "having",
    "in",
    "initially",
    "intersect",
    "into",
    "lateral",
    "leading",
    "limit",
    "localtime",
    "localtimestamp",
    "not",
    "null",
    "offset",
    "on",
    "only",
    "or",
    "order",
    "placing",
    "primary",
    "references",
    "returning",
    "select",
    "session_user",
    "some",
    "symmetric",
    "system_user",
    "table",
    "then",
    "to",
    "trailing",
    "true",
    "union",
    "unique",
    "user",
    "using",
    "variadic",
    "when",
    "where",
    "window",
    "with",
];

/// `PostgreSQL` type and function name key words, also refused as a bare
/// column identifier and so as a database or role name
const PG_TYPE_FUNC_NAME: &[&str] = &[
    "authorization",
    "binary",
    "collation",
    "concurrently",
    "cross",
    "current_schema",
    "freeze",
    "full",
    "ilike",
    "inner",
    "is",
    "isnull",
    "join",
    "left",
    "like",
    "natural",
    "notnull",
    "outer",
    "overlaps",
    "right",
    "similar",
    "tablesample",
    "verbose",
];

/// Quote a `PostgreSQL` string literal.
///
/// Plain values only need `'` doubled. A value holding a backslash or a
/// control character switches to the `E'...'` form so it is read the same
/// way whatever `standard_conforming_strings` is set to.
#[must_use]
pub fn pg_literal(value: &str) -> String {
    if !value.chars().any(|c| c == '\\' || c.is_control()) {
        return format!("'{}'", value.replace('\'', "''"));
    }

    let mut quoted = String::with_capacity(value.len() + 4);
    quoted.push_str("E'");
    for c in value.chars() {
        match c {
            '\'' => quoted.push_str("''"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(quoted, "\\u{:04X}", u32::from(c));
            }
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Quote a `PostgreSQL` identifier, leaving simple lowercase names bare.
///
/// # Errors
///
/// Returns [`Error::InvalidIdentifier`] when the name holds a control character
pub fn pg_ident(name: &str) -> Result<String> {
    reject_control(name)?;

    let simple = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
        && !PG_RESERVED.contains(&name)
        && !PG_TYPE_FUNC_NAME.contains(&name);

    if simple {
        Ok(name.to_string())
    } else {
        Ok(format!("\"{}\"", name.replace('"', "\"\"")))
    }
}

/// Quote a `MySQL` string literal for the default `sql_mode`.
#[must_use]
pub fn mysql_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\'' => quoted.push_str("''"),
            '\\' => quoted.push_str("\\\\"),
            '\0' => quoted.push_str("\\0"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\u{1a}' => quoted.push_str("\\Z"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Backtick-quote a `MySQL` identifier.
///
/// # Errors
///
/// Returns [`Error::InvalidIdentifier`] when the name holds a control character
pub fn mysql_ident(name: &str) -> Result<String> {
    reject_control(name)?;
    Ok(format!("`{}`", name.replace('`', "``")))
}

/// Quote a single word for a POSIX shell command line.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c));

    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "'\\''"))
    }
}

fn reject_control(name: &str) -> Result<()> {
    if name.chars().any(char::is_control) {
        return Err(Error::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}
