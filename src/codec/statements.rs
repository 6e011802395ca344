// In: src/codec/statements.rs

//! The document-level parser: splitting a full dzn document (or one solution
//! block of solver output) into `name = value;` statements and decoding them.
//!
//! Splitting is literal-aware: a semicolon inside a string or a multi-line
//! set/array literal is not a statement boundary, so the splitter tracks
//! nesting instead of naively cutting at every `;`. Enum declarations are
//! collected in a first pass and resolved before any dependent statement is
//! decoded, so declaration order relative to use is not significant and
//! forward references work.

use std::collections::BTreeMap;

use log::debug;

use crate::config::ParseOptions;
use crate::error::DznError;
use crate::model::{EnumTable, EnumType, SetValue, Value, VariableType};

use super::decode::{decode_named, parse_symbol, split_top_level};

//==================================================================================
// 1. Public API
//==================================================================================

/// A fully decoded dzn document: the assignments plus the enum types the
/// document itself declared.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub assignments: BTreeMap<String, Value>,
    pub enums: EnumTable,
}

/// Splits a dzn document into `(name, raw_value_text)` pairs.
///
/// Comments are stripped first; blank chunks are dropped; a non-blank chunk
/// that does not match the `name = value` shape fails with a `Parse` error
/// naming the offending chunk.
pub fn split_statements(doc: &str) -> Result<Vec<(String, String)>, DznError> {
    let stripped = strip_comments(doc);
    let mut statements = Vec::new();
    for chunk in split_top_level(&stripped, ';') {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        let parts = split_top_level(chunk, '=');
        if parts.len() < 2 {
            return Err(DznError::Parse(format!(
                "statement is not of the form 'name = value': {}",
                chunk
            )));
        }
        let name = parts[0].trim();
        if parse_symbol(name).is_none() {
            return Err(DznError::Parse(format!(
                "invalid variable name '{}' in statement: {}",
                name, chunk
            )));
        }
        let value = parts[1..].join("=").trim().to_string();
        if value.is_empty() {
            return Err(DznError::Parse(format!(
                "statement has no value: {}",
                chunk
            )));
        }
        statements.push((name.to_string(), value));
    }
    debug!("split document into {} statements", statements.len());
    Ok(statements)
}

/// Parses and decodes a full dzn document in two passes: enum declarations
/// first, then every remaining statement with the enum table in scope.
pub fn parse_document(
    doc: &str,
    var_types: Option<&BTreeMap<String, VariableType>>,
    opts: &ParseOptions,
) -> Result<Document, DznError> {
    let statements = split_statements(doc)?;

    // Pass 1: collect enum declarations so later (or earlier!) statements can
    // reference them.
    let mut enums = EnumTable::new();
    if opts.resolve_enums {
        for (name, value) in &statements {
            if let Some(symbols) = enum_declaration_symbols(name, value, var_types) {
                if enums.contains_key(name) {
                    return Err(DznError::Parse(format!(
                        "duplicate enum declaration: {}",
                        name
                    )));
                }
                enums.insert(name.clone(), EnumType::new(name.clone(), symbols));
            }
        }
    }

    // Pass 2: decode everything. The declaration statement itself decodes to
    // the enum's full symbol set.
    let mut assignments = BTreeMap::new();
    for (name, value) in &statements {
        let decoded = if let Some(e) = enums.get(name) {
            let members = e
                .symbols
                .iter()
                .filter_map(|s| e.resolve(s))
                .map(Value::Enum)
                .collect();
            Value::Set(SetValue::Elems(members))
        } else {
            let vt = var_types.and_then(|t| t.get(name));
            decode_named(name, value, vt, Some(&enums), opts)?
        };
        assignments.insert(name.clone(), decoded);
    }

    Ok(Document { assignments, enums })
}

//==================================================================================
// 2. Lexical Passes
//==================================================================================

/// Removes `%` line comments, leaving newlines in place. A `%` inside a
/// string or quoted symbol is content, not a comment.
fn strip_comments(doc: &str) -> String {
    let mut out = String::with_capacity(doc.len());
    let mut in_double = false;
    let mut in_single = false;
    let mut in_comment = false;
    for c in doc.chars() {
        match c {
            '\n' => {
                in_comment = false;
                out.push(c);
            }
            _ if in_comment => {}
            '"' if !in_single => {
                in_double = !in_double;
                out.push(c);
            }
            '\'' if !in_double => {
                in_single = !in_single;
                out.push(c);
            }
            '%' if !in_double && !in_single => in_comment = true,
            _ => out.push(c),
        }
    }
    out
}

/// If a statement is lexically an enum declaration (a brace list of bare
/// identifiers), returns its symbols in declaration order.
///
/// A supplied type descriptor can veto this: when the caller says the name is
/// really a set-of-enum *value* drawing on some other type, the brace list is
/// data, not a declaration.
fn enum_declaration_symbols(
    name: &str,
    value: &str,
    var_types: Option<&BTreeMap<String, VariableType>>,
) -> Option<Vec<String>> {
    if let Some(types) = var_types {
        if let Some(vt) = types.get(name) {
            let declares_itself = vt.enum_type.as_deref() == Some(name);
            if !declares_itself {
                return None;
            }
        }
    }
    let inner = value.strip_prefix('{')?.strip_suffix('}')?.trim();
    if inner.is_empty() {
        return None;
    }
    let mut symbols = Vec::new();
    for part in split_top_level(inner, ',') {
        let part = part.trim();
        if part == "true" || part == "false" {
            return None;
        }
        symbols.push(parse_symbol(part)?.to_string());
    }
    Some(symbols)
}
