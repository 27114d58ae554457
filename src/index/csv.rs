//! Minimal CSV reader for the index file: quoted fields, doubled quotes, CRLF.

use std::mem::take;

/// One parsed record and the 1-based line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Splits `text` into records. Blank lines are skipped; quoted fields may span
/// lines. An unterminated quote runs to the end of input.
pub(super) fn parse_records(text: &str) -> Vec<Record> {
    let mut records = Vec::new();
    let mut field = String::new();
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(take(&mut field)),
            '\r' | '\n' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                fields.push(take(&mut field));
                if fields.len() > 1 || fields.first().is_some_and(|f| !f.is_empty()) {
                    records.push(Record {
                        line: record_line,
                        fields: take(&mut fields),
                    });
                } else {
                    fields.clear();
                }
                line += 1;
                record_line = line;
            }
            '\n' => {
                line += 1;
                field.push(ch);
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push(Record {
            line: record_line,
            fields,
        });
    }
    records
}
