//! CSV Codec - Record Collection Text Format
//!
//! One record per line, fields `id,date,description,quantity,amount`,
//! no header. Fields that contain the delimiter, a double quote or a
//! line break are quoted RFC 4180 style (`"a ""b"", c"`); everything
//! else is written verbatim, so plain files from older versions decode
//! unchanged. A quote only opens a quoted field at the start of a field;
//! elsewhere it is literal text. Text after a closing quote is an error.

use std::collections::HashSet;

use serde::Deserialize;

use crate::domain::{ParseError, Record};

/// Field separator.
pub const DELIMITER: char = ',';

/// Quote character for fields that need escaping.
const QUOTE: char = '"';

/// How `decode` treats malformed rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Any malformed row aborts the whole decode.
    #[default]
    Strict,
    /// Malformed rows are skipped and reported.
    Lenient,
}

/// Serialize records, one `\n`-terminated line each.
pub fn encode(records: &[Record]) -> String {
    let mut out = String::with_capacity(records.len() * 48);
    for record in records {
        out.push_str(&record.id.to_string());
        out.push(DELIMITER);
        push_field(&mut out, &record.date);
        out.push(DELIMITER);
        push_field(&mut out, &record.description);
        out.push(DELIMITER);
        out.push_str(&record.quantity.to_string());
        out.push(DELIMITER);
        out.push_str(&record.amount.to_string());
        out.push('\n');
    }
    out
}

/// Parse a whole file. The first malformed row fails the decode.
pub fn decode(text: &str) -> Result<Vec<Record>, ParseError> {
    let rows = split_rows(text);
    let mut seen = HashSet::with_capacity(rows.len());
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let record = parse_row(&row)?;
        if !seen.insert(record.id) {
            return Err(ParseError::DuplicateId {
                line: row.line,
                id: record.id,
            });
        }
        records.push(record);
    }
    Ok(records)
}

/// Parse a whole file, skipping malformed rows.
///
/// A row whose quote is never closed is skipped and decoding resumes on
/// the next line. For duplicate ids the first occurrence wins.
pub fn decode_lenient(text: &str) -> (Vec<Record>, Vec<ParseError>) {
    let rows = split_rows(text);

    let mut seen = HashSet::with_capacity(rows.len());
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();
    for row in rows {
        match parse_row(&row) {
            Ok(record) if seen.insert(record.id) => records.push(record),
            Ok(record) => skipped.push(ParseError::DuplicateId {
                line: row.line,
                id: record.id,
            }),
            Err(e) => skipped.push(e),
        }
    }
    (records, skipped)
}

/// Decode according to `mode`. Lenient mode never fails.
pub fn decode_with(mode: DecodeMode, text: &str) -> Result<(Vec<Record>, Vec<ParseError>), ParseError> {
    match mode {
        DecodeMode::Strict => decode(text).map(|records| (records, Vec::new())),
        DecodeMode::Lenient => Ok(decode_lenient(text)),
    }
}

fn push_field(out: &mut String, value: &str) {
    if value.contains([DELIMITER, QUOTE, '\n', '\r']) {
        out.push(QUOTE);
        for c in value.chars() {
            if c == QUOTE {
                out.push(QUOTE);
            }
            out.push(c);
        }
        out.push(QUOTE);
    } else {
        out.push_str(value);
    }
}

/// Raw fields of one row plus the line it starts on.
#[derive(Debug)]
struct Row {
    line: usize,
    fields: Vec<String>,
    /// First lexical error found in the row.
    error: Option<ParseError>,
}

/// Start of a row whose quoted field runs to the end of the input.
struct OpenQuote {
    line: usize,
    offset: usize,
}

/// Split text into rows. An unterminated quote becomes an error row and
/// splitting restarts on the line after the one the row began on.
fn split_rows(text: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut rest = text;
    let mut first_line = 1;
    while let Some(open) = split_segment(rest, first_line, &mut rows) {
        rows.push(Row {
            line: open.line,
            fields: Vec::new(),
            error: Some(ParseError::UnterminatedQuote { line: open.line }),
        });
        let Some(newline) = rest[open.offset..].find('\n') else {
            break;
        };
        rest = &rest[open.offset + newline + 1..];
        first_line = open.line + 1;
    }
    rows
}

/// Append the rows of `text` to `rows`, stopping early at a quoted field
/// that is never closed.
fn split_segment(text: &str, first_line: usize, rows: &mut Vec<Row>) -> Option<OpenQuote> {
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut field_quoted = false;
    let mut in_quotes = false;
    let mut after_quote = false;
    let mut error = None;
    let mut line = first_line;
    let mut row_line = first_line;
    let mut row_start = 0;

    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if in_quotes {
            match c {
                QUOTE if matches!(chars.peek(), Some(&(_, QUOTE))) => {
                    chars.next();
                    field.push(QUOTE);
                }
                QUOTE => {
                    in_quotes = false;
                    after_quote = true;
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            QUOTE if field.is_empty() && !field_quoted => {
                in_quotes = true;
                field_quoted = true;
            }
            DELIMITER => {
                fields.push(std::mem::take(&mut field));
                field_quoted = false;
                after_quote = false;
            }
            '\r' if matches!(chars.peek(), Some(&(_, '\n'))) => {}
            '\n' => {
                if !fields.is_empty() || !field.is_empty() || field_quoted {
                    fields.push(std::mem::take(&mut field));
                    rows.push(Row {
                        line: row_line,
                        fields: std::mem::take(&mut fields),
                        error: error.take(),
                    });
                }
                field_quoted = false;
                after_quote = false;
                line += 1;
                row_line = line;
                row_start = i + 1;
            }
            _ => {
                // A closed quoted field must end at a delimiter or line end.
                if after_quote {
                    error.get_or_insert(ParseError::TextAfterQuote { line: row_line });
                }
                field.push(c);
            }
        }
    }

    if in_quotes {
        return Some(OpenQuote {
            line: row_line,
            offset: row_start,
        });
    }
    if !fields.is_empty() || !field.is_empty() || field_quoted {
        fields.push(field);
        rows.push(Row {
            line: row_line,
            fields,
            error,
        });
    }
    None
}

fn parse_row(row: &Row) -> Result<Record, ParseError> {
    if let Some(err) = &row.error {
        return Err(err.clone());
    }
    let [id, date, description, quantity, amount] = row.fields.as_slice() else {
        return Err(ParseError::FieldCount {
            line: row.line,
            found: row.fields.len(),
        });
    };
    Ok(Record {
        id: parse_int(row.line, "id", id)?,
        date: date.clone(),
        description: description.clone(),
        quantity: parse_int(row.line, "quantity", quantity)?,
        amount: parse_int(row.line, "amount", amount)?,
    })
}

fn parse_int(line: usize, field: &'static str, value: &str) -> Result<i64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidInteger {
        line,
        field,
        value: value.to_string(),
    })
}
