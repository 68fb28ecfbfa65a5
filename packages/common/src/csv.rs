//! CSV serialization of expiry reports.
//!
//! Exports carry a header row plus one row per record. Dates are ISO-8601
//! and the status column holds the undecorated bucket label, so the text
//! round-trips through any standard CSV reader.

use std::str::FromStr;

use crate::error::DomainError;
use crate::expiry::ExpiryStatus;
use crate::report::{AnnotatedProduct, parse_date};

/// Exportable report columns.
///
/// `id`, `owner_id` and `days_to_expiry` are deliberately not exportable:
/// the first two are store bookkeeping, the third is derived and would go
/// stale the moment the file is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportColumn {
    ProductName,
    Quantity,
    ExpiryDate,
    Status,
}

impl ReportColumn {
    /// Header cell for this column.
    pub fn header(&self) -> &'static str {
        match self {
            Self::ProductName => "product_name",
            Self::Quantity => "quantity",
            Self::ExpiryDate => "expiry_date",
            Self::Status => "status",
        }
    }

    fn value(&self, record: &AnnotatedProduct) -> String {
        match self {
            Self::ProductName => record.product_name.clone(),
            Self::Quantity => record.quantity.to_string(),
            Self::ExpiryDate => record.expiry_date.format("%Y-%m-%d").to_string(),
            Self::Status => record.status.as_str().to_string(),
        }
    }
}

/// Default export column order.
pub const EXPORT_COLUMNS: &[ReportColumn] = &[
    ReportColumn::ProductName,
    ReportColumn::Quantity,
    ReportColumn::ExpiryDate,
    ReportColumn::Status,
];

/// Serialize the chosen columns as CSV text with a header row.
///
/// Output ends with a single final newline; an empty record set yields just
/// the header row.
pub fn to_csv(records: &[AnnotatedProduct], columns: &[ReportColumn]) -> String {
    let mut out = String::new();
    write_row(&mut out, columns.iter().map(|c| c.header().to_string()));
    for record in records {
        write_row(&mut out, columns.iter().map(|c| c.value(record)));
    }
    out
}

fn write_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        push_field(out, &field);
    }
    out.push('\n');
}

fn push_field(out: &mut String, field: &str) {
    if field.contains(['"', ',', '\n', '\r']) {
        out.push('"');
        for c in field.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// A parsed CSV export: the header cells and the raw string cells per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvReport {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvReport {
    /// All values of the named column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }
}

/// Parse CSV text produced by [`to_csv`].
///
/// Known columns are validated cell by cell (`expiry_date` must be a valid
/// ISO date, `quantity` a non-negative integer, `status` one of the four
/// bucket labels). Any invalid cell aborts the whole parse: one bad record
/// fails the batch, there is no partial result.
pub fn parse_csv(text: &str) -> Result<CsvReport, DomainError> {
    let mut records = split_records(text)?.into_iter();
    let columns = records.next().ok_or(DomainError::CsvMissingHeader)?;

    let mut rows = Vec::new();
    for (i, row) in records.enumerate() {
        let row_number = i + 1;
        if row.len() != columns.len() {
            return Err(DomainError::CsvRowShape {
                row: row_number,
                expected: columns.len(),
                found: row.len(),
            });
        }
        for (column, cell) in columns.iter().zip(&row) {
            validate_cell(column, cell)?;
        }
        rows.push(row);
    }

    Ok(CsvReport { columns, rows })
}

fn validate_cell(column: &str, cell: &str) -> Result<(), DomainError> {
    match column {
        "expiry_date" => {
            parse_date(cell)?;
        }
        "quantity" => {
            let quantity: i32 = cell.parse().map_err(|_| DomainError::InvalidQuantity {
                value: cell.to_string(),
            })?;
            if quantity < 0 {
                return Err(DomainError::InvalidQuantity {
                    value: cell.to_string(),
                });
            }
        }
        "status" => {
            ExpiryStatus::from_str(cell).map_err(|_| DomainError::InvalidStatus {
                value: cell.to_string(),
            })?;
        }
        _ => {}
    }
    Ok(())
}

/// Split CSV text into records, honoring RFC-4180 quoting (embedded commas,
/// doubled quotes and newlines inside quoted fields).
fn split_records(text: &str) -> Result<Vec<Vec<String>>, DomainError> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut field_was_quoted = false;
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' => {
                if field.is_empty() && !field_was_quoted {
                    in_quotes = true;
                    field_was_quoted = true;
                } else {
                    return Err(DomainError::CsvMalformedQuote {
                        row: records.len() + 1,
                    });
                }
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                field_was_quoted = false;
            }
            '\n' | '\r' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                fields.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut fields));
                field_was_quoted = false;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(DomainError::CsvMalformedQuote {
            row: records.len() + 1,
        });
    }
    if !field.is_empty() || !fields.is_empty() || field_was_quoted {
        fields.push(field);
        records.push(fields);
    }

    Ok(records)
}
