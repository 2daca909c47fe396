use crate::domain::{AngdistError, BinTable, BinTableRow, DensityRow, DensityTable};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableParseError {
    #[error("table has no rows")]
    Empty,
    #[error("line {line}: cannot read token '{token}' as a number")]
    MalformedToken { line: usize, token: String },
    #[error("line {line}: expected {expected} columns like the first row, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: need at least {minimum} columns, found {found}")]
    TooNarrow {
        line: usize,
        minimum: usize,
        found: usize,
    },
}

impl From<TableParseError> for AngdistError {
    fn from(error: TableParseError) -> Self {
        AngdistError::input_validation("INPUT.TABLE_PARSE", error.to_string())
    }
}

/// `printf("%.*e")` rendering: signed exponent with at least two digits.
pub fn format_scientific(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        let text = match value {
            v if v.is_nan() => "nan",
            v if v > 0.0 => "inf",
            _ => "-inf",
        };
        return text.to_string();
    }

    let rendered = format!("{value:.precision$e}");
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => rendered,
    }
}

fn render_rows<I>(rows: impl Iterator<Item = I>, precision: usize) -> String
where
    I: Iterator<Item = f64>,
{
    let mut content = String::new();
    for columns in rows {
        let line: Vec<String> = columns
            .map(|value| format_scientific(value, precision))
            .collect();
        content.push_str(&line.join(" "));
        content.push('\n');
    }
    content
}

/// One line per row: energy then every boundary, space separated.
pub fn render_bin_table(table: &BinTable, precision: usize) -> String {
    render_rows(table.rows().iter().map(|row| row.columns()), precision)
}

/// One line per row: energy then every density value, space separated.
pub fn render_density_table(table: &DensityTable, precision: usize) -> String {
    render_rows(table.rows().iter().map(|row| row.columns()), precision)
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, normalize_text_artifact(content))
}

/// Whitespace-delimited numeric rows; blank lines are skipped. Every row must
/// have the width of the first one and at least `minimum_width` columns.
pub fn parse_numeric_rows(
    source: &str,
    minimum_width: usize,
) -> Result<Vec<Vec<f64>>, TableParseError> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let values = line
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<f64>()
                    .map_err(|_| TableParseError::MalformedToken {
                        line: line_number,
                        token: token.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if values.len() < minimum_width {
            return Err(TableParseError::TooNarrow {
                line: line_number,
                minimum: minimum_width,
                found: values.len(),
            });
        }
        if let Some(first) = rows.first()
            && first.len() != values.len()
        {
            return Err(TableParseError::RaggedRow {
                line: line_number,
                expected: first.len(),
                found: values.len(),
            });
        }
        rows.push(values);
    }

    if rows.is_empty() {
        return Err(TableParseError::Empty);
    }
    Ok(rows)
}

fn split_energy(mut values: Vec<f64>) -> (f64, Vec<f64>) {
    let rest = values.split_off(1);
    (values[0], rest)
}

pub fn read_bin_table(source: &str) -> Result<BinTable, TableParseError> {
    let rows = parse_numeric_rows(source, 3)?
        .into_iter()
        .map(|values| {
            let (energy, boundaries) = split_energy(values);
            BinTableRow::new(energy, boundaries)
        })
        .collect();
    Ok(BinTable::from_rows(rows))
}

pub fn read_density_table(source: &str) -> Result<DensityTable, TableParseError> {
    let rows = parse_numeric_rows(source, 2)?
        .into_iter()
        .map(|values| {
            let (energy, density) = split_energy(values);
            DensityRow::new(energy, density)
        })
        .collect();
    Ok(DensityTable::from_rows(rows))
}
