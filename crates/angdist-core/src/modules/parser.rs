//! Reader for the fixed-width Legendre coefficient listing.
//!
//! After the header block every line is either a record header (energy in
//! columns 0..11, up to six coefficients from column 12 on) or a
//! continuation whose first eleven columns are blank and which carries two
//! more coefficients. Exactly one record is buffered at a time.

use crate::common::PipelineConfig;
use crate::common::constants::{
    COEFFICIENT_COLUMN_START, CONTINUATION_COEFFICIENT_FIELDS, FIELD_WIDTH,
    HEADER_COEFFICIENT_FIELDS,
};
use crate::domain::{AngdistError, EnergyRecord};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}, field {field} (column {column}): cannot read '{text}' as a number")]
    MalformedField {
        line: usize,
        field: usize,
        column: usize,
        text: String,
    },
    #[error("line {line}: energy {energy} must be finite and > 0")]
    InvalidEnergy { line: usize, energy: f64 },
    #[error("line {line}: continuation line before any record header")]
    OrphanContinuation { line: usize },
    #[error(
        "line {line}: record at energy {energy:e} has nonzero order-{order} coefficient beyond max order {max_order}"
    )]
    OrderOverflow {
        line: usize,
        energy: f64,
        order: usize,
        max_order: usize,
    },
    #[error("no energy records found after {header_lines} header lines")]
    NoRecords { header_lines: usize },
    #[error("record limit must be at least 1, got {max_records}")]
    ZeroRecordLimit { max_records: usize },
}

impl From<ParseError> for AngdistError {
    fn from(error: ParseError) -> Self {
        let placeholder = match &error {
            ParseError::MalformedField { .. } => "INPUT.PARSE_FIELD",
            ParseError::InvalidEnergy { .. } => "INPUT.PARSE_ENERGY",
            ParseError::OrphanContinuation { .. } => "INPUT.PARSE_CONTINUATION",
            ParseError::OrderOverflow { .. } => "INPUT.PARSE_ORDER",
            ParseError::NoRecords { .. } => "INPUT.PARSE_EMPTY",
            ParseError::ZeroRecordLimit { .. } => "INPUT.CONFIG",
        };
        AngdistError::input_validation(placeholder, error.to_string())
    }
}

/// Reads one fixed-width numeric field.
///
/// Blank fields are `0.0`. Fields that are not plain floats are retried with
/// the exponent marker restored before every sign after the first character,
/// so `1.234-5` reads as `1.234e-5`. Non-finite values are rejected.
pub fn parse_field(raw: &str) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    let value = match text.parse::<f64>() {
        Ok(value) => value,
        Err(_) => restore_exponent(text).parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

fn restore_exponent(text: &str) -> String {
    let mut chars = text.chars();
    let mut restored = String::with_capacity(text.len() + 2);
    if let Some(first) = chars.next() {
        restored.push(first);
    }
    for ch in chars {
        if matches!(ch, '+' | '-') {
            restored.push('e');
        }
        restored.push(ch);
    }
    restored
}

/// Characters `start..end` of `line`, clipped to the line length.
fn column_slice(line: &str, start: usize, end: usize) -> &str {
    let byte_at = |column: usize| {
        line.char_indices()
            .nth(column)
            .map_or(line.len(), |(offset, _)| offset)
    };
    let start = byte_at(start);
    let end = byte_at(end).max(start);
    &line[start..end]
}

fn read_field(line: &str, line_number: usize, field: usize, column: usize) -> Result<f64, ParseError> {
    let text = column_slice(line, column, column + FIELD_WIDTH);
    parse_field(text).ok_or_else(|| ParseError::MalformedField {
        line: line_number,
        field,
        column,
        text: text.trim().to_string(),
    })
}

fn read_coefficients(
    line: &str,
    line_number: usize,
    count: usize,
    into: &mut Vec<f64>,
) -> Result<(), ParseError> {
    for index in 0..count {
        let column = COEFFICIENT_COLUMN_START + index * FIELD_WIDTH;
        into.push(read_field(line, line_number, index + 1, column)?);
    }
    Ok(())
}

fn is_continuation(line: &str) -> bool {
    line.chars().take(FIELD_WIDTH).all(char::is_whitespace)
}

#[derive(Debug, Clone, PartialEq)]
struct PendingRecord {
    energy: f64,
    coefficients: Vec<f64>,
    line: usize,
}

impl PendingRecord {
    fn start(line: &str, line_number: usize) -> Result<Self, ParseError> {
        let energy = read_field(line, line_number, 0, 0)?;
        if energy <= 0.0 {
            return Err(ParseError::InvalidEnergy {
                line: line_number,
                energy,
            });
        }

        let mut coefficients = Vec::with_capacity(1 + HEADER_COEFFICIENT_FIELDS + 2);
        coefficients.push(1.0);
        read_coefficients(line, line_number, HEADER_COEFFICIENT_FIELDS, &mut coefficients)?;
        Ok(Self {
            energy,
            coefficients,
            line: line_number,
        })
    }

    fn into_record(mut self, max_order: usize) -> Result<EnergyRecord, ParseError> {
        let count = max_order + 1;
        if let Some(order) = self
            .coefficients
            .iter()
            .enumerate()
            .skip(count)
            .find_map(|(order, value)| (*value != 0.0).then_some(order))
        {
            return Err(ParseError::OrderOverflow {
                line: self.line,
                energy: self.energy,
                order,
                max_order,
            });
        }

        self.coefficients.resize(count, 0.0);
        Ok(EnergyRecord::new(self.energy, self.coefficients).with_source_line(self.line))
    }
}

/// Parser state between lines: nothing buffered, or one record in progress.
#[derive(Debug, Clone, PartialEq, Default)]
enum RecordAccumulator {
    #[default]
    Empty,
    Accumulating(PendingRecord),
}

impl RecordAccumulator {
    /// Feeds one line; returns the next state and any record completed by it.
    fn step(
        self,
        line: &str,
        line_number: usize,
        max_order: usize,
    ) -> Result<(Self, Option<EnergyRecord>), ParseError> {
        if is_continuation(line) {
            return match self {
                Self::Empty if line.trim().is_empty() => Ok((Self::Empty, None)),
                Self::Empty => Err(ParseError::OrphanContinuation { line: line_number }),
                Self::Accumulating(mut pending) => {
                    read_coefficients(
                        line,
                        line_number,
                        CONTINUATION_COEFFICIENT_FIELDS,
                        &mut pending.coefficients,
                    )?;
                    Ok((Self::Accumulating(pending), None))
                }
            };
        }

        let completed = self.finish(max_order)?;
        let next = PendingRecord::start(line, line_number)?;
        Ok((Self::Accumulating(next), completed))
    }

    fn finish(self, max_order: usize) -> Result<Option<EnergyRecord>, ParseError> {
        match self {
            Self::Empty => Ok(None),
            Self::Accumulating(pending) => pending.into_record(max_order).map(Some),
        }
    }

    fn is_accumulating(&self) -> bool {
        matches!(self, Self::Accumulating(_))
    }
}

/// Parses every energy record after the header block, in file order.
///
/// Coefficient vectors carry the implicit order-0 term and are zero-padded to
/// `max_order + 1`. At most `max_records` records are returned.
pub fn parse_records(source: &str, config: &PipelineConfig) -> Result<Vec<EnergyRecord>, ParseError> {
    if config.max_records == 0 {
        return Err(ParseError::ZeroRecordLimit {
            max_records: config.max_records,
        });
    }

    let mut records = Vec::new();
    let mut state = RecordAccumulator::default();

    for (index, line) in source.lines().enumerate().skip(config.header_lines) {
        let line_number = index + 1;
        if !is_continuation(line)
            && state.is_accumulating()
            && records.len() + 1 == config.max_records
        {
            // The buffered record is the last one allowed.
            break;
        }

        let (next, completed) = state.step(line, line_number, config.max_order)?;
        state = next;
        if let Some(record) = completed {
            debug!(
                line = record.source_line(),
                energy = record.energy(),
                "parsed energy record"
            );
            records.push(record);
        }
    }

    if let Some(record) = state.finish(config.max_order)? {
        records.push(record);
    }

    if records.is_empty() {
        return Err(ParseError::NoRecords {
            header_lines: config.header_lines,
        });
    }

    info!(records = records.len(), "parsed angular distribution records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::{ParseError, parse_field, parse_records};
    use crate::common::PipelineConfig;
    use crate::domain::{AngdistError, ErrorCategory};

    fn header_block(lines: usize) -> String {
        (0..lines).map(|index| format!("header {index}\n")).collect()
    }

    fn source_with(body: &[&str]) -> String {
        let mut source = header_block(12);
        for line in body {
            source.push_str(line);
            source.push('\n');
        }
        source
    }

    #[test]
    fn fields_restore_omitted_exponent_markers() {
        assert_eq!(parse_field("1.234-5"), Some(1.234e-5));
        assert_eq!(parse_field(" 2.832051-1"), Some(2.832051e-1));
        assert_eq!(parse_field(" 1.000000+7"), Some(1.0e7));
        assert_eq!(parse_field("-2.62229-12"), Some(-2.62229e-12));
    }

    #[test]
    fn fields_keep_standard_floats_and_blanks() {
        assert_eq!(parse_field("-1.234e-5"), Some(-1.234e-5));
        assert_eq!(parse_field("0.5"), Some(0.5));
        assert_eq!(parse_field(""), Some(0.0));
        assert_eq!(parse_field("           "), Some(0.0));
    }

    #[test]
    fn fields_reject_garbage_and_non_finite_values() {
        assert_eq!(parse_field("1.2.3"), None);
        assert_eq!(parse_field("abc"), None);
        assert_eq!(parse_field("inf"), None);
        assert_eq!(parse_field("NaN"), None);
    }

    #[test]
    fn header_and_continuation_lines_form_one_record() {
        let source = source_with(&[
            " 1.000000+7  2.832051-1 2.406998-1 2.398418-1 1.829444-1 3.803701-2 4.461334-2",
            "             9.796117-3 1.003734-3",
        ]);
        let records = parse_records(&source, &PipelineConfig::default()).expect("parse");
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.energy(), 1.0e7);
        assert_eq!(record.source_line(), 13);
        assert_eq!(
            record.coefficients(),
            &[
                1.0, 2.832051e-1, 2.406998e-1, 2.398418e-1, 1.829444e-1, 3.803701e-2,
                4.461334e-2, 9.796117e-3, 1.003734e-3
            ]
        );
    }

    #[test]
    fn short_records_are_zero_padded() {
        let source = source_with(&[" 1.000000-5 -2.62229-12", " 2.000000+4  1.500000-1"]);
        let records = parse_records(&source, &PipelineConfig::default()).expect("parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].coefficients().len(), 9);
        assert_eq!(records[0].coefficients()[1], -2.62229e-12);
        assert!(records[0].coefficients()[2..].iter().all(|value| *value == 0.0));
        assert_eq!(records[1].energy(), 2.0e4);
        assert_eq!(records[1].coefficients()[1], 0.15);
    }

    #[test]
    fn lines_that_end_early_read_as_far_as_they_go() {
        let source = source_with(&[" 1.000000+6  1.0-1"]);
        let records = parse_records(&source, &PipelineConfig::default()).expect("parse");
        assert_eq!(records[0].coefficients()[1], 0.1);
    }

    #[test]
    fn malformed_field_names_line_and_field() {
        let source = source_with(&[" 1.000000+7  2.832051-1 2.4x6998-1"]);
        let error = parse_records(&source, &PipelineConfig::default()).expect_err("bad field");
        assert_eq!(
            error,
            ParseError::MalformedField {
                line: 13,
                field: 2,
                column: 23,
                text: "2.4x6998-1".to_string(),
            }
        );

        let converted = AngdistError::from(error);
        assert_eq!(converted.category(), ErrorCategory::InputValidationError);
        assert_eq!(converted.placeholder(), "INPUT.PARSE_FIELD");
        assert!(converted.message().contains("line 13"));
    }

    #[test]
    fn continuation_before_any_header_is_rejected() {
        let source = source_with(&["             9.796117-3 1.003734-3"]);
        let error = parse_records(&source, &PipelineConfig::default()).expect_err("orphan");
        assert_eq!(error, ParseError::OrphanContinuation { line: 13 });
    }

    #[test]
    fn blank_lines_before_the_first_header_are_skipped() {
        let source = source_with(&["", " 1.000000+7  2.832051-1"]);
        let records = parse_records(&source, &PipelineConfig::default()).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_line(), 14);
    }

    #[test]
    fn non_positive_energy_is_rejected() {
        let source = source_with(&[" 0.000000+0  2.832051-1"]);
        let error = parse_records(&source, &PipelineConfig::default()).expect_err("zero energy");
        assert!(matches!(error, ParseError::InvalidEnergy { line: 13, .. }));
    }

    #[test]
    fn coefficients_beyond_max_order_must_be_zero() {
        let source = source_with(&[" 1.000000+7  1.000000-1 2.000000-1 3.000000-1"]);
        let error = parse_records(&source, &PipelineConfig::default().with_max_order(2))
            .expect_err("overflow");
        assert!(matches!(
            error,
            ParseError::OrderOverflow {
                order: 3,
                max_order: 2,
                ..
            }
        ));

        let source = source_with(&[" 1.000000+7  1.000000-1 2.000000-1"]);
        let records = parse_records(&source, &PipelineConfig::default().with_max_order(2))
            .expect("trailing blanks are dropped");
        assert_eq!(records[0].coefficients(), &[1.0, 0.1, 0.2]);
    }

    #[test]
    fn parsing_stops_at_max_records() {
        let body: Vec<String> = (1..=5)
            .map(|index| format!(" {index}.000000+6  1.000000-1"))
            .collect();
        let body: Vec<&str> = body.iter().map(String::as_str).collect();
        let source = source_with(&body);

        let mut config = PipelineConfig::default();
        config.max_records = 3;
        let records = parse_records(&source, &config).expect("parse");
        assert_eq!(
            records.iter().map(|record| record.energy()).collect::<Vec<_>>(),
            vec![1.0e6, 2.0e6, 3.0e6]
        );
    }

    #[test]
    fn zero_record_limit_is_rejected_before_reading() {
        let source = source_with(&[" 1.000000+6  1.000000-1", " 2.000000+6  1.000000-1"]);
        let mut config = PipelineConfig::default();
        config.max_records = 0;
        let error = parse_records(&source, &config).expect_err("zero limit");
        assert_eq!(error, ParseError::ZeroRecordLimit { max_records: 0 });

        let converted = AngdistError::from(error);
        assert_eq!(converted.category(), ErrorCategory::InputValidationError);
        assert_eq!(converted.placeholder(), "INPUT.CONFIG");
    }

    #[test]
    fn single_record_limit_keeps_only_the_first_record() {
        let source = source_with(&[" 1.000000+6  1.000000-1", " 2.000000+6  1.000000-1"]);
        let mut config = PipelineConfig::default();
        config.max_records = 1;
        let records = parse_records(&source, &config).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].energy(), 1.0e6);
    }

    #[test]
    fn header_only_input_has_no_records() {
        let error = parse_records(&header_block(12), &PipelineConfig::default())
            .expect_err("no records");
        assert_eq!(error, ParseError::NoRecords { header_lines: 12 });
        assert_eq!(AngdistError::from(error).placeholder(), "INPUT.PARSE_EMPTY");
    }
}
