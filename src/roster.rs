#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::{Context, Result};
use serde_json::json;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Style},
};
use tracing::info;

use crate::{
    config::RosterConfig,
    grade::{GradingResult, Situation, StudentRecord, evaluate},
    sheets::{CellRef, SheetStore},
};

/// Column that receives the situation label.
pub const SITUATION_COLUMN: char = 'G';

/// Column that receives the make-up exam threshold.
pub const THRESHOLD_COLUMN: char = 'H';

/// Offset of the absences cell within a fetched row (column C).
const ABSENCES_OFFSET: usize = 2;

/// Offsets of the three grade cells within a fetched row (columns D-F).
const GRADE_OFFSETS: [usize; 3] = [3, 4, 5];

/// A cell that could not be turned into a student record. Raised before any
/// write happens; the grading engine itself never sees malformed input.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The fetched row is shorter than the roster layout requires.
    #[error("row {row} has no value in column {column}")]
    MissingCell {
        /// Absolute sheet row.
        row:    u32,
        /// Column letter of the missing cell.
        column: char,
    },
    /// A cell held text that does not parse as an integer.
    #[error("row {row}, column {column}: cannot read {value:?} as an integer")]
    NonNumeric {
        /// Absolute sheet row.
        row:    u32,
        /// Column letter of the offending cell.
        column: char,
        /// The text that failed to parse.
        value:  String,
    },
}

/// One graded roster row, carrying its absolute sheet position from parse
/// time so write-back never has to re-derive it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradedRow {
    /// Absolute (1-based) row number on the sheet.
    pub row:    u32,
    /// The parsed inputs.
    pub record: StudentRecord,
    /// The engine's verdict.
    pub result: GradingResult,
}

/// Returns the absolute row number the given A1 range starts at, e.g. `4` for
/// `engenharia_de_software!A4:F27`.
pub fn start_row(range: &str) -> Result<u32> {
    let cells = range.rsplit('!').next().unwrap_or(range);
    let first_cell = cells.split(':').next().unwrap_or(cells);
    let digits: String = first_cell.chars().filter(char::is_ascii_digit).collect();

    digits
        .parse::<u32>()
        .with_context(|| format!("range `{range}` has no starting row number"))
}

/// Returns the column letter for an offset within a fetched A-F row.
fn column_letter(offset: usize) -> char {
    (b'A' + offset as u8) as char
}

/// Reads one integer cell out of a fetched row.
fn parse_cell(row: u32, cells: &[String], offset: usize) -> Result<i64, ParseError> {
    let column = column_letter(offset);
    let text = cells.get(offset).ok_or(ParseError::MissingCell { row, column })?;

    text.trim().parse::<i64>().map_err(|_| ParseError::NonNumeric {
        row,
        column,
        value: text.clone(),
    })
}

/// Parses one fetched row into a [`StudentRecord`]. Only columns C-F are
/// consulted; A and B belong to the sheet, not the engine.
pub fn parse_row(row: u32, cells: &[String]) -> Result<StudentRecord, ParseError> {
    let absences = parse_cell(row, cells, ABSENCES_OFFSET)?;
    let absences = u32::try_from(absences).map_err(|_| ParseError::NonNumeric {
        row,
        column: column_letter(ABSENCES_OFFSET),
        value: cells[ABSENCES_OFFSET].clone(),
    })?;

    let grade1 = parse_cell(row, cells, GRADE_OFFSETS[0])?;
    let grade2 = parse_cell(row, cells, GRADE_OFFSETS[1])?;
    let grade3 = parse_cell(row, cells, GRADE_OFFSETS[2])?;

    Ok(StudentRecord::new(absences, grade1, grade2, grade3))
}

/// Parses and evaluates every fetched row, pairing each verdict with its
/// absolute sheet row. A malformed cell aborts the whole pass, so callers
/// never write a partially parsed roster.
pub fn grade_rows(
    rows: &[Vec<String>],
    first_row: u32,
    max_absences: u32,
) -> Result<Vec<GradedRow>, ParseError> {
    rows.iter()
        .enumerate()
        .map(|(offset, cells)| {
            let row = first_row + offset as u32;
            let record = parse_row(row, cells)?;
            let result = evaluate(&record, max_absences);
            Ok(GradedRow {
                row,
                record,
                result,
            })
        })
        .collect()
}

/// Fetches the configured range and grades it. No writes happen here; `run`
/// and `check` share this and diverge on what they do with the verdicts.
pub async fn grade_range<S: SheetStore>(store: &S, config: &RosterConfig) -> Result<Vec<GradedRow>> {
    let first_row = start_row(&config.range)?;
    let rows = store
        .fetch_range(&config.range)
        .await
        .with_context(|| format!("could not fetch `{}`", config.range))?;

    info!(range = %config.range, rows = rows.len(), "fetched roster");

    let graded = grade_rows(&rows, first_row, config.max_absences)?;
    for row in &graded {
        info!(
            row = row.row,
            average = row.result.rounded_average,
            situation = %row.result.situation,
            "graded"
        );
    }

    Ok(graded)
}

/// Writes each verdict back to the sheet, strictly in row order: the
/// situation label to column G, then the threshold (or the literal `0`) to
/// column H, before moving to the next row.
pub async fn write_results<S: SheetStore>(store: &S, graded: &[GradedRow]) -> Result<()> {
    for row in graded {
        let situation_cell = CellRef::new(SITUATION_COLUMN, row.row);
        store
            .write_cell(situation_cell, json!(row.result.situation.label()))
            .await
            .with_context(|| format!("could not write {situation_cell}"))?;

        let threshold = match row.result.situation {
            Situation::FinalExamRequired => json!(row.result.final_exam_threshold),
            _ => json!(0),
        };
        let threshold_cell = CellRef::new(THRESHOLD_COLUMN, row.row);
        store
            .write_cell(threshold_cell, threshold)
            .await
            .with_context(|| format!("could not write {threshold_cell}"))?;
    }

    Ok(())
}

/// One line of the dry-run summary.
#[derive(Tabled)]
struct SummaryLine {
    /// Absolute sheet row.
    #[tabled(rename = "Row")]
    row:       u32,
    /// Number of absences.
    #[tabled(rename = "Absences")]
    absences:  u32,
    /// Rounded average, one decimal.
    #[tabled(rename = "Average")]
    average:   String,
    /// Situation label as it would be written to column G.
    #[tabled(rename = "Situation")]
    situation: &'static str,
    /// Threshold as it would be written to column H.
    #[tabled(rename = "NAF")]
    threshold: String,
}

/// Renders the verdicts as the table `pauta check` prints instead of writing.
pub fn summary_table(graded: &[GradedRow]) -> String {
    let lines = graded.iter().map(|row| SummaryLine {
        row:       row.row,
        absences:  row.record.absences,
        average:   format!("{:.1}", row.result.rounded_average),
        situation: row.result.situation.label(),
        threshold: match row.result.situation {
            Situation::FinalExamRequired => format!("{:.1}", row.result.final_exam_threshold),
            _ => "0".to_owned(),
        },
    });

    Table::new(lines)
        .with(Style::modern())
        .with(Alignment::left())
        .to_string()
}
