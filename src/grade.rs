#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Maximum number of absences tolerated before a student fails outright,
/// matching the spreadsheet's house rule. Callers may override it per run.
pub const MAXIMUM_ABSENCES: u32 = 15;

/// A student's academic situation after grading.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Situation {
    /// Too many absences; grades are not considered.
    FailedByAbsence,
    /// Average below the passing floor.
    FailedByGrade,
    /// Average in the make-up exam band; a minimum exam score applies.
    FinalExamRequired,
    /// Average at or above the passing line.
    Passed,
}

impl Situation {
    /// Returns the display string written to the sheet. The labels are the
    /// Portuguese ones the spreadsheet's readers expect.
    pub fn label(&self) -> &'static str {
        match self {
            Situation::FailedByAbsence => "Reprovado por Falta",
            Situation::FailedByGrade => "Reprovado por Nota",
            Situation::FinalExamRequired => "Exame Final",
            Situation::Passed => "Aprovado",
        }
    }
}

impl Display for Situation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One row's worth of raw inputs to the grading engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentRecord {
    /// Number of missed classes.
    pub absences: u32,
    /// First grade.
    pub grade1:   i64,
    /// Second grade.
    pub grade2:   i64,
    /// Third grade.
    pub grade3:   i64,
}

impl StudentRecord {
    /// Creates a new record -
    /// * `absences` - number of missed classes
    /// * `grade1`, `grade2`, `grade3` - the three grades, nominally 0-10
    pub fn new(absences: u32, grade1: i64, grade2: i64, grade3: i64) -> Self {
        Self {
            absences,
            grade1,
            grade2,
            grade3,
        }
    }
}

/// The engine's verdict for one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradingResult {
    /// The classified situation.
    pub situation:            Situation,
    /// The average after [`round_to_tenth`], kept for display and for the
    /// threshold computation.
    pub rounded_average:      f64,
    /// Minimum make-up exam score (NAF). Non-zero only when `situation` is
    /// [`Situation::FinalExamRequired`]; exactly `0.0` otherwise.
    pub final_exam_threshold: f64,
}

/// Rounds `n` to one decimal digit using the sheet's original arithmetic.
///
/// Splits off the integer part and rounds the fractional tenths: when the
/// rounded fraction reaches 0.5 the result is `ceil(n * 10) / 10`, otherwise
/// `floor(n * 10) / 10`. Note this ceils whenever the fraction rounds to 0.5
/// or more (0.64 becomes 0.7), which is not textbook half-up rounding; the
/// original behavior is preserved verbatim. Inputs are non-negative in
/// practice (0 ≤ n ≤ 10). Idempotent.
pub fn round_to_tenth(n: f64) -> f64 {
    let int_part = n.trunc();
    let frac = n - int_part;

    let tenths = (frac * 10.0).round() / 10.0;
    if tenths >= 0.5 {
        (n * 10.0).ceil() / 10.0
    } else {
        (n * 10.0).floor() / 10.0
    }
}

/// Returns the composite average of the three grades: `(g1 + g2 + g3) / 30.0`.
///
/// The divisor is 30, exactly as in the spreadsheet this tool was built
/// against, so with grades on a 0-10 scale the average lands in [0, 1] while
/// the classification thresholds read as a 0-10 scale. Likely a defect in the
/// sheet's original formula, but intent is ambiguous, so the behavior is
/// preserved rather than corrected here.
///
/// No range guard: out-of-range grades pass through and produce an
/// out-of-range average.
pub fn average(grade1: i64, grade2: i64, grade3: i64) -> f64 {
    (grade1 + grade2 + grade3) as f64 / 30.0
}

/// Classifies a student. First match wins:
/// absences over `max_absences`, then average below 5.0, then the
/// make-up exam band [5.0, 7.0), then passed.
pub fn classify(absences: u32, average: f64, max_absences: u32) -> Situation {
    if absences > max_absences {
        Situation::FailedByAbsence
    } else if average < 5.0 {
        Situation::FailedByGrade
    } else if average < 7.0 {
        Situation::FinalExamRequired
    } else {
        Situation::Passed
    }
}

/// Returns the minimum make-up exam score: `10 - rounded_average`, rounded to
/// a tenth. Callers pass the *already rounded* average; rounding happens
/// before the subtraction, matching the sheet's original arithmetic.
pub fn final_exam_threshold(rounded_average: f64) -> f64 {
    round_to_tenth(10.0 - rounded_average)
}

/// Evaluates one record end to end.
///
/// The classifier sees the *raw* average while the exam threshold is computed
/// from the *rounded* one; that asymmetry is deliberate and matches the
/// original sheet logic.
pub fn evaluate(record: &StudentRecord, max_absences: u32) -> GradingResult {
    let raw_average = average(record.grade1, record.grade2, record.grade3);
    let rounded_average = round_to_tenth(raw_average);
    let situation = classify(record.absences, raw_average, max_absences);

    let threshold = match situation {
        Situation::FinalExamRequired => final_exam_threshold(rounded_average),
        _ => 0.0,
    };

    GradingResult {
        situation,
        rounded_average,
        final_exam_threshold: threshold,
    }
}
