//! # pauta
//!
//! Reads a class roster (absences plus three grades per student) from a
//! Google Sheets range, classifies each student's situation, and writes the
//! verdicts back to the sheet, one row at a time.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Run configuration and environment-sourced credentials
pub mod config;
/// The grading rules: averages, classification, make-up exam thresholds
pub mod grade;
/// The row pipeline: parsing fetched rows, grading them, writing back
pub mod roster;
/// The Google Sheets boundary: store trait, REST client, wire model
pub mod sheets;
