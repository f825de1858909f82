//! Report output
//!
//! The Aggregate stage hands its results to a [`ReportWriter`], which
//! produces the reviewable workbook, and optionally to a
//! [`NarrativeComposer`] for the human-readable completion message.

mod narrative;
mod workbook;
mod writer;

pub use narrative::{NarrativeComposer, TextNarrativeComposer};
pub use workbook::{
    format_answer_rate, ReportMetadata, ReportSheet, ReportWorkbook, ANSWERS_SHEET, SUMMARY_SHEET,
    UNANSWERED_SHEET,
};
pub use writer::{FileReportWriter, ReportError, ReportFormat, ReportWriter};
