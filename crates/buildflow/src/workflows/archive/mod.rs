//! Import of legacy review log exports.
//!
//! Historical logs arrive as CSV pulled from the previous tracking tool.
//! Rows carry only the headline fields (log, project, stage, reviewer,
//! dates, overall score), so imported records surface in log views and
//! dashboards but hold no per-category breakdown.

mod mapping;
mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::review::{
    ReviewDraft, ReviewId, ReviewRecord, ReviewScheme, ReviewStatus, ScoreBand, ScoreSummary,
};

#[derive(Debug, thiserror::Error)]
pub enum ArchiveImportError {
    #[error("failed to read archive export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid archive CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unrecognized log label '{value}'")]
    UnknownLog { row: usize, value: String },
    #[error("row {row}: unrecognized project stage '{value}'")]
    UnknownStage { row: usize, value: String },
    #[error("row {row}: unreadable date '{value}'")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: unreadable score '{value}'")]
    InvalidScore { row: usize, value: String },
}

pub struct ArchiveImporter;

impl ArchiveImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ReviewRecord>, ArchiveImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Materialize archived rows as review records. Rows with a score are
    /// submitted reviews; rows without one come back as open drafts.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ReviewRecord>, ArchiveImportError> {
        let entries = parser::parse_entries(reader)?;
        let mut records = Vec::with_capacity(entries.len());

        for (index, entry) in entries.into_iter().enumerate() {
            let line = index + 1;

            let review_type = mapping::review_type_for(&entry.log).ok_or_else(|| {
                ArchiveImportError::UnknownLog {
                    row: line,
                    value: entry.log.clone(),
                }
            })?;

            let stage = match entry.stage.as_deref() {
                None => None,
                Some(raw) => Some(mapping::stage_for(raw).ok_or_else(|| {
                    ArchiveImportError::UnknownStage {
                        row: line,
                        value: raw.to_string(),
                    }
                })?),
            };

            let mut draft = ReviewDraft::new(
                ReviewId(format!("arch-{line:06}")),
                review_type,
                entry.review_date,
            );
            draft.project_name = entry.project;
            draft.project_stage = stage;
            draft.reviewer_name = entry.reviewer;

            let score = match entry.overall_score {
                None => None,
                Some(value) => {
                    if !(0.0..=10.0).contains(&value) {
                        return Err(ArchiveImportError::InvalidScore {
                            row: line,
                            value: value.to_string(),
                        });
                    }

                    draft.status = ReviewStatus::Submitted;
                    draft.submitted_on = Some(entry.submitted_on.unwrap_or(entry.review_date));
                    draft.current_step = ReviewScheme::for_type(review_type).total_steps();

                    Some(ScoreSummary {
                        overall_score: value,
                        band: ScoreBand::for_score(value),
                        category_contributions: Default::default(),
                    })
                }
            };

            records.push(ReviewRecord { draft, score });
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    const HEADER: &str = "Log,Project,Stage,Reviewer,Review Date,Overall Score,Submitted At\n";

    #[test]
    fn parse_date_supports_rfc3339_and_date_strings() {
        let rfc = parser::parse_date_for_tests("2025-06-24T10:00:00Z").expect("parse rfc");
        assert_eq!(rfc, NaiveDate::from_ymd_opt(2025, 6, 24).unwrap());

        let iso = parser::parse_date_for_tests("2025-06-30").expect("parse iso");
        assert_eq!(iso, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());

        let us = parser::parse_date_for_tests("06/30/2025").expect("parse us");
        assert_eq!(us, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());

        assert!(parser::parse_date_for_tests("  ").is_none());
        assert!(parser::parse_date_for_tests("not-a-date").is_none());
    }

    #[test]
    fn normalize_label_removes_whitespace_and_case() {
        let source = "\u{feff}Constructability  Review  Log";
        assert_eq!(
            mapping::normalize_label(source),
            "constructability review log"
        );
    }

    #[test]
    fn mapping_recognizes_legacy_log_labels() {
        assert_eq!(
            mapping::lookup_for_tests("Constructability Review Log"),
            Some(crate::workflows::review::ReviewType::Constructability)
        );
        assert_eq!(
            mapping::lookup_for_tests("Permit / Inspection"),
            Some(crate::workflows::review::ReviewType::PermitInspection)
        );
        assert_eq!(
            mapping::lookup_for_tests("Constraints Log"),
            Some(crate::workflows::review::ReviewType::Constraint)
        );
        assert_eq!(mapping::lookup_for_tests("Punch List"), None);
    }

    #[test]
    fn importer_builds_submitted_records_from_scored_rows() {
        let csv = format!(
            "{HEADER}Constructability Review Log,Riverside Clinic,Design,Dana Mori,2025-05-02,7.2,2025-05-03T09:30:00Z\n"
        );
        let records = ArchiveImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert!(record.is_submitted());
        assert_eq!(record.draft.project_name, "Riverside Clinic");
        assert_eq!(
            record.draft.submitted_on,
            Some(NaiveDate::from_ymd_opt(2025, 5, 3).unwrap())
        );

        let score = record.score.as_ref().expect("score present");
        assert_eq!(score.overall_score, 7.2);
        assert_eq!(score.band, ScoreBand::Satisfactory);
    }

    #[test]
    fn importer_keeps_unscored_rows_as_drafts() {
        let csv = format!("{HEADER}Constraints Log,Harbor Garage,Construction,Lee Ortiz,2025-07-14,,\n");
        let records = ArchiveImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        let record = &records[0];
        assert!(!record.is_submitted());
        assert!(record.score.is_none());
        assert_eq!(record.draft.current_step, 1);
    }

    #[test]
    fn importer_rejects_unknown_log_labels() {
        let csv = format!("{HEADER}Punch List,Harbor Garage,Construction,Lee Ortiz,2025-07-14,8.0,\n");
        let error = ArchiveImporter::from_reader(Cursor::new(csv)).expect_err("unknown log");

        match error {
            ArchiveImportError::UnknownLog { row, value } => {
                assert_eq!(row, 1);
                assert_eq!(value, "Punch List");
            }
            other => panic!("expected unknown log error, got {other:?}"),
        }
    }

    #[test]
    fn importer_rejects_out_of_range_scores() {
        let csv = format!("{HEADER}Constraints Log,Harbor Garage,Construction,Lee Ortiz,2025-07-14,11.5,\n");
        let error = ArchiveImporter::from_reader(Cursor::new(csv)).expect_err("bad score");

        assert!(matches!(error, ArchiveImportError::InvalidScore { row: 1, .. }));
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error =
            ArchiveImporter::from_path("./does-not-exist.csv").expect_err("expected io error");

        match error {
            ArchiveImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
