use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::ArchiveImportError;

/// One row of a legacy log export after cell-level cleanup.
#[derive(Debug)]
pub(crate) struct ArchiveEntry {
    pub(crate) log: String,
    pub(crate) project: String,
    pub(crate) stage: Option<String>,
    pub(crate) reviewer: String,
    pub(crate) review_date: NaiveDate,
    pub(crate) overall_score: Option<f64>,
    pub(crate) submitted_on: Option<NaiveDate>,
}

pub(crate) fn parse_entries<R: Read>(reader: R) -> Result<Vec<ArchiveEntry>, ArchiveImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for (index, record) in csv_reader.deserialize::<ArchiveRow>().enumerate() {
        let row = record?;
        let line = index + 1;

        let review_date =
            parse_date(&row.review_date).ok_or_else(|| ArchiveImportError::InvalidDate {
                row: line,
                value: row.review_date.clone(),
            })?;

        let overall_score = match row.overall_score.as_deref() {
            None => None,
            Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
                ArchiveImportError::InvalidScore {
                    row: line,
                    value: raw.to_string(),
                }
            })?),
        };

        let submitted_on = match row.submitted_at.as_deref() {
            None => None,
            Some(raw) => Some(parse_date(raw).ok_or_else(|| ArchiveImportError::InvalidDate {
                row: line,
                value: raw.to_string(),
            })?),
        };

        entries.push(ArchiveEntry {
            log: row.log,
            project: row.project,
            stage: row.stage,
            reviewer: row.reviewer,
            review_date,
            overall_score,
            submitted_on,
        });
    }

    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct ArchiveRow {
    #[serde(rename = "Log")]
    log: String,
    #[serde(rename = "Project")]
    project: String,
    #[serde(rename = "Stage", default, deserialize_with = "empty_string_as_none")]
    stage: Option<String>,
    #[serde(rename = "Reviewer")]
    reviewer: String,
    #[serde(rename = "Review Date")]
    review_date: String,
    #[serde(
        rename = "Overall Score",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    overall_score: Option<String>,
    #[serde(
        rename = "Submitted At",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    submitted_at: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Legacy exports mix RFC 3339 timestamps with bare dates.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").ok()
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}
