use crate::domain::errors::HistoryError;
use crate::domain::history::{PriceHistory, PricePoint};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

// Same markers pandas treats as missing by default
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(field: &str) -> bool {
    MISSING_MARKERS.contains(&field)
}

/// Loads historical closes from a CSV with `date` and `close` columns.
///
/// Rows with an empty or missing-marker field (`NaN`, `NA`, `null`, ...) are dropped, exact duplicate rows are
/// dropped, and every remaining row must parse.
pub fn load_price_history(path: &Path) -> Result<PriceHistory, HistoryError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;
    let history = read_records(reader)?;
    info!(
        "CSV loaded successfully from {:?} with {} entries",
        path,
        history.len()
    );
    Ok(history)
}

pub fn read_price_history<R: Read>(input: R) -> Result<PriceHistory, HistoryError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);
    read_records(reader)
}

fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<PriceHistory, HistoryError> {
    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(HistoryError::MissingColumn(name))
    };
    let date_idx = column("date")?;
    let close_idx = column("close")?;

    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut points = Vec::new();
    let mut dropped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        // Header is line 1
        let row = i + 2;

        let incomplete = record.len() < headers.len()
            || record.iter().any(is_missing);
        if incomplete || !seen.insert(record.iter().map(str::to_string).collect()) {
            dropped += 1;
            continue;
        }

        let date_field = &record[date_idx];
        let close_field = &record[close_idx];

        let date = parse_history_date(date_field).ok_or_else(|| HistoryError::InvalidDate {
            row,
            value: date_field.to_string(),
        })?;
        let close = close_field
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())
            .ok_or_else(|| HistoryError::InvalidClose {
                row,
                value: close_field.to_string(),
            })?;

        points.push(PricePoint { date, close });
    }

    if dropped > 0 {
        debug!("Dropped {} incomplete or duplicate rows", dropped);
    }
    Ok(PriceHistory::new(points))
}

fn parse_history_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}
