//! Delimited-text readers for impression-level and pre-aggregated data.
//!
//! The first line is a header. Columns are located by name, so files may
//! carry any number of extra columns in any order. The delimiter is a tab
//! when the header contains one, a comma otherwise.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use dpd_common::{CampaignAggregate, Error, ImpressionRecord, Result};

/// Column names for impression-level files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetOptions {
    pub campaign_column: String,
    pub conversion_column: String,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            campaign_column: "campaign".to_string(),
            conversion_column: "conversion".to_string(),
        }
    }
}

/// Column names for pre-aggregated count files.
pub const IMPRESSIONS_COLUMN: &str = "impressions";
pub const CONVERSIONS_COLUMN: &str = "conversions";

fn detect_delimiter(header: &str) -> char {
    if header.contains('\t') {
        '\t'
    } else {
        ','
    }
}

struct Header {
    delimiter: char,
    columns: Vec<String>,
}

impl Header {
    fn parse(line: &str) -> Self {
        let delimiter = detect_delimiter(line);
        let columns = line
            .split(delimiter)
            .map(|c| c.trim().trim_matches('"').to_string())
            .collect();
        Self { delimiter, columns }
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::Dataset {
                line: 1,
                message: format!(
                    "column '{}' not found in header (columns: {})",
                    name,
                    self.columns.join(", ")
                ),
            })
    }
}

fn field<'a>(fields: &[&'a str], idx: usize, line: usize) -> Result<&'a str> {
    fields
        .get(idx)
        .map(|f| f.trim().trim_matches('"'))
        .ok_or_else(|| Error::Dataset {
            line,
            message: format!("expected at least {} fields, found {}", idx + 1, fields.len()),
        })
}

/// Parse a conversion flag: `0`, `1`, `true` or `false` (case-insensitive).
pub fn parse_conversion(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Read the header line, returning None for empty input.
fn read_header<R: BufRead>(lines: &mut std::io::Lines<R>) -> Result<Option<Header>> {
    match lines.next() {
        Some(line) => Ok(Some(Header::parse(line?.trim_end_matches('\r')))),
        None => Ok(None),
    }
}

/// Read impression records. Blank lines are ignored.
pub fn read_impressions<R: BufRead>(
    reader: R,
    options: &DatasetOptions,
) -> Result<Vec<ImpressionRecord>> {
    let mut lines = reader.lines();
    let header = match read_header(&mut lines)? {
        Some(header) => header,
        None => return Err(Error::EmptyDataset),
    };
    let campaign_idx = header.position(&options.campaign_column)?;
    let conversion_idx = header.position(&options.conversion_column)?;

    let mut records = Vec::new();
    for (offset, line) in lines.enumerate() {
        let line_no = offset + 2;
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(header.delimiter).collect();
        let campaign = field(&fields, campaign_idx, line_no)?;
        let raw = field(&fields, conversion_idx, line_no)?;
        let converted = parse_conversion(raw).ok_or_else(|| Error::Dataset {
            line: line_no,
            message: format!("conversion value '{}' is not 0/1/true/false", raw),
        })?;
        records.push(ImpressionRecord::new(campaign, converted));
    }

    if records.is_empty() {
        return Err(Error::EmptyDataset);
    }
    tracing::debug!(records = records.len(), "read impression records");
    Ok(records)
}

/// Read impression records from a file.
pub fn read_impressions_file(path: &Path, options: &DatasetOptions) -> Result<Vec<ImpressionRecord>> {
    let file = File::open(path)?;
    read_impressions(BufReader::new(file), options)
}

/// Read pre-aggregated `campaign, impressions, conversions` rows.
///
/// Rows with zero impressions are dropped. Conversions exceeding impressions
/// are an error naming the line.
pub fn read_campaign_counts<R: BufRead>(
    reader: R,
    campaign_column: &str,
) -> Result<Vec<CampaignAggregate>> {
    let mut lines = reader.lines();
    let header = match read_header(&mut lines)? {
        Some(header) => header,
        None => return Err(Error::EmptyDataset),
    };
    let campaign_idx = header.position(campaign_column)?;
    let impressions_idx = header.position(IMPRESSIONS_COLUMN)?;
    let conversions_idx = header.position(CONVERSIONS_COLUMN)?;

    let mut aggregates = Vec::new();
    let mut dropped = 0usize;
    for (offset, line) in lines.enumerate() {
        let line_no = offset + 2;
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(header.delimiter).collect();
        let campaign = field(&fields, campaign_idx, line_no)?;
        let impressions = parse_count(field(&fields, impressions_idx, line_no)?, line_no)?;
        let conversions = parse_count(field(&fields, conversions_idx, line_no)?, line_no)?;
        if impressions == 0 {
            dropped += 1;
            continue;
        }
        let aggregate =
            CampaignAggregate::new(campaign, impressions, conversions).ok_or_else(|| {
                Error::Dataset {
                    line: line_no,
                    message: format!(
                        "conversions ({}) exceed impressions ({})",
                        conversions, impressions
                    ),
                }
            })?;
        aggregates.push(aggregate);
    }

    if dropped > 0 {
        tracing::debug!(dropped, "dropped campaigns with zero impressions");
    }
    if aggregates.is_empty() {
        return Err(Error::EmptyDataset);
    }
    Ok(aggregates)
}

/// Read pre-aggregated counts from a file.
pub fn read_campaign_counts_file(path: &Path, campaign_column: &str) -> Result<Vec<CampaignAggregate>> {
    let file = File::open(path)?;
    read_campaign_counts(BufReader::new(file), campaign_column)
}

fn parse_count(raw: &str, line: usize) -> Result<u64> {
    raw.parse::<u64>().map_err(|_| Error::Dataset {
        line,
        message: format!("'{}' is not a non-negative integer count", raw),
    })
}
