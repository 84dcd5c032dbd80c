//! CSV encoding of patent exports and decoding of patent imports.
//!
//! Exports start with a UTF-8 BOM so spreadsheet tools detect the encoding.
//! Imports accept either `,` or `;` as delimiter, ignore unknown columns, and
//! therefore accept an export file as-is.

use crate::domain::entities::{NewPatent, PatentKind, PatentWithHolders};
use crate::utils::flag::{flag_label, parse_flag};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;

const BOM: &[u8] = b"\xEF\xBB\xBF";

pub const EXPORT_HEADERS: [&str; 19] = [
    "kind",
    "kind_name",
    "reg_number",
    "reg_date",
    "appl_date",
    "appl_number",
    "name",
    "author_raw",
    "author_count",
    "owner_raw",
    "patent_holders",
    "address",
    "country_code",
    "region",
    "city",
    "subcategory",
    "actual",
    "patent_starting_date",
    "publication_url",
];

/// A rejected import row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRowError {
    /// 1-based line number in the uploaded file, when known.
    pub line: Option<u64>,
    pub message: String,
}

impl fmt::Display for CsvRowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for CsvRowError {}

fn date_cell(d: Option<NaiveDate>) -> String {
    d.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Renders patents with their holders as CSV bytes.
pub fn write_patents(rows: &[PatentWithHolders]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(BOM.to_vec());
    writer.write_record(EXPORT_HEADERS)?;

    for row in rows {
        let p = &row.patent;
        let holders = row
            .holders
            .iter()
            .map(|h| {
                h.full_name
                    .clone()
                    .or_else(|| h.short_name.clone())
                    .unwrap_or_else(|| h.tax_number.clone())
            })
            .collect::<Vec<_>>()
            .join("; ");

        writer.write_record([
            p.kind.to_string(),
            PatentKind::from_code(p.kind)
                .map(|k| k.label().to_string())
                .unwrap_or_default(),
            p.reg_number.to_string(),
            date_cell(p.reg_date),
            date_cell(p.appl_date),
            p.appl_number.clone().unwrap_or_default(),
            p.name.clone(),
            p.author_raw.clone().unwrap_or_default(),
            p.author_count.to_string(),
            row.owner_names().unwrap_or_default(),
            holders,
            p.address.clone().unwrap_or_default(),
            p.country_code.clone().unwrap_or_default(),
            p.region.clone().unwrap_or_default(),
            p.city.clone().unwrap_or_default(),
            p.subcategory.clone().unwrap_or_default(),
            flag_label(p.actual).to_string(),
            date_cell(Some(p.patent_starting_date)),
            p.publication_url.clone().unwrap_or_default(),
        ])?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}

#[derive(Debug, Deserialize)]
struct PatentRecord {
    kind: String,
    reg_number: String,
    name: String,
    patent_starting_date: String,
    #[serde(default)]
    reg_date: Option<String>,
    #[serde(default)]
    appl_date: Option<String>,
    #[serde(default)]
    author_raw: Option<String>,
    #[serde(default)]
    owner_raw: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    actual: Option<String>,
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    appl_number: Option<String>,
    #[serde(default)]
    publication_url: Option<String>,
}

fn text(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parses `YYYY-MM-DD` or `DD.MM.YYYY`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d.%m.%Y"))
        .ok()
}

fn optional_date(field: &str, v: Option<String>) -> Result<Option<NaiveDate>, String> {
    match text(v) {
        None => Ok(None),
        Some(s) => parse_date(&s)
            .map(Some)
            .ok_or_else(|| format!("invalid date in `{field}`: {s}")),
    }
}

impl PatentRecord {
    fn into_new_patent(self) -> Result<NewPatent, String> {
        let kind: i32 = self
            .kind
            .trim()
            .parse()
            .map_err(|_| format!("invalid `kind`: {}", self.kind))?;
        if PatentKind::from_code(kind).is_none() {
            return Err(format!("`kind` must be 1, 2 or 3, got {kind}"));
        }

        let reg_number: i32 = self
            .reg_number
            .trim()
            .parse()
            .map_err(|_| format!("invalid `reg_number`: {}", self.reg_number))?;
        if reg_number <= 0 {
            return Err(format!("`reg_number` must be positive, got {reg_number}"));
        }

        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("`name` must not be empty".to_string());
        }

        let patent_starting_date = parse_date(&self.patent_starting_date).ok_or_else(|| {
            format!(
                "invalid date in `patent_starting_date`: {}",
                self.patent_starting_date
            )
        })?;

        let actual = match text(self.actual) {
            None => false,
            Some(s) => parse_flag(&s).ok_or_else(|| format!("invalid `actual`: {s}"))?,
        };

        Ok(NewPatent {
            kind,
            reg_number,
            reg_date: optional_date("reg_date", self.reg_date)?,
            appl_date: optional_date("appl_date", self.appl_date)?,
            author_raw: text(self.author_raw),
            owner_raw: text(self.owner_raw),
            address: text(self.address),
            name,
            actual,
            subcategory: text(self.subcategory),
            country_code: text(self.country_code),
            region: text(self.region),
            city: text(self.city),
            appl_number: text(self.appl_number),
            patent_starting_date,
            publication_url: text(self.publication_url),
        })
    }
}

fn sniff_delimiter(data: &[u8]) -> u8 {
    let first_line = data.split(|b| *b == b'\n').next().unwrap_or_default();
    let semicolons = first_line.iter().filter(|b| **b == b';').count();
    let commas = first_line.iter().filter(|b| **b == b',').count();
    if semicolons > commas { b';' } else { b',' }
}

/// 1-based line on which the record at byte `offset` starts. Blank lines
/// before it are skipped the same way the reader skips them.
fn line_at(data: &[u8], offset: u64) -> u64 {
    let mut start = usize::try_from(offset).map_or(data.len(), |o| o.min(data.len()));
    while matches!(data.get(start), Some(b'\r' | b'\n')) {
        start += 1;
    }
    data[..start].iter().filter(|b| **b == b'\n').count() as u64 + 1
}

/// Parses an uploaded CSV into patents. Stops at the first bad row.
pub fn read_patents(data: &[u8]) -> Result<Vec<NewPatent>, CsvRowError> {
    let data = data.strip_prefix(BOM).unwrap_or(data);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(data))
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| CsvRowError {
            line: Some(1),
            message: csv_error_message(&e),
        })?
        .clone();

    let mut patents = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| CsvRowError {
            line: e.position().map(|p| line_at(data, p.byte())),
            message: csv_error_message(&e),
        })?;
        let line = record.position().map(|p| line_at(data, p.byte()));

        let patent = record
            .deserialize::<PatentRecord>(Some(&headers))
            .map_err(|e| csv_error_message(&e))
            .and_then(PatentRecord::into_new_patent)
            .map_err(|message| CsvRowError { line, message })?;
        patents.push(patent);
    }

    if patents.is_empty() {
        return Err(CsvRowError {
            line: None,
            message: "file contains no patent rows".to_string(),
        });
    }

    Ok(patents)
}

fn csv_error_message(e: &csv::Error) -> String {
    match e.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} fields, found {len}"),
        csv::ErrorKind::Utf8 { .. } => "file is not valid UTF-8".to_string(),
        _ => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::patent::fixtures::{holder, patent};

    #[test]
    fn test_export_has_bom_and_header() {
        let bytes = write_patents(&[]).unwrap();
        assert!(bytes.starts_with(BOM));
        let text = String::from_utf8(bytes[BOM.len()..].to_vec()).unwrap();
        assert!(text.starts_with("kind,kind_name,reg_number,"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_export_row_content() {
        let p = patent(1, 2345);
        let key = p.key();
        let row = PatentWithHolders {
            patent: p,
            holders: vec![holder(key, "7701234567", Some("ООО Альфа"))],
        };
        let bytes = write_patents(&[row]).unwrap();
        let text = String::from_utf8(bytes[BOM.len()..].to_vec()).unwrap();
        let line = text.lines().nth(1).unwrap();

        assert!(line.starts_with("1,Изобретение,2345,2021-03-15,"));
        assert!(line.contains("ООО Альфа (полное)"));
        assert!(line.contains(",Актуально,2020-01-10,"));
    }

    #[test]
    fn test_export_reimports() {
        let p = patent(2, 77);
        let bytes = write_patents(&[PatentWithHolders {
            patent: p.clone(),
            holders: vec![],
        }])
        .unwrap();

        let parsed = read_patents(&bytes).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].key(), p.key());
        assert_eq!(parsed[0].name, p.name);
        assert!(parsed[0].actual);
        assert_eq!(parsed[0].reg_date, p.reg_date);
        assert_eq!(parsed[0].owner_raw, p.owner_raw);
    }

    #[test]
    fn test_import_semicolon_and_dotted_dates() {
        let data = "kind;reg_number;name;patent_starting_date;actual;region\n\
                    3;101;Флакон;01.02.2019;Неактуально;\n";
        let parsed = read_patents(data.as_bytes()).unwrap();
        assert_eq!(parsed[0].kind, 3);
        assert_eq!(
            parsed[0].patent_starting_date,
            NaiveDate::from_ymd_opt(2019, 2, 1).unwrap()
        );
        assert!(!parsed[0].actual);
        assert!(parsed[0].region.is_none());
    }

    #[test]
    fn test_import_reports_bad_line() {
        let data = "kind,reg_number,name,patent_starting_date\n\
                    1,1,Первый,2020-01-01\n\
                    1,abc,Второй,2020-01-01\n";
        let err = read_patents(data.as_bytes()).unwrap_err();
        assert_eq!(err.line, Some(3));
        assert!(err.message.contains("reg_number"));
    }

    #[test]
    fn test_import_rejects_unknown_kind() {
        let data = "kind,reg_number,name,patent_starting_date\n9,1,X,2020-01-01\n";
        let err = read_patents(data.as_bytes()).unwrap_err();
        assert_eq!(err.line, Some(2));
        assert!(err.message.contains("kind"));
    }

    #[test]
    fn test_import_missing_column() {
        let data = "kind,reg_number,name\n1,1,X\n";
        let err = read_patents(data.as_bytes()).unwrap_err();
        assert!(err.message.contains("patent_starting_date"));
    }

    #[test]
    fn test_import_line_after_multiline_field() {
        let data = "kind,reg_number,name,patent_starting_date,address\n\
                    1,1,Первый,2020-01-01,\"г. Москва,\nул. Тверская\"\n\
                    1,abc,Второй,2020-01-01,\n";
        let err = read_patents(data.as_bytes()).unwrap_err();
        assert_eq!(err.line, Some(4));
        assert!(err.message.contains("reg_number"));
    }

    #[test]
    fn test_import_line_after_blank_line() {
        let data = "kind,reg_number,name,patent_starting_date\n\
                    1,1,Первый,2020-01-01\n\
                    \n\
                    1,abc,Второй,2020-01-01\n";
        let err = read_patents(data.as_bytes()).unwrap_err();
        assert_eq!(err.line, Some(4));
    }

    #[test]
    fn test_import_line_of_short_row() {
        let data = "kind,reg_number,name,patent_starting_date\n\
                    1,1,Первый,2020-01-01\n\
                    \r\n\
                    1,2\n";
        let err = read_patents(data.as_bytes()).unwrap_err();
        assert_eq!(err.line, Some(4));
        assert!(err.message.contains("expected 4 fields"));
    }

    #[test]
    fn test_import_empty_file() {
        let err = read_patents(b"kind,reg_number,name,patent_starting_date\n").unwrap_err();
        assert!(err.line.is_none());
    }
}
