//! File-based comment and policy parsers.
//!
//! CSV and JSON comment files must carry at least a `text` column/field;
//! everything else gets a sensible default. Timestamps that fail to parse
//! fall back to ingestion-time "now" rather than rejecting the record.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use uuid::Uuid;

use edict_core::{Comment, EdictError, PolicyClause, PolicyDocument};

#[derive(Debug, Deserialize)]
struct CsvRecord {
    text: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    policy_clause: Option<String>,
    #[serde(default)]
    metadata: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonRecord {
    #[serde(default)]
    id: Option<String>,
    text: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    policy_clause: Option<String>,
    #[serde(default)]
    metadata: Option<HashMap<String, serde_json::Value>>,
}

/// Parse comments from a CSV file.
///
/// Expected columns: `text` (required), `source`, `timestamp`,
/// `policy_clause`, and `metadata` (a JSON object as a string). Each row
/// gets a fresh uuid.
///
/// # Errors
///
/// Returns [`EdictError::Ingest`] if the file cannot be read or a row is
/// malformed CSV.
///
/// # Examples
///
/// ```no_run
/// use edict_ingest::parser::parse_csv_comments;
/// use std::path::Path;
///
/// let comments = parse_csv_comments(Path::new("comments.csv")).unwrap();
/// ```
pub fn parse_csv_comments(path: &Path) -> Result<Vec<Comment>, EdictError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| EdictError::Ingest(format!("failed to open {}: {e}", path.display())))?;

    let mut comments = Vec::new();
    for record in reader.deserialize::<CsvRecord>() {
        let record = record
            .map_err(|e| EdictError::Ingest(format!("bad row in {}: {e}", path.display())))?;

        let metadata = record
            .metadata
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .and_then(|m| serde_json::from_str(m).ok());

        comments.push(Comment {
            id: Uuid::new_v4().to_string(),
            text: record.text,
            source: record.source.unwrap_or_else(|| "unknown".into()),
            timestamp: resolve_timestamp(record.timestamp.as_deref()),
            policy_clause: record.policy_clause.unwrap_or_else(|| "unknown".into()),
            metadata,
        });
    }

    Ok(comments)
}

/// Parse comments from a JSON file holding an array of objects.
///
/// Records keep their `id` when present; otherwise a fresh uuid is
/// generated.
///
/// # Errors
///
/// Returns [`EdictError::Ingest`] if the file cannot be read or is not a
/// JSON array of comment objects.
pub fn parse_json_comments(path: &Path) -> Result<Vec<Comment>, EdictError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| EdictError::Ingest(format!("failed to read {}: {e}", path.display())))?;
    let records: Vec<JsonRecord> = serde_json::from_str(&content)
        .map_err(|e| EdictError::Ingest(format!("bad JSON in {}: {e}", path.display())))?;

    let comments = records
        .into_iter()
        .map(|record| Comment {
            id: record.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            text: record.text,
            source: record.source.unwrap_or_else(|| "unknown".into()),
            timestamp: resolve_timestamp(record.timestamp.as_deref()),
            policy_clause: record.policy_clause.unwrap_or_else(|| "unknown".into()),
            metadata: record.metadata,
        })
        .collect();

    Ok(comments)
}

/// Parse a policy document from a plain text file.
///
/// Every non-empty line that does not start with `#` becomes a clause with
/// id `clause_{index:03}` and section label `Section {line_number}`.
///
/// # Errors
///
/// Returns [`EdictError::Ingest`] if the file cannot be read.
pub fn parse_policy_document(path: &Path) -> Result<PolicyDocument, EdictError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| EdictError::Ingest(format!("failed to read {}: {e}", path.display())))?;

    let clauses: Vec<PolicyClause> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|(i, line)| PolicyClause {
            id: format!("clause_{i:03}"),
            text: line.trim().to_string(),
            section: format!("Section {}", i + 1),
        })
        .collect();

    Ok(PolicyDocument {
        id: Uuid::new_v4().to_string(),
        title: "Policy Document".into(),
        content,
        clauses,
    })
}

/// Parse a timestamp string, falling back to "now" when unparsable.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, and bare `YYYY-MM-DD`.
fn resolve_timestamp(value: Option<&str>) -> DateTime<Utc> {
    value.and_then(parse_timestamp).unwrap_or_else(Utc::now)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str, extension: &str) -> tempfile::TempPath {
        let mut file = tempfile::Builder::new()
            .suffix(extension)
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.into_temp_path()
    }

    #[test]
    fn csv_parses_full_rows() {
        let csv = "text,source,timestamp,policy_clause,metadata\n\
            I support this,portal,2023-01-15T10:30:00Z,Section 7(a),\"{\"\"location\"\": \"\"Delhi\"\"}\"\n";
        let path = write_temp(csv, ".csv");
        let comments = parse_csv_comments(&path).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "I support this");
        assert_eq!(comments[0].source, "portal");
        assert_eq!(comments[0].policy_clause, "Section 7(a)");
        assert_eq!(comments[0].timestamp.to_rfc3339(), "2023-01-15T10:30:00+00:00");
        let metadata = comments[0].metadata.as_ref().unwrap();
        assert_eq!(metadata["location"], "Delhi");
    }

    #[test]
    fn csv_defaults_missing_optional_columns() {
        let csv = "text\nJust a comment\n";
        let path = write_temp(csv, ".csv");
        let comments = parse_csv_comments(&path).unwrap();
        assert_eq!(comments[0].source, "unknown");
        assert_eq!(comments[0].policy_clause, "unknown");
        assert!(comments[0].metadata.is_none());
    }

    #[test]
    fn unparsable_timestamp_falls_back_to_now() {
        let csv = "text,timestamp\nhello,not-a-date\n";
        let path = write_temp(csv, ".csv");
        let before = Utc::now();
        let comments = parse_csv_comments(&path).unwrap();
        assert!(comments[0].timestamp >= before);
    }

    #[test]
    fn json_keeps_provided_ids() {
        let json = r#"[
            {"id": "comment_001", "text": "hello", "policy_clause": "Section 1"},
            {"text": "second"}
        ]"#;
        let path = write_temp(json, ".json");
        let comments = parse_json_comments(&path).unwrap();
        assert_eq!(comments[0].id, "comment_001");
        assert_ne!(comments[1].id, "");
        assert_eq!(comments[1].policy_clause, "unknown");
    }

    #[test]
    fn json_rejects_non_array_input() {
        let path = write_temp(r#"{"text": "not an array"}"#, ".json");
        assert!(parse_json_comments(&path).is_err());
    }

    #[test]
    fn policy_parser_skips_blank_and_hash_lines() {
        let text = "# Digital Privacy Protection Act\n\
            \n\
            All providers must collect consent before processing data.\n\
            Data may be retained for at most 90 days.\n";
        let path = write_temp(text, ".txt");
        let policy = parse_policy_document(&path).unwrap();
        assert_eq!(policy.clauses.len(), 2);
        assert_eq!(policy.clauses[0].id, "clause_002");
        assert_eq!(policy.clauses[0].section, "Section 3");
        assert!(policy.clauses[0].text.starts_with("All providers"));
    }

    #[test]
    fn timestamp_formats() {
        assert!(parse_timestamp("2023-01-15T10:30:00Z").is_some());
        assert!(parse_timestamp("2023-01-15 10:30:00").is_some());
        assert!(parse_timestamp("2023-01-15").is_some());
        assert!(parse_timestamp("January 15th").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
