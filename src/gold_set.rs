//! Gold-set loading for regression testing (ambient test tooling).
//!
//! A gold set is a list of labeled query/candidate ID pairs. It doesn't
//! drive the engine itself; it's a fixture format integration tests load to
//! check the scorer's verdicts against a human-curated answer key of
//! match/non-match pairs, loaded from CSV or JSON.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One labeled pair: did a human reviewer consider `query_id` and
/// `candidate_id` the same entity?
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldSetRecord {
    pub query_id: String,
    pub candidate_id: String,
    pub is_match: bool,
}

pub fn load_gold_set_from_csv(path: impl AsRef<Path>) -> io::Result<Vec<GoldSetRecord>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() < 3 {
            continue;
        }
        let label: u8 = record[2].parse().unwrap_or(0);
        records.push(GoldSetRecord {
            query_id: record[0].to_string(),
            candidate_id: record[1].to_string(),
            is_match: label == 1,
        });
    }
    Ok(records)
}

pub fn load_gold_set_from_json(path: impl AsRef<Path>) -> io::Result<Vec<GoldSetRecord>> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let json: Value = serde_json::from_str(&contents)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let mut records = Vec::new();

    if let Value::Array(items) = json {
        for item in items {
            if let (Some(query_id), Some(candidate_id), Some(label)) = (
                item.get("query_id").and_then(Value::as_str),
                item.get("candidate_id").and_then(Value::as_str),
                item.get("label").and_then(Value::as_u64),
            ) {
                records.push(GoldSetRecord {
                    query_id: query_id.to_string(),
                    candidate_id: candidate_id.to_string(),
                    is_match: label == 1,
                });
            }
        }
    }
    Ok(records)
}

/// Dispatches on file extension (`.csv` or `.json`).
pub fn load_gold_set(path: impl AsRef<Path>) -> io::Result<Vec<GoldSetRecord>> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => load_gold_set_from_csv(path),
        Some("json") => load_gold_set_from_json(path),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "unsupported gold set file format, expected .csv or .json",
        )),
    }
}
