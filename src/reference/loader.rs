//! CSV parsing of the three reference tables.
//!
//! Height and weight tables have a `male` and an `age` column followed by one
//! column per entry of [`QUANTILE_GRID`]. The parameter table has the columns
//! `male, age, q, c0, c1, c2, c3` with one line per (cohort, quantile).

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::cohort::{CohortKey, TableId};
use super::rows::{ParameterRow, ParameterTuple, ReferenceRow, QUANTILE_GRID};
use crate::error::{AnthroError, Result};

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Parses a `male` column value: `0`, `1`, `true`, `false` (any case).
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }
}

/// Parses an age column value. Integral floats such as `12.0` are accepted.
fn parse_age(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(age) = raw.parse::<u32>() {
        return Some(age);
    }
    let age = raw.parse::<f64>().ok()?;
    (age.is_finite() && age >= 0.0 && age.fract() == 0.0 && age <= u32::MAX as f64)
        .then_some(age as u32)
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid male flag '{raw}'")))
}

fn deserialize_age<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_age(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid age '{raw}'")))
}

#[derive(Debug, Deserialize)]
struct ParameterRecord {
    #[serde(deserialize_with = "deserialize_flag")]
    male: bool,
    #[serde(deserialize_with = "deserialize_age")]
    age: u32,
    q: f64,
    c0: f64,
    c1: f64,
    c2: f64,
    c3: f64,
}

/// Reads a height or weight quantile table.
pub(crate) fn read_quantile_table<R: Read>(
    reader: R,
    table: TableId,
) -> Result<HashMap<CohortKey, ReferenceRow>> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| AnthroError::malformed(table, format!("missing '{name}' column")))
    };
    let male_idx = column("male")?;
    let age_idx = column("age")?;
    let value_idx: Vec<usize> = (0..headers.len())
        .filter(|&i| i != male_idx && i != age_idx)
        .collect();
    if value_idx.len() != QUANTILE_GRID.len() {
        return Err(AnthroError::malformed(
            table,
            format!(
                "expected {} quantile columns, found {}",
                QUANTILE_GRID.len(),
                value_idx.len()
            ),
        ));
    }

    let mut rows = HashMap::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = line + 2;
        let field = |i: usize| record.get(i).unwrap_or("");

        let is_male = parse_flag(field(male_idx)).ok_or_else(|| {
            AnthroError::malformed(table, format!("line {line}: invalid male flag '{}'", field(male_idx)))
        })?;
        let age = parse_age(field(age_idx)).ok_or_else(|| {
            AnthroError::malformed(table, format!("line {line}: invalid age '{}'", field(age_idx)))
        })?;

        let mut values = Vec::with_capacity(QUANTILE_GRID.len());
        for &i in &value_idx {
            let value: f64 = field(i).parse().map_err(|_| {
                AnthroError::malformed(table, format!("line {line}: invalid value '{}'", field(i)))
            })?;
            if !value.is_finite() || value <= 0.0 {
                return Err(AnthroError::malformed(
                    table,
                    format!("line {line}: value {value} must be finite and positive"),
                ));
            }
            values.push(value);
        }
        if let Some(w) = values.windows(2).find(|w| w[0] >= w[1]) {
            return Err(AnthroError::malformed(
                table,
                format!("line {line}: values not strictly increasing ({} >= {})", w[0], w[1]),
            ));
        }

        let key = CohortKey { is_male, age };
        if rows.insert(key, ReferenceRow::new(values)).is_some() {
            return Err(AnthroError::malformed(
                table,
                format!("line {line}: duplicate cohort {}/{age}", key.sex()),
            ));
        }
    }

    Ok(rows)
}

/// Reads the height-adjusted-weight coefficient table.
pub(crate) fn read_parameter_table<R: Read>(
    reader: R,
) -> Result<HashMap<CohortKey, ParameterRow>> {
    let table = TableId::HawParams;
    let mut rdr = csv_reader(reader);

    let mut grouped: HashMap<CohortKey, Vec<ParameterTuple>> = HashMap::new();
    for (line, record) in rdr.deserialize::<ParameterRecord>().enumerate() {
        let rec = record?;
        let line = line + 2;
        if !(rec.q > 0.0 && rec.q < 1.0) {
            return Err(AnthroError::malformed(
                table,
                format!("line {line}: quantile {} outside (0, 1)", rec.q),
            ));
        }
        let coefficients = [rec.c0, rec.c1, rec.c2, rec.c3];
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(AnthroError::malformed(
                table,
                format!("line {line}: non-finite coefficient"),
            ));
        }
        grouped
            .entry(CohortKey { is_male: rec.male, age: rec.age })
            .or_default()
            .push(ParameterTuple {
                q: rec.q,
                c0: rec.c0,
                c1: rec.c1,
                c2: rec.c2,
                c3: rec.c3,
            });
    }

    grouped
        .into_iter()
        .map(|(key, tuples)| {
            if tuples.len() < 2 {
                return Err(AnthroError::malformed(
                    table,
                    format!(
                        "cohort {}/{} has {} quantile row(s), at least 2 required",
                        key.sex(),
                        key.age,
                        tuples.len()
                    ),
                ));
            }
            Ok((key, ParameterRow::new(tuples)))
        })
        .collect()
}
