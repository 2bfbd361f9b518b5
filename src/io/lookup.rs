//! Lookup-table ingest: catalog, validation, backlog and HFR CSVs.
//!
//! - The catalog is read by header name (`Part Number`, `Custom_Real_01`, ...).
//! - Validation and quantity sheets are read by column position.
//! - Unreadable rows are skipped with a warning; missing required columns fail.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::warn;

use crate::domain::constants::{CR1, MSL, PN, QPO, QRT};
use crate::domain::{PartCatalogRow, QuantityMap, TranslationMap, ValidationMap, parse_quantity};
use crate::error::AppError;

/// Catalog rows plus the translation factors carried in the same export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub parts: Vec<PartCatalogRow>,
    pub translation: TranslationMap,
}

pub fn load_catalog(path: &Path) -> Result<Catalog, AppError> {
    read_catalog(open(path)?)
}

pub fn load_validation(path: &Path) -> Result<ValidationMap, AppError> {
    read_validation(open(path)?)
}

pub fn load_quantity_sheet(path: &Path) -> Result<QuantityMap, AppError> {
    read_quantity_sheet(open(path)?)
}

fn open(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Read the catalog export.
///
/// Blank numeric fields are zero. A blank or non-numeric `Custom_Real_01`
/// leaves the part without a translation factor.
pub fn read_catalog<R: Read>(reader: R) -> Result<Catalog, AppError> {
    let mut reader = csv_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read catalog headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for required in [PN, CR1, QRT, QPO, MSL] {
        if !header_map.contains_key(&normalize_header_name(required)) {
            return Err(AppError::new(2, format!("Catalog is missing required column: `{required}`")));
        }
    }

    let mut catalog = Catalog::default();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(line, "skipping catalog row: {e}");
                continue;
            }
        };

        let Some(part_number) = get_field(&record, &header_map, PN) else {
            warn!(line, "skipping catalog row without a part number");
            continue;
        };

        let number = |name: &str| get_field(&record, &header_map, name).and_then(parse_quantity);

        if let Some(factor) = number(CR1) {
            catalog.translation.insert(part_number.to_string(), factor);
        }

        catalog.parts.push(PartCatalogRow {
            part_number: part_number.to_string(),
            on_hand: number(QRT).unwrap_or(0.0),
            on_order: number(QPO).unwrap_or(0.0),
            reorder: number(MSL).unwrap_or(0.0),
        });
    }

    Ok(catalog)
}

/// Read the validation sheet: column 0 external key, column 1 internal key.
///
/// An empty external key is allowed so blank vendor labels can be mapped
/// (usually to `IGNORE_ME`).
pub fn read_validation<R: Read>(reader: R) -> Result<ValidationMap, AppError> {
    let mut map = ValidationMap::new();
    for (line, record) in records(reader, "validation")? {
        let external = record.get(0).unwrap_or("");
        match record.get(1).filter(|s| !s.is_empty()) {
            Some(internal) => {
                map.insert(external.to_string(), internal.to_string());
            }
            None => warn!(line, key = external, "skipping validation row without a target"),
        }
    }
    Ok(map)
}

/// Read a backlog/HFR sheet: part, quantity, factor.
///
/// `quantity * factor` is summed per part. A row whose quantity or factor is
/// blank or non-numeric adds 0, but its part is still listed.
pub fn read_quantity_sheet<R: Read>(reader: R) -> Result<QuantityMap, AppError> {
    let mut map = QuantityMap::new();
    for (line, record) in records(reader, "quantity")? {
        let part = record.get(0).unwrap_or("");
        if part.is_empty() {
            warn!(line, "skipping quantity row without a part number");
            continue;
        }
        let qty = record.get(1).and_then(parse_quantity);
        let factor = record.get(2).and_then(parse_quantity);
        let value = match (qty, factor) {
            (Some(qty), Some(factor)) => qty * factor,
            _ => 0.0,
        };
        *map.entry(part.to_string()).or_insert(0.0) += value;
    }
    Ok(map)
}

/// Data records with their 1-based CSV line; unparsable records are skipped.
fn records<R: Read>(reader: R, what: &str) -> Result<Vec<(usize, StringRecord)>, AppError> {
    let mut reader = csv_reader(reader);
    reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read {what} headers: {e}")))?;

    let mut out = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        match result {
            Ok(r) => out.push((line, r)),
            Err(e) => warn!(line, "skipping {what} row: {e}"),
        }
    }
    Ok(out)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_field<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(&normalize_header_name(name))?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}
