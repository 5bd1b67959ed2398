use std::io::{BufRead, Write};
use crate::catalog::Products;
use crate::components::parse_token;
use crate::error::{CatalogError, CatalogResult};
use crate::item::{Component, Item};

/// Build a fresh catalog from `ID, name, cost` and
/// `ID, name, derivedCost, ID1:q1,ID2:q2,...` records.
///
/// Lines with fewer than three fields are skipped. A numeric field that does
/// not parse aborts the whole decode, so callers never see a partial catalog.
pub fn decode<R: BufRead>(reader: R) -> CatalogResult<Products> {
    let mut products = Products::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;

        let item = decode_line(&line).map_err(|reason| CatalogError::MalformedRecord {
            line: line_no,
            reason,
        })?;

        match item {
            Some(item) => {
                if let Some(previous) = products.add(item) {
                    tracing::debug!("Line {} overwrites item {}", line_no, previous.id());
                }
            }
            None => tracing::debug!("Skipping line {}: fewer than three fields", line_no),
        }
    }

    Ok(products)
}

/// Decode a single record. `Ok(None)` means the line is not a record.
///
/// Any fourth field makes the record a compound, since an empty compound is
/// saved as `K1, Kit, 0, `. A part written with a trailing comma
/// (`P1, Spoke, 3,`) therefore loads as an empty compound.
pub fn decode_line(line: &str) -> Result<Option<Item>, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 3 {
        return Ok(None);
    }

    let id = fields[0];
    let name = fields[1];

    let item = if fields[2].contains(':') {
        // Hand-written form: components start at the third field
        Item::compound(id, name, parse_tokens(&fields[2..])?)
    } else if fields.len() > 3 {
        // Saved form: third field is the derived cost, checked but not kept
        parse_cost(id, fields[2])?;
        Item::compound(id, name, parse_tokens(&fields[3..])?)
    } else {
        Item::part(id, name, parse_cost(id, fields[2])?)
    };

    Ok(Some(item))
}

fn parse_cost(id: &str, field: &str) -> Result<i64, String> {
    field
        .parse::<i64>()
        .map_err(|_| format!("cost '{}' of {} is not an integer", field, id))
}

fn parse_tokens(tokens: &[&str]) -> Result<Vec<Component>, String> {
    if tokens.iter().all(|t| t.is_empty()) {
        return Ok(Vec::new());
    }
    tokens.iter().map(|t| parse_token(t)).collect()
}

/// Write one record per item, in key order.
pub fn encode<W: Write>(products: &Products, mut writer: W) -> CatalogResult<()> {
    for item in products.iter() {
        writeln!(writer, "{}", item.record_line(products)?)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn encode_to_string(products: &Products) -> CatalogResult<String> {
    let mut buffer = Vec::new();
    encode(products, &mut buffer)?;
    // Records are built from `String`s, so the buffer is valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
