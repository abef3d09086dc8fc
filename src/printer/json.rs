// abif: Decoding ABIF sequencer trace files and re-calling bases.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! JSON dump of every record.
use std::io::Write;

use crate::decoder::Directory;
use crate::parser::ElementValue;
use crate::store::DirectoryStore;

use serde::Serialize;

type E = Box<dyn std::error::Error>;

#[derive(Serialize)]
struct JsonRecord<'a> {
    name: &'a str,
    number: i32,
    #[serde(rename = "type")]
    element_type: String,
    elements: &'a [ElementValue],
}

impl<'a> From<&'a Directory> for JsonRecord<'a> {
    fn from(record: &'a Directory) -> Self {
        JsonRecord {
            name: record.name(),
            number: record.number(),
            element_type: record.element_type().to_string(),
            elements: record.elements(),
        }
    }
}

/// Format the records of `store` as a pretty-printed JSON array.
///
/// Each record is an object with the fields `name`, `number`, `type` and
/// `elements`. Raw payloads are arrays of byte values.
///
pub fn format_elements_json<W: Write>(
    store: &DirectoryStore,
    conn: &mut W,
) -> Result<(), E> {
    let records: Vec<JsonRecord> = store.iter().map(JsonRecord::from).collect();
    serde_json::to_writer_pretty(conn.by_ref(), &records)?;
    conn.write_all(b"\n")?;
    conn.flush()?;
    Ok(())
}
