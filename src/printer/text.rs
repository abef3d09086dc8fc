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

//! Human-readable listing of records.
use std::io::Write;

use crate::decoder::Directory;
use crate::store::DirectoryStore;

type E = Box<dyn std::error::Error>;

/// Format `record` as tab separated name, number, type and elements.
///
/// Elements are separated by spaces.
pub fn format_record_line<W: Write>(
    record: &Directory,
    conn: &mut W,
) -> Result<(), E> {
    let elements = record.elements().iter().map(|x| x.to_string()).collect::<Vec<String>>().join(" ");
    writeln!(conn, "{}\t{}\t{}\t{}", record.name(), record.number(), record.element_type(), elements)?;
    Ok(())
}

/// Format the records of `store` whose name is in `tags`, or all records if
/// `tags` is empty.
pub fn format_records<W: Write>(
    store: &DirectoryStore,
    tags: &[String],
    conn: &mut W,
) -> Result<(), E> {
    for record in store.iter() {
        if tags.is_empty() || tags.iter().any(|tag| tag == record.name()) {
            format_record_line(record, conn)?;
        }
    }
    conn.flush()?;
    Ok(())
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn format_records() {
        use super::format_records;
        use crate::decode_from_slice;
        use crate::encoder::Encoder;

        let mut encoder = Encoder::new(101);
        encoder.add_pstring("CTNM", 1, "Sample1");
        encoder.add_shorts("DATA", 1, &[10, 20, 15]);
        encoder.add_bytes("RAWB", 1, &[1]);
        let file = decode_from_slice(&encoder.encode().unwrap()).unwrap();

        let mut expected: Vec<u8> = b"CTNM\t1\tPString\tSample1\n".to_vec();
        expected.append(&mut b"DATA\t1\tShort\t10 20 15\n".to_vec());
        expected.append(&mut b"RAWB\t1\tByte\t1\n".to_vec());

        let mut got: Vec<u8> = Vec::new();
        format_records(&file.store, &[], &mut got).unwrap();

        assert_eq!(got, expected);
    }

    #[test]
    fn format_records_by_tag() {
        use super::format_records;
        use crate::decode_from_slice;
        use crate::encoder::Encoder;

        let mut encoder = Encoder::new(101);
        encoder.add_pstring("CTNM", 1, "Sample1");
        encoder.add_shorts("DATA", 1, &[10, 20, 15]);
        encoder.add_shorts("DATA", 2, &[1, 2]);
        let file = decode_from_slice(&encoder.encode().unwrap()).unwrap();

        let mut got: Vec<u8> = Vec::new();
        format_records(&file.store, &["DATA".to_string()], &mut got).unwrap();

        assert_eq!(got, b"DATA\t1\tShort\t10 20 15\nDATA\t2\tShort\t1 2\n".to_vec());
    }
}
