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

//! Fixed-layout headers of an ABIF container.
//!
//! An ABIF file starts with a 34 byte [FileHeader](file::FileHeader):
//!
//! - Bytes 0-3: the ASCII magic `ABIF`.
//! - Bytes 4-5: file format version (int16).
//! - Bytes 6-33: the root [DirectoryEntry](entry::DirectoryEntry).
//!
//! The root entry describes the tag table: its `element_count` is the number
//! of tags and its `data_offset` is the absolute byte offset of the table.
//! The table itself is `element_count` consecutive 28 byte
//! [DirectoryEntry](entry::DirectoryEntry) records.
//!
//! Every multi-byte field in both headers is stored big-endian. Both structs
//! are (de)serialized with bincode using a big-endian fixed-int configuration
//! so that the derived layouts match the wire format byte for byte.
//!
//! ## Directory entry
//!
//! | Bytes | Field |
//! |---|---|
//! | 0-3 | tag name (4 ASCII characters) |
//! | 4-7 | tag number (int32) |
//! | 8-9 | element type code (int16) |
//! | 10-11 | element size (int16, -1 for variable size) |
//! | 12-15 | number of elements (int32) |
//! | 16-19 | total data size (int32) |
//! | 20-23 | data offset, or the data itself if data size is at most 4 (int32) |
//! | 24-27 | data handle, reserved (int32) |
//!

pub mod entry;
pub mod file;

/// bincode configuration matching the ABIF wire layout.
pub(crate) fn abif_config() -> impl bincode::config::Config {
    bincode::config::standard()
        .with_big_endian()
        .with_fixed_int_encoding()
}
