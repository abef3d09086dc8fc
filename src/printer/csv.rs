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

//! Comma separated traces and directory listings.
use std::io::Write;

use crate::decoder::Directory;
use crate::store::DirectoryStore;
use crate::trace::TracePoint;
use crate::trace::TraceData;

type E = Box<dyn std::error::Error>;

/// Format one trace position as `a,t,g,c`.
pub fn format_trace_line<W: Write>(
    point: &TracePoint,
    conn: &mut W,
) -> Result<(), E> {
    writeln!(conn, "{},{},{},{}", point.a, point.t, point.g, point.c)?;
    Ok(())
}

/// Format a whole trace with an `A,T,G,C` header line.
pub fn format_trace_csv<W: Write>(
    trace: &TraceData,
    conn: &mut W,
) -> Result<(), E> {
    conn.write_all(b"A,T,G,C\n")?;
    for point in trace.iter() {
        format_trace_line(&point, conn)?;
    }
    conn.flush()?;
    Ok(())
}

/// Format the directory entry of `record`.
pub fn format_metadata_line<W: Write>(
    record: &Directory,
    conn: &mut W,
) -> Result<(), E> {
    let entry = record.entry();
    writeln!(conn, "{},{},{},{},{},{},{}",
             entry.name, entry.number, entry.element_type,
             entry.element_size, entry.element_count,
             entry.data_size, entry.data_offset)?;
    Ok(())
}

/// Format every directory entry in `store`, in store order.
pub fn format_metadata_csv<W: Write>(
    store: &DirectoryStore,
    conn: &mut W,
) -> Result<(), E> {
    conn.write_all(b"name,number,type,element_size,element_count,data_size,data_offset\n")?;
    for record in store.iter() {
        format_metadata_line(record, conn)?;
    }
    conn.flush()?;
    Ok(())
}
