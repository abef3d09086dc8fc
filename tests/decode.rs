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

// End-to-end decoding of synthetic ABIF files.

fn trace_file(channels: [&[i16]; 4], first_number: i32) -> abif::encoder::Encoder {
    use abif::encoder::Encoder;

    let mut encoder = Encoder::new(101);
    for (idx, values) in channels.iter().enumerate() {
        encoder.add_shorts("DATA", first_number + idx as i32, values);
    }
    encoder
}

#[test]
fn container_name_from_pascal_string() {
    use abif::decode_from_slice;
    use abif::encoder::Encoder;
    use abif::wrapper::Ab1Wrapper;

    let mut encoder = Encoder::new(101);
    encoder.add_pstring("CTNM", 1, "Sample1");
    let bytes = encoder.encode().unwrap();

    let file = decode_from_slice(&bytes).unwrap();
    assert_eq!(file.version(), 101);
    assert_eq!(file.store.len(), 1);

    let wrapper = Ab1Wrapper::new(file);
    assert_eq!(wrapper.container_name().unwrap(), "Sample1");
}

#[test]
fn raw_trace_is_remapped_from_agct() {
    use abif::decode_from_slice;
    use abif::trace::TracePoint;
    use abif::wrapper::Ab1Wrapper;

    // On disk DATA #1-#4 are A, G, C, T.
    let a: &[i16] = &[1, 10, 2];
    let g: &[i16] = &[3, 20, 4];
    let c: &[i16] = &[5, 15, 6];
    let t: &[i16] = &[7, 5, 8];
    let encoder = trace_file([a, g, c, t], 1);

    let wrapper = Ab1Wrapper::new(decode_from_slice(&encoder.encode().unwrap()).unwrap());
    let got = wrapper.raw_trace().unwrap();

    assert_eq!(got.a()[1], 10);
    assert_eq!(got.get(1), Some(TracePoint { a: 10, t: 5, g: 20, c: 15 }));
    assert_eq!(got.t(), t);
    assert_eq!(got.g(), g);
    assert_eq!(got.c(), c);
}

#[test]
fn same_values_in_every_channel() {
    use abif::decode_from_slice;
    use abif::trace::TracePoint;
    use abif::wrapper::Ab1Wrapper;

    let values: &[i16] = &[10, 20, 15, 5];
    let encoder = trace_file([values, values, values, values], 1);

    let wrapper = Ab1Wrapper::new(decode_from_slice(&encoder.encode().unwrap()).unwrap());
    let got = wrapper.raw_trace().unwrap();

    assert_eq!(got.len(), 4);
    assert_eq!(got.a()[1], 20);
    assert_eq!(got.get(3), Some(TracePoint { a: 5, t: 5, g: 5, c: 5 }));
}

#[test]
fn peak_analysis_of_single_channel() {
    use abif::decode_from_slice;
    use abif::sequence::base::DnaBase;
    use abif::wrapper::Ab1Wrapper;

    let zeros: &[i16] = &[0, 0, 0];
    let encoder = trace_file([&[0, 5, 3], zeros, zeros, zeros], 9);

    let mut wrapper = Ab1Wrapper::new(decode_from_slice(&encoder.encode().unwrap()).unwrap());
    let got = wrapper.run_peak_analysis(0, None, false).unwrap();

    assert_eq!(got.peaks(), &[1]);
    assert_eq!(got.sequence().len(), 1);
    assert_eq!(got.sequence()[0], DnaBase::A);
}

#[test]
fn peak_analysis_range_checks() {
    use abif::decode_from_slice;
    use abif::sequence::analysis::ArgumentRangeError;
    use abif::wrapper::{AlreadyAnalyzedError, Ab1Wrapper};

    let values: &[i16] = &[0, 5, 3, 8, 1];
    let encoder = trace_file([values, values, values, values], 9);
    let mut wrapper = Ab1Wrapper::new(decode_from_slice(&encoder.encode().unwrap()).unwrap());

    let got = wrapper.run_peak_analysis(3, Some(2), false).unwrap_err();
    assert!(got.downcast_ref::<ArgumentRangeError>().is_some());
    let got = wrapper.run_peak_analysis(0, Some(5), false).unwrap_err();
    assert!(got.downcast_ref::<ArgumentRangeError>().is_some());

    let full = wrapper.run_peak_analysis(0, None, false).unwrap().clone();
    assert_eq!(full.peaks(), &[1, 3]);
    assert_eq!(full.sequence().as_str(), "NN");

    let got = wrapper.run_peak_analysis(0, None, false).unwrap_err();
    assert!(got.downcast_ref::<AlreadyAnalyzedError>().is_some());

    let again = wrapper.run_peak_analysis(0, Some(4), true).unwrap();
    assert_eq!(again, &full);
}

#[test]
fn unknown_type_is_kept_as_raw_bytes() {
    use abif::decode_from_slice;
    use abif::encoder::Encoder;
    use abif::headers::entry::ElementTypeCode;
    use abif::parser::ElementValue;

    let mut encoder = Encoder::new(101);
    encoder.add("ODDT", 1, ElementTypeCode::from_code(9999), 1, 6, &[9, 8, 7, 6, 5, 4]);
    encoder.add("ODDS", 1, ElementTypeCode::from_code(77), 1, 2, &[1, 2]);

    let file = decode_from_slice(&encoder.encode().unwrap()).unwrap();

    let got = file.store.get("ODDT", 1).unwrap();
    assert_eq!(got.element_type().code(), 9999);
    assert_eq!(got.elements(), &[ElementValue::Raw(vec![9, 8, 7, 6, 5, 4])]);
    assert!(!got.is_array());

    let got = file.store.get("ODDS", 1).unwrap();
    assert_eq!(got.element_type(), ElementTypeCode::Unknown(77));
    assert_eq!(got.elements(), &[ElementValue::Raw(vec![1, 2])]);
}

#[test]
fn inline_and_offset_payloads() {
    use abif::decode_from_slice;
    use abif::encoder::Encoder;
    use abif::parser::ElementValue;

    let mut encoder = Encoder::new(101);
    encoder.add_bytes("FOUR", 1, &[1, 2, 3, 4]);
    encoder.add_bytes("FIVE", 1, &[1, 2, 3, 4, 5]);
    let bytes = encoder.encode().unwrap();

    // Only the 5 byte payload is stored after the header.
    assert_eq!(bytes.len(), 34 + 5 + 2 * 28);

    let file = decode_from_slice(&bytes).unwrap();
    let four = file.store.get("FOUR", 1).unwrap();
    let five = file.store.get("FIVE", 1).unwrap();

    assert!(four.entry().is_inline());
    assert!(!five.entry().is_inline());
    assert_eq!(five.entry().data_offset, 34);
    assert_eq!(four.elements(), &[ElementValue::Byte(1), ElementValue::Byte(2), ElementValue::Byte(3), ElementValue::Byte(4)]);
    assert_eq!(five.elements().len(), 5);
    assert_eq!(five.elements()[4], ElementValue::Byte(5));
}

#[test]
fn records_are_listed_by_name() {
    use abif::decode_from_slice;
    use abif::encoder::Encoder;

    let mut encoder = Encoder::new(101);
    encoder.add_pstring("SMPL", 1, "s");
    encoder.add_shorts("DATA", 2, &[1]);
    encoder.add_pstring("CTNM", 1, "c");
    encoder.add_shorts("DATA", 1, &[1]);

    let file = decode_from_slice(&encoder.encode().unwrap()).unwrap();
    let got: Vec<String> = file.store.all().iter().map(|x| format!("{}{}", x.name(), x.number())).collect();

    assert_eq!(got, vec!["CTNM1", "DATA2", "DATA1", "SMPL1"]);
}

#[test]
fn open_plain_and_gzipped_files() {
    use abif::encoder::Encoder;
    use abif::open;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let mut encoder = Encoder::new(101);
    encoder.add_pstring("CTNM", 1, "Sample1");
    encoder.add_shorts("DATA", 1, &[10, 20, 15, 5]);
    let bytes = encoder.encode().unwrap();

    let dir = std::env::temp_dir();
    let plain_path = dir.join(format!("abif-test-{}.ab1", std::process::id()));
    let gz_path = dir.join(format!("abif-test-{}.ab1.gz", std::process::id()));

    std::fs::write(&plain_path, &bytes).unwrap();
    let mut gz = GzEncoder::new(Vec::new(), Compression::default());
    gz.write_all(&bytes).unwrap();
    std::fs::write(&gz_path, gz.finish().unwrap()).unwrap();

    let plain = open(&plain_path).unwrap();
    let gzipped = open(&gz_path).unwrap();

    std::fs::remove_file(&plain_path).unwrap();
    std::fs::remove_file(&gz_path).unwrap();

    assert_eq!(plain.store.len(), 2);
    assert_eq!(gzipped.store.len(), 2);
    assert_eq!(plain.store.get("DATA", 1), gzipped.store.get("DATA", 1));
}

#[test]
fn open_missing_file_is_io_error() {
    use abif::open;

    let got = open("/nonexistent/abif/trace.ab1").unwrap_err();

    assert!(got.downcast_ref::<std::io::Error>().is_some());
}
