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
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // Print the decoded records of .ab1 files
    Show {
        // Input file(s)
        #[arg(group = "input", required = true, help = "Input file(s)")]
        input_files: Vec<PathBuf>,

        // Only print these tags
        #[arg(long = "tag", required = false, help = "Only print records with this tag name")]
        tags: Vec<String>,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Write traces, metadata or sequences of .ab1 files
    Export {
        // Input file(s)
        #[arg(group = "input", required = true, help = "Input file(s)")]
        input_files: Vec<PathBuf>,

        // What to write, defaults to fasta
        #[arg(long = "kind", default_value = "fasta", help = "raw, analyzed, meta, json or fasta")]
        kind: String,

        // Output directory, defaults to the directory of each input
        #[arg(short = 'o', long = "output", required = false)]
        out_dir: Option<PathBuf>,

        // Call peaks before writing fasta
        #[arg(long = "reanalyze", default_value_t = false)]
        reanalyze: bool,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Re-call bases from the processed trace
    Analyze {
        // Input file(s)
        #[arg(group = "input", required = true, help = "Input file(s)")]
        input_files: Vec<PathBuf>,

        // First trace position to analyze
        #[arg(long = "start", default_value_t = 0)]
        start: usize,

        // Last trace position to analyze, defaults to the end of the trace
        #[arg(long = "end", required = false)]
        end: Option<usize>,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },
}
