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
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use abif::printer::ExportKind;
use abif::wrapper::Ab1Wrapper;

mod cli;

type E = Box<dyn std::error::Error>;

/// Initializes the logger with verbosity given in `log_max_level`.
fn init_log(log_max_level: usize) {
    stderrlog::new()
    .module(module_path!())
    .quiet(false)
    .verbosity(log_max_level)
    .timestamp(stderrlog::Timestamp::Off)
    .init()
    .unwrap();
}

/// File name of `file` without any extensions.
fn base_name(
    file: &Path,
) -> String {
    let mut file_name: PathBuf = PathBuf::from(file.file_name().unwrap_or(file.as_os_str()));
    while let Some(stripped) = file_name.file_stem() {
        let is_same = file_name == stripped;
        file_name = PathBuf::from(stripped);
        if is_same {
            break;
        }
    };
    file_name.to_string_lossy().to_string()
}

fn show(
    file: &Path,
    tags: &[String],
) -> Result<(), E> {
    let decoded = abif::open(file)?;
    let mut conn_out = BufWriter::new(std::io::stdout().lock());
    abif::printer::text::format_records(&decoded.store, tags, &mut conn_out)?;
    Ok(())
}

fn export(
    file: &Path,
    kind: ExportKind,
    out_dir: Option<&PathBuf>,
    reanalyze: bool,
) -> Result<(), E> {
    let mut wrapper = Ab1Wrapper::open(file)?;
    if reanalyze {
        wrapper.run_peak_analysis(0, None, true)?;
    }

    let dir = match out_dir {
        Some(dir) => dir.clone(),
        None => file.parent().map(|x| x.to_path_buf()).unwrap_or_default(),
    };
    let out_path = dir.join(format!("{}.{}", base_name(file), kind.extension()));

    // Format into memory first so a failed export leaves no file behind.
    let mut out: Vec<u8> = Vec::new();
    abif::printer::export_to_write(&wrapper, kind, &mut out)?;

    let mut conn_out = BufWriter::new(File::create(&out_path)?);
    conn_out.write_all(&out)?;
    conn_out.flush()?;
    info!("Wrote {}", out_path.display());

    Ok(())
}

fn analyze(
    file: &Path,
    start: usize,
    end: Option<usize>,
) -> Result<(), E> {
    let mut wrapper = Ab1Wrapper::open(file)?;
    let name = match wrapper.container_name() {
        Ok(name) => name.to_string(),
        Err(_) => base_name(file),
    };

    let analysis = wrapper.run_peak_analysis(start, end, false)?;

    let mut conn_out = BufWriter::new(std::io::stdout().lock());
    abif::printer::fasta::format_fasta(&format!("{}_ReAnalyzed", name), analysis.sequence(), &mut conn_out)?;
    conn_out.flush()?;
    Ok(())
}

/// Run `f` on every file, logging failures. Returns the number of failures.
fn for_each_file<F: FnMut(&Path) -> Result<(), E>>(
    input_files: &[PathBuf],
    mut f: F,
) -> usize {
    let mut n_failed = 0;
    input_files.iter().for_each(|file| {
        if let Err(e) = f(file.as_path()) {
            error!("{}: {}", file.display(), e);
            n_failed += 1;
        }
    });
    n_failed
}

fn main() {
    let cli = cli::Cli::parse();

    // Subcommands:
    let n_failed = match &cli.command {
        // Show
        Some(cli::Commands::Show {
            input_files,
            tags,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });
            for_each_file(input_files, |file| show(file, tags))
        },

        // Export
        Some(cli::Commands::Export {
            input_files,
            kind,
            out_dir,
            reanalyze,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });
            let kind: ExportKind = match kind.parse() {
                Ok(kind) => kind,
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(2);
                },
            };
            for_each_file(input_files, |file| export(file, kind, out_dir.as_ref(), *reanalyze))
        },

        // Analyze
        Some(cli::Commands::Analyze {
            input_files,
            start,
            end,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });
            for_each_file(input_files, |file| analyze(file, *start, *end))
        },

        None => 0,
    };

    if n_failed > 0 {
        std::process::exit(1);
    }
}
