//! This crate simulates the BER-versus-SNR and FER-versus-SNR performance of a serially
//! concatenated single-parity-check code over a BPSK-AWGN channel. Simulation parameters are
//! specified on the command line, and simulation results are saved to a JSON file.
//!
//! Build the executable with `cargo build --release` and then run `./target/release/scpc -h` for
//! help on the command-line interface.

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

use anyhow::Result;
use clap::parser::ValueSource;
use clap::{crate_name, crate_version, value_parser, Arg, ArgMatches, Command};
use scpc::sim;
use std::time::Instant;

/// Main function
fn main() -> Result<()> {
    let timer = Instant::now();
    let matches = command_line_parser().get_matches();
    let json_filename = &json_filename_from_matches(&matches);
    sim::run_bpsk_awgn_sims(&all_sim_params(&matches), json_filename)?;
    eprintln!("Elapsed time: {:.3?}", timer.elapsed());
    Ok(())
}

/// Returns command line parser.
fn command_line_parser() -> Command {
    Command::new(crate_name!())
        .version(crate_version!())
        .about("Evaluates the performance of a serially concatenated SPC code over a BPSK-AWGN channel")
        .arg(num_outer_data_bits())
        .arg(num_inner_data_bits())
        .arg(num_rows())
        .arg(num_cols())
        .arg(num_iterations())
        .arg(first_snr_db())
        .arg(snr_step_db())
        .arg(num_snr())
        .arg(num_frame_errors_min())
        .arg(num_frames_per_run())
        .arg(num_runs_min())
        .arg(num_runs_max())
        .arg(json_filename())
}

/// Returns argument for number of data bits per outer code block.
fn num_outer_data_bits() -> Arg {
    Arg::new("num_outer_data_bits")
        .short('o')
        .value_parser(value_parser!(usize))
        .default_value("3")
        .help("Number of data bits per outer code block")
}

/// Returns argument for number of data bits per inner code block.
fn num_inner_data_bits() -> Arg {
    Arg::new("num_inner_data_bits")
        .short('i')
        .value_parser(value_parser!(usize))
        .default_value("4")
        .help("Number of data bits per inner code block")
}

/// Returns argument for number of block interleaver rows.
fn num_rows() -> Arg {
    Arg::new("num_rows")
        .short('r')
        .value_parser(value_parser!(usize))
        .default_value("3")
        .help("Number of block interleaver rows")
}

/// Returns argument for number of block interleaver columns.
fn num_cols() -> Arg {
    Arg::new("num_cols")
        .short('c')
        .value_parser(value_parser!(usize))
        .default_value("4")
        .help("Number of block interleaver columns")
}

/// Returns argument for number of decoding iterations.
fn num_iterations() -> Arg {
    Arg::new("num_iterations")
        .short('t')
        .value_parser(value_parser!(u32))
        .default_value("5")
        .help("Number of decoding iterations")
}

/// Returns argument for first Es/N0 (dB).
fn first_snr_db() -> Arg {
    Arg::new("first_snr_db")
        .short('a')
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .default_value("-10.0")
        .help("First Es/N0 (dB)")
}

/// Returns argument for Es/N0 step (dB).
fn snr_step_db() -> Arg {
    Arg::new("snr_step_db")
        .short('p')
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .default_value("1.0")
        .help("Es/N0 step (dB)")
}

/// Returns argument for number of Es/N0 values.
fn num_snr() -> Arg {
    Arg::new("num_snr")
        .short('s')
        .value_parser(value_parser!(u32))
        .default_value("20")
        .help("Number of Es/N0 values")
}

/// Returns argument for desired minimum number of frame errors.
fn num_frame_errors_min() -> Arg {
    Arg::new("num_frame_errors_min")
        .short('e')
        .value_parser(value_parser!(u32))
        .default_value("50")
        .help("Desired minimum number of frame errors")
}

/// Returns argument for number of frames to be transmitted per run.
fn num_frames_per_run() -> Arg {
    Arg::new("num_frames_per_run")
        .short('b')
        .value_parser(value_parser!(u32))
        .default_value("100")
        .help("Number of frames to be transmitted per run")
}

/// Returns argument for minimum number of runs of frames to be simulated.
fn num_runs_min() -> Arg {
    Arg::new("num_runs_min")
        .short('n')
        .value_parser(value_parser!(u32))
        .default_value("1")
        .help("Minimum number of runs of frames to be simulated")
}

/// Returns argument for maximum number of runs of frames to be simulated.
fn num_runs_max() -> Arg {
    Arg::new("num_runs_max")
        .short('x')
        .value_parser(value_parser!(u32))
        .default_value("10")
        .help("Maximum number of runs of frames to be simulated")
}

/// Returns argument for name of JSON file to which results must be saved.
fn json_filename() -> Arg {
    Arg::new("json_filename")
        .short('f')
        .default_value("results.json")
        .help("Name of JSON file to which results must be saved")
}

/// Returns simulation parameters based on command-line arguments.
fn all_sim_params(matches: &ArgMatches) -> Vec<sim::SimParams> {
    let mut num_runs_min = num_runs_min_from_matches(matches);
    let mut num_runs_max = num_runs_max_from_matches(matches);
    if num_runs_min > num_runs_max {
        if let Some(ValueSource::DefaultValue) = matches.value_source("num_runs_min") {
            num_runs_min = num_runs_max;
        }
        if let Some(ValueSource::DefaultValue) = matches.value_source("num_runs_max") {
            num_runs_max = num_runs_min;
        }
    }
    let mut all_params = Vec::new();
    for es_over_n0_db in all_es_over_n0_db_from_matches(matches) {
        all_params.push(sim::SimParams {
            num_outer_data_bits: *matches.get_one("num_outer_data_bits").unwrap(),
            num_inner_data_bits: *matches.get_one("num_inner_data_bits").unwrap(),
            num_rows: *matches.get_one("num_rows").unwrap(),
            num_cols: *matches.get_one("num_cols").unwrap(),
            es_over_n0_db,
            num_iterations: *matches.get_one("num_iterations").unwrap(),
            num_frame_errors_min: *matches.get_one("num_frame_errors_min").unwrap(),
            num_frames_per_run: *matches.get_one("num_frames_per_run").unwrap(),
            num_runs_min,
            num_runs_max,
        });
    }
    // OK to unwrap: All command-line arguments have default values, so `get_one` cannot
    // return `None` for any of them.
    all_params
}

/// Returns all Es/N0 (dB) values.
fn all_es_over_n0_db_from_matches(matches: &ArgMatches) -> Vec<f64> {
    let first_snr_db: f64 = *matches.get_one("first_snr_db").unwrap();
    let snr_step_db: f64 = *matches.get_one("snr_step_db").unwrap();
    let num_snr: u32 = *matches.get_one("num_snr").unwrap();
    (0 .. num_snr)
        .map(|n| first_snr_db + snr_step_db * f64::from(n))
        .collect()
}

/// Returns minimum number of runs of frames to be simulated.
fn num_runs_min_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_runs_min").unwrap()
}

/// Returns maximum number of runs of frames to be simulated.
fn num_runs_max_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_runs_max").unwrap()
}

/// Returns name of JSON file to which simulation results must be saved.
fn json_filename_from_matches(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("json_filename")
        .unwrap()
        .to_string()
}
