//! Simulator to evaluate performance of a serially concatenated SPC code over a BPSK-AWGN channel

use std::fs::File;

use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{utils, Error, Interleaver, SerialCode, Spc};

/// Parameters for serially concatenated SPC code simulation over a BPSK-AWGN channel
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct SimParams {
    /// Number of data bits per outer code block
    pub num_outer_data_bits: usize,
    /// Number of data bits per inner code block
    pub num_inner_data_bits: usize,
    /// Number of block interleaver rows
    pub num_rows: usize,
    /// Number of block interleaver columns
    pub num_cols: usize,
    /// Ratio (dB) of symbol energy to noise power spectral density at BPSK-AWGN channel output
    pub es_over_n0_db: f64,
    /// Number of decoding iterations
    pub num_iterations: u32,
    /// Desired minimum number of frame errors
    pub num_frame_errors_min: u32,
    /// Number of frames to be transmitted per run
    pub num_frames_per_run: u32,
    /// Minimum number of runs of frames to be simulated
    pub num_runs_min: u32,
    /// Maximum number of runs of frames to be simulated
    pub num_runs_max: u32,
}

/// Results from serially concatenated SPC code simulation over a BPSK-AWGN channel
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct SimResults {
    /// Simulation parameters
    pub params: SimParams,
    /// Overall code rate
    pub code_rate: f64,
    /// Number of frames transmitted
    pub num_frames: u32,
    /// Number of information bits transmitted
    pub num_info_bits: u64,
    /// Number of information bit errors
    pub num_info_bit_errors: u64,
    /// Number of frame errors
    pub num_frame_errors: u32,
}

impl SimResults {
    /// Returns new (all-zero) results for given simulation parameters and code rate.
    fn new(params: SimParams, code_rate: f64) -> Self {
        Self {
            params,
            code_rate,
            num_frames: 0,
            num_info_bits: 0,
            num_info_bit_errors: 0,
            num_frame_errors: 0,
        }
    }

    /// Returns information bit error rate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn info_bit_error_rate(&self) -> f64 {
        if self.num_info_bits == 0 {
            0.0
        } else {
            self.num_info_bit_errors as f64 / self.num_info_bits as f64
        }
    }

    /// Returns frame error rate.
    #[must_use]
    pub fn frame_error_rate(&self) -> f64 {
        if self.num_frames == 0 {
            0.0
        } else {
            f64::from(self.num_frame_errors) / f64::from(self.num_frames)
        }
    }

    /// Returns ratio (dB) of information bit energy to noise power spectral density, obtained by
    /// adjusting `Es/N0` for the overall code rate.
    #[must_use]
    pub fn eb_over_n0_db(&self) -> f64 {
        self.params.es_over_n0_db - 10.0 * self.code_rate.log10()
    }
}

/// Runs BPSK-AWGN simulations for all given parameters, and saves results to a JSON file.
///
/// For each parameter set, frames are simulated in runs of `num_frames_per_run` (each run fanned
/// out over a thread pool) until at least `num_frame_errors_min` frame errors have been observed
/// after `num_runs_min` runs, or `num_runs_max` runs have been simulated, whichever comes first.
///
/// # Parameters
///
/// - `all_params`: Parameters for all simulations of interest (typically one entry per SNR
///   value).
///
/// - `json_filename`: Name of JSON file to which all simulation results must be saved.
///
/// # Returns
///
/// - `all_results`: Results from all simulations.
///
/// # Errors
///
/// Returns an error if any parameter set is invalid or if the results file cannot be written.
pub fn run_bpsk_awgn_sims(
    all_params: &[SimParams],
    json_filename: &str,
) -> Result<Vec<SimResults>, Error> {
    let mut all_results = Vec::with_capacity(all_params.len());
    for params in all_params {
        let results = run_bpsk_awgn_sim(params)?;
        eprintln!(
            "Es/N0 = {:6.2} dB: BER = {:.3e}, FER = {:.3e} ({} frames)",
            params.es_over_n0_db,
            results.info_bit_error_rate(),
            results.frame_error_rate(),
            results.num_frames,
        );
        all_results.push(results);
    }
    save_results_to_json_file(&all_results, json_filename)?;
    eprintln!(
        "Bit error rate against Eb/N0:\n{}",
        all_results
            .iter()
            .map(|results| format!(
                "Eb/N0 = {:6.2} dB: BER = {:.3e}",
                results.eb_over_n0_db(),
                results.info_bit_error_rate(),
            ))
            .join("\n")
    );
    Ok(all_results)
}

/// Runs BPSK-AWGN simulation for given parameters.
fn run_bpsk_awgn_sim(params: &SimParams) -> Result<SimResults, Error> {
    check_sim_params(params)?;
    let code = serial_code_from_params(params)?;
    let mut results = SimResults::new(*params, code.rate());
    for run_index in 0 .. params.num_runs_max {
        let (num_info_bit_errors, num_frame_errors) = (0 .. params.num_frames_per_run)
            .into_par_iter()
            .map(|_| run_frame(&code, params))
            .try_reduce(|| (0, 0), |x, y| Ok((x.0 + y.0, x.1 + y.1)))?;
        results.num_frames += params.num_frames_per_run;
        results.num_info_bits +=
            u64::from(params.num_frames_per_run) * code.num_info_bits() as u64;
        results.num_info_bit_errors += num_info_bit_errors;
        results.num_frame_errors += num_frame_errors;
        if run_index + 1 >= params.num_runs_min
            && results.num_frame_errors >= params.num_frame_errors_min
        {
            break;
        }
    }
    Ok(results)
}

/// Simulates transmission of one frame, and returns its bit and frame error counts.
fn run_frame(code: &SerialCode, params: &SimParams) -> Result<(u64, u32), Error> {
    let info_bits = utils::random_bits(code.num_info_bits());
    let code_bits = code.transmit(&info_bits)?;
    let channel_output =
        utils::awgn_channel(&utils::bpsk_modulate(&code_bits), params.es_over_n0_db);
    let info_bits_hat =
        code.receive(&channel_output, params.es_over_n0_db, params.num_iterations)?;
    let num_info_bit_errors = utils::error_count(&info_bits_hat, &info_bits);
    Ok((
        num_info_bit_errors as u64,
        u32::from(num_info_bit_errors > 0),
    ))
}

/// Returns serially concatenated code corresponding to given simulation parameters.
fn serial_code_from_params(params: &SimParams) -> Result<SerialCode, Error> {
    SerialCode::new(
        Spc::new(params.num_outer_data_bits)?,
        Spc::new(params.num_inner_data_bits)?,
        Interleaver::block(params.num_rows, params.num_cols)?,
    )
}

/// Checks validity of simulation parameters.
fn check_sim_params(params: &SimParams) -> Result<(), Error> {
    if params.num_iterations == 0 {
        return Err(Error::IterationCountInvalid(
            "Number of decoding iterations must be a positive integer".to_string(),
        ));
    }
    if params.num_frames_per_run == 0 {
        return Err(Error::InvalidInput(
            "Number of frames per run cannot be zero".to_string(),
        ));
    }
    if params.num_runs_min > params.num_runs_max {
        return Err(Error::InvalidInput(format!(
            "Minimum number of runs ({}) exceeds maximum number of runs ({})",
            params.num_runs_min, params.num_runs_max
        )));
    }
    Ok(())
}

/// Saves simulation results to a JSON file.
fn save_results_to_json_file(
    all_results: &[SimResults],
    json_filename: &str,
) -> Result<(), Error> {
    let file = File::create(json_filename)?;
    serde_json::to_writer_pretty(file, all_results)?;
    Ok(())
}

#[cfg(test)]
mod tests_of_functions {
    use float_eq::assert_float_eq;

    use super::*;

    fn params_for_test() -> SimParams {
        SimParams {
            num_outer_data_bits: 3,
            num_inner_data_bits: 4,
            num_rows: 3,
            num_cols: 4,
            es_over_n0_db: 10.0,
            num_iterations: 5,
            num_frame_errors_min: 50,
            num_frames_per_run: 10,
            num_runs_min: 1,
            num_runs_max: 2,
        }
    }

    #[test]
    fn test_check_sim_params() {
        // Invalid input
        let params = SimParams {
            num_iterations: 0,
            ..params_for_test()
        };
        assert!(check_sim_params(&params).is_err());
        let params = SimParams {
            num_frames_per_run: 0,
            ..params_for_test()
        };
        assert!(check_sim_params(&params).is_err());
        let params = SimParams {
            num_runs_min: 2,
            num_runs_max: 1,
            ..params_for_test()
        };
        assert!(check_sim_params(&params).is_err());
        // Valid input
        assert!(check_sim_params(&params_for_test()).is_ok());
    }

    #[test]
    fn test_serial_code_from_params() {
        // Shape inconsistent with the outer codeword length
        let params = SimParams {
            num_rows: 3,
            num_cols: 2,
            ..params_for_test()
        };
        assert!(serial_code_from_params(&params).is_err());
        // Valid input
        let code = serial_code_from_params(&params_for_test()).unwrap();
        assert_eq!(code.num_info_bits(), 9);
        assert_eq!(code.num_channel_bits(), 15);
    }

    #[test]
    fn test_sim_results_error_rates() {
        let mut results = SimResults::new(params_for_test(), 0.6);
        assert_float_eq!(results.info_bit_error_rate(), 0.0, abs <= 1e-12);
        assert_float_eq!(results.frame_error_rate(), 0.0, abs <= 1e-12);
        results.num_frames = 100;
        results.num_info_bits = 900;
        results.num_info_bit_errors = 9;
        results.num_frame_errors = 5;
        assert_float_eq!(results.info_bit_error_rate(), 0.01, abs <= 1e-12);
        assert_float_eq!(results.frame_error_rate(), 0.05, abs <= 1e-12);
    }

    #[test]
    fn test_sim_results_eb_over_n0_db() {
        let results = SimResults::new(params_for_test(), 0.6);
        assert_float_eq!(
            results.eb_over_n0_db(),
            10.0 - 10.0 * 0.6f64.log10(),
            abs <= 1e-12
        );
    }

    #[test]
    fn test_sim_results_json_round_trip() {
        let results = SimResults::new(params_for_test(), 0.6);
        let json = serde_json::to_string(&results).unwrap();
        let recovered: SimResults = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, results);
    }

    #[test]
    fn test_run_bpsk_awgn_sim() {
        // Invalid parameters are rejected before any frame is simulated
        let params = SimParams {
            num_frames_per_run: 0,
            ..params_for_test()
        };
        assert!(run_bpsk_awgn_sim(&params).is_err());
        // At high SNR, the decoder is essentially error-free
        let params = SimParams {
            es_over_n0_db: 20.0,
            ..params_for_test()
        };
        let results = run_bpsk_awgn_sim(&params).unwrap();
        assert!(results.num_frames >= params.num_frames_per_run);
        assert_eq!(
            u64::from(results.num_frames) * 9,
            results.num_info_bits
        );
        assert!(results.info_bit_error_rate() < 0.05);
    }
}
