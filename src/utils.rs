//! # Some useful functions for simulating code performance
//!
//! The [`random_bits`] function returns a given number of random bits; the [`bpsk_modulate`]
//! function maps bits to unit-energy BPSK symbols; the [`awgn_channel`] function adds Gaussian
//! noise of a variance derived from a target SNR; the [`bpsk_slicer`] function slices symbols to
//! bits; and the [`error_count`] function returns the number of errors in a sequence with respect
//! to a reference sequence.
//!
//! # Examples
//!
//! The code below illustrates the usage of the functions in this module.
//! ```
//! use scpc::utils;
//!
//! let num_bits = 40;
//! let es_over_n0_db = 10.0;
//! let bits = utils::random_bits(num_bits);
//! let symbols = utils::awgn_channel(&utils::bpsk_modulate(&bits), es_over_n0_db);
//! let bits_hat = utils::bpsk_slicer(&symbols);
//! let err_count = utils::error_count(&bits_hat, &bits);
//! ```

use rand::Rng;
use rand_distr::StandardNormal;

use crate::Bit;

/// Returns given number of random bits.
///
/// # Parameters
///
/// - `num_bits`: Number of random bits to be generated.
///
/// # Returns
///
/// - `bits`: Random bits.
#[must_use]
pub fn random_bits(num_bits: usize) -> Vec<Bit> {
    let mut rng = rand::rng();
    (0 .. num_bits)
        .map(|_| {
            if rng.random_bool(0.5) {
                Bit::One
            } else {
                Bit::Zero
            }
        })
        .collect()
}

/// Returns unit-energy BPSK symbols for given bits.
///
/// # Parameters
///
/// - `bits`: Bits to be modulated. `Zero` maps to `+1.0`, and `One` to `-1.0`.
///
/// # Returns
///
/// - `syms`: BPSK symbols corresponding to the given bits.
#[must_use]
pub fn bpsk_modulate(bits: &[Bit]) -> Vec<f64> {
    bits.iter()
        .map(|b| match b {
            Bit::Zero => 1f64,
            Bit::One => -1f64,
        })
        .collect()
}

/// Returns AWGN channel output corresponding to given input symbols.
///
/// # Parameters
///
/// - `syms`: Symbols to be transmitted over the AWGN channel.
///
/// - `es_over_n0_db`: Ratio (dB) of symbol energy to noise power spectral density at the channel
///   output (for unit-energy symbols, the noise variance is `10f64.powf(-0.1 * es_over_n0_db)`).
///
/// # Returns
///
/// - `channel_output`: Given symbols with independent zero-mean Gaussian noise samples added.
#[must_use]
pub fn awgn_channel(syms: &[f64], es_over_n0_db: f64) -> Vec<f64> {
    let mut rng = rand::rng();
    let noise_std = 10f64.powf(-0.05 * es_over_n0_db);
    syms.iter()
        .map(|&x| x + noise_std * rng.sample::<f64, _>(StandardNormal))
        .collect()
}

/// Returns BPSK slicer output.
///
/// # Parameters
///
/// - `syms`: Symbols to be sliced. Nonnegative values are mapped to `Zero`, and negative values to
///   `One`.
///
/// # Returns
///
/// - `bits_hat`: Bits obtained by slicing the given symbols.
#[must_use]
pub fn bpsk_slicer(syms: &[f64]) -> Vec<Bit> {
    syms.iter()
        .map(|&x| if x >= 0.0 { Bit::Zero } else { Bit::One })
        .collect()
}

/// Returns number of errors in a sequence with respect to a reference sequence.
///
/// # Parameters
///
/// - `seq`: Sequence in which errors must be counted.
///
/// - `ref_seq`: Reference sequence to which the given sequence is compared.
///
/// # Returns
///
/// - `err_count`: Number of positions in which the two sequences differ. If they are of different
///   lengths, then the longer sequence is effectively truncated to the length of the shorter one.
pub fn error_count<T: PartialEq>(seq: &[T], ref_seq: &[T]) -> usize {
    ref_seq
        .iter()
        .zip(seq.iter())
        .filter(|&(x, y)| x != y)
        .count()
}
