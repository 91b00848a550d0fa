//! This crate implements encoding and decoding functionality for a serially concatenated
//! single-parity-check (SPC) code. The encoder for such a code comprises an outer SPC encoder and
//! an inner SPC encoder separated by an interleaver: the outer codeword is interleaved and then
//! encoded block-by-block by the inner code. The decoder is based on iterations between two
//! corresponding soft-input/soft-output (SISO) decoders, separated by an interleaver and
//! deinterleaver, which exchange extrinsic information until a fixed iteration budget is
//! exhausted.
//!
//! The log-likelihood-ratio (LLR) convention used throughout is `ln(P(Zero) / P(One))`: positive
//! values indicate that `Zero` is more likely. On a BPSK channel, `Zero` maps to `+1.0` and `One`
//! to `-1.0`.

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

use thiserror::Error;

mod interleaver;
mod serial;
mod spc;

pub mod sim;
pub mod utils;

pub use interleaver::Interleaver;
pub use serial::SerialCode;
pub use spc::Spc;

/// Custom error type
#[derive(Error, Debug)]
pub enum Error {
    /// Encoder or decoder given an input of the wrong length (caller bug)
    #[error("{0}")]
    InvalidInputLength(String),
    /// Interleaver shape inconsistent with the code dimensions (configuration error)
    #[error("{0}")]
    ShapeMismatch(String),
    /// Nonpositive number of decoding iterations
    #[error("{0}")]
    IterationCountInvalid(String),
    /// Non-finite LLR value produced during decoding (internal invariant violation)
    #[error("{0}")]
    NumericalInstability(String),
    /// Invalid input error
    #[error("{0}")]
    InvalidInput(String),
    /// File read/write error
    #[error("{0}")]
    FileReadWriteError(#[from] std::io::Error),
    /// Serde read/write error
    #[error("{0}")]
    SerdeReadWriteError(#[from] serde_json::Error),
}

/// Enumeration of binary symbol values
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
pub enum Bit {
    /// Binary symbol `0`
    Zero = 0,
    /// Binary symbol `1`
    One = 1,
}
