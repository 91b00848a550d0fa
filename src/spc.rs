//! Single-parity-check (SPC) block code: encoder and soft-input/soft-output (SISO) decoder

use crate::{Bit, Error};

/// Guard band keeping `atanh` arguments strictly inside `(-1, 1)`
const TANH_CLAMP: f64 = 1.0 - 1e-12;

/// Single-parity-check code over blocks of a given number of data bits
///
/// A codeword consists of the data bits followed by one parity bit equal to their XOR, so every
/// codeword has even weight. The descriptor is immutable and can be shared freely across decoding
/// calls and threads.
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
pub struct Spc {
    /// Number of data bits per block
    num_data_bits: usize,
}

impl Spc {
    /// Returns SPC code over blocks of a given number of data bits.
    ///
    /// # Parameters
    ///
    /// - `num_data_bits`: Number of data bits per block. Must be positive.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_data_bits` is `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scpc::Spc;
    ///
    /// let spc = Spc::new(3)?;
    /// assert_eq!(spc.num_code_bits(), 4);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(num_data_bits: usize) -> Result<Self, Error> {
        if num_data_bits == 0 {
            return Err(Error::InvalidInput(
                "Number of data bits per SPC block must be a positive integer".to_string(),
            ));
        }
        Ok(Self { num_data_bits })
    }

    /// Returns number of data bits per block.
    #[must_use]
    pub fn num_data_bits(&self) -> usize {
        self.num_data_bits
    }

    /// Returns number of code bits per block (data bits plus one parity bit).
    #[must_use]
    pub fn num_code_bits(&self) -> usize {
        self.num_data_bits + 1
    }

    /// Returns code rate `n / (n + 1)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rate(&self) -> f64 {
        self.num_data_bits as f64 / self.num_code_bits() as f64
    }

    /// Generates code bits for one block of data bits.
    ///
    /// # Parameters
    ///
    /// - `data_bits`: Data bits to be encoded (exactly one block).
    ///
    /// - `code_bits`: Buffer for code bits (any pre-existing contents will be cleared). On
    ///   success it holds the data bits followed by their parity bit.
    ///
    /// # Errors
    ///
    /// Returns an error if `data_bits.len()` is not equal to `self.num_data_bits()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scpc::{Bit, Spc};
    /// use Bit::{One, Zero};
    ///
    /// let spc = Spc::new(3)?;
    /// let mut code_bits = Vec::new();
    /// spc.encode(&[One, Zero, One], &mut code_bits)?;
    /// assert_eq!(code_bits, [One, Zero, One, Zero]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn encode(&self, data_bits: &[Bit], code_bits: &mut Vec<Bit>) -> Result<(), Error> {
        if data_bits.len() != self.num_data_bits {
            return Err(Error::InvalidInputLength(format!(
                "Invalid SPC encoder input length (expected {}, found {})",
                self.num_data_bits,
                data_bits.len()
            )));
        }
        code_bits.clear();
        code_bits.extend_from_slice(data_bits);
        code_bits.push(parity(data_bits));
        Ok(())
    }

    /// Generates extrinsic LLR values for one block of code bit LLR values.
    ///
    /// The extrinsic LLR at position `k` is the information the parity constraint provides about
    /// bit `k` from the LLR values at all *other* positions:
    /// `out[k] = 2 * atanh( prod_{j != k} tanh(in[j] / 2) )`. The `tanh` values are clamped away
    /// from `±1` so that every output is finite.
    ///
    /// # Parameters
    ///
    /// - `input_llr`: LLR values for the code bits of one block.
    ///
    /// - `output_llr`: Buffer for extrinsic LLR values (any pre-existing contents will be
    ///   cleared).
    ///
    /// # Errors
    ///
    /// Returns an error if `input_llr.len()` is not equal to `self.num_code_bits()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scpc::Spc;
    ///
    /// let spc = Spc::new(3)?;
    /// let mut output_llr = Vec::new();
    /// spc.decode_siso(&[0.0, 0.0, 0.0, 0.0], &mut output_llr)?;
    /// assert_eq!(output_llr, [0.0, 0.0, 0.0, 0.0]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn decode_siso(&self, input_llr: &[f64], output_llr: &mut Vec<f64>) -> Result<(), Error> {
        if input_llr.len() != self.num_code_bits() {
            return Err(Error::InvalidInputLength(format!(
                "Invalid SPC decoder input length (expected {}, found {})",
                self.num_code_bits(),
                input_llr.len()
            )));
        }
        // Forward pass: output_llr[k] holds the product of tanh values over positions before `k`.
        output_llr.clear();
        let mut prefix = 1.0;
        for &llr in input_llr {
            output_llr.push(prefix);
            prefix *= tanh_half(llr);
        }
        // Backward pass: fold in the product over positions after `k`.
        let mut suffix = 1.0;
        for (k, &llr) in input_llr.iter().enumerate().rev() {
            let prod = (output_llr[k] * suffix).clamp(-TANH_CLAMP, TANH_CLAMP);
            output_llr[k] = 2.0 * prod.atanh();
            suffix *= tanh_half(llr);
        }
        Ok(())
    }
}

/// Returns XOR of all given bits.
fn parity(bits: &[Bit]) -> Bit {
    match bits.iter().filter(|&&b| b == Bit::One).count() % 2 {
        0 => Bit::Zero,
        _ => Bit::One,
    }
}

/// Returns `tanh(llr / 2)` clamped away from `±1`.
fn tanh_half(llr: f64) -> f64 {
    (llr / 2.0).tanh().clamp(-TANH_CLAMP, TANH_CLAMP)
}

#[cfg(test)]
mod tests_of_spc {
    use float_eq::assert_float_eq;

    use super::*;
    use Bit::{One, Zero};

    #[test]
    fn test_new() {
        // Invalid input
        assert!(Spc::new(0).is_err());
        // Valid input
        let spc = Spc::new(3).unwrap();
        assert_eq!(spc.num_data_bits(), 3);
        assert_eq!(spc.num_code_bits(), 4);
    }

    #[test]
    fn test_rate() {
        assert_float_eq!(Spc::new(3).unwrap().rate(), 0.75, abs <= 1e-12);
        assert_float_eq!(Spc::new(4).unwrap().rate(), 0.8, abs <= 1e-12);
    }

    #[test]
    fn test_encode() {
        let spc = Spc::new(3).unwrap();
        let mut code_bits = Vec::new();
        // Invalid input
        assert!(spc.encode(&[One, Zero], &mut code_bits).is_err());
        assert!(spc.encode(&[One, Zero, One, Zero], &mut code_bits).is_err());
        // Valid input
        spc.encode(&[One, Zero, One], &mut code_bits).unwrap();
        assert_eq!(code_bits, [One, Zero, One, Zero]);
        spc.encode(&[One, One, One], &mut code_bits).unwrap();
        assert_eq!(code_bits, [One, One, One, One]);
        spc.encode(&[Zero, Zero, Zero], &mut code_bits).unwrap();
        assert_eq!(code_bits, [Zero, Zero, Zero, Zero]);
    }

    #[test]
    fn test_encode_has_even_parity() {
        let spc = Spc::new(4).unwrap();
        let mut code_bits = Vec::new();
        for pattern in 0usize .. 16 {
            let data_bits: Vec<Bit> = (0 .. 4)
                .map(|k| if pattern >> k & 1 == 1 { One } else { Zero })
                .collect();
            spc.encode(&data_bits, &mut code_bits).unwrap();
            assert_eq!(code_bits.len(), 5);
            assert_eq!(
                code_bits.iter().filter(|&&b| b == One).count() % 2,
                0,
                "odd-weight codeword for data pattern {pattern:#06b}"
            );
        }
    }

    #[test]
    fn test_decode_siso() {
        let spc = Spc::new(3).unwrap();
        let mut output_llr = Vec::new();
        // Invalid input
        assert!(spc.decode_siso(&[1.0, -1.0, 1.0], &mut output_llr).is_err());
        // Valid input: compare against the direct product form
        let input_llr = [2.0, -4.0, 6.0, 8.0];
        spc.decode_siso(&input_llr, &mut output_llr).unwrap();
        let mut correct_output_llr = Vec::new();
        for k in 0 .. input_llr.len() {
            let mut prod = 1.0;
            for (j, &llr) in input_llr.iter().enumerate() {
                if j != k {
                    prod *= (llr / 2.0).tanh();
                }
            }
            correct_output_llr.push(2.0 * prod.atanh());
        }
        assert_float_eq!(output_llr, correct_output_llr, abs_all <= 1e-8);
    }

    #[test]
    fn test_decode_siso_no_evidence() {
        let spc = Spc::new(4).unwrap();
        let mut output_llr = Vec::new();
        spc.decode_siso(&[0.0; 5], &mut output_llr).unwrap();
        assert_float_eq!(output_llr, vec![0.0; 5], abs_all <= 1e-12);
    }

    #[test]
    fn test_decode_siso_excludes_own_position() {
        let spc = Spc::new(2).unwrap();
        let mut output_llr = Vec::new();
        // A zero LLR at one position wipes out the parity information for every other position,
        // but that position itself still learns from the rest of the block.
        spc.decode_siso(&[0.0, 5.0, 5.0], &mut output_llr).unwrap();
        assert!(output_llr[0] > 1.0);
        assert_float_eq!(output_llr[1], 0.0, abs <= 1e-12);
        assert_float_eq!(output_llr[2], 0.0, abs <= 1e-12);
    }

    #[test]
    fn test_decode_siso_reproduces_codeword() {
        let spc = Spc::new(3).unwrap();
        let mut output_llr = Vec::new();
        // Strong LLR values consistent with the even-weight codeword [One, Zero, One, Zero]
        let input_llr = [-20.0, 20.0, -20.0, 20.0];
        spc.decode_siso(&input_llr, &mut output_llr).unwrap();
        for (&out, &input) in output_llr.iter().zip(input_llr.iter()) {
            assert_eq!(out.is_sign_negative(), input.is_sign_negative());
            assert!(out.is_finite());
        }
    }

    #[test]
    fn test_decode_siso_saturated_input_is_finite() {
        let spc = Spc::new(4).unwrap();
        let mut output_llr = Vec::new();
        spc.decode_siso(&[1e9, -1e9, 1e9, -1e9, 1e9], &mut output_llr)
            .unwrap();
        assert!(output_llr.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_parity() {
        assert_eq!(parity(&[]), Zero);
        assert_eq!(parity(&[One]), One);
        assert_eq!(parity(&[One, Zero, One]), Zero);
        assert_eq!(parity(&[One, One, One]), One);
    }

    #[test]
    fn test_tanh_half() {
        assert_float_eq!(tanh_half(2.0), 1f64.tanh(), abs <= 1e-12);
        assert!(tanh_half(1e12) < 1.0);
        assert!(tanh_half(-1e12) > -1.0);
        assert!(tanh_half(f64::MAX) < 1.0);
    }
}
