//! Encoder and iterative decoder for a serially concatenated single-parity-check code

use crate::{utils, Bit, Error, Interleaver, Spc};

/// Serially concatenated code: an outer SPC code and an inner SPC code joined by an interleaver
///
/// The outer code encodes the information bits block-by-block; the resulting outer codeword is
/// interleaved and then encoded block-by-block by the inner code. The interleaver length must
/// therefore be a multiple of both the outer codeword length and the inner data block length,
/// which is checked at construction time. The descriptor is immutable and can be shared read-only
/// across threads; all per-call decoding state lives in a workspace created inside [`Self::receive`].
#[derive(Debug)]
pub struct SerialCode {
    /// Outer constituent code
    outer: Spc,
    /// Inner constituent code
    inner: Spc,
    /// Interleaver between the outer codeword and the inner encoder input
    interleaver: Interleaver,
}

impl SerialCode {
    /// Returns serially concatenated code with given constituent codes and interleaver.
    ///
    /// # Parameters
    ///
    /// - `outer`: Outer SPC code.
    ///
    /// - `inner`: Inner SPC code.
    ///
    /// - `interleaver`: Interleaver for the outer codeword. Its length must be a multiple of both
    ///   the outer codeword length and the inner data block length.
    ///
    /// # Errors
    ///
    /// Returns an error if the interleaver length is not a multiple of the outer codeword length,
    /// or not a multiple of the inner data block length.
    ///
    /// # Examples
    ///
    /// ```
    /// use scpc::{Interleaver, SerialCode, Spc};
    ///
    /// let code = SerialCode::new(Spc::new(3)?, Spc::new(4)?, Interleaver::block(3, 4)?)?;
    /// assert_eq!(code.num_info_bits(), 9);
    /// assert_eq!(code.num_channel_bits(), 15);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(outer: Spc, inner: Spc, interleaver: Interleaver) -> Result<Self, Error> {
        if interleaver.length() % outer.num_code_bits() != 0 {
            return Err(Error::ShapeMismatch(format!(
                "Interleaver length {} is not a multiple of the outer codeword length {}",
                interleaver.length(),
                outer.num_code_bits()
            )));
        }
        if interleaver.length() % inner.num_data_bits() != 0 {
            return Err(Error::ShapeMismatch(format!(
                "Interleaver length {} is not a multiple of the inner data block length {}",
                interleaver.length(),
                inner.num_data_bits()
            )));
        }
        Ok(Self {
            outer,
            inner,
            interleaver,
        })
    }

    /// Returns overall code rate (product of the constituent code rates).
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.outer.rate() * self.inner.rate()
    }

    /// Returns number of information bits per frame.
    #[must_use]
    pub fn num_info_bits(&self) -> usize {
        self.interleaver.length() / self.outer.num_code_bits() * self.outer.num_data_bits()
    }

    /// Returns number of code bits per frame at the channel.
    #[must_use]
    pub fn num_channel_bits(&self) -> usize {
        self.interleaver.length() / self.inner.num_data_bits() * self.inner.num_code_bits()
    }

    /// Returns code bits for given information bits.
    ///
    /// # Parameters
    ///
    /// - `info_bits`: Information bits to be encoded.
    ///
    /// # Returns
    ///
    /// - `code_bits`: Code bits (outer encoding, interleaving, inner encoding).
    ///
    /// # Errors
    ///
    /// Returns an error if `info_bits.len()` is not equal to `self.num_info_bits()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scpc::{Bit, Interleaver, SerialCode, Spc};
    /// use Bit::{One, Zero};
    ///
    /// let code = SerialCode::new(Spc::new(3)?, Spc::new(4)?, Interleaver::block(2, 2)?)?;
    /// let code_bits = code.transmit(&[One, Zero, One])?;
    /// assert_eq!(code_bits, [One, One, Zero, Zero, Zero]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn transmit(&self, info_bits: &[Bit]) -> Result<Vec<Bit>, Error> {
        if info_bits.len() != self.num_info_bits() {
            return Err(Error::InvalidInputLength(format!(
                "Invalid number of information bits (expected {}, found {})",
                self.num_info_bits(),
                info_bits.len()
            )));
        }
        let mut block = Vec::with_capacity(self.outer.num_code_bits().max(self.inner.num_code_bits()));
        let mut outer_code_bits = Vec::with_capacity(self.interleaver.length());
        for chunk in info_bits.chunks_exact(self.outer.num_data_bits()) {
            self.outer.encode(chunk, &mut block)?;
            outer_code_bits.extend_from_slice(&block);
        }
        let mut interleaved_bits = Vec::with_capacity(self.interleaver.length());
        self.interleaver
            .interleave(&outer_code_bits, &mut interleaved_bits)?;
        let mut code_bits = Vec::with_capacity(self.num_channel_bits());
        for chunk in interleaved_bits.chunks_exact(self.inner.num_data_bits()) {
            self.inner.encode(chunk, &mut block)?;
            code_bits.extend_from_slice(&block);
        }
        Ok(code_bits)
    }

    /// Returns information bit decisions for given BPSK-AWGN channel output.
    ///
    /// Decoding is iterative: per iteration, the inner SISO decoder consumes the channel LLR
    /// values plus the interleaved extrinsic feedback from the outer decoder, the message passed
    /// on to the outer decoder on each data position is the channel LLR plus the inner extrinsic
    /// LLR (the extrinsic feedback a decoder produced itself is never returned to it), and the
    /// outer SISO decoder's extrinsic output is interleaved to become the next round's inner
    /// a-priori input. After the last iteration the a-posteriori LLR values at the outer data
    /// positions are sliced to bits.
    ///
    /// # Parameters
    ///
    /// - `channel_output`: Received symbols from the BPSK-AWGN channel, one per code bit.
    ///
    /// - `es_over_n0_db`: Ratio (dB) of symbol energy to noise power spectral density at the
    ///   channel output; the noise variance is `10f64.powf(-0.1 * es_over_n0_db)` for unit-energy
    ///   symbols, and channel LLR values are `2.0 * y / noise_var`.
    ///
    /// - `num_iterations`: Number of decoding iterations. Must be positive.
    ///
    /// # Returns
    ///
    /// - `info_bits_hat`: Decisions on the information bits.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_iterations` is `0`, if `channel_output.len()` is not equal to
    /// `self.num_channel_bits()`, or if a SISO stage produces a non-finite LLR value (an internal
    /// invariant violation; clamping in the constituent decoders is meant to rule this out).
    ///
    /// # Examples
    ///
    /// ```
    /// use scpc::{Bit, Interleaver, SerialCode, Spc};
    /// use Bit::{One, Zero};
    ///
    /// let code = SerialCode::new(Spc::new(3)?, Spc::new(4)?, Interleaver::block(2, 2)?)?;
    /// let code_bits = code.transmit(&[One, Zero, One])?;
    /// let symbols = scpc::utils::bpsk_modulate(&code_bits);
    /// let info_bits_hat = code.receive(&symbols, 100.0, 1)?;
    /// assert_eq!(info_bits_hat, [One, Zero, One]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn receive(
        &self,
        channel_output: &[f64],
        es_over_n0_db: f64,
        num_iterations: u32,
    ) -> Result<Vec<Bit>, Error> {
        if num_iterations == 0 {
            return Err(Error::IterationCountInvalid(
                "Number of decoding iterations must be a positive integer".to_string(),
            ));
        }
        if channel_output.len() != self.num_channel_bits() {
            return Err(Error::InvalidInputLength(format!(
                "Invalid number of channel output values (expected {}, found {})",
                self.num_channel_bits(),
                channel_output.len()
            )));
        }
        let noise_var = 10f64.powf(-0.1 * es_over_n0_db);
        let channel_llr: Vec<f64> = channel_output.iter().map(|&y| 2.0 * y / noise_var).collect();
        let mut ws = DecoderWorkspace::new(self.interleaver.length(), self.num_info_bits());
        for _ in 0 .. num_iterations {
            self.run_inner_stage(&channel_llr, &mut ws)?;
            self.interleaver
                .deinterleave(&ws.to_outer, &mut ws.outer_input)?;
            self.run_outer_stage(&mut ws)?;
            self.interleaver
                .interleave(&ws.outer_extrinsic, &mut ws.prior)?;
        }
        self.save_posterior_llr(&mut ws);
        Ok(utils::bpsk_slicer(&ws.llr_posterior))
    }

    /// Runs the inner SISO stage over all inner blocks.
    ///
    /// The stage input on each data position is the channel LLR plus the a-priori LLR fed back by
    /// the outer decoder; inner parity positions carry channel LLR only. The message passed on to
    /// the outer decoder is the channel LLR plus the inner extrinsic LLR, so the outer feedback is
    /// excluded while the channel observation of each outer code bit is retained.
    fn run_inner_stage(
        &self,
        channel_llr: &[f64],
        ws: &mut DecoderWorkspace,
    ) -> Result<(), Error> {
        let num_data_bits = self.inner.num_data_bits();
        ws.to_outer.clear();
        for (block_index, chunk) in channel_llr
            .chunks_exact(self.inner.num_code_bits())
            .enumerate()
        {
            let prior_block = &ws.prior[block_index * num_data_bits .. (block_index + 1) * num_data_bits];
            ws.block_input.clear();
            ws.block_input.extend(
                chunk[.. num_data_bits]
                    .iter()
                    .zip(prior_block)
                    .map(|(&ch, &prior)| ch + prior),
            );
            ws.block_input.push(chunk[num_data_bits]);
            self.inner.decode_siso(&ws.block_input, &mut ws.block_extrinsic)?;
            check_all_finite(&ws.block_extrinsic)?;
            ws.to_outer.extend(
                chunk[.. num_data_bits]
                    .iter()
                    .zip(&ws.block_extrinsic)
                    .map(|(&ch, &extrinsic)| ch + extrinsic),
            );
        }
        Ok(())
    }

    /// Runs the outer SISO stage over all outer blocks.
    fn run_outer_stage(&self, ws: &mut DecoderWorkspace) -> Result<(), Error> {
        ws.outer_extrinsic.clear();
        for chunk in ws.outer_input.chunks_exact(self.outer.num_code_bits()) {
            self.outer.decode_siso(chunk, &mut ws.block_extrinsic)?;
            check_all_finite(&ws.block_extrinsic)?;
            ws.outer_extrinsic.extend_from_slice(&ws.block_extrinsic);
        }
        Ok(())
    }

    /// Saves a-posteriori LLR values for the information bits (stage input plus extrinsic at the
    /// data positions of each outer block).
    fn save_posterior_llr(&self, ws: &mut DecoderWorkspace) {
        let num_data_bits = self.outer.num_data_bits();
        ws.llr_posterior.clear();
        for (input_chunk, extrinsic_chunk) in ws
            .outer_input
            .chunks_exact(self.outer.num_code_bits())
            .zip(ws.outer_extrinsic.chunks_exact(self.outer.num_code_bits()))
        {
            ws.llr_posterior.extend(
                input_chunk[.. num_data_bits]
                    .iter()
                    .zip(&extrinsic_chunk[.. num_data_bits])
                    .map(|(&input, &extrinsic)| input + extrinsic),
            );
        }
    }
}

/// Workspace for the iterative decoder, created per `receive` call and discarded afterwards
#[derive(Debug)]
struct DecoderWorkspace {
    /// Extrinsic feedback from the outer decoder, in interleaved (inner) order
    prior: Vec<f64>,
    /// Messages from the inner stage to the outer stage, in interleaved (inner) order
    to_outer: Vec<f64>,
    /// Input to the outer stage, in outer codeword order
    outer_input: Vec<f64>,
    /// Extrinsic output of the outer stage, in outer codeword order
    outer_extrinsic: Vec<f64>,
    /// Buffer for the input of one SISO block
    block_input: Vec<f64>,
    /// Buffer for the extrinsic output of one SISO block
    block_extrinsic: Vec<f64>,
    /// A-posteriori LLR values for the information bits
    llr_posterior: Vec<f64>,
}

impl DecoderWorkspace {
    /// Returns new workspace for a frame of given interleaver length and information bit count.
    fn new(interleaver_length: usize, num_info_bits: usize) -> Self {
        Self {
            prior: vec![0.0; interleaver_length],
            to_outer: Vec::with_capacity(interleaver_length),
            outer_input: Vec::with_capacity(interleaver_length),
            outer_extrinsic: Vec::with_capacity(interleaver_length),
            block_input: Vec::new(),
            block_extrinsic: Vec::new(),
            llr_posterior: Vec::with_capacity(num_info_bits),
        }
    }
}

/// Checks that all given LLR values are finite.
fn check_all_finite(llr_values: &[f64]) -> Result<(), Error> {
    if llr_values.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(Error::NumericalInstability(
            "Non-finite LLR value at SISO decoder output".to_string(),
        ))
    }
}
