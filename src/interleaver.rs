//! Interleaver for sequences of a given length

use rand::seq::SliceRandom;

use crate::Error;

/// Interleaver for sequences of a given length
///
/// An interleaver is a fixed bijective reordering of sequence positions. Both the permutation and
/// its inverse are tabulated at construction time, so interleaving and deinterleaving are exact
/// mutual inverses by construction.
#[derive(Eq, PartialEq, Debug)]
pub struct Interleaver {
    /// Length of input/output sequence
    pub(crate) length: usize,
    /// Input index for each output index (needed in interleaving)
    perm: Vec<usize>,
    /// Output index for each input index (needed in deinterleaving)
    inv_perm: Vec<usize>,
}

impl Interleaver {
    /// Returns interleaver corresponding to a given permutation.
    ///
    /// # Parameters
    ///
    /// - `perm`: Permutation of integers in `[0, L)` for some positive integer `L`. If the
    ///   interleaver input is the sequence `x[0], x[1], ..., x[L-1]`, then its output is the
    ///   sequence `x[perm[0]], x[perm[1]], ..., x[perm[L-1]]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `perm` is not a permutation of the integers in `[0, L)` for some
    /// positive integer `L`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scpc::Interleaver;
    ///
    /// let interleaver = Interleaver::new(&[0, 3, 2, 5, 4, 7, 6, 1])?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(perm: &[usize]) -> Result<Self, Error> {
        if perm.is_empty() {
            return Err(Error::InvalidInput(
                "Permutation defining interleaver cannot be empty".to_string(),
            ));
        }
        let mut seen = vec![false; perm.len()];
        for &in_index in perm {
            if in_index >= perm.len() || seen[in_index] {
                return Err(Error::InvalidInput(format!(
                    "Expected permutation of all integers in the range [0, {}), found {:?}",
                    perm.len(),
                    perm
                )));
            }
            seen[in_index] = true;
        }
        Ok(Self::from_valid_perm(perm.to_vec()))
    }

    /// Returns block interleaver of a given shape.
    ///
    /// The input sequence is written into a `num_rows x num_cols` matrix row by row and read out
    /// column by column, so the interleaver length is `num_rows * num_cols`.
    ///
    /// # Parameters
    ///
    /// - `num_rows`: Number of matrix rows.
    ///
    /// - `num_cols`: Number of matrix columns.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scpc::Interleaver;
    ///
    /// let interleaver = Interleaver::block(2, 3)?;
    /// let mut output = Vec::new();
    /// interleaver.interleave(&['a', 'b', 'c', 'd', 'e', 'f'], &mut output)?;
    /// assert_eq!(output, ['a', 'd', 'b', 'e', 'c', 'f']);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn block(num_rows: usize, num_cols: usize) -> Result<Self, Error> {
        if num_rows == 0 || num_cols == 0 {
            return Err(Error::ShapeMismatch(format!(
                "Block interleaver shape must have positive dimensions (found {num_rows}x{num_cols})",
            )));
        }
        let length = num_rows * num_cols;
        let perm: Vec<usize> = (0 .. length)
            .map(|out_index| out_index % num_rows * num_cols + out_index / num_rows)
            .collect();
        Ok(Self::from_valid_perm(perm))
    }

    /// Returns random interleaver for sequences of a given length.
    ///
    /// # Parameters
    ///
    /// - `length`: Length of input/output sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if `length` is `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scpc::Interleaver;
    ///
    /// let interleaver = Interleaver::random(8)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn random(length: usize) -> Result<Self, Error> {
        if length == 0 {
            return Err(Error::InvalidInput(
                "Length of interleaver must be a positive integer".to_string(),
            ));
        }
        let mut perm: Vec<usize> = (0 .. length).collect();
        perm.shuffle(&mut rand::rng());
        Ok(Self::from_valid_perm(perm))
    }

    /// Returns length of input/output sequence.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Generates interleaver output given its input.
    ///
    /// # Parameters
    ///
    /// - `input`: Interleaver input.
    ///
    /// - `output`: Buffer for interleaver output (any pre-existing contents will be cleared).
    ///
    /// # Errors
    ///
    /// Returns an error if `input.len()` is not equal to `self.length()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scpc::Interleaver;
    ///
    /// let interleaver = Interleaver::new(&[0, 3, 2, 5, 4, 7, 6, 1])?;
    /// let mut output = Vec::new();
    /// interleaver.interleave(&['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'], &mut output)?;
    /// assert_eq!(output, ['a', 'd', 'c', 'f', 'e', 'h', 'g', 'b']);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn interleave<T: Copy>(&self, input: &[T], output: &mut Vec<T>) -> Result<(), Error> {
        if input.len() != self.length {
            return Err(Error::InvalidInputLength(format!(
                "Invalid interleaver input length (expected {}, found {})",
                self.length,
                input.len()
            )));
        }
        output.clear();
        output.extend(self.perm.iter().map(|&in_index| input[in_index]));
        Ok(())
    }

    /// Generates interleaver input given its output.
    ///
    /// # Parameters
    ///
    /// - `output`: Interleaver output.
    ///
    /// - `input`: Buffer for interleaver input (any pre-existing contents will be cleared).
    ///
    /// # Errors
    ///
    /// Returns an error if `output.len()` is not equal to `self.length()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scpc::Interleaver;
    ///
    /// let interleaver = Interleaver::new(&[0, 3, 2, 5, 4, 7, 6, 1])?;
    /// let mut input = Vec::new();
    /// interleaver.deinterleave(&['a', 'd', 'c', 'f', 'e', 'h', 'g', 'b'], &mut input)?;
    /// assert_eq!(input, ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h']);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn deinterleave<T: Copy>(&self, output: &[T], input: &mut Vec<T>) -> Result<(), Error> {
        if output.len() != self.length {
            return Err(Error::InvalidInputLength(format!(
                "Invalid interleaver output length (expected {}, found {})",
                self.length,
                output.len()
            )));
        }
        input.clear();
        input.extend(self.inv_perm.iter().map(|&out_index| output[out_index]));
        Ok(())
    }

    /// Returns interleaver corresponding to a valid permutation.
    fn from_valid_perm(perm: Vec<usize>) -> Self {
        let length = perm.len();
        let mut inv_perm = vec![0; length];
        for (out_index, &in_index) in perm.iter().enumerate() {
            inv_perm[in_index] = out_index;
        }
        Self {
            length,
            perm,
            inv_perm,
        }
    }
}

#[cfg(test)]
mod tests_of_interleaver {
    use super::*;

    #[test]
    fn test_new() {
        // Invalid input
        assert!(Interleaver::new(&[]).is_err());
        assert!(Interleaver::new(&[1, 2, 3, 4]).is_err());
        assert!(Interleaver::new(&[0, 1, 2, 4]).is_err());
        assert!(Interleaver::new(&[0, 0, 1, 2]).is_err());
        // Valid input
        let interleaver = Interleaver::new(&[0, 3, 2, 5, 4, 7, 6, 1]).unwrap();
        assert_eq!(interleaver.length(), 8);
        assert_eq!(interleaver.perm, [0, 3, 2, 5, 4, 7, 6, 1]);
        assert_eq!(interleaver.inv_perm, [0, 7, 2, 1, 4, 3, 6, 5]);
    }

    #[test]
    fn test_block() {
        // Invalid input
        assert!(Interleaver::block(0, 4).is_err());
        assert!(Interleaver::block(3, 0).is_err());
        // Valid input
        let interleaver = Interleaver::block(3, 4).unwrap();
        assert_eq!(interleaver.length(), 12);
        assert_eq!(interleaver.perm, [0, 4, 8, 1, 5, 9, 2, 6, 10, 3, 7, 11]);
        // Single row and single column are both the identity
        let input: Vec<usize> = (0 .. 5).collect();
        let mut output = Vec::new();
        Interleaver::block(1, 5)
            .unwrap()
            .interleave(&input, &mut output)
            .unwrap();
        assert_eq!(output, input);
        Interleaver::block(5, 1)
            .unwrap()
            .interleave(&input, &mut output)
            .unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_random() {
        // Invalid input
        assert!(Interleaver::random(0).is_err());
        // Valid input
        let length = 8;
        let interleaver = Interleaver::random(length).unwrap();
        let mut perm = interleaver.perm;
        perm.sort_unstable();
        assert!(perm == (0 .. length).collect::<Vec<usize>>());
    }

    #[test]
    fn test_interleave() {
        let interleaver = Interleaver::new(&[0, 3, 2, 5, 4, 7, 6, 1]).unwrap();
        let mut output = Vec::new();
        // Invalid input
        let input = ['a', 'b', 'c', 'd', 'e', 'f', 'g'];
        assert!(interleaver.interleave(&input, &mut output).is_err());
        // Valid input
        let input = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];
        for _ in 0 .. 2 {
            interleaver.interleave(&input, &mut output).unwrap();
            assert_eq!(output, ['a', 'd', 'c', 'f', 'e', 'h', 'g', 'b']);
        }
    }

    #[test]
    fn test_deinterleave() {
        let interleaver = Interleaver::new(&[0, 3, 2, 5, 4, 7, 6, 1]).unwrap();
        let mut input = Vec::new();
        // Invalid output
        let output = ['a', 'd', 'c', 'f', 'e', 'h', 'g'];
        assert!(interleaver.deinterleave(&output, &mut input).is_err());
        // Valid output
        let output = ['a', 'd', 'c', 'f', 'e', 'h', 'g', 'b'];
        for _ in 0 .. 2 {
            interleaver.deinterleave(&output, &mut input).unwrap();
            assert_eq!(input, ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h']);
        }
    }

    #[test]
    fn test_deinterleave_inverts_interleave() {
        for (num_rows, num_cols) in [(1, 1), (1, 7), (7, 1), (2, 3), (3, 4), (5, 8)] {
            let interleaver = Interleaver::block(num_rows, num_cols).unwrap();
            let input: Vec<usize> = (0 .. interleaver.length()).collect();
            let mut interleaved = Vec::new();
            let mut deinterleaved = Vec::new();
            interleaver.interleave(&input, &mut interleaved).unwrap();
            interleaver
                .deinterleave(&interleaved, &mut deinterleaved)
                .unwrap();
            assert_eq!(deinterleaved, input, "shape {num_rows}x{num_cols}");
        }
        let interleaver = Interleaver::random(32).unwrap();
        let input: Vec<usize> = (0 .. 32).rev().collect();
        let mut interleaved = Vec::new();
        let mut deinterleaved = Vec::new();
        interleaver.interleave(&input, &mut interleaved).unwrap();
        interleaver
            .deinterleave(&interleaved, &mut deinterleaved)
            .unwrap();
        assert_eq!(deinterleaved, input);
    }

    #[test]
    fn test_from_valid_perm() {
        let interleaver = Interleaver::from_valid_perm(vec![0, 3, 2, 5, 4, 7, 6, 1]);
        assert_eq!(interleaver.length(), 8);
        assert_eq!(interleaver.perm, [0, 3, 2, 5, 4, 7, 6, 1]);
        assert_eq!(interleaver.inv_perm, [0, 7, 2, 1, 4, 3, 6, 5]);
    }
}
