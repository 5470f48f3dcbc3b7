//! Run-length packing of a zigzag-scanned block into `(run, value)` symbols
//!
//! Per `spec.md` §4.6: the DC coefficient is replaced by its difference from
//! the previous block's DC of the same component (DPCM, first block uses
//! predictor 0). The 63 ACs are packed as `(run_of_zeros, value)` pairs;
//! runs longer than 15 emit an explicit `(15, 0)` zero-run escape, and a
//! single EOB symbol terminates the block once all remaining ACs are zero.

use crate::block::BLOCK_SIZE;

/// One packed block symbol
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Symbol {
    /// A DC coefficient, already differenced from the previous block's DC
    Dc(i16),
    /// `run` zeros followed by a nonzero AC `value`
    Ac { run: u8, value: i16 },
    /// `(15, 0)` zero-run escape: 16 zeros with no value
    ZeroRunEscape,
    /// End of block: all remaining ACs are zero
    Eob
}

/// Per-component DC predictor, carried across consecutive blocks
#[derive(Copy, Clone, Debug, Default)]
pub struct DcPredictor(i16);

impl DcPredictor {
    #[must_use]
    pub fn new() -> Self {
        DcPredictor(0)
    }

    /// Compute this block's DC difference and advance the predictor
    pub fn difference(&mut self, dc: i16) -> i16 {
        let diff = dc.wrapping_sub(self.0);
        self.0 = dc;
        diff
    }

    /// Undo [`DcPredictor::difference`]: reconstruct the absolute DC and
    /// advance the predictor
    pub fn reconstruct(&mut self, diff: i16) -> i16 {
        let dc = self.0.wrapping_add(diff);
        self.0 = dc;
        dc
    }
}

/// Pack a zigzag-scanned block (DC already differenced) into symbols
///
/// Zeros are only ever run/escape-coded between two nonzero ACs; the run of
/// zeros trailing the last nonzero AC (if any) is dropped in favor of the
/// single terminating EOB, per `spec.md` §4.6.
#[must_use]
pub fn encode_block(scanned: &[i16; BLOCK_SIZE], dc_diff: i16) -> Vec<Symbol> {
    let mut symbols = Vec::with_capacity(16);
    symbols.push(Symbol::Dc(dc_diff));

    let last_nonzero = scanned[1..].iter().rposition(|&v| v != 0).map(|rel| rel + 1);

    if let Some(last) = last_nonzero {
        let mut run = 0u8;
        for &value in &scanned[1..=last] {
            if value == 0 {
                run += 1;
                if run == 16 {
                    symbols.push(Symbol::ZeroRunEscape);
                    run = 0;
                }
            } else {
                symbols.push(Symbol::Ac { run, value });
                run = 0;
            }
        }
    }
    symbols.push(Symbol::Eob);
    symbols
}

/// Inverse of [`encode_block`]: expand symbols for one block back into a
/// 64-entry zigzag-order coefficient array, returning the DC difference
///
/// # Errors
/// Returns `Err` if the symbol stream does not start with a `Dc` symbol, or
/// if more than 63 AC coefficients are produced before an EOB.
pub fn decode_block(symbols: &[Symbol]) -> Result<([i16; BLOCK_SIZE], i16), &'static str> {
    let mut out = [0i16; BLOCK_SIZE];
    let mut iter = symbols.iter();

    let dc_diff = match iter.next() {
        Some(Symbol::Dc(v)) => *v,
        _ => return Err("block did not start with a DC symbol")
    };

    let mut pos = 1usize;
    for sym in iter {
        match sym {
            Symbol::Eob => return Ok((out, dc_diff)),
            Symbol::ZeroRunEscape => {
                pos += 16;
                if pos > BLOCK_SIZE {
                    return Err("zero-run escape overruns block");
                }
            }
            Symbol::Ac { run, value } => {
                pos += usize::from(*run);
                if pos >= BLOCK_SIZE {
                    return Err("AC run overruns block");
                }
                out[pos] = *value;
                pos += 1;
            }
            Symbol::Dc(_) => return Err("unexpected DC symbol mid-block")
        }
    }
    Err("block symbol stream missing EOB")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dc_predictor_round_trips() {
        let mut enc = DcPredictor::new();
        let mut dec = DcPredictor::new();
        for dc in [10i16, 12, 8, -100, 300] {
            let diff = enc.difference(dc);
            assert_eq!(dec.reconstruct(diff), dc);
        }
    }

    #[test]
    fn all_zero_ac_block_round_trips() {
        let mut scanned = [0i16; 64];
        scanned[0] = 7;
        let symbols = encode_block(&scanned, 7);
        assert_eq!(symbols, vec![Symbol::Dc(7), Symbol::Eob]);
        let (restored, dc) = decode_block(&symbols).unwrap();
        assert_eq!(dc, 7);
        assert_eq!(restored, scanned);
    }

    #[test]
    fn long_zero_run_emits_escape() {
        let mut scanned = [0i16; 64];
        scanned[0] = 1;
        scanned[20] = 5;
        let symbols = encode_block(&scanned, 1);
        // 19 zeros before index 20 -> one escape (16) + run=3 ac
        assert!(symbols.contains(&Symbol::ZeroRunEscape));
        let (restored, _) = decode_block(&symbols).unwrap();
        assert_eq!(restored, scanned);
    }

    #[test]
    fn arbitrary_pattern_round_trips() {
        let mut scanned = [0i16; 64];
        for i in (1..64).step_by(5) {
            scanned[i] = (i as i16) * 3 - 20;
        }
        scanned[0] = -5;
        let symbols = encode_block(&scanned, -5);
        let (restored, dc) = decode_block(&symbols).unwrap();
        assert_eq!(dc, -5);
        assert_eq!(restored, scanned);
    }
}
