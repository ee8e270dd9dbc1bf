//! Bitonic sorting network, one pass per `(stage, sub_stage)`.
//!
//! Every pass is a gather: element `a` compares itself with partner
//! `a ^ (1 << sub_stage)` and keeps the minimum or maximum. The GPU runs one
//! invocation per element and a full-screen dispatch per pass.

use crate::error::SortError;
use crate::ping_pong::PingPong;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortPass {
    pub stage: u32,
    pub sub_stage: u32,
}

impl SortPass {
    pub fn partner(&self, index: usize) -> usize {
        index ^ (1 << self.sub_stage)
    }

    /// Blocks of `1 << stage` elements alternate between ascending and descending.
    pub fn ascending(&self, index: usize) -> bool {
        index & (1 << self.stage) == 0
    }

    pub fn keeps_min(&self, index: usize) -> bool {
        (index < self.partner(index)) == self.ascending(index)
    }
}

fn log2(len: usize) -> Result<u32, SortError> {
    if !len.is_power_of_two() {
        return Err(SortError::NotPowerOfTwo(len));
    }
    Ok(len.trailing_zeros())
}

pub fn pass_count(len: usize) -> Result<usize, SortError> {
    let stages = log2(len)? as usize;
    Ok(stages * (stages + 1) / 2)
}

pub fn schedule(len: usize) -> Result<Vec<SortPass>, SortError> {
    let stages = log2(len)?;
    Ok((1..=stages)
        .flat_map(|stage| {
            (0..stage)
                .rev()
                .map(move |sub_stage| SortPass { stage, sub_stage })
        })
        .collect())
}

pub fn apply_pass<T: Ord + Copy>(input: &[T], output: &mut [T], pass: SortPass) {
    for (index, out) in output.iter_mut().enumerate() {
        let own = input[index];
        let other = input[pass.partner(index)];
        *out = if pass.keeps_min(index) {
            own.min(other)
        } else {
            own.max(other)
        };
    }
}

/// Run the whole network on the CPU through a ping-pong pair, like the GPU does.
pub fn sort_in_place<T: Ord + Copy>(data: &mut Vec<T>) -> Result<(), SortError> {
    let passes = schedule(data.len())?;
    let mut buffers = PingPong::new(data.clone(), data.clone());
    for pass in passes {
        let (input, output) = buffers.split();
        apply_pass(input, output, pass);
        buffers.swap();
    }
    *data = buffers.into_read();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn sorts_eight_elements() {
        let mut data = vec![7, 3, 6, 0, 5, 1, 4, 2];
        sort_in_place(&mut data).unwrap();
        assert_eq!(data, (0..8).collect::<Vec<_>>());
    }

    #[test_case(1, 0)]
    #[test_case(2, 1)]
    #[test_case(8, 6)]
    #[test_case(4096, 78)]
    #[test_case(16384, 105)]
    fn pass_counts(len: usize, passes: usize) {
        assert_eq!(pass_count(len).unwrap(), passes);
        assert_eq!(schedule(len).unwrap().len(), passes);
    }

    #[test]
    fn schedule_order() {
        let passes: Vec<_> = schedule(8)
            .unwrap()
            .into_iter()
            .map(|p| (p.stage, p.sub_stage))
            .collect();
        assert_eq!(passes, vec![(1, 0), (2, 1), (2, 0), (3, 2), (3, 1), (3, 0)]);
    }

    #[test_case(0)]
    #[test_case(3)]
    #[test_case(100)]
    fn rejects_non_power_of_two(len: usize) {
        assert_eq!(schedule(len), Err(SortError::NotPowerOfTwo(len)));
        assert!(sort_in_place(&mut vec![0u8; len]).is_err());
    }

    proptest! {
        #[test]
        fn matches_std_sort(exp in 0u32..10, seed in proptest::collection::vec(any::<u32>(), 1024)) {
            let len = 1usize << exp;
            let mut data: Vec<(u32, u32)> = seed[..len].iter().enumerate().map(|(i, v)| (v % 17, i as u32)).collect();
            let mut expected = data.clone();
            expected.sort();
            sort_in_place(&mut data).unwrap();
            prop_assert_eq!(data, expected);
        }
    }
}
