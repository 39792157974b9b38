/// SplitMix64 stream for reproducible key-list sweeps.
///
/// Every draw advances a Weyl counter and mixes it, so seed `0` is as good as
/// any other and neighbouring seeds give unrelated streams.
#[derive(Clone, Debug)]
pub struct SweepRng {
    counter: u64,
}

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

impl SweepRng {
    pub fn new(seed: u64) -> Self {
        Self { counter: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.counter = self.counter.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.counter;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform draw in `0..bound` by multiply-high reduction. `bound == 0` yields 0.
    pub fn below(&mut self, bound: usize) -> usize {
        ((u128::from(self.next_u64()) * bound as u128) >> 64) as usize
    }

    /// Uniform draw in `lo..=hi`.
    pub fn between(&mut self, lo: usize, hi: usize) -> usize {
        assert!(lo <= hi, "empty range: {lo}..={hi}");
        lo + self.below(hi - lo + 1)
    }

    /// True about once every `n` draws.
    pub fn one_in(&mut self, n: usize) -> bool {
        n > 0 && self.below(n) == 0
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            items.swap(i, self.below(i + 1));
        }
    }

    /// Keys of `keys` that survive a `1/drop_one_in` removal, in their original order.
    pub fn survivors(&mut self, keys: &[String], drop_one_in: usize) -> Vec<String> {
        keys.iter()
            .filter(|_| !self.one_in(drop_one_in))
            .cloned()
            .collect()
    }
}
