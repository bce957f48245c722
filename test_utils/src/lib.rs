use std::sync::Once;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

static LOGGER: Once = Once::new();

/// Installs `pretty_env_logger` once per test binary, filtered by `RUST_LOG`.
pub fn install_logger() {
    LOGGER.call_once(|| {
        let _ = pretty_env_logger::try_init();
    });
}

pub fn ascending(count: usize) -> Vec<u32> {
    (0..count as u32).collect()
}

pub fn descending(count: usize) -> Vec<u32> {
    (0..count as u32).rev().collect()
}

/// A permutation of `0..count`, reproducible through `seed`.
pub fn shuffled(count: usize, seed: u64) -> Vec<u32> {
    let mut keys = ascending(count);
    keys.shuffle(&mut StdRng::seed_from_u64(seed));
    keys
}

/// `count` keys drawn from `0..range`, duplicates included.
pub fn random_with_duplicates(count: usize, range: u32, seed: u64) -> Vec<u32> {
    use rand::Rng;

    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(0..range)).collect()
}
