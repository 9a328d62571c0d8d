use std::collections::HashSet;

use corr_core::momentum::{GevpBlock, Momentum};

/// All three-momenta with components in `[-p_max, p_max]` and `|k|² <= p_max`,
/// in lexicographic order.
pub fn single_momenta(p_max: i32) -> Vec<Momentum> {
    let range = -p_max..=p_max;
    let mut momenta = Vec::new();
    for x in range.clone() {
        for y in range.clone() {
            for z in range.clone() {
                let k = Momentum::new(x, y, z);
                if k.abs2() <= p_max {
                    momenta.push(k);
                }
            }
        }
    }
    momenta
}

/// Ordered pairs `(k1, k2)` with `|k1 + k2|² == p`.
///
/// At zero total momentum the pair of identical momenta (both particles at
/// rest) is excluded.
pub fn admissible_pairs(p: i32, p_max: i32) -> Vec<(Momentum, Momentum)> {
    let momenta = single_momenta(p_max);
    let mut pairs = Vec::new();
    for k1 in &momenta {
        for k2 in &momenta {
            if (*k1 + *k2).abs2() != p {
                continue;
            }
            if p == 0 && k1 == k2 {
                continue;
            }
            pairs.push((*k1, *k2));
        }
    }
    pairs
}

/// GEVP blocks for total momentum `p`: distinct `(|k1|², |k2|²)` pairs in
/// order of first appearance, restricted to `|k1|² >= |k2|²`.
pub fn gevp_blocks(p: i32, p_max: i32) -> Vec<GevpBlock> {
    let mut seen = HashSet::new();
    admissible_pairs(p, p_max)
        .into_iter()
        .map(|(k1, k2)| (k1.abs2(), k2.abs2()))
        .filter(|pair| seen.insert(*pair))
        .filter(|(first, second)| first >= second)
        .map(|(first, second)| GevpBlock::new(first, second))
        .collect()
}
