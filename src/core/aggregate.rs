//! Pure aggregation functions over named (id-keyed) inputs.
//!
//! Each unit sees its peers through maps `peer id -> value`; these functions
//! reduce such a map against a weight map (and optionally a centroid map)
//! to a single scalar.

use crate::unit::{UnitId, WeightMap};

/// Steepness of the radial-basis similarity.
pub const RBF_GAIN: f32 = 10.0;

/// Σ `input[id] * weight[id]` over ids present in both maps.
///
/// With `normalize`, a nonzero sum is divided by Σ|weight| over *all* weighted
/// ids, matched or not. Empty `inputs` yields 0.
pub fn weighted_sum(inputs: &WeightMap, weights: &WeightMap, normalize: bool) -> f32 {
    if inputs.is_empty() {
        return 0.0;
    }

    let sum: f32 = weights
        .iter()
        .filter_map(|(id, w)| inputs.get(id).map(|x| x * w))
        .sum();

    if normalize && sum != 0.0 {
        let norm: f32 = weights.values().map(|w| w.abs()).sum();
        // A nonzero sum implies a nonzero weight; the guard covers NaN weights.
        if norm > 0.0 {
            return sum / norm;
        }
    }
    sum
}

/// Similarity in (0, 1] between `inputs` and a stored centroid.
///
/// `exp(-10 * Σ |input - centroid| * weight)` over the ids of `inputs`.
/// A missing centroid counts as 0.0, a missing weight as 0.0 (ignored input).
/// Empty `inputs` yields 0, not 1: no evidence is not a match.
pub fn radial_basis(inputs: &WeightMap, centroids: &WeightMap, weights: &WeightMap) -> f32 {
    if inputs.is_empty() {
        return 0.0;
    }

    let deviation: f32 = inputs
        .iter()
        .map(|(id, x)| {
            let c = centroids.get(id).copied().unwrap_or(0.0);
            let w = weights.get(id).copied().unwrap_or(0.0);
            (x - c).abs() * w
        })
        .sum();

    (-RBF_GAIN * deviation).exp()
}

/// 1.0 when `inputs` has exactly the keys and values of `weights`, else 0.0.
///
/// An empty weight map never matches.
pub fn exact_match(inputs: &WeightMap, weights: &WeightMap) -> f32 {
    if weights.is_empty() {
        return 0.0;
    }
    if inputs == weights {
        1.0
    } else {
        0.0
    }
}

#[inline]
pub fn sigmoid(x: f32, k: f32, x0: f32) -> f32 {
    1.0 / (1.0 + (-k * (x - x0)).exp())
}

/// Roulette-wheel selection over `(id, activity)` pairs.
///
/// `draw` is a uniform sample in [0, 1). The draw is scaled by the total
/// activity and each candidate's activity is subtracted in order until the
/// remainder goes negative. When every activity is zero the pick is uniform.
pub fn prob_sel(candidates: &[(UnitId, f32)], draw: f32) -> Option<UnitId> {
    let last = candidates.last()?.0;

    let total: f32 = candidates.iter().map(|&(_, a)| a.max(0.0)).sum();
    if total <= 0.0 {
        let idx = ((draw * candidates.len() as f32) as usize).min(candidates.len() - 1);
        return Some(candidates[idx].0);
    }

    let mut r = draw * total;
    for &(id, activity) in candidates {
        r -= activity.max(0.0);
        if r < 0.0 {
            return Some(id);
        }
    }
    // draw * total rounded up to total.
    Some(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(UnitId, f32)]) -> WeightMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn empty_inputs_are_no_signal() {
        let w = map(&[(0, 1.0), (1, -2.0)]);
        assert_eq!(weighted_sum(&WeightMap::new(), &w, false), 0.0);
        assert_eq!(weighted_sum(&WeightMap::new(), &w, true), 0.0);
        assert_eq!(radial_basis(&WeightMap::new(), &w, &w), 0.0);
        assert_eq!(radial_basis(&WeightMap::new(), &WeightMap::new(), &WeightMap::new()), 0.0);
    }

    #[test]
    fn weighted_sum_uses_only_shared_ids() {
        let inputs = map(&[(0, 0.5), (2, 1.0), (7, 9.0)]);
        let weights = map(&[(0, 2.0), (1, 3.0), (2, -1.0)]);
        assert!((weighted_sum(&inputs, &weights, false) - 0.0).abs() < 1e-6);

        let inputs = map(&[(0, 1.0)]);
        assert!((weighted_sum(&inputs, &weights, false) - 2.0).abs() < 1e-6);
        // Normalized by |2| + |3| + |-1| even though only id 0 matched.
        assert!((weighted_sum(&inputs, &weights, true) - 2.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn zero_weight_sum_skips_normalization() {
        let inputs = map(&[(0, 1.0)]);
        let weights = map(&[(0, 0.0)]);
        assert_eq!(weighted_sum(&inputs, &weights, true), 0.0);
    }

    #[test]
    fn radial_basis_is_one_on_centroid_and_decays() {
        let weights = map(&[(0, 1.0), (1, 1.0)]);
        let centroids = map(&[(0, 1.0), (1, 0.0)]);

        let on = map(&[(0, 1.0), (1, 0.0)]);
        assert_eq!(radial_basis(&on, &centroids, &weights), 1.0);

        let near = map(&[(0, 0.9), (1, 0.0)]);
        let far = map(&[(0, 0.5), (1, 0.5)]);
        let s_near = radial_basis(&near, &centroids, &weights);
        let s_far = radial_basis(&far, &centroids, &weights);
        assert!((s_near - (-1.0f32).exp()).abs() < 1e-5);
        assert!(s_far < s_near);
        assert!(s_far > 0.0);
    }

    #[test]
    fn exact_match_requires_same_keys_and_values() {
        let w = map(&[(0, 1.0), (1, 0.0)]);
        assert_eq!(exact_match(&map(&[(0, 1.0), (1, 0.0)]), &w), 1.0);
        assert_eq!(exact_match(&map(&[(0, 1.0), (1, 1.0)]), &w), 0.0);
        assert_eq!(exact_match(&map(&[(0, 1.0)]), &w), 0.0);
        assert_eq!(exact_match(&map(&[(0, 1.0), (1, 0.0), (2, 0.0)]), &w), 0.0);
        assert_eq!(exact_match(&WeightMap::new(), &WeightMap::new()), 0.0);
    }

    #[test]
    fn sigmoid_midpoint_and_symmetry() {
        assert!((sigmoid(0.5, 10.0, 0.5) - 0.5).abs() < 1e-6);
        let lo = sigmoid(0.3, 10.0, 0.5);
        let hi = sigmoid(0.7, 10.0, 0.5);
        assert!((lo + hi - 1.0).abs() < 1e-6);
        assert!(sigmoid(0.8, 10.0, 0.5) > 0.95);
    }

    #[test]
    fn prob_sel_walks_candidates_in_order() {
        let c = [(4, 0.25), (5, 0.5), (6, 0.25)];
        assert_eq!(prob_sel(&c, 0.0), Some(4));
        assert_eq!(prob_sel(&c, 0.2), Some(4));
        assert_eq!(prob_sel(&c, 0.3), Some(5));
        assert_eq!(prob_sel(&c, 0.74), Some(5));
        assert_eq!(prob_sel(&c, 0.8), Some(6));
        assert_eq!(prob_sel(&c, 0.999_999), Some(6));
    }

    #[test]
    fn prob_sel_uniform_when_all_silent() {
        let c = [(1, 0.0), (2, 0.0), (3, 0.0), (9, 0.0)];
        assert_eq!(prob_sel(&c, 0.0), Some(1));
        assert_eq!(prob_sel(&c, 0.26), Some(2));
        assert_eq!(prob_sel(&c, 0.99), Some(9));
        assert_eq!(prob_sel(&[], 0.5), None);
    }
}
