/// Select an index from a discrete distribution given a uniform sample
///
/// Weights are normalized by their sum and the smallest index whose cumulative
/// probability reaches `r` is returned. Entries with a zero (or negative) weight can
/// never be selected, so `r = 0.0` yields the first positive weight and `r` just below
/// one yields the last. An all-zero distribution is treated as uniform.
pub fn weighted_index(weights: &[f64], r: f64) -> usize {
    let total: f64 = weights.iter().map(|&w| w.max(0.0)).sum();

    if total <= 0.0 {
        if weights.is_empty() {
            return 0;
        }
        let uniform = (r.clamp(0.0, 1.0) * weights.len() as f64).ceil() as usize;
        return uniform.saturating_sub(1).min(weights.len() - 1);
    }

    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (i, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight / total;
        last_positive = i;
        if r <= cumulative {
            return i;
        }
    }

    // Rounding can leave the cumulative sum a hair below one
    last_positive
}

/// Shannon entropy of a weighted set given its sum of weights and sum of `w·ln(w)`
///
/// `H = ln(Σw) − Σ(w·ln w) / Σw`. An empty or degenerate set has zero entropy.
pub fn entropy_from_sums(sum_of_weights: f64, sum_of_weight_log_weights: f64) -> f64 {
    if sum_of_weights <= 0.0 {
        return 0.0;
    }
    sum_of_weights.ln() - sum_of_weight_log_weights / sum_of_weights
}

/// `w·ln(w)`, the per-pattern term of the entropy accumulators
pub fn weight_log_weight(weight: f64) -> f64 {
    weight * weight.ln()
}
