//! Weight computation for the final picks
//!
//! All functions return one weight per input, in input order.

/// Confidence-weighted shares with min-max normalization
///
/// With one pick, or when every pick has the same confidence, each pick
/// gets `1/N`. Otherwise each confidence is rescaled to
/// `(c - min) / (max - min)` and the weights are those scores over their
/// sum, so the least confident pick gets exactly zero.
pub fn confidence_weights(confidences: &[u8]) -> Vec<f64> {
    let (Some(&min), Some(&max)) = (confidences.iter().min(), confidences.iter().max()) else {
        return Vec::new();
    };

    let shares: Vec<f64> = if min == max {
        vec![1.0; confidences.len()]
    } else {
        let range = f64::from(max - min);
        confidences
            .iter()
            .map(|&c| f64::from(c - min) / range)
            .collect()
    };

    normalize_with_residual(&shares)
}

/// Equal shares of `1/N`
pub fn equal_weights(count: usize) -> Vec<f64> {
    normalize_with_residual(&vec![1.0; count])
}

/// Turn non-negative shares into weights that sum to exactly 1.0
///
/// Every weight but the last is `share / total`; the last one takes the
/// residual `1.0 - sum(previous)` so rounding error never leaks into the
/// total. Returns all zeros when the shares sum to zero.
pub fn normalize_with_residual(shares: &[f64]) -> Vec<f64> {
    let total: f64 = shares.iter().sum();
    if shares.is_empty() || total <= 0.0 {
        return vec![0.0; shares.len()];
    }

    let mut weights = Vec::with_capacity(shares.len());
    let mut assigned = 0.0;
    for share in &shares[..shares.len() - 1] {
        let weight = share / total;
        assigned += weight;
        weights.push(weight);
    }
    weights.push((1.0 - assigned).max(0.0));
    weights
}

/// Clamp every weight to `cap`; returns the total weight removed
pub fn apply_position_cap(weights: &mut [f64], cap: f64) -> f64 {
    let cap = cap.max(0.0);
    let mut removed = 0.0;
    for weight in weights.iter_mut() {
        if *weight > cap {
            removed += *weight - cap;
            *weight = cap;
        }
    }
    removed
}
