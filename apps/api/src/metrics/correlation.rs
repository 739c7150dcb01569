use crate::errors::ScoringError;
use crate::metrics::check_lengths;

fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Kendall tau-b: `(C − D) / √((n₀ − n₁)(n₀ − n₂))`, where n₁/n₂ count pairs
/// tied in either array. 0.0 when either side is constant or N < 2.
pub fn kendall_tau(predicted: &[f64], ground_truth: &[f64]) -> Result<f64, ScoringError> {
    check_lengths(predicted, ground_truth)?;

    let n = predicted.len();
    let (mut concordant, mut discordant) = (0i64, 0i64);
    let (mut tied_predicted, mut tied_truth) = (0i64, 0i64);
    let mut pairs = 0i64;

    for i in 0..n {
        for j in (i + 1)..n {
            pairs += 1;
            let a = sign(predicted[i] - predicted[j]);
            let b = sign(ground_truth[i] - ground_truth[j]);
            if a == 0 {
                tied_predicted += 1;
            }
            if b == 0 {
                tied_truth += 1;
            }
            match a * b {
                1 => concordant += 1,
                -1 => discordant += 1,
                _ => {}
            }
        }
    }

    let denominator = (((pairs - tied_predicted) * (pairs - tied_truth)) as f64).sqrt();
    if denominator == 0.0 {
        return Ok(0.0);
    }
    Ok((concordant - discordant) as f64 / denominator)
}

/// 1-based ranks; tied values share the mean of the ranks they span.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1 ..= end
        let rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        cov / denominator
    }
}

/// Spearman's rho as the Pearson correlation of average ranks.
/// 0.0 when either side is constant or N < 2.
pub fn spearman(predicted: &[f64], ground_truth: &[f64]) -> Result<f64, ScoringError> {
    check_lengths(predicted, ground_truth)?;
    if predicted.len() < 2 {
        return Ok(0.0);
    }
    Ok(pearson(&average_ranks(predicted), &average_ranks(ground_truth)))
}

pub fn mean_absolute_error(predicted: &[f64], ground_truth: &[f64]) -> Result<f64, ScoringError> {
    check_lengths(predicted, ground_truth)?;
    if predicted.is_empty() {
        return Ok(0.0);
    }
    let total: f64 = predicted
        .iter()
        .zip(ground_truth)
        .map(|(p, g)| (p - g).abs())
        .sum();
    Ok(total / predicted.len() as f64)
}
