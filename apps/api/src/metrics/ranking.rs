use crate::errors::ScoringError;
use crate::metrics::{check_lengths, RelevanceThreshold};

/// Indices ordered by `scores` descending. Stable: exact ties keep input order.
pub fn descending_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}

fn dcg(order: &[usize], ground_truth: &[f64], k: usize) -> f64 {
    order
        .iter()
        .take(k)
        .enumerate()
        .map(|(rank, &idx)| (2f64.powf(ground_truth[idx]) - 1.0) / (rank as f64 + 2.0).log2())
        .sum()
}

/// `DCG@k / IDCG@k` with gain `2^rel − 1`; 0.0 when nothing is relevant.
pub fn ndcg_at_k(predicted: &[f64], ground_truth: &[f64], k: usize) -> Result<f64, ScoringError> {
    check_lengths(predicted, ground_truth)?;

    let idcg = dcg(&descending_order(ground_truth), ground_truth, k);
    if idcg == 0.0 {
        return Ok(0.0);
    }
    Ok(dcg(&descending_order(predicted), ground_truth, k) / idcg)
}

fn relevant_in_top_k(
    predicted: &[f64],
    ground_truth: &[f64],
    k: usize,
    threshold: RelevanceThreshold,
) -> usize {
    descending_order(predicted)
        .into_iter()
        .take(k)
        .filter(|&idx| threshold.is_relevant(ground_truth[idx]))
        .count()
}

/// Relevant hits in the top `k`, divided by `k` (not by `min(k, N)`).
pub fn precision_at_k(
    predicted: &[f64],
    ground_truth: &[f64],
    k: usize,
    threshold: RelevanceThreshold,
) -> Result<f64, ScoringError> {
    check_lengths(predicted, ground_truth)?;
    if k == 0 {
        return Ok(0.0);
    }
    Ok(relevant_in_top_k(predicted, ground_truth, k, threshold) as f64 / k as f64)
}

pub fn recall_at_k(
    predicted: &[f64],
    ground_truth: &[f64],
    k: usize,
    threshold: RelevanceThreshold,
) -> Result<f64, ScoringError> {
    check_lengths(predicted, ground_truth)?;

    let total_relevant = ground_truth
        .iter()
        .filter(|&&label| threshold.is_relevant(label))
        .count();
    if total_relevant == 0 {
        return Ok(0.0);
    }
    Ok(relevant_in_top_k(predicted, ground_truth, k, threshold) as f64 / total_relevant as f64)
}

/// Fraction of pairs with different labels that the predicted ranking orders
/// correctly. Tied predictions fall back to input order.
pub fn pairwise_accuracy(predicted: &[f64], ground_truth: &[f64]) -> Result<f64, ScoringError> {
    check_lengths(predicted, ground_truth)?;

    let ranked: Vec<f64> = descending_order(predicted)
        .into_iter()
        .map(|idx| ground_truth[idx])
        .collect();

    let mut correct = 0usize;
    let mut total = 0usize;
    for i in 0..ranked.len() {
        for j in (i + 1)..ranked.len() {
            if ranked[i] == ranked[j] {
                continue;
            }
            total += 1;
            if ranked[i] > ranked[j] {
                correct += 1;
            }
        }
    }

    if total == 0 {
        return Ok(0.0);
    }
    Ok(correct as f64 / total as f64)
}
