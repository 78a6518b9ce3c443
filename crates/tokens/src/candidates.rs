use std::cmp::Ordering;

use crate::vocab::InvertedVocab;

/// Number of candidates listed in a token's hover panel.
pub const DEFAULT_TOP_N: usize = 7;

/// One ranked alternative for an output position.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// vocabulary index of the candidate
    pub index: usize,
    /// token text ("" when the index is not in the vocabulary)
    pub token: String,
    /// probability assigned at this position
    pub probability: f32,
    /// true when `probability` equals the maximum of the vector
    pub is_top_pick: bool,
}

/// Index and value of the highest probability. The lowest index wins on ties.
///
/// Returns `None` for an empty vector.
pub fn argmax(probs: &[f32]) -> Option<(usize, f32)> {
    probs
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, p)| match best {
            Some((_, top)) if p.total_cmp(&top) != Ordering::Greater => best,
            _ => Some((i, p)),
        })
}

// descending probability, then ascending index
fn by_rank(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}

/// The `n` most probable entries of `probs`, best first.
///
/// Returns exactly `min(n, probs.len())` candidates. Selection is partial
/// (`select_nth_unstable_by`) so only the head of the vector gets fully sorted.
/// If the maximum appears at several indices, each of them is marked as a top pick.
pub fn top_candidates(probs: &[f32], vocab: &InvertedVocab, n: usize) -> Vec<Candidate> {
    let Some((_, max)) = argmax(probs) else {
        return Vec::new();
    };
    let n = n.min(probs.len());
    if n == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(usize, f32)> = probs.iter().copied().enumerate().collect();
    if n < ranked.len() {
        ranked.select_nth_unstable_by(n - 1, by_rank);
        ranked.truncate(n);
    }
    ranked.sort_by(by_rank);

    ranked
        .into_iter()
        .map(|(index, probability)| Candidate {
            index,
            token: vocab.token(index).to_owned(),
            probability,
            is_top_pick: probability == max,
        })
        .collect()
}

/// Format a probability as a percentage with one decimal place, e.g. `80.0%`.
pub fn format_percent(probability: f32) -> String {
    format!("{:.1}%", probability * 100.0)
}
