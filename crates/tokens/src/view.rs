use crate::candidates::{format_percent, top_candidates};
use crate::response::{Translation, TranslationToken};
use crate::vocab::InvertedVocab;

/// One row of a token's hover panel.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateRow {
    /// `token: 80.0%`
    pub label: String,
    /// highlight weight in [0,1]
    pub intensity: f32,
    /// render with emphasis
    pub is_top_pick: bool,
}

/// Everything needed to draw one output token and its hover panel.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenView {
    /// displayed token text
    pub text: String,
    /// highlight weight in [0,1]: probability of the top candidate
    pub intensity: f32,
    /// ranked alternatives, best first
    pub candidates: Vec<CandidateRow>,
}

fn clamp_unit(p: f32) -> f32 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Build the view of a single token with its `top_n` candidates.
pub fn token_view(token: &TranslationToken, vocab: &InvertedVocab, top_n: usize) -> TokenView {
    let candidates = top_candidates(&token.probs, vocab, top_n);
    let intensity = candidates.first().map_or(0.0, |c| clamp_unit(c.probability));
    TokenView {
        text: token.token.clone(),
        intensity,
        candidates: candidates
            .into_iter()
            .map(|c| CandidateRow {
                label: format!("{}: {}", c.token, format_percent(c.probability)),
                intensity: clamp_unit(c.probability),
                is_top_pick: c.is_top_pick,
            })
            .collect(),
    }
}

/// Views for every token of a translation, in display order.
pub fn token_views(translation: &Translation, top_n: usize) -> Vec<TokenView> {
    translation
        .tokens
        .iter()
        .map(|t| token_view(t, &translation.vocab, top_n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::Vocabulary;

    fn vocab() -> InvertedVocab {
        [("a", 0), ("b", 1), ("<|bos|>", 2)]
            .into_iter()
            .collect::<Vocabulary>()
            .invert()
    }

    #[test]
    fn view_lists_candidates_with_percentages() {
        let token = TranslationToken {
            token: "b".into(),
            probs: vec![0.1, 0.8, 0.1],
        };
        let view = token_view(&token, &vocab(), 2);
        assert_eq!(view.text, "b");
        assert!((view.intensity - 0.8).abs() < 1e-6);
        let labels: Vec<&str> = view.candidates.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["b: 80.0%", "a: 10.0%"]);
        assert!(view.candidates[0].is_top_pick);
        assert!(!view.candidates[1].is_top_pick);
    }

    #[test]
    fn intensity_is_clamped() {
        let token = TranslationToken {
            token: "a".into(),
            probs: vec![1.5, 0.0, 0.0],
        };
        assert_eq!(token_view(&token, &vocab(), 7).intensity, 1.0);
    }

    #[test]
    fn empty_probs_have_no_candidates() {
        let token = TranslationToken {
            token: String::new(),
            probs: Vec::new(),
        };
        let view = token_view(&token, &vocab(), 7);
        assert!(view.candidates.is_empty());
        assert_eq!(view.intensity, 0.0);
    }

    #[test]
    fn views_follow_translation_order() {
        let translation = Translation {
            vocab: vocab(),
            tokens: vec![
                TranslationToken {
                    token: "a".into(),
                    probs: vec![0.9, 0.05, 0.05],
                },
                TranslationToken {
                    token: "b".into(),
                    probs: vec![0.2, 0.7, 0.1],
                },
            ],
        };
        let texts: Vec<String> = token_views(&translation, 3).into_iter().map(|v| v.text).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }
}
