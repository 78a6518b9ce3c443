#![forbid(unsafe_code)]

//! Deterministic stand-in for the translation model, served by `translate-server`.
//!
//! Each recognised input word becomes one content tag, framed by the same
//! structural markers the real model emits. Scores are seeded noise plus a
//! boost on the chosen tag, softmax-normalised per position.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokens::{PredictionResponse, Vocabulary, SPECIAL_TOKENS};

/// Content tags appended to the vocabulary after the structural markers.
pub const CONTENT_TAGS: &[&str] = &[
    "1girl", "1boy", "solo", "smile", "long_hair", "short_hair", "blue_eyes", "red_eyes",
    "blonde_hair", "black_hair", "hat", "dress", "school_uniform", "outdoors", "indoors", "sky",
    "cloud", "tree", "flower", "cat", "dog", "sitting", "standing", "looking_at_viewer",
    "open_mouth", "blush", "night", "rain", "sword",
];

// input word -> content tag
const WORD_TAGS: &[(&str, &str)] = &[
    ("girl", "1girl"),
    ("woman", "1girl"),
    ("boy", "1boy"),
    ("man", "1boy"),
    ("alone", "solo"),
    ("solo", "solo"),
    ("smile", "smile"),
    ("smiling", "smile"),
    ("long", "long_hair"),
    ("short", "short_hair"),
    ("blue", "blue_eyes"),
    ("red", "red_eyes"),
    ("blonde", "blonde_hair"),
    ("black", "black_hair"),
    ("hat", "hat"),
    ("dress", "dress"),
    ("uniform", "school_uniform"),
    ("outside", "outdoors"),
    ("outdoors", "outdoors"),
    ("inside", "indoors"),
    ("sky", "sky"),
    ("cloud", "cloud"),
    ("clouds", "cloud"),
    ("tree", "tree"),
    ("trees", "tree"),
    ("flower", "flower"),
    ("flowers", "flower"),
    ("cat", "cat"),
    ("dog", "dog"),
    ("sitting", "sitting"),
    ("standing", "standing"),
    ("looking", "looking_at_viewer"),
    ("mouth", "open_mouth"),
    ("blushing", "blush"),
    ("night", "night"),
    ("rain", "rain"),
    ("sword", "sword"),
];

const TARGET_BOOST: f32 = 6.0;

// Scores -> probabilities. An all -inf row comes back unnormalised.
fn softmax(scores: Vec<f32>) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.into_iter().map(|s| (s - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    if total > 0.0 {
        exps.into_iter().map(|e| e / total).collect()
    } else {
        exps
    }
}

/// Split on whitespace and punctuation, lowercased.
pub fn tokenize(s: &str) -> Vec<String> {
    s.split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_lowercase())
        .collect()
}

fn text_seed(text: &str) -> u64 {
    let mut seed: u64 = 0x9e3779b97f4a7c15u64;
    for &b in text.as_bytes() {
        seed = seed.wrapping_mul(31).wrapping_add(u64::from(b));
    }
    seed
}

/// Toy model with a fixed vocabulary.
#[derive(Clone, Debug)]
pub struct EchoModel {
    vocab: Vocabulary,
    seed: u64,
}

impl EchoModel {
    /// Build the model; `seed` perturbs the noise of every response.
    pub fn new(seed: u64) -> Self {
        let vocab = SPECIAL_TOKENS
            .iter()
            .chain(CONTENT_TAGS.iter())
            .enumerate()
            .map(|(i, t)| (*t, i))
            .collect();
        Self { vocab, seed }
    }

    /// The vocabulary sent with every response.
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    fn index(&self, token: &str) -> Option<usize> {
        self.vocab.get(token)
    }

    /// Output positions for `input_text`, as vocabulary indices.
    fn plan(&self, input_text: &str) -> Vec<usize> {
        let mut tags: Vec<&str> = Vec::new();
        for word in tokenize(input_text) {
            let tag = WORD_TAGS.iter().find(|(w, _)| *w == word).map(|(_, t)| *t);
            if let Some(tag) = tag {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
        }

        let mut plan = Vec::with_capacity(tags.len() + 5);
        plan.extend(self.index("<translation>"));
        plan.extend(self.index("<general>"));
        plan.extend(tags.into_iter().filter_map(|t| self.index(t)));
        plan.extend(self.index("</general>"));
        plan.extend(self.index("</translation>"));
        plan.extend(self.index("<|eos|>"));
        plan
    }

    fn position_probs(&self, target: usize, rng: &mut ChaCha8Rng) -> Vec<f32> {
        let mut scores: Vec<f32> = (0..self.vocab.len()).map(|_| rng.gen_range(-1.0..1.0)).collect();
        if let Some(s) = scores.get_mut(target) {
            *s += TARGET_BOOST;
        }
        softmax(scores)
    }

    /// Produce a response in the predict wire format. Same input, same output.
    pub fn predict(&self, input_text: &str) -> PredictionResponse {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed ^ text_seed(input_text));
        let logits = self
            .plan(input_text)
            .into_iter()
            .map(|target| self.position_probs(target, &mut rng))
            .collect();
        PredictionResponse {
            vocab: self.vocab.clone(),
            logits,
        }
    }
}

impl Default for EchoModel {
    fn default() -> Self {
        Self::new(0)
    }
}
