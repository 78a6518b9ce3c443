use serde::{Deserialize, Serialize};

use crate::candidates::argmax;
use crate::filter::filter_special;
use crate::vocab::{InvertedVocab, Vocabulary};

/// Body of a predict request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// free text to translate
    pub input_text: String,
}

/// Body of a successful predict response.
///
/// `logits` holds one probability vector per output position. The values are
/// already normalised by the server; no softmax is applied here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// token -> index mapping
    pub vocab: Vocabulary,
    /// per-position probability vectors
    pub logits: Vec<Vec<f32>>,
}

/// A structurally invalid response.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ResponseError {
    /// A row's length differs from the first row's.
    #[error("ragged logits: position {position} has {found} entries, expected {expected}")]
    RaggedLogits {
        /// output position of the offending row
        position: usize,
        /// length of the first row
        expected: usize,
        /// length of the offending row
        found: usize,
    },
}

/// One displayed output position.
#[derive(Clone, Debug, PartialEq)]
pub struct TranslationToken {
    /// text of the argmax token
    pub token: String,
    /// full probability vector for this position
    pub probs: Vec<f32>,
}

/// Display-ready result of one prediction: the inverted vocabulary plus the
/// filtered token sequence. Replaced wholesale on every response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Translation {
    /// index -> token mapping used for candidate lookup
    pub vocab: InvertedVocab,
    /// tokens left after structural markers are removed
    pub tokens: Vec<TranslationToken>,
}

impl Translation {
    /// True when no token survived filtering.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl PredictionResponse {
    /// Check that every row has the same length.
    ///
    /// Rows shorter or longer than the vocabulary are tolerated: indices
    /// without a token resolve to "" during lookup.
    pub fn validate(&self) -> Result<(), ResponseError> {
        let Some(expected) = self.logits.first().map(Vec::len) else {
            return Ok(());
        };
        for (position, row) in self.logits.iter().enumerate() {
            if row.len() != expected {
                return Err(ResponseError::RaggedLogits {
                    position,
                    expected,
                    found: row.len(),
                });
            }
        }
        Ok(())
    }

    /// Validate, invert the vocabulary, take the argmax token at each
    /// position and drop structural markers.
    pub fn into_translation(self) -> Result<Translation, ResponseError> {
        self.validate()?;
        let vocab = self.vocab.invert();
        let tokens = self
            .logits
            .into_iter()
            .map(|probs| {
                let token = argmax(&probs)
                    .map(|(index, _)| vocab.token(index).to_owned())
                    .unwrap_or_default();
                TranslationToken { token, probs }
            })
            .collect();
        Ok(Translation {
            vocab,
            tokens: filter_special(tokens),
        })
    }
}
