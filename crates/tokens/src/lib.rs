#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Pure building blocks that turn a prediction response into displayable tokens.
//!
//! Nothing in this crate performs I/O. Given the same response, every
//! function returns the same output.
//!
//! Layout:
//! - `vocab.rs` - `Vocabulary` (token -> index, in server order) and its inverse
//! - `candidates.rs` - argmax and top-N candidate selection over a probability vector
//! - `filter.rs` - structural marker set and display-sequence filter
//! - `response.rs` - wire types and the response -> `Translation` pipeline
//! - `view.rs` - presentation model for one rendered token and its hover panel

/// Vocabulary mapping and its inversion.
pub mod vocab;
pub use vocab::{InvertedVocab, Vocabulary};
/// Argmax and top-N candidate selection.
pub mod candidates;
pub use candidates::{argmax, format_percent, top_candidates, Candidate, DEFAULT_TOP_N};
/// Structural token filter.
pub mod filter;
pub use filter::{filter_special, is_special, SPECIAL_TOKENS};
/// Wire types of the predict endpoint.
pub mod response;
pub use response::{PredictRequest, PredictionResponse, ResponseError, Translation, TranslationToken};
/// Presentation model for rendered tokens.
pub mod view;
pub use view::{token_view, token_views, CandidateRow, TokenView};
