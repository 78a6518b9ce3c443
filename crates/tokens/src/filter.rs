use crate::response::TranslationToken;

/// Structural markers that frame the output sequence and delimit its fields.
/// They never reach the display.
pub const SPECIAL_TOKENS: [&str; 12] = [
    "<|bos|>",
    "<|eos|>",
    "<|pad|>",
    "<|unk|>",
    "<general>",
    "</general>",
    "<copyright>",
    "</copyright>",
    "<character>",
    "</character>",
    "<translation>",
    "</translation>",
];

/// True when `token` is one of the structural markers.
pub fn is_special(token: &str) -> bool {
    SPECIAL_TOKENS.contains(&token)
}

/// Drop positions whose token is a structural marker, keeping order.
///
/// Only the display sequence shrinks; each kept token's `probs` is untouched.
pub fn filter_special(tokens: Vec<TranslationToken>) -> Vec<TranslationToken> {
    tokens.into_iter().filter(|t| !is_special(&t.token)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quickcheck::quickcheck;

    const POOL: [&str; 6] = ["1girl", "<|eos|>", "solo", "<general>", "", "</translation>"];

    fn tok(token: &str) -> TranslationToken {
        TranslationToken {
            token: token.to_owned(),
            probs: vec![0.25, 0.75],
        }
    }

    fn from_picks(picks: &[u8]) -> Vec<TranslationToken> {
        picks
            .iter()
            .map(|p| tok(POOL[usize::from(*p) % POOL.len()]))
            .collect()
    }

    #[test]
    fn every_marker_is_special() {
        for marker in SPECIAL_TOKENS {
            assert!(is_special(marker));
        }
        assert!(!is_special("b"));
        assert!(!is_special("<bos>"));
    }

    #[test]
    fn drops_markers_keeps_probs() {
        let kept = filter_special(vec![tok("<translation>"), tok("smile"), tok("<|eos|>")]);
        assert_eq!(kept, vec![tok("smile")]);
        assert_eq!(kept[0].probs, vec![0.25, 0.75]);
    }

    quickcheck! {
        fn keeps_relative_order(picks: Vec<u8>) -> bool {
            let input = from_picks(&picks);
            let expected: Vec<String> = input
                .iter()
                .filter(|t| !is_special(&t.token))
                .map(|t| t.token.clone())
                .collect();
            let kept: Vec<String> = filter_special(input).into_iter().map(|t| t.token).collect();
            kept == expected
        }
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(picks in proptest::collection::vec(any::<u8>(), 0..64)) {
            let once = filter_special(from_picks(&picks));
            let twice = filter_special(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
