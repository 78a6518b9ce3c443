#![forbid(unsafe_code)]

//! Plain-text rendering for the terminal client.

use tokens::TokenView;

use crate::controller::RequestState;

/// Shown while a request is outstanding.
pub const LOADING_LABEL: &str = "Translating...";
/// Shown when there are no tokens to display.
pub const PLACEHOLDER_LABEL: &str = "Translation";

/// Tokens joined with single spaces.
pub fn render_line(views: &[TokenView]) -> String {
    views
        .iter()
        .map(|v| v.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One token per line, each followed by its ranked candidates.
/// The top pick is marked with `*`.
pub fn render_candidates(views: &[TokenView]) -> String {
    let mut out = String::new();
    for view in views {
        out.push_str(&view.text);
        out.push('\n');
        for row in &view.candidates {
            let marker = if row.is_top_pick { '*' } else { ' ' };
            out.push_str(&format!("  {marker} {}\n", row.label));
        }
    }
    out
}

/// Text for the output pane in a given state.
pub fn render_state(state: &RequestState, top_n: usize, with_candidates: bool) -> String {
    match state {
        RequestState::Idle => PLACEHOLDER_LABEL.to_string(),
        RequestState::Loading => LOADING_LABEL.to_string(),
        RequestState::Failed(msg) => format!("Error: {msg}"),
        RequestState::Succeeded(t) if t.is_empty() => PLACEHOLDER_LABEL.to_string(),
        RequestState::Succeeded(t) => {
            let views = tokens::token_views(t, top_n);
            if with_candidates {
                render_candidates(&views)
            } else {
                render_line(&views)
            }
        }
    }
}
