//! HTTP request handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    Form,
};
use chrono::Datelike;
use tracing::debug;

use crate::valuation::{appraise, Valuation, ValuationForm};

use super::page::{self, PageContext};
use super::state::AppState;

fn render(state: &AppState, valuation: Option<&Valuation>) -> Html<String> {
    Html(page::render(&PageContext {
        valuation,
        stats: &state.stats,
        chart_json: &state.chart_json,
        year: chrono::Local::now().year(),
    }))
}

/// Idle page
pub async fn serve_index(State(state): State<Arc<AppState>>) -> Html<String> {
    render(&state, None)
}

/// Value a submitted form, falling back to the idle page on any failure
pub async fn valuate(
    State(state): State<Arc<AppState>>,
    form: std::result::Result<Form<ValuationForm>, FormRejection>,
) -> Html<String> {
    let outcome = form
        .map_err(|rejection| rejection.body_text())
        .and_then(|Form(form)| {
            appraise(state.predictor.as_ref(), &form).map_err(|e| e.to_string())
        });

    match outcome {
        Ok(valuation) => {
            debug!(
                prediction = valuation.prediction,
                lower = valuation.lower,
                upper = valuation.upper,
                "Valuation rendered"
            );
            render(&state, Some(&valuation))
        }
        Err(reason) => {
            debug!(reason = %reason, "Submission discarded, rendering idle page");
            render(&state, None)
        }
    }
}
