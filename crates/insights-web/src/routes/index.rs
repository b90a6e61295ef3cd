use axum::{Router, extract::State, response::Html, routing::get};

use crate::errors::AppError;
use crate::render::FormValues;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let page = state.pages.index(&FormValues::default(), None)?;
    Ok(Html(page))
}
