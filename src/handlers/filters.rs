use axum::Json;
use serde::Serialize;

use crate::catalog;
use crate::utils::timing::RequestTimer;

#[derive(Debug, Serialize)]
pub struct FilterEntry {
    name: &'static str,
    description: &'static str,
    status: bool,
}

#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    filters: Vec<FilterEntry>,
}

pub async fn list_filters() -> Json<FiltersResponse> {
    let _timer = RequestTimer::start("filters/list");
    let filters = catalog::FILTERS
        .iter()
        .map(|entry| FilterEntry {
            name: entry.name,
            description: entry.description,
            status: entry.enabled,
        })
        .collect();
    Json(FiltersResponse { filters })
}
