use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use nipseek_scraper::{LookupResponse, SearchFilters};

use crate::middleware::RequestId;

use super::{map_scrape_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CompaniesQuery {
    pub nip: String,
    pub voivodeship: Option<String>,
    pub city: Option<String>,
    pub registry: Option<String>,
    pub page: Option<u32>,
}

impl CompaniesQuery {
    fn filters(&self) -> SearchFilters {
        SearchFilters {
            voivodeship: self.voivodeship.clone(),
            city: self.city.clone(),
            registry: self.registry.clone(),
            page: self.page,
        }
    }
}

/// `GET /api/v1/companies?nip=...` looks up companies for one identifier.
///
/// The response always contains every company found in the listing; contact
/// fields are empty where the detail view did not expose them or failed to
/// load.
pub(super) async fn lookup_company(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CompaniesQuery>,
) -> Result<Json<ApiResponse<LookupResponse>>, ApiError> {
    let response = state
        .pipeline
        .lookup(&query.nip, &query.filters())
        .await
        .map_err(|e| map_scrape_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: response,
        meta: ResponseMeta::new(req_id.0),
    }))
}
