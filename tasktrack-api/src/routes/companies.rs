/// Company progress endpoint
///
/// ```text
/// GET /companies
/// ```
///
/// ```json
/// {
///   "companies": [
///     { "id": 1, "name": "Acme", "total_completed_tasks": 3 }
///   ]
/// }
/// ```
///
/// Companies with no completed tasks are listed with a count of 0.

use axum::{extract::State, Json};
use serde::Serialize;
use tasktrack_shared::models::company::{Company, CompanyProgress};

use crate::{app::AppState, error::ApiResult};

#[derive(Debug, Serialize)]
pub struct CompaniesResponse {
    pub companies: Vec<CompanyProgress>,
}

pub async fn company_progress(State(state): State<AppState>) -> ApiResult<Json<CompaniesResponse>> {
    let companies = Company::progress(&state.db).await?;
    Ok(Json(CompaniesResponse { companies }))
}
