use axum::{extract::State, Json};

use crate::{api::error::ApiError, state::AppState};

/// GET /api/getprovinces - Distinct province names of the primary dataset
pub async fn get_provinces(State(st): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let catalog = st
        .catalog
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("province catalog not loaded".to_string()))?;
    Ok(Json(catalog.provinces().to_vec()))
}
