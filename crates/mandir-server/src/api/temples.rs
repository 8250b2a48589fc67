//! `/api/temples` routes: list, detail and search.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use mandir_core::{normalize, RawSearchRequest, SearchError, Temple};
use mandir_geocoder::SearchOutcome;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn list_temples(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Temple>>>, ApiError> {
    let rows = mandir_db::list_temples(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(Temple::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_temple(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Temple>>, ApiError> {
    let row = mandir_db::get_temple(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("temple {id} not found"),
            )
        })?;

    Ok(Json(ApiResponse {
        data: Temple::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn search_temples(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<RawSearchRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SearchOutcome>>, ApiError> {
    let Json(raw) = body.map_err(|rejection| {
        tracing::info!(error = %rejection, "unreadable search body");
        ApiError::from_search(
            req_id.0.clone(),
            &SearchError::InvalidInput("request".to_string()),
        )
    })?;

    normalize(&raw).map_err(|e| {
        tracing::info!(error = %e, "search rejected");
        ApiError::from_search(req_id.0.clone(), &e)
    })?;

    let temples: Vec<Temple> = mandir_db::list_temples(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .into_iter()
        .map(Temple::from)
        .collect();

    let outcome = mandir_geocoder::search_temples(state.geocoder.as_ref(), &temples, &raw)
        .await
        .map_err(|e| ApiError::from_search(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: outcome,
        meta: ResponseMeta::new(req_id.0),
    }))
}
