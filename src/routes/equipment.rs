use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        CategoriesResponse, EquipmentListResponse, EquipmentResponse, NewProductView,
        SuccessResponse,
    },
    queries::{equipment_queries, view_queries},
    utils::{
        best_effort::BestEffort,
        extractors::{ClientInfo, OptionalSession, extract_user_id},
    },
};

pub async fn list_equipment(State(state): State<AppState>) -> Result<Json<EquipmentListResponse>> {
    let items = equipment_queries::find_all(&state.db).await?;

    Ok(Json(EquipmentListResponse::from_rows(items)))
}

pub async fn list_categories(State(state): State<AppState>) -> Result<Json<CategoriesResponse>> {
    let categories = equipment_queries::find_categories(&state.db).await?;

    Ok(Json(CategoriesResponse { categories }))
}

pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<EquipmentListResponse>> {
    let items = equipment_queries::find_by_category(&state.db, &category).await?;

    Ok(Json(EquipmentListResponse::from_rows(items)))
}

pub async fn get_equipment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EquipmentResponse>> {
    let equipment = equipment_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    Ok(Json(EquipmentResponse {
        equipment: equipment.with_main_image(),
    }))
}

pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    OptionalSession(session): OptionalSession,
    client: ClientInfo,
) -> Result<Json<SuccessResponse>> {
    if !equipment_queries::exists(&state.db, id).await? {
        return Err(AppError::NotFound("Equipment not found".to_string()));
    }

    let view = NewProductView {
        equipment_id: id,
        user_id: session.as_ref().and_then(|s| extract_user_id(s).ok()),
        ip_address: Some(client.ip),
        user_agent: client.user_agent,
    };
    view_queries::insert_view(&state.db, &view).await?;

    equipment_queries::increment_views(&state.db, id)
        .await
        .best_effort("view counter increment");

    Ok(Json(SuccessResponse::ok()))
}
