use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        FavoriteCheckResponse, FavoriteResponse, FavoriteWithEquipment, FavoritesResponse,
        SuccessResponse,
    },
    queries::{equipment_queries, favorite_queries},
    utils::{extractors::extract_user_id, jwt::SessionUser},
};

pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
) -> Result<Json<FavoritesResponse>> {
    let user_id = extract_user_id(&session)?;
    let favorites = favorite_queries::find_by_user(&state.db, user_id).await?;

    let ids: Vec<i32> = favorites.iter().map(|f| f.equipment_id).collect();
    let equipment = equipment_queries::find_by_ids(&state.db, &ids).await?;

    let favorites = favorites
        .into_iter()
        .filter_map(|favorite| {
            let equipment = equipment.get(&favorite.equipment_id)?.clone();
            Some(FavoriteWithEquipment {
                favorite,
                equipment: equipment.with_main_image(),
            })
        })
        .collect();

    Ok(Json(FavoritesResponse { favorites }))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Path(equipment_id): Path<i32>,
) -> Result<Json<FavoriteResponse>> {
    let user_id = extract_user_id(&session)?;
    let equipment = equipment_queries::find_by_id(&state.db, equipment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    let favorite = favorite_queries::add_favorite(&state.db, user_id, equipment_id).await?;

    Ok(Json(FavoriteResponse {
        success: true,
        favorite: FavoriteWithEquipment {
            favorite,
            equipment: equipment.with_main_image(),
        },
    }))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Path(equipment_id): Path<i32>,
) -> Result<Json<SuccessResponse>> {
    let user_id = extract_user_id(&session)?;
    favorite_queries::remove_favorite(&state.db, user_id, equipment_id).await?;

    Ok(Json(SuccessResponse::ok()))
}

pub async fn check_favorite(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Path(equipment_id): Path<i32>,
) -> Result<Json<FavoriteCheckResponse>> {
    let user_id = extract_user_id(&session)?;
    let is_favorite = favorite_queries::is_favorite(&state.db, user_id, equipment_id).await?;

    Ok(Json(FavoriteCheckResponse { is_favorite }))
}
