use axum::{Json, extract::State};
use chrono::Utc;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{DashboardStats, NewProductView, SuccessResponse, TrackViewRequest},
    queries::{equipment_queries, order_queries, price_history_queries, view_queries},
    services::analytics_service::{self, DashboardSource, RECENT_PRICE_CHANGES_LIMIT},
    utils::{
        best_effort::BestEffort,
        extractors::{ClientInfo, OptionalSession, extract_user_id},
    },
};

pub async fn track_view(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    client: ClientInfo,
    Json(payload): Json<TrackViewRequest>,
) -> Result<Json<SuccessResponse>> {
    let equipment_id = payload
        .equipment_id
        .ok_or_else(|| AppError::BadRequest("equipment_id is required".to_string()))?;

    let view = NewProductView {
        equipment_id,
        user_id: session
            .as_ref()
            .and_then(|s| extract_user_id(s).ok())
            .or(payload.user_id),
        ip_address: payload
            .ip_address
            .filter(|ip| !ip.trim().is_empty())
            .or(Some(client.ip)),
        user_agent: payload
            .user_agent
            .filter(|agent| !agent.trim().is_empty())
            .or(client.user_agent),
    };
    view_queries::insert_view(&state.db, &view).await?;

    Ok(Json(SuccessResponse::ok()))
}

/// Never fails: secondary sources degrade to empty lists, and losing the
/// catalog itself serves the all-zero payload.
pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardStats> {
    let now = Utc::now();

    let (equipment, views, orders, price_changes) = tokio::join!(
        equipment_queries::find_summaries(&state.db),
        view_queries::find_since(&state.db, analytics_service::window_start(now)),
        order_queries::find_all(&state.db),
        price_history_queries::find_recent(&state.db, RECENT_PRICE_CHANGES_LIMIT),
    );

    let equipment = match equipment {
        Ok(equipment) => equipment,
        Err(e) => {
            tracing::error!("Dashboard catalog fetch failed, serving empty stats: {}", e);
            return Json(DashboardStats::empty());
        }
    };

    let source = DashboardSource {
        equipment,
        views: views.best_effort("dashboard views").unwrap_or_default(),
        orders: orders.best_effort("dashboard orders").unwrap_or_default(),
        price_changes: price_changes
            .best_effort("dashboard price changes")
            .unwrap_or_default(),
    };

    Json(analytics_service::build_dashboard(source, now))
}
