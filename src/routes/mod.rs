mod admin;
mod analytics;
mod cart;
mod equipment;
mod favorites;
mod google_auth;
mod health;
mod login;
mod register;
mod session;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};

use crate::{
    AppState,
    middleware::{admin_middleware, auth_middleware},
};

pub fn create_router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/auth/login", post(login::login_user))
        .route("/auth/register", post(register::register_user))
        .route("/auth/reset", post(register::reset_password))
        .route("/auth/google", get(google_auth::google_login))
        .route(
            "/auth/google/callback",
            get(google_auth::google_callback).post(google_auth::google_callback_json),
        )
        .route("/auth/check", get(session::check_auth))
        .route("/auth/logout", get(session::logout).post(session::logout))
        .route("/equipment", get(equipment::list_equipment))
        .route("/equipment/categories", get(equipment::list_categories))
        .route(
            "/equipment/category/{category}",
            get(equipment::list_by_category),
        )
        .route("/equipment/view", post(analytics::track_view))
        .route("/equipment/{id}", get(equipment::get_equipment))
        .route("/equipment/{id}/view", post(equipment::record_view))
        .route("/analytics/view", post(analytics::track_view));

    let admin = Router::new()
        .route("/equipment", post(admin::create_equipment))
        .route(
            "/equipment/{id}",
            put(admin::update_equipment).delete(admin::delete_equipment),
        )
        .route("/equipment/{id}/stats", get(admin::equipment_stats))
        .route("/analytics/dashboard", get(analytics::dashboard))
        .route_layer(from_fn_with_state(state.clone(), admin_middleware));

    let user = Router::new()
        .route("/user/favorites", get(favorites::list_favorites))
        .route(
            "/user/favorites/{id}",
            post(favorites::add_favorite).delete(favorites::remove_favorite),
        )
        .route("/user/favorites/{id}/check", get(favorites::check_favorite))
        .route("/user/cart", get(cart::get_cart).delete(cart::clear_cart))
        .route(
            "/user/cart/{id}",
            post(cart::add_to_cart)
                .put(cart::update_cart_item)
                .delete(cart::remove_from_cart),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    public.merge(admin).merge(user)
}
