pub mod cart_queries;
pub mod equipment_queries;
pub mod favorite_queries;
pub mod order_queries;
pub mod price_history_queries;
pub mod profile_queries;
pub mod view_queries;
