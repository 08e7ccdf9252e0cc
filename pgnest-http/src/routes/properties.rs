use crate::handlers::properties::{
    create_property, delete_property, get_property, search_properties, update_property,
};
use crate::server::AppState;
use axum::{Router, routing::get};

/// Create the property routes with state
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/properties", get(search_properties).post(create_property))
        .route(
            "/properties/{property_id}",
            get(get_property)
                .put(update_property)
                .delete(delete_property),
        )
}
