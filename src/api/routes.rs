use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::{self, AppState};
use crate::store::CatalogStore;

pub fn create_router<S: CatalogStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Instances and mission database summary
        .route("/api/mdb", get(handlers::list_instances::<S>))
        .route("/api/mdb/:instance", get(handlers::get_mission_database::<S>))
        // Space systems
        .route(
            "/api/mdb/:instance/space-systems",
            get(handlers::list_space_systems::<S>),
        )
        .route(
            "/api/mdb/:instance/space-systems/*name",
            get(handlers::get_space_system::<S>),
        )
        // Parameters and parameter types
        .route(
            "/api/mdb/:instance/parameters",
            get(handlers::list_parameters::<S>),
        )
        .route(
            "/api/mdb/:instance/parameters/*name",
            get(handlers::get_parameter::<S>),
        )
        .route(
            "/api/mdb/:instance/batch-get-parameters",
            post(handlers::batch_get_parameters::<S>),
        )
        .route(
            "/api/mdb/:instance/parameter-types/*name",
            get(handlers::get_parameter_type::<S>),
        )
        // Containers
        .route(
            "/api/mdb/:instance/containers",
            get(handlers::list_containers::<S>),
        )
        .route(
            "/api/mdb/:instance/containers/*name",
            get(handlers::get_container::<S>),
        )
        // Commands
        .route(
            "/api/mdb/:instance/commands",
            get(handlers::list_commands::<S>),
        )
        .route(
            "/api/mdb/:instance/commands/*name",
            get(handlers::get_command::<S>),
        )
        // Algorithms
        .route(
            "/api/mdb/:instance/algorithms",
            get(handlers::list_algorithms::<S>),
        )
        .route(
            "/api/mdb/:instance/algorithms/*name",
            get(handlers::get_algorithm::<S>),
        )
}
