use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users Service API",
        version = "1.0.0",
        description = "CRUD API for user records (id, name, email) stored in SQLite.\n\n**Notes:**\n- Creating a user whose name already exists answers 404 `User already exists` (kept for client compatibility)\n- Updates use `POST /api/users/{id}`\n- Deletes return the remaining users"
    ),
    paths(
        // Users
        crate::api::users::list_users,
        crate::api::users::create_user,
        crate::api::users::get_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            // Users
            crate::models::UserInput,
            crate::models::UserResponse,
            crate::utils::error::MessageResponse,

            // Health & Metrics
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Users", description = "User collection and item endpoints."),
        (name = "Health", description = "Health check and request metrics for monitoring service status."),
    )
)]
pub struct ApiDoc;
