use actix_web::{web, HttpResponse};
use crate::{
    database::Database,
    models::{serialize, serialize_many, UserInput, UserResponse},
    services::{user_service, user_validator},
    utils::error::{AppError, MessageResponse},
};

/// Mounts the collection (`/api/users/`) and item (`/api/users/{id}`) endpoints
pub fn configure(cfg: &mut web::ServiceConfig) {
    // `/api/users` (sem barra) redireciona com 308, preservando método e body
    cfg.service(web::redirect("/api/users", "/api/users/").permanent())
    .service(
        web::resource("/api/users/")
            .route(web::get().to(list_users))
            .route(web::post().to(create_user)),
    )
    .service(
        web::resource("/api/users/{id}")
            .route(web::get().to(get_user))
            .route(web::post().to(update_user))
            .route(web::delete().to(delete_user)),
    );
}

/// GET /api/users/ - Lista todos os usuários
#[utoipa::path(
    get,
    path = "/api/users/",
    tag = "Users",
    responses(
        (status = 200, description = "All users in insertion order", body = [UserResponse])
    )
)]
pub async fn list_users(db: web::Data<Database>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /api/users/ - Listing users");

    let users = db.run(|repo| user_service::list_users(repo)).await?;

    Ok(HttpResponse::Ok().json(serialize_many(users)))
}

/// POST /api/users/ - Cria usuário e devolve a lista completa
#[utoipa::path(
    post,
    path = "/api/users/",
    tag = "Users",
    request_body = UserInput,
    responses(
        (status = 201, description = "User created; full list returned", body = [UserResponse]),
        (status = 400, description = "name or email missing", body = MessageResponse),
        (status = 404, description = "A user with this name already exists", body = MessageResponse),
        (status = 409, description = "A user with this email already exists", body = MessageResponse)
    )
)]
pub async fn create_user(
    db: web::Data<Database>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let input = user_validator::parse(&body)?;

    log::info!("📝 POST /api/users/ - Creating user '{}'", input.name);

    let users = db
        .run(move |repo| user_service::create_user(repo, &input))
        .await?;

    Ok(HttpResponse::Created().json(serialize_many(users)))
}

/// GET /api/users/{id} - Busca usuário específico
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    )
)]
pub async fn get_user(
    db: web::Data<Database>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();

    log::info!("🔍 GET /api/users/{}", id);

    let user = db.run(move |repo| user_service::get_user(repo, id)).await?;

    Ok(HttpResponse::Ok().json(serialize(user)))
}

/// POST /api/users/{id} - Atualiza nome e email
#[utoipa::path(
    post,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserInput,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "name or email missing", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    )
)]
pub async fn update_user(
    db: web::Data<Database>,
    id: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();

    log::info!("🔧 POST /api/users/{} - Updating user", id);

    let user = db
        .run(move |repo| {
            user_service::update_user(repo, id, || Ok(user_validator::parse(&body)?))
        })
        .await?;

    Ok(HttpResponse::Ok().json(serialize(user)))
}

/// DELETE /api/users/{id} - Remove usuário e devolve os restantes
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted; remaining users returned", body = [UserResponse]),
        (status = 404, description = "User not found", body = MessageResponse)
    )
)]
pub async fn delete_user(
    db: web::Data<Database>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();

    log::info!("🗑️  DELETE /api/users/{}", id);

    let users = db.run(move |repo| user_service::delete_user(repo, id)).await?;

    Ok(HttpResponse::Ok().json(serialize_many(users)))
}
