//! Application factory
//!
//! Builds the actix-web [`App`] from an [`AppState`]. `main` and the HTTP
//! tests share this so both run the exact same routing and middleware.

use actix_web::{
    error::{InternalError, JsonPayloadError, QueryPayloadError},
    web, App, HttpRequest, HttpResponse,
};
use sg_shared::{error_codes, ErrorResponse};
use tracing_actix_web::TracingLogger;

use crate::middleware::JwtAuth;
use crate::routes::{admin, auth, health};
use crate::state::{AppState, Stores};

/// Create and configure the application with all dependencies
pub fn create_app<S: Stores>(
    app_state: web::Data<AppState<S>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let settings = web::Data::new(app_state.settings);
    let jwt_auth = JwtAuth::new(app_state.token_issuer.clone());

    App::new()
        .app_data(app_state)
        .app_data(settings)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health::health_check::<S>))
        .service(
            web::scope("/auth")
                .route("/login", web::post().to(auth::login::<S>))
                .route("/register", web::post().to(auth::register::<S>))
                .route("/refresh", web::post().to(auth::refresh_token::<S>))
                .route("/logout", web::post().to(auth::logout::<S>))
                .service(
                    web::resource("/logout-all")
                        .wrap(jwt_auth.clone())
                        .route(web::post().to(auth::logout_all::<S>)),
                )
                .service(
                    web::resource("/me")
                        .wrap(jwt_auth.clone())
                        .route(web::get().to(auth::me)),
                ),
        )
        .service(
            web::scope("/admin/auth")
                .wrap(jwt_auth)
                .route("/risk-config", web::get().to(admin::get_risk_config::<S>))
                .route("/risk-config", web::put().to(admin::update_risk_config::<S>))
                .route("/risk-config-logs", web::get().to(admin::risk_config_logs::<S>))
                .route("/unlock", web::post().to(admin::unlock::<S>))
                .route("/unlock-logs", web::get().to(admin::unlock_logs::<S>))
                .route("/access-profile", web::get().to(admin::access_profile::<S>)),
        )
        .default_service(web::route().to(not_found))
}

/// Malformed or missing JSON bodies answer with the standard 400 body
fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorResponse::new(error_codes::VALIDATION_ERROR, "invalid request body")
        .add_detail("reason", error.to_string());
    InternalError::from_response(error, HttpResponse::BadRequest().json(body)).into()
}

/// Unparseable query strings answer with the standard 400 body
fn query_error_handler(error: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorResponse::new(error_codes::VALIDATION_ERROR, "invalid query string")
        .add_detail("reason", error.to_string());
    InternalError::from_response(error, HttpResponse::BadRequest().json(body)).into()
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
