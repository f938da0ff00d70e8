use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::LoginRequest;
use crate::handlers::{handle_domain_error, validation_error_response, ClientContext};
use crate::state::{AppState, Stores};

/// Handler for POST /auth/login
///
/// Authenticates a phone and password and issues a token pair.
///
/// # Request Body
///
/// ```json
/// {
///     "phone": "13800000001",
///     "password": "string",
///     "expire_seconds": 3600
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "token_type": "Bearer",
///     "expires_in": 3600,
///     "user_id": "u_...",
///     "role": "USER"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed phone or missing password
/// - 401 Unauthorized: Unknown phone or wrong password, indistinguishably
/// - 403 Forbidden: Account is not active
/// - 429 Too Many Requests: A lock is active, `lock_type` and `locked_until` in the body
/// - 503 Service Unavailable: A store could not be reached in time
pub async fn login<S: Stores>(
    state: web::Data<AppState<S>>,
    client: ClientContext,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }
    let request = request.into_inner();

    let result = state
        .bounded(state.auth_service.login(
            request.phone.trim(),
            &request.password,
            request.expire_seconds,
            &client.0,
        ))
        .await;

    match result {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_domain_error(error),
    }
}
