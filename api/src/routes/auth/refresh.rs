use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::RefreshTokenRequest;
use crate::handlers::{handle_domain_error, validation_error_response, ClientContext};
use crate::state::{AppState, Stores};

/// Handler for POST /auth/refresh
///
/// Exchanges a refresh token for a new pair. The presented token is rotated
/// and can never be used again.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "eyJ..."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Empty token
/// - 401 Unauthorized: Unknown, expired, rotated or revoked token, or an access token
pub async fn refresh_token<S: Stores>(
    state: web::Data<AppState<S>>,
    client: ClientContext,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    let result = state
        .bounded(state.auth_service.refresh(request.refresh_token.trim(), &client.0))
        .await;

    match result {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_domain_error(error),
    }
}
