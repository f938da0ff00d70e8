use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::RegisterRequest;
use crate::handlers::{handle_domain_error, validation_error_response, ClientContext};
use crate::state::{AppState, Stores};

/// Handler for POST /auth/register
///
/// Creates an ACTIVE user and answers with the same body as login.
///
/// ## Errors
/// - 400 Bad Request: Malformed phone or email, password shorter than 8
/// - 403 Forbidden: Registration is switched off
/// - 409 Conflict: The phone already has an account
pub async fn register<S: Stores>(
    state: web::Data<AppState<S>>,
    client: ClientContext,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }
    let request = request.into_inner();

    let result = state
        .bounded(state.auth_service.register(
            request.phone.trim(),
            &request.password,
            request.email,
            &client.0,
        ))
        .await;

    match result {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_domain_error(error),
    }
}
