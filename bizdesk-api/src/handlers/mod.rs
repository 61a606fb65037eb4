pub mod dashboard;
pub mod screens;
pub mod shell;

use actix_web::{web, HttpResponse};
use shared_types::ErrorResponse;

use crate::entities::{Communications, Companies, Contacts, Deals, InventoryItems, Tasks};
use crate::error::{ControllerError, ShellError};
use crate::shell::Shell;
use screens::screen_scope;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    Busy(String),
    Unauthenticated(String),
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Busy(msg)
            | ApiError::Unauthenticated(msg)
            | ApiError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl actix_web::error::ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        match self {
            ApiError::Validation(_) => HttpResponse::BadRequest().json(body),
            ApiError::NotFound(_) => HttpResponse::NotFound().json(body),
            ApiError::Busy(_) => HttpResponse::Conflict().json(body),
            ApiError::Unauthenticated(_) => HttpResponse::Unauthorized().json(body),
            ApiError::Internal(_) => HttpResponse::InternalServerError().json(body),
        }
    }
}

impl From<ControllerError> for ApiError {
    fn from(e: ControllerError) -> Self {
        let msg = e.to_string();
        match e {
            ControllerError::Validation(_) | ControllerError::FormClosed => ApiError::Validation(msg),
            ControllerError::NotFound { .. } => ApiError::NotFound(msg),
            ControllerError::Busy => ApiError::Busy(msg),
            ControllerError::Gateway(crate::error::GatewayError::NotFound { .. }) => {
                ApiError::NotFound(msg)
            }
            ControllerError::Gateway(_) => ApiError::Internal(msg),
        }
    }
}

impl From<ShellError> for ApiError {
    fn from(e: ShellError) -> Self {
        match e {
            ShellError::Unauthenticated => ApiError::Unauthenticated(e.to_string()),
        }
    }
}

pub async fn health(shell: web::Data<Shell>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "backend": shell.session().gateway().kind(),
    }))
}

/// Every route the presentation layer talks to
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/api/shell", web::get().to(shell::get_shell))
        .route("/api/shell/session", web::post().to(shell::resolve_session))
        .route("/api/shell/tab", web::put().to(shell::select_tab))
        .route("/api/shell/sign-out", web::post().to(shell::sign_out))
        .route("/api/dashboard", web::get().to(dashboard::get_dashboard))
        .route("/api/dashboard/load", web::post().to(dashboard::load_dashboard))
        .service(screen_scope::<Companies>())
        .service(screen_scope::<Contacts>())
        .service(screen_scope::<Deals>())
        .service(screen_scope::<InventoryItems>())
        .service(
            screen_scope::<Tasks>()
                .route("/{id}/toggle-status", web::post().to(screens::toggle_task_status)),
        )
        .service(screen_scope::<Communications>());
}
