use actix_web::{web, HttpResponse};
use shared_types::SelectTabRequest;

use super::ApiError;
use crate::shell::Shell;

pub async fn get_shell(shell: web::Data<Shell>) -> HttpResponse {
    HttpResponse::Ok().json(shell.view())
}

pub async fn resolve_session(shell: web::Data<Shell>) -> HttpResponse {
    HttpResponse::Ok().json(shell.resolve_session().await)
}

pub async fn select_tab(
    shell: web::Data<Shell>,
    request: web::Json<SelectTabRequest>,
) -> Result<HttpResponse, ApiError> {
    let view = shell.select_tab(request.tab).await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn sign_out(shell: web::Data<Shell>) -> HttpResponse {
    HttpResponse::Ok().json(shell.sign_out().await)
}
