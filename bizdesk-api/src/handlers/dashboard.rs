use actix_web::{web, HttpResponse};

use super::ApiError;
use crate::shell::Shell;

pub async fn get_dashboard(shell: web::Data<Shell>) -> Result<HttpResponse, ApiError> {
    shell.require_session()?;
    Ok(HttpResponse::Ok().json(shell.screens().dashboard.view()))
}

pub async fn load_dashboard(shell: web::Data<Shell>) -> Result<HttpResponse, ApiError> {
    shell.require_session()?;
    let dashboard = &shell.screens().dashboard;
    dashboard.load().await;
    Ok(HttpResponse::Ok().json(dashboard.view()))
}
