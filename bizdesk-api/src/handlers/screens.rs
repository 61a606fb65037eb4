use actix_web::{web, HttpResponse, Scope};
use serde::Deserialize;
use shared_types::SearchRequest;

use super::ApiError;
use crate::entities::Tasks;
use crate::shell::{Screen, Shell};

type ApiResult = Result<HttpResponse, ApiError>;

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

fn view<E: Screen>(shell: &Shell) -> HttpResponse {
    HttpResponse::Ok().json(E::controller(shell.screens()).view())
}

pub async fn get_screen<E: Screen>(shell: web::Data<Shell>) -> ApiResult {
    shell.require_session()?;
    Ok(view::<E>(&shell))
}

pub async fn load_screen<E: Screen>(shell: web::Data<Shell>) -> ApiResult {
    shell.require_session()?;
    E::controller(shell.screens()).load().await?;
    Ok(view::<E>(&shell))
}

pub async fn set_search<E: Screen>(
    shell: web::Data<Shell>,
    request: web::Json<SearchRequest>,
) -> ApiResult {
    shell.require_session()?;
    E::controller(shell.screens()).set_search(request.into_inner().term);
    Ok(view::<E>(&shell))
}

pub async fn open_for_create<E: Screen>(shell: web::Data<Shell>) -> ApiResult {
    shell.require_session()?;
    E::controller(shell.screens()).open_for_create();
    Ok(view::<E>(&shell))
}

pub async fn open_for_edit<E: Screen>(
    shell: web::Data<Shell>,
    path: web::Path<String>,
) -> ApiResult {
    shell.require_session()?;
    E::controller(shell.screens()).open_for_edit(&path.into_inner())?;
    Ok(view::<E>(&shell))
}

pub async fn set_draft<E: Screen>(
    shell: web::Data<Shell>,
    draft: web::Json<E::Draft>,
) -> ApiResult {
    shell.require_session()?;
    E::controller(shell.screens()).set_draft(draft.into_inner())?;
    Ok(view::<E>(&shell))
}

pub async fn submit<E: Screen>(shell: web::Data<Shell>) -> ApiResult {
    shell.require_session()?;
    E::controller(shell.screens()).submit().await?;
    Ok(view::<E>(&shell))
}

pub async fn close_form<E: Screen>(shell: web::Data<Shell>) -> ApiResult {
    shell.require_session()?;
    E::controller(shell.screens()).close_form();
    Ok(view::<E>(&shell))
}

/// The browser's confirmation dialog is carried by `?confirm=true`.
pub async fn delete<E: Screen>(
    shell: web::Data<Shell>,
    path: web::Path<String>,
    query: web::Query<DeleteQuery>,
) -> ApiResult {
    shell.require_session()?;
    let confirmed = query.confirm;
    E::controller(shell.screens())
        .delete(&path.into_inner(), |_| confirmed)
        .await?;
    Ok(view::<E>(&shell))
}

pub async fn toggle_task_status(shell: web::Data<Shell>, path: web::Path<String>) -> ApiResult {
    shell.require_session()?;
    shell
        .screens()
        .tasks
        .toggle_status(&path.into_inner())
        .await?;
    Ok(view::<Tasks>(&shell))
}

/// `/api/{slug}` routes for one record kind
pub fn screen_scope<E: Screen>() -> Scope {
    web::scope(&format!("/api/{}", E::SLUG))
        .route("", web::get().to(get_screen::<E>))
        .route("/load", web::post().to(load_screen::<E>))
        .route("/search", web::put().to(set_search::<E>))
        .route("/form", web::post().to(open_for_create::<E>))
        .route("/form", web::put().to(set_draft::<E>))
        .route("/form/submit", web::post().to(submit::<E>))
        .route("/form/close", web::post().to(close_form::<E>))
        .route("/{id}/form", web::post().to(open_for_edit::<E>))
        .route("/{id}", web::delete().to(delete::<E>))
}
