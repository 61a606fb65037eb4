use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use shared_types::UserSession;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info};

use super::{Gateway, SelectQuery};
use crate::error::GatewayError;

/// Client for a hosted PostgREST-style backend (`/rest/v1`, `/auth/v1`).
pub struct RestGateway {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: RwLock<Option<String>>,
}

#[derive(Deserialize)]
struct BackendErrorBody {
    message: Option<String>,
    msg: Option<String>,
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    email: Option<String>,
}

impl RestGateway {
    pub fn new(base_url: &str, anon_key: &str, access_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            access_token: RwLock::new(access_token),
        }
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests run as the signed-in user when there is one, else as anon.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.token().unwrap_or_else(|| self.anon_key.clone());
        request.header("apikey", &self.anon_key).bearer_auth(bearer)
    }
}

async fn check(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<BackendErrorBody>(&body)
        .ok()
        .and_then(|b| b.message.or(b.msg))
        .unwrap_or(body);

    Err(GatewayError::Backend {
        status: status.as_u16(),
        message,
    })
}

fn id_filter(id: &str) -> [(&'static str, String); 1] {
    [("id", format!("eq.{}", id))]
}

#[async_trait]
impl Gateway for RestGateway {
    fn kind(&self) -> &'static str {
        "hosted"
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, GatewayError> {
        debug!("GET {} {:?}", query.table, query.to_params());
        let request = self
            .client
            .get(self.table_url(query.table))
            .query(&query.to_params());

        let response = check(self.authorize(request).send().await?).await?;
        Ok(response.json::<Vec<Value>>().await?)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, GatewayError> {
        let request = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&[row]);

        let response = check(self.authorize(request).send().await?).await?;
        response
            .json::<Vec<Value>>()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::InvalidRow(format!("insert into {} returned no row", table)))
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), GatewayError> {
        let request = self
            .client
            .patch(self.table_url(table))
            .query(&id_filter(id))
            .json(&patch);

        check(self.authorize(request).send().await?).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), GatewayError> {
        let request = self.client.delete(self.table_url(table)).query(&id_filter(id));

        check(self.authorize(request).send().await?).await?;
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<UserSession>, GatewayError> {
        let Some(token) = self.token() else {
            return Ok(None);
        };

        let response = self
            .client
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Ok(None);
        }

        let user: AuthUser = check(response).await?.json().await?;
        Ok(Some(UserSession {
            user_id: user.id,
            email: user.email,
        }))
    }

    async fn sign_out(&self) -> Result<(), GatewayError> {
        let token = self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(token) = token {
            let response = self
                .client
                .post(self.auth_url("logout"))
                .header("apikey", &self.anon_key)
                .bearer_auth(token)
                .send()
                .await?;
            check(response).await?;
        }

        info!("Signed out of hosted backend");
        Ok(())
    }
}
