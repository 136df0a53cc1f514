use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts};
use rusqlite::params;

use crate::database::{Database, FromRow};
use crate::errors::WebError;

/// The authenticated user making a request.
///
/// Tokens are issued elsewhere; here they are only looked up. Clients send
/// `Authorization: Token <key>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub is_staff: bool,
}

impl FromRow for Actor {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get("user_id")?,
            is_staff: row.get("is_staff")?,
        })
    }
}

impl Actor {
    pub fn from_token(db: &Database, token: &str) -> anyhow::Result<Option<Self>> {
        db.first_row(
            "SELECT User.user_id, User.is_staff
                FROM AuthToken
                JOIN User ON User.user_id = AuthToken.user_id
                WHERE AuthToken.token = ?",
            params![token],
        )
    }

    /// Whether this actor may edit or delete something written by `author_id`.
    pub fn can_modify(&self, author_id: i64) -> bool {
        self.is_staff || self.user_id == author_id
    }
}

/// Pull the token out of the Authorization header, if there is one.
///
/// Returns `Ok(None)` when the header is absent, and an error when it is present but unusable.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, WebError> {
    let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Token "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(WebError::Unauthorized)?;
    Ok(Some(token))
}

fn resolve<S>(parts: &Parts, state: &S) -> Result<Option<Actor>, WebError>
where
    Database: FromRef<S>,
{
    match bearer_token(parts)? {
        Some(token) => {
            let db = Database::from_ref(state);
            let actor = Actor::from_token(&db, token)?.ok_or(WebError::Unauthorized)?;
            Ok(Some(actor))
        }
        None => Ok(None),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    Database: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        resolve(parts, state)?.ok_or(WebError::Unauthorized)
    }
}

/// The actor if the request carries credentials, or `None` for anonymous readers.
/// Credentials that are present but wrong are still rejected.
pub struct MaybeActor(pub Option<Actor>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeActor
where
    Database: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeActor(resolve(parts, state)?))
    }
}
