//! HTTP surface over [`GameService`].
//!
//! The caller's player id arrives in the `x-player-id` header, set by the
//! authentication layer in front of this server. Service calls touch SQLite
//! synchronously, so every handler runs its call on the blocking pool.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use scrabble_rules::{BlankPolicy, MoveError, MoveRequest};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument, warn};

use crate::{ErrorKind, GameError, GameService};

/// Header carrying the authenticated player id.
pub const PLAYER_HEADER: &str = "x-player-id";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    service: Arc<GameService>,
}

impl AppState {
    /// Wraps a service.
    pub fn new(service: Arc<GameService>) -> Self {
        Self { service }
    }
}

/// Builds the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/players", post(register_player))
        .route("/games", post(create_game).get(list_games))
        .route(
            "/games/{id}",
            get(game_details).patch(rename_game).delete(delete_game),
        )
        .route("/games/{id}/moves", post(play_move))
        .route("/games/{id}/pass", post(pass_turn))
        .route("/games/{id}/rack", post(exchange_rack))
        .route("/games/{id}/simulate", post(simulate_score))
        .with_state(state)
}

/// Authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(PLAYER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .map(Caller)
            .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "unauthenticated", "Missing or invalid player id"))
    }
}

/// Error body sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error class.
    pub kind: String,
    /// Human-readable detail.
    pub message: String,
    /// Offending word, for dictionary rejections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
}

/// An error response.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, kind: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                kind: kind.to_string(),
                message: message.into(),
                word: None,
            },
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            &ErrorKind::Infrastructure.to_string(),
            "Internal error, please retry",
        )
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        let kind = err.kind();
        let status = match (&err, kind) {
            (_, ErrorKind::Infrastructure) => {
                error!(error = %err, "Storage failure");
                return Self::internal();
            }
            (_, ErrorKind::Authorization) => StatusCode::FORBIDDEN,
            (_, ErrorKind::Validation) => StatusCode::UNPROCESSABLE_ENTITY,
            (GameError::Move(_) | GameError::NameTaken(_), ErrorKind::Resource) => {
                StatusCode::CONFLICT
            }
            (_, ErrorKind::Resource) => StatusCode::NOT_FOUND,
        };
        let mut api = Self::new(status, &kind.to_string(), err.to_string());
        if let Some(MoveError::InvalidWord(word)) = err.move_error() {
            api.body.word = Some(word.clone());
        }
        api
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Runs a service call on the blocking pool.
async fn blocking<T, F>(state: AppState, f: F) -> Result<Json<T>, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&GameService) -> Result<T, GameError> + Send + 'static,
{
    let service = state.service.clone();
    match tokio::task::spawn_blocking(move || f(&service)).await {
        Ok(result) => result.map(Json).map_err(ApiError::from),
        Err(e) => {
            warn!(error = %e, "Service task failed");
            Err(ApiError::internal())
        }
    }
}

/// Body of `POST /players`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPlayerRequest {
    /// Unique display name.
    pub display_name: String,
}

/// Body of `POST /games`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameRequest {
    /// Game name.
    pub name: String,
    /// Opponents by display name, in seat order.
    pub opponents: Vec<String>,
    /// Game this one is a rematch of.
    #[serde(default)]
    pub rematch_of: Option<String>,
}

/// Body of `PATCH /games/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameGameRequest {
    /// New name.
    pub name: String,
}

/// Query of `POST /games/{id}/moves`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MoveQuery {
    /// Cover missing letters with jokers.
    #[serde(default)]
    pub resolve_blanks: bool,
}

#[instrument(skip(state, req))]
async fn register_player(
    State(state): State<AppState>,
    Json(req): Json<RegisterPlayerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let player = blocking(state, move |s| s.register_player(&req.display_name)).await?;
    Ok((StatusCode::CREATED, player))
}

#[instrument(skip(state, req))]
async fn create_game(
    State(state): State<AppState>,
    Caller(player): Caller,
    Json(req): Json<CreateGameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let details = blocking(state, move |s| {
        s.create_game(player, &req.name, &req.opponents, req.rematch_of.as_deref())
    })
    .await?;
    Ok((StatusCode::CREATED, details))
}

#[instrument(skip(state))]
async fn list_games(
    State(state): State<AppState>,
    Caller(player): Caller,
) -> Result<impl IntoResponse, ApiError> {
    blocking(state, move |s| s.games_for_player(player)).await
}

#[instrument(skip(state))]
async fn game_details(
    State(state): State<AppState>,
    Caller(player): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(state, move |s| s.game_details(&id, player)).await
}

#[instrument(skip(state, req))]
async fn rename_game(
    State(state): State<AppState>,
    Caller(player): Caller,
    Path(id): Path<String>,
    Json(req): Json<RenameGameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let _ = blocking(state, move |s| s.rename_game(&id, player, &req.name)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn delete_game(
    State(state): State<AppState>,
    Caller(player): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let _ = blocking(state, move |s| s.delete_game(&id, player)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, req), fields(count = req.letters.len()))]
async fn play_move(
    State(state): State<AppState>,
    Caller(player): Caller,
    Path(id): Path<String>,
    Query(query): Query<MoveQuery>,
    Json(req): Json<MoveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let policy = if query.resolve_blanks {
        BlankPolicy::Resolve
    } else {
        BlankPolicy::Explicit
    };
    blocking(state, move |s| s.play_move(&id, player, &req.letters, policy)).await
}

#[instrument(skip(state))]
async fn pass_turn(
    State(state): State<AppState>,
    Caller(player): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(state, move |s| s.pass_turn(&id, player)).await
}

#[instrument(skip(state))]
async fn exchange_rack(
    State(state): State<AppState>,
    Caller(player): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(state, move |s| s.exchange_rack(&id, player)).await
}

#[instrument(skip(state, req), fields(count = req.letters.len()))]
async fn simulate_score(
    State(state): State<AppState>,
    Caller(player): Caller,
    Path(id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(state, move |s| s.simulate_score(&id, player, &req.letters)).await
}
