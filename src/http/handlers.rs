//! Route handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::dice::{DiceRoller, RollError};

/// Player name used when the request does not carry one.
pub const DEFAULT_PLAYER: &str = "anonymous";

/// Path of the roll endpoint.
pub const ROLL_PATH: &str = "/rolldice";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub roller: Arc<DiceRoller>,
}

/// `GET /`: send the client to the roll endpoint.
pub async fn index() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, ROLL_PATH)])
}

/// `GET /rolldice?player=<name>`.
///
/// Query parsing never rejects: the first `player` value wins and a missing
/// one falls back to [`DEFAULT_PLAYER`].
pub async fn roll_dice(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let player = params
        .into_iter()
        .find(|(key, _)| key == "player")
        .map(|(_, value)| value)
        .unwrap_or_else(|| DEFAULT_PLAYER.to_string());

    match state.roller.play(&player) {
        Ok(roll) => roll.to_string().into_response(),
        Err(err) => err.into_response(),
    }
}

impl IntoResponse for RollError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {self}")).into_response()
    }
}
