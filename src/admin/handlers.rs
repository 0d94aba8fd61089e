use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::admin::AdminState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub pool_size: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PeerStatus {
    pub index: usize,
    pub url: String,
    pub host: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddPeerRequest {
    pub url: String,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: state.lifecycle.get().to_string(),
        pool_size: state.pool.len(),
    })
}

pub async fn list_peers(State(state): State<AdminState>) -> Json<Vec<PeerStatus>> {
    Json(peer_statuses(&state))
}

pub async fn add_peer(
    State(state): State<AdminState>,
    Json(body): Json<AddPeerRequest>,
) -> Result<(StatusCode, Json<Vec<PeerStatus>>), (StatusCode, String)> {
    state
        .pool
        .add_peer(&body.url)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok((StatusCode::CREATED, Json(peer_statuses(&state))))
}

fn peer_statuses(state: &AdminState) -> Vec<PeerStatus> {
    state
        .pool
        .peers()
        .iter()
        .enumerate()
        .map(|(index, b)| PeerStatus {
            index,
            url: b.url().to_string(),
            host: b.authority().to_string(),
        })
        .collect()
}
