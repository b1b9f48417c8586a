use serde::Serialize;

/// Liveness payload for `GET /health`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Health {
    pub status: &'static str,
}
