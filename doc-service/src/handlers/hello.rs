use crate::dtos::HelloResponse;
use axum::Json;

pub const HELLO_MESSAGE: &str = "Hello from backend!";

/// Reachability echo. Never touches the database.
pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: HELLO_MESSAGE.to_string(),
    })
}
