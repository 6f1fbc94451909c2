use crate::state::AppState;
use axum::Router;
use axum::routing::post;

pub mod dto;
pub mod error;
pub mod handler;
pub mod invoker;
pub mod model;
pub mod planner;
pub mod publisher;
pub mod service;
pub mod source;
pub mod temp;

pub fn router() -> Router<AppState> {
    Router::new().route("/transcode", post(handler::transcode))
}
