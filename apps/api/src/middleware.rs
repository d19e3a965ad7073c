//! # ミドルウェア
//!
//! API サーバー用のミドルウェアを提供する。

pub mod auth;

pub use auth::{AuthState, require_bearer_token};
