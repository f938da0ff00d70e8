//! HTTP layer of the SessionGuard server
//!
//! Routes:
//! - `POST /auth/login`, `/auth/register`, `/auth/refresh`, `/auth/logout`
//! - `POST /auth/logout-all`, `GET /auth/me` (bearer access token)
//! - `GET|PUT /admin/auth/risk-config`, `GET /admin/auth/risk-config-logs`,
//!   `POST /admin/auth/unlock`, `GET /admin/auth/unlock-logs`,
//!   `GET /admin/auth/access-profile` (ADMIN only)
//! - `GET /health`

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use state::{AppState, HealthCheck, HttpSettings, Stores};
