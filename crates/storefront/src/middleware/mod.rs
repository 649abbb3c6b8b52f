//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with `request_id` field)
//! 3. Request ID (reuse or generate `x-request-id`)
//! 4. Session layer (tower-sessions, holds the cart)
//!
//! Identity is not a layer: handlers use the [`RequireAuth`] and
//! [`OptionalAuth`] extractors, which read the gateway's forwarded headers.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer, session_layer};
