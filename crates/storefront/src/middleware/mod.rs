//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. Request ID (add unique ID to each request)
//! 3. `TraceLayer` (request tracing)
//! 4. CSP nonce (generate per-request nonce for inline scripts)
//! 5. Security headers (CSP, framing, sniffing)
//! 6. Session layer (tower-sessions, in-memory store, signed cookie)
//! 7. Auth guard (anonymous visitors only reach public pages)
//! 8. Rate limiting on auth POSTs (governor)

pub mod auth;
pub mod csp;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    OptionalAuth, RequireAuth, RequireStaff, auth_guard_middleware, clear_current_user,
    current_user, is_public_path, set_current_user,
};
pub use csp::{CspNonce, csp_nonce_middleware};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
