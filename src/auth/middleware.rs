// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session middleware for Axum.
//!
//! Alternative to the per-handler [`Session`](super::Session) extractor: the
//! middleware verifies the session cookie once for a whole router subtree and
//! stores the [`SessionToken`] in the request extensions, where the extractor
//! picks it up without verifying again.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/me", get(me))
//!     .layer(axum::middleware::from_fn_with_state(
//!         client.clone(),
//!         require_session,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::SESSION_COOKIE_NAME;
use crate::client::Client;

/// Reject requests without a valid session; annotate the rest.
pub async fn require_session(
    State(client): State<Client>,
    mut request: Request,
    next: Next,
) -> Response {
    match client
        .verify_session_token_cookie(request.headers(), SESSION_COOKIE_NAME)
        .await
    {
        Ok(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
