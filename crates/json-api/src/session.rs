//! Cart identity middleware.
//!
//! Storefront cart routes accept either an authenticated user (bearer token)
//! or an anonymous session. The session token travels in the `x-session-id`
//! header; when the client sends none, the server mints one. The header is
//! echoed on every response so clients can persist it.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;
use uuid::Uuid;

use bazar_app::{auth::AuthServiceError, domain::carts::models::CartOwner};

use crate::{extensions::*, state::State};

pub(crate) const SESSION_HEADER: &str = "x-session-id";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => state,
        Err(_error) => {
            res.render(StatusError::internal_server_error());

            return;
        }
    };

    if let Some(token) = extract_bearer_token(req) {
        match state.app.auth.authenticate_bearer(token).await {
            Ok(user) => {
                depot.insert_cart_owner(CartOwner::User(user));
                ctrl.call_next(req, depot, res).await;
            }
            Err(AuthServiceError::NotFound) => {
                res.render(StatusError::unauthorized().brief("Invalid API token"));
            }
            Err(source) => {
                error!("failed to validate api token: {source}");

                res.render(StatusError::internal_server_error());
            }
        }

        return;
    }

    let session = extract_session(req).unwrap_or_else(Uuid::now_v7);

    // always echoed, so first-time clients learn their token
    if res
        .add_header(SESSION_HEADER, session.to_string(), true)
        .is_err()
    {
        res.render(StatusError::internal_server_error());

        return;
    }

    depot.insert_cart_owner(CartOwner::Session(session));
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

fn extract_session(req: &Request) -> Option<Uuid> {
    req.headers()
        .get(SESSION_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
