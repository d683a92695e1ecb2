//! The GraphQL proxy route: the only place where the pastaporto pipeline
//! touches real HTTP.

use std::time::SystemTime;

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::debug;

use crate::actions::{self, ACTION_HEADER};
use crate::context::RequestContext;
use crate::error::AppError;
use crate::pastaporto::orchestrator::create_pastaporto;
use crate::state::app_state::AppState;

/// Header carrying the signed pastaporto assertion to downstream services.
pub const PASTAPORTO_HEADER: &str = "x-pastaporto";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/graphql", web::post().to(graphql));
    crate::health::configure(cfg);
}

/// Proxy one GraphQL request to the federated downstream service.
///
/// Pipeline: cookies → orchestrator → signed pastaporto forwarded upstream →
/// downstream action headers applied → cookies flushed exactly once.
async fn graphql(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let now = SystemTime::now();
    let mut ctx = RequestContext::from_request(&req);

    let pastaporto =
        match create_pastaporto(&mut ctx, state.directory.as_ref(), &state.security, now).await {
            Ok(pastaporto) => pastaporto,
            Err(err) if err.is_auth_error() => {
                // Revocation cookies queued by the orchestrator must still
                // reach the browser, so auth failures are answered here
                // instead of bubbling to ResponseError.
                debug!(code = %err.code(), "answering auth failure as GraphQL error");
                let mut builder = HttpResponse::build(StatusCode::OK);
                builder.content_type("application/json");
                ctx.flush(&mut builder);
                return Ok(builder.json(err.to_graphql_body()));
            }
            Err(err) => return Err(err),
        };

    let assertion = pastaporto.sign(now, &state.security)?;

    let upstream = state
        .http
        .post(state.downstream_url.as_str())
        .header("content-type", "application/json")
        .header(PASTAPORTO_HEADER, assertion)
        .body(body.to_vec())
        .send()
        .await
        .map_err(|e| AppError::upstream(format!("downstream request failed: {e}")))?;

    let status = StatusCode::from_u16(upstream.status().as_u16())
        .unwrap_or(StatusCode::BAD_GATEWAY);

    // Collect action headers before consuming the response body; each is
    // applied exactly once, in response-processing order.
    let action_tokens: Vec<String> = upstream
        .headers()
        .get_all(ACTION_HEADER)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_owned)
        .collect();

    let payload = upstream
        .bytes()
        .await
        .map_err(|e| AppError::upstream(format!("downstream response failed: {e}")))?;

    actions::dispatch_all(
        action_tokens.iter().map(String::as_str),
        &mut ctx,
        now,
        &state.security,
    );

    let mut builder = HttpResponse::build(status);
    builder.content_type("application/json");
    ctx.flush(&mut builder);
    Ok(builder.body(payload))
}
