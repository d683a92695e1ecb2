//! Action token decoding and dispatch against the request context.

mod common;

use std::collections::HashMap;

use common::{fixed_now, other_security, test_security};
use gateway::actions::{self, PastaportoAction, ACTION_AUTH, ACTION_CLEAR_AUTH};
use gateway::auth::claims::ActionOptions;
use gateway::auth::tokens::{decode_identity_token, mint_action_token};
use gateway::context::RequestContext;
use gateway::error::AppError;

fn auth_payload(id: &str, auth_generation: i64) -> HashMap<String, String> {
    HashMap::from([
        ("id".to_string(), id.to_string()),
        ("auth_generation".to_string(), auth_generation.to_string()),
    ])
}

#[test]
fn auth_action_sets_one_identity_cookie() {
    let security = test_security();
    let token = mint_action_token(
        ACTION_AUTH,
        auth_payload("42", 7),
        ActionOptions::default(),
        fixed_now(),
        &security,
    )
    .unwrap();

    let mut ctx = RequestContext::new(None, None);
    let action = PastaportoAction::from_token(&token, fixed_now(), &security).unwrap();
    action.apply(&mut ctx, fixed_now(), &security).unwrap();

    let cookies = ctx.set_cookies();
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies[0].name, "identity");
    assert_eq!(cookies[0].options.max_age, 900);
    assert!(cookies[0].options.http_only);

    let claims =
        decode_identity_token(&cookies[0].value, false, fixed_now(), &security).unwrap();
    assert_eq!(claims.sub, "42");
    assert_eq!(claims.auth_generation, 7);
}

#[test]
fn auth_action_with_identity_only_disabled_also_sets_refresh() {
    let security = test_security();
    let token = mint_action_token(
        ACTION_AUTH,
        auth_payload("42", 7),
        ActionOptions {
            identity_only: false,
        },
        fixed_now(),
        &security,
    )
    .unwrap();

    let mut ctx = RequestContext::new(None, None);
    let action = PastaportoAction::from_token(&token, fixed_now(), &security).unwrap();
    action.apply(&mut ctx, fixed_now(), &security).unwrap();

    let names: Vec<&str> = ctx.set_cookies().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["identity", "refreshIdentity"]);
}

#[test]
fn clear_auth_action_expires_both_cookies() {
    let security = test_security();
    let token = mint_action_token(
        ACTION_CLEAR_AUTH,
        HashMap::new(),
        ActionOptions::default(),
        fixed_now(),
        &security,
    )
    .unwrap();

    let mut ctx = RequestContext::new(None, None);
    let action = PastaportoAction::from_token(&token, fixed_now(), &security).unwrap();
    action.apply(&mut ctx, fixed_now(), &security).unwrap();

    let cookies = ctx.set_cookies();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.value.is_empty()));
    assert!(cookies.iter().all(|c| c.options.max_age == -1));
}

#[test]
fn unknown_discriminator_fails_with_unsupported_action() {
    let security = test_security();
    let token = mint_action_token(
        "rotate-keys",
        HashMap::new(),
        ActionOptions::default(),
        fixed_now(),
        &security,
    )
    .unwrap();

    let result = PastaportoAction::from_token(&token, fixed_now(), &security);
    assert!(matches!(result, Err(AppError::UnsupportedAction { .. })));
}

#[test]
fn tampered_action_token_is_rejected() {
    let token = mint_action_token(
        ACTION_AUTH,
        auth_payload("42", 7),
        ActionOptions::default(),
        fixed_now(),
        &other_security(),
    )
    .unwrap();

    let result = PastaportoAction::from_token(&token, fixed_now(), &test_security());
    assert!(matches!(result, Err(AppError::InvalidToken { .. })));
}

#[test]
fn dispatch_applies_each_action_once_in_order() {
    let security = test_security();
    let auth = mint_action_token(
        ACTION_AUTH,
        auth_payload("42", 7),
        ActionOptions::default(),
        fixed_now(),
        &security,
    )
    .unwrap();
    let clear = mint_action_token(
        ACTION_CLEAR_AUTH,
        HashMap::new(),
        ActionOptions::default(),
        fixed_now(),
        &security,
    )
    .unwrap();

    let mut ctx = RequestContext::new(None, None);
    let tokens = [auth.as_str(), clear.as_str()];
    actions::dispatch_all(tokens.into_iter(), &mut ctx, fixed_now(), &security);

    let names: Vec<&str> = ctx.set_cookies().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["identity", "identity", "refreshIdentity"]);
}

#[test]
fn dispatch_skips_bad_tokens_without_aborting() {
    let security = test_security();
    let clear = mint_action_token(
        ACTION_CLEAR_AUTH,
        HashMap::new(),
        ActionOptions::default(),
        fixed_now(),
        &security,
    )
    .unwrap();
    let unknown = mint_action_token(
        "rotate-keys",
        HashMap::new(),
        ActionOptions::default(),
        fixed_now(),
        &security,
    )
    .unwrap();

    let mut ctx = RequestContext::new(None, None);
    let tokens = ["garbage", unknown.as_str(), clear.as_str()];
    actions::dispatch_all(tokens.into_iter(), &mut ctx, fixed_now(), &security);

    // Only the valid clear action landed.
    assert_eq!(ctx.set_cookies().len(), 2);
}

#[test]
fn auth_action_without_id_applies_nothing() {
    let security = test_security();
    let token = mint_action_token(
        ACTION_AUTH,
        HashMap::new(),
        ActionOptions::default(),
        fixed_now(),
        &security,
    )
    .unwrap();

    let mut ctx = RequestContext::new(None, None);
    let action = PastaportoAction::from_token(&token, fixed_now(), &security).unwrap();
    let result = action.apply(&mut ctx, fixed_now(), &security);

    assert!(matches!(result, Err(AppError::InvalidToken { .. })));
    assert_eq!(ctx.set_cookies().len(), 0);
}

#[test]
fn expired_action_token_is_rejected() {
    let security = test_security();
    let token = mint_action_token(
        ACTION_CLEAR_AUTH,
        HashMap::new(),
        ActionOptions::default(),
        common::at_offset(-120),
        &security,
    )
    .unwrap();

    let result = PastaportoAction::from_token(&token, fixed_now(), &security);
    assert!(matches!(result, Err(AppError::TokenExpired)));
}
