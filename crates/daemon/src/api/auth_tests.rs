use reelforge_core::{CloudTrigger, OrchestratorConfig};
use std::collections::HashMap;

use super::requires_auth;

fn config(bind_addr: &str, admin_token: Option<&str>) -> OrchestratorConfig {
    OrchestratorConfig {
        inbox_dir: "inbox".into(),
        work_dir: "work".into(),
        delivery_dir: "delivery".into(),
        cloud_pipeline: false,
        cloud_trigger: CloudTrigger::Manual,
        jobs_bucket: None,
        jobs_prefix: None,
        cloud_api_base_url: None,
        asr_idle_timeout_seconds: None,
        tick_interval_ms: 1000,
        poll_interval_ms: 1000,
        stage_limits: HashMap::new(),
        bind_addr: bind_addr.to_string(),
        admin_token: admin_token.map(str::to_string),
        review_required_default: false,
        stability_probes: 1,
        stability_delay_ms: 1,
        min_age_seconds: 0,
        commands: Default::default(),
    }
}

#[test]
fn no_token_never_requires_auth() {
    assert!(!requires_auth(&config("0.0.0.0:8080", None)));
}

#[test]
fn loopback_bind_never_requires_auth_even_with_a_token() {
    assert!(!requires_auth(&config("127.0.0.1:8080", Some("secret"))));
    assert!(!requires_auth(&config("[::1]:8080", Some("secret"))));
}

#[test]
fn non_loopback_bind_with_a_token_requires_auth() {
    assert!(requires_auth(&config("0.0.0.0:8080", Some("secret"))));
    assert!(requires_auth(&config("10.0.0.5:8080", Some("secret"))));
}

#[test]
fn unparseable_bind_fails_closed_when_a_token_is_set() {
    assert!(requires_auth(&config("reelforge.internal:8080", Some("secret"))));
}
