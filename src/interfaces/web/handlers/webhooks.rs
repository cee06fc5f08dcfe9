use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::Value;
use tracing::info;

use super::super::AppState;
use super::super::error::ApiError;

/// GitHub webhook ingestion. The delivery is authenticated by its HMAC
/// signature over the raw body; a verified payload becomes one System line
/// in the active conversation, with the full payload kept in `logs`.
pub async fn github_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, ApiError> {
    let signature = headers
        .get("x-hub-signature-256")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::InvalidSignature)?;
    if !verify_github_signature(signature, body.as_bytes(), &state.config.webhook_secret) {
        return Err(ApiError::InvalidSignature);
    }

    let payload: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let repo = payload
        .pointer("/repository/full_name")
        .and_then(Value::as_str)
        .unwrap_or("repo");
    let action = payload
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or("event");
    let detail = summarize_event(&payload);
    let content = format!("GitHub {action} on {repo} {detail}")
        .trim()
        .to_string();

    info!("verified webhook delivery for {repo}");

    let convo = state.store.ensure_conversation().await?;
    state
        .store
        .create_message(convo.id, "System", "agent", &content, None, Some(&payload))
        .await?;

    Ok(Json(serde_json::json!({ "ok": true })))
}

/// One human-readable line for the event, picking the richest section of
/// the payload: pull request, then issue, then the first pushed commit.
fn summarize_event(payload: &Value) -> String {
    if let Some(pr) = payload.get("pull_request") {
        let number = pr.get("number").and_then(Value::as_u64).unwrap_or_default();
        let title = pr.get("title").and_then(Value::as_str).unwrap_or_default();
        return format!("PR #{number}: {title}");
    }
    if let Some(issue) = payload.get("issue") {
        let number = issue
            .get("number")
            .and_then(Value::as_u64)
            .unwrap_or_default();
        let title = issue
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return format!("Issue #{number}: {title}");
    }
    if let Some(first) = payload
        .get("commits")
        .and_then(Value::as_array)
        .and_then(|commits| commits.first())
    {
        let message = first
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return format!("Commits: {message}");
    }
    String::new()
}

/// GitHub signs deliveries as `sha256=<hex(HMAC-SHA256(secret, body))>` in
/// the X-Hub-Signature-256 header. Comparison is constant-time.
fn verify_github_signature(header: &str, body: &[u8], secret: &str) -> bool {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let Some(hex_sig) = header.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    let expected = hex::encode(mac.finalize().into_bytes());
    constant_time_eq(hex_sig.as_bytes(), expected.as_bytes())
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
pub(crate) fn sign_body(secret: &str, body: &[u8]) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_signature_verifies() {
        let body = br#"{"action":"opened"}"#;
        let header = sign_body("s3cret", body);
        assert!(verify_github_signature(&header, body, "s3cret"));
    }

    #[test]
    fn mutated_body_fails_verification() {
        let body = br#"{"action":"opened"}"#;
        let header = sign_body("s3cret", body);
        let mut tampered = body.to_vec();
        tampered[2] ^= 1;
        assert!(!verify_github_signature(&header, &tampered, "s3cret"));
    }

    #[test]
    fn mutated_header_fails_verification() {
        let body = br#"{"action":"opened"}"#;
        let mut header = sign_body("s3cret", body).into_bytes();
        let last = header.len() - 1;
        header[last] = if header[last] == b'0' { b'1' } else { b'0' };
        let header = String::from_utf8(header).expect("ascii header");
        assert!(!verify_github_signature(&header, body, "s3cret"));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let body = br#"{"action":"opened"}"#;
        let header = sign_body("s3cret", body);
        assert!(!verify_github_signature(&header, body, ""));
    }

    #[test]
    fn missing_prefix_fails_verification() {
        assert!(!verify_github_signature("deadbeef", b"x", "s3cret"));
    }

    #[test]
    fn summarize_prefers_pull_request_over_issue() {
        let payload = serde_json::json!({
            "pull_request": { "number": 7, "title": "Fix login" },
            "issue": { "number": 3, "title": "Crash" },
        });
        assert_eq!(summarize_event(&payload), "PR #7: Fix login");
    }

    #[test]
    fn summarize_uses_first_commit_message() {
        let payload = serde_json::json!({
            "commits": [
                { "message": "initial import" },
                { "message": "fix typo" },
            ],
        });
        assert_eq!(summarize_event(&payload), "Commits: initial import");
    }

    #[test]
    fn summarize_empty_payload_is_blank() {
        assert_eq!(summarize_event(&serde_json::json!({})), "");
    }
}
