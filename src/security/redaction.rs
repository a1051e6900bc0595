// Helpers that keep the shared secret out of logs.
use std::env;

use serde_json::Value;

/// JSON fields treated as secrets in request bodies.
const SECRET_FIELDS: &[&str] = &["psk"];

fn secrets_allowed() -> bool {
    env::var("DEV_PRINT_SECRETS").ok().as_deref() == Some("1")
}

/// Redact a secret string unless DEV_PRINT_SECRETS=1 is set in the environment.
/// By default this returns a short placeholder containing only the length.
pub fn redact_secret(s: &str) -> String {
    if secrets_allowed() {
        return s.to_string();
    }
    format!("<redacted len={}>", s.len())
}

/// Render a request body for logging with secret fields replaced.
pub fn redact_json_body(body: &Value) -> String {
    if secrets_allowed() {
        return body.to_string();
    }
    let mut copy = body.clone();
    if let Some(map) = copy.as_object_mut() {
        for field in SECRET_FIELDS {
            if let Some(v) = map.get_mut(*field) {
                let len = v.as_str().map(str::len).unwrap_or(0);
                *v = Value::String(format!("<redacted len={}>", len));
            }
        }
    }
    copy.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    #[serial_test::serial]
    fn test_psk_is_masked() {
        env::remove_var("DEV_PRINT_SECRETS");
        let rendered = redact_json_body(&json!({"from": "0", "psk": "00"}));
        assert!(rendered.contains("\"from\":\"0\""));
        assert!(rendered.contains("<redacted len=2>"));
        assert!(!rendered.contains("\"psk\":\"00\""));
    }

    #[test]
    #[serial_test::serial]
    fn test_body_without_secret_is_unchanged() {
        env::remove_var("DEV_PRINT_SECRETS");
        assert_eq!(redact_json_body(&json!({})), "{}");
        assert_eq!(redact_secret("abcd"), "<redacted len=4>");
    }

    #[test]
    #[serial_test::serial]
    fn test_dev_override_prints_secret() {
        env::set_var("DEV_PRINT_SECRETS", "1");
        let rendered = redact_json_body(&json!({"psk": "00"}));
        env::remove_var("DEV_PRINT_SECRETS");
        assert_eq!(rendered, r#"{"psk":"00"}"#);
    }
}
