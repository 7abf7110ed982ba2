//! Token Minter — exchanges an API key/secret pair for a short-lived
//! WebSocket authentication token via one REST call.
//!
//! The signing scheme is Kraken's standard private-endpoint HMAC:
//!
//! ```text
//! form_body        = "nonce=<millis>"
//! message          = SHA256(nonce_string || form_body)
//! signature_input  = URI_PATH_BYTES || message
//! signature        = BASE64(HMAC_SHA512(BASE64_DECODE(secret), signature_input))
//! ```
//!
//! The resulting token is valid for 15 minutes and is not itself a
//! capability for REST trading — it only authenticates the private
//! WebSocket connection's `login` frame.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Digest, Sha256, Sha512};

use crate::constants::GET_WEBSOCKETS_TOKEN_PATH;
use crate::error::{KrakenError, Result};

type HmacSha512 = Hmac<Sha512>;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    error: Vec<String>,
    result: Option<TokenResult>,
}

#[derive(Debug, Deserialize)]
struct TokenResult {
    token: String,
    #[allow(dead_code)]
    expires: Option<u64>,
}

/// Mint a WebSocket authentication token.
///
/// `api_secret` is the base64-encoded private key as issued by the
/// exchange. Returns `Err(KrakenError::AuthFailure)` on any non-success
/// response, a missing token field, or a malformed secret.
pub async fn mint_token(
    http: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    api_secret: &str,
) -> Result<String> {
    let nonce = nonce_millis();
    let form_body = format!("nonce={nonce}");
    let signature = sign(api_secret, &nonce, &form_body)
        .map_err(|e| KrakenError::AuthFailure(format!("failed to sign request: {e}")))?;

    let url = format!("{base_url}{GET_WEBSOCKETS_TOKEN_PATH}");
    tracing::debug!(%url, "minting websocket token");

    let resp = http
        .post(&url)
        .header("API-Key", api_key)
        .header("API-Sign", signature)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(form_body)
        .send()
        .await?;

    let status = resp.status();
    let body: TokenResponse = resp.json().await?;

    if !status.is_success() || !body.error.is_empty() {
        return Err(KrakenError::AuthFailure(body.error.join("; ")));
    }

    body.result
        .map(|r| r.token)
        .ok_or_else(|| KrakenError::AuthFailure("response missing result.token".into()))
}

/// Compute the `API-Sign` header value for the `GetWebSocketsToken` endpoint.
fn sign(api_secret: &str, nonce: &str, form_body: &str) -> std::result::Result<String, String> {
    let secret_bytes = BASE64
        .decode(api_secret)
        .map_err(|e| format!("secret is not valid base64: {e}"))?;

    let mut hasher = Sha256::new();
    hasher.update(nonce.as_bytes());
    hasher.update(form_body.as_bytes());
    let digest = hasher.finalize();

    let mut mac = HmacSha512::new_from_slice(&secret_bytes)
        .map_err(|e| format!("secret is not a valid HMAC key: {e}"))?;
    mac.update(GET_WEBSOCKETS_TOKEN_PATH.as_bytes());
    mac.update(&digest);
    let signature = mac.finalize().into_bytes();

    Ok(BASE64.encode(signature))
}

fn nonce_millis() -> String {
    let since_epoch = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock is before the epoch");
    since_epoch.as_millis().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_is_deterministic_for_fixed_inputs() {
        // A 64-byte all-zero key, base64-encoded, so the test is
        // self-contained and doesn't depend on a real exchange secret.
        let secret = BASE64.encode([0u8; 64]);
        let a = sign(&secret, "1700000000000", "nonce=1700000000000").unwrap();
        let b = sign(&secret, "1700000000000", "nonce=1700000000000").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sign_rejects_non_base64_secret() {
        let err = sign("not-base64!!!", "1", "nonce=1").unwrap_err();
        assert!(err.contains("base64"));
    }
}
