//! Web server module for QkdChat.
//!
//! Exposes the BB84 simulator over HTTP for the chat frontend: key
//! generation, XOR encryption/decryption under a negotiated key, and a
//! health probe. A CORS middleware enforces the configured origin
//! allow-list so the browser client can call the API directly. The
//! endpoints match the local simulator's boundary contract, making the two
//! interchangeable.
//!
use axum::{
    Json, Router,
    extract::{Query, Request},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use qkdproto::bb84::{self, KeyExchange};
use qkdproto::codec;
use qkdproto::error::CodecError;
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;

/// Start the HTTP backend on the configured port
pub async fn run() {
    let app = router();

    let addr = format!("0.0.0.0:{}", CONFIG.port)
        .parse::<std::net::SocketAddr>()
        .unwrap();

    println!("🚀 QkdChat backend listening on http://{}", addr);
    println!(
        "🌐 CORS allow-list: {}",
        CONFIG.allow_origins.join(", ")
    );

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Build the API router with the CORS middleware applied
fn router() -> Router {
    Router::new()
        .route("/generate_key", get(generate_key))
        .route("/encrypt", post(encrypt))
        .route("/decrypt", post(decrypt))
        .route("/healthz", get(healthz))
        .layer(axum::middleware::from_fn(cors_middleware))
}

/// Query parameters for key generation
#[derive(Deserialize)]
struct GenerateParams {
    /// Number of qubits to simulate
    #[serde(default = "default_bits")]
    pub bits: usize,
    /// Whether to add a simulated eavesdropper
    #[serde(default)]
    pub with_eve: bool,
}

fn default_bits() -> usize {
    256
}

/// Run a BB84 exchange and return the full transcript
async fn generate_key(Query(params): Query<GenerateParams>) -> Json<KeyExchange> {
    Json(bb84::generate_key(params.bits, params.with_eve))
}

/// Request body for message encryption
#[derive(Deserialize)]
struct EncryptRequest {
    /// Plaintext message
    pub message: String,
    /// Negotiated key bitstring from /generate_key
    pub key_bits: String,
}

/// Response body with the hex ciphertext
#[derive(Serialize)]
struct EncryptResponse {
    /// Ciphertext as lowercase hex
    pub cipher_hex: String,
}

/// Request body for message decryption
#[derive(Deserialize)]
struct DecryptRequest {
    /// Ciphertext as lowercase hex
    pub cipher_hex: String,
    /// Negotiated key bitstring from /generate_key
    pub key_bits: String,
}

/// Response body with the recovered message
#[derive(Serialize)]
struct DecryptResponse {
    /// Recovered plaintext
    pub message: String,
}

/// XOR-encrypt a message under the negotiated key
async fn encrypt(
    Json(req): Json<EncryptRequest>,
) -> Result<Json<EncryptResponse>, (StatusCode, String)> {
    let cipher = codec::xor_encrypt(req.message.as_bytes(), &req.key_bits).map_err(reject)?;
    Ok(Json(EncryptResponse {
        cipher_hex: hex::encode(cipher),
    }))
}

/// Decrypt hex ciphertext under the negotiated key
///
/// Recovered bytes that are not valid UTF-8 come back with U+FFFD
/// placeholders instead of failing the request; malformed hex or key bits
/// are rejected with 400.
async fn decrypt(
    Json(req): Json<DecryptRequest>,
) -> Result<Json<DecryptResponse>, (StatusCode, String)> {
    let message = codec::decode_lossy(&req.cipher_hex, &req.key_bits).map_err(reject)?;
    Ok(Json(DecryptResponse { message }))
}

/// Lightweight health check used by load balancers and hosting probes
async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Map codec failures to a 400 response
fn reject(err: CodecError) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

/// Middleware enforcing the CORS policy for the configured allow-list
///
/// Echoes the request origin when it is allowed, answers OPTIONS
/// preflights directly, and leaves disallowed origins without CORS headers
/// so the browser blocks the response.
async fn cors_middleware(req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .filter(|o| CONFIG.allow_origins.iter().any(|a| a == o))
        .and_then(|o| HeaderValue::from_str(o).ok());

    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    if let Some(origin) = origin {
        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that key generation returns a full transcript
    #[tokio::test]
    async fn generate_key_returns_transcript() {
        let Json(res) = generate_key(Query(GenerateParams {
            bits: 64,
            with_eve: false,
        }))
        .await;

        assert_eq!(res.sender_bits.len(), 64);
        assert_eq!(res.sender_bases.len(), 64);
        assert_eq!(res.receiver_bases.len(), 64);
        assert_eq!(res.shared_key.len(), res.kept_positions.len());
        assert!(res.eve_bases.is_none());
    }

    /// Test the encrypt/decrypt round trip through a generated key
    #[tokio::test]
    async fn encrypt_decrypt_roundtrip() {
        let Json(key) = generate_key(Query(GenerateParams {
            bits: 128,
            with_eve: false,
        }))
        .await;

        let msg = "hello smoke test";
        let Json(enc) = encrypt(Json(EncryptRequest {
            message: msg.into(),
            key_bits: key.shared_key.clone(),
        }))
        .await
        .unwrap();
        assert_eq!(enc.cipher_hex.len(), msg.len() * 2);

        let Json(dec) = decrypt(Json(DecryptRequest {
            cipher_hex: enc.cipher_hex,
            key_bits: key.shared_key,
        }))
        .await
        .unwrap();
        assert_eq!(dec.message, msg);
    }

    /// Test that malformed ciphertext hex is rejected with 400
    #[tokio::test]
    async fn decrypt_rejects_malformed_hex() {
        let err = decrypt(Json(DecryptRequest {
            cipher_hex: "abc".into(),
            key_bits: "1010".into(),
        }))
        .await
        .err()
        .unwrap();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    /// Test that bad key bitstrings are rejected with 400
    #[tokio::test]
    async fn encrypt_rejects_bad_key_bits() {
        let err = encrypt(Json(EncryptRequest {
            message: "hi".into(),
            key_bits: "01x".into(),
        }))
        .await
        .err()
        .unwrap();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    /// Test the health probe payload
    #[tokio::test]
    async fn healthz_reports_ok() {
        let Json(body) = healthz().await;
        assert_eq!(body["status"], "ok");
    }
}
