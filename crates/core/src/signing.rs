//! HMAC-SHA256 request signing shared by outbound webhook calls and
//! inbound provider mutations.
//!
//! Signatures are computed over the exact bytes that travel on the wire.
//! Callers must serialize a fixed-schema struct (never a map) so that the
//! signing and verifying side produce identical bytes.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Header carrying the hex signature on every signed request.
pub const SIGNATURE_HEADER: &str = "X-Signature";

type HmacSha256 = Hmac<Sha256>;

fn keyed(secret: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length")
}

/// Compute the lowercase hex HMAC-SHA256 of `payload` under `secret`.
pub fn sign(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = keyed(secret);
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Check a hex signature against `payload` in constant time.
///
/// Returns `false` for signatures that are not valid hex or have the wrong
/// length.
pub fn verify(secret: &[u8], payload: &[u8], signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    let mut mac = keyed(secret);
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}
