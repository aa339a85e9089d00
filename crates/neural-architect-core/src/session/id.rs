//! Opaque record identifiers.
//!
//! UUID v4 from the OS random source when it is available. Otherwise a
//! `<prefix>-<epoch-ms>-<suffix>` composition, unique in practice but not
//! guaranteed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

const FALLBACK_SUFFIX_LEN: usize = 8;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn create_id(prefix: &str) -> String {
    let mut bytes = [0u8; 16];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .to_string(),
        Err(e) => {
            tracing::debug!(error = %e, "OS randomness unavailable, using fallback id");
            fallback_id(prefix)
        }
    }
}

/// `<sanitized-prefix>-<epoch-ms>-<8 base36 chars>`.
pub fn fallback_id(prefix: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let sequence = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    let seed = (now.as_nanos() as u64) ^ sequence.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut rng = Pcg64::seed_from_u64(seed);
    let suffix: String = (0..FALLBACK_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}-{}", sanitize_prefix(prefix), now.as_millis(), suffix)
}

/// Lowercase; each run of characters outside `[a-z0-9_-]` becomes one `-`.
fn sanitize_prefix(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len());
    let mut in_run = false;
    for c in prefix.trim().to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }
    if out.is_empty() {
        "id".to_string()
    } else {
        out
    }
}
