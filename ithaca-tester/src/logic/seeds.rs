use anyhow::{Context, Result, bail};
use hmac::{Hmac, Mac};
use ithaca_game::normalize_seed;
use sha2::Sha256;

const ITERATION_DOMAIN: &[u8] = b"ithaca-tester/iteration";

/// Resolve CLI seed tokens into base seeds.
///
/// Accepts decimal integers and `0x`-prefixed hex. Duplicates are dropped,
/// keeping the first occurrence.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();
    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let seed = parse_seed_token(token)?;
        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }
    if seeds.is_empty() {
        bail!("No seeds provided");
    }
    Ok(seeds)
}

fn parse_seed_token(token: &str) -> Result<u64> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16)
            .with_context(|| format!("Invalid hex seed token: {token}"));
    }
    if let Ok(value) = token.parse::<u64>() {
        return Ok(value);
    }
    if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }
    bail!("Unrecognized seed token: {token}")
}

/// Game seed for `iteration` of a run started from `base`.
///
/// Each iteration gets its own HMAC-SHA256 stream keyed by the base seed,
/// folded into the engine's valid seed range.
pub fn derive_iteration_seed(base: u64, iteration: usize) -> Result<u64> {
    let mut mac = Hmac::<Sha256>::new_from_slice(&base.to_le_bytes())
        .context("building seed derivation key")?;
    mac.update(ITERATION_DOMAIN);
    mac.update(&(iteration as u64).to_le_bytes());
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    Ok(normalize_seed(u64::from_le_bytes(seed_bytes)))
}
