pub const SALE_SEED: &[u8] = b"sale";
pub const VAULT_SEED: &[u8] = b"vault";

/// Upper bound on configured price points.
pub const MAX_TIERS: usize = 16;
/// Upper bound on distinct whitelist records held by one sale.
pub const MAX_WHITELIST: usize = 128;
/// Entries accepted by a single add/remove instruction.
pub const MAX_WHITELIST_BATCH: usize = 32;

// Tier indexes and summary counters are narrower than usize.
const _: () = assert!(MAX_TIERS <= u8::MAX as usize);
const _: () = assert!(MAX_WHITELIST <= u32::MAX as usize);
