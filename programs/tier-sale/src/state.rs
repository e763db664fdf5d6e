use anchor_lang::prelude::*;

use crate::access_control::Ownable;
use crate::constants::*;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum SalePhase {
    Uninitialized,
    TokenConfigured,
    Opened,
    Active,
    Finished,
}

/// Per-participant eligibility and purchase limit.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Default, InitSpace, PartialEq, Eq, Debug)]
pub struct WhitelistRecord {
    pub wallet: Pubkey,
    /// 1-based index into `Sale::tiers`, 0 when unassigned.
    pub tier: u8,
    pub tiers_purchased: u64,
    pub max_purchasable_tiers: u64,
    pub active: bool,
}

/// Input row for `add_to_whitelist`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct WhitelistEntry {
    pub wallet: Pubkey,
    pub tier: u8,
    pub max_purchasable_tiers: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct PurchaseReceipt {
    pub units: u64,
    pub total_raise: u64,
    pub total_participant: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct SaleSummary {
    pub owner: Pubkey,
    pub phase: SalePhase,
    pub start_time: i64,
    pub tier_count: u8,
    pub whitelist_len: u32,
    pub total_raise: u64,
    pub total_participant: u64,
    pub total_withdrawn: u64,
}

#[account]
#[derive(Default, InitSpace)]
pub struct Sale {
    pub access: Ownable,
    pub payment_mint: Option<Pubkey>,
    pub start_time: i64,
    pub is_finished: bool,
    pub tiers_added: bool,
    #[max_len(MAX_TIERS)]
    pub tiers: Vec<u64>,
    #[max_len(MAX_WHITELIST)]
    pub whitelist: Vec<WhitelistRecord>,
    pub total_raise: u64,
    pub total_participant: u64,
    pub total_withdrawn: u64,
    pub bump: u8,
    pub vault_bump: u8,
}

impl Sale {
    pub const LEN: usize = 8 + Sale::INIT_SPACE;

    pub fn new(owner: Pubkey, bump: u8, vault_bump: u8) -> Self {
        Self {
            access: Ownable::new(owner),
            bump,
            vault_bump,
            ..Default::default()
        }
    }
}
