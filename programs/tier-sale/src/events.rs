use anchor_lang::prelude::*;

use crate::state::WhitelistEntry;

#[event]
pub struct PaymentTokenConfigured {
    #[index]
    pub mint: Pubkey,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub supply: u64,
}

#[event]
pub struct TiersAdded {
    pub prices: Vec<u64>,
}

#[event]
pub struct SaleOpened {
    pub start_time: i64,
    pub time: i64,
}

#[event]
pub struct WhitelistAdded {
    pub entries: Vec<WhitelistEntry>,
}

#[event]
pub struct WhitelistRemoved {
    pub wallets: Vec<Pubkey>,
}

#[event]
pub struct TokensPurchased {
    #[index]
    pub buyer: Pubkey,
    pub amount: u64,
    pub units: u64,
    pub total_raise: u64,
    pub total_participant: u64,
}

#[event]
pub struct SaleFinished {
    pub is_finished: bool,
    pub time: i64,
}

#[event]
pub struct FundsWithdrawn {
    #[index]
    pub receiver: Pubkey,
    pub amount: u64,
    pub time: i64,
}

#[event]
pub struct OwnershipTransferred {
    #[index]
    pub previous_owner: Pubkey,
    #[index]
    pub new_owner: Pubkey,
}
