use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::SaleError;
use crate::state::*;

impl Sale {
    pub fn is_initialized(&self) -> bool {
        self.start_time != 0
    }

    /// `Finished` needs a scheduled start; a sale finished before `open_sale`
    /// still reports its configuration phase, and `open_sale` clears the flag.
    pub fn phase(&self, now: i64) -> SalePhase {
        if self.is_initialized() {
            if self.is_finished {
                SalePhase::Finished
            } else if self.is_sale_open(now) {
                SalePhase::Active
            } else {
                SalePhase::Opened
            }
        } else if self.payment_mint.is_some() {
            SalePhase::TokenConfigured
        } else {
            SalePhase::Uninitialized
        }
    }

    /// Price of a 1-based tier index, 0 when the index does not resolve.
    pub fn tier_amount(&self, index: u8) -> u64 {
        usize::from(index)
            .checked_sub(1)
            .and_then(|i| self.tiers.get(i))
            .copied()
            .unwrap_or(0)
    }

    pub fn max_payable_amount(&self, wallet: &Pubkey) -> Result<u64> {
        let Some(record) = self.record(wallet) else {
            return Ok(0);
        };
        record
            .max_purchasable_tiers
            .checked_mul(self.tier_amount(record.tier))
            .ok_or_else(|| error!(SaleError::Overflow))
    }

    pub fn set_payment_token(&mut self, caller: &Pubkey, mint: Pubkey) -> Result<()> {
        self.access.guard(caller)?;
        require!(!self.is_initialized(), SaleError::InvalidState);

        self.payment_mint = Some(mint);
        msg!("Payment token set to {}", mint);
        Ok(())
    }

    pub fn set_tiers(&mut self, caller: &Pubkey, prices: Vec<u64>, now: i64) -> Result<()> {
        self.access.guard(caller)?;
        require!(!self.tiers_added, SaleError::AlreadyConfigured);
        require!(!self.is_sale_open(now), SaleError::InvalidState);
        require!(
            !prices.is_empty() && prices.len() <= MAX_TIERS,
            SaleError::InvalidArgument
        );
        require!(prices.iter().all(|p| *p > 0), SaleError::InvalidTierPrice);

        msg!("Configured {} tiers", prices.len());
        self.tiers = prices;
        self.tiers_added = true;
        Ok(())
    }

    /// Schedules the sale window. There is no way to reschedule once set.
    pub fn open_sale(&mut self, caller: &Pubkey, start_time: i64, now: i64) -> Result<()> {
        self.access.guard(caller)?;
        require!(!self.is_initialized(), SaleError::InvalidState);
        require!(start_time >= now && start_time != 0, SaleError::InvalidArgument);
        require!(self.payment_mint.is_some(), SaleError::Unconfigured);

        self.start_time = start_time;
        self.is_finished = false;
        msg!("Sale opens at {}", start_time);
        Ok(())
    }

    /// Validates the purchase completely before touching any state.
    pub fn purchase(
        &mut self,
        buyer: &Pubkey,
        payment_amount: u64,
        now: i64,
    ) -> Result<PurchaseReceipt> {
        require!(self.is_sale_open(now), SaleError::SaleNotStarted);
        require!(!self.is_finished, SaleError::SaleFinished);

        let record = match self.record(buyer) {
            Some(record) if record.active => *record,
            _ => return err!(SaleError::NotWhitelisted),
        };

        let tier_amount = self.tier_amount(record.tier);
        require!(tier_amount > 0, SaleError::NoSuchTier);
        require!(
            payment_amount > 0 && payment_amount % tier_amount == 0,
            SaleError::InvalidPaymentAmount
        );
        let units = payment_amount / tier_amount;

        let remaining = record
            .max_purchasable_tiers
            .saturating_sub(record.tiers_purchased);
        require!(units <= remaining, SaleError::PurchaseCapExceeded);

        let tiers_purchased = record
            .tiers_purchased
            .checked_add(units)
            .ok_or(SaleError::Overflow)?;
        let total_raise = self
            .total_raise
            .checked_add(payment_amount)
            .ok_or(SaleError::Overflow)?;
        let total_participant = if record.tiers_purchased == 0 {
            self.total_participant
                .checked_add(1)
                .ok_or(SaleError::Overflow)?
        } else {
            self.total_participant
        };

        if let Some(stored) = self.record_mut(buyer) {
            stored.tiers_purchased = tiers_purchased;
        }
        self.total_raise = total_raise;
        self.total_participant = total_participant;

        Ok(PurchaseReceipt {
            units,
            total_raise,
            total_participant,
        })
    }

    /// Idempotent.
    pub fn finish_sale(&mut self, caller: &Pubkey) -> Result<bool> {
        self.access.guard(caller)?;
        self.is_finished = true;
        msg!("Sale finished");
        Ok(self.is_finished)
    }

    /// Authorizes draining the vault and books the amount. The lamport move
    /// itself happens in the instruction handler.
    pub fn record_withdrawal(&mut self, caller: &Pubkey, amount: u64) -> Result<u64> {
        self.access.guard(caller)?;
        self.total_withdrawn = self
            .total_withdrawn
            .checked_add(amount)
            .ok_or(SaleError::Overflow)?;
        Ok(self.total_withdrawn)
    }

    pub fn summary(&self, now: i64) -> SaleSummary {
        SaleSummary {
            owner: self.access.owner,
            phase: self.phase(now),
            start_time: self.start_time,
            tier_count: u8::try_from(self.tiers.len()).unwrap_or(u8::MAX),
            whitelist_len: u32::try_from(self.whitelist.len()).unwrap_or(u32::MAX),
            total_raise: self.total_raise,
            total_participant: self.total_participant,
            total_withdrawn: self.total_withdrawn,
        }
    }
}

/// Lamports the vault can release while staying rent exempt.
pub fn withdrawable_balance(vault_lamports: u64, rent_floor: u64) -> u64 {
    vault_lamports.saturating_sub(rent_floor)
}

/// Metadata labels are stored zero-padded to a fixed width.
pub fn token_label(raw: &str) -> String {
    raw.trim_end_matches('\0').to_string()
}
