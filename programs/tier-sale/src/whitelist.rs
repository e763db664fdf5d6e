use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::SaleError;
use crate::state::*;

impl Sale {
    pub fn is_sale_open(&self, now: i64) -> bool {
        self.start_time != 0 && now >= self.start_time
    }

    pub fn record(&self, wallet: &Pubkey) -> Option<&WhitelistRecord> {
        self.whitelist.iter().find(|r| r.wallet == *wallet)
    }

    pub(crate) fn record_mut(&mut self, wallet: &Pubkey) -> Option<&mut WhitelistRecord> {
        self.whitelist.iter_mut().find(|r| r.wallet == *wallet)
    }

    /// Zeroed record for wallets that were never whitelisted.
    pub fn get_whitelist(&self, wallet: &Pubkey) -> WhitelistRecord {
        self.record(wallet).copied().unwrap_or(WhitelistRecord {
            wallet: *wallet,
            ..Default::default()
        })
    }

    /// Validates the whole batch before writing any record. Each entry
    /// replaces the wallet's previous record, counts included.
    pub fn add_to_whitelist(
        &mut self,
        caller: &Pubkey,
        entries: &[WhitelistEntry],
        now: i64,
    ) -> Result<()> {
        self.access.guard(caller)?;
        require!(!self.is_sale_open(now), SaleError::SaleAlreadyStarted);
        require!(self.tiers_added, SaleError::TiersNotConfigured);
        require!(
            !entries.is_empty() && entries.len() <= MAX_WHITELIST_BATCH,
            SaleError::InvalidArgument
        );

        let tier_count = self.tiers.len();
        let mut fresh: Vec<Pubkey> = Vec::new();
        for entry in entries {
            require!(
                entry.tier != 0 && usize::from(entry.tier) <= tier_count,
                SaleError::InvalidTierIndex
            );
            if self.record(&entry.wallet).is_none() && !fresh.contains(&entry.wallet) {
                fresh.push(entry.wallet);
            }
        }
        require!(
            self.whitelist.len() + fresh.len() <= MAX_WHITELIST,
            SaleError::WhitelistFull
        );

        for entry in entries {
            let record = WhitelistRecord {
                wallet: entry.wallet,
                tier: entry.tier,
                tiers_purchased: 0,
                max_purchasable_tiers: entry.max_purchasable_tiers,
                active: true,
            };
            match self.record_mut(&entry.wallet) {
                Some(existing) => *existing = record,
                None => self.whitelist.push(record),
            }
        }

        msg!("Whitelisted {} wallets", entries.len());
        Ok(())
    }

    /// Deactivates records, keeping tier and purchase counts. Wallets without a
    /// record are skipped since they are already ineligible.
    pub fn remove_from_whitelist(
        &mut self,
        caller: &Pubkey,
        wallets: &[Pubkey],
        now: i64,
    ) -> Result<()> {
        self.access.guard(caller)?;
        require!(!self.is_sale_open(now), SaleError::SaleAlreadyStarted);
        require!(
            !wallets.is_empty() && wallets.len() <= MAX_WHITELIST_BATCH,
            SaleError::InvalidArgument
        );

        for wallet in wallets {
            if let Some(record) = self.record_mut(wallet) {
                record.active = false;
            }
        }

        msg!("Removed {} wallets from whitelist", wallets.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::code_of;

    const START: i64 = 1_700_000_000;

    fn sale_with_tiers(owner: Pubkey, tiers: Vec<u64>) -> Sale {
        let mut sale = Sale::new(owner, 255, 254);
        sale.set_tiers(&owner, tiers, START - 100).unwrap();
        sale
    }

    fn entry(wallet: Pubkey, tier: u8, cap: u64) -> WhitelistEntry {
        WhitelistEntry {
            wallet,
            tier,
            max_purchasable_tiers: cap,
        }
    }

    #[test]
    fn add_then_get_returns_fresh_record() {
        let owner = Pubkey::new_unique();
        let a = Pubkey::new_unique();
        let mut sale = sale_with_tiers(owner, vec![100]);

        sale.add_to_whitelist(&owner, &[entry(a, 1, 5)], START - 10)
            .unwrap();

        assert_eq!(
            sale.get_whitelist(&a),
            WhitelistRecord {
                wallet: a,
                tier: 1,
                tiers_purchased: 0,
                max_purchasable_tiers: 5,
                active: true,
            }
        );
    }

    #[test]
    fn unknown_wallet_reads_as_zeroed_record() {
        let owner = Pubkey::new_unique();
        let sale = sale_with_tiers(owner, vec![100]);
        let nobody = Pubkey::new_unique();

        let record = sale.get_whitelist(&nobody);

        assert_eq!(record.wallet, nobody);
        assert_eq!(record.tier, 0);
        assert_eq!(record.max_purchasable_tiers, 0);
        assert!(!record.active);
    }

    #[test]
    fn add_requires_owner() {
        let owner = Pubkey::new_unique();
        let mut sale = sale_with_tiers(owner, vec![100]);
        let stranger = Pubkey::new_unique();

        let err = sale
            .add_to_whitelist(&stranger, &[entry(stranger, 1, 1)], START - 10)
            .unwrap_err();

        assert_eq!(code_of(err), u32::from(SaleError::Unauthorized));
        assert!(sale.whitelist.is_empty());
    }

    #[test]
    fn add_requires_tiers() {
        let owner = Pubkey::new_unique();
        let mut sale = Sale::new(owner, 255, 254);

        let err = sale
            .add_to_whitelist(&owner, &[entry(Pubkey::new_unique(), 1, 1)], START)
            .unwrap_err();

        assert_eq!(code_of(err), u32::from(SaleError::TiersNotConfigured));
    }

    #[test]
    fn add_is_blocked_once_sale_opens() {
        let owner = Pubkey::new_unique();
        let mut sale = sale_with_tiers(owner, vec![100]);
        sale.start_time = START;

        let err = sale
            .add_to_whitelist(&owner, &[entry(Pubkey::new_unique(), 1, 1)], START)
            .unwrap_err();
        assert_eq!(code_of(err), u32::from(SaleError::SaleAlreadyStarted));

        // still allowed before the window opens
        sale.add_to_whitelist(&owner, &[entry(Pubkey::new_unique(), 1, 1)], START - 1)
            .unwrap();
    }

    #[test]
    fn edits_stay_blocked_after_finish() {
        let owner = Pubkey::new_unique();
        let mut sale = sale_with_tiers(owner, vec![100]);
        sale.start_time = START;
        sale.is_finished = true;

        let err = sale
            .remove_from_whitelist(&owner, &[Pubkey::new_unique()], START + 500)
            .unwrap_err();

        assert_eq!(code_of(err), u32::from(SaleError::SaleAlreadyStarted));
    }

    #[test]
    fn out_of_range_tier_rejects_whole_batch() {
        let owner = Pubkey::new_unique();
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let mut sale = sale_with_tiers(owner, vec![100, 200]);

        let err = sale
            .add_to_whitelist(&owner, &[entry(a, 2, 1), entry(b, 3, 1)], START - 10)
            .unwrap_err();
        assert_eq!(code_of(err), u32::from(SaleError::InvalidTierIndex));
        assert!(sale.record(&a).is_none());

        let err = sale
            .add_to_whitelist(&owner, &[entry(a, 0, 1)], START - 10)
            .unwrap_err();
        assert_eq!(code_of(err), u32::from(SaleError::InvalidTierIndex));
    }

    #[test]
    fn empty_or_oversized_batch_is_rejected() {
        let owner = Pubkey::new_unique();
        let mut sale = sale_with_tiers(owner, vec![100]);

        let err = sale.add_to_whitelist(&owner, &[], START - 10).unwrap_err();
        assert_eq!(code_of(err), u32::from(SaleError::InvalidArgument));

        let batch: Vec<_> = (0..=MAX_WHITELIST_BATCH)
            .map(|_| entry(Pubkey::new_unique(), 1, 1))
            .collect();
        let err = sale.add_to_whitelist(&owner, &batch, START - 10).unwrap_err();
        assert_eq!(code_of(err), u32::from(SaleError::InvalidArgument));
    }

    #[test]
    fn capacity_is_enforced() {
        let owner = Pubkey::new_unique();
        let mut sale = sale_with_tiers(owner, vec![100]);

        for _ in 0..MAX_WHITELIST / MAX_WHITELIST_BATCH {
            let batch: Vec<_> = (0..MAX_WHITELIST_BATCH)
                .map(|_| entry(Pubkey::new_unique(), 1, 1))
                .collect();
            sale.add_to_whitelist(&owner, &batch, START - 10).unwrap();
        }
        assert_eq!(sale.whitelist.len(), MAX_WHITELIST);

        let err = sale
            .add_to_whitelist(&owner, &[entry(Pubkey::new_unique(), 1, 1)], START - 10)
            .unwrap_err();
        assert_eq!(code_of(err), u32::from(SaleError::WhitelistFull));

        // overwriting an existing wallet needs no extra room
        let existing = sale.whitelist[0].wallet;
        sale.add_to_whitelist(&owner, &[entry(existing, 1, 9)], START - 10)
            .unwrap();
        assert_eq!(sale.get_whitelist(&existing).max_purchasable_tiers, 9);
    }

    #[test]
    fn duplicate_wallet_in_batch_keeps_last_entry() {
        let owner = Pubkey::new_unique();
        let a = Pubkey::new_unique();
        let mut sale = sale_with_tiers(owner, vec![100, 200]);

        sale.add_to_whitelist(&owner, &[entry(a, 1, 2), entry(a, 2, 7)], START - 10)
            .unwrap();

        assert_eq!(sale.whitelist.len(), 1);
        let record = sale.get_whitelist(&a);
        assert_eq!(record.tier, 2);
        assert_eq!(record.max_purchasable_tiers, 7);
    }

    #[test]
    fn remove_preserves_counts_and_readd_resets_them() {
        let owner = Pubkey::new_unique();
        let a = Pubkey::new_unique();
        let mut sale = sale_with_tiers(owner, vec![100]);
        sale.add_to_whitelist(&owner, &[entry(a, 1, 5)], START - 10)
            .unwrap();
        sale.whitelist[0].tiers_purchased = 3;

        sale.remove_from_whitelist(&owner, &[a], START - 10).unwrap();

        let record = sale.get_whitelist(&a);
        assert!(!record.active);
        assert_eq!(record.tier, 1);
        assert_eq!(record.tiers_purchased, 3);
        assert_eq!(record.max_purchasable_tiers, 5);

        sale.add_to_whitelist(&owner, &[entry(a, 1, 5)], START - 10)
            .unwrap();

        let record = sale.get_whitelist(&a);
        assert!(record.active);
        assert_eq!(record.tiers_purchased, 0);
    }

    #[test]
    fn removing_unknown_wallet_creates_nothing() {
        let owner = Pubkey::new_unique();
        let mut sale = sale_with_tiers(owner, vec![100]);

        sale.remove_from_whitelist(&owner, &[Pubkey::new_unique()], START - 10)
            .unwrap();

        assert!(sale.whitelist.is_empty());
    }

    #[test]
    fn remove_requires_owner() {
        let owner = Pubkey::new_unique();
        let a = Pubkey::new_unique();
        let mut sale = sale_with_tiers(owner, vec![100]);
        sale.add_to_whitelist(&owner, &[entry(a, 1, 5)], START - 10)
            .unwrap();

        let err = sale.remove_from_whitelist(&a, &[a], START - 10).unwrap_err();

        assert_eq!(code_of(err), u32::from(SaleError::Unauthorized));
        assert!(sale.get_whitelist(&a).active);
    }
}
