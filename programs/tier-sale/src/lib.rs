use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::metadata::{Metadata, MetadataAccount};
use anchor_spl::token::Mint;

pub mod access_control;
pub mod constants;
pub mod errors;
pub mod events;
pub mod sale;
pub mod state;
pub mod whitelist;

use constants::*;
use errors::SaleError;
use events::*;
use sale::{token_label, withdrawable_balance};
use state::*;

declare_id!("CzQSx3vKRFxvyLVWZNFmfDgYAeTsoxABQ4ZA9Gsap5WX");

#[program]
pub mod tier_sale {
    use super::*;

    pub fn initialize_sale(ctx: Context<InitializeSale>) -> Result<()> {
        let sale = &mut ctx.accounts.sale;
        **sale = Sale::new(ctx.accounts.owner.key(), ctx.bumps.sale, ctx.bumps.vault);

        // The vault starts rent exempt so purchases of any size can land in it.
        let rent_floor = Rent::get()?.minimum_balance(0);
        let shortfall = rent_floor.saturating_sub(ctx.accounts.vault.lamports());
        if shortfall > 0 {
            let cpi_accounts = system_program::Transfer {
                from: ctx.accounts.owner.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
            };
            let cpi_program = ctx.accounts.system_program.to_account_info();
            let cpi_ctx = CpiContext::new(cpi_program, cpi_accounts);
            system_program::transfer(cpi_ctx, shortfall)?;
        }

        msg!("Sale initialized, owner {}", ctx.accounts.owner.key());
        Ok(())
    }

    pub fn set_payment_token(ctx: Context<SetPaymentToken>) -> Result<()> {
        let mint = &ctx.accounts.payment_mint;
        let metadata = &ctx.accounts.payment_metadata;
        ctx.accounts
            .sale
            .set_payment_token(&ctx.accounts.owner.key(), mint.key())?;

        emit!(PaymentTokenConfigured {
            mint: mint.key(),
            name: token_label(&metadata.name),
            symbol: token_label(&metadata.symbol),
            decimals: mint.decimals,
            supply: mint.supply,
        });

        Ok(())
    }

    pub fn set_tiers(ctx: Context<UpdateSale>, prices: Vec<u64>) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        ctx.accounts
            .sale
            .set_tiers(&ctx.accounts.owner.key(), prices.clone(), now)?;

        emit!(TiersAdded { prices });

        Ok(())
    }

    pub fn open_sale(ctx: Context<UpdateSale>, start_time: i64) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        ctx.accounts
            .sale
            .open_sale(&ctx.accounts.owner.key(), start_time, now)?;

        emit!(SaleOpened {
            start_time,
            time: now,
        });

        Ok(())
    }

    pub fn add_to_whitelist(ctx: Context<UpdateSale>, entries: Vec<WhitelistEntry>) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        ctx.accounts
            .sale
            .add_to_whitelist(&ctx.accounts.owner.key(), &entries, now)?;

        emit!(WhitelistAdded { entries });

        Ok(())
    }

    pub fn remove_from_whitelist(ctx: Context<UpdateSale>, wallets: Vec<Pubkey>) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        ctx.accounts
            .sale
            .remove_from_whitelist(&ctx.accounts.owner.key(), &wallets, now)?;

        emit!(WhitelistRemoved { wallets });

        Ok(())
    }

    pub fn purchase(ctx: Context<Purchase>, amount: u64) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let buyer = ctx.accounts.buyer.key();
        let receipt = ctx.accounts.sale.purchase(&buyer, amount, now)?;

        let cpi_accounts = system_program::Transfer {
            from: ctx.accounts.buyer.to_account_info(),
            to: ctx.accounts.vault.to_account_info(),
        };
        let cpi_program = ctx.accounts.system_program.to_account_info();
        let cpi_ctx = CpiContext::new(cpi_program, cpi_accounts);
        system_program::transfer(cpi_ctx, amount)?;

        emit!(TokensPurchased {
            buyer,
            amount,
            units: receipt.units,
            total_raise: receipt.total_raise,
            total_participant: receipt.total_participant,
        });

        Ok(())
    }

    pub fn finish_sale(ctx: Context<UpdateSale>) -> Result<bool> {
        let is_finished = ctx.accounts.sale.finish_sale(&ctx.accounts.owner.key())?;

        emit!(SaleFinished {
            is_finished,
            time: Clock::get()?.unix_timestamp,
        });

        Ok(is_finished)
    }

    /// Sends everything above the vault's rent floor to the owner.
    pub fn withdraw_funds(ctx: Context<WithdrawFunds>) -> Result<()> {
        let owner = ctx.accounts.owner.key();
        let rent_floor = Rent::get()?.minimum_balance(0);
        let amount = withdrawable_balance(ctx.accounts.vault.lamports(), rent_floor);
        ctx.accounts.sale.record_withdrawal(&owner, amount)?;

        let sale_key = ctx.accounts.sale.key();
        let seeds = &[
            VAULT_SEED,
            sale_key.as_ref(),
            &[ctx.accounts.sale.vault_bump],
        ];
        let signer = &[&seeds[..]];
        let cpi_accounts = system_program::Transfer {
            from: ctx.accounts.vault.to_account_info(),
            to: ctx.accounts.owner.to_account_info(),
        };
        let cpi_program = ctx.accounts.system_program.to_account_info();
        let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer);
        system_program::transfer(cpi_ctx, amount).map_err(|e| {
            msg!("Vault transfer failed: {}", e);
            error!(SaleError::TransferFailed)
        })?;

        emit!(FundsWithdrawn {
            receiver: owner,
            amount,
            time: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }

    pub fn transfer_ownership(ctx: Context<UpdateSale>, new_owner: Pubkey) -> Result<()> {
        let previous_owner = ctx
            .accounts
            .sale
            .access
            .transfer_ownership(&ctx.accounts.owner.key(), new_owner)?;

        emit!(OwnershipTransferred {
            previous_owner,
            new_owner,
        });

        Ok(())
    }

    pub fn renounce_ownership(ctx: Context<UpdateSale>) -> Result<()> {
        let previous_owner = ctx
            .accounts
            .sale
            .access
            .renounce_ownership(&ctx.accounts.owner.key())?;

        emit!(OwnershipTransferred {
            previous_owner,
            new_owner: Pubkey::default(),
        });

        Ok(())
    }

    pub fn get_token_address(ctx: Context<ViewSale>) -> Result<Option<Pubkey>> {
        Ok(ctx.accounts.sale.payment_mint)
    }

    pub fn get_tier_amount(ctx: Context<ViewSale>, index: u8) -> Result<u64> {
        Ok(ctx.accounts.sale.tier_amount(index))
    }

    pub fn is_initialized(ctx: Context<ViewSale>) -> Result<bool> {
        Ok(ctx.accounts.sale.is_initialized())
    }

    pub fn is_sale_open(ctx: Context<ViewSale>) -> Result<bool> {
        let now = Clock::get()?.unix_timestamp;
        Ok(ctx.accounts.sale.is_sale_open(now))
    }

    pub fn get_max_payable_amount(ctx: Context<ViewSale>, participant: Pubkey) -> Result<u64> {
        ctx.accounts.sale.max_payable_amount(&participant)
    }

    pub fn get_whitelist(ctx: Context<ViewSale>, participant: Pubkey) -> Result<WhitelistRecord> {
        Ok(ctx.accounts.sale.get_whitelist(&participant))
    }

    pub fn get_phase(ctx: Context<ViewSale>) -> Result<SalePhase> {
        let now = Clock::get()?.unix_timestamp;
        Ok(ctx.accounts.sale.phase(now))
    }

    pub fn get_sale_summary(ctx: Context<ViewSale>) -> Result<SaleSummary> {
        let now = Clock::get()?.unix_timestamp;
        Ok(ctx.accounts.sale.summary(now))
    }
}

#[derive(Accounts)]
pub struct InitializeSale<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        init,
        payer = owner,
        space = Sale::LEN,
        seeds = [SALE_SEED],
        bump
    )]
    pub sale: Account<'info, Sale>,

    #[account(
        mut,
        seeds = [VAULT_SEED, sale.key().as_ref()],
        bump
    )]
    pub vault: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct SetPaymentToken<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [SALE_SEED],
        bump = sale.bump,
    )]
    pub sale: Account<'info, Sale>,

    pub payment_mint: Account<'info, Mint>,

    #[account(
        seeds = [b"metadata", Metadata::id().as_ref(), payment_mint.key().as_ref()],
        seeds::program = Metadata::id(),
        bump,
    )]
    pub payment_metadata: Account<'info, MetadataAccount>,
}

#[derive(Accounts)]
pub struct UpdateSale<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [SALE_SEED],
        bump = sale.bump,
    )]
    pub sale: Account<'info, Sale>,
}

#[derive(Accounts)]
pub struct Purchase<'info> {
    #[account(mut)]
    pub buyer: Signer<'info>,

    #[account(
        mut,
        seeds = [SALE_SEED],
        bump = sale.bump,
    )]
    pub sale: Account<'info, Sale>,

    #[account(
        mut,
        seeds = [VAULT_SEED, sale.key().as_ref()],
        bump = sale.vault_bump,
    )]
    pub vault: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct WithdrawFunds<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [SALE_SEED],
        bump = sale.bump,
    )]
    pub sale: Account<'info, Sale>,

    #[account(
        mut,
        seeds = [VAULT_SEED, sale.key().as_ref()],
        bump = sale.vault_bump,
    )]
    pub vault: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct ViewSale<'info> {
    #[account(
        seeds = [SALE_SEED],
        bump = sale.bump,
    )]
    pub sale: Account<'info, Sale>,
}
