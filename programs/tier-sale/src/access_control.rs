use anchor_lang::prelude::*;

use crate::errors::SaleError;

/// Outcome of an owner check. Callers that only need to branch use this
/// directly; privileged paths go through [`Ownable::guard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Authorized,
    Unauthorized,
}

impl Authorization {
    pub fn is_authorized(self) -> bool {
        self == Authorization::Authorized
    }
}

/// Single-owner gate embedded in the sale account.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Default, InitSpace, Debug, PartialEq, Eq)]
pub struct Ownable {
    pub owner: Pubkey,
}

impl Ownable {
    pub fn new(owner: Pubkey) -> Self {
        Self { owner }
    }

    /// A renounced owner is the null key and never authorizes anyone.
    pub fn is_renounced(&self) -> bool {
        self.owner == Pubkey::default()
    }

    pub fn check(&self, caller: &Pubkey) -> Authorization {
        if !self.is_renounced() && *caller == self.owner {
            Authorization::Authorized
        } else {
            Authorization::Unauthorized
        }
    }

    pub fn guard(&self, caller: &Pubkey) -> Result<()> {
        match self.check(caller) {
            Authorization::Authorized => Ok(()),
            Authorization::Unauthorized => err!(SaleError::Unauthorized),
        }
    }

    /// Returns the previous owner.
    pub fn transfer_ownership(&mut self, caller: &Pubkey, new_owner: Pubkey) -> Result<Pubkey> {
        self.guard(caller)?;
        require!(new_owner != Pubkey::default(), SaleError::InvalidArgument);

        let previous = self.owner;
        self.owner = new_owner;
        Ok(previous)
    }

    pub fn renounce_ownership(&mut self, caller: &Pubkey) -> Result<Pubkey> {
        self.guard(caller)?;

        let previous = self.owner;
        self.owner = Pubkey::default();
        Ok(previous)
    }
}
