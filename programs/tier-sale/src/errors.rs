use anchor_lang::prelude::*;

#[error_code]
pub enum SaleError {
    #[msg("Caller is not the sale owner")]
    Unauthorized,
    #[msg("Invalid argument")]
    InvalidArgument,
    #[msg("Operation not allowed in the current sale phase")]
    InvalidState,
    #[msg("Tiers are already configured")]
    AlreadyConfigured,
    #[msg("Payment token is not configured")]
    Unconfigured,
    #[msg("Sale has already started")]
    SaleAlreadyStarted,
    #[msg("Tiers are not configured")]
    TiersNotConfigured,
    #[msg("Sale has not started")]
    SaleNotStarted,
    #[msg("Sale is finished")]
    SaleFinished,
    #[msg("Buyer is not whitelisted")]
    NotWhitelisted,
    #[msg("Tier does not exist")]
    NoSuchTier,
    #[msg("Payment must be a non-zero multiple of the tier price")]
    InvalidPaymentAmount,
    #[msg("Purchase exceeds the remaining tier allowance")]
    PurchaseCapExceeded,
    #[msg("Lamport transfer failed")]
    TransferFailed,
    #[msg("Tier index is out of range")]
    InvalidTierIndex,
    #[msg("Tier price must be greater than zero")]
    InvalidTierPrice,
    #[msg("Whitelist is full")]
    WhitelistFull,
    #[msg("Arithmetic overflow")]
    Overflow,
}

#[cfg(test)]
pub(crate) fn code_of(err: anchor_lang::error::Error) -> u32 {
    match err {
        anchor_lang::error::Error::AnchorError(e) => e.error_code_number,
        anchor_lang::error::Error::ProgramError(e) => panic!("unexpected program error: {e:?}"),
    }
}
