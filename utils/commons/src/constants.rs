/// Tag for the Custom Start Auction event.
pub const START_TAG: u8 = u8::MAX - 1;

/// Tag for the Custom End Auction event.
pub const END_TAG: u8 = u8::MAX - 2;

/// Tag for the Custom Biding event.
pub const BIDING_TAG: u8 = u8::MAX - 3;

/// Tag for the Custom Up Biding event.
pub const UP_BIDING_TAG: u8 = u8::MAX - 4;

/// Tag for the Custom Refund event.
pub const REFUND_TAG: u8 = u8::MAX - 5;

/// Tag for the Custom Payout event.
pub const PAYOUT_TAG: u8 = u8::MAX - 6;

/// Entrypoint invoked on contract recipients when CCD is paid out to them.
pub const DEPOSIT_ENTRYPOINT: &str = "deposit";
