use super::*;

/// The custom errors the contract can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Sender does not hold the role required by the operation (Error code: -4).
    Unauthorized,
    /// Operation is not permitted in the current auction state (Error code: -5).
    InvalidState,
    /// Sender already has a bid, `upBid` must be used instead (Error code: -6).
    DuplicateBidder,
    /// Sender never placed a bid (Error code: -7).
    UnknownBidder,
    /// Raised if bid does not exceed the highest amount (Error code: -8).
    BidTooLow,
    /// Sender is the auction winner or never placed a bid (Error code: -9).
    NotEligible,
    /// Escrow was already refunded or paid out (Error code: -10).
    AlreadySettled,
    /// The outgoing transfer was rejected (Error code: -11).
    TransferFailed,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to contract invocations to CustomContractError.
impl<T> From<CallContractError<T>> for CustomContractError {
    fn from(_cce: CallContractError<T>) -> Self {
        Self::TransferFailed
    }
}

/// Mapping errors related to transfers to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::TransferFailed
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn test_log_errors_mapping() {
        claim_eq!(
            CustomContractError::from(LogError::Full),
            CustomContractError::LogFull
        );
        claim_eq!(
            CustomContractError::from(LogError::Malformed),
            CustomContractError::LogMalformed
        );
    }

    #[concordium_test]
    fn test_payment_errors_mapping() {
        claim_eq!(
            CustomContractError::from(TransferError::AmountTooLarge),
            CustomContractError::TransferFailed
        );
        claim_eq!(
            CustomContractError::from(CallContractError::<()>::Trap),
            CustomContractError::TransferFailed
        );
        claim_eq!(
            CustomContractError::from(ParseError::default()),
            CustomContractError::ParseParams
        );
    }
}
