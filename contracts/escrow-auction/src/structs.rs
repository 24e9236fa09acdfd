use super::*;

/// Lifecycle of the auction. Transitions only ever move forward.
#[derive(Debug, Clone, Copy, Serialize, SchemaType, Eq, PartialEq)]
pub enum AuctionState {
    /// Deployed, not yet accepting bids.
    Created,
    /// Accepting bids.
    Active,
    /// Bids are frozen, escrow can be settled.
    Closed,
}

/// The contract state.
#[derive(Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Receiver of the winning bid.
    pub beneficiary: Address,
    /// Account allowed to start and end the auction and to pay out the winner.
    pub administrator: AccountAddress,
    /// Auxiliary value supplied on initialization.
    pub reference_value: u64,
    pub auction_state: AuctionState,
    /// Unset until the first valid bid.
    pub highest_bidder: Option<Address>,
    pub highest_bid: Amount,
    /// Escrowed amount per bidder. Zeroed entries are settled.
    pub ledger: StateMap<Address, Amount, S>,
}

/// Type of the parameter to the `init` function.
#[derive(Debug, Serialize, SchemaType)]
pub struct InitParams {
    pub beneficiary: Address,
    pub reference_value: u64,
}

/// Auction overview returned by the `view` function.
#[derive(Debug, Serialize, SchemaType, Eq, PartialEq)]
pub struct ViewState {
    pub auction_state: AuctionState,
    pub highest_bidder: Option<Address>,
    pub highest_bid: Amount,
    pub beneficiary: Address,
    pub administrator: AccountAddress,
    pub reference_value: u64,
}

/// Escrow released from the ledger that MUST be paid out, or put back with
/// `State::restore` if the payment fails.
#[must_use]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Settlement {
    /// Ledger entry the escrow was taken from.
    pub entry: Address,
    /// Receiver of the funds.
    pub recipient: Address,
    pub amount: Amount,
}
