use super::*;

// Functions for creating and updating the contract state.
impl<S: HasStateApi> State<S> {
    /// Creates a new auction that does not accept bids yet.
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        beneficiary: Address,
        administrator: AccountAddress,
        reference_value: u64,
    ) -> Self {
        State {
            beneficiary,
            administrator,
            reference_value,
            auction_state: AuctionState::Created,
            highest_bidder: None,
            highest_bid: Amount::zero(),
            ledger: state_builder.new_map(),
        }
    }

    fn ensure_administrator(&self, sender: &Address) -> ContractResult<()> {
        ensure!(
            sender.matches_account(&self.administrator),
            CustomContractError::Unauthorized
        );
        Ok(())
    }

    fn ensure_state(&self, expected: AuctionState) -> ContractResult<()> {
        ensure_eq!(
            self.auction_state,
            expected,
            CustomContractError::InvalidState
        );
        Ok(())
    }

    /// Open the auction for bids.
    pub fn start(&mut self, sender: &Address) -> ContractResult<()> {
        self.ensure_administrator(sender)?;
        self.ensure_state(AuctionState::Created)?;
        self.auction_state = AuctionState::Active;
        Ok(())
    }

    /// Close the auction, freezing the highest bid.
    pub fn end(&mut self, sender: &Address) -> ContractResult<()> {
        self.ensure_administrator(sender)?;
        self.ensure_state(AuctionState::Active)?;
        self.auction_state = AuctionState::Closed;
        Ok(())
    }

    /// Escrowed amount of the given address, zero if it never bid.
    pub fn balance_of(&self, address: &Address) -> Amount {
        self.ledger
            .get(address)
            .map(|amount| *amount)
            .unwrap_or_else(Amount::zero)
    }

    /// Register the first bid of `bidder`.
    pub fn make_bid(&mut self, bidder: Address, amount: Amount) -> ContractResult<()> {
        self.ensure_state(AuctionState::Active)?;
        ensure!(
            self.ledger.get(&bidder).is_none(),
            CustomContractError::DuplicateBidder
        );
        ensure!(amount > self.highest_bid, CustomContractError::BidTooLow);

        self.ledger.insert(bidder, amount);
        self.highest_bidder = Some(bidder);
        self.highest_bid = amount;
        Ok(())
    }

    /// Top up the escrow of an existing bidder. Returns the new total.
    pub fn up_bid(&mut self, bidder: Address, amount: Amount) -> ContractResult<Amount> {
        self.ensure_state(AuctionState::Active)?;
        let escrowed = self
            .ledger
            .get(&bidder)
            .map(|escrowed| *escrowed)
            .ok_or(CustomContractError::UnknownBidder)?;

        let total = escrowed + amount;
        ensure!(total > self.highest_bid, CustomContractError::BidTooLow);

        self.ledger.insert(bidder, total);
        self.highest_bidder = Some(bidder);
        self.highest_bid = total;
        Ok(total)
    }

    /// Release the escrow of a losing bidder.
    ///
    /// The ledger entry is zeroed before the funds leave the contract, so a
    /// reentrant call sees the entry as settled.
    pub fn settle_refund(&mut self, claimant: Address) -> ContractResult<Settlement> {
        self.ensure_state(AuctionState::Closed)?;
        ensure!(
            self.highest_bidder != Some(claimant),
            CustomContractError::NotEligible
        );
        let amount = self
            .ledger
            .get(&claimant)
            .map(|amount| *amount)
            .ok_or(CustomContractError::NotEligible)?;
        ensure!(
            amount > Amount::zero(),
            CustomContractError::AlreadySettled
        );

        self.ledger.insert(claimant, Amount::zero());
        Ok(Settlement {
            entry: claimant,
            recipient: claimant,
            amount,
        })
    }

    /// Release the winning escrow to the beneficiary.
    pub fn settle_payout(&mut self, sender: &Address) -> ContractResult<Settlement> {
        self.ensure_administrator(sender)?;
        self.ensure_state(AuctionState::Closed)?;

        // No bids means there is nothing left to settle
        let winner = self
            .highest_bidder
            .ok_or(CustomContractError::AlreadySettled)?;
        let amount = self.balance_of(&winner);
        ensure!(
            amount > Amount::zero(),
            CustomContractError::AlreadySettled
        );

        self.ledger.insert(winner, Amount::zero());
        Ok(Settlement {
            entry: winner,
            recipient: self.beneficiary,
            amount,
        })
    }

    /// Put released escrow back after the payment failed.
    pub fn restore(&mut self, settlement: Settlement) {
        self.ledger.insert(settlement.entry, settlement.amount);
    }

    pub fn view(&self) -> ViewState {
        ViewState {
            auction_state: self.auction_state,
            highest_bidder: self.highest_bidder,
            highest_bid: self.highest_bid,
            beneficiary: self.beneficiary,
            administrator: self.administrator,
            reference_value: self.reference_value,
        }
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use test_infrastructure::*;

    const ADMIN: AccountAddress = AccountAddress([0u8; 32]);
    const BENEFICIARY: AccountAddress = AccountAddress([1u8; 32]);
    const ALICE: Address = Address::Account(AccountAddress([2u8; 32]));
    const BOB: Address = Address::Account(AccountAddress([3u8; 32]));
    const CAROL: Address = Address::Contract(ContractAddress {
        index: 4,
        subindex: 0,
    });

    fn admin() -> Address {
        Address::Account(ADMIN)
    }

    fn ccd(micro_ccd: u64) -> Amount {
        Amount::from_micro_ccd(micro_ccd)
    }

    fn fresh_state() -> State<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();
        State::new(
            &mut state_builder,
            Address::Account(BENEFICIARY),
            ADMIN,
            100,
        )
    }

    fn active_state() -> State<TestStateApi> {
        let mut state = fresh_state();
        claim_eq!(state.start(&admin()), Ok(()));
        state
    }

    fn claim_highest(state: &State<TestStateApi>, bidder: Address, amount: Amount) {
        claim_eq!(state.highest_bidder, Some(bidder));
        claim_eq!(state.highest_bid, amount);
        claim_eq!(state.balance_of(&bidder), amount);
    }

    #[concordium_test]
    fn test_new_state() {
        let state = fresh_state();

        claim_eq!(state.auction_state, AuctionState::Created);
        claim_eq!(state.highest_bidder, None);
        claim_eq!(state.highest_bid, Amount::zero());
        claim_eq!(state.balance_of(&ALICE), Amount::zero());
        claim_eq!(
            state.view(),
            ViewState {
                auction_state: AuctionState::Created,
                highest_bidder: None,
                highest_bid: Amount::zero(),
                beneficiary: Address::Account(BENEFICIARY),
                administrator: ADMIN,
                reference_value: 100,
            }
        );
    }

    #[concordium_test]
    fn test_lifecycle_transitions() {
        let mut state = fresh_state();

        claim_eq!(state.end(&admin()), Err(CustomContractError::InvalidState));
        claim_eq!(state.start(&ALICE), Err(CustomContractError::Unauthorized));
        claim_eq!(state.auction_state, AuctionState::Created);

        claim_eq!(state.start(&admin()), Ok(()));
        claim_eq!(state.auction_state, AuctionState::Active);
        claim_eq!(state.start(&admin()), Err(CustomContractError::InvalidState));

        claim_eq!(state.end(&BOB), Err(CustomContractError::Unauthorized));
        claim_eq!(state.end(&admin()), Ok(()));
        claim_eq!(state.auction_state, AuctionState::Closed);

        claim_eq!(state.end(&admin()), Err(CustomContractError::InvalidState));
        claim_eq!(state.start(&admin()), Err(CustomContractError::InvalidState));
        claim_eq!(state.auction_state, AuctionState::Closed);
    }

    #[concordium_test]
    fn test_bids_rejected_outside_active_state() {
        let mut state = fresh_state();
        claim_eq!(
            state.make_bid(ALICE, ccd(1)),
            Err(CustomContractError::InvalidState)
        );

        claim_eq!(state.start(&admin()), Ok(()));
        claim_eq!(state.make_bid(ALICE, ccd(1)), Ok(()));
        claim_eq!(state.end(&admin()), Ok(()));

        claim_eq!(
            state.make_bid(BOB, ccd(5)),
            Err(CustomContractError::InvalidState)
        );
        claim_eq!(
            state.up_bid(ALICE, ccd(5)),
            Err(CustomContractError::InvalidState)
        );
        claim_highest(&state, ALICE, ccd(1));
    }

    #[concordium_test]
    fn test_make_bid_strictly_increasing() {
        let mut state = active_state();

        claim_eq!(
            state.make_bid(ALICE, Amount::zero()),
            Err(CustomContractError::BidTooLow)
        );
        claim_eq!(state.make_bid(ALICE, ccd(2)), Ok(()));
        claim_highest(&state, ALICE, ccd(2));

        claim_eq!(
            state.make_bid(BOB, ccd(1)),
            Err(CustomContractError::BidTooLow)
        );
        claim_eq!(
            state.make_bid(BOB, ccd(2)),
            Err(CustomContractError::BidTooLow)
        );
        claim_eq!(state.balance_of(&BOB), Amount::zero());
        claim!(state.ledger.get(&BOB).is_none());

        claim_eq!(state.make_bid(CAROL, ccd(3)), Ok(()));
        claim_highest(&state, CAROL, ccd(3));
        claim_eq!(state.balance_of(&ALICE), ccd(2));
    }

    #[concordium_test]
    fn test_make_bid_duplicate_bidder() {
        let mut state = active_state();

        claim_eq!(state.make_bid(ALICE, ccd(1)), Ok(()));
        claim_eq!(
            state.make_bid(ALICE, ccd(10)),
            Err(CustomContractError::DuplicateBidder)
        );
        claim_eq!(state.make_bid(BOB, ccd(2)), Ok(()));
        claim_eq!(
            state.make_bid(ALICE, ccd(10)),
            Err(CustomContractError::DuplicateBidder)
        );
        claim_highest(&state, BOB, ccd(2));
        claim_eq!(state.balance_of(&ALICE), ccd(1));
    }

    #[concordium_test]
    fn test_up_bid() {
        let mut state = active_state();

        claim_eq!(
            state.up_bid(ALICE, ccd(1)),
            Err(CustomContractError::UnknownBidder)
        );

        claim_eq!(state.make_bid(ALICE, ccd(1)), Ok(()));
        claim_eq!(state.up_bid(ALICE, ccd(2)), Ok(ccd(3)));
        claim_highest(&state, ALICE, ccd(3));

        claim_eq!(state.make_bid(BOB, ccd(4)), Ok(()));
        // 3 + 1 only ties the highest bid
        claim_eq!(
            state.up_bid(ALICE, ccd(1)),
            Err(CustomContractError::BidTooLow)
        );
        claim_eq!(state.balance_of(&ALICE), ccd(3));

        // Highest bidder slot moves back to a previously outbid participant
        claim_eq!(state.up_bid(ALICE, ccd(2)), Ok(ccd(5)));
        claim_highest(&state, ALICE, ccd(5));
        claim_eq!(state.balance_of(&BOB), ccd(4));
    }

    #[concordium_test]
    fn test_highest_bid_tracks_ledger() {
        let mut state = active_state();
        let mut previous = Amount::zero();

        let steps: [(Address, u64, bool); 6] = [
            (ALICE, 1, false),
            (BOB, 3, false),
            (ALICE, 3, true),
            (CAROL, 7, false),
            (BOB, 5, true),
            (BOB, 1, true),
        ];
        for (bidder, micro_ccd, is_up_bid) in steps.iter() {
            let result = if *is_up_bid {
                state.up_bid(*bidder, ccd(*micro_ccd)).map(|_| ())
            } else {
                state.make_bid(*bidder, ccd(*micro_ccd))
            };
            claim_eq!(result, Ok(()));

            claim!(state.highest_bid > previous);
            claim_highest(&state, *bidder, state.balance_of(bidder));
            previous = state.highest_bid;
        }

        claim_highest(&state, BOB, ccd(9));
        claim_eq!(state.balance_of(&ALICE), ccd(4));
        claim_eq!(state.balance_of(&CAROL), ccd(7));
    }

    #[concordium_test]
    fn test_settle_refund() {
        let mut state = active_state();
        claim_eq!(state.make_bid(ALICE, ccd(1)), Ok(()));
        claim_eq!(state.make_bid(BOB, ccd(2)), Ok(()));

        claim_eq!(
            state.settle_refund(ALICE),
            Err(CustomContractError::InvalidState)
        );
        claim_eq!(state.end(&admin()), Ok(()));

        claim_eq!(
            state.settle_refund(BOB),
            Err(CustomContractError::NotEligible)
        );
        claim_eq!(
            state.settle_refund(CAROL),
            Err(CustomContractError::NotEligible)
        );

        claim_eq!(
            state.settle_refund(ALICE),
            Ok(Settlement {
                entry: ALICE,
                recipient: ALICE,
                amount: ccd(1),
            })
        );
        claim_eq!(state.balance_of(&ALICE), Amount::zero());
        claim_eq!(
            state.settle_refund(ALICE),
            Err(CustomContractError::AlreadySettled)
        );
        claim_highest(&state, BOB, ccd(2));
    }

    #[concordium_test]
    fn test_settle_payout() {
        let mut state = active_state();
        claim_eq!(state.make_bid(ALICE, ccd(5)), Ok(()));

        claim_eq!(
            state.settle_payout(&admin()),
            Err(CustomContractError::InvalidState)
        );
        claim_eq!(state.end(&admin()), Ok(()));
        claim_eq!(
            state.settle_payout(&ALICE),
            Err(CustomContractError::Unauthorized)
        );

        claim_eq!(
            state.settle_payout(&admin()),
            Ok(Settlement {
                entry: ALICE,
                recipient: Address::Account(BENEFICIARY),
                amount: ccd(5),
            })
        );
        claim_eq!(state.balance_of(&ALICE), Amount::zero());
        claim_eq!(
            state.settle_payout(&admin()),
            Err(CustomContractError::AlreadySettled)
        );
        // The winner stays ineligible for a refund
        claim_eq!(
            state.settle_refund(ALICE),
            Err(CustomContractError::NotEligible)
        );
        // Winning bid stays frozen after the payout
        claim_eq!(state.highest_bid, ccd(5));
    }

    #[concordium_test]
    fn test_settle_payout_without_bids() {
        let mut state = active_state();
        claim_eq!(state.end(&admin()), Ok(()));
        claim_eq!(
            state.settle_payout(&admin()),
            Err(CustomContractError::AlreadySettled)
        );
    }

    #[concordium_test]
    fn test_restore_after_failed_payment() {
        let mut state = active_state();
        claim_eq!(state.make_bid(ALICE, ccd(1)), Ok(()));
        claim_eq!(state.make_bid(BOB, ccd(2)), Ok(()));
        claim_eq!(state.end(&admin()), Ok(()));

        let settlement = state.settle_refund(ALICE).expect_report("Refund is allowed");
        claim_eq!(state.balance_of(&ALICE), Amount::zero());
        state.restore(settlement);
        claim_eq!(state.balance_of(&ALICE), ccd(1));

        let settlement = state.settle_payout(&admin()).expect_report("Payout is allowed");
        state.restore(settlement);
        claim_highest(&state, BOB, ccd(2));

        // Restored entries can be settled again
        claim!(state.settle_refund(ALICE).is_ok());
        claim!(state.settle_payout(&admin()).is_ok());
    }
}
