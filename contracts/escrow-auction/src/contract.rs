use super::*;

/// Initialize the auction with its beneficiary. The account creating the
/// instance becomes the administrator.
///
/// It rejects if:
/// - It fails to parse the parameter.
#[init(contract = "EscrowAuction", parameter = "InitParams")]
fn init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params: InitParams = ctx.parameter_cursor().get()?;

    // Initialising state
    let state = State::new(
        state_builder,
        params.beneficiary,
        ctx.init_origin(),
        params.reference_value,
    );

    Ok(state)
}

/// Open the auction for bids.
///
/// It rejects if:
/// - Sender is not the administrator.
/// - Auction was already started.
/// - Fails to log `Start` event.
#[receive(
    contract = "EscrowAuction",
    name = "startAuction",
    mutable,
    enable_logger
)]
fn start_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    host.state_mut().start(&ctx.sender())?;

    logger.log(&CustomEvent::Start)?;

    Ok(())
}

/// Stop accepting bids. The highest bid at this point wins.
///
/// It rejects if:
/// - Sender is not the administrator.
/// - Auction is not active.
/// - Fails to log `End` event.
#[receive(contract = "EscrowAuction", name = "endAuction", mutable, enable_logger)]
fn end_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let state = host.state_mut();
    state.end(&ctx.sender())?;

    logger.log(&CustomEvent::End(EndEvent {
        winner: state.highest_bidder,
        amount: state.highest_bid,
    }))?;

    Ok(())
}

/// Place the first bid of the sender, escrowing the attached amount.
///
/// It rejects if:
/// - Auction is not active.
/// - Sender has bid before, `upBid` has to be used instead.
/// - Attached amount does not exceed the highest bid.
/// - Fails to log `Biding` event.
#[receive(
    contract = "EscrowAuction",
    name = "makeBid",
    mutable,
    payable,
    enable_logger
)]
fn make_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let bidder = ctx.sender();
    host.state_mut().make_bid(bidder, amount)?;

    // Event for Biding.
    logger.log(&CustomEvent::Biding(BidingEvent {
        bidder,
        amount,
        total: amount,
    }))?;

    Ok(())
}

/// Add the attached amount to the escrow of an existing bidder.
///
/// It rejects if:
/// - Auction is not active.
/// - Sender never placed a bid.
/// - New total does not exceed the highest bid.
/// - Fails to log `UpBiding` event.
#[receive(
    contract = "EscrowAuction",
    name = "upBid",
    mutable,
    payable,
    enable_logger
)]
fn up_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let bidder = ctx.sender();
    let total = host.state_mut().up_bid(bidder, amount)?;

    // Event for Up Biding.
    logger.log(&CustomEvent::UpBiding(BidingEvent {
        bidder,
        amount,
        total,
    }))?;

    Ok(())
}

/// Return the escrow of a losing bidder to the sender.
///
/// It rejects if:
/// - Auction is not closed.
/// - Sender is the winner or never placed a bid.
/// - Escrow was already refunded.
/// - Transfer to the sender fails.
/// - Fails to log `Refund` event.
#[receive(contract = "EscrowAuction", name = "refund", mutable, enable_logger)]
fn refund<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let settlement = host.state_mut().settle_refund(ctx.sender())?;

    payment::settle(host, settlement)?;

    logger.log(&CustomEvent::Refund(RefundEvent {
        bidder: settlement.recipient,
        amount: settlement.amount,
    }))?;

    Ok(())
}

/// Transfer the winning bid to the beneficiary.
///
/// It rejects if:
/// - Sender is not the administrator.
/// - Auction is not closed.
/// - Winning bid was already paid out, or no bid was placed.
/// - Transfer to the beneficiary fails.
/// - Fails to log `Payout` event.
#[receive(
    contract = "EscrowAuction",
    name = "payoutWinner",
    mutable,
    enable_logger
)]
fn payout_winner<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let settlement = host.state_mut().settle_payout(&ctx.sender())?;

    payment::settle(host, settlement)?;

    logger.log(&CustomEvent::Payout(PayoutEvent {
        winner: settlement.entry,
        beneficiary: settlement.recipient,
        amount: settlement.amount,
    }))?;

    Ok(())
}

/// View function that returns the auction overview.
#[receive(contract = "EscrowAuction", name = "view", return_value = "ViewState")]
fn view<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<ViewState> {
    Ok(host.state().view())
}

/// View function that returns the escrow held for the given address.
#[receive(
    contract = "EscrowAuction",
    name = "balanceOf",
    parameter = "Address",
    return_value = "Amount"
)]
fn balance_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Amount> {
    let address: Address = ctx.parameter_cursor().get()?;

    Ok(host.state().balance_of(&address))
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use test_infrastructure::*;

    const ADMIN: AccountAddress = AccountAddress([0u8; 32]);
    const BENEFICIARY: AccountAddress = AccountAddress([1u8; 32]);
    const BIDDER_X: AccountAddress = AccountAddress([2u8; 32]);
    const BIDDER_Y: AccountAddress = AccountAddress([3u8; 32]);
    const BIDDER_Z: AccountAddress = AccountAddress([4u8; 32]);
    const BIDDER_CONTRACT: ContractAddress = ContractAddress {
        index: 10,
        subindex: 0,
    };
    const BENEFICIARY_CONTRACT: ContractAddress = ContractAddress {
        index: 11,
        subindex: 0,
    };
    const REFERENCE_VALUE: u64 = 100;

    type Host = TestHost<State<TestStateApi>>;

    fn ccd(micro_ccd: u64) -> Amount {
        Amount::from_micro_ccd(micro_ccd)
    }

    fn account(address: AccountAddress) -> Address {
        Address::Account(address)
    }

    fn new_host(beneficiary: Address) -> Host {
        let mut state_builder = TestStateBuilder::new();
        let state = State::new(&mut state_builder, beneficiary, ADMIN, REFERENCE_VALUE);
        TestHost::new(state, state_builder)
    }

    fn active_host(beneficiary: Address) -> Host {
        let mut host = new_host(beneficiary);
        claim_eq!(start(&mut host, ADMIN), Ok(()));
        host
    }

    fn sender_ctx<'a>(sender: Address) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(sender);
        ctx
    }

    fn start(host: &mut Host, sender: AccountAddress) -> ContractResult<()> {
        let mut logger = TestLogger::init();
        start_auction(&sender_ctx(account(sender)), host, &mut logger)
    }

    fn end(host: &mut Host, sender: AccountAddress) -> ContractResult<()> {
        let mut logger = TestLogger::init();
        end_auction(&sender_ctx(account(sender)), host, &mut logger)
    }

    /// Place a first bid. Accepted amounts are added to the contract balance.
    fn bid(host: &mut Host, bidder: Address, amount: Amount) -> ContractResult<()> {
        let mut logger = TestLogger::init();
        let result = make_bid(&sender_ctx(bidder), host, amount, &mut logger);
        if result.is_ok() {
            credit(host, amount);
        }
        result
    }

    fn raise(host: &mut Host, bidder: Address, amount: Amount) -> ContractResult<()> {
        let mut logger = TestLogger::init();
        let result = up_bid(&sender_ctx(bidder), host, amount, &mut logger);
        if result.is_ok() {
            credit(host, amount);
        }
        result
    }

    fn claim_refund(host: &mut Host, bidder: Address) -> ContractResult<()> {
        let mut logger = TestLogger::init();
        refund(&sender_ctx(bidder), host, &mut logger)
    }

    fn payout(host: &mut Host, sender: AccountAddress) -> ContractResult<()> {
        let mut logger = TestLogger::init();
        payout_winner(&sender_ctx(account(sender)), host, &mut logger)
    }

    fn credit(host: &mut Host, amount: Amount) {
        let balance = host.self_balance();
        host.set_self_balance(balance + amount);
    }

    fn deposit_entrypoint() -> OwnedEntrypointName {
        OwnedEntrypointName::new_unchecked(DEPOSIT_ENTRYPOINT.into())
    }

    fn accepting_mock() -> MockFn<State<TestStateApi>> {
        MockFn::new(|_parameter, _amount, _balance, _state| Ok((false, Some(()))))
    }

    fn rejecting_mock() -> MockFn<State<TestStateApi>> {
        MockFn::new(|_parameter, _amount, _balance, _state| {
            Err::<(bool, Option<()>), _>(CallContractError::Trap)
        })
    }

    fn transferred_total(host: &Host) -> Amount {
        host.get_transfers()
            .iter()
            .fold(Amount::zero(), |total, (_, amount)| total + *amount)
    }

    #[concordium_test]
    fn test_init() {
        let parameter_bytes = to_bytes(&InitParams {
            beneficiary: account(BENEFICIARY),
            reference_value: REFERENCE_VALUE,
        });
        let mut ctx = TestInitContext::empty();
        ctx.set_init_origin(ADMIN);
        ctx.set_parameter(&parameter_bytes);
        let mut state_builder = TestStateBuilder::new();

        let state = init(&ctx, &mut state_builder).expect_report("Contract initialization failed");

        claim_eq!(
            state.view(),
            ViewState {
                auction_state: AuctionState::Created,
                highest_bidder: None,
                highest_bid: Amount::zero(),
                beneficiary: account(BENEFICIARY),
                administrator: ADMIN,
                reference_value: REFERENCE_VALUE,
            },
            "Auction should be created without bids"
        );
    }

    #[concordium_test]
    fn test_init_without_parameter() {
        let mut ctx = TestInitContext::empty();
        ctx.set_init_origin(ADMIN);
        let mut state_builder = TestStateBuilder::new();

        claim!(init(&ctx, &mut state_builder).is_err());
    }

    #[concordium_test]
    fn test_start_auction() {
        let mut host = new_host(account(BENEFICIARY));

        claim_eq!(
            start(&mut host, BIDDER_X),
            Err(CustomContractError::Unauthorized)
        );
        claim_eq!(host.state().auction_state, AuctionState::Created);

        let mut logger = TestLogger::init();
        let result = start_auction(&sender_ctx(account(ADMIN)), &mut host, &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(host.state().auction_state, AuctionState::Active);
        claim_eq!(logger.logs.len(), 1, "Only one event should be logged");
        claim_eq!(logger.logs[0], to_bytes(&CustomEvent::Start));

        claim_eq!(
            start(&mut host, ADMIN),
            Err(CustomContractError::InvalidState)
        );
    }

    #[concordium_test]
    fn test_end_auction() {
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(bid(&mut host, account(BIDDER_X), ccd(3)), Ok(()));

        claim_eq!(
            end(&mut host, BIDDER_X),
            Err(CustomContractError::Unauthorized)
        );

        let mut logger = TestLogger::init();
        let result = end_auction(&sender_ctx(account(ADMIN)), &mut host, &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(host.state().auction_state, AuctionState::Closed);
        claim_eq!(
            logger.logs[0],
            to_bytes(&CustomEvent::End(EndEvent {
                winner: Some(account(BIDDER_X)),
                amount: ccd(3),
            }))
        );

        claim_eq!(end(&mut host, ADMIN), Err(CustomContractError::InvalidState));
    }

    /// Nothing but bids is accepted before the auction starts.
    #[concordium_test]
    fn test_created_auction_rejects_operations() {
        let mut host = new_host(account(BENEFICIARY));

        claim_eq!(
            bid(&mut host, account(BIDDER_X), ccd(1)),
            Err(CustomContractError::InvalidState)
        );
        claim_eq!(
            raise(&mut host, account(BIDDER_X), ccd(1)),
            Err(CustomContractError::InvalidState)
        );
        claim_eq!(end(&mut host, ADMIN), Err(CustomContractError::InvalidState));
        claim_eq!(
            claim_refund(&mut host, account(BIDDER_X)),
            Err(CustomContractError::InvalidState)
        );
        claim_eq!(payout(&mut host, ADMIN), Err(CustomContractError::InvalidState));
        claim_eq!(host.state().auction_state, AuctionState::Created);
    }

    #[concordium_test]
    fn test_make_bid() {
        let mut host = active_host(account(BENEFICIARY));

        let mut logger = TestLogger::init();
        let result = make_bid(
            &sender_ctx(account(BIDDER_X)),
            &mut host,
            ccd(1),
            &mut logger,
        );
        claim_eq!(result, Ok(()));

        let view = host.state().view();
        claim_eq!(view.highest_bidder, Some(account(BIDDER_X)));
        claim_eq!(view.highest_bid, ccd(1));
        claim_eq!(host.state().balance_of(&account(BIDDER_X)), ccd(1));
        claim_eq!(
            logger.logs[0],
            to_bytes(&CustomEvent::Biding(BidingEvent {
                bidder: account(BIDDER_X),
                amount: ccd(1),
                total: ccd(1),
            }))
        );
    }

    #[concordium_test]
    fn test_make_bid_too_low() {
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(bid(&mut host, account(BIDDER_X), ccd(2)), Ok(()));

        claim_eq!(
            bid(&mut host, account(BIDDER_Y), ccd(1)),
            Err(CustomContractError::BidTooLow)
        );
        claim_eq!(
            bid(&mut host, account(BIDDER_Y), ccd(2)),
            Err(CustomContractError::BidTooLow)
        );

        claim_eq!(host.state().balance_of(&account(BIDDER_X)), ccd(2));
        claim_eq!(host.state().balance_of(&account(BIDDER_Y)), Amount::zero());
        claim_eq!(host.state().highest_bidder, Some(account(BIDDER_X)));
        claim_eq!(host.state().highest_bid, ccd(2));
    }

    #[concordium_test]
    fn test_make_bid_twice() {
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(bid(&mut host, account(BIDDER_X), ccd(1)), Ok(()));

        claim_eq!(
            bid(&mut host, account(BIDDER_X), ccd(2)),
            Err(CustomContractError::DuplicateBidder)
        );
        claim_eq!(host.state().balance_of(&account(BIDDER_X)), ccd(1));
    }

    #[concordium_test]
    fn test_up_bid() {
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(bid(&mut host, account(BIDDER_X), ccd(1)), Ok(()));

        let mut logger = TestLogger::init();
        let result = up_bid(
            &sender_ctx(account(BIDDER_X)),
            &mut host,
            ccd(2),
            &mut logger,
        );
        claim_eq!(result, Ok(()));

        claim_eq!(host.state().balance_of(&account(BIDDER_X)), ccd(3));
        claim_eq!(host.state().highest_bid, ccd(3));
        claim_eq!(
            logger.logs[0],
            to_bytes(&CustomEvent::UpBiding(BidingEvent {
                bidder: account(BIDDER_X),
                amount: ccd(2),
                total: ccd(3),
            }))
        );
    }

    #[concordium_test]
    fn test_up_bid_overtakes_highest() {
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(bid(&mut host, account(BIDDER_X), ccd(1)), Ok(()));
        claim_eq!(bid(&mut host, account(BIDDER_Y), ccd(2)), Ok(()));
        claim_eq!(raise(&mut host, account(BIDDER_X), ccd(2)), Ok(()));

        claim_eq!(host.state().highest_bidder, Some(account(BIDDER_X)));
        claim_eq!(host.state().highest_bid, ccd(3));
        claim_eq!(host.state().balance_of(&account(BIDDER_Y)), ccd(2));
    }

    #[concordium_test]
    fn test_up_bid_rejections() {
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(
            raise(&mut host, account(BIDDER_X), ccd(1)),
            Err(CustomContractError::UnknownBidder)
        );

        claim_eq!(bid(&mut host, account(BIDDER_X), ccd(1)), Ok(()));
        claim_eq!(bid(&mut host, account(BIDDER_Y), ccd(3)), Ok(()));
        claim_eq!(
            raise(&mut host, account(BIDDER_X), ccd(1)),
            Err(CustomContractError::BidTooLow)
        );
        claim_eq!(host.state().balance_of(&account(BIDDER_X)), ccd(1));

        claim_eq!(end(&mut host, ADMIN), Ok(()));
        claim_eq!(
            raise(&mut host, account(BIDDER_X), ccd(5)),
            Err(CustomContractError::InvalidState)
        );
        claim_eq!(
            bid(&mut host, account(BIDDER_Z), ccd(5)),
            Err(CustomContractError::InvalidState)
        );
    }

    #[concordium_test]
    fn test_refund() {
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(bid(&mut host, account(BIDDER_X), ccd(1)), Ok(()));
        claim_eq!(bid(&mut host, account(BIDDER_Y), ccd(2)), Ok(()));

        claim_eq!(
            claim_refund(&mut host, account(BIDDER_X)),
            Err(CustomContractError::InvalidState)
        );
        claim_eq!(end(&mut host, ADMIN), Ok(()));

        let mut logger = TestLogger::init();
        let result = refund(&sender_ctx(account(BIDDER_X)), &mut host, &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(host.state().balance_of(&account(BIDDER_X)), Amount::zero());
        claim_eq!(host.get_transfers(), [(BIDDER_X, ccd(1))].to_vec());
        claim_eq!(
            logger.logs[0],
            to_bytes(&CustomEvent::Refund(RefundEvent {
                bidder: account(BIDDER_X),
                amount: ccd(1),
            }))
        );

        claim_eq!(
            claim_refund(&mut host, account(BIDDER_X)),
            Err(CustomContractError::AlreadySettled)
        );
        claim_eq!(host.get_transfers().len(), 1, "Refund must not be paid twice");
    }

    #[concordium_test]
    fn test_refund_not_eligible() {
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(bid(&mut host, account(BIDDER_X), ccd(1)), Ok(()));
        claim_eq!(end(&mut host, ADMIN), Ok(()));

        claim_eq!(
            claim_refund(&mut host, account(BIDDER_X)),
            Err(CustomContractError::NotEligible)
        );
        claim_eq!(
            claim_refund(&mut host, account(BIDDER_Y)),
            Err(CustomContractError::NotEligible)
        );
        claim!(host.get_transfers().is_empty());
    }

    #[concordium_test]
    fn test_refund_transfer_failure_keeps_escrow() {
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(bid(&mut host, account(BIDDER_X), ccd(1)), Ok(()));
        claim_eq!(bid(&mut host, account(BIDDER_Y), ccd(2)), Ok(()));
        claim_eq!(end(&mut host, ADMIN), Ok(()));

        // Contract cannot cover the transfer
        host.set_self_balance(Amount::zero());
        claim_eq!(
            claim_refund(&mut host, account(BIDDER_X)),
            Err(CustomContractError::TransferFailed)
        );
        claim_eq!(host.state().balance_of(&account(BIDDER_X)), ccd(1));
        claim!(host.get_transfers().is_empty());

        // Caller retries once funds are available again
        host.set_self_balance(ccd(3));
        claim_eq!(claim_refund(&mut host, account(BIDDER_X)), Ok(()));
        claim_eq!(host.state().balance_of(&account(BIDDER_X)), Amount::zero());
    }

    #[concordium_test]
    fn test_refund_to_rejecting_contract() {
        let bidder = Address::Contract(BIDDER_CONTRACT);
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(bid(&mut host, bidder, ccd(1)), Ok(()));
        claim_eq!(bid(&mut host, account(BIDDER_Y), ccd(2)), Ok(()));
        claim_eq!(end(&mut host, ADMIN), Ok(()));

        host.setup_mock_entrypoint(BIDDER_CONTRACT, deposit_entrypoint(), rejecting_mock());
        claim_eq!(
            claim_refund(&mut host, bidder),
            Err(CustomContractError::TransferFailed)
        );
        claim_eq!(host.state().balance_of(&bidder), ccd(1));

        host.setup_mock_entrypoint(BIDDER_CONTRACT, deposit_entrypoint(), accepting_mock());
        claim_eq!(claim_refund(&mut host, bidder), Ok(()));
        claim_eq!(host.state().balance_of(&bidder), Amount::zero());
    }

    /// The recipient contract calls back into the auction while its refund is
    /// in flight. The escrow has to be released already and a second refund
    /// has to be rejected.
    #[concordium_test]
    fn test_refund_reentrancy() {
        let bidder = Address::Contract(BIDDER_CONTRACT);
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(bid(&mut host, bidder, ccd(4)), Ok(()));
        claim_eq!(bid(&mut host, account(BIDDER_Y), ccd(5)), Ok(()));
        claim_eq!(end(&mut host, ADMIN), Ok(()));

        let reentrant = MockFn::new(
            move |_parameter, _amount, _balance, state: &mut State<TestStateApi>| {
                if state.balance_of(&bidder) != Amount::zero() {
                    return Err(CallContractError::Trap);
                }
                match state.settle_refund(bidder) {
                    Err(CustomContractError::AlreadySettled) => Ok((false, Some(()))),
                    _ => Err(CallContractError::Trap),
                }
            },
        );
        host.setup_mock_entrypoint(BIDDER_CONTRACT, deposit_entrypoint(), reentrant);

        claim_eq!(claim_refund(&mut host, bidder), Ok(()));
        claim_eq!(host.state().balance_of(&bidder), Amount::zero());
        claim_eq!(
            claim_refund(&mut host, bidder),
            Err(CustomContractError::AlreadySettled)
        );
    }

    #[concordium_test]
    fn test_payout_winner() {
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(bid(&mut host, account(BIDDER_X), ccd(5)), Ok(()));

        claim_eq!(payout(&mut host, ADMIN), Err(CustomContractError::InvalidState));
        claim_eq!(end(&mut host, ADMIN), Ok(()));
        claim_eq!(
            payout(&mut host, BIDDER_X),
            Err(CustomContractError::Unauthorized)
        );

        let mut logger = TestLogger::init();
        let result = payout_winner(&sender_ctx(account(ADMIN)), &mut host, &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(host.get_transfers(), [(BENEFICIARY, ccd(5))].to_vec());
        claim_eq!(host.state().balance_of(&account(BIDDER_X)), Amount::zero());
        claim_eq!(
            logger.logs[0],
            to_bytes(&CustomEvent::Payout(PayoutEvent {
                winner: account(BIDDER_X),
                beneficiary: account(BENEFICIARY),
                amount: ccd(5),
            }))
        );

        claim_eq!(payout(&mut host, ADMIN), Err(CustomContractError::AlreadySettled));
        claim_eq!(host.get_transfers().len(), 1, "Payout must not be paid twice");
    }

    #[concordium_test]
    fn test_payout_without_bids() {
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(end(&mut host, ADMIN), Ok(()));

        claim_eq!(payout(&mut host, ADMIN), Err(CustomContractError::AlreadySettled));
        claim!(host.get_transfers().is_empty());
    }

    #[concordium_test]
    fn test_payout_reentrancy() {
        let mut host = active_host(Address::Contract(BENEFICIARY_CONTRACT));
        claim_eq!(bid(&mut host, account(BIDDER_X), ccd(5)), Ok(()));
        claim_eq!(end(&mut host, ADMIN), Ok(()));

        let reentrant = MockFn::new(
            |_parameter, _amount, _balance, state: &mut State<TestStateApi>| {
                match state.settle_payout(&Address::Account(ADMIN)) {
                    Err(CustomContractError::AlreadySettled) => Ok((false, Some(()))),
                    _ => Err(CallContractError::Trap),
                }
            },
        );
        host.setup_mock_entrypoint(BENEFICIARY_CONTRACT, deposit_entrypoint(), reentrant);

        claim_eq!(payout(&mut host, ADMIN), Ok(()));
        claim_eq!(host.state().balance_of(&account(BIDDER_X)), Amount::zero());
    }

    #[concordium_test]
    fn test_payout_to_rejecting_contract() {
        let mut host = active_host(Address::Contract(BENEFICIARY_CONTRACT));
        claim_eq!(bid(&mut host, account(BIDDER_X), ccd(5)), Ok(()));
        claim_eq!(end(&mut host, ADMIN), Ok(()));

        host.setup_mock_entrypoint(BENEFICIARY_CONTRACT, deposit_entrypoint(), rejecting_mock());
        claim_eq!(payout(&mut host, ADMIN), Err(CustomContractError::TransferFailed));
        claim_eq!(host.state().balance_of(&account(BIDDER_X)), ccd(5));
        claim_eq!(host.state().auction_state, AuctionState::Closed);
    }

    /// Refunds and payout together return exactly what was escrowed.
    #[concordium_test]
    fn test_settlement_accounts_for_all_escrow() {
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(bid(&mut host, account(BIDDER_X), ccd(1)), Ok(()));
        claim_eq!(bid(&mut host, account(BIDDER_Y), ccd(2)), Ok(()));
        claim_eq!(bid(&mut host, account(BIDDER_Z), ccd(3)), Ok(()));
        claim_eq!(raise(&mut host, account(BIDDER_X), ccd(3)), Ok(()));
        claim_eq!(raise(&mut host, account(BIDDER_Y), ccd(4)), Ok(()));
        claim_eq!(end(&mut host, ADMIN), Ok(()));

        let escrowed = host.self_balance();
        claim_eq!(escrowed, ccd(13));
        claim_eq!(host.state().highest_bidder, Some(account(BIDDER_Y)));

        claim_eq!(claim_refund(&mut host, account(BIDDER_X)), Ok(()));
        claim_eq!(claim_refund(&mut host, account(BIDDER_Z)), Ok(()));
        claim_eq!(payout(&mut host, ADMIN), Ok(()));

        claim_eq!(transferred_total(&host), escrowed);
        claim_eq!(
            host.get_transfers(),
            [
                (BIDDER_X, ccd(4)),
                (BIDDER_Z, ccd(3)),
                (BENEFICIARY, ccd(6)),
            ]
            .to_vec()
        );
        for bidder in [BIDDER_X, BIDDER_Y, BIDDER_Z].iter() {
            claim_eq!(host.state().balance_of(&account(*bidder)), Amount::zero());
            claim!(claim_refund(&mut host, account(*bidder)).is_err());
        }
        claim_eq!(payout(&mut host, ADMIN), Err(CustomContractError::AlreadySettled));
        claim_eq!(transferred_total(&host), escrowed);
    }

    #[concordium_test]
    fn test_views() {
        let mut host = active_host(account(BENEFICIARY));
        claim_eq!(bid(&mut host, account(BIDDER_X), ccd(7)), Ok(()));

        let ctx = TestReceiveContext::empty();
        let overview = view(&ctx, &host).expect_report("View should succeed");
        claim_eq!(
            overview,
            ViewState {
                auction_state: AuctionState::Active,
                highest_bidder: Some(account(BIDDER_X)),
                highest_bid: ccd(7),
                beneficiary: account(BENEFICIARY),
                administrator: ADMIN,
                reference_value: REFERENCE_VALUE,
            }
        );

        let parameter_bytes = to_bytes(&account(BIDDER_X));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&parameter_bytes);
        claim_eq!(balance_of(&ctx, &host), Ok(ccd(7)));

        let parameter_bytes = to_bytes(&account(BIDDER_Y));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&parameter_bytes);
        claim_eq!(balance_of(&ctx, &host), Ok(Amount::zero()));
    }
}
