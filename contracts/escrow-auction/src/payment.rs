//! Outgoing CCD. Accounts receive a plain transfer, contracts get their
//! `deposit` entrypoint invoked with the amount attached.
use super::*;

/// Pay `amount` to `to`. The result of the transfer is always checked.
///
/// Invoking a contract hands control to the recipient, which may call back
/// into this contract before the transfer returns.
pub fn transfer<S: HasStateApi>(
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    to: &Address,
    amount: Amount,
) -> ContractResult<()> {
    match to {
        Address::Account(account) => host.invoke_transfer(account, amount)?,
        Address::Contract(contract) => {
            host.invoke_contract(
                contract,
                &(),
                EntrypointName::new_unchecked(DEPOSIT_ENTRYPOINT),
                amount,
            )?;
        }
    }
    Ok(())
}

/// Pay out released escrow. On failure the escrow is put back into the
/// ledger before the error is returned.
pub fn settle<S: HasStateApi>(
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    settlement: Settlement,
) -> ContractResult<()> {
    if let Err(err) = transfer(host, &settlement.recipient, settlement.amount) {
        host.state_mut().restore(settlement);
        return Err(err);
    }
    Ok(())
}
