use super::*;

/// An untagged event of the auction closing.
#[derive(Debug, Serialize, SchemaType, Eq, PartialEq)]
pub struct EndEvent {
    /// Highest bidder at close, if any bid was placed.
    pub winner: Option<Address>,
    /// Winning amount.
    pub amount: Amount,
}

/// An untagged event of biding.
#[derive(Debug, Serialize, SchemaType, Eq, PartialEq)]
pub struct BidingEvent {
    /// Address who has bidden.
    pub bidder: Address,
    /// Amount escrowed with this call.
    pub amount: Amount,
    /// Total escrow of the bidder, which is the new highest bid.
    pub total: Amount,
}

/// An untagged event of a losing bid being returned.
#[derive(Debug, Serialize, SchemaType, Eq, PartialEq)]
pub struct RefundEvent {
    pub bidder: Address,
    pub amount: Amount,
}

/// An untagged event of the winning bid being paid out.
#[derive(Debug, Serialize, SchemaType, Eq, PartialEq)]
pub struct PayoutEvent {
    pub winner: Address,
    pub beneficiary: Address,
    pub amount: Amount,
}

/// Tagged Custom event to be serialized for the event log.
#[derive(Debug, Eq, PartialEq)]
pub enum CustomEvent {
    /// Auction started
    Start,
    /// Auction ended
    End(EndEvent),
    /// First bid of a bidder
    Biding(BidingEvent),
    /// Top up of an existing bid
    UpBiding(BidingEvent),
    /// Losing bid returned
    Refund(RefundEvent),
    /// Winning bid paid to the beneficiary
    Payout(PayoutEvent),
}

impl Serial for CustomEvent {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            CustomEvent::Start => out.write_u8(START_TAG),
            CustomEvent::End(event) => {
                out.write_u8(END_TAG)?;
                event.serial(out)
            }
            CustomEvent::Biding(event) => {
                out.write_u8(BIDING_TAG)?;
                event.serial(out)
            }
            CustomEvent::UpBiding(event) => {
                out.write_u8(UP_BIDING_TAG)?;
                event.serial(out)
            }
            CustomEvent::Refund(event) => {
                out.write_u8(REFUND_TAG)?;
                event.serial(out)
            }
            CustomEvent::Payout(event) => {
                out.write_u8(PAYOUT_TAG)?;
                event.serial(out)
            }
        }
    }
}

impl Deserial for CustomEvent {
    fn deserial<R: Read>(source: &mut R) -> ParseResult<Self> {
        let tag = source.read_u8()?;
        match tag {
            START_TAG => Ok(CustomEvent::Start),
            END_TAG => EndEvent::deserial(source).map(CustomEvent::End),
            BIDING_TAG => BidingEvent::deserial(source).map(CustomEvent::Biding),
            UP_BIDING_TAG => BidingEvent::deserial(source).map(CustomEvent::UpBiding),
            REFUND_TAG => RefundEvent::deserial(source).map(CustomEvent::Refund),
            PAYOUT_TAG => PayoutEvent::deserial(source).map(CustomEvent::Payout),
            _ => Err(ParseError::default()),
        }
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn test_event_tags() {
        let bidder = Address::Account(AccountAddress([2u8; 32]));
        let event = CustomEvent::UpBiding(BidingEvent {
            bidder,
            amount: Amount::from_micro_ccd(2),
            total: Amount::from_micro_ccd(3),
        });

        let bytes = to_bytes(&event);
        claim_eq!(bytes[0], UP_BIDING_TAG);
        claim_eq!(from_bytes::<CustomEvent>(&bytes).ok(), Some(event));

        claim_eq!(to_bytes(&CustomEvent::Start), [START_TAG].to_vec());
        claim!(from_bytes::<CustomEvent>(&[0u8]).is_err());
    }
}
