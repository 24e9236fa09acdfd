//! Single item auction with escrowed bids. Bidders lock CCD with every bid,
//! the highest bidder at close wins, losers reclaim their escrow and the
//! beneficiary collects the winning amount.
#![cfg_attr(not(feature = "std"), no_std)]
use crate::{events::*, structs::*};
use commons::*;
use concordium_std::*;

mod contract;
mod events;
mod impls;
mod payment;
mod structs;
