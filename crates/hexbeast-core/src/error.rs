//! Errors returned by player commands.

use hexbeast_logic::cards::CardError;
use hexbeast_logic::Hex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("there is no god beast in the world")]
    NoBeast,
    #[error("{0} is not on the map")]
    OffMap(Hex),
    #[error("{0} cannot be entered")]
    Impassable(Hex),
    #[error("no route to {0}")]
    Unreachable(Hex),
    #[error("route costs {cost}, only {budget} available")]
    TooFar { cost: u32, budget: u32 },
    #[error("needs {needed} faith, have {available}")]
    NotEnoughFaith { needed: u32, available: u32 },
    #[error("no settlement at {0}")]
    NoSettlement(Hex),
    #[error("settlement is full ({capacity} agents)")]
    SettlementFull { capacity: u32 },
    #[error("{0} is already occupied")]
    Occupied(Hex),
    #[error(transparent)]
    Card(#[from] CardError),
}
