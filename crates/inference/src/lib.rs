//! Client for the remote risk-prediction service.
//!
//! - [`wire`] -- the batch wire format and score decoding, pure functions.
//! - [`client`] -- the HTTP RPC wrapper built on them.

pub mod client;
pub mod wire;

pub use client::{InferenceError, PredictionClient};
pub use wire::{decode_scores, encode_batch, WIRE_FIELDS};
