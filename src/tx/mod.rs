//! Transaction pipeline: fee estimation, nonce sequencing, offline signing,
//! and the broadcast race

pub mod builder;
pub mod fees;
pub mod nonce;
pub mod racer;

pub use builder::{build_signed, SignedTransaction};
pub use fees::{FeeEstimator, FeeProfile};
pub use nonce::NonceSequence;
pub use racer::{BroadcastOutcome, BroadcastRacer, RaceResult};
