//! Deterministic random number generation
//!
//! All randomness in a simulation run flows through a single seeded
//! [`RngManager`], so a run is fully reproducible from its seed.

mod xorshift;

pub use xorshift::RngManager;
