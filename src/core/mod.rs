//! Ambient engine utilities shared by all gameplay modules.
//!
//! Currently: the deterministic, injectable spawn RNG. Gameplay never
//! reaches for global randomness; everything flows through `SpawnRng`.

pub mod rng;

pub use rng::{SpawnRng, SpawnRngState};
