//! Deterministic variety
//!
//! The selector shuffles the cheapest slice of each role list so that repeated turns do
//! not always return the same set. The shuffle is seeded from a BLAKE3 hash over a
//! canonical encoding of the inputs: identical inputs always give the identical order,
//! any change in the free text gives a different one.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::classifier::Role;
use crate::preferences::{PreferenceState, WeightVector};

fn put_str(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn put_opt_f64(hasher: &mut blake3::Hasher, value: Option<f64>) {
    match value {
        Some(v) => {
            hasher.update(&[1]);
            hasher.update(&v.to_bits().to_le_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }
}

fn put_opt_str(hasher: &mut blake3::Hasher, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update(&[1]);
            put_str(hasher, v);
        }
        None => {
            hasher.update(&[0]);
        }
    }
}

/// Hash the selection inputs to a 64-bit seed.
///
/// Covers notes, budget, drink need, spice level, excludes, cuisine, people and weights.
pub fn variety_seed(state: &PreferenceState, weights: &WeightVector) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"platter.variety.v1");

    put_opt_str(&mut hasher, state.notes.as_deref());
    put_opt_f64(&mut hasher, state.budget);
    hasher.update(&[match state.need_drink {
        None => 0,
        Some(false) => 1,
        Some(true) => 2,
    }]);
    put_opt_str(&mut hasher, state.spice_level.map(|s| s.as_str()));
    hasher.update(&(state.excludes.len() as u64).to_le_bytes());
    for token in &state.excludes {
        put_str(&mut hasher, token);
    }
    put_opt_str(&mut hasher, state.cuisine.map(|c| c.as_str()));
    put_opt_f64(&mut hasher, state.people.map(f64::from));
    for weight in weights.as_array() {
        hasher.update(&weight.to_bits().to_le_bytes());
    }

    let digest = hasher.finalize();
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(seed)
}

fn role_salt(role: Role) -> u64 {
    match role {
        Role::Main => 0x6d61_696e,
        Role::Side => 0x7369_6465,
        Role::Drink => 0x6472_6e6b,
        Role::Dessert => 0x6465_7373,
        Role::Other => 0x6f74_6872,
    }
}

/// Shuffle the first `window` elements of `items` with a generator derived from
/// `seed` and `role`. Lists no longer than `min_len` are left untouched.
pub fn shuffle_window<T>(items: &mut [T], seed: u64, role: Role, window: usize, min_len: usize) {
    if items.len() <= min_len {
        return;
    }
    let end = window.min(items.len());
    let mut rng = StdRng::seed_from_u64(seed ^ role_salt(role));
    items[..end].shuffle(&mut rng);
}
