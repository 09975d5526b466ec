//! Initial query selection

use rand::seq::SliceRandom;
use rand::Rng;

/// Pick one keyword uniformly at random; an empty list gives an empty term
pub fn select_random_seed<R: Rng + ?Sized>(keywords: &[String], rng: &mut R) -> String {
    keywords.choose(rng).cloned().unwrap_or_default()
}
