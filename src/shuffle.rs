//! Fisher-Yates shuffling for practice decks.

use rand::Rng;

/// Returns a uniformly shuffled copy, leaving the input untouched.
pub fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle_in_place(&mut out);
    out
}

/// Shuffles the slice in place with the same distribution guarantee.
pub fn shuffle_in_place<T>(items: &mut [T]) {
    shuffle_with(items, &mut rand::rng());
}

/// Fisher-Yates over an explicit RNG. Walk from the last index down to the
/// second, swapping each position with a uniform pick from [0, i].
pub fn shuffle_with<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
