//! Gopher name generation.

use rand::seq::SliceRandom;
use rand::Rng;

const FIRST: &[&str] = &[
    "Bun", "Pip", "Nib", "Tuff", "Mo", "Dot", "Wig", "Fen", "Bram", "Pod", "Tilly", "Rue",
    "Sprout", "Hazel", "Clem", "Bo", "Pickle", "Mabel", "Otto", "Juniper",
];

const LAST: &[&str] = &[
    "Burrows", "Diggins", "Whiskerton", "Mudfoot", "Tunnelby", "Rootmunch", "Soilsworth",
    "Nibbleton", "Clodhop", "Furrow", "Pebblepaw", "Loamley",
];

/// A random "First Last" name.
pub fn cute_name(rng: &mut impl Rng) -> String {
    let first = FIRST.choose(rng).copied().unwrap_or("Gopher");
    let last = LAST.choose(rng).copied().unwrap_or("Burrows");
    format!("{first} {last}")
}
