//! Display colours assigned to compiled predicates.
//!
//! Every predicate gets a random 24-bit colour for direct terminal output and
//! a symbolic label for presentation layers that map labels to their own
//! highlight groups. The random source is passed in so callers can seed it.

use rand::Rng;

/// Label used for characters no predicate claimed
pub const DEFAULT_LABEL: &str = "rabbit.files.file";

/// Symbolic labels a predicate can be painted with
pub const PALETTE: [&str; 7] = [
    "rabbit.paint.love",
    "rabbit.paint.rose",
    "rabbit.paint.gold",
    "rabbit.paint.iris",
    "rabbit.paint.foam",
    "rabbit.paint.tree",
    "rabbit.paint.pine",
];

/// RGB colour plus palette label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub label: &'static str,
}

impl Paint {
    /// Draw a colour and a palette label from `rng`
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let r = rng.r#gen::<u8>();
        let g = rng.r#gen::<u8>();
        let b = rng.r#gen::<u8>();
        let label = PALETTE[rng.gen_range(0..PALETTE.len())];
        Self { r, g, b, label }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}
