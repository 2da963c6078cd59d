//! Multipart boundary generator.
//!
//! Boundaries separate sibling parts inside a container's serialized form, so
//! every container created during a run needs one that no ancestor or sibling
//! subtree shares. The generator walks a character counter starting at `'a'`
//! and repeats the current character twelve times, which keeps corpus output
//! reproducible byte-for-byte across runs.

/// Number of times the counter character is repeated in each boundary.
const BOUNDARY_WIDTH: usize = 12;

/// Deterministic boundary generator.
///
/// Owned by the assembly layer and passed by mutable reference to every
/// operation that creates a container, so tests can seed and reset it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryGenerator {
    counter: u32,
}

impl BoundaryGenerator {
    /// Creates a generator starting at `'a'`.
    #[must_use]
    pub const fn new() -> Self {
        Self { counter: 'a' as u32 }
    }

    /// Creates a generator starting at the given character.
    #[must_use]
    pub const fn seeded(start: char) -> Self {
        Self {
            counter: start as u32,
        }
    }

    /// Returns the next boundary and advances the counter.
    ///
    /// Successive calls yield `"aaaaaaaaaaaa"`, `"bbbbbbbbbbbb"`, and so on.
    /// The counter is never rewound, so all boundaries from one generator are
    /// pairwise distinct. Exhausting the character range is not handled; test
    /// corpora stay far below it.
    pub fn next_boundary(&mut self) -> String {
        let c = char::from_u32(self.counter).unwrap_or(char::REPLACEMENT_CHARACTER);
        self.counter += 1;
        std::iter::repeat_n(c, BOUNDARY_WIDTH).collect()
    }

    /// Resets the counter to `'a'`.
    pub fn reset(&mut self) {
        self.counter = 'a' as u32;
    }
}

impl Default for BoundaryGenerator {
    fn default() -> Self {
        Self::new()
    }
}
