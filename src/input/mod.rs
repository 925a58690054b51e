//! Random-access views over the element sequence a grammar is run against.
//!
//! Two variants live here, behind one capability trait, mirroring
//! `peglib`'s split between an in-memory `std::span` and a double-buffered
//! `FileReader`: [`slice::SliceSource`] and [`file::FileSource`].

pub mod file;
pub mod slice;

/// A position is an opaque handle between elements. For both source
/// variants it is an absolute element index — a slice offset for
/// [`slice::SliceSource`], an absolute file index for [`file::FileSource`].
/// Plain `usize` already has the equality/ordering spec §3 requires, and
/// is stable across backtracking as long as it stays at or above the
/// committed-window boundary.
pub type Position = usize;

/// An atomic value the parser consumes. Needs equality (terminal match),
/// ordering (range terminals), and `Clone` so matched elements can be
/// handed to terminal sequences without borrowing the source.
pub trait Element: Clone + PartialEq + PartialOrd {}
impl<T: Clone + PartialEq + PartialOrd> Element for T {}

/// Capability set shared by both input source variants (spec §4.A, §6).
///
/// `dereference` takes `&mut self` because the file-backed variant may
/// need to swap its active buffer to satisfy the read; the slice variant
/// never mutates.
pub trait InputSource<E: Element> {
    /// Total number of elements, known up front for both variants.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First valid position.
    fn begin(&self) -> Position {
        0
    }

    /// One past the last valid position.
    fn end(&self) -> Position {
        self.len()
    }

    /// The element at `pos`, or `None` if `pos` is at or past `end()` or
    /// the underlying read failed (spec §7: I/O failure surfaces as
    /// end-of-input to evaluators).
    fn dereference(&mut self, pos: Position) -> Option<E>;

    /// Hint that no position before `boundary` will be dereferenced again.
    /// The in-memory source ignores this; the file source may discard a
    /// buffer whose range falls entirely below it (spec §4.A, §5).
    fn release_before(&mut self, _boundary: Position) {}
}
