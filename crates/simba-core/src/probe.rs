//! Call-overhead probe.

/// Does nothing, observably. Kept out of line and behind a compiler barrier
/// so timing it measures the cost of the call itself.
#[inline(never)]
pub fn noop() {
    std::hint::black_box(());
}
