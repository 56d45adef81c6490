//! Partitioner: divide grid rows into contiguous worker bands.

/// A half-open row range `[start_y, end_y)` assigned to one worker for
/// one turn.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Band {
    /// First row of the band.
    pub start_y: usize,
    /// One past the last row of the band.
    pub end_y: usize,
}

impl Band {
    /// Create a new band.
    #[inline]
    pub const fn new(start_y: usize, end_y: usize) -> Self {
        Self { start_y, end_y }
    }

    /// Number of rows in the band.
    #[inline]
    pub const fn rows(&self) -> usize {
        self.end_y - self.start_y
    }
}

impl std::fmt::Debug for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Band({}..{})", self.start_y, self.end_y)
    }
}

/// Divide `height` rows into `threads` contiguous bands.
///
/// The first `height % threads` bands get one extra row. Bands are
/// assigned in increasing row order with no gap, so together they cover
/// `[0, height)` exactly once.
///
/// Callers validate `1 <= threads <= height` before the run starts.
pub fn partition(height: usize, threads: usize) -> Vec<Band> {
    debug_assert!(threads >= 1 && threads <= height);

    let base = height / threads;
    let remainder = height % threads;

    let mut bands = Vec::with_capacity(threads);
    let mut start_y = 0;
    for i in 0..threads {
        let rows = if i < remainder { base + 1 } else { base };
        bands.push(Band::new(start_y, start_y + rows));
        start_y += rows;
    }

    debug_assert_eq!(start_y, height);
    bands
}
