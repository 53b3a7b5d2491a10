//! Shape statistics over one table.

use core::fmt;

/// Snapshot of a table's shape at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableStats {
    /// Number of symbols stored.
    pub elements: usize,
    /// Length of the bucket array.
    pub buckets: usize,
    /// Deepest node seen; a bucket root has depth 1.
    pub max_depth: u32,
    /// Mean node depth times 1000, truncated. 0 for an empty table.
    pub mean_depth_milli: u64,
}

impl TableStats {
    /// Fold the depth of every node into a snapshot.
    pub(crate) fn from_depths<I>(buckets: usize, depths: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut elements = 0usize;
        let mut max_depth = 0u32;
        let mut depth_sum = 0u64;
        for d in depths {
            elements += 1;
            max_depth = max_depth.max(d);
            depth_sum += u64::from(d);
        }
        let mean_depth_milli = if elements == 0 {
            0
        } else {
            depth_sum * 1000 / elements as u64
        };
        Self {
            elements,
            buckets,
            max_depth,
            mean_depth_milli,
        }
    }

    /// Mean depth as whole and thousandth parts, e.g. `(1, 667)` for 1.667.
    pub fn mean_depth_parts(&self) -> (u64, u64) {
        (self.mean_depth_milli / 1000, self.mean_depth_milli % 1000)
    }

    /// Average symbols per bucket, times 1000.
    pub fn load_factor_milli(&self) -> u64 {
        if self.buckets == 0 {
            return 0;
        }
        self.elements as u64 * 1000 / self.buckets as u64
    }
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (whole, frac) = self.mean_depth_parts();
        writeln!(f, "nelem   : {}", self.elements)?;
        writeln!(f, "hashsize: {}", self.buckets)?;
        writeln!(f, "maxdepth: {}", self.max_depth)?;
        write!(f, "middepth: {}.{:03}", whole, frac)
    }
}
