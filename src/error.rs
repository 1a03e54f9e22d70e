/// Errors that can occur while merging scaffolds.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The proposed edge does not imply a scaffold overlap. Only edges whose
    /// distance is negative within tolerance are candidates for interleaved
    /// merging; anything else is a caller error.
    #[error("edge does not imply overlap: mean {mean:.1} + {cutoff:.1} * stddev {stddev:.1} >= 0")]
    InvalidEdge { mean: f64, stddev: f64, cutoff: f64 },

    /// Overlap-set analysis found contigs that would have to be reordered to
    /// merge the scaffolds. Unsupported; the caller should skip this pair.
    #[error("{count} contigs would need to be reordered to merge")]
    ReorderingRequired { count: usize },

    /// The adjusted inter-scaffold distance fell outside the tolerance of the
    /// original edge. Only raised when `Parameters::check_edge_distance` is
    /// enabled; see the note on that field.
    #[error("adjusted edge distance {adjusted:.1} inconsistent with original {original:.1}")]
    DistanceInconsistent { original: f64, adjusted: f64 },

    /// An internal invariant was violated. Placement must never continue
    /// with corrupted coordinates.
    #[error("invariant violated: {0}")]
    Fatal(String),
}
