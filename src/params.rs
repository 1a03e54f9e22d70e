/// Tunable parameters for scaffold alignment and interleaved merging.
///
/// Defaults match the values the merge engine has always shipped with; they
/// are grouped the way the placement code consumes them. All distances are
/// in base pairs.
#[derive(Debug, Clone)]
pub struct Parameters {
    // ── Geometry ────────────────────────────────────────────────────────
    /// Minimum gap to leave between contigs that are pushed past each other
    /// during placement.
    pub min_gap_length: i64,

    /// Number of standard deviations used to inflate coordinate intervals
    /// when deciding which contigs may participate in the junction, and to
    /// bound the admissible ahang band.
    pub interleave_cutoff: f64,

    /// Shortest contig-contig overlap worth looking for. Coordinate bands
    /// are shrunk by this amount at both ends.
    pub min_overlap_len: i64,

    /// Slop for overlaps the sequence overlapper may have missed; lower
    /// bound on the overlap range handed to the oracle.
    pub missed_overlap: i64,

    // ── Overlap oracle ──────────────────────────────────────────────────
    /// Maximum error rate passed to the sequence-overlap oracle.
    pub max_overlap_error_rate: f64,

    /// Standard-deviation window handed to the banded scaffold aligner.
    pub var_win: f64,

    // ── Post-checks ─────────────────────────────────────────────────────
    /// Validate the adjusted edge distance against the original edge's
    /// mean +/- `interleave_cutoff` sigma. Off by default: when both
    /// scaffolds are locally stretched in a self-consistent way the check
    /// rejects merges that are in fact fine.
    pub check_edge_distance: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            min_gap_length: 50,
            interleave_cutoff: 3.5,
            min_overlap_len: 30,
            missed_overlap: 20,
            max_overlap_error_rate: 0.10,
            var_win: 3.0,
            check_edge_distance: false,
        }
    }
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = Parameters::new();
        assert_eq!(p.min_gap_length, 50);
        assert_eq!(p.interleave_cutoff, 3.5);
        assert_eq!(p.min_overlap_len, 30);
        assert!(!p.check_edge_distance);
    }
}
