//! Live scaffold-graph surface and collaborator traits.
//!
//! The merge engine does not own the scaffold graph. It reads contig
//! positions from `Scaffold` records the caller supplies, asks an
//! `OverlapOracle` whether two contig sequences actually overlap, and hands
//! the packed layout to a `ScaffoldAligner` for the final mergeability
//! decision. Only a fully successful merge writes contig offsets back.

use crate::merge::model::{Band, PackedScaffold, Segment};

pub type ScaffoldId = u32;
pub type ContigId = u32;

/// A distance estimate with Gaussian uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LengthStat {
    pub mean: f64,
    pub variance: f64,
}

impl LengthStat {
    pub fn new(mean: f64, variance: f64) -> Self {
        Self { mean, variance }
    }

    pub fn stddev(&self) -> f64 {
        self.variance.max(0.0).sqrt()
    }
}

/// A contig as positioned within a live scaffold.
///
/// `a_end` and `b_end` are the offsets of the contig's two sequence ends
/// from the scaffold origin; `a_end.mean > b_end.mean` means the contig is
/// reverse within the scaffold.
#[derive(Debug, Clone)]
pub struct ScaffoldContig {
    pub id: ContigId,
    pub length: LengthStat,
    pub a_end: LengthStat,
    pub b_end: LengthStat,
}

impl ScaffoldContig {
    /// Whether the contig reads A-to-B in scaffold coordinates.
    pub fn is_forward(&self) -> bool {
        self.a_end.mean < self.b_end.mean
    }
}

/// An ordered chain of contigs separated by gaps of estimated length.
///
/// Contigs are stored in scaffold order, A end first.
#[derive(Debug, Clone)]
pub struct Scaffold {
    pub id: ScaffoldId,
    pub length: LengthStat,
    pub contigs: Vec<ScaffoldContig>,
}

/// Relative orientation of the two scaffolds an edge connects, written as
/// `ori(A)_ori(B)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrient {
    AbAb,
    AbBa,
    BaAb,
    BaBa,
}

impl EdgeOrient {
    /// Orientation after swapping the edge's endpoints.
    pub fn flipped(self) -> Self {
        match self {
            EdgeOrient::AbBa => EdgeOrient::AbBa,
            EdgeOrient::BaAb => EdgeOrient::BaAb,
            EdgeOrient::AbAb => EdgeOrient::BaBa,
            EdgeOrient::BaBa => EdgeOrient::AbAb,
        }
    }

    /// Orientation after reversing the reading direction of both endpoints.
    /// Distinct from [`flipped`](Self::flipped): a mixed orientation maps to
    /// the other mixed orientation here.
    pub fn inverted(self) -> Self {
        match self {
            EdgeOrient::AbAb => EdgeOrient::BaBa,
            EdgeOrient::BaBa => EdgeOrient::AbAb,
            EdgeOrient::AbBa => EdgeOrient::BaAb,
            EdgeOrient::BaAb => EdgeOrient::AbBa,
        }
    }
}

/// A proposed edge between two scaffolds. A negative `distance.mean`
/// implies the scaffolds overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaffoldEdge {
    pub id_a: ScaffoldId,
    pub id_b: ScaffoldId,
    pub orient: EdgeOrient,
    pub distance: LengthStat,
}

impl ScaffoldEdge {
    /// Return a copy with `id_a == want_a`, swapping endpoints and flipping
    /// the orientation if needed. The receiver is never mutated, so a
    /// failed merge cannot leak a swapped edge back to the caller.
    pub fn canonicalized(&self, want_a: ScaffoldId) -> ScaffoldEdge {
        if self.id_a == want_a {
            *self
        } else {
            ScaffoldEdge {
                id_a: self.id_b,
                id_b: self.id_a,
                orient: self.orient.flipped(),
                distance: self.distance,
            }
        }
    }
}

/// An overlap reported by the sequence-overlap oracle, in the orientation
/// that was queried. Hangs are relative to the first contig of the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleOverlap {
    pub begin_hang: i64,
    pub end_hang: i64,
    pub length: i64,
    pub a_contains_b: bool,
    pub b_contains_a: bool,
}

/// Pairwise sequence overlapper, queried as an oracle.
///
/// Implementations typically wrap the assembler's chunk-overlap store plus
/// a local aligner; the merge engine only cares about the answer.
pub trait OverlapOracle {
    /// Length estimate for a contig, from the graph's own records.
    fn contig_length(&self, id: ContigId) -> LengthStat;

    /// Look for an overlap between `a` and `b` in the given orientation,
    /// with overlap length constrained to `[min_overlap, max_overlap]`.
    /// Returns `None` when no acceptable overlap exists.
    fn overlap(
        &self,
        a: ContigId,
        b: ContigId,
        orient: EdgeOrient,
        min_overlap: i64,
        max_overlap: i64,
        max_error_rate: f64,
    ) -> Option<OracleOverlap>;
}

/// Outcome of the banded scaffold sequence alignment.
#[derive(Debug, Clone)]
pub enum AlignOutcome {
    /// The scaffolds can be merged using these contig overlaps. The
    /// accepted set replaces whatever was proposed.
    Overlaps(Vec<Segment>),
    /// No contig overlaps, but the scaffolds interleave at this ahang.
    Interleave { best_ahang: i64 },
    /// The scaffolds cannot be merged.
    Unalignable,
}

/// Banded dynamic-programming scaffold aligner, treated as a black box.
pub trait ScaffoldAligner {
    /// Decide whether two packed scaffolds can be aligned, given the
    /// proposed contig overlaps (allowed, not required, to be used) and the
    /// admissible ahang band of the A scaffold.
    fn align_scaffold(
        &self,
        segments: &[Segment],
        var_win: f64,
        scaffold_a: &PackedScaffold,
        scaffold_b: &PackedScaffold,
        band: Band,
    ) -> AlignOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(id_a: ScaffoldId, id_b: ScaffoldId, orient: EdgeOrient) -> ScaffoldEdge {
        ScaffoldEdge {
            id_a,
            id_b,
            orient,
            distance: LengthStat::new(-500.0, 2500.0),
        }
    }

    #[test]
    fn canonicalize_is_identity_when_already_canonical() {
        let e = edge(1, 2, EdgeOrient::AbBa);
        assert_eq!(e.canonicalized(1), e);
    }

    #[test]
    fn canonicalize_round_trips() {
        for orient in [
            EdgeOrient::AbAb,
            EdgeOrient::AbBa,
            EdgeOrient::BaAb,
            EdgeOrient::BaBa,
        ] {
            let e = edge(1, 2, orient);
            let swapped = e.canonicalized(2);
            assert_eq!(swapped.id_a, 2);
            assert_eq!(swapped.id_b, 1);
            // swapping back restores every field exactly
            assert_eq!(swapped.canonicalized(1), e);
        }
    }

    #[test]
    fn flip_preserves_mixed_orientations() {
        assert_eq!(EdgeOrient::AbBa.flipped(), EdgeOrient::AbBa);
        assert_eq!(EdgeOrient::BaAb.flipped(), EdgeOrient::BaAb);
        assert_eq!(EdgeOrient::AbAb.flipped(), EdgeOrient::BaBa);
        assert_eq!(EdgeOrient::BaBa.flipped(), EdgeOrient::AbAb);
    }

    #[test]
    fn invert_swaps_mixed_orientations() {
        assert_eq!(EdgeOrient::AbBa.inverted(), EdgeOrient::BaAb);
        assert_eq!(EdgeOrient::BaAb.inverted(), EdgeOrient::AbBa);
        assert_eq!(EdgeOrient::AbAb.inverted(), EdgeOrient::BaBa);
        assert_eq!(EdgeOrient::BaBa.inverted(), EdgeOrient::AbAb);
    }

    #[test]
    fn contig_orientation_from_offsets() {
        let fwd = ScaffoldContig {
            id: 7,
            length: LengthStat::new(100.0, 10.0),
            a_end: LengthStat::new(0.0, 0.0),
            b_end: LengthStat::new(100.0, 10.0),
        };
        assert!(fwd.is_forward());
        let rev = ScaffoldContig {
            a_end: LengthStat::new(100.0, 10.0),
            b_end: LengthStat::new(0.0, 0.0),
            ..fwd
        };
        assert!(!rev.is_forward());
    }
}
