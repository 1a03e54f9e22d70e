//! Pairwise contig overlap probing.
//!
//! For a candidate contig pair, derives the admissible overlap range from
//! the contigs' coordinate intervals and queries the sequence-overlap
//! oracle. Two configurations are tried: A left of B, then B left of A.
//! Containment is covered by both. Returned hangs are normalized so they
//! always describe A relative to B.

use crate::merge::model::{ContigElement, NodeOrient, Overlap};
use crate::params::Parameters;
use crate::scaffold::{EdgeOrient, OverlapOracle};

/// Sigma multiplier for contig length bounds. Wider than the coordinate
/// cutoff: a contig's own length estimate is much tighter than its
/// placement, so being generous here costs little.
const LENGTH_SIGMA: f64 = 5.0;

/// Orientation to hand the oracle, given both contigs' reading directions
/// and which one sits to the left. Probing with A on the right reads both
/// contigs backwards, so that configuration inverts both ends rather than
/// swapping them.
fn overlap_orient(a: NodeOrient, b: NodeOrient, a_left: bool) -> EdgeOrient {
    let orient = match (a, b) {
        (NodeOrient::Forward, NodeOrient::Forward) => EdgeOrient::AbAb,
        (NodeOrient::Forward, NodeOrient::Reverse) => EdgeOrient::AbBa,
        (NodeOrient::Reverse, NodeOrient::Forward) => EdgeOrient::BaAb,
        (NodeOrient::Reverse, NodeOrient::Reverse) => EdgeOrient::BaBa,
    };
    if a_left {
        orient
    } else {
        orient.inverted()
    }
}

/// Look for a sequence overlap between two candidate contigs.
///
/// `ce_a` / `ce_b` carry coordinates in the same frame (the B scaffold's),
/// already inflated by the interleave cutoff. Returns `None` when neither
/// configuration yields a positive-length overlap.
pub fn look_for_overlap(
    oracle: &dyn OverlapOracle,
    ce_a: &ContigElement,
    ce_b: &ContigElement,
    params: &Parameters,
) -> Option<Overlap> {
    let len_a = oracle.contig_length(ce_a.id);
    let len_b = oracle.contig_length(ce_b.id);

    let min_length_a = (len_a.mean - LENGTH_SIGMA * len_a.stddev()) as i64;
    let max_length_a = (len_a.mean + LENGTH_SIGMA * len_a.stddev()) as i64;
    let min_length_b = (len_b.mean - LENGTH_SIGMA * len_b.stddev()) as i64;
    let max_length_b = (len_b.mean + LENGTH_SIGMA * len_b.stddev()) as i64;

    // Configurations to consider:
    //
    //   contigA:   --------           contigA:       --------
    //   contigB:       --------       contigB:   --------
    //
    // plus containment either way, when the ends are close:
    //
    //   contigA:       ----           contigA:   ------------
    //   contigB:   ------------       contigB:          ----

    // A to the left of B (or contained)
    if ce_a.min_coord + (min_length_a as f64) < ce_b.max_coord {
        let orient = overlap_orient(ce_a.orient, ce_b.orient, true);

        // min overlap: push A as far left relative to B as the bands allow
        let mut min_overlap = (params.missed_overlap as f64).max(
            ce_a.min_coord + min_length_a as f64 - (ce_b.max_coord - min_length_b as f64) + 0.5,
        ) as i64;
        min_overlap = min_overlap.min(min_length_a).min(min_length_b);

        // max overlap: up to the longer contig, if A can be pushed far
        // enough right; containment of A in B is allowed, so only the case
        // of A sticking out to the right is excluded
        let mut max_overlap = (max_length_a.max(max_length_b) as f64)
            .min(ce_a.max_coord - ce_b.min_coord + 0.5) as i64;
        max_overlap = max_overlap.max(params.missed_overlap);

        if let Some(found) = oracle.overlap(
            ce_a.id,
            ce_b.id,
            orient,
            min_overlap,
            max_overlap,
            params.max_overlap_error_rate,
        ) {
            if found.length > 0 {
                let overlap = if found.a_contains_b || found.b_contains_a {
                    Overlap {
                        begin_hang: found.begin_hang,
                        end_hang: found.end_hang,
                        length: found.length,
                    }
                } else {
                    Overlap {
                        begin_hang: (ce_a.length - found.length as f64) as i64,
                        end_hang: (ce_b.length - found.length as f64) as i64,
                        length: found.length,
                    }
                };
                return Some(overlap);
            }
        }
    }

    // A to the right of B (or contained)
    if ce_b.min_coord + (min_length_b as f64) < ce_a.max_coord {
        let orient = overlap_orient(ce_a.orient, ce_b.orient, false);

        let mut min_overlap = (params.missed_overlap as f64).max(
            ce_b.min_coord + min_length_b as f64 - (ce_a.max_coord - min_length_a as f64) + 0.5,
        ) as i64;
        min_overlap = min_overlap.min(min_length_a).min(min_length_b);

        let mut max_overlap = (max_length_a.max(max_length_b) as f64)
            .min(ce_a.max_coord - ce_b.min_coord + 0.5) as i64;
        max_overlap = max_overlap.max(params.missed_overlap);

        if let Some(found) = oracle.overlap(
            ce_a.id,
            ce_b.id,
            orient,
            min_overlap,
            max_overlap,
            params.max_overlap_error_rate,
        ) {
            if found.length > 0 {
                let overlap = if found.a_contains_b || found.b_contains_a {
                    Overlap {
                        begin_hang: found.begin_hang,
                        end_hang: found.end_hang,
                        length: found.length,
                    }
                } else {
                    // non-canonical return:
                    //
                    //   -------        B
                    //      -------     A
                    //
                    let begin_hang = -((ce_b.length - found.length as f64) as i64);
                    let end_hang = -((ce_a.length - found.length as f64) as i64);
                    Overlap {
                        begin_hang,
                        end_hang,
                        length: found.length - begin_hang - end_hang,
                    }
                };
                return Some(overlap);
            }
        }
    }

    None
}
