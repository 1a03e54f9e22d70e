//! Final coordinate adjustments after the aligner has ruled on a merge.
//!
//! Anchors the overlap sets (when there are contig overlaps) or the edge
//! (pure interleaving), greedily places every remaining contig, then writes
//! the new layout back into the live scaffolds and returns the edge with
//! its distance revised to match.

use crate::error::Error;
use crate::merge::model::{AlignmentInterface, ContigSlot};
use crate::merge::overlap_sets::examine_overlap_sets;
use crate::merge::placement::{
    place_before_first_set, place_between_sets, place_pure_interleave, place_within_set,
    resolve_left_to_right,
};
use crate::params::Parameters;
use crate::scaffold::{EdgeOrient, Scaffold, ScaffoldEdge};

/// Lay out both scaffolds in a shared coordinate frame and push the result
/// back into `scaffold_a` and `scaffold_b`.
///
/// On success the returned edge carries the original endpoints and
/// orientation with `distance.mean` replaced by the laid-out separation.
/// Fails when contigs would need reordering, or (if enabled) when the new
/// separation is inconsistent with the original edge estimate.
pub fn make_alignment_adjustments(
    scaffold_a: &mut Scaffold,
    scaffold_b: &mut Scaffold,
    edge: &ScaffoldEdge,
    iface: &mut AlignmentInterface,
    params: &Parameters,
) -> Result<ScaffoldEdge, Error> {
    let canon = edge.canonicalized(scaffold_a.id);
    let min_gap = params.min_gap_length;

    let AlignmentInterface {
        scaffold_a: sa,
        scaffold_b: sb,
        segments,
        ..
    } = iface;
    let packed_a = &mut sa.scaffold;
    let packed_b = &mut sb.scaffold;
    let num_a = packed_a.slots.len();
    let num_b = packed_b.slots.len();

    if !segments.is_empty() {
        segments.sort_by_key(|s| s.sort_key());

        let (records, skipped) =
            examine_overlap_sets(segments, &mut packed_a.slots, &mut packed_b.slots);
        if skipped > 0 {
            log::warn!(
                "scaffolds {} and {} cannot be merged with edge ({:.1}, {:.1}): \
                 {} contig(s) would have to be reordered",
                scaffold_a.id,
                scaffold_b.id,
                canon.distance.mean,
                canon.distance.variance,
                skipped
            );
            return Err(Error::ReorderingRequired { count: skipped });
        }

        place_before_first_set(
            &records[0],
            &mut packed_a.slots,
            &packed_a.gaps,
            &mut packed_b.slots,
            &packed_b.gaps,
            min_gap,
        );

        for pair in records.windows(2) {
            // Sets must march strictly rightward on both scaffolds; a later
            // set starting at or before an earlier one means the aligner
            // accepted overlaps that cross, which placement cannot lay out.
            if pair[1].a.min_index <= pair[0].a.max_index
                || pair[1].b.min_index <= pair[0].b.max_index
            {
                return Err(Error::Fatal(format!(
                    "overlap set {} starts at or before the end of set {} \
                     (a: {}..{} then {}, b: {}..{} then {})",
                    pair[1].set_index,
                    pair[0].set_index,
                    pair[0].a.min_index,
                    pair[0].a.max_index,
                    pair[1].a.min_index,
                    pair[0].b.min_index,
                    pair[0].b.max_index,
                    pair[1].b.min_index,
                )));
            }
            place_between_sets(
                &pair[0],
                &pair[1],
                &mut packed_a.slots,
                &mut packed_a.gaps,
                &mut packed_b.slots,
                &mut packed_b.gaps,
                min_gap,
            );
            place_within_set(
                &pair[1],
                &mut packed_a.slots,
                &packed_a.gaps,
                &mut packed_b.slots,
                &packed_b.gaps,
                min_gap,
            )?;
        }

        let last = records[records.len() - 1];
        resolve_left_to_right(
            &mut packed_a.slots,
            &packed_a.gaps,
            last.a.max_index + 1,
            num_a - 1,
            &mut packed_b.slots,
            &packed_b.gaps,
            last.b.max_index + 1,
            num_b - 1,
            min_gap,
        );
    } else {
        place_pure_interleave(
            &mut packed_a.slots,
            &mut packed_a.gaps,
            &mut packed_b.slots,
            &mut packed_b.gaps,
            canon.distance.mean,
            canon.distance.stddev(),
            min_gap,
        );
    }

    let new_edge_mean =
        (packed_b.slots[0].left_end - packed_a.slots[num_a - 1].right_end()) as f64;

    if params.check_edge_distance {
        let slop = params.interleave_cutoff * canon.distance.stddev();
        if canon.distance.mean + slop < new_edge_mean
            || canon.distance.mean - slop > new_edge_mean
        {
            log::warn!(
                "interleaved adjustment stretches edge too much: \
                 original {:.1}, adjusted {:.1}",
                canon.distance.mean,
                new_edge_mean
            );
            return Err(Error::DistanceInconsistent {
                original: canon.distance.mean,
                adjusted: new_edge_mean,
            });
        }
    }

    apply_contig_positions(
        scaffold_a,
        &packed_a.slots,
        canon.orient == EdgeOrient::AbAb || canon.orient == EdgeOrient::AbBa,
    );
    apply_contig_positions(
        scaffold_b,
        &packed_b.slots,
        canon.orient == EdgeOrient::AbAb || canon.orient == EdgeOrient::BaAb,
    );

    let mut adjusted = *edge;
    adjusted.distance.mean = new_edge_mean;
    Ok(adjusted)
}

/// Write laid-out slot coordinates back into a live scaffold, rebased so
/// the leftmost contig starts at 0. `forward` says whether the slots run in
/// the same direction as the scaffold's own contig order.
fn apply_contig_positions(scaffold: &mut Scaffold, slots: &[ContigSlot], forward: bool) {
    let num = slots.len();
    let offset = slots[0].left_end;
    let scaffold_length = (slots[num - 1].right_end() - offset) as f64;
    scaffold.length.mean = scaffold_length;

    for (i, contig) in scaffold.contigs.iter_mut().enumerate() {
        let slot = if forward { &slots[i] } else { &slots[num - 1 - i] };
        debug_assert!(
            (slot.length as f64) < contig.length.mean + 5.0
                && (slot.length as f64) > contig.length.mean - 5.0
        );

        let low = (slot.left_end - offset) as f64;
        let high = (slot.right_end() - offset) as f64;
        let (low, high) = if forward {
            (low, high)
        } else {
            (scaffold_length - high, scaffold_length - low)
        };
        if contig.is_forward() {
            contig.a_end.mean = low;
            contig.b_end.mean = high;
        } else {
            contig.b_end.mean = low;
            contig.a_end.mean = high;
        }
    }
}
