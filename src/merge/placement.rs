//! Greedy placement of non-overlapping contigs around anchored overlap sets.
//!
//! Contigs that belong to an overlap set are pinned by their overlaps; the
//! rest are slid left or right so nothing collides, keeping every pair of
//! neighbors at least a minimum gap apart. When a contig from each scaffold
//! competes for the same stretch, the winner is chosen by the smaller total
//! gap distortion, where each expansion or compression is weighted by the
//! stddev of the gap absorbing it. The choice is local: only the gaps
//! adjacent to the two candidates are consulted, not the whole layout.

use crate::error::Error;
use crate::merge::model::{ContigSlot, Gap, OverlapSetRecord};

// ── gap distortion primitives ──────────────────────────────────────────────

/// How far `gaps[index]` is already stretched beyond its nominal length by
/// the current placement of the contigs flanking it.
fn current_gap_expansion(slots: &[ContigSlot], gaps: &[Gap], index: usize) -> i64 {
    (slots[index + 1].left_end
        - gaps[index].length
        - slots[index].left_end
        - slots[index].length)
        .max(0)
}

/// Extra stretch of the gap left of `slots1[index1]` needed to also fit
/// `slots2[index2]` in it, walking left to right.
fn additional_left_gap_expansion(
    slots1: &[ContigSlot],
    index1: usize,
    slots2: &[ContigSlot],
    index2: usize,
    min_gap: i64,
) -> i64 {
    (slots2[index2].length + 2 * min_gap
        - (slots1[index1].left_end
            - slots1[index1 - 1]
                .right_end()
                .max(slots2[index2 - 1].right_end())))
    .max(0)
}

/// Extra stretch of the gap right of `slots1[index1]` needed to also fit
/// `slots2[index2]` in it, walking right to left.
fn additional_right_gap_expansion(
    slots1: &[ContigSlot],
    index1: usize,
    slots2: &[ContigSlot],
    index2: usize,
    min_gap: i64,
) -> i64 {
    (slots2[index2].length + 2 * min_gap
        - (slots1[index1 + 1]
            .left_end
            .min(slots2[index2 + 1].left_end)
            - slots1[index1].right_end()))
    .max(0)
}

/// Squeeze of the gap left of `slots1[index1]` needed to fit that contig to
/// the left of `slots2[index2]`, given that the competing gap would stretch
/// by `gap2_expansion`.
fn left_gap_compression(
    slots1: &[ContigSlot],
    gaps1: &[Gap],
    index1: usize,
    slots2: &[ContigSlot],
    index2: usize,
    gap2_expansion: i64,
    min_gap: i64,
) -> i64 {
    ((slots1[index1 - 1].right_end() + gaps1[index1 - 1].length)
        - (slots2[index2].left_end + gap2_expansion - min_gap - slots1[index1].length))
        .max(0)
}

/// Squeeze of the gap right of `slots1[index1]` needed to fit that contig to
/// the right of `slots2[index2]`.
fn right_gap_compression(
    slots1: &[ContigSlot],
    gaps1: &[Gap],
    index1: usize,
    slots2: &[ContigSlot],
    index2: usize,
    gap2_expansion: i64,
    min_gap: i64,
) -> i64 {
    ((slots2[index2].right_end() + min_gap - gap2_expansion)
        - (slots1[index1 + 1].left_end - gaps1[index1].length - slots1[index1].length))
        .max(0)
}

/// Leftmost position `slots1[index1]` can take without crowding its own
/// right neighbor's gap or the other scaffold's next contig. `index2` may be
/// -1 when the other scaffold has run out of contigs on the left.
fn leftmost_left_end(
    slots1: &[ContigSlot],
    gaps1: &[Gap],
    index1: usize,
    slots2: &[ContigSlot],
    index2: isize,
    min_gap: i64,
) -> i64 {
    (slots1[index1 + 1].left_end - gaps1[index1].length)
        .min(slots2[(index2 + 1) as usize].left_end - min_gap)
        - slots1[index1].length
}

// ── placement passes ───────────────────────────────────────────────────────

/// Walk two index ranges left to right, placing each contig after everything
/// already placed in either scaffold. Ranges are inclusive and may be empty
/// (max < min); both mins must have a placed predecessor.
pub fn resolve_left_to_right(
    slots_a: &mut [ContigSlot],
    gaps_a: &[Gap],
    min_a: usize,
    max_a: usize,
    slots_b: &mut [ContigSlot],
    gaps_b: &[Gap],
    min_b: usize,
    max_b: usize,
    min_gap: i64,
) {
    let mut ia = min_a;
    let mut ib = min_b;

    debug_assert!(ia != 0 && ib != 0);

    while ia <= max_a || ib <= max_b {
        if ib <= max_b {
            // tentative placement after both predecessors
            slots_b[ib].left_end = (slots_b[ib - 1].right_end() + gaps_b[ib - 1].length)
                .max(slots_a[ia - 1].right_end() + min_gap);
            if ia > max_a {
                ib += 1;
                continue;
            }
        }

        if ia <= max_a {
            slots_a[ia].left_end = (slots_a[ia - 1].right_end() + gaps_a[ia - 1].length)
                .max(slots_b[ib - 1].right_end() + min_gap);
            if ib > max_b {
                ia += 1;
                continue;
            }
        }

        // Both candidates are in play and sit right of everything placed.
        // If one clears the other, take it; otherwise pick the order that
        // distorts the adjacent gaps by the fewest stddevs.
        if slots_b[ib].right_end() < slots_a[ia].left_end {
            ib += 1;
        } else if slots_a[ia].right_end() < slots_b[ib].left_end {
            ia += 1;
        } else {
            let stddev_gap_a = gaps_a[ia - 1].stddev;
            let stddev_gap_b = gaps_b[ib - 1].stddev;

            let pre_expansion_a = current_gap_expansion(slots_a, gaps_a, ia - 1) as f64;
            let pre_expansion_b = current_gap_expansion(slots_b, gaps_b, ib - 1) as f64;

            let add_expansion_a =
                additional_left_gap_expansion(slots_a, ia, slots_b, ib, min_gap) as f64;
            let add_expansion_b =
                additional_left_gap_expansion(slots_b, ib, slots_a, ia, min_gap) as f64;

            let compression_a = left_gap_compression(
                slots_a, gaps_a, ia, slots_b, ib, add_expansion_b as i64, min_gap,
            ) as f64;
            let compression_b = left_gap_compression(
                slots_b, gaps_b, ib, slots_a, ia, add_expansion_a as i64, min_gap,
            ) as f64;

            // delta_ab is the cost of keeping A left of B
            let delta_ab = (pre_expansion_b + add_expansion_b) / stddev_gap_b
                + compression_a / stddev_gap_a;
            let delta_ba = (pre_expansion_a + add_expansion_a) / stddev_gap_a
                + compression_b / stddev_gap_b;
            if delta_ab > delta_ba {
                // tuck B into A's gap
                slots_b[ib].left_end = (slots_a[ia - 1].right_end() + min_gap)
                    .max(slots_b[ib - 1].right_end() + gaps_b[ib - 1].length);
                ib += 1;
            } else {
                slots_a[ia].left_end = (slots_b[ib - 1].right_end() + min_gap)
                    .max(slots_a[ia - 1].right_end() + gaps_a[ia - 1].length);
                ia += 1;
            }
        }
    }
}

/// Place the contigs left of the first overlap set, walking right to left
/// from the set's anchored edge. Coordinates go negative here; the final
/// position rebase happens when positions are written back to the scaffold.
pub fn place_before_first_set(
    rec: &OverlapSetRecord,
    slots_a: &mut [ContigSlot],
    gaps_a: &[Gap],
    slots_b: &mut [ContigSlot],
    gaps_b: &[Gap],
    min_gap: i64,
) {
    let mut ia = rec.a.min_index as isize - 1;
    let mut ib = rec.b.min_index as isize - 1;

    while ia >= 0 || ib >= 0 {
        if ib >= 0 {
            slots_b[ib as usize].left_end =
                leftmost_left_end(slots_b, gaps_b, ib as usize, slots_a, ia, min_gap);
            if ia < 0 {
                ib -= 1;
                continue;
            }
        }

        if ia >= 0 {
            slots_a[ia as usize].left_end =
                leftmost_left_end(slots_a, gaps_a, ia as usize, slots_b, ib, min_gap);
            if ib < 0 {
                ia -= 1;
                continue;
            }
        }

        let (ua, ub) = (ia as usize, ib as usize);
        if slots_a[ua].left_end > slots_b[ub].right_end() + min_gap {
            ia -= 1;
        } else if slots_b[ub].left_end > slots_a[ua].right_end() + min_gap {
            ib -= 1;
        } else {
            let stddev_gap_a = gaps_a[ua].stddev;
            let stddev_gap_b = gaps_b[ub].stddev;

            let pre_expansion_a = current_gap_expansion(slots_a, gaps_a, ua) as f64;
            let pre_expansion_b = current_gap_expansion(slots_b, gaps_b, ub) as f64;

            let add_expansion_a =
                additional_right_gap_expansion(slots_a, ua, slots_b, ub, min_gap) as f64;
            let add_expansion_b =
                additional_right_gap_expansion(slots_b, ub, slots_a, ua, min_gap) as f64;

            let compression_a = right_gap_compression(
                slots_a, gaps_a, ua, slots_b, ub, add_expansion_b as i64, min_gap,
            ) as f64;
            let compression_b = right_gap_compression(
                slots_b, gaps_b, ub, slots_a, ua, add_expansion_a as i64, min_gap,
            ) as f64;

            // delta_ab is the cost of keeping B right of A
            let delta_ab = (pre_expansion_a + add_expansion_a) / stddev_gap_a
                + compression_b / stddev_gap_b;
            let delta_ba = (pre_expansion_b + add_expansion_b) / stddev_gap_b
                + compression_a / stddev_gap_a;
            if delta_ba > delta_ab {
                // keep B to the right of A
                slots_b[ub].left_end = (slots_b[ub + 1].left_end - gaps_b[ub].length)
                    .min(slots_a[ua + 1].left_end - min_gap)
                    - slots_b[ub].length;
                ib -= 1;
            } else {
                slots_a[ua].left_end = (slots_a[ua + 1].left_end - gaps_a[ua].length)
                    .min(slots_b[ub + 1].left_end - min_gap)
                    - slots_a[ua].length;
                ia -= 1;
            }
        }
    }
}

/// Place the contigs strictly between two overlap sets. The slack between
/// the sets is first spread across the looser scaffold's gaps in proportion
/// to their stddevs, then the contigs are interleaved left to right. Note
/// the right set still carries its set-local coordinates at this point.
pub fn place_between_sets(
    left: &OverlapSetRecord,
    right: &OverlapSetRecord,
    slots_a: &mut [ContigSlot],
    gaps_a: &mut [Gap],
    slots_b: &mut [ContigSlot],
    gaps_b: &mut [Gap],
    min_gap: i64,
) {
    let mut sum_stddevs_a = 0.0f64;
    let mut sum_stddevs_b = 0.0f64;

    // naive placement from nominal gap sizes
    for ia in left.a.max_index + 1..right.a.min_index {
        slots_a[ia].left_end = slots_a[ia - 1].right_end() + gaps_a[ia - 1].length;
        sum_stddevs_a += gaps_a[ia - 1].stddev;
    }
    for ib in left.b.max_index + 1..right.b.min_index {
        slots_b[ib].left_end = slots_b[ib - 1].right_end() + gaps_b[ib - 1].length;
        sum_stddevs_b += gaps_b[ib - 1].stddev;
    }

    let initial_position_a = slots_a[right.a.min_index - 1].right_end()
        + gaps_a[right.a.min_index - 1].length;
    sum_stddevs_a += gaps_a[right.a.min_index - 1].stddev;

    let initial_position_b = slots_b[right.b.min_index - 1].right_end()
        + gaps_b[right.b.min_index - 1].length;
    sum_stddevs_b += gaps_b[right.b.min_index - 1].stddev;

    // The gap walk says A's entry to the right set sits this far right of
    // B's; the overlaps of the right set say otherwise. The difference is
    // slack that one scaffold's gaps have to absorb.
    let spread_in_a = (initial_position_a - initial_position_b)
        - (slots_a[right.a.min_index].left_end - slots_b[right.b.min_index].left_end);
    if spread_in_a > 0 {
        for ia in left.a.max_index + 1..right.a.min_index {
            gaps_a[ia - 1].length = (gaps_a[ia - 1].length as f64
                + spread_in_a as f64 * gaps_a[ia - 1].stddev / sum_stddevs_a)
                as i64;
            slots_a[ia].left_end = slots_a[ia - 1].right_end() + gaps_a[ia - 1].length;
        }
    } else {
        for ib in left.b.max_index + 1..right.b.min_index {
            gaps_b[ib - 1].length = (gaps_b[ib - 1].length as f64
                - spread_in_a as f64 * gaps_b[ib - 1].stddev / sum_stddevs_b)
                as i64;
            slots_b[ib].left_end = slots_b[ib - 1].right_end() + gaps_b[ib - 1].length;
        }
    }

    resolve_left_to_right(
        slots_a,
        gaps_a,
        left.a.max_index + 1,
        right.a.min_index - 1,
        slots_b,
        gaps_b,
        left.b.max_index + 1,
        right.b.min_index - 1,
        min_gap,
    );
}

/// Shift an overlap set from its set-local coordinates to its final place
/// after everything to its left. Exactly one side of the set must still be
/// anchored at local coordinate 0; if neither is, an upstream aligner step
/// produced a layout this pass cannot handle.
pub fn place_within_set(
    rec: &OverlapSetRecord,
    slots_a: &mut [ContigSlot],
    gaps_a: &[Gap],
    slots_b: &mut [ContigSlot],
    gaps_b: &[Gap],
    min_gap: i64,
) -> Result<(), Error> {
    let ia = rec.a.min_index;
    let ib = rec.b.min_index;

    let offset = if slots_a[ia].left_end == 0 {
        if ia == 0 {
            0
        } else if ib > 0 {
            (slots_a[ia - 1].right_end() + gaps_a[ia - 1].length)
                .max(slots_b[ib - 1].right_end() + min_gap)
        } else {
            slots_a[ia - 1].right_end() + gaps_a[ia - 1].length
        }
    } else if slots_b[ib].left_end == 0 {
        if ib == 0 {
            0
        } else if ia > 0 {
            (slots_b[ib - 1].right_end() + gaps_b[ib - 1].length)
                .max(slots_a[ia - 1].right_end() + min_gap)
        } else {
            slots_b[ib - 1].right_end() + gaps_b[ib - 1].length
        }
    } else {
        return Err(Error::Fatal(format!(
            "overlap set {} is anchored on neither scaffold (a: {}, b: {})",
            rec.set_index, slots_a[ia].left_end, slots_b[ib].left_end
        )));
    };

    for slot in &mut slots_a[rec.a.min_index..=rec.a.max_index] {
        slot.left_end += offset;
    }
    for slot in &mut slots_b[rec.b.min_index..=rec.b.max_index] {
        slot.left_end += offset;
    }
    Ok(())
}

/// Interleave two scaffolds that share no contig overlap at all, guided only
/// by the edge. Scaffold A is shifted so the edge distance holds, then the
/// leading contigs of both scaffolds are ordered one by one until each side
/// has at least one placed, weighing edge compression against gap
/// compression.
pub fn place_pure_interleave(
    slots_a: &mut [ContigSlot],
    gaps_a: &mut [Gap],
    slots_b: &mut [ContigSlot],
    gaps_b: &mut [Gap],
    edge_mean: f64,
    edge_stddev: f64,
    min_gap: i64,
) {
    let num_a = slots_a.len();
    let num_b = slots_b.len();

    let adjust = -edge_mean - slots_a[num_a - 1].right_end() as f64;
    for slot in slots_a.iter_mut() {
        slot.left_end = (slot.left_end as f64 + adjust) as i64;
    }

    let mut ia = 0usize;
    let mut ib = 0usize;
    while ia == 0 || ib == 0 {
        if ia == num_a {
            // no more A contigs, ib == 0
            slots_b[0].left_end = slots_b[0]
                .left_end
                .max(slots_a[ia - 1].right_end() + min_gap);
            ib += 1;
            break;
        }
        if ib == num_b {
            slots_a[0].left_end = slots_a[0]
                .left_end
                .max(slots_b[ib - 1].right_end() + min_gap);
            ia += 1;
            break;
        }

        let mut a_left = slots_a[ia].left_end;
        if ib > 0 {
            a_left = a_left.max(slots_b[ib - 1].right_end() + min_gap);
        }
        let mut b_left = slots_b[ib].left_end;
        if ia > 0 {
            b_left = b_left.max(slots_a[ia - 1].right_end() + min_gap);
        }

        // edge compression from putting A's contig first
        let mut delta_ab = if ia == 0 {
            ((a_left - b_left - min_gap - slots_a[ia].length) as f64 / edge_stddev).max(0.0)
        } else {
            ((a_left
                - (b_left - min_gap - slots_a[ia].length)
                    .max(slots_a[ia - 1].right_end() + min_gap)) as f64
                / edge_stddev)
                .max(0.0)
        };
        if ia < num_a - 1 {
            delta_ab += ((a_left - slots_a[ia + 1].left_end - gaps_a[ia].length
                - slots_a[ia].length) as f64
                / gaps_a[ia].stddev)
                .max(0.0);
        }

        let mut delta_ba = if ib == 0 {
            ((b_left - a_left - min_gap - slots_b[ib].length) as f64 / edge_stddev).max(0.0)
        } else {
            ((b_left
                - (a_left - min_gap - slots_b[ib].length)
                    .max(slots_b[ib - 1].right_end() + min_gap)) as f64
                / edge_stddev)
                .max(0.0)
        };
        if ib < num_b - 1 {
            delta_ba += ((b_left - slots_b[ib + 1].left_end - gaps_b[ib].length
                - slots_b[ib].length) as f64
                / gaps_b[ib].stddev)
                .max(0.0);
        }

        if delta_ab < delta_ba {
            if ib > 0 {
                slots_a[ia].left_end = a_left;
            }
            ia += 1;
        } else {
            if ia > 0 {
                slots_b[ib].left_end = b_left;
            }
            ib += 1;
        }
    }

    resolve_left_to_right(
        slots_a,
        gaps_a,
        ia,
        num_a - 1,
        slots_b,
        gaps_b,
        ib,
        num_b - 1,
        min_gap,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::model::{OverlapSetInterval, SetMembership};

    const MIN_GAP: i64 = 50;

    fn slot(length: i64, left_end: i64) -> ContigSlot {
        ContigSlot {
            length,
            left_end,
            membership: SetMembership::Unassigned,
        }
    }

    fn gap(length: i64, stddev: f64) -> Gap {
        Gap { length, stddev }
    }

    fn interval(min_index: usize, max_index: usize) -> OverlapSetInterval {
        OverlapSetInterval {
            min_index,
            max_index,
            min_coord: 0,
            max_coord: 0,
        }
    }

    fn record(a: OverlapSetInterval, b: OverlapSetInterval) -> OverlapSetRecord {
        OverlapSetRecord {
            set_index: 0,
            first_overlap: 0,
            last_overlap: 0,
            a,
            b,
        }
    }

    #[test]
    fn gap_expansion_measures_stretch_beyond_nominal() {
        let slots = [slot(100, 0), slot(100, 250)];
        let gaps = [gap(100, 10.0)];
        assert_eq!(current_gap_expansion(&slots, &gaps, 0), 50);

        // placement tighter than nominal clamps to zero
        let slots = [slot(100, 0), slot(100, 150)];
        assert_eq!(current_gap_expansion(&slots, &gaps, 0), 0);
    }

    #[test]
    fn disjoint_contigs_keep_their_own_spacing() {
        // B's next contig fits well before A's, so no tie-break is needed
        let mut a = vec![slot(100, 0), slot(100, 0)];
        let gaps_a = [gap(1000, 10.0)];
        let mut b = vec![slot(100, 150), slot(100, 0)];
        let gaps_b = [gap(600, 5.0)];

        resolve_left_to_right(&mut a, &gaps_a, 1, 1, &mut b, &gaps_b, 1, 1, MIN_GAP);

        assert_eq!(b[1].left_end, 850);
        assert_eq!(a[1].left_end, 1100);
    }

    #[test]
    fn collision_resolved_toward_looser_gap() {
        // A's gap is loose (stddev 100), B's is tight (stddev 1): B's contig
        // should be tucked into A's gap rather than stretching B.
        let mut a = vec![slot(100, 0), slot(100, 0)];
        let gaps_a = [gap(10, 100.0)];
        let mut b = vec![slot(100, 120), slot(100, 0)];
        let gaps_b = [gap(5, 1.0)];

        resolve_left_to_right(&mut a, &gaps_a, 1, 1, &mut b, &gaps_b, 1, 1, MIN_GAP);

        assert_eq!(b[1].left_end, 225);
        assert_eq!(a[1].left_end, 375);
    }

    #[test]
    fn leading_contigs_walk_right_to_left() {
        // first overlap set anchors index 1 on both scaffolds at local 0
        let mut a = vec![slot(100, 0), slot(200, 0)];
        let gaps_a = [gap(300, 10.0)];
        let mut b = vec![slot(100, 0), slot(150, 50)];
        let gaps_b = [gap(30, 1.0)];
        let rec = record(interval(1, 1), interval(1, 1));

        place_before_first_set(&rec, &mut a, &gaps_a, &mut b, &gaps_b, MIN_GAP);

        assert_eq!(a[0].left_end, -400);
        assert_eq!(b[0].left_end, -150);
    }

    #[test]
    fn within_set_offsets_from_anchored_side() {
        let mut a = vec![slot(100, 0), slot(100, 0)];
        let gaps_a = [gap(200, 10.0)];
        let mut b = vec![slot(100, 50), slot(100, 30)];
        let gaps_b = [gap(40, 5.0)];
        let rec = record(interval(1, 1), interval(1, 1));

        place_within_set(&rec, &mut a, &gaps_a, &mut b, &gaps_b, MIN_GAP).unwrap();

        // offset = max(a0.right + gap, b0.right + min_gap) = max(300, 200)
        assert_eq!(a[1].left_end, 300);
        assert_eq!(b[1].left_end, 330);
    }

    #[test]
    fn within_set_without_anchor_is_fatal() {
        let mut a = vec![slot(100, 5)];
        let mut b = vec![slot(100, 7)];
        let rec = record(interval(0, 0), interval(0, 0));

        let err = place_within_set(&rec, &mut a, &[], &mut b, &[], MIN_GAP);
        assert!(matches!(err, Err(Error::Fatal(_))));
    }

    #[test]
    fn between_sets_slack_spreads_into_looser_scaffold() {
        // Left set ends at index 1 on both sides, right set starts at index
        // 3. The gap walk puts A's entry 800 left of where the right set's
        // overlaps require, so B's gaps absorb the slack.
        let mut a = vec![slot(100, 0), slot(100, 100), slot(100, 0), slot(100, 0)];
        let mut gaps_a = vec![gap(0, 0.0), gap(100, 10.0), gap(100, 10.0)];
        let mut b = vec![slot(100, 0), slot(100, 150), slot(100, 0), slot(100, 20)];
        let mut gaps_b = vec![gap(0, 0.0), gap(500, 5.0), gap(450, 5.0)];
        let left = record(interval(1, 1), interval(1, 1));
        let right = record(interval(3, 3), interval(3, 3));

        place_between_sets(
            &left, &right, &mut a, &mut gaps_a, &mut b, &mut gaps_b, MIN_GAP,
        );

        assert_eq!(gaps_b[1].length, 890);
        assert_eq!(a[2].left_end, 300);
        assert_eq!(b[2].left_end, 1140);
    }

    #[test]
    fn pure_interleave_tucks_single_contig_into_gap() {
        // A: two 1000bp contigs around a 500bp gap; B: one 400bp contig.
        // Edge mean -1500 says B starts 1500 before A ends, which lands B's
        // contig inside A's gap.
        let mut a = vec![slot(1000, 0), slot(1000, 1500)];
        let mut gaps_a = vec![gap(500, 100.0)];
        let mut b = vec![slot(400, 0)];
        let mut gaps_b: Vec<Gap> = vec![];

        place_pure_interleave(
            &mut a,
            &mut gaps_a,
            &mut b,
            &mut gaps_b,
            -1500.0,
            100.0,
            MIN_GAP,
        );

        assert_eq!(a[0].left_end, -1000);
        assert_eq!(b[0].left_end, 50);
        assert_eq!(a[1].left_end, 500);
        // B's contig sits inside A's gap with the minimum clearance
        assert!(b[0].left_end >= a[0].right_end() + MIN_GAP);
        assert!(b[0].right_end() + MIN_GAP <= a[1].left_end);
    }
}
