//! Clustering of discovered contig overlaps into overlap sets.
//!
//! An overlap set is a maximal run of segments whose contig indices chain
//! together on either scaffold side; each set implies one new contig after
//! merging. Within a set every contig gets a local coordinate, zero-based
//! at the set's left edge, derived transitively from the overlap hangs.
//! Contigs that sit inside a set's index span but were never linked by any
//! overlap are marked skipped: placing them would require reordering the
//! scaffold, which the merge engine does not attempt.

use crate::merge::model::{
    ContigSlot, OverlapSetInterval, OverlapSetRecord, Segment, SetMembership,
};

/// Scan sorted segments left to right, building overlap-set records and
/// assigning local coordinates. Returns the records plus the number of
/// skipped contigs (nonzero means the merge must be abandoned).
///
/// Precondition: `segments` sorted by `(a_contig, b_contig)`.
pub fn examine_overlap_sets(
    segments: &[Segment],
    slots_a: &mut [ContigSlot],
    slots_b: &mut [ContigSlot],
) -> (Vec<OverlapSetRecord>, usize) {
    debug_assert!(segments.windows(2).all(|w| w[0].sort_key() <= w[1].sort_key()));

    for slot in slots_a.iter_mut() {
        slot.membership = SetMembership::Unassigned;
    }
    for slot in slots_b.iter_mut() {
        slot.membership = SetMembership::Unassigned;
    }

    let mut records: Vec<OverlapSetRecord> = Vec::new();
    let mut skipped = 0;

    let mut i = 0;
    let mut set_index = 0;
    while i < segments.len() {
        let mut rec = OverlapSetRecord {
            set_index,
            first_overlap: i,
            last_overlap: i,
            a: OverlapSetInterval::starting_at(slots_a, segments[i].a_contig),
            b: OverlapSetInterval::starting_at(slots_b, segments[i].b_contig),
        };

        // Absorb segments while either endpoint falls inside the set's
        // current index span. Index spans only grow, so a segment that
        // extends one side pulls later segments on the other side in too.
        while i < segments.len()
            && (rec.a.contains_index(segments[i].a_contig)
                || rec.b.contains_index(segments[i].b_contig))
        {
            let seg = &segments[i];
            let (ia, ib) = (seg.a_contig, seg.b_contig);

            // begin_hang is the ahang of A over B; the first-seen contig of
            // a new set is pinned so the leftmost local coordinate is 0:
            //
            //   0      begin_hang        0     -begin_hang
            //   |      |                 |      |
            //   a:     ----------            ---------
            //   b:           ---------   ---------
            match (
                slots_a[ia].membership.set_index(),
                slots_b[ib].membership.set_index(),
            ) {
                (None, None) => {
                    slots_a[ia].left_end = (-seg.overlap.begin_hang).max(0);
                    slots_b[ib].left_end = seg.overlap.begin_hang.max(0);
                }
                (None, Some(_)) => {
                    slots_a[ia].left_end = slots_b[ib].left_end - seg.overlap.begin_hang;
                }
                (Some(_), None) => {
                    slots_b[ib].left_end = slots_a[ia].left_end + seg.overlap.begin_hang;
                }
                (Some(_), Some(_)) => {
                    // Both endpoints already placed in a set. Their
                    // coordinates are not cross-checked against this
                    // overlap's hangs; an inconsistent segment set slips
                    // through silently here.
                }
            }

            rec.last_overlap = i;
            rec.a.absorb(slots_a, ia);
            rec.b.absorb(slots_b, ib);
            slots_a[ia].membership = SetMembership::Member(set_index);
            slots_b[ib].membership = SetMembership::Member(set_index);
            i += 1;
        }

        // Rebase the closed set so its leftmost coordinate is 0.
        if rec.a.min_coord != 0 && rec.b.min_coord != 0 {
            let offset = -rec.a.min_coord.min(rec.b.min_coord);
            shift_set(&mut rec, slots_a, slots_b, offset);
        }

        skipped += mark_skipped(&rec.a, slots_a, set_index);
        skipped += mark_skipped(&rec.b, slots_b, set_index);

        records.push(rec);
        set_index += 1;
    }

    (records, skipped)
}

/// Shift every coordinate of an overlap set (record intervals and member
/// slots on both sides) by `offset`.
fn shift_set(
    rec: &mut OverlapSetRecord,
    slots_a: &mut [ContigSlot],
    slots_b: &mut [ContigSlot],
    offset: i64,
) {
    rec.a.min_coord += offset;
    rec.a.max_coord += offset;
    rec.b.min_coord += offset;
    rec.b.max_coord += offset;

    for slot in &mut slots_a[rec.a.min_index..=rec.a.max_index] {
        slot.left_end += offset;
    }
    for slot in &mut slots_b[rec.b.min_index..=rec.b.max_index] {
        slot.left_end += offset;
    }
}

/// Flag contigs strictly inside the interval that never joined the set.
fn mark_skipped(
    interval: &OverlapSetInterval,
    slots: &mut [ContigSlot],
    set_index: usize,
) -> usize {
    let mut n = 0;
    for i in interval.min_index + 1..interval.max_index {
        if slots[i].membership != SetMembership::Member(set_index) {
            debug_assert_eq!(slots[i].membership, SetMembership::Unassigned);
            slots[i].membership = SetMembership::Skipped;
            n += 1;
        }
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::model::Overlap;

    fn slots(lengths: &[i64]) -> Vec<ContigSlot> {
        lengths
            .iter()
            .map(|&length| ContigSlot {
                length,
                left_end: 0,
                membership: SetMembership::Unassigned,
            })
            .collect()
    }

    fn seg(a: usize, b: usize, begin_hang: i64, end_hang: i64, length: i64) -> Segment {
        Segment::new(a, b, Overlap { begin_hang, end_hang, length })
    }

    #[test]
    fn single_pair_is_one_set_with_hang_split() {
        let mut a = slots(&[500]);
        let mut b = slots(&[480]);
        let segments = [seg(0, 0, 50, 30, 200)];

        let (records, skipped) = examine_overlap_sets(&segments, &mut a, &mut b);
        assert_eq!(skipped, 0);
        assert_eq!(records.len(), 1);
        // positive ahang: A pinned at 0, B offset by the hang
        assert_eq!(a[0].left_end, 0);
        assert_eq!(b[0].left_end, 50);
        assert_eq!(a[0].membership, SetMembership::Member(0));
        assert_eq!(b[0].membership, SetMembership::Member(0));
    }

    #[test]
    fn negative_hang_pins_b_at_zero() {
        let mut a = slots(&[500]);
        let mut b = slots(&[480]);
        let segments = [seg(0, 0, -70, 0, 200)];

        let (_, skipped) = examine_overlap_sets(&segments, &mut a, &mut b);
        assert_eq!(skipped, 0);
        assert_eq!(a[0].left_end, 70);
        assert_eq!(b[0].left_end, 0);
    }

    #[test]
    fn index_chain_clusters_into_sets() {
        // The classic pattern: (2,1) closes alone because (3,2) touches
        // neither of its spans; (3,2)..(4,4) chain together; (6,5) is
        // separate again.
        let mut a = slots(&[100; 8]);
        let mut b = slots(&[100; 7]);
        let segments = [
            seg(2, 1, 10, 10, 90),
            seg(3, 2, 10, 10, 90),
            seg(3, 3, 10, 10, 90),
            seg(4, 2, 10, 10, 90),
            seg(4, 3, 10, 10, 90),
            seg(4, 4, 10, 10, 90),
            seg(6, 5, 10, 10, 90),
        ];

        let (records, skipped) = examine_overlap_sets(&segments, &mut a, &mut b);
        assert_eq!(skipped, 0);
        assert_eq!(records.len(), 3);

        assert_eq!((records[0].a.min_index, records[0].a.max_index), (2, 2));
        assert_eq!((records[0].b.min_index, records[0].b.max_index), (1, 1));

        assert_eq!((records[1].a.min_index, records[1].a.max_index), (3, 4));
        assert_eq!((records[1].b.min_index, records[1].b.max_index), (2, 4));
        assert_eq!(records[1].first_overlap, 1);
        assert_eq!(records[1].last_overlap, 5);

        assert_eq!((records[2].a.min_index, records[2].a.max_index), (6, 6));
        assert_eq!((records[2].b.min_index, records[2].b.max_index), (5, 5));

        // every interior contig of the middle set was linked
        for i in 3..=4 {
            assert_eq!(a[i].membership, SetMembership::Member(1));
        }
        for i in 2..=4 {
            assert_eq!(b[i].membership, SetMembership::Member(1));
        }
    }

    #[test]
    fn bridging_segment_joins_the_chain() {
        // (3,1) keeps b=1 inside the first set's span, so (3,2) chains in
        // too; (4,3) touches neither span of {2..3}x{1..2} and opens a
        // second set.
        let mut a = slots(&[100; 6]);
        let mut b = slots(&[100; 6]);
        let segments = [
            seg(2, 1, 10, 10, 90),
            seg(3, 1, 10, 10, 90),
            seg(3, 2, 10, 10, 90),
            seg(4, 3, 10, 10, 90),
            seg(4, 4, 10, 10, 90),
        ];

        let (records, skipped) = examine_overlap_sets(&segments, &mut a, &mut b);
        assert_eq!(records.len(), 2);
        assert_eq!(skipped, 0);
        assert_eq!((records[0].a.min_index, records[0].a.max_index), (2, 3));
        assert_eq!((records[0].b.min_index, records[0].b.max_index), (1, 2));
        assert_eq!((records[1].a.min_index, records[1].a.max_index), (4, 4));
        assert_eq!((records[1].b.min_index, records[1].b.max_index), (3, 4));
    }

    #[test]
    fn unlinked_interior_contig_is_skipped() {
        // a=3 sits inside the set's span {2..4} but no segment mentions it
        let mut a = slots(&[100; 6]);
        let mut b = slots(&[100; 4]);
        let segments = [
            seg(2, 1, 10, 10, 90),
            seg(4, 1, 10, 10, 90),
            seg(4, 2, 10, 10, 90),
        ];

        let (records, skipped) = examine_overlap_sets(&segments, &mut a, &mut b);
        assert_eq!(records.len(), 1);
        assert_eq!(skipped, 1);
        assert_eq!(a[3].membership, SetMembership::Skipped);
    }

    #[test]
    fn transitive_coordinates_within_set() {
        // a0-b0 with ahang 50, then a1-b0 with ahang -25:
        //   b0 pinned from a0, a1 derived from b0
        let mut a = slots(&[200, 200]);
        let mut b = slots(&[300]);
        let segments = [seg(0, 0, 50, 0, 150), seg(1, 0, -25, 0, 150)];

        let (records, skipped) = examine_overlap_sets(&segments, &mut a, &mut b);
        assert_eq!(records.len(), 1);
        assert_eq!(skipped, 0);
        assert_eq!(a[0].left_end, 0);
        assert_eq!(b[0].left_end, 50);
        // a1 = b0.left_end - begin_hang = 50 - (-25)
        assert_eq!(a[1].left_end, 75);
    }

    #[test]
    fn containment_pins_the_container_at_zero() {
        let mut a = slots(&[100]);
        let mut b = slots(&[400]);
        // b contains a: begin_hang -150, so a0 = 150, b0 = 0 -> b side is 0
        let segments = [seg(0, 0, -150, -150, 100)];
        let (records, _) = examine_overlap_sets(&segments, &mut a, &mut b);
        // min coord already 0 on the b side, no rebase needed
        assert_eq!(records[0].b.min_coord, 0);
        assert_eq!(a[0].left_end, 150);
        assert_eq!(b[0].left_end, 0);
    }
}
