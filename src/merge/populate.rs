//! Translation of two live scaffolds and a connecting edge into the flat
//! packed form the aligner works on.
//!
//! Everything is expressed in the frame of the canonicalized edge: scaffold
//! A sits to the left, both scaffolds read left to right, and coordinates
//! are measured from the left end of scaffold B. A contig whose projected
//! coordinate interval can reach the other scaffold becomes an edge contig
//! and is probed for sequence overlaps.

use crate::error::Error;
use crate::merge::model::{
    AlignmentInterface, ContigElement, ContigSlot, Gap, NodeOrient, ScaffoldStuff, Segment,
    SetMembership,
};
use crate::merge::probe::look_for_overlap;
use crate::params::Parameters;
use crate::scaffold::{EdgeOrient, LengthStat, OverlapOracle, Scaffold, ScaffoldEdge};

/// Fill one side of the alignment interface from a live scaffold.
///
/// `other_length` is the length estimate of the scaffold on the far side of
/// the edge; it bounds how deep into this scaffold an overlap can reach.
pub fn populate_scaffold_stuff(
    ss: &mut ScaffoldStuff,
    scaffold: &Scaffold,
    edge: &ScaffoldEdge,
    other_length: LengthStat,
    params: &Parameters,
) {
    let cutoff = params.interleave_cutoff;
    let min_len = params.min_overlap_len as f64;
    let is_a = edge.id_a == scaffold.id;
    let thin_edge = -(edge.distance.mean + cutoff * edge.distance.stddev());
    let thick_edge = -(edge.distance.mean - cutoff * edge.distance.stddev());

    // traversal direction that makes this scaffold read left to right in
    // the edge frame
    ss.orient = if edge.orient == EdgeOrient::AbAb
        || (is_a && edge.orient == EdgeOrient::AbBa)
        || (!is_a && edge.orient == EdgeOrient::BaAb)
    {
        NodeOrient::Forward
    } else {
        NodeOrient::Reverse
    };

    // coordinate window in which a contig could overlap the other scaffold,
    // bounded by the other scaffold's length
    let (os_min, os_max, var_delta);
    if is_a {
        os_min = min_len;
        os_max = other_length.mean + cutoff * other_length.stddev() - min_len;
        var_delta = if ss.orient == NodeOrient::Forward {
            scaffold.length.variance
        } else {
            0.0
        };
    } else {
        os_min = thin_edge - (other_length.mean + cutoff * other_length.stddev()) + min_len;
        os_max = thick_edge - min_len;
        var_delta = if ss.orient == NodeOrient::Reverse {
            scaffold.length.variance
        } else {
            0.0
        };
    }

    let mut last_right = LengthStat::default();
    let forward: Box<dyn Iterator<Item = &crate::scaffold::ScaffoldContig>> =
        if ss.orient == NodeOrient::Forward {
            Box::new(scaffold.contigs.iter())
        } else {
            Box::new(scaffold.contigs.iter().rev())
        };

    for (count, contig) in forward.enumerate() {
        let (this_left, this_right, ce_orient);
        if ss.orient == NodeOrient::Forward {
            if contig.is_forward() {
                this_left = LengthStat::new(
                    contig.a_end.mean,
                    (var_delta - contig.a_end.variance).abs(),
                );
                this_right = LengthStat::new(
                    contig.b_end.mean,
                    (var_delta - contig.b_end.variance).abs(),
                );
                ce_orient = NodeOrient::Forward;
            } else {
                this_left = LengthStat::new(
                    contig.b_end.mean,
                    (var_delta - contig.b_end.variance).abs(),
                );
                this_right = LengthStat::new(
                    contig.a_end.mean,
                    (var_delta - contig.a_end.variance).abs(),
                );
                ce_orient = NodeOrient::Reverse;
            }
        } else if contig.is_forward() {
            // reversed traversal flips the contig's reading direction
            this_left = LengthStat::new(
                scaffold.length.mean - contig.b_end.mean,
                (var_delta - contig.b_end.variance).abs(),
            );
            this_right = LengthStat::new(
                scaffold.length.mean - contig.a_end.mean,
                (var_delta - contig.a_end.variance).abs(),
            );
            ce_orient = NodeOrient::Reverse;
        } else {
            this_left = LengthStat::new(
                scaffold.length.mean - contig.a_end.mean,
                (var_delta - contig.a_end.variance).abs(),
            );
            this_right = LengthStat::new(
                scaffold.length.mean - contig.b_end.mean,
                (var_delta - contig.b_end.variance).abs(),
            );
            ce_orient = NodeOrient::Forward;
        }

        if count > 0 {
            ss.scaffold.gaps.push(Gap {
                length: ((this_left.mean - last_right.mean) + 0.5) as i64,
                stddev: (this_left.variance - last_right.variance).abs().sqrt().max(1.0),
            });
        }

        // coordinates measured from the left end of scaffold B, with the
        // edge slop folded into scaffold A's interval
        let (min_coord, max_coord) = if is_a {
            (
                thin_edge + this_left.mean - cutoff * this_left.stddev()
                    - scaffold.length.mean,
                thick_edge + this_right.mean + cutoff * this_right.stddev()
                    - scaffold.length.mean,
            )
        } else {
            (
                this_left.mean - cutoff * this_left.stddev(),
                this_right.mean + cutoff * this_right.stddev(),
            )
        };

        let ce = ContigElement {
            index: count,
            id: contig.id,
            length: contig.length.mean,
            min_coord,
            max_coord,
            orient: ce_orient,
        };
        if ce.max_coord >= os_min && ce.min_coord <= os_max {
            ss.edge_contigs.push(ce);
        }
        ss.contigs.push(ce);

        ss.scaffold.slots.push(ContigSlot {
            length: (contig.length.mean + 0.5) as i64,
            left_end: (this_left.mean + 0.5) as i64,
            membership: SetMembership::Unassigned,
        });

        last_right = this_right;
    }

    ss.scaffold.length = scaffold.length.mean as i64;

    // Admissible ahang band for the A scaffold, straight from the edge
    // estimate clamped to the physically possible range.
    if is_a {
        let mut begin = (scaffold.length.mean + edge.distance.mean
            - cutoff * edge.distance.stddev()) as i64;
        if begin as f64 > scaffold.length.mean {
            begin = scaffold.length.mean as i64;
        }
        if (begin as f64) < -other_length.mean {
            begin = -other_length.mean as i64;
        }

        let mut end = (scaffold.length.mean + edge.distance.mean
            + cutoff * edge.distance.stddev()) as i64;
        if end as f64 > scaffold.length.mean {
            end = scaffold.length.mean as i64;
        }
        if (end as f64) < -other_length.mean {
            end = -other_length.mean as i64;
        }
        debug_assert!(begin <= end);

        log::debug!(
            "scaffold {}: ahang band [{}, {}]",
            scaffold.id,
            begin,
            end
        );
        ss.band.begin = begin;
        ss.band.end = end;
    }
}

/// Reset and fill the whole alignment interface for one merge attempt:
/// both packed scaffolds plus the contig overlaps discovered between their
/// edge contigs.
///
/// Fails without touching the interface when the edge cannot imply a
/// scaffold overlap even at the tolerant end of its distance estimate.
pub fn populate_alignment_interface(
    oracle: &dyn OverlapOracle,
    scaffold_a: &Scaffold,
    scaffold_b: &Scaffold,
    edge: &ScaffoldEdge,
    iface: &mut AlignmentInterface,
    params: &Parameters,
) -> Result<(), Error> {
    let canon = edge.canonicalized(scaffold_a.id);
    if canon.distance.mean + params.interleave_cutoff * canon.distance.stddev() >= 0.0 {
        return Err(Error::InvalidEdge {
            mean: canon.distance.mean,
            stddev: canon.distance.stddev(),
            cutoff: params.interleave_cutoff,
        });
    }

    iface.reset();
    iface.var_win = params.var_win;
    populate_scaffold_stuff(
        &mut iface.scaffold_a,
        scaffold_a,
        &canon,
        scaffold_b.length,
        params,
    );
    populate_scaffold_stuff(
        &mut iface.scaffold_b,
        scaffold_b,
        &canon,
        scaffold_a.length,
        params,
    );

    // Probe pairs from the edge outward so the tightest-variance candidates
    // are tried first.
    let AlignmentInterface {
        scaffold_a: sa,
        scaffold_b: sb,
        segments,
        ..
    } = iface;
    for ce_a in sa.edge_contigs.iter().rev() {
        for ce_b in sb.edge_contigs.iter() {
            if ce_a.max_coord >= ce_b.min_coord && ce_b.max_coord >= ce_a.min_coord {
                if let Some(overlap) = look_for_overlap(oracle, ce_a, ce_b, params) {
                    segments.push(Segment::new(ce_a.index, ce_b.index, overlap));
                }
            } else {
                let min_len = params.min_overlap_len as f64;
                debug_assert!(
                    ce_a.max_coord < ce_b.min_coord + min_len + 1.0
                        || ce_b.max_coord < ce_a.min_coord + min_len + 1.0
                );
            }
        }
    }

    log::debug!(
        "scaffolds {} and {}: {} candidate contig overlap(s)",
        scaffold_a.id,
        scaffold_b.id,
        iface.segments.len()
    );
    Ok(())
}
