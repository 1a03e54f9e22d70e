//! Scaffold alignment and interleaved merging for whole-genome assembly.
//!
//! Given two scaffolds joined by a negative-distance edge, decide whether
//! they can be merged, either via contig sequence overlaps or by
//! interleaving the contigs of one into the gaps of the other, and if so
//! adjust every contig position so the downstream merge finds the layout
//! it expects.

pub mod error;
pub mod merge;
pub mod params;
pub mod scaffold;

pub use error::Error;
pub use merge::{make_alignment_adjustments, populate_alignment_interface, AlignmentInterface};
pub use params::Parameters;
pub use scaffold::{
    AlignOutcome, EdgeOrient, LengthStat, OverlapOracle, Scaffold, ScaffoldAligner,
    ScaffoldContig, ScaffoldEdge,
};

use log::info;

/// Attempt one interleaved merge.
///
/// Populates `iface` from the live scaffolds, asks `aligner` for a verdict,
/// and on a mergeable outcome writes adjusted contig positions back into
/// both scaffolds. Returns the revised edge, or `None` when the aligner
/// rules the pair unmergeable. Errors leave the scaffolds untouched.
pub fn merge_scaffolds(
    oracle: &dyn OverlapOracle,
    aligner: &dyn ScaffoldAligner,
    scaffold_a: &mut Scaffold,
    scaffold_b: &mut Scaffold,
    edge: &ScaffoldEdge,
    iface: &mut AlignmentInterface,
    params: &Parameters,
) -> Result<Option<ScaffoldEdge>, Error> {
    populate_alignment_interface(oracle, scaffold_a, scaffold_b, edge, iface, params)?;

    let outcome = aligner.align_scaffold(
        &iface.segments,
        iface.var_win,
        &iface.scaffold_a.scaffold,
        &iface.scaffold_b.scaffold,
        iface.scaffold_a.band,
    );

    match outcome {
        AlignOutcome::Overlaps(segments) => {
            // the aligner's accepted set replaces the proposed one
            iface.segments = segments;
            let adjusted =
                make_alignment_adjustments(scaffold_a, scaffold_b, edge, iface, params)?;
            info!(
                "merging scaffolds {} and {} on {} contig overlap(s), new distance {:.1}",
                scaffold_a.id,
                scaffold_b.id,
                iface.segments.len(),
                adjusted.distance.mean
            );
            Ok(Some(adjusted))
        }
        AlignOutcome::Interleave { best_ahang } => {
            iface.segments.clear();
            iface.best_ahang = best_ahang;
            let adjusted =
                make_alignment_adjustments(scaffold_a, scaffold_b, edge, iface, params)?;
            info!(
                "interleaving scaffolds {} and {} at ahang {}, new distance {:.1}",
                scaffold_a.id, scaffold_b.id, best_ahang, adjusted.distance.mean
            );
            Ok(Some(adjusted))
        }
        AlignOutcome::Unalignable => {
            info!(
                "scaffolds {} and {} cannot be aligned, skipping merge",
                scaffold_a.id, scaffold_b.id
            );
            Ok(None)
        }
    }
}
