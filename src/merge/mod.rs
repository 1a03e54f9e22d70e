//! Interleaved scaffold merging, from edge to adjusted contig positions.
//!
//! The pipeline runs in three stages: [`populate`] flattens both scaffolds
//! into the aligner's packed form and probes for contig overlaps, the
//! caller's aligner rules on the proposed merge, and [`adjust`] turns the
//! verdict into concrete coordinates ([`overlap_sets`] and [`placement`]
//! do the anchoring and greedy layout it relies on).

pub mod adjust;
pub mod model;
pub mod overlap_sets;
pub mod placement;
pub mod populate;
pub mod probe;

pub use adjust::make_alignment_adjustments;
pub use model::{AlignmentInterface, Band, Overlap, Segment};
pub use populate::populate_alignment_interface;
