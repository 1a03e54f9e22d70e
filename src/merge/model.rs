//! Packed data model shared between the interface builder, the overlap-set
//! analyzer, the placement engine, and the external scaffold aligner.

use crate::scaffold::ContigId;

/// A gap between two consecutive contigs of a packed scaffold.
///
/// `stddev` really is a standard deviation, not a variance; every
/// sigma-distortion ratio in placement divides by it directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub length: i64,
    pub stddev: f64,
}

/// Which overlap set, if any, a contig slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetMembership {
    #[default]
    Unassigned,
    Member(usize),
    /// Inside an overlap set's index span but never linked by any overlap:
    /// merging would require reordering the scaffold.
    Skipped,
}

impl SetMembership {
    pub fn set_index(&self) -> Option<usize> {
        match self {
            SetMembership::Member(i) => Some(*i),
            _ => None,
        }
    }
}

/// A contig reduced to its length and (mutable) left-end coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContigSlot {
    pub length: i64,
    /// Assigned during placement; initially the contig's position within
    /// its own scaffold.
    pub left_end: i64,
    pub membership: SetMembership,
}

impl ContigSlot {
    /// Coordinate of the slot's right end.
    pub fn right_end(&self) -> i64 {
        self.left_end + self.length
    }
}

/// A scaffold packed for alignment: N slots and N-1 gaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedScaffold {
    pub length: i64,
    pub slots: Vec<ContigSlot>,
    pub gaps: Vec<Gap>,
}

impl PackedScaffold {
    fn reset(&mut self) {
        self.length = 0;
        self.slots.clear();
        self.gaps.clear();
    }
}

/// Reading direction of a contig or scaffold: A end to B end, or reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeOrient {
    #[default]
    Forward,
    Reverse,
}

/// Per-contig projection used while building the interface.
///
/// `min_coord` / `max_coord` bound the contig's possible position in the
/// coordinate frame of the *other* scaffold, inflated by the configured
/// number of standard deviations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContigElement {
    /// Index of the contig within its packed scaffold.
    pub index: usize,
    pub id: ContigId,
    pub length: f64,
    pub min_coord: f64,
    pub max_coord: f64,
    pub orient: NodeOrient,
}

/// A contig-contig sequence overlap: hangs of the A contig relative to the
/// B contig plus the aligned length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub begin_hang: i64,
    pub end_hang: i64,
    pub length: i64,
}

/// A discovered overlap between contig `a_contig` of scaffold A and
/// `b_contig` of scaffold B, with the spans each contig covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub a_contig: usize,
    pub b_contig: usize,
    pub overlap: Overlap,
    pub a_low: i64,
    pub a_high: i64,
    pub b_low: i64,
    pub b_high: i64,
}

impl Segment {
    /// Build a segment, deriving the per-contig spans from the hangs.
    ///
    /// Four configurations to cover:
    /// ```text
    ///     -------    A     a_low = begin_hang; a_high = begin_hang + length
    ///         -----  B     b_low = 0;          b_high = length
    ///
    ///     -------    A     a_low = 0;          a_high = length + begin + end
    ///  -----         B     b_low = -begin;     b_high = length + end_hang
    ///
    ///  ------------  A     a_low = begin_hang; a_high = length + begin + end
    ///     -----      B     b_low = 0;          b_high = length + end_hang
    ///
    ///     -----      A     a_low = 0;          a_high = length + begin_hang
    ///  ------------  B     b_low = -begin;     b_high = length
    /// ```
    pub fn new(a_contig: usize, b_contig: usize, overlap: Overlap) -> Self {
        Segment {
            a_contig,
            b_contig,
            overlap,
            a_low: overlap.begin_hang.max(0),
            b_low: (-overlap.begin_hang).max(0),
            a_high: overlap.length + overlap.begin_hang + overlap.end_hang.min(0),
            b_high: overlap.length + overlap.end_hang.min(0),
        }
    }

    pub fn sort_key(&self) -> (usize, usize) {
        (self.a_contig, self.b_contig)
    }
}

/// Admissible ahang band for the A scaffold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Band {
    pub begin: i64,
    pub end: i64,
}

/// Span of a connected overlap cluster on one scaffold side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapSetInterval {
    pub min_index: usize,
    pub max_index: usize,
    pub min_coord: i64,
    pub max_coord: i64,
}

impl OverlapSetInterval {
    /// Start an interval at one contig. Coordinates begin at the extremes
    /// (`+length` / `-length`) so the first update pulls them into range.
    pub fn starting_at(slots: &[ContigSlot], index: usize) -> Self {
        OverlapSetInterval {
            min_index: index,
            max_index: index,
            min_coord: slots[index].length,
            max_coord: -slots[index].length,
        }
    }

    pub fn absorb(&mut self, slots: &[ContigSlot], index: usize) {
        self.min_index = self.min_index.min(index);
        self.max_index = self.max_index.max(index);
        self.min_coord = self.min_coord.min(slots[index].left_end);
        self.max_coord = self.max_coord.max(slots[index].right_end());
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index >= self.min_index && index <= self.max_index
    }
}

/// One maximal cluster of transitively linked contig overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapSetRecord {
    pub set_index: usize,
    pub first_overlap: usize,
    pub last_overlap: usize,
    pub a: OverlapSetInterval,
    pub b: OverlapSetInterval,
}

/// Per-scaffold working state for one merge attempt.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldStuff {
    pub scaffold: PackedScaffold,
    /// Every contig, in packed order.
    pub contigs: Vec<ContigElement>,
    /// The subset whose coordinate interval intersects the overlap band;
    /// these are the candidates for pairwise probing.
    pub edge_contigs: Vec<ContigElement>,
    /// Traversal orientation of this scaffold in the edge frame.
    pub orient: NodeOrient,
    /// Only meaningful for the A scaffold.
    pub band: Band,
}

impl ScaffoldStuff {
    fn reset(&mut self) {
        self.scaffold.reset();
        self.contigs.clear();
        self.edge_contigs.clear();
        self.orient = NodeOrient::Forward;
        self.band = Band::default();
    }
}

/// Session object for one scaffold pair + edge. Created once, reused across
/// candidate merges: `reset` then populate for each attempt.
#[derive(Debug, Default)]
pub struct AlignmentInterface {
    pub scaffold_a: ScaffoldStuff,
    pub scaffold_b: ScaffoldStuff,
    pub segments: Vec<Segment>,
    /// Standard-deviation window for the external aligner.
    pub var_win: f64,
    /// Best interleave ahang reported by the external aligner.
    pub best_ahang: i64,
}

impl AlignmentInterface {
    pub fn new() -> Self {
        let mut iface = Self::default();
        iface.reset();
        iface
    }

    /// Clear all working state, keeping allocations for reuse.
    pub fn reset(&mut self) {
        self.scaffold_a.reset();
        self.scaffold_b.reset();
        self.segments.clear();
        self.var_win = 3.0;
        self.best_ahang = -1;
    }
}
