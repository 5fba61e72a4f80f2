//! Move list and move ordering container types used in harrier_engine.
//!
//! The underlying types of `RawMoveList` and `Line` may change at any time
//! during pre-1.0 development, so type aliases make changes easy.

use crate::arrayvec::ArrayVec;
use crate::coretypes::MAX_LINE_LEN;
use crate::coretypes::MAX_MOVES;
use crate::coretypes::{Move, MoveInfo, MoveKind, PieceKind, PlyKind};

/// RawMoveList holds at most `MAX_MOVES`, the most number of moves possible for any chess position.
/// Used internally by the move generator to collect pseudo-legal and legal moves before they are
/// run through move ordering.
pub type RawMoveList = ArrayVec<Move, MAX_MOVES>;
/// MoveInfoList is like RawMoveList however it also holds metadata for its moves.
pub type MoveInfoList = ArrayVec<MoveInfo, MAX_MOVES>;
/// Line is a sequence of legal moves that can be applied to a position. Useful for retaining a principal variation
/// found from a search.
pub type Line = ArrayVec<Move, MAX_LINE_LEN>;
/// MoveHistory is the full sequence of moves played so far in a Game, unbounded in length.
pub type MoveHistory = Vec<Move>;

/// Maximum number of moves any single priority bucket can hold.
const BUCKET_CAPACITY: usize = 256;

/// Number of priority buckets a MoveList partitions its moves into.
const NUM_BUCKETS: usize = 13;

/// Sentinel bucket: captures of a king by a pawn. Legal move generation never
/// produces a king capture, so this bucket only exists to mirror the
/// specification's bucket numbering; it is always empty in practice.
const BUCKET_KING_CAPTURE: usize = 0;
/// Shared bucket for queen-captures-queen and non-capturing queen promotions.
const BUCKET_QUEEN_CAPTURE_OR_PROMOTION: usize = 3;
const BUCKET_KILLERS: usize = 10;
const BUCKET_QUIET: usize = 11;
const BUCKET_UNDERPROMOTION: usize = 12;

type Bucket = ArrayVec<MoveInfo, BUCKET_CAPACITY>;

/// A prioritized container of moves, partitioned into 13 buckets ordered from
/// highest to lowest search priority:
///
/// 0. Captures of a king by a pawn (sentinel, always empty for legal moves).
/// 1-9. MVV/LVA captures, ranked by (victim value, attacker value), queen
///    victims first. Bucket 3 doubles as the non-capturing queen-promotion bucket.
/// 10. Killer moves: quiet moves that caused a beta cutoff at a sibling node
///    of the same ply earlier in the current search.
/// 11. All remaining quiet moves.
/// 12. Underpromotions (rook, bishop, knight).
///
/// Moves are consumed from bucket 0 to bucket 12, and FIFO within a bucket,
/// which produces the priority order a search wants to explore moves in.
#[derive(Debug, Clone)]
pub struct MoveList {
    buckets: [Bucket; NUM_BUCKETS],
}

impl MoveList {
    /// Builds a MoveList from a flat set of legal moves, a transposition-table move to
    /// slot first if present, and the pair of killer moves recorded for the current ply.
    pub fn generate(legal_moves: MoveInfoList, killers: [Option<Move>; 2]) -> Self {
        let mut buckets: [Bucket; NUM_BUCKETS] = Default::default();

        for move_info in legal_moves {
            let bucket_idx = Self::bucket_of(&move_info, killers);
            // A bucket overflowing its capacity indicates a move-generation bug;
            // 256 comfortably exceeds the legal move count of any reachable position.
            buckets[bucket_idx]
                .try_push(move_info)
                .expect("move bucket overflowed BUCKET_CAPACITY");
        }

        Self { buckets }
    }

    /// Builds a MoveList containing only capturing moves, for use in quiescence search.
    /// Promotions that are also captures are included; quiet promotions are not.
    pub fn generate_captures_only(legal_moves: MoveInfoList) -> Self {
        let mut buckets: [Bucket; NUM_BUCKETS] = Default::default();

        for move_info in legal_moves {
            if !move_info.is_capture() {
                continue;
            }
            let bucket_idx = Self::bucket_of(&move_info, [None, None]);
            buckets[bucket_idx]
                .try_push(move_info)
                .expect("move bucket overflowed BUCKET_CAPACITY");
        }

        Self { buckets }
    }

    /// Assigns a single move to its priority bucket.
    fn bucket_of(move_info: &MoveInfo, killers: [Option<Move>; 2]) -> usize {
        use PieceKind::*;

        if let Some(victim) = move_info.captured() {
            if victim == King {
                return BUCKET_KING_CAPTURE;
            }
            return Self::mvv_lva_bucket(victim, *move_info.piece_kind());
        }

        if move_info.promotion() == &Some(Queen) {
            return BUCKET_QUEEN_CAPTURE_OR_PROMOTION;
        }
        if matches!(move_info.promotion(), Some(Rook | Bishop | Knight)) {
            return BUCKET_UNDERPROMOTION;
        }

        let move_ = move_info.move_();
        if killers[0] == Some(move_) || killers[1] == Some(move_) {
            return BUCKET_KILLERS;
        }

        BUCKET_QUIET
    }

    /// Maps a (victim, attacker) pair onto one of buckets 1-9, ranking victims from
    /// most to least valuable (queen first), and within equal victim value, preferring
    /// the least valuable attacker (classic MVV/LVA).
    fn mvv_lva_bucket(victim: PieceKind, attacker: PieceKind) -> usize {
        use PieceKind::*;

        let victim_rank = match victim {
            Queen => 3,
            Rook => 2,
            Bishop | Knight => 1,
            Pawn => 0,
            King => unreachable!("king victims are handled by BUCKET_KING_CAPTURE"),
        };
        let attacker_is_major = matches!(attacker, Rook | Queen) as usize;

        // victim_rank 0..=3, attacker_is_major 0..=1 -> range 1..=8, leaving 9 unused
        // headroom within the 1-9 band reserved by the specification.
        1 + victim_rank * 2 + attacker_is_major
    }

    /// Iterates moves in priority order, highest priority bucket first.
    pub fn iter(&self) -> impl Iterator<Item = &MoveInfo> {
        self.buckets.iter().flat_map(|bucket| bucket.iter())
    }

    /// Total number of moves across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IntoIterator for MoveList {
    type Item = MoveInfo;
    type IntoIter = std::iter::Flatten<std::array::IntoIter<Bucket, NUM_BUCKETS>>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter().flatten()
    }
}

/// Two killer-move slots per ply: quiet, non-promotion moves that caused a beta
/// cutoff at a sibling node of the same ply earlier in the current search.
/// Tried early in subsequent move orderings at that ply, on the heuristic that a
/// move good enough to refute one position is often good in a similar position.
#[derive(Debug, Clone)]
pub struct Killers {
    slots: Vec<[Option<Move>; 2]>,
}

impl Killers {
    /// Creates killer-move storage for `max_depth` plies of search.
    pub fn new(max_depth: PlyKind) -> Self {
        Self {
            slots: vec![[None, None]; max_depth as usize + 1],
        }
    }

    /// Returns the killer moves recorded for `ply`.
    pub fn get(&self, ply: usize) -> [Option<Move>; 2] {
        self.slots.get(ply).copied().unwrap_or([None, None])
    }

    /// Records `move_` as a killer at `ply`, only meant to be called for quiet,
    /// non-promotion moves that produced a beta cutoff. The most recent killer
    /// always occupies slot 0; an existing duplicate is not re-inserted.
    pub fn store(&mut self, ply: usize, move_: Move) {
        if ply >= self.slots.len() {
            return;
        }
        let slot = &mut self.slots[ply];
        if slot[0] == Some(move_) {
            return;
        }
        slot[1] = slot[0];
        slot[0] = Some(move_);
    }
}

/// Returns true if a move is a quiet, non-promotion move, the only kind eligible
/// to be recorded as a killer move.
pub fn is_killer_eligible(move_info: &MoveInfo) -> bool {
    move_info.move_kind() == &MoveKind::Quiet && move_info.promotion().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Square::*;
    use crate::fen::Fen;
    use crate::Position;

    #[test]
    fn generate_orders_captures_before_quiet() {
        let pos = Position::parse_fen("rnb1k1nr/pppp1ppp/8/4p3/3P4/8/PPP1PPPP/RN2KBNR b - - 3 11")
            .unwrap();
        let capture = Move::new(E5, D4, None);
        let legal_moves: MoveInfoList = pos
            .get_legal_moves()
            .into_iter()
            .map(|move_| pos.move_info(move_))
            .collect();
        let num_moves = legal_moves.len();

        let move_list = MoveList::generate(legal_moves, [None, None]);
        assert_eq!(move_list.len(), num_moves);

        let first = move_list.iter().next().unwrap();
        assert_eq!(first.move_(), capture);
    }

    #[test]
    fn killers_store_most_recent_in_slot_zero() {
        let mut killers = Killers::new(4);
        let m1 = Move::new(E2, E4, None);
        let m2 = Move::new(D2, D4, None);

        killers.store(2, m1);
        assert_eq!(killers.get(2), [Some(m1), None]);

        killers.store(2, m2);
        assert_eq!(killers.get(2), [Some(m2), Some(m1)]);

        // Re-storing an existing killer does not duplicate it.
        killers.store(2, m2);
        assert_eq!(killers.get(2), [Some(m2), Some(m1)]);
    }

    #[test]
    fn killers_out_of_range_ply_is_ignored() {
        let mut killers = Killers::new(2);
        killers.store(50, Move::new(A1, A2, None));
        assert_eq!(killers.get(50), [None, None]);
    }
}
