//! Holds Position struct, the most important data structure for the engine.
//! Position represents a chess position, including enough history to make
//! and undo moves in place.

use std::fmt::{self, Display};

use crate::bitboard::Bitboard;
use crate::boardrepr::PieceSets;
use crate::coretypes::{Castling, Color, Move, MoveCount, MoveInfo, MoveKind, Piece, PieceKind};
use crate::coretypes::{Color::*, PieceKind::*, Rank, Square, MAX_HISTORY};
use crate::fen::Fen;
use crate::movegen as mg;
use crate::movelist::RawMoveList;

/// Cache holds the fields of a Position that cannot be derived from a
/// `MoveInfo` alone, so they can be restored by `undo_move`.
/// For example, a king move always clears both of its side's castling rights,
/// but a `MoveInfo` of a king move alone cannot say which rights, if any,
/// were already lost before the move was made.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Cache {
    pub(crate) castling: Castling,
    pub(crate) en_passant: Option<Square>,
}

/// A single frame of Position's internal undo history, pushed by `do_move`
/// and popped by `undo_move`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Undo {
    cache: Cache,
    halfmoves: MoveCount,
    fullmoves: MoveCount,
}

impl Undo {
    const EMPTY: Undo = Undo {
        cache: Cache {
            castling: Castling::NONE,
            en_passant: None,
        },
        halfmoves: 0,
        fullmoves: 0,
    };
}

/// struct Position
/// A complete data set that can represent any chess position.
/// # Members:
/// * pieces - a piece-centric setwise container of all basic chess piece positions.
/// * player - Color of player whose turn it is.
/// * castling - Castling rights for both players.
/// * en_passant - Indicates if en passant is possible, and for which square.
/// * halfmoves - Tracker for 50 move draw rule. Resets after capture/pawn move.
/// * fullmoves - Starts at 1, increments after each black player's move.
///
/// Position keeps a fixed-size undo history internally so `do_move` and
/// `undo_move` can mutate in place without the caller tracking a Cache.
/// The history is not part of a Position's logical identity, so `Eq`/`PartialEq`
/// are implemented by hand to ignore it; two positions reached by different
/// move sequences compare equal if their chess state is equal.
#[derive(Debug, Copy, Clone)]
pub struct Position {
    pub(crate) pieces: PieceSets,
    pub(crate) player: Color,
    pub(crate) castling: Castling,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmoves: MoveCount,
    pub(crate) fullmoves: MoveCount,
    history: [Undo; MAX_HISTORY],
    history_len: usize,
}

impl Position {
    /// Standard chess start position.
    pub fn start_position() -> Self {
        Self {
            pieces: PieceSets::start_position(),
            player: Color::White,
            castling: Castling::start_position(),
            en_passant: None,
            halfmoves: 0,
            fullmoves: 1,
            history: [Undo::EMPTY; MAX_HISTORY],
            history_len: 0,
        }
    }

    /// Builds a `Position` directly from its logical fields, with empty undo
    /// history. Used by `Fen::parse_fen`, which has no move sequence to replay.
    pub(crate) fn new_raw(
        pieces: PieceSets,
        player: Color,
        castling: Castling,
        en_passant: Option<Square>,
        halfmoves: MoveCount,
        fullmoves: MoveCount,
    ) -> Self {
        Self {
            pieces,
            player,
            castling,
            en_passant,
            halfmoves,
            fullmoves,
            history: [Undo::EMPTY; MAX_HISTORY],
            history_len: 0,
        }
    }

    /// Const getters.
    pub fn pieces(&self) -> &PieceSets {
        &self.pieces
    }
    pub fn player(&self) -> &Color {
        &self.player
    }
    pub fn castling(&self) -> &Castling {
        &self.castling
    }
    pub fn en_passant(&self) -> &Option<Square> {
        &self.en_passant
    }
    pub fn halfmoves(&self) -> &MoveCount {
        &self.halfmoves
    }
    pub fn fullmoves(&self) -> &MoveCount {
        &self.fullmoves
    }

    /// Returns a snapshot of the fields that `undo_move` cannot recover from a `MoveInfo` alone.
    pub(crate) fn cache(&self) -> Cache {
        Cache {
            castling: self.castling,
            en_passant: self.en_passant,
        }
    }

    /// Returns the castling right tied to a rook's home square, if `square` is one, for `color`.
    fn rook_right(color: Color, square: Square) -> Option<Castling> {
        use Square::*;
        match (color, square) {
            (White, A1) => Some(Castling::W_QUEEN),
            (White, H1) => Some(Castling::W_KING),
            (Black, A8) => Some(Castling::B_QUEEN),
            (Black, H8) => Some(Castling::B_KING),
            _ => None,
        }
    }

    /// Returns the rook's (from, to) squares for a castling move to `king_to`.
    fn castle_rook_squares(king_to: Square) -> (Square, Square) {
        use Square::*;
        match king_to {
            G1 => (H1, F1),
            C1 => (A1, D1),
            G8 => (H8, F8),
            C8 => (A8, D8),
            _ => panic!("castling move's destination square was not a valid castle square"),
        }
    }

    /// Classifies `move_` in the context of the current position, without mutating self.
    /// Assumes `move_` is at least pseudo-legal for the player to move.
    fn classify_move(&self, move_: Move) -> MoveInfo {
        let active_player = self.player;
        let passive_player = !active_player;

        let active_piece = PieceKind::iter()
            .map(|piece_kind| Piece::new(active_player, piece_kind))
            .find(|piece| self.pieces[piece].has_square(move_.from))
            .expect("classify_move: no active piece found on move's from square");

        let is_castle = active_piece.piece_kind() == &King
            && move_.from.file_u8().abs_diff(move_.to.file_u8()) == 2;
        let is_en_passant =
            active_piece.piece_kind() == &Pawn && self.en_passant == Some(move_.to);

        let move_kind = if is_castle {
            MoveKind::Castle
        } else if is_en_passant {
            MoveKind::EnPassant
        } else if let Some(captured_pk) = PieceKind::iter()
            .find(|&piece_kind| self.pieces[(passive_player, piece_kind)].has_square(move_.to))
        {
            MoveKind::Capture(captured_pk)
        } else {
            MoveKind::Quiet
        };

        MoveInfo::new(move_, *active_piece.piece_kind(), move_kind)
    }

    /// Returns the `MoveInfo` that would result from applying `move_` to self,
    /// without applying it.
    pub fn move_info(&self, move_: Move) -> MoveInfo {
        self.classify_move(move_)
    }

    /// Apply a move to self, in place, returning the `MoveInfo` describing it.
    /// `do_move` does not check if the move is legal, it assumes pseudo-legality
    /// and executes it, pushing an undo frame so `undo_move` can reverse it.
    pub fn do_move(&mut self, move_: Move) -> MoveInfo {
        let move_info = self.classify_move(move_);
        let cache = self.cache();
        let pre_halfmoves = self.halfmoves;
        let pre_fullmoves = self.fullmoves;

        let active_player = self.player;
        let passive_player = !active_player;
        let active_piece = Piece::new(active_player, move_info.piece_kind);

        // Revoke castling rights tied to a moved king, a moved rook, or a captured rook.
        match move_info.piece_kind {
            King => self.castling.clear_color(active_player),
            Rook => {
                if let Some(right) = Self::rook_right(active_player, move_.from) {
                    self.castling.clear(right);
                }
            }
            _ => (),
        }
        if let Some(right) = Self::rook_right(passive_player, move_.to) {
            self.castling.clear(right);
        }

        self.pieces[&active_piece].clear_square(move_.from);

        match move_info.move_kind {
            MoveKind::Capture(captured_pk) => {
                let captured_piece = Piece::new(passive_player, captured_pk);
                self.pieces[&captured_piece].clear_square(move_.to);
            }
            MoveKind::EnPassant => {
                let ep_square = self.en_passant.expect("en-passant move with no ep target set");
                let captured_square = match ep_square.rank() {
                    Rank::R3 => ep_square.increment_rank().unwrap(),
                    _ => ep_square.decrement_rank().unwrap(),
                };
                let captured_pawn = Piece::new(passive_player, Pawn);
                self.pieces[&captured_pawn].clear_square(captured_square);
            }
            MoveKind::Castle => {
                let (rook_from, rook_to) = Self::castle_rook_squares(move_.to);
                let rook = Piece::new(active_player, Rook);
                self.pieces[&rook].clear_square(rook_from);
                self.pieces[&rook].set_square(rook_to);
            }
            MoveKind::Quiet => (),
        }

        if let Some(promotion_kind) = move_.promotion {
            self.pieces[&Piece::new(active_player, promotion_kind)].set_square(move_.to);
        } else {
            self.pieces[&active_piece].set_square(move_.to);
        }

        // En-passant is only set the move immediately after a pawn double push.
        self.en_passant = if move_info.piece_kind == Pawn
            && move_.from.rank_u8().abs_diff(move_.to.rank_u8()) == 2
        {
            match active_player {
                White => move_.from.increment_rank(),
                Black => move_.from.decrement_rank(),
            }
        } else {
            None
        };

        if move_info.piece_kind == Pawn || move_info.is_capture() {
            self.halfmoves = 0;
        } else {
            self.halfmoves += 1;
        }
        if active_player == Black {
            self.fullmoves += 1;
        }

        self.player = passive_player;

        self.history[self.history_len] = Undo {
            cache,
            halfmoves: pre_halfmoves,
            fullmoves: pre_fullmoves,
        };
        self.history_len += 1;

        move_info
    }

    /// Undo the application of a move, in place.
    /// Must be called with the `MoveInfo` most recently returned by `do_move`
    /// on this Position; undoing out of order corrupts the position.
    pub fn undo_move(&mut self, move_info: MoveInfo) {
        self.history_len = self
            .history_len
            .checked_sub(1)
            .expect("undo_move called on a Position with no history");
        let Undo {
            cache,
            halfmoves,
            fullmoves,
        } = self.history[self.history_len];

        let moved_player = !self.player;
        let passive_player = self.player;

        let to_piece_kind = move_info.promotion.unwrap_or(move_info.piece_kind);
        self.pieces[&Piece::new(moved_player, to_piece_kind)].clear_square(move_info.to);
        self.pieces[&Piece::new(moved_player, move_info.piece_kind)].set_square(move_info.from);

        match move_info.move_kind {
            MoveKind::Capture(captured_pk) => {
                let captured_piece = Piece::new(passive_player, captured_pk);
                self.pieces[&captured_piece].set_square(move_info.to);
            }
            MoveKind::EnPassant => {
                let ep_square = cache.en_passant.expect("undoing en-passant with no ep cached");
                let captured_square = match ep_square.rank() {
                    Rank::R3 => ep_square.increment_rank().unwrap(),
                    _ => ep_square.decrement_rank().unwrap(),
                };
                let captured_pawn = Piece::new(passive_player, Pawn);
                self.pieces[&captured_pawn].set_square(captured_square);
            }
            MoveKind::Castle => {
                let (rook_from, rook_to) = Self::castle_rook_squares(move_info.to);
                let rook = Piece::new(moved_player, Rook);
                self.pieces[&rook].clear_square(rook_to);
                self.pieces[&rook].set_square(rook_from);
            }
            MoveKind::Quiet => (),
        }

        self.castling = cache.castling;
        self.en_passant = cache.en_passant;
        self.halfmoves = halfmoves;
        self.fullmoves = fullmoves;
        self.player = moved_player;
    }

    /// Applies a null move in place: passes the turn without moving a piece.
    /// Clears any en-passant target, preserves castling rights. Returns the
    /// `Cache` needed to undo it with `undo_null_move`.
    pub(crate) fn do_null_move(&mut self) -> Cache {
        let cache = self.cache();
        self.en_passant = None;
        self.player = !self.player;
        cache
    }

    /// Reverses a prior call to `do_null_move`.
    pub(crate) fn undo_null_move(&mut self, cache: Cache) {
        self.en_passant = cache.en_passant;
        self.player = !self.player;
    }

    /// Checks if move is legal, and if so, applies it and returns its `MoveInfo`.
    pub fn do_legal_move(&mut self, move_: Move) -> (bool, Option<MoveInfo>) {
        if !self.is_legal_move(move_) {
            return (false, None);
        }
        (true, Some(self.do_move(move_)))
    }

    /// Generates a new Position from applying move on current Position.
    pub fn make_move(&self, move_: Move) -> Self {
        let mut position_clone: Position = *self;
        position_clone.do_move(move_);
        position_clone
    }

    /// Checks if given move is legal for current position.
    pub fn is_legal_move(&self, move_: Move) -> bool {
        self.get_legal_moves().into_iter().any(|legal| legal == move_)
    }

    /// Returns true if active player's king is in any check.
    pub fn is_in_check(&self) -> bool {
        self.num_active_king_checks() > 0
    }

    /// Returns tuple representing if current player's king is in single or double check.
    /// Tuple format: (is_in_single_check, is_in_double_check).
    pub fn active_king_checks(&self) -> (bool, bool) {
        let num_checks = self.num_active_king_checks();
        let single_check = num_checks >= 1;
        let double_check = num_checks >= 2;
        (single_check, double_check)
    }

    /// Counts and returns number of checks on current player's king.
    pub(crate) fn num_active_king_checks(&self) -> u32 {
        let active_king = self.pieces[&(self.player, King)];
        let king = active_king.squares()[0];
        let passive_player = !self.player;

        let passive_pawns = self.pieces[&(passive_player, Pawn)];
        let passive_knights = self.pieces[&(passive_player, Knight)];
        let passive_king = self.pieces[&(passive_player, King)];
        let passive_bishops = self.pieces[&(passive_player, Bishop)];
        let passive_rooks = self.pieces[&(passive_player, Rook)];
        let passive_queens = self.pieces[&(passive_player, Queen)];

        let occupied = self.pieces().occupied();

        let pawn_attackers = mg::pawn_attackers_to(king, passive_pawns, passive_player);
        let knight_attackers = mg::knight_attackers_to(king, passive_knights);
        let king_attackers = mg::king_attackers_to(king, passive_king);
        let bishop_attackers = mg::bishop_attackers_to(king, passive_bishops, occupied);
        let rook_attackers = mg::rook_attackers_to(king, passive_rooks, occupied);
        let queen_attackers = mg::queen_attackers_to(king, passive_queens, occupied);

        pawn_attackers.len()
            + knight_attackers.len()
            + king_attackers.len()
            + bishop_attackers.len()
            + rook_attackers.len()
            + queen_attackers.len()
    }

    /// Returns a Bitboard of every square attacked by `color`'s pieces, given `occupied`.
    /// Used for both check detection and castling-path legality.
    pub fn attacks(&self, color: Color, occupied: Bitboard) -> Bitboard {
        let pawns = self.pieces[(color, Pawn)];
        let knights = self.pieces[(color, Knight)];
        let king = self.pieces[(color, King)];
        let queens = self.pieces[(color, Queen)];
        let rooks = self.pieces[(color, Rook)];
        let bishops = self.pieces[(color, Bishop)];

        mg::pawn_attacks(pawns, color)
            | mg::knight_attacks(knights)
            | mg::king_attacks(king)
            | mg::slide_attacks(queens, rooks, bishops, occupied)
    }

    /// Returns a list of all legal moves for active player.
    /// Pseudo-legal moves are generated per piece kind, then filtered down to
    /// legal moves by simulating each one and checking that the mover's own
    /// king is not left in check.
    pub fn get_legal_moves(&self) -> RawMoveList {
        let player = self.player;
        let us = self.pieces.color_occupied(&player);
        let them = self.pieces.color_occupied(&!player);
        let occupied = us | them;

        let mut pseudo_moves = RawMoveList::new();
        mg::pawn_pseudo_moves(
            &mut pseudo_moves,
            self.pieces[(player, Pawn)],
            player,
            occupied,
            them,
            self.en_passant,
        );
        mg::knight_pseudo_moves(&mut pseudo_moves, self.pieces[(player, Knight)], us);
        mg::bishop_pseudo_moves(
            &mut pseudo_moves,
            self.pieces[(player, Bishop)],
            occupied,
            us,
        );
        mg::rook_pseudo_moves(&mut pseudo_moves, self.pieces[(player, Rook)], occupied, us);
        mg::queen_pseudo_moves(
            &mut pseudo_moves,
            self.pieces[(player, Queen)],
            occupied,
            us,
        );

        let king_bb = self.pieces[(player, King)];
        if let Some(king_sq) = king_bb.get_lowest_square() {
            for to in (mg::king_attacks(king_bb) & !us).squares() {
                pseudo_moves.push(Move::new(king_sq, to, None));
            }
        }

        let attacked_by_them = self.attacks(!player, occupied);
        mg::legal_castling_moves(&mut pseudo_moves, player, self.castling, occupied, attacked_by_them);

        let mut legal_moves = RawMoveList::new();
        for move_ in pseudo_moves {
            let mut after = *self;
            after.do_move(move_);
            let mover_king = after.pieces[(player, King)];
            let attacked = after.attacks(!player, after.pieces.occupied());
            if (mover_king & attacked).is_empty() {
                legal_moves.push(move_);
            }
        }
        legal_moves
    }

    /// Returns true if active player has no legal moves and is in check.
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check() && self.get_legal_moves().is_empty()
    }

    /// Returns true if active player has no legal moves and is not in check.
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check() && self.get_legal_moves().is_empty()
    }

    /// Returns a Position that is the color-flipped mirror of self:
    /// squares are flipped vertically, and piece/castling colors are swapped.
    /// Useful for verifying symmetry of evaluation.
    pub fn color_flip(&self) -> Position {
        let mut flipped = Position {
            pieces: PieceSets::new(),
            player: !self.player,
            castling: Castling::NONE,
            en_passant: self.en_passant.map(|square| square.flip_rank()),
            halfmoves: self.halfmoves,
            fullmoves: self.fullmoves,
            history: [Undo::EMPTY; MAX_HISTORY],
            history_len: 0,
        };

        for color in Color::iter() {
            for piece_kind in PieceKind::iter() {
                let piece = Piece::new(color, piece_kind);
                let flipped_piece = Piece::new(!color, piece_kind);
                for square in self.pieces[&piece].squares() {
                    flipped.pieces[&flipped_piece].set_square(square.flip_rank());
                }
            }
        }

        if self.castling.has(Castling::W_KING) {
            flipped.castling.set(Castling::B_KING);
        }
        if self.castling.has(Castling::W_QUEEN) {
            flipped.castling.set(Castling::B_QUEEN);
        }
        if self.castling.has(Castling::B_KING) {
            flipped.castling.set(Castling::W_KING);
        }
        if self.castling.has(Castling::B_QUEEN) {
            flipped.castling.set(Castling::W_QUEEN);
        }

        flipped
    }
}

/// Two positions are equal if their chess state is equal, regardless of how
/// each arrived there; the internal undo history is not part of a Position's
/// logical identity.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.player == other.player
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmoves == other.halfmoves
            && self.fullmoves == other.fullmoves
    }
}
impl Eq for Position {}

/// Defaults to standard chess start position.
impl Default for Position {
    fn default() -> Self {
        Self::start_position()
    }
}

/// Displays pretty-printed chess board and Fen string representing Position.
impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // print: position, FEN string
        write!(f, "{}\n Fen: {}\n", self.pieces, self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_print_position() {
        let start_pos = Position::start_position();
        println!("{}", start_pos);
    }

    #[test]
    fn do_move_with_legal_move() {
        let move1 = Move::new(Square::E2, Square::E4, None);
        let move1_piece = Piece::new(Color::White, PieceKind::Pawn);
        let mut position = Position::start_position();
        position.do_move(move1);
        assert!(position.pieces[&move1_piece].has_square(Square::E4));
        assert!(!position.pieces[&move1_piece].has_square(Square::E2));
    }

    #[test]
    fn do_move_then_undo_move_is_identity() {
        let start_pos = Position::start_position();
        let mut position = start_pos;
        let move1 = Move::new(Square::E2, Square::E4, None);
        let move_info = position.do_move(move1);
        position.undo_move(move_info);
        assert_eq!(position, start_pos);
    }

    #[test]
    fn do_undo_through_capture_and_en_passant() {
        let start_pos =
            Position::parse_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3")
                .unwrap();
        let mut position = start_pos;
        let ep_capture = Move::new(Square::D4, Square::E3, None);
        let move_info = position.do_move(ep_capture);
        assert!(!position.pieces[&Piece::new(Color::White, PieceKind::Pawn)].has_square(Square::E4));
        position.undo_move(move_info);
        assert_eq!(position, start_pos);
    }

    #[test]
    fn castling_rights_lost_on_king_and_rook_moves() {
        let mut position =
            Position::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        position.do_move(Move::new(Square::E1, Square::E2, None));
        assert_eq!(*position.castling(), Castling::B_SIDE);
    }

    #[test]
    fn king_checks() {
        let check1_1 = Position::parse_fen("8/8/8/8/3K3r/8/8/8 w - - 0 1").unwrap();
        let check1_2 =
            Position::parse_fen("rnb1kbnr/ppp1pppp/8/3p4/1qPPP3/8/PP3PPP/RNBQKBNR w KQkq - 1 4")
                .unwrap();
        let check2_1 = Position::parse_fen("3q4/8/4b3/3k4/4P1n1/8/3Q4/2R5 b - - 0 1").unwrap();
        let check4_1 =
            Position::parse_fen("6b1/2r1r3/pp4n1/4K2r/2p5/7p/1p1q2q1/4r2r w - - 0 1").unwrap();
        let check5_1 = Position::parse_fen("4r3/8/2b2n2/5p2/4K3/5q2/8/8 w - - 0 1").unwrap();
        let check5_2 = Position::parse_fen("8/8/5n2/3brp2/Q3K2q/5P2/3N4/1B2R3 w - - 0 1").unwrap();

        assert_eq!(check1_1.num_active_king_checks(), 1);
        assert_eq!(check1_2.num_active_king_checks(), 1);
        assert_eq!(check2_1.num_active_king_checks(), 2);
        assert_eq!(check4_1.num_active_king_checks(), 4);
        assert_eq!(check5_1.num_active_king_checks(), 5);
        assert_eq!(check5_2.num_active_king_checks(), 5);
    }

    #[test]
    fn perft_start_position() {
        fn perft(position: &Position, depth: u32) -> u64 {
            if depth == 0 {
                return 1;
            }
            let mut nodes = 0;
            for move_ in position.get_legal_moves() {
                nodes += perft(&position.make_move(move_), depth - 1);
            }
            nodes
        }

        let start = Position::start_position();
        assert_eq!(perft(&start, 1), 20);
        assert_eq!(perft(&start, 2), 400);
    }
}
