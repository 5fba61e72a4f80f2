//! [Forsyth-Edwards Notation](https://www.chessprogramming.org/Forsyth-Edwards_Notation)
//! parsing and serialization for `Position`.
//!
//! A FEN string has six space-separated fields:
//! `<placement> <side> <castling> <en passant> <halfmove clock> <fullmove number>`.

use std::error;
use std::fmt::{self, Display};

use crate::boardrepr::{Mailbox, PieceSets};
use crate::coretypes::{Castling, Color, File, MoveCount, Piece, Rank, Square};
use crate::position::Position;

/// Standard chess starting position, `Position::start_position`'s FEN.
pub const START_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn square_from_file_rank_u8(file: u8, rank: u8) -> Option<Square> {
    Some(Square::from((File::from_u8(file)?, Rank::from_u8(rank)?)))
}

/// Parses a position from, and serializes a position to, FEN.
pub trait Fen: Sized {
    /// Parses a full FEN string into `Self`.
    fn parse_fen(fen: &str) -> Result<Self, ParseFenError>;
    /// Serializes `Self` into a full FEN string.
    fn to_fen(&self) -> String;
}

impl Fen for Position {
    fn parse_fen(fen: &str) -> Result<Self, ParseFenError> {
        let mut fields = fen.split_whitespace();

        let placement = fields.next().ok_or(ParseFenError::WrongFieldCount)?;
        let side = fields.next().ok_or(ParseFenError::WrongFieldCount)?;
        let castling = fields.next().ok_or(ParseFenError::WrongFieldCount)?;
        let en_passant = fields.next().ok_or(ParseFenError::WrongFieldCount)?;
        let halfmoves = fields.next().ok_or(ParseFenError::WrongFieldCount)?;
        let fullmoves = fields.next().ok_or(ParseFenError::WrongFieldCount)?;
        if fields.next().is_some() {
            return Err(ParseFenError::WrongFieldCount);
        }

        let pieces = PieceSets::from(&parse_placement(placement)?);

        let player = Color::try_from(
            side.chars()
                .next()
                .ok_or(ParseFenError::MalformedSideToMove)?,
        )
        .map_err(|_| ParseFenError::MalformedSideToMove)?;

        let castling: Castling = castling
            .parse()
            .map_err(|_| ParseFenError::MalformedCastling)?;

        let en_passant = match en_passant {
            "-" => None,
            s => Some(s.parse::<Square>().map_err(|_| ParseFenError::MalformedEnPassant)?),
        };

        let halfmoves: MoveCount = halfmoves
            .parse()
            .map_err(|_| ParseFenError::MalformedHalfmoves)?;
        let fullmoves: MoveCount = fullmoves
            .parse()
            .map_err(|_| ParseFenError::MalformedFullmoves)?;

        Ok(Position::new_raw(
            pieces, player, castling, en_passant, halfmoves, fullmoves,
        ))
    }

    fn to_fen(&self) -> String {
        let mailbox = Mailbox::from(self.pieces());
        let placement = serialize_placement(&mailbox);
        let side = if *self.player() == Color::White { 'w' } else { 'b' };

        let castling = *self.castling();
        let castling_str = if castling.is_none() {
            "-".to_string()
        } else {
            let mut s = String::with_capacity(4);
            if castling.has(Castling::W_KING) {
                s.push('K');
            }
            if castling.has(Castling::W_QUEEN) {
                s.push('Q');
            }
            if castling.has(Castling::B_KING) {
                s.push('k');
            }
            if castling.has(Castling::B_QUEEN) {
                s.push('q');
            }
            s
        };

        let en_passant = match self.en_passant() {
            Some(square) => square.to_string(),
            None => "-".to_string(),
        };

        format!(
            "{placement} {side} {castling_str} {en_passant} {} {}",
            *self.halfmoves(),
            *self.fullmoves(),
        )
    }
}

/// Parses the first FEN field into a `Mailbox`.
fn parse_placement(placement: &str) -> Result<Mailbox, ParseFenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != Mailbox::RANKS {
        return Err(ParseFenError::MalformedPlacement);
    }

    let mut mailbox = Mailbox::new();
    // FEN ranks run from rank 8 down to rank 1.
    for (rank_from_top, rank_str) in ranks.iter().enumerate() {
        let rank_u8 = (Mailbox::RANKS - 1 - rank_from_top) as u8;
        let mut file_u8: u8 = 0;

        for ch in rank_str.chars() {
            if file_u8 as usize >= Mailbox::FILES {
                return Err(ParseFenError::MalformedPlacement);
            }
            if let Some(skip) = ch.to_digit(10) {
                file_u8 += skip as u8;
            } else {
                let piece = Piece::try_from(ch).map_err(|_| ParseFenError::MalformedPlacement)?;
                let square = square_from_file_rank_u8(file_u8, rank_u8)
                    .ok_or(ParseFenError::MalformedPlacement)?;
                mailbox[square] = Some(piece);
                file_u8 += 1;
            }
        }
        if file_u8 as usize != Mailbox::FILES {
            return Err(ParseFenError::MalformedPlacement);
        }
    }

    Ok(mailbox)
}

/// Serializes a `Mailbox` into the first FEN field.
fn serialize_placement(mailbox: &Mailbox) -> String {
    let mut placement = String::new();

    for rank_from_top in 0..Mailbox::RANKS {
        let rank_u8 = (Mailbox::RANKS - 1 - rank_from_top) as u8;
        let mut empty_run = 0u8;

        for file_u8 in 0..Mailbox::FILES as u8 {
            let square = square_from_file_rank_u8(file_u8, rank_u8).expect("valid file/rank");
            match mailbox[square] {
                Some(piece) => {
                    if empty_run > 0 {
                        placement.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    placement.push(char::from(piece));
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            placement.push_str(&empty_run.to_string());
        }
        if rank_from_top != Mailbox::RANKS - 1 {
            placement.push('/');
        }
    }

    placement
}

/// Describes why a FEN string failed to parse.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum ParseFenError {
    WrongFieldCount,
    MalformedPlacement,
    MalformedSideToMove,
    MalformedCastling,
    MalformedEnPassant,
    MalformedHalfmoves,
    MalformedFullmoves,
}

impl Display for ParseFenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            Self::WrongFieldCount => "fen does not have exactly 6 space-separated fields",
            Self::MalformedPlacement => "fen piece placement field is malformed",
            Self::MalformedSideToMove => "fen side to move field is malformed",
            Self::MalformedCastling => "fen castling field is malformed",
            Self::MalformedEnPassant => "fen en passant field is malformed",
            Self::MalformedHalfmoves => "fen halfmove clock field is malformed",
            Self::MalformedFullmoves => "fen fullmove number field is malformed",
        };
        f.write_str(msg)
    }
}

impl error::Error for ParseFenError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_round_trips() {
        let position = Position::parse_fen(START_POSITION_FEN).unwrap();
        assert_eq!(position, Position::start_position());
        assert_eq!(position.to_fen(), START_POSITION_FEN);
    }

    #[test]
    fn parses_castling_and_en_passant() {
        let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2";
        let position = Position::parse_fen(fen).unwrap();
        assert_eq!(*position.castling(), Castling::ALL);
        assert_eq!(*position.en_passant(), Some("d6".parse().unwrap()));
        assert_eq!(position.to_fen(), fen);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(
            Position::parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").is_err()
        );
    }

    #[test]
    fn rejects_malformed_placement() {
        assert!(Position::parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1").is_err());
    }

    #[test]
    fn rejects_bad_rank_width() {
        let fen = "rnbqkbnr/pppppppp/8/8/9/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert!(Position::parse_fen(fen).is_err());
    }
}
