//! FEN 格式解析和生成
//!
//! 国际象棋 FEN 格式：
//! `<棋盘> <走子方> <易位权利> <过路兵目标> <半回合数> <回合数>`
//!
//! 示例：
//! `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1`
//!
//! 只用于局面设置，不涉及走法记谱。

use crate::board::{Board, CastlingRights, GameState};
use crate::constants::BOARD_SIZE;
use crate::error::ChessError;
use crate::piece::{Color, Piece, Square};

/// 初始局面 FEN
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN 格式处理
pub struct Fen;

impl Fen {
    /// 解析 FEN 字符串为对局状态
    ///
    /// 只有棋盘字段是必需的；其余字段缺省为 `w - - 0 1`。
    pub fn parse(fen: &str) -> Result<GameState, ChessError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.is_empty() {
            return Err(invalid("Empty FEN string"));
        }
        if parts.len() > 6 {
            return Err(invalid(format!("Expected at most 6 fields, got {}", parts.len())));
        }

        let board = Self::parse_board(parts[0])?;

        let side_to_move = match parts.get(1).copied() {
            None => Color::White,
            Some(field) => {
                let mut chars = field.chars();
                match (chars.next().and_then(Color::from_fen_char), chars.next()) {
                    (Some(color), None) => color,
                    _ => return Err(invalid(format!("Invalid side to move: {}", field))),
                }
            }
        };

        let castling = match parts.get(2).copied() {
            None => CastlingRights::none(),
            Some(field) => Self::parse_castling(field)?,
        };

        let en_passant = match parts.get(3).copied() {
            None | Some("-") => None,
            Some(field) => Some(
                field
                    .parse::<Square>()
                    .map_err(|_| invalid(format!("Invalid en passant square: {}", field)))?,
            ),
        };

        let halfmove_clock = match parts.get(4) {
            None => 0,
            Some(field) => field
                .parse()
                .map_err(|_| invalid(format!("Invalid halfmove clock: {}", field)))?,
        };

        let fullmove_number = match parts.get(5) {
            None => 1,
            Some(field) => field
                .parse()
                .map_err(|_| invalid(format!("Invalid fullmove number: {}", field)))?,
        };

        let mut state = GameState::from_board(board, side_to_move, castling, en_passant);
        state.halfmove_clock = halfmove_clock;
        state.fullmove_number = fullmove_number;
        Ok(state)
    }

    /// 解析棋盘部分
    fn parse_board(board_str: &str) -> Result<Board, ChessError> {
        let mut board = Board::empty();
        let rows: Vec<&str> = board_str.split('/').collect();

        if rows.len() != BOARD_SIZE {
            return Err(invalid(format!("Expected 8 rows, got {}", rows.len())));
        }

        // FEN 从第 8 横线开始，与行 0 对应
        for (row, row_str) in rows.iter().enumerate() {
            let mut col = 0usize;

            for c in row_str.chars() {
                if col >= BOARD_SIZE {
                    return Err(invalid(format!("Row {} has too many columns", row)));
                }

                if let Some(empty_count) = c.to_digit(10).filter(|n| (1..=8).contains(n)) {
                    col += empty_count as usize;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    board.set(Square::new_unchecked(row as u8, col as u8), Some(piece));
                    col += 1;
                } else {
                    return Err(invalid(format!("Invalid piece character: {}", c)));
                }
            }

            if col != BOARD_SIZE {
                return Err(invalid(format!(
                    "Row {} has {} columns, expected 8",
                    row, col
                )));
            }
        }

        board.check_kings().map_err(invalid)?;

        Ok(board)
    }

    /// 解析易位权利部分
    fn parse_castling(field: &str) -> Result<CastlingRights, ChessError> {
        let mut rights = CastlingRights::none();
        if field == "-" {
            return Ok(rights);
        }

        for c in field.chars() {
            match c {
                'K' => rights.white_kingside = true,
                'Q' => rights.white_queenside = true,
                'k' => rights.black_kingside = true,
                'q' => rights.black_queenside = true,
                _ => return Err(invalid(format!("Invalid castling field: {}", field))),
            }
        }

        Ok(rights)
    }

    /// 将对局状态转换为 FEN 字符串
    pub fn to_string(state: &GameState) -> String {
        let en_passant = state
            .en_passant()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{} {} {} {} {} {}",
            Self::board_to_string(state.board()),
            state.side_to_move().to_fen_char(),
            state.castling_rights().to_fen(),
            en_passant,
            state.halfmove_clock(),
            state.fullmove_number()
        )
    }

    /// 将棋盘转换为 FEN 棋盘字符串
    fn board_to_string(board: &Board) -> String {
        let mut rows = Vec::with_capacity(BOARD_SIZE);

        for row in 0..BOARD_SIZE as u8 {
            let mut row_str = String::new();
            let mut empty_count = 0;

            for col in 0..BOARD_SIZE as u8 {
                match board.get(Square::new_unchecked(row, col)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            row_str.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        row_str.push(piece.to_fen_char());
                    }
                    None => empty_count += 1,
                }
            }

            if empty_count > 0 {
                row_str.push_str(&empty_count.to_string());
            }
            rows.push(row_str);
        }

        rows.join("/")
    }
}

fn invalid(reason: impl Into<String>) -> ChessError {
    ChessError::InvalidFen {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_initial() {
        let state = Fen::parse(INITIAL_FEN).unwrap();
        assert_eq!(state, GameState::new_game());
    }

    #[test]
    fn test_roundtrip_initial() {
        let state = GameState::new_game();
        assert_eq!(Fen::to_string(&state), INITIAL_FEN);
    }

    #[test]
    fn test_after_double_push() {
        let mut state = GameState::new_game();
        state
            .apply_move("e2".parse().unwrap(), "e4".parse().unwrap(), None)
            .unwrap();
        assert_eq!(
            Fen::to_string(&state),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn test_parse_fields() {
        let state = Fen::parse("r3k2r/8/8/3pP3/8/8/8/R3K2R b Kq d6 5 42").unwrap();
        assert_eq!(state.side_to_move(), Color::Black);
        assert!(state.castling_rights().white_kingside);
        assert!(!state.castling_rights().white_queenside);
        assert!(!state.castling_rights().black_kingside);
        assert!(state.castling_rights().black_queenside);
        assert_eq!(state.en_passant(), Some("d6".parse().unwrap()));
        assert_eq!(state.halfmove_clock(), 5);
        assert_eq!(state.fullmove_number(), 42);
    }

    #[test]
    fn test_parse_defaults() {
        let state = Fen::parse("4k3/8/8/8/8/8/8/4K3").unwrap();
        assert_eq!(state.side_to_move(), Color::White);
        assert_eq!(state.castling_rights(), CastlingRights::none());
        assert_eq!(state.en_passant(), None);
        assert_eq!(state.fullmove_number(), 1);
    }

    #[test]
    fn test_invalid_fen() {
        let cases = [
            "",
            "4k3/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K4 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K2 w - - 0 1",
            "4k3/8/8/8/8/8/8/4X3 w - - 0 1",
            "4k3/8/8/8/8/8/8/8 w - - 0 1",
            "4k3/8/8/8/8/8/8/3KK3 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 x - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w KX - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - z9 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - a 1",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra",
        ];
        for fen in cases {
            assert!(
                matches!(Fen::parse(fen), Err(ChessError::InvalidFen { .. })),
                "should reject: {:?}",
                fen
            );
        }
    }
}
