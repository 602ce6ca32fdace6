//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{
    BOARD_SIZE, KINGSIDE_ROOK_COL, QUEENSIDE_ROOK_COL, SQUARE_COUNT,
};
use crate::error::{ChessError, Result};
use crate::piece::{Color, Piece, PieceType, Square};
use crate::record::MoveRecord;

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoardData")]
pub struct Board {
    /// 8x8 棋盘，索引为 row * 8 + col，使用 Vec 以支持 serde
    squares: Vec<Option<Piece>>,
}

#[derive(Deserialize)]
struct BoardData {
    squares: Vec<Option<Piece>>,
}

impl TryFrom<BoardData> for Board {
    type Error = ChessError;

    fn try_from(data: BoardData) -> Result<Self> {
        if data.squares.len() != SQUARE_COUNT {
            return Err(ChessError::InvalidPosition {
                reason: format!(
                    "Expected {} squares, got {}",
                    SQUARE_COUNT,
                    data.squares.len()
                ),
            });
        }
        Ok(Self {
            squares: data.squares,
        })
    }
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; SQUARE_COUNT],
        }
    }

    /// 创建初始棋盘
    pub fn initial() -> Self {
        let mut board = Self::empty();

        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for color in [Color::White, Color::Black] {
            for (col, piece_type) in back_rank.iter().enumerate() {
                board.set(
                    Square::new_unchecked(color.back_row(), col as u8),
                    Some(Piece::new(*piece_type, color)),
                );
                board.set(
                    Square::new_unchecked(color.pawn_start_row(), col as u8),
                    Some(Piece::new(PieceType::Pawn, color)),
                );
            }
        }

        board
    }

    /// 获取指定格子的棋子
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares.get(sq.to_index()).copied().flatten()
    }

    /// 设置指定格子的棋子
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        if let Some(slot) = self.squares.get_mut(sq.to_index()) {
            *slot = piece;
        }
    }

    /// 指定格子是否为空
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// 移动棋子（不检查规则），返回目标格原有的棋子
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.squares.get_mut(from.to_index())?.take().map(|mut p| {
            p.has_moved = true;
            p
        });
        let slot = self.squares.get_mut(to.to_index())?;
        std::mem::replace(slot, piece)
    }

    /// 查找指定阵营的王
    pub fn find_king(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| {
            self.get(sq)
                .is_some_and(|piece| piece.is(PieceType::King, color))
        })
    }

    /// 获取指定阵营的所有棋子（行优先顺序）
    pub fn pieces(&self, color: Color) -> Vec<(Square, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.color == color)
            .collect()
    }

    /// 获取所有棋子（行优先顺序）
    pub fn all_pieces(&self) -> Vec<(Square, Piece)> {
        Square::all()
            .filter_map(|sq| self.get(sq).map(|piece| (sq, piece)))
            .collect()
    }

    /// 检查双方各有且只有一个王，失败时返回原因
    pub(crate) fn check_kings(&self) -> std::result::Result<(), String> {
        for color in [Color::White, Color::Black] {
            let kings = self.count(PieceType::King, color);
            if kings != 1 {
                return Err(format!(
                    "Expected exactly one {:?} king, found {}",
                    color, kings
                ));
            }
        }
        Ok(())
    }

    /// 统计指定阵营指定类型的棋子数量
    pub fn count(&self, piece_type: PieceType, color: Color) -> usize {
        self.squares
            .iter()
            .flatten()
            .filter(|piece| piece.is(piece_type, color))
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..BOARD_SIZE as u8 {
            let line: String = (0..BOARD_SIZE as u8)
                .map(|col| {
                    self.get(Square::new_unchecked(row, col))
                        .map_or('.', |piece| piece.to_fen_char())
                })
                .collect();
            writeln!(f, "{} {}", BOARD_SIZE as u8 - row, line)?;
        }
        write!(f, "  abcdefgh")
    }
}

/// 易位方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// 该方向参与易位的车的初始列
    pub fn rook_col(&self) -> u8 {
        match self {
            CastleSide::Kingside => KINGSIDE_ROOK_COL,
            CastleSide::Queenside => QUEENSIDE_ROOK_COL,
        }
    }
}

/// 王车易位权利
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    /// 四项权利全部有效
    pub fn all() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    /// 没有任何易位权利
    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn get(&self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => self.white_kingside,
            (Color::White, CastleSide::Queenside) => self.white_queenside,
            (Color::Black, CastleSide::Kingside) => self.black_kingside,
            (Color::Black, CastleSide::Queenside) => self.black_queenside,
        }
    }

    /// 永久清除一项权利
    pub fn clear(&mut self, color: Color, side: CastleSide) {
        let flag = match (color, side) {
            (Color::White, CastleSide::Kingside) => &mut self.white_kingside,
            (Color::White, CastleSide::Queenside) => &mut self.white_queenside,
            (Color::Black, CastleSide::Kingside) => &mut self.black_kingside,
            (Color::Black, CastleSide::Queenside) => &mut self.black_queenside,
        };
        *flag = false;
    }

    /// 清除某一方的全部权利
    pub fn clear_color(&mut self, color: Color) {
        self.clear(color, CastleSide::Kingside);
        self.clear(color, CastleSide::Queenside);
    }

    /// 若格子是某方车的初始格，清除对应权利
    pub(crate) fn clear_for_rook_square(&mut self, sq: Square) {
        for color in [Color::White, Color::Black] {
            for side in [CastleSide::Kingside, CastleSide::Queenside] {
                if sq.row() == color.back_row() && sq.col() == side.rook_col() {
                    self.clear(color, side);
                }
            }
        }
    }

    /// FEN 表示，如 "KQkq"，无权利时为 "-"
    pub fn to_fen(&self) -> String {
        let mut s = String::new();
        if self.white_kingside {
            s.push('K');
        }
        if self.white_queenside {
            s.push('Q');
        }
        if self.black_kingside {
            s.push('k');
        }
        if self.black_queenside {
            s.push('q');
        }
        if s.is_empty() {
            s.push('-');
        }
        s
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}

/// 完整的对局状态
///
/// 字段只在本 crate 内可写；外部只能通过
/// [`GameState::apply_move`] 改变局面。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameStateData")]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    /// 吃过路兵目标格，仅在双步推兵后的下一手有效
    pub(crate) en_passant: Option<Square>,
    /// 无吃子、无兵移动的半回合数（仅记录，不判和）
    pub(crate) halfmove_clock: u32,
    /// 完整回合数（黑方走完后 +1）
    pub(crate) fullmove_number: u32,
    /// 白方吃掉的黑子（按吃子顺序）
    pub(crate) captured_by_white: Vec<Piece>,
    /// 黑方吃掉的白子（按吃子顺序）
    pub(crate) captured_by_black: Vec<Piece>,
    pub(crate) move_log: Vec<MoveRecord>,
}

#[derive(Deserialize)]
struct GameStateData {
    board: Board,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    captured_by_white: Vec<Piece>,
    captured_by_black: Vec<Piece>,
    move_log: Vec<MoveRecord>,
}

impl TryFrom<GameStateData> for GameState {
    type Error = ChessError;

    fn try_from(data: GameStateData) -> Result<Self> {
        data.board
            .check_kings()
            .map_err(|reason| ChessError::InvalidPosition { reason })?;
        Ok(Self {
            board: data.board,
            side_to_move: data.side_to_move,
            castling: data.castling,
            en_passant: data.en_passant,
            halfmove_clock: data.halfmove_clock,
            fullmove_number: data.fullmove_number,
            captured_by_white: data.captured_by_white,
            captured_by_black: data.captured_by_black,
            move_log: data.move_log,
        })
    }
}

impl GameState {
    /// 标准初始局面，白方先走
    pub fn new_game() -> Self {
        Self::from_board(Board::initial(), Color::White, CastlingRights::all(), None)
    }

    /// 从棋盘创建状态（计数器和日志为初始值）
    pub(crate) fn from_board(
        board: Board,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
    ) -> Self {
        Self {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock: 0,
            fullmove_number: 1,
            captured_by_white: Vec::new(),
            captured_by_black: Vec::new(),
            move_log: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// 指定阵营吃掉的对方棋子
    pub fn captured_by(&self, color: Color) -> &[Piece] {
        match color {
            Color::White => &self.captured_by_white,
            Color::Black => &self.captured_by_black,
        }
    }

    /// 已执行走法日志
    pub fn move_log(&self) -> &[MoveRecord] {
        &self.move_log
    }

    /// 切换走子方
    pub(crate) fn switch_turn(&mut self) {
        if self.side_to_move == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = self.side_to_move.opponent();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_initial_board() {
        let board = Board::initial();

        assert_eq!(
            board.get(sq("e1")),
            Some(Piece::new(PieceType::King, Color::White))
        );
        assert_eq!(
            board.get(sq("d8")),
            Some(Piece::new(PieceType::Queen, Color::Black))
        );
        assert_eq!(
            board.get(sq("a7")),
            Some(Piece::new(PieceType::Pawn, Color::Black))
        );
        assert!(board.is_empty(sq("e4")));
        assert_eq!(board.all_pieces().len(), 32);
        assert_eq!(board.count(PieceType::Pawn, Color::White), 8);
    }

    #[test]
    fn test_move_piece() {
        let mut board = Board::initial();

        let captured = board.move_piece(sq("g1"), sq("f3"));
        assert!(captured.is_none());
        assert!(board.is_empty(sq("g1")));

        let knight = board.get(sq("f3")).unwrap();
        assert!(knight.is(PieceType::Knight, Color::White));
        assert!(knight.has_moved);

        // 移动到有棋子的格子返回原棋子
        let captured = board.move_piece(sq("f3"), sq("e5"));
        assert!(captured.is_none());
        let captured = board.move_piece(sq("e5"), sq("d7"));
        assert_eq!(captured, Some(Piece::new(PieceType::Pawn, Color::Black)));
    }

    #[test]
    fn test_find_king() {
        let board = Board::initial();
        assert_eq!(board.find_king(Color::White), Some(sq("e1")));
        assert_eq!(board.find_king(Color::Black), Some(sq("e8")));
        assert_eq!(Board::empty().find_king(Color::White), None);
    }

    #[test]
    fn test_pieces_order() {
        let board = Board::initial();
        let black = board.pieces(Color::Black);
        assert_eq!(black.len(), 16);
        // 行优先：a8 最先
        assert_eq!(black[0].0, sq("a8"));
    }

    #[test]
    fn test_castling_rights() {
        let mut rights = CastlingRights::all();
        assert_eq!(rights.to_fen(), "KQkq");

        rights.clear(Color::White, CastleSide::Kingside);
        assert!(!rights.get(Color::White, CastleSide::Kingside));
        assert!(rights.get(Color::White, CastleSide::Queenside));
        assert_eq!(rights.to_fen(), "Qkq");

        rights.clear_for_rook_square(sq("a8"));
        assert!(!rights.black_queenside);
        assert!(rights.black_kingside);

        rights.clear_color(Color::Black);
        rights.clear_color(Color::White);
        assert_eq!(rights, CastlingRights::none());
        assert_eq!(rights.to_fen(), "-");
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new_game();
        assert_eq!(state.side_to_move(), Color::White);
        assert_eq!(state.castling_rights(), CastlingRights::all());
        assert_eq!(state.en_passant(), None);
        assert_eq!(state.fullmove_number(), 1);
        assert!(state.move_log().is_empty());
        assert!(state.captured_by(Color::White).is_empty());
    }

    #[test]
    fn test_switch_turn() {
        let mut state = GameState::new_game();
        state.switch_turn();
        assert_eq!(state.side_to_move(), Color::Black);
        assert_eq!(state.fullmove_number(), 1);
        state.switch_turn();
        assert_eq!(state.side_to_move(), Color::White);
        assert_eq!(state.fullmove_number(), 2);
    }

    #[test]
    fn test_board_deserialize_checks_size() {
        let board = Board::initial();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), board);

        assert!(serde_json::from_str::<Board>(r#"{"squares":[]}"#).is_err());
        let short = format!("{{\"squares\":[{}]}}", vec!["null"; 63].join(","));
        assert!(serde_json::from_str::<Board>(&short).is_err());
    }

    #[test]
    fn test_state_deserialize_requires_kings() {
        let state = GameState::new_game();
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(serde_json::from_str::<GameState>(&json).unwrap(), state);

        // 只有白王
        let mut board = Board::empty();
        board.set(sq("e1"), Some(Piece::new(PieceType::King, Color::White)));
        let kingless = GameState::from_board(board, Color::White, CastlingRights::none(), None);
        let json = serde_json::to_string(&kingless).unwrap();
        assert!(serde_json::from_str::<GameState>(&json).is_err());
    }

    #[test]
    fn test_fullmove_number_saturates() {
        let mut state = GameState::new_game();
        state.side_to_move = Color::Black;
        state.fullmove_number = u32::MAX;
        state.switch_turn();
        assert_eq!(state.fullmove_number(), u32::MAX);
    }
}
