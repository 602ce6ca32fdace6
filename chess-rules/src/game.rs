//! 对局控制
//!
//! 执行走法、更新对局状态并判定终局（将死、逼和）。

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::{Board, GameState};
use crate::error::{ChessError, Result};
use crate::moves::MoveGenerator;
use crate::piece::{Color, Piece, PieceType, Square};
use crate::record::MoveRecord;

/// 对局状态（相对于当前走子方）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// 对局进行中
    Ongoing,
    /// 被将军但有应着
    Check,
    /// 被将死
    Checkmate,
    /// 无子可动且未被将军（和棋）
    Stalemate,
}

impl GameStatus {
    /// 对局是否已结束
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

/// 执行走法的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub record: MoveRecord,
    /// 走棋后对方的局面状态
    pub status: GameStatus,
}

impl GameState {
    /// 指定格子上棋子的合法目标
    pub fn legal_moves_for(&self, square: Square) -> Vec<Square> {
        MoveGenerator::legal_moves_for(self, square)
    }

    /// 指定阵营的所有合法走法
    pub fn legal_moves_for_side(&self, color: Color) -> Vec<(Square, Square)> {
        MoveGenerator::legal_moves_for_side(self, color)
    }

    /// 当前走子方是否被将军
    pub fn is_in_check(&self) -> bool {
        MoveGenerator::is_in_check(self.side_to_move, &self.board)
    }

    /// 判定当前走子方的局面状态
    pub fn status(&self) -> GameStatus {
        let in_check = self.is_in_check();
        let has_moves = !self.legal_moves_for_side(self.side_to_move).is_empty();

        match (in_check, has_moves) {
            (true, false) => GameStatus::Checkmate,
            (false, false) => GameStatus::Stalemate,
            (true, true) => GameStatus::Check,
            (false, true) => GameStatus::Ongoing,
        }
    }

    /// 将死时返回胜方
    pub fn winner(&self) -> Option<Color> {
        match self.status() {
            GameStatus::Checkmate => Some(self.side_to_move.opponent()),
            _ => None,
        }
    }

    /// 执行走法
    ///
    /// `to` 必须在 `legal_moves_for(from)` 中。兵到达底线时应显式给出
    /// 升变选择（马、象、车、后）；省略时默认升变为后。
    /// 所有检查都在修改之前完成，失败时局面保持不变。
    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<MoveOutcome> {
        let (piece, promotion_choice) = self.check_move(from, to, promotion)?;

        let record =
            MoveGenerator::execute(&mut self.board, from, to, self.en_passant, promotion_choice)
                .ok_or(ChessError::IllegalMove { from, to })?;

        // 王移动清除双方向权利；任何走入或走出车初始格的走法清除对应权利
        if piece.piece_type == PieceType::King {
            self.castling.clear_color(piece.color);
        }
        self.castling.clear_for_rook_square(from);
        self.castling.clear_for_rook_square(to);

        self.en_passant = if piece.piece_type == PieceType::Pawn
            && from.row().abs_diff(to.row()) == 2
        {
            Some(Square::new_unchecked((from.row() + to.row()) / 2, from.col()))
        } else {
            None
        };

        if piece.piece_type == PieceType::Pawn || record.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if let Some(captured) = record.captured {
            match piece.color {
                Color::White => self.captured_by_white.push(captured),
                Color::Black => self.captured_by_black.push(captured),
            }
        }
        self.move_log.push(record);
        self.switch_turn();

        let status = self.status();
        debug!("Applied {} ({:?}), status: {:?}", record, record.special, status);
        if status.is_over() {
            info!("Game over after {}: {:?}", record, status);
        }

        Ok(MoveOutcome { record, status })
    }

    /// 试走一步，返回走后的棋盘
    ///
    /// 与 [`GameState::apply_move`] 做同样的检查，但只在棋盘副本上执行：
    /// 不复制走法日志，不更新对局状态，也不记录走棋事件。
    pub fn preview_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<Board> {
        let (_, promotion_choice) = self.check_move(from, to, promotion)?;

        let mut board = self.board.clone();
        MoveGenerator::execute(&mut board, from, to, self.en_passant, promotion_choice)
            .ok_or(ChessError::IllegalMove { from, to })?;
        Ok(board)
    }

    /// 检查升变选择和合法性，返回走动的棋子和实际升变棋子
    fn check_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<(Piece, PieceType)> {
        if let Some(piece_type) = promotion {
            if !piece_type.is_promotion_target() {
                warn!("Rejected promotion choice {:?} for {} -> {}", piece_type, from, to);
                return Err(ChessError::InvalidPromotionChoice { piece_type });
            }
        }

        if !self.legal_moves_for(from).contains(&to) {
            warn!("Rejected illegal move {} -> {}", from, to);
            return Err(ChessError::IllegalMove { from, to });
        }

        let piece = self
            .board
            .get(from)
            .ok_or(ChessError::IllegalMove { from, to })?;

        let promotes =
            piece.piece_type == PieceType::Pawn && to.row() == piece.color.promotion_row();
        let promotion_choice = match (promotes, promotion) {
            (true, Some(choice)) => choice,
            (true, None) => {
                warn!("No promotion choice given for {} -> {}, promoting to queen", from, to);
                PieceType::Queen
            }
            (false, Some(choice)) => {
                debug!("Ignoring promotion choice {:?} on non-promoting move", choice);
                PieceType::Queen
            }
            (false, None) => PieceType::Queen,
        };

        Ok((piece, promotion_choice))
    }
}
