//! 走法记录
//!
//! 每一步已执行的走法都会追加到 [`GameState`](crate::GameState) 的走法日志中。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::piece::{Color, Piece, PieceType, Square};

/// 特殊走法标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialMove {
    Normal,
    CastleKingside,
    CastleQueenside,
    EnPassant,
    /// 兵升变为指定棋子
    Promotion(PieceType),
}

/// 已执行走法的记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 起始格
    pub from: Square,
    /// 目标格
    pub to: Square,
    /// 走棋前的棋子
    pub piece: Piece,
    /// 被吃的棋子（吃过路兵时为被越过的兵）
    pub captured: Option<Piece>,
    pub special: SpecialMove,
}

impl MoveRecord {
    /// 是否吃子
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{}{}{}", self.from, separator, self.to)?;
        if let SpecialMove::Promotion(piece_type) = self.special {
            write!(f, "={}", piece_type.to_fen_char(Color::White))?;
        }
        Ok(())
    }
}
