//! 错误类型定义

use thiserror::Error;

use crate::piece::{PieceType, Square};

/// 国际象棋规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// 无效的格子坐标
    #[error("Invalid square: {input}")]
    InvalidSquare { input: String },

    /// 走法不在起点的合法目标集合中
    #[error("Illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    /// 升变选择不是马、象、车、后之一
    #[error("Invalid promotion choice: {piece_type:?}")]
    InvalidPromotionChoice { piece_type: PieceType },

    /// 无效的 FEN 字符串
    #[error("Invalid FEN string: {reason}")]
    InvalidFen { reason: String },

    /// 反序列化得到的局面不合法（棋盘大小错误、王的数量不对）
    #[error("Invalid position: {reason}")]
    InvalidPosition { reason: String },
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, ChessError>;
