//! AI 错误类型

use chess_rules::{ChessError, Color};
use thiserror::Error;

/// AI 选着错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    /// 该方没有合法走法（调用方应先检查对局状态）
    #[error("No legal moves for {color:?}")]
    NoLegalMoves { color: Color },

    /// 不是该方走棋
    #[error("Not {color:?}'s turn")]
    NotYourTurn { color: Color },

    /// 规则错误
    #[error("Chess error: {0}")]
    Rules(#[from] ChessError),
}
