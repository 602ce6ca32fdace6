//! 国际象棋规则引擎
//!
//! 包含:
//! - 棋子、格子、棋盘等核心数据结构
//! - 原始走法生成、攻击计算和将军检测
//! - 合法走法过滤（在棋盘副本上模拟）
//! - 王车易位、吃过路兵、升变的执行
//! - 终局判定（将死、逼和）
//! - FEN 局面设置

mod board;
mod constants;
mod error;
mod fen;
mod game;
mod moves;
mod piece;
mod record;

pub use board::{Board, CastleSide, CastlingRights, GameState};
pub use constants::*;
pub use error::{ChessError, Result};
pub use fen::{Fen, INITIAL_FEN};
pub use game::{GameStatus, MoveOutcome};
pub use moves::MoveGenerator;
pub use piece::{Color, Piece, PieceType, Square};
pub use record::{MoveRecord, SpecialMove};
