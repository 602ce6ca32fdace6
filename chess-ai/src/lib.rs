//! 国际象棋 AI
//!
//! 包含:
//! - 子力评估函数
//! - 俱乐部级（随机）与强（一层子力评估）两种选着策略
//!
//! AI 只通过规则引擎的公开接口获取合法走法和模拟走法。

mod error;
mod evaluate;
mod search;

pub use error::AiError;
pub use evaluate::Evaluator;
pub use search::{select_move, AiConfig, AiEngine, SelectedMove, Strategy};
