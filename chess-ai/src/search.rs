//! 选着策略
//!
//! - 俱乐部级：在所有合法走法中均匀随机选择
//! - 强：对每个合法走法模拟一步，按子力差选最高分，同分取最先生成的走法

use chess_rules::{Color, GameState, PieceType, Square};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AiError;
use crate::evaluate::Evaluator;

/// 选着策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// 随机合法走法
    ClubLevel,
    /// 一层子力评估
    Strong,
}

/// AI 配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    pub strategy: Strategy,
    /// 随机数种子；为 None 时从系统熵初始化
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl AiConfig {
    pub fn from_strategy(strategy: Strategy) -> Self {
        Self {
            strategy,
            seed: None,
        }
    }

    /// 固定种子，用于复现俱乐部级的随机选择
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_strategy(Strategy::Strong)
    }
}

/// AI 选出的走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedMove {
    pub from: Square,
    pub to: Square,
    /// 兵到达底线时的升变选择
    pub promotion: Option<PieceType>,
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    rng: ChaCha8Rng,
    positions_evaluated: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            config,
            rng,
            positions_evaluated: 0,
        }
    }

    /// 从策略创建
    pub fn from_strategy(strategy: Strategy) -> Self {
        Self::new(AiConfig::from_strategy(strategy))
    }

    /// 为指定阵营选择走法
    pub fn select_move(&mut self, color: Color, state: &GameState) -> Result<SelectedMove, AiError> {
        self.positions_evaluated = 0;
        let moves = legal_moves(color, state)?;

        match self.config.strategy {
            Strategy::ClubLevel => club_level(color, state, &moves, &mut self.rng),
            Strategy::Strong => {
                let (selected, evaluated) = strong(color, state, &moves)?;
                self.positions_evaluated = evaluated;
                Ok(selected)
            }
        }
    }

    /// 上一次选着评估过的局面数
    pub fn positions_evaluated(&self) -> u64 {
        self.positions_evaluated
    }
}

/// 按策略为指定阵营选择走法（俱乐部级使用线程随机数）
pub fn select_move(
    strategy: Strategy,
    color: Color,
    state: &GameState,
) -> Result<SelectedMove, AiError> {
    let moves = legal_moves(color, state)?;
    match strategy {
        Strategy::ClubLevel => club_level(color, state, &moves, &mut rand::thread_rng()),
        Strategy::Strong => strong(color, state, &moves).map(|(selected, _)| selected),
    }
}

/// 获取合法走法；不是该方走棋或无子可动时报错
fn legal_moves(color: Color, state: &GameState) -> Result<Vec<(Square, Square)>, AiError> {
    if state.side_to_move() != color {
        return Err(AiError::NotYourTurn { color });
    }
    let moves = state.legal_moves_for_side(color);
    if moves.is_empty() {
        return Err(AiError::NoLegalMoves { color });
    }
    Ok(moves)
}

/// 兵走到底线时默认升变为后
fn promotion_for(state: &GameState, from: Square, to: Square) -> Option<PieceType> {
    let piece = state.board().get(from)?;
    (piece.piece_type == PieceType::Pawn && to.row() == piece.color.promotion_row())
        .then_some(PieceType::Queen)
}

fn club_level<R: Rng + ?Sized>(
    color: Color,
    state: &GameState,
    moves: &[(Square, Square)],
    rng: &mut R,
) -> Result<SelectedMove, AiError> {
    let &(from, to) = moves.choose(rng).ok_or(AiError::NoLegalMoves { color })?;
    debug!("Club-level strategy picked {} -> {} out of {} moves", from, to, moves.len());

    Ok(SelectedMove {
        from,
        to,
        promotion: promotion_for(state, from, to),
    })
}

/// 返回最佳走法和评估过的局面数
fn strong(
    color: Color,
    state: &GameState,
    moves: &[(Square, Square)],
) -> Result<(SelectedMove, u64), AiError> {
    let mut best: Option<(SelectedMove, i32)> = None;
    let mut evaluated = 0u64;

    for &(from, to) in moves {
        let promotion = promotion_for(state, from, to);

        // 只在棋盘副本上试走，活动局面不变
        let board = state.preview_move(from, to, promotion)?;
        evaluated += 1;

        let score = Evaluator::material(&board, color);
        // 严格大于：同分保留先生成的走法
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((SelectedMove { from, to, promotion }, score));
        }
    }

    let (selected, score) = best.ok_or(AiError::NoLegalMoves { color })?;
    debug!(
        "Strong strategy picked {} -> {} with material {} after {} positions",
        selected.from, selected.to, score, evaluated
    );
    Ok((selected, evaluated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_rules::{Fen, GameStatus};

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    fn fools_mate() -> GameState {
        let mut state = GameState::new_game();
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            state.apply_move(sq(from), sq(to), None).unwrap();
        }
        assert_eq!(state.status(), GameStatus::Checkmate);
        state
    }

    #[test]
    fn test_strong_captures_hanging_queen() {
        init_tracing();
        let state = Fen::parse("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
        let mv = select_move(Strategy::Strong, Color::White, &state).unwrap();
        assert_eq!((mv.from, mv.to), (sq("d1"), sq("d5")));
        assert_eq!(mv.promotion, None);
    }

    #[test]
    fn test_strong_promotes() {
        let state = Fen::parse("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mv = select_move(Strategy::Strong, Color::White, &state).unwrap();
        assert_eq!((mv.from, mv.to), (sq("a7"), sq("a8")));
        assert_eq!(mv.promotion, Some(PieceType::Queen));
    }

    #[test]
    fn test_strong_is_deterministic() {
        let state = GameState::new_game();
        let first = select_move(Strategy::Strong, Color::White, &state).unwrap();
        let second = select_move(Strategy::Strong, Color::White, &state).unwrap();
        assert_eq!(first, second);

        // 初始局面所有走法同分，取第一个生成的走法
        let (from, to) = state.legal_moves_for_side(Color::White)[0];
        assert_eq!((first.from, first.to), (from, to));
    }

    #[test]
    fn test_strong_does_not_mutate_state() {
        let state = Fen::parse("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
        let before = state.clone();
        let mut engine = AiEngine::from_strategy(Strategy::Strong);
        engine.select_move(Color::White, &state).unwrap();
        assert_eq!(state, before);
        assert_eq!(
            engine.positions_evaluated(),
            state.legal_moves_for_side(Color::White).len() as u64
        );
    }

    #[test]
    fn test_club_level_picks_legal_move() {
        let state = GameState::new_game();
        let legal = state.legal_moves_for_side(Color::White);
        for _ in 0..20 {
            let mv = select_move(Strategy::ClubLevel, Color::White, &state).unwrap();
            assert!(legal.contains(&(mv.from, mv.to)));
            assert_eq!(mv.promotion, None);
        }
    }

    #[test]
    fn test_seeded_club_level_is_reproducible() {
        let state = GameState::new_game();
        let config = AiConfig::from_strategy(Strategy::ClubLevel).with_seed(7);
        let mut a = AiEngine::new(config.clone());
        let mut b = AiEngine::new(config);

        for _ in 0..10 {
            assert_eq!(
                a.select_move(Color::White, &state).unwrap(),
                b.select_move(Color::White, &state).unwrap()
            );
        }
    }

    #[test]
    fn test_no_legal_moves() {
        let state = fools_mate();
        for strategy in [Strategy::ClubLevel, Strategy::Strong] {
            assert_eq!(
                select_move(strategy, Color::White, &state),
                Err(AiError::NoLegalMoves { color: Color::White })
            );
        }
    }

    #[test]
    fn test_not_your_turn() {
        let state = GameState::new_game();
        assert_eq!(
            select_move(Strategy::Strong, Color::Black, &state),
            Err(AiError::NotYourTurn { color: Color::Black })
        );
    }

    #[test]
    fn test_promotion_for() {
        let state = Fen::parse("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(promotion_for(&state, sq("a7"), sq("a8")), Some(PieceType::Queen));
        assert_eq!(promotion_for(&state, sq("e1"), sq("e2")), None);
        assert_eq!(promotion_for(&state, sq("d4"), sq("d5")), None);
    }

    #[test]
    fn test_self_play_until_end() {
        // 两种策略对弈，每一步都必须能被规则引擎接受
        let mut state = GameState::new_game();
        let mut white = AiEngine::new(AiConfig::from_strategy(Strategy::Strong));
        let mut black = AiEngine::new(AiConfig::from_strategy(Strategy::ClubLevel).with_seed(42));

        for _ in 0..80 {
            let color = state.side_to_move();
            let engine = match color {
                Color::White => &mut white,
                Color::Black => &mut black,
            };
            let mv = engine.select_move(color, &state).unwrap();
            let outcome = state.apply_move(mv.from, mv.to, mv.promotion).unwrap();
            if outcome.status.is_over() {
                break;
            }
        }
    }

    #[test]
    fn test_config_default() {
        let config = AiConfig::default();
        assert_eq!(config.strategy, Strategy::Strong);
        assert_eq!(config.seed, None);
        assert_eq!(AiConfig::from_strategy(Strategy::ClubLevel).with_seed(3).seed, Some(3));
    }
}
