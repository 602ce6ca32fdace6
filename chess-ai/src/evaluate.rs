//! 棋局评估函数
//!
//! 只计算子力：兵 1、马 3、象 3、车 5、后 9、王 0。

use chess_rules::{Board, Color};

/// 评估器
pub struct Evaluator;

impl Evaluator {
    /// 指定阵营视角的子力差（己方总分 - 对方总分）
    pub fn material(board: &Board, color: Color) -> i32 {
        board
            .all_pieces()
            .into_iter()
            .map(|(_, piece)| {
                if piece.color == color {
                    piece.value()
                } else {
                    -piece.value()
                }
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_rules::Fen;

    #[test]
    fn test_initial_material() {
        let board = Board::initial();
        assert_eq!(Evaluator::material(&board, Color::White), 0);
        assert_eq!(Evaluator::material(&board, Color::Black), 0);
    }

    #[test]
    fn test_material_advantage() {
        // 白方少一个后
        let state = Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1").unwrap();
        assert_eq!(Evaluator::material(state.board(), Color::White), -9);
        assert_eq!(Evaluator::material(state.board(), Color::Black), 9);
    }

    #[test]
    fn test_kings_count_zero() {
        let state = Fen::parse("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(Evaluator::material(state.board(), Color::White), 0);
    }

    #[test]
    fn test_mixed_material() {
        // 白：车 + 兵 = 6；黑：马 + 象 = 6
        let state = Fen::parse("2b1k1n1/8/8/8/8/8/P7/R3K3 w - - 0 1").unwrap();
        assert_eq!(Evaluator::material(state.board(), Color::White), 0);
    }
}
