//! 走法生成和验证

use crate::board::{Board, CastleSide, GameState};
use crate::constants::{
    DIAGONAL_DIRECTIONS, KINGSIDE_KING_TARGET_COL, KINGSIDE_ROOK_TARGET_COL, KING_OFFSETS,
    KING_START_COL, KNIGHT_OFFSETS, ORTHOGONAL_DIRECTIONS, QUEENSIDE_KING_TARGET_COL,
    QUEENSIDE_ROOK_TARGET_COL,
};
use crate::piece::{Color, Piece, PieceType, Square};
use crate::record::{MoveRecord, SpecialMove};

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成棋子的原始走法目标（不考虑己方王是否被将军）
    ///
    /// 遵守阻挡和棋盘边界；兵的斜线只能吃子或吃过路兵。
    /// 王车易位不在这里生成。
    pub fn candidate_targets(
        board: &Board,
        origin: Square,
        piece: Piece,
        en_passant: Option<Square>,
    ) -> Vec<Square> {
        let mut targets = Vec::with_capacity(28);
        let color = piece.color;

        match piece.piece_type {
            PieceType::Pawn => Self::pawn_targets(board, origin, color, en_passant, &mut targets),
            PieceType::Knight => {
                Self::step_targets(board, origin, color, &KNIGHT_OFFSETS, false, &mut targets)
            }
            PieceType::Bishop => {
                Self::slide_targets(board, origin, color, &DIAGONAL_DIRECTIONS, false, &mut targets)
            }
            PieceType::Rook => {
                Self::slide_targets(board, origin, color, &ORTHOGONAL_DIRECTIONS, false, &mut targets)
            }
            PieceType::Queen => {
                Self::slide_targets(board, origin, color, &ORTHOGONAL_DIRECTIONS, false, &mut targets);
                Self::slide_targets(board, origin, color, &DIAGONAL_DIRECTIONS, false, &mut targets);
            }
            PieceType::King => {
                Self::step_targets(board, origin, color, &KING_OFFSETS, false, &mut targets)
            }
        }

        targets
    }

    /// 生成棋子攻击的格子
    ///
    /// 与原始走法的区别：兵只攻击两个前斜格（无论是否有子），
    /// 不包括直进；滑行和跳跃包括己方棋子占据的格子。
    fn attack_targets(board: &Board, origin: Square, piece: Piece, targets: &mut Vec<Square>) {
        let color = piece.color;

        match piece.piece_type {
            PieceType::Pawn => {
                for dc in [-1, 1] {
                    if let Some(to) = origin.offset(color.pawn_direction(), dc) {
                        targets.push(to);
                    }
                }
            }
            PieceType::Knight => Self::step_targets(board, origin, color, &KNIGHT_OFFSETS, true, targets),
            PieceType::Bishop => {
                Self::slide_targets(board, origin, color, &DIAGONAL_DIRECTIONS, true, targets)
            }
            PieceType::Rook => {
                Self::slide_targets(board, origin, color, &ORTHOGONAL_DIRECTIONS, true, targets)
            }
            PieceType::Queen => {
                Self::slide_targets(board, origin, color, &ORTHOGONAL_DIRECTIONS, true, targets);
                Self::slide_targets(board, origin, color, &DIAGONAL_DIRECTIONS, true, targets);
            }
            PieceType::King => Self::step_targets(board, origin, color, &KING_OFFSETS, true, targets),
        }
    }

    /// 兵的走法
    fn pawn_targets(
        board: &Board,
        origin: Square,
        color: Color,
        en_passant: Option<Square>,
        targets: &mut Vec<Square>,
    ) {
        let forward = color.pawn_direction();

        // 前进一格；在初始行且两格都空时可前进两格
        if let Some(one) = origin.offset(forward, 0) {
            if board.is_empty(one) {
                targets.push(one);

                if origin.row() == color.pawn_start_row() {
                    if let Some(two) = one.offset(forward, 0) {
                        if board.is_empty(two) {
                            targets.push(two);
                        }
                    }
                }
            }
        }

        // 斜线吃子
        for dc in [-1, 1] {
            let Some(to) = origin.offset(forward, dc) else {
                continue;
            };
            match board.get(to) {
                Some(target) if target.color != color => targets.push(to),
                Some(_) => {}
                None if Some(to) == en_passant => {
                    // 被越过的兵与起点同行、与目标同列
                    let bypassed = Square::new_unchecked(origin.row(), to.col());
                    if board
                        .get(bypassed)
                        .is_some_and(|p| p.is(PieceType::Pawn, color.opponent()))
                    {
                        targets.push(to);
                    }
                }
                None => {}
            }
        }
    }

    /// 马和王的固定偏移走法
    fn step_targets(
        board: &Board,
        origin: Square,
        color: Color,
        offsets: &[(i8, i8)],
        include_friendly: bool,
        targets: &mut Vec<Square>,
    ) {
        for &(dr, dc) in offsets {
            if let Some(to) = origin.offset(dr, dc) {
                match board.get(to) {
                    Some(target) if target.color == color && !include_friendly => {}
                    _ => targets.push(to),
                }
            }
        }
    }

    /// 象、车、后的滑行走法
    fn slide_targets(
        board: &Board,
        origin: Square,
        color: Color,
        directions: &[(i8, i8)],
        include_friendly: bool,
        targets: &mut Vec<Square>,
    ) {
        for &(dr, dc) in directions {
            let mut current = origin;
            while let Some(to) = current.offset(dr, dc) {
                if let Some(target) = board.get(to) {
                    // 遇到棋子：敌方可以吃，滑行到此为止
                    if target.color != color || include_friendly {
                        targets.push(to);
                    }
                    break;
                }
                targets.push(to);
                current = to;
            }
        }
    }

    /// 指定阵营攻击的所有格子（已排序、去重）
    pub fn attacked_squares(color: Color, board: &Board) -> Vec<Square> {
        let mut squares = Vec::with_capacity(64);
        for (pos, piece) in board.pieces(color) {
            Self::attack_targets(board, pos, piece, &mut squares);
        }
        squares.sort_unstable();
        squares.dedup();
        squares
    }

    /// 检查格子是否被指定阵营攻击
    pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
        let mut targets = Vec::with_capacity(28);
        board.pieces(by).into_iter().any(|(pos, piece)| {
            targets.clear();
            Self::attack_targets(board, pos, piece, &mut targets);
            targets.contains(&sq)
        })
    }

    /// 检查指定阵营是否被将军
    pub fn is_in_check(color: Color, board: &Board) -> bool {
        match board.find_king(color) {
            Some(king) => Self::is_square_attacked(board, king, color.opponent()),
            // 没有王是非法局面，视为被将军
            None => true,
        }
    }

    /// 指定格子上棋子的合法目标
    ///
    /// 只有走子方的棋子有合法走法。每个候选目标都在棋盘副本上模拟，
    /// 过滤掉会让己方王被将军的走法；活动局面不会被修改。
    pub fn legal_moves_for(state: &GameState, square: Square) -> Vec<Square> {
        let Some(piece) = state.board.get(square) else {
            return Vec::new();
        };
        if piece.color != state.side_to_move {
            return Vec::new();
        }

        let mut targets: Vec<Square> =
            Self::candidate_targets(&state.board, square, piece, state.en_passant)
                .into_iter()
                .filter(|&to| Self::is_king_safe_after(state, square, to))
                .collect();

        if piece.piece_type == PieceType::King {
            targets.extend(
                Self::castling_targets(state, square, piece)
                    .into_iter()
                    .filter(|&to| Self::is_king_safe_after(state, square, to)),
            );
        }

        targets
    }

    /// 指定阵营的所有合法走法 (起点, 终点)
    pub fn legal_moves_for_side(state: &GameState, color: Color) -> Vec<(Square, Square)> {
        if color != state.side_to_move {
            return Vec::new();
        }

        let mut moves = Vec::with_capacity(64);
        for (from, _) in state.board.pieces(color) {
            for to in Self::legal_moves_for(state, from) {
                moves.push((from, to));
            }
        }
        moves
    }

    /// 王车易位的目标格
    ///
    /// 要求：王在初始格且未移动、未被将军；对应权利有效；
    /// 车在角落且未移动；王车之间的格子全空；
    /// 王经过的格子（起点、途经、终点）都不被对方攻击。
    fn castling_targets(state: &GameState, king_sq: Square, king: Piece) -> Vec<Square> {
        let mut targets = Vec::new();
        let board = &state.board;
        let color = king.color;
        let row = color.back_row();

        if king.has_moved || king_sq != Square::new_unchecked(row, KING_START_COL) {
            return targets;
        }

        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            if !state.castling.get(color, side) {
                continue;
            }

            let rook_sq = Square::new_unchecked(row, side.rook_col());
            match board.get(rook_sq) {
                Some(rook) if rook.is(PieceType::Rook, color) && !rook.has_moved => {}
                _ => continue,
            }

            let (lo, hi) = if side.rook_col() < KING_START_COL {
                (side.rook_col(), KING_START_COL)
            } else {
                (KING_START_COL, side.rook_col())
            };
            let blocked = (lo + 1..hi).any(|col| !board.is_empty(Square::new_unchecked(row, col)));
            if blocked {
                continue;
            }

            let target_col = Self::castle_king_target_col(side);
            let path_attacked = Self::cols_between_inclusive(KING_START_COL, target_col)
                .any(|col| {
                    Self::is_square_attacked(board, Square::new_unchecked(row, col), color.opponent())
                });
            if path_attacked {
                continue;
            }

            targets.push(Square::new_unchecked(row, target_col));
        }

        targets
    }

    fn castle_king_target_col(side: CastleSide) -> u8 {
        match side {
            CastleSide::Kingside => KINGSIDE_KING_TARGET_COL,
            CastleSide::Queenside => QUEENSIDE_KING_TARGET_COL,
        }
    }

    fn castle_rook_target_col(side: CastleSide) -> u8 {
        match side {
            CastleSide::Kingside => KINGSIDE_ROOK_TARGET_COL,
            CastleSide::Queenside => QUEENSIDE_ROOK_TARGET_COL,
        }
    }

    fn cols_between_inclusive(a: u8, b: u8) -> impl Iterator<Item = u8> {
        a.min(b)..=a.max(b)
    }

    /// 在棋盘副本上模拟走法后，走子方的王是否安全
    fn is_king_safe_after(state: &GameState, from: Square, to: Square) -> bool {
        let mut scratch = state.board.clone();
        match Self::execute(&mut scratch, from, to, state.en_passant, PieceType::Queen) {
            Some(record) => !Self::is_in_check(record.piece.color, &scratch),
            None => false,
        }
    }

    /// 在棋盘上执行走法（不检查规则）
    ///
    /// 依次处理：吃过路兵移除被越过的兵、王车易位移动车、
    /// 移动棋子、兵到底线就地升变。易位权利、过路兵目标、
    /// 日志等对局状态由调用方更新。起点无子时返回 None。
    pub(crate) fn execute(
        board: &mut Board,
        from: Square,
        to: Square,
        en_passant: Option<Square>,
        promotion: PieceType,
    ) -> Option<MoveRecord> {
        let piece = board.get(from)?;
        let mut captured = None;
        let mut special = SpecialMove::Normal;

        if piece.piece_type == PieceType::Pawn
            && Some(to) == en_passant
            && from.col() != to.col()
            && board.is_empty(to)
        {
            let bypassed = Square::new_unchecked(from.row(), to.col());
            captured = board.get(bypassed);
            board.set(bypassed, None);
            special = SpecialMove::EnPassant;
        }

        if piece.piece_type == PieceType::King && from.col().abs_diff(to.col()) == 2 {
            let side = if to.col() > from.col() {
                CastleSide::Kingside
            } else {
                CastleSide::Queenside
            };
            let rook_from = Square::new_unchecked(from.row(), side.rook_col());
            let rook_to = Square::new_unchecked(from.row(), Self::castle_rook_target_col(side));
            board.move_piece(rook_from, rook_to);
            special = match side {
                CastleSide::Kingside => SpecialMove::CastleKingside,
                CastleSide::Queenside => SpecialMove::CastleQueenside,
            };
        }

        if let Some(taken) = board.move_piece(from, to) {
            captured = Some(taken);
        }

        if piece.piece_type == PieceType::Pawn && to.row() == piece.color.promotion_row() {
            board.set(
                to,
                Some(Piece {
                    piece_type: promotion,
                    color: piece.color,
                    has_moved: true,
                }),
            );
            special = SpecialMove::Promotion(promotion);
        }

        Some(MoveRecord {
            from,
            to,
            piece,
            captured,
            special,
        })
    }
}
