//! 规则常量定义

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 8;

/// 格子总数
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 王的初始列（e 线）
pub const KING_START_COL: u8 = 4;

/// 王翼车的初始列（h 线）
pub const KINGSIDE_ROOK_COL: u8 = 7;

/// 后翼车的初始列（a 线）
pub const QUEENSIDE_ROOK_COL: u8 = 0;

/// 王车易位后王所在列：王翼 g 线，后翼 c 线
pub const KINGSIDE_KING_TARGET_COL: u8 = 6;
pub const QUEENSIDE_KING_TARGET_COL: u8 = 2;

/// 王车易位后车所在列：王翼 f 线，后翼 d 线
pub const KINGSIDE_ROOK_TARGET_COL: u8 = 5;
pub const QUEENSIDE_ROOK_TARGET_COL: u8 = 3;

/// 马的 8 个跳跃偏移 (行, 列)
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// 直线方向（车/后）
pub const ORTHOGONAL_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// 斜线方向（象/后）
pub const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// 王的 8 个方向
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
