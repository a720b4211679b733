/// CAS（Compare-And-Swap）操作最大重试次数
pub const MAX_CAS_RETRIES: u32 = 20;

/// EMA 平滑因子：新结果权重 0.3，历史权重 0.7
pub const EMA_ALPHA: f64 = 0.3;

/// Leitner 盒下界
pub const LEITNER_BOX_MIN: u8 = 1;

/// Leitner 盒上界（已掌握）
pub const LEITNER_BOX_MAX: u8 = 4;

/// 每次答对获得的经验值
pub const XP_PER_CORRECT: i64 = 10;

/// 列表接口默认分页大小
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// 列表接口最大分页大小
pub const MAX_PAGE_SIZE: u64 = 100;

/// 到期复习列表默认返回数量
pub const DEFAULT_DUE_LIMIT: usize = 20;

/// 到期复习列表最大返回数量
pub const MAX_DUE_LIMIT: usize = 100;

/// 标识符（学生/章节/概念/题目 ID）最大长度
pub const MAX_ID_LENGTH: usize = 64;
