/// 右滑后等级达到此值即毕业，本次会话不再出现
pub const DEFAULT_GRADUATION_LEVEL: u32 = 2;

/// 左滑（忘记）的卡片重新插入到新队首之后的第几个位置
pub const DEFAULT_FORGOTTEN_REQUEUE_DEPTH: usize = 5;

/// 可见窗口大小（同时渲染的卡片数）
pub const DEFAULT_VISIBLE_WINDOW: usize = 3;

/// Default idle lifetime of a study session.
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 2 * 60 * 60;

/// Upper bound on concurrently held sessions.
pub const DEFAULT_MAX_ACTIVE_SESSIONS: usize = 10_000;

/// Longest access code accepted before lookup.
pub const MAX_ACCESS_CODE_LEN: usize = 128;

/// Longest text accepted for pronunciation.
pub const MAX_PRONOUNCE_TEXT_LEN: usize = 500;

/// Speaking rate handed to the client for local synthesis.
pub const LOCAL_SPEECH_RATE: f32 = 0.8;
