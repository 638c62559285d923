use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "stats.ts")]
pub struct UserStats {
    pub total: u64,
    pub students: u64,
    pub faculty: u64,
    pub admins: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "stats.ts")]
pub struct SubmissionStats {
    pub total: u64,
    /// 尚未分配
    pub pending: u64,
    pub assigned: u64,
    pub approved: u64,
    pub resubmissions: u64,
}

// 管理员统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "stats.ts")]
pub struct AdminStats {
    pub users: UserStats,
    pub submissions: SubmissionStats,
}

// 教师统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "stats.ts")]
pub struct FacultyStats {
    /// 分配给本人的提交总数
    pub assigned: u64,
    /// 待评审
    pub pending: u64,
    pub approved: u64,
    pub resubmissions: u64,
    /// 本人已写评审数
    pub reviews: u64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "stats.ts")]
pub struct StatsResponse<T: TS> {
    pub stats: T,
}
