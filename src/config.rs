/// 轨迹文件时间戳乘以该常数后作为查询键
pub const UTIME_SCALE: u64 = 1_000_000;

/// 每行字段数：utime x y z qx qy qz qw
pub const TRAJECTORY_FIELDS: usize = 8;

/// 平移方向方差
pub const TRANSLATION_VARIANCE: f64 = 0.1;
/// 旋转方向方差
pub const ROTATION_VARIANCE: f64 = 0.5;
