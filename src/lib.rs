//! 真值轨迹里程计
//!
//! 读取 `utime x y z qx qy qz qw` 格式的轨迹文件，按时间戳精确查询位姿。
//!
//! nalgebra
//! https://docs.rs/nalgebra/latest/nalgebra/
pub mod config;
pub mod global_cast;
pub mod global_types;
pub mod odometry;
pub mod save;
pub mod utility;

pub use odometry::{GroundTruthOdometry, OdometryTrait};
