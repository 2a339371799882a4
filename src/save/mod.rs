//! 轨迹导出
mod trajectory;
pub use trajectory::{PoseSave, TrajectorySave};
