//! 里程计
//! 为跟踪模块提供位姿和协方差

mod ground_truth;
pub use ground_truth::GroundTruthOdometry;

/// 里程计的trait
pub trait OdometryTrait {
    /// 按时间戳查询 4x4 齐次变换
    fn get_transformation(&mut self, timestamp: u64) -> nalgebra::Matrix4<f32>;
    /// 6x6 协方差，前三维平移，后三维旋转
    fn get_covariance(&self) -> nalgebra::Matrix6<f64>;
}
