// ==========================================
// 多渠道对账台账系统 - 对账进度发布
// ==========================================
// 职责: 定义进度发布 trait，实现依赖倒置
// 说明: 引擎层定义 trait，展示层实现适配器；
//       核心不依赖任何渲染机制
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// SyncProgress - 对账运行进度
// ==========================================
// 生命周期: 仅存在于一次对账运行期间，结束即丢弃
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncProgress {
    /// 本次运行的候选订单总数
    pub total: usize,
    /// 已处理数（每处理一单步进一次）
    pub current: usize,
    /// 已开票并扣减库存
    pub added: usize,
    /// 无 SKU 匹配而跳过（预期内，非错误）
    pub skipped: usize,
    /// 写入失败（逐单隔离，不中止运行）
    pub errors: usize,
}

// ==========================================
// 进度发布 Trait
// ==========================================

/// 对账进度发布者 Trait
///
/// 引擎在每处理完一单后调用一次，调用方据此渲染实时状态。
/// 实现必须廉价且不可失败——进度只是通知，不承载一致性。
pub trait ProgressSink: Send + Sync {
    /// 发布一次进度快照
    fn report(&self, progress: &SyncProgress);
}

/// 空操作进度发布者
///
/// 用于不需要进度展示的场景（如单元测试、CLI 静默模式）
#[derive(Debug, Clone, Default)]
pub struct NoOpProgressSink;

impl ProgressSink for NoOpProgressSink {
    fn report(&self, progress: &SyncProgress) {
        tracing::trace!(
            current = progress.current,
            total = progress.total,
            "NoOpProgressSink: 跳过进度发布"
        );
    }
}

/// 通道进度发布者
///
/// 将进度快照发往 tokio 无界通道，接收端（展示层）自行消费。
/// 接收端已关闭时静默丢弃——进度丢失不影响运行正确性。
pub struct ChannelProgressSink {
    sender: tokio::sync::mpsc::UnboundedSender<SyncProgress>,
}

impl ChannelProgressSink {
    pub fn new() -> (Arc<Self>, tokio::sync::mpsc::UnboundedReceiver<SyncProgress>) {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        (Arc::new(Self { sender }), receiver)
    }
}

impl ProgressSink for ChannelProgressSink {
    fn report(&self, progress: &SyncProgress) {
        let _ = self.sender.send(*progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_sink() {
        let sink = NoOpProgressSink;
        sink.report(&SyncProgress::default());
    }

    #[tokio::test]
    async fn test_channel_sink_delivers_snapshots() {
        let (sink, mut receiver) = ChannelProgressSink::new();
        let progress = SyncProgress {
            total: 3,
            current: 1,
            added: 1,
            skipped: 0,
            errors: 0,
        };
        sink.report(&progress);
        assert_eq!(receiver.recv().await, Some(progress));
    }

    #[tokio::test]
    async fn test_channel_sink_closed_receiver_is_silent() {
        let (sink, receiver) = ChannelProgressSink::new();
        drop(receiver);
        // 不应 panic
        sink.report(&SyncProgress::default());
    }
}
