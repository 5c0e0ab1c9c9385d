use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use std::future::Future;

/// 一次批量执行的汇总，恒有 succeeded + failed == total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// 单个目标的执行结果，按输入顺序记录
#[derive(Debug)]
pub struct BatchOutcome<T, O, E> {
    pub target: T,
    pub result: Result<O, E>,
}

#[derive(Debug)]
pub struct BatchReport<T, O, E> {
    pub summary: BatchSummary,
    pub outcomes: Vec<BatchOutcome<T, O, E>>,
}

impl<T, O, E> BatchReport<T, O, E> {
    /// 失败明细（目标 + 错误），用于诊断留存
    pub fn failures(&self) -> impl Iterator<Item = (&T, &E)> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err().map(|e| (&o.target, e)))
    }
}

/// 对每个目标执行一次 work，单个目标失败只记入该目标的结果，
/// 不中断其余目标。不做重试，每个目标恰好调用一次。
///
/// concurrency 为并发上限（1 = 串行）；buffered 按提交顺序产出，
/// 因此结果顺序与输入顺序一致，与完成先后无关。
pub async fn run_batch<T, O, E, F, Fut>(targets: Vec<T>, concurrency: usize, work: F) -> BatchReport<T, O, E>
where
    T: Clone,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<O, E>>,
{
    let total = targets.len();
    let results: Vec<Result<O, E>> =
        stream::iter(targets.iter().cloned().map(|t| work(t))).buffered(concurrency.max(1)).collect().await;

    let mut summary = BatchSummary { total, succeeded: 0, failed: 0 };
    let outcomes = targets
        .into_iter()
        .zip(results)
        .map(|(target, result)| {
            match &result {
                Ok(_) => summary.succeeded += 1,
                Err(_) => summary.failed += 1,
            }
            BatchOutcome { target, result }
        })
        .collect();

    BatchReport { summary, outcomes }
}
