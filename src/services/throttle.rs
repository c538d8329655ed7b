//! 请求限流 - 业务能力层
//!
//! 上游限制每个 IP 每 5 秒只能请求一次。
//! `RateThrottle` 持有"上次请求时间"，同一时刻只允许一个调用方读写并等待

use crate::constants::RATE_LIMIT;
use crate::error::ApiError;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// 请求限流器
#[derive(Debug)]
pub struct RateThrottle {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 等待直到距离上次请求已满最小间隔
    ///
    /// 持锁期间完成测量、等待和更新，放锁前把上次请求时间记为当前时刻，
    /// 排队中的下一个调用方从这一刻开始计算
    ///
    /// # 返回
    /// 排队或等待期间被取消时返回 [`ApiError::ThrottleCancelled`]
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), ApiError> {
        let mut last_request = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("限流排队已取消");
                return Err(ApiError::ThrottleCancelled);
            }
            guard = self.last_request.lock() => guard,
        };

        if let Some(previous) = *last_request {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                let delay = self.interval - elapsed;
                debug!("限流生效，等待 {}ms 后再发起请求", delay.as_millis());
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        warn!("限流等待已取消");
                        return Err(ApiError::ThrottleCancelled);
                    }
                    _ = sleep(delay) => {}
                }
            }
        }

        *last_request = Some(Instant::now());
        Ok(())
    }
}

impl Default for RateThrottle {
    fn default() -> Self {
        Self::new(RATE_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_first_acquire_does_not_wait() {
        let throttle = RateThrottle::default();
        let start = Instant::now();
        throttle.acquire(&CancellationToken::new()).await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_acquire_waits_remaining_interval() {
        let throttle = RateThrottle::default();
        let cancel = CancellationToken::new();

        throttle.acquire(&cancel).await.unwrap();
        sleep(Duration::from_secs(2)).await;

        let start = Instant::now();
        throttle.acquire(&cancel).await.unwrap();
        let waited = start.elapsed();
        assert!(waited >= Duration::from_secs(3), "waited {:?}", waited);
        assert!(waited < Duration::from_secs(4), "waited {:?}", waited);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_callers_are_spaced_by_interval() {
        let throttle = Arc::new(RateThrottle::default());
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..3 {
            let throttle = Arc::clone(&throttle);
            handles.push(tokio::spawn(async move {
                throttle.acquire(&CancellationToken::new()).await.unwrap();
                Instant::now()
            }));
        }

        let mut finished = Vec::new();
        for handle in handles {
            finished.push(handle.await.unwrap() - start);
        }
        finished.sort();

        assert_eq!(finished[0], Duration::ZERO);
        assert!(finished[1] >= Duration::from_secs(5));
        assert!(finished[2] >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_wait() {
        let throttle = Arc::new(RateThrottle::default());
        throttle.acquire(&CancellationToken::new()).await.unwrap();

        let cancel = CancellationToken::new();
        let waiter = {
            let throttle = Arc::clone(&throttle);
            let cancel = cancel.clone();
            tokio::spawn(async move { throttle.acquire(&cancel).await })
        };

        sleep(Duration::from_secs(1)).await;
        cancel.cancel();

        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(ApiError::ThrottleCancelled)));
    }
}
