//! Pool controller — the reconciliation loop.
//!
//! Each tick fetches a fresh snapshot, plans against the current desired
//! size and executes the plan. Nothing is carried between ticks except
//! the desired size, so a failed or partial tick is simply corrected by
//! the next one.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info};

use fleet_core::{Clock, SystemClock};
use fleet_planner::ResizePlanner;

use crate::config::PoolConfig;
use crate::driver::CloudPoolDriver;
use crate::executor::{ExecutionReport, execute};

/// Size of the pool as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolSizeSummary {
    /// Unix timestamp (seconds) when the summary was taken.
    pub timestamp: u64,
    pub desired: Option<u32>,
    /// Machines holding resources, whatever their membership.
    pub allocated: usize,
    /// Machines counted towards the desired size.
    pub active: usize,
}

/// Keeps one machine pool at its desired size.
pub struct PoolController {
    config: PoolConfig,
    driver: Arc<dyn CloudPoolDriver>,
    clock: Arc<dyn Clock>,
    desired_size: Option<u32>,
    /// Clock time of the last tick that reached planning, including no-op ticks.
    last_reconcile: Option<u64>,
}

impl PoolController {
    pub fn new(config: PoolConfig, driver: Arc<dyn CloudPoolDriver>) -> Self {
        let desired_size = config.desired_size;
        Self {
            config,
            driver,
            clock: Arc::new(SystemClock),
            desired_size,
            last_reconcile: None,
        }
    }

    /// Replace the wall clock, e.g. with a `FrozenClock` in tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn desired_size(&self) -> Option<u32> {
        self.desired_size
    }

    /// Takes effect on the next tick.
    pub fn set_desired_size(&mut self, desired: u32) {
        info!(pool = %self.config.name, desired, "desired size set");
        self.desired_size = Some(desired);
    }

    pub fn last_reconcile(&self) -> Option<u64> {
        self.last_reconcile
    }

    /// Run one reconciliation tick.
    ///
    /// Returns `None` when no desired size has been set yet.
    pub async fn reconcile(&mut self) -> anyhow::Result<Option<ExecutionReport>> {
        let Some(desired) = self.desired_size else {
            debug!(pool = %self.config.name, "no desired size set, skipping");
            return Ok(None);
        };

        let pool = self.driver.list_machines().await?;
        let now = self.clock.now_secs();
        let planner = ResizePlanner::new(&pool, self.config.victim_policy);
        let plan = planner.calculate_resize_plan(i64::from(desired))?;
        self.last_reconcile = Some(now);

        debug!(
            pool = %self.config.name,
            snapshot_age_secs = now.saturating_sub(pool.timestamp()),
            machines = pool.len(),
            active = planner.active_size(),
            desired,
            "reconciling"
        );

        if !plan.has_scale_out_actions() && !plan.has_scale_in_actions() {
            return Ok(Some(ExecutionReport::default()));
        }

        info!(
            pool = %self.config.name,
            to_request = plan.to_request(),
            to_terminate = ?plan.terminate_ids(),
            "executing resize plan"
        );
        let report = execute(&plan, self.driver.as_ref()).await;
        Ok(Some(report))
    }

    /// Current pool size according to a fresh snapshot.
    pub async fn pool_size(&self) -> anyhow::Result<PoolSizeSummary> {
        let pool = self.driver.list_machines().await?;
        Ok(PoolSizeSummary {
            timestamp: self.clock.now_secs(),
            desired: self.desired_size,
            allocated: pool.allocated_size(),
            active: pool.active_size(),
        })
    }

    /// Run the reconciliation loop until `shutdown` fires.
    ///
    /// A failed tick is logged and the loop carries on; the next tick
    /// starts again from a fresh snapshot.
    pub async fn run(
        &mut self,
        interval: Duration,
        mut shutdown: tokio::sync::watch::Receiver<bool>,
    ) {
        info!(
            pool = %self.config.name,
            interval_secs = interval.as_secs(),
            policy = %self.config.victim_policy,
            "pool controller started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    if let Err(e) = self.reconcile().await {
                        error!(pool = %self.config.name, error = %e, "reconciliation failed");
                    }
                }
                _ = shutdown.changed() => {
                    info!(pool = %self.config.name, "pool controller shutting down");
                    break;
                }
            }
        }
    }
}
