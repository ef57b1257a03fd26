use crate::utils::process::ProcessTable;
use std::time::Duration;
use tracing::{debug, info, warn};

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Poll interval, grace period before escalating, and the point at which
/// waiting stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationPolicy {
    poll_interval: Duration,
    grace_period: Duration,
    timeout: Duration,
}

impl TerminationPolicy {
    /// The poll interval is raised to at least 10 ms and the timeout to at
    /// least one poll past the grace period, so escalation always happens
    /// before waiting stops.
    pub fn new(poll_interval: Duration, grace_period: Duration, timeout: Duration) -> Self {
        let poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        let timeout = timeout.max(grace_period + poll_interval);
        Self {
            poll_interval,
            grace_period,
            timeout,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for TerminationPolicy {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(250),
            Duration::from_secs(5),
            Duration::from_secs(10),
        )
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TerminationReport {
    /// Every pid that matched and was sent a graceful terminate.
    pub matched: Vec<u32>,
    /// Pids that needed a forceful terminate after the grace period.
    pub forced: Vec<u32>,
    /// Pids still alive when waiting stopped.
    pub stragglers: Vec<u32>,
}

/// Terminates every process matching one of `suffixes`.
///
/// Sends a graceful terminate to each match, polls until all have exited,
/// escalates once to a forceful terminate for those still alive after the
/// grace period, and stops waiting at the timeout. Never fails: processes that
/// survive are reported in `stragglers` and the caller proceeds anyway.
pub async fn terminate_matching<P: ProcessTable>(
    table: &mut P,
    suffixes: &[&str],
    policy: TerminationPolicy,
) -> TerminationReport {
    let mut pids: Vec<u32> = suffixes
        .iter()
        .flat_map(|suffix| table.find_by_suffix(suffix))
        .collect();
    pids.sort_unstable();
    pids.dedup();

    let mut report = TerminationReport {
        matched: pids.clone(),
        ..Default::default()
    };
    if pids.is_empty() {
        debug!("No prior processes to terminate");
        return report;
    }

    info!("Terminating {} prior processes", pids.len());
    for &pid in &pids {
        table.terminate(pid);
    }

    let mut alive = pids;
    let mut elapsed = Duration::ZERO;
    let mut escalated = false;

    loop {
        tokio::time::sleep(policy.poll_interval).await;
        elapsed += policy.poll_interval;

        alive.retain(|&pid| table.is_alive(pid));
        if alive.is_empty() {
            debug!("All prior processes exited after {elapsed:?}");
            break;
        }

        if !escalated && elapsed >= policy.grace_period {
            warn!("{} processes survived the grace period, killing", alive.len());
            for &pid in &alive {
                table.kill(pid);
            }
            report.forced = alive.clone();
            escalated = true;
        }

        if elapsed >= policy.timeout {
            warn!("Gave up waiting on {} processes", alive.len());
            report.stragglers = alive;
            break;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_clamps_zero_poll_interval() {
        let policy = TerminationPolicy::new(Duration::ZERO, Duration::from_secs(1), Duration::from_secs(2));
        assert_eq!(policy.poll_interval(), MIN_POLL_INTERVAL);
    }

    #[test]
    fn test_policy_timeout_outlasts_grace_period() {
        let policy = TerminationPolicy::new(
            Duration::from_millis(250),
            Duration::from_secs(5),
            Duration::from_secs(1),
        );
        assert_eq!(policy.timeout(), Duration::from_millis(5250));
    }
}
