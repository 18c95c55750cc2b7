use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::msg::{MsgSender, SessionMsg};

/// Period between auto-save attempts unless configured otherwise.
pub const DEFAULT_AUTO_SAVE_PERIOD: Duration = Duration::from_millis(30_000);

/// `tokio::time::interval` rejects a zero period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A running timer task and the generation its ticks carry.
#[derive(Debug)]
struct Timer {
	generation: u64,
	cancel: CancellationToken,
}

/// Auto-save scheduler state.
///
/// At most one timer task exists at a time. Every start bumps the
/// generation; ticks from older generations are ignored by the session even
/// if they were already queued when the timer was cancelled.
#[derive(Debug)]
pub(crate) struct AutoSave {
	period: Duration,
	generation: u64,
	timer: Option<Timer>,
}

impl AutoSave {
	pub(crate) fn new(period: Duration) -> Self {
		Self {
			period: period.max(MIN_PERIOD),
			generation: 0,
			timer: None,
		}
	}

	pub(crate) fn is_enabled(&self) -> bool {
		self.timer.is_some()
	}

	pub(crate) fn period(&self) -> Duration {
		self.period
	}

	/// Starts the timer. Returns false if it was already running.
	///
	/// Must be called inside a Tokio runtime.
	pub(crate) fn enable(&mut self, tx: &MsgSender) -> bool {
		if self.timer.is_some() {
			return false;
		}

		self.generation += 1;
		let generation = self.generation;
		let cancel = CancellationToken::new();
		let period = self.period;
		// First deadline is one period after enabling, not after the task is first polled.
		let start = Instant::now() + period;

		let task_cancel = cancel.clone();
		let tx = tx.clone();
		tokio::spawn(async move {
			let mut ticker = tokio::time::interval_at(start, period);
			ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
			loop {
				tokio::select! {
					biased;
					_ = task_cancel.cancelled() => break,
					_ = ticker.tick() => {
						if tx.send(SessionMsg::AutoSaveTick { generation }).is_err() {
							break;
						}
					}
				}
			}
			tracing::trace!(generation, "autosave.timer.exit");
		});

		tracing::debug!(generation, period_ms = period.as_millis() as u64, "autosave.enable");
		self.timer = Some(Timer { generation, cancel });
		true
	}

	/// Stops the timer. Returns false if it was not running.
	pub(crate) fn disable(&mut self) -> bool {
		let Some(timer) = self.timer.take() else {
			return false;
		};
		timer.cancel.cancel();
		tracing::debug!(generation = timer.generation, "autosave.disable");
		true
	}

	/// Changes the period, restarting a running timer so it takes effect.
	pub(crate) fn set_period(&mut self, period: Duration, tx: &MsgSender) {
		let period = period.max(MIN_PERIOD);
		if period == self.period {
			return;
		}
		self.period = period;
		if self.disable() {
			self.enable(tx);
		}
	}

	/// Returns true when a tick of `generation` comes from the live timer.
	pub(crate) fn accepts(&self, generation: u64) -> bool {
		self.timer.as_ref().is_some_and(|t| t.generation == generation)
	}
}

impl Drop for AutoSave {
	fn drop(&mut self) {
		self.disable();
	}
}
