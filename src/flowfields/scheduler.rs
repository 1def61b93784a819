//! Debouncing of flow field recalculation.
//!
//! A recalculation rescans the whole grid so it should not run every time a
//! wall takes a hit. Requests are level-triggered: the first request of a
//! window marks the scheduler as pending and any further requests fold into
//! it. Once the cooldown has elapsed since that first request a single
//! recalculation is released by [RecalculationScheduler::poll].
//!

use std::time::Duration;

use bevy::prelude::*;

/// Coalesces recalculation requests into at most one per cooldown window
#[derive(Resource, Clone, Debug)]
pub struct RecalculationScheduler {
	/// Minimum time between the first request of a window and servicing it
	cooldown: Duration,
	/// Whether a recalculation is waiting to be serviced
	pending: bool,
	/// Time of the first request of the current window
	requested_at: Duration,
	/// Time the last recalculation was released
	last_recalculation: Option<Duration>,
	/// Number of requests folded into the pending one
	coalesced: u32,
	/// Release the pending recalculation without waiting out the cooldown
	forced: bool,
}

impl RecalculationScheduler {
	/// Create a new instance of [RecalculationScheduler]
	pub fn new(cooldown: Duration) -> Self {
		RecalculationScheduler {
			cooldown,
			pending: false,
			requested_at: Duration::ZERO,
			last_recalculation: None,
			coalesced: 0,
			forced: false,
		}
	}
	/// Get the minimum time between a request and the recalculation
	pub fn get_cooldown(&self) -> Duration {
		self.cooldown
	}
	/// Set the minimum time between a request and the recalculation
	pub fn set_cooldown(&mut self, cooldown: Duration) {
		self.cooldown = cooldown;
	}
	/// Whether a recalculation is waiting to run
	pub fn is_pending(&self) -> bool {
		self.pending
	}
	/// Get the elapsed time of the last recalculation
	pub fn get_last_recalculation(&self) -> Option<Duration> {
		self.last_recalculation
	}
	/// Ask for a recalculation at time `now`
	pub fn request(&mut self, now: Duration) {
		if self.pending {
			self.coalesced += 1;
		} else {
			self.pending = true;
			self.requested_at = now;
			self.coalesced = 1;
		}
	}
	/// Ask for a recalculation to be released by the next poll regardless of
	/// the cooldown
	pub fn force(&mut self, now: Duration) {
		self.request(now);
		self.forced = true;
	}
	/// Whether a recalculation should run at time `now`. Returns `true` once
	/// per window, after which the scheduler is idle until the next request
	pub fn poll(&mut self, now: Duration) -> bool {
		if !self.pending
			|| (!self.forced && now.saturating_sub(self.requested_at) < self.cooldown)
		{
			return false;
		}
		trace!(
			"Releasing recalculation, {} requests coalesced",
			self.coalesced
		);
		self.pending = false;
		self.forced = false;
		self.coalesced = 0;
		self.last_recalculation = Some(now);
		true
	}
}

impl Default for RecalculationScheduler {
	fn default() -> Self {
		RecalculationScheduler::new(Duration::from_millis(100))
	}
}
