use crate::clock::UnixTimestamp;

/// A token-bucket limiter over native token amounts.
///
/// The state is pure data: every operation takes `now` explicitly, so the
/// same state can be driven by wall time or by a test clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitState {
    /// The maximum capacity of the rate limiter.
    limit: u64,
    /// The capacity of the rate limiter at `last_tx_timestamp`.
    /// The actual current capacity is calculated in `capacity_at`, by
    /// accounting for the time that has passed since `last_tx_timestamp` and
    /// the refill rate.
    capacity_at_last_tx: u64,
    /// The timestamp of the last transaction that counted towards the current
    /// capacity. Transactions that exceeded the capacity do not count, they are
    /// just delayed.
    last_tx_timestamp: UnixTimestamp,
    /// Time for an empty limiter to refill completely. Also the delay given to
    /// transfers that do not fit.
    duration: UnixTimestamp,
}

/// The result of attempting to consume from a rate limiter.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RateLimitResult {
    /// If the rate limit is not exceeded, the transfer is immediate,
    /// and the capacity is reduced.
    Consumed(UnixTimestamp),
    /// If the rate limit is exceeded, the transfer is delayed until the
    /// given timestamp.
    Delayed(UnixTimestamp),
}

impl RateLimitState {
    pub const DEFAULT_DURATION: UnixTimestamp = 60 * 60 * 24; // 24 hours

    pub fn new(limit: u64, now: UnixTimestamp, duration: UnixTimestamp) -> Self {
        Self {
            limit,
            capacity_at_last_tx: limit,
            last_tx_timestamp: now,
            duration,
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn duration(&self) -> UnixTimestamp {
        self.duration
    }

    /// Returns the capacity of the rate limiter at `now`.
    ///
    /// A clock that moved backwards counts as no time passed. A non-positive
    /// duration refills instantly.
    pub fn capacity_at(&self, now: UnixTimestamp) -> u64 {
        if self.duration <= 0 {
            return self.limit;
        }

        let limit = u128::from(self.limit);

        // morally this is
        // capacity = old_capacity + (limit / rate_limit_duration) * time_passed
        //
        // but we instead write it as
        // capacity = old_capacity + (limit * time_passed) / rate_limit_duration
        // as it has better numerical stability.
        //
        // This can overflow u64 (if limit is close to u64 max), so we use u128
        // for the intermediate calculations.
        let time_passed = u128::try_from(now.saturating_sub(self.last_tx_timestamp)).unwrap_or(0);
        let duration = u128::try_from(self.duration).unwrap_or(u128::MAX);

        let calculated_capacity = u128::from(self.capacity_at_last_tx)
            .saturating_add(time_passed.saturating_mul(limit) / duration);

        // bounded by `limit`, which came from a u64
        u64::try_from(calculated_capacity.min(limit)).unwrap_or(self.limit)
    }

    /// Computes the timestamp at which the given amount can be consumed.
    /// If it fits within the current capacity, the current timestamp is
    /// returned, and the remaining capacity is reduced.
    /// Otherwise, the timestamp at which the capacity will be available is
    /// returned, and the state is left untouched.
    pub fn consume_or_delay(&mut self, amount: u64, now: UnixTimestamp) -> RateLimitResult {
        let capacity = self.capacity_at(now);
        if capacity >= amount {
            self.capacity_at_last_tx = capacity - amount;
            self.last_tx_timestamp = now;
            RateLimitResult::Consumed(now)
        } else {
            RateLimitResult::Delayed(now.saturating_add(self.duration.max(0)))
        }
    }

    /// Refills the capacity by the given amount.
    /// This is used to replenish the capacity via backflows.
    pub fn refill(&mut self, amount: u64, now: UnixTimestamp) {
        self.capacity_at_last_tx = self
            .capacity_at(now)
            .saturating_add(amount)
            .min(self.limit);
        self.last_tx_timestamp = now;
    }

    /// Changes the limit, shifting the current capacity by the difference.
    pub fn set_limit(&mut self, limit: u64, now: UnixTimestamp) {
        let old_limit = self.limit;
        let current_capacity = self.capacity_at(now);

        self.limit = limit;

        let new_capacity = if old_limit > limit {
            // decrease in limit
            current_capacity.saturating_sub(old_limit - limit)
        } else {
            // increase in limit
            current_capacity.saturating_add(limit - old_limit)
        };

        self.capacity_at_last_tx = new_capacity.min(limit);
        self.last_tx_timestamp = now;
    }
}
