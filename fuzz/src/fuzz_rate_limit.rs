use honggfuzz::fuzz;
use ntt_protocol::queue::rate_limit::{RateLimitResult, RateLimitState};

fn main() {
    loop {
        fuzz!(|input: (u64, u64, u64, i64, i64)| {
            let (limit, new_limit, amount, elapsed, duration) = input;

            let mut rls = RateLimitState::new(limit, 0, duration);
            let before = rls.capacity_at(elapsed);
            match rls.consume_or_delay(amount, elapsed) {
                // a non-positive duration refills instantly
                RateLimitResult::Consumed(_) if duration > 0 => {
                    assert_eq!(rls.capacity_at(elapsed), before - amount)
                }
                RateLimitResult::Consumed(_) => {}
                RateLimitResult::Delayed(_) => assert_eq!(rls.capacity_at(elapsed), before),
            }

            rls.set_limit(new_limit, elapsed);
            assert!(rls.capacity_at(elapsed) <= new_limit);
            rls.refill(amount, elapsed);
            assert!(rls.capacity_at(elapsed) <= new_limit);
        });
    }
}
