use honggfuzz::fuzz;
use ntt_messages::trimmed_amount::TrimmedAmount;

fn main() {
    loop {
        fuzz!(|input: (u64, u8, u8)| {
            let (amount, from_decimals, to_decimals) = input;

            if let Ok((trimmed, dedusted)) =
                TrimmedAmount::remove_dust(amount, from_decimals, to_decimals)
            {
                assert!(dedusted <= amount);
                assert!(trimmed.decimals() <= 8);
                if let Ok(again) = TrimmedAmount::trim_to(dedusted.into(), from_decimals, to_decimals) {
                    assert_eq!(again, trimmed);
                }
            }
        });
    }
}
