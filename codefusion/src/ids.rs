//! Random ticket tokens.

use codefusion_core::environment::IdGenerator;
use rand::Rng;

/// Four-digit random tokens, the number printed after `DEV-`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTicketIds;

impl IdGenerator for RandomTicketIds {
    fn next_id(&self) -> String {
        let n: u32 = rand::thread_rng().gen_range(0..10_000);
        format!("{n:04}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_four_digits() {
        let ids = RandomTicketIds;
        for _ in 0..100 {
            let id = ids.next_id();
            assert_eq!(id.len(), 4);
            assert!(id.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
