use rand::Rng;

/// Rows seeded per trial; the read population.
pub const SEED_COUNT: u64 = 100_000;

/// Length of every random row payload.
pub const PAYLOAD_LEN: usize = 30;

/// Fixed-length string of independently drawn uppercase ASCII letters.
pub fn random_payload<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String { (0..len).map(|_| rng.gen_range(b'A'..=b'Z') as char).collect() }

/// Uniform identity in `[0, seed_count)`.
pub fn random_id<R: Rng + ?Sized>(rng: &mut R, seed_count: u64) -> i64 { rng.gen_range(0..seed_count.max(1)) as i64 }
