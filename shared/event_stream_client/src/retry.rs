use rand::Rng;
use std::{future::Future, time::Duration};

#[derive(Debug, Clone)]
pub struct BackoffConfig {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: u32,

    /// Fraction of the delay (0.0..=1.0) that may be randomly subtracted
    pub jitter: f64,
}

impl BackoffConfig {
    ///
    /// Same delay before every attempt, no jitter
    ///
    pub fn fixed(delay: Duration) -> Self {
        Self {
            initial_delay: delay,
            max_delay: delay,
            multiplier: 1,
            jitter: 0.0,
        }
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            multiplier: 2,
            jitter: 0.2,
        }
    }
}

///
/// Exponential backoff with a ceiling and jitter.
/// Must be reset after every successful attempt.
///
#[derive(Debug, Clone)]
pub struct Backoff {
    config: BackoffConfig,
    attempt: u32,
}

impl Backoff {
    pub fn new(config: BackoffConfig) -> Self {
        Self { config, attempt: 0 }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    ///
    /// Server provided reconnection time replaces initial delay
    ///
    pub fn set_initial_delay(&mut self, delay: Duration) {
        self.config.initial_delay = delay;
        if self.config.max_delay < delay {
            self.config.max_delay = delay;
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        let factor = self
            .config
            .multiplier
            .max(1)
            .saturating_pow(self.attempt.min(16));
        let delay = self
            .config
            .initial_delay
            .saturating_mul(factor)
            .min(self.config.max_delay);

        self.attempt = self.attempt.saturating_add(1);

        let jitter = self.config.jitter.clamp(0.0, 1.0);
        if jitter == 0.0 {
            return delay;
        }

        let reduction = rand::thread_rng().gen_range(0.0..=jitter);
        delay.mul_f64(1.0 - reduction)
    }
}

///
/// Run async function until it returns Ok, returns a permanent error
/// or runs out of attempts. Last error is returned on failure.
///
pub async fn retry_bounded<PermanentF, F, Fut, T, E>(
    max_attempts: u32,
    retry_interval: Duration,
    is_permanent: PermanentF,
    async_fn: F,
) -> Result<T, E>
where
    PermanentF: Fn(&E) -> bool,
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match async_fn(attempt).await {
            Ok(output) => return Ok(output),
            Err(err) if is_permanent(&err) || attempt >= max_attempts => return Err(err),
            Err(_) => {}
        }

        tokio::time::sleep(retry_interval).await;
    }
}
