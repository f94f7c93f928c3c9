use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use log::info;

use crate::error::Result;
use crate::generator::round_to_two_digits;

/// Wall-clock duration of one labelled workload.
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    pub label: String,
    pub duration: Duration,
}

impl Timing {
    /// Elapsed milliseconds rounded to two decimal digits.
    pub fn millis(&self) -> f64 {
        round_to_two_digits(self.duration.as_secs_f64() * 1000.0)
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :: {}ms", self.label, self.millis())
    }
}

/// Await `work` and log how long it took. A failed `work` is returned as is
/// and produces no timing line.
pub async fn timed<F>(label: &str, work: F) -> Result<Timing>
where
    F: Future<Output = Result<()>>,
{
    let start = Instant::now();
    work.await?;
    let timing = Timing {
        label: label.to_string(),
        duration: start.elapsed(),
    };
    info!("{}", timing);
    Ok(timing)
}
