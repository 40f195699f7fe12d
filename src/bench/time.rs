use std::time::{Duration, Instant};

/// The measured cost of a timed loop.
#[derive(Debug, Clone)]
pub struct Timing {
    /// Number of invocations in the loop.
    pub iterations: usize,
    /// Elapsed wall clock time.
    pub wall: Duration,
    /// Elapsed process CPU time (user + system), where the platform exposes
    /// it.
    pub cpu: Option<Duration>,
}

pub(crate) struct Timer {
    wall: Instant,
    cpu: Option<Duration>,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            wall: Instant::now(),
            cpu: cpu_now(),
        }
    }

    pub fn stop(self, iterations: usize) -> Timing {
        let wall = self.wall.elapsed();
        let cpu = match (self.cpu, cpu_now()) {
            (Some(begin), Some(end)) => Some(end.saturating_sub(begin)),
            _ => None,
        };
        Timing {
            iterations,
            wall,
            cpu,
        }
    }
}

#[cfg(unix)]
fn cpu_now() -> Option<Duration> {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
    // SAFETY: getrusage fills the struct for the calling process and the
    // pointer is valid for the duration of the call.
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    let usage = unsafe { usage.assume_init() };
    let tv = |t: libc::timeval| Duration::new(t.tv_sec as u64, t.tv_usec as u32 * 1000);
    Some(tv(usage.ru_utime) + tv(usage.ru_stime))
}

#[cfg(not(unix))]
fn cpu_now() -> Option<Duration> {
    None
}
