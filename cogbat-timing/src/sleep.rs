use std::time::Duration;

/// Sleeps for `duration` with better-than-scheduler precision where the
/// platform allows it. Inter-trial pacing goes through this so the next
/// stimulus lands close to its nominal onset.
pub fn precise_sleep(duration: Duration) {
    if duration.is_zero() {
        return;
    }
    #[cfg(target_os = "linux")]
    linux_sleep(duration);
    #[cfg(target_os = "macos")]
    macos_sleep(duration);
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    hybrid_sleep(duration);
}

#[cfg(target_os = "linux")]
fn linux_sleep(duration: Duration) {
    use libc::{clock_nanosleep, timespec, CLOCK_MONOTONIC};

    let request = timespec {
        tv_sec: duration.as_secs() as libc::time_t,
        tv_nsec: duration.subsec_nanos() as libc::c_long,
    };

    unsafe {
        clock_nanosleep(CLOCK_MONOTONIC, 0, &request, std::ptr::null_mut());
    }
}

#[cfg(target_os = "macos")]
fn macos_sleep(duration: Duration) {
    use mach2::mach_time::{mach_absolute_time, mach_timebase_info, mach_timebase_info_data_t};

    // Spin only for sub-100us waits; the thread scheduler handles the rest.
    if duration.as_nanos() < 100_000 {
        unsafe {
            let start = mach_absolute_time();
            let mut timebase = mach_timebase_info_data_t { numer: 0, denom: 0 };
            mach_timebase_info(&mut timebase);

            let target_ticks =
                duration.as_nanos() as u64 * timebase.denom as u64 / timebase.numer as u64;

            while mach_absolute_time() - start < target_ticks {
                std::hint::spin_loop();
            }
        }
    } else {
        std::thread::sleep(duration);
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn hybrid_sleep(duration: Duration) {
    use std::time::Instant;

    // Coarse sleep for the bulk of the wait, spin out the tail.
    const SPIN_TAIL: Duration = Duration::from_millis(2);

    let start = Instant::now();
    if duration > SPIN_TAIL {
        std::thread::sleep(duration - SPIN_TAIL);
    }
    while start.elapsed() < duration {
        std::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn sleeps_at_least_the_requested_duration() {
        let start = Instant::now();
        precise_sleep(Duration::from_millis(5));
        assert!(start.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn zero_duration_returns_immediately() {
        precise_sleep(Duration::ZERO);
    }
}
