//! Wall clock implementation of the domain `Clock`.

use noriai_shared::time::get_jst_timestamp;

use crate::domain::{Clock, Timestamp};

/// Reads the system time on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(get_jst_timestamp())
    }
}
