//! Creation timestamps.

use chrono::{DateTime, SubsecRound, Utc};

/// Current UTC time at the precision PostgreSQL stores (microseconds).
///
/// Records returned straight from a write therefore compare equal to the
/// same records read back later.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
