//! Stream ranking: premium options first.

use crate::model::StreamOption;

/// Stable partition: premium options first, then direct ones, each group in
/// its original order.
pub fn rank(mut options: Vec<StreamOption>) -> Vec<StreamOption> {
    // sort_by_key is stable, equal keys keep their relative order.
    options.sort_by_key(|option| !option.is_premium());
    options
}
