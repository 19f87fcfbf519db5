mod capacity;
mod error;
mod keys;
mod merge;
mod traits;
mod versions;

pub use capacity::SetCapacity;
pub use error::{CacheError, Result};
pub use keys::{detail_key, list_key, set_key, CARD_PREFIX, DETAIL_PREFIX, TAB_PREFIX};
pub use merge::{merge_details, partition_hits, request_keys, response_ids, DetailHits};
pub use traits::Store;
pub use versions::Versions;
