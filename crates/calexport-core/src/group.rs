//! Partitioning exported records by owner.

use std::collections::HashMap;

use crate::event::StoredEvent;

/// Owner used for records that do not carry a `user_email`.
pub const UNKNOWN_OWNER: &str = "unknown";

/// The records of one owner, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerBucket {
    /// Owner identity (mailbox address or [`UNKNOWN_OWNER`]).
    pub owner: String,
    /// The owner's records in their original order.
    pub events: Vec<StoredEvent>,
}

impl OwnerBucket {
    /// Part of the owner identity before the first `@`, used for file names.
    ///
    /// An identity without `@` is returned whole.
    pub fn base_name(&self) -> &str {
        self.owner
            .split_once('@')
            .map_or(self.owner.as_str(), |(local, _)| local)
    }
}

/// Groups records by owner.
///
/// Owners appear in the order they are first seen; each bucket keeps its
/// records in input order.
pub fn group_by_owner(events: impl IntoIterator<Item = StoredEvent>) -> Vec<OwnerBucket> {
    let (buckets, _) = events.into_iter().fold(
        (Vec::<OwnerBucket>::new(), HashMap::<String, usize>::new()),
        |(mut buckets, mut index), event| {
            let owner = event
                .user_email
                .clone()
                .unwrap_or_else(|| UNKNOWN_OWNER.to_string());
            match index.get(&owner) {
                Some(&pos) => buckets[pos].events.push(event),
                None => {
                    index.insert(owner.clone(), buckets.len());
                    buckets.push(OwnerBucket {
                        owner,
                        events: vec![event],
                    });
                }
            }
            (buckets, index)
        },
    );
    buckets
}
