//! Group aggregation: every registered user is a member of the one group,
//! and the group searches around the average of its members' locations.

use anyhow::Result;
use tracing::{debug, warn};

use crate::geo::{centroid, GeoPoint};
use crate::store::LocationStore;

/// Outcome of locating the group
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupCentroid {
    /// Nobody is registered
    NoUsers,
    /// Users exist but none has shared a location
    NoLocations,
    Located {
        point: GeoPoint,
        /// Number of users whose location contributed
        members: usize,
    },
}

/// Last known locations of all users that have one
///
/// A failed lookup for a single user is logged and that user skipped.
pub async fn collect_group_points(store: &dyn LocationStore, users: &[String]) -> Vec<GeoPoint> {
    let mut points = Vec::with_capacity(users.len());
    for user in users {
        match store.get_user_location(user).await {
            Ok(Some(point)) => points.push(point),
            Ok(None) => debug!(username = %user, "Group member has no location"),
            Err(e) => warn!(
                username = %user,
                error = %e,
                "Skipping group member, location lookup failed"
            ),
        }
    }
    points
}

/// Average location of every registered user with a known location
pub async fn group_centroid(store: &dyn LocationStore) -> Result<GroupCentroid> {
    let users = store.get_all_users().await?;
    if users.is_empty() {
        return Ok(GroupCentroid::NoUsers);
    }

    let points = collect_group_points(store, &users).await;
    Ok(match centroid(&points) {
        Some(point) => GroupCentroid::Located {
            point,
            members: points.len(),
        },
        None => GroupCentroid::NoLocations,
    })
}
