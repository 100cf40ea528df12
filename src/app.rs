//! Bot operations independent of the Telegram transport.
//!
//! Every operation produces the reply text for the chat. Storage failures
//! are logged here and answered with a generic message; nothing propagates
//! to the dispatcher.

use std::sync::Arc;

use tracing::{error, info};

use crate::geo::GeoPoint;
use crate::group::{group_centroid, GroupCentroid};
use crate::localization::{t_args_lang, t_lang};
use crate::places::VenueFinder;
use crate::store::LocationStore;

pub struct AppState {
    store: Arc<dyn LocationStore>,
    finder: VenueFinder,
}

impl AppState {
    pub fn new(store: Arc<dyn LocationStore>, finder: VenueFinder) -> Self {
        Self { store, finder }
    }

    /// Register the user; failures are only logged
    pub async fn register_user(&self, user_id: &str) {
        match self.store.add_user(user_id).await {
            Ok(()) => info!(username = %user_id, "User registered"),
            Err(e) => error!(username = %user_id, error = %e, "Failed to register user"),
        }
    }

    /// Search around the user's stored location
    ///
    /// `missing_location_key` is the message shown when no location is stored.
    pub async fn search_for_user(
        &self,
        user_id: &str,
        missing_location_key: &str,
        language_code: Option<&str>,
    ) -> String {
        match self.store.get_user_location(user_id).await {
            Ok(Some(point)) => self.finder.find(point, language_code).await,
            Ok(None) => t_lang(missing_location_key, language_code),
            Err(e) => {
                error!(username = %user_id, error = %e, "Failed to read user location");
                t_lang("storage-error", language_code)
            }
        }
    }

    /// Search around the centroid of all users' locations
    pub async fn search_for_group(&self, language_code: Option<&str>) -> String {
        match group_centroid(self.store.as_ref()).await {
            Ok(GroupCentroid::Located { point, members }) => {
                info!(
                    members,
                    latitude = point.latitude,
                    longitude = point.longitude,
                    "Searching venues for group"
                );
                self.finder.find(point, language_code).await
            }
            Ok(GroupCentroid::NoUsers) => t_lang("group-no-users", language_code),
            Ok(GroupCentroid::NoLocations) => t_lang("group-no-locations", language_code),
            Err(e) => {
                error!(error = %e, "Failed to list group members");
                t_lang("storage-error", language_code)
            }
        }
    }

    /// List every registered user
    pub async fn group_info(&self, language_code: Option<&str>) -> String {
        match self.store.get_all_users().await {
            Ok(users) if users.is_empty() => t_lang("group-empty", language_code),
            Ok(users) => {
                let mut info = t_lang("group-info-title", language_code);
                for user in users {
                    info.push('\n');
                    info.push_str(&user);
                }
                info
            }
            Err(e) => {
                error!(error = %e, "Failed to list group members");
                t_lang("storage-error", language_code)
            }
        }
    }

    pub async fn current_location(&self, user_id: &str, language_code: Option<&str>) -> String {
        match self.store.get_user_location(user_id).await {
            Ok(Some(point)) => format_location("location-current", point, language_code),
            Ok(None) => t_lang("location-none", language_code),
            Err(e) => {
                error!(username = %user_id, error = %e, "Failed to read user location");
                t_lang("storage-error", language_code)
            }
        }
    }

    /// Store a location shared by the user
    pub async fn record_location(
        &self,
        user_id: &str,
        latitude: f64,
        longitude: f64,
        language_code: Option<&str>,
    ) -> String {
        let point = match GeoPoint::new(latitude, longitude) {
            Ok(point) => point,
            Err(e) => {
                error!(username = %user_id, error = %e, "Rejected shared location");
                return t_lang("location-invalid", language_code);
            }
        };

        match self.store.update_user_location(user_id, point).await {
            Ok(()) => {
                info!(username = %user_id, "User location updated");
                format_location("location-updated", point, language_code)
            }
            Err(e) => {
                error!(username = %user_id, error = %e, "Failed to update user location");
                t_lang("storage-error", language_code)
            }
        }
    }
}

fn format_location(key: &str, point: GeoPoint, language_code: Option<&str>) -> String {
    let latitude = point.latitude.to_string();
    let longitude = point.longitude.to_string();
    t_args_lang(
        key,
        &[("latitude", latitude.as_str()), ("longitude", longitude.as_str())],
        language_code,
    )
}
