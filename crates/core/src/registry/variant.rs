use serde::Serialize;

use super::ResourceKind;

pub const VERSION_BASE: u32 = 1000;
/// First client with playlist/album song queues.
pub const VERSION_QUEUE_PAGING: u32 = 1065;
/// First client with paged live-channel programmes.
pub const VERSION_NEWEST: u32 = 1070;

/// Client releases, oldest first.
pub const RELEASED_VERSIONS: &[u32] = &[VERSION_BASE, VERSION_QUEUE_PAGING, VERSION_NEWEST];

/// Shape of the resource a client version receives for a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceVariant {
    Standard,
    /// Playlist or album carrying its song queue.
    Queue,
    /// Live channel carrying its programme ids for paging.
    PagingPrograms,
}

impl ResourceVariant {
    /// Selects the variant of `kind` served to `app_version`.
    pub fn select(kind: ResourceKind, app_version: u32) -> Self {
        match kind {
            ResourceKind::MusicPlaylist | ResourceKind::MusicAlbum
                if app_version >= VERSION_QUEUE_PAGING =>
            {
                ResourceVariant::Queue
            }
            ResourceKind::LiveChannel if app_version >= VERSION_NEWEST => {
                ResourceVariant::PagingPrograms
            }
            _ => ResourceVariant::Standard,
        }
    }
}

/// Maps a client version to the latest release not newer than it. Versions
/// older than every release map to the oldest one.
pub fn normalize_app_version(releases: &[u32], app_version: u32) -> u32 {
    releases
        .iter()
        .copied()
        .take_while(|release| app_version >= *release)
        .last()
        .or_else(|| releases.first().copied())
        .unwrap_or(app_version)
}
