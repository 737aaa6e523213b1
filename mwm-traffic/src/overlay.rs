//! The per-tile traffic overlay: canonical keys, the segment coloring, and
//! the availability state machine driven by remote reconciliation.
//!
//! The overlay is owned by one tile and mutated only by its reconciliation
//! routine; readers either snapshot the coloring or synchronize externally.
//! Codecs never touch availability — every transition happens here, and a
//! failed reconciliation always leaves keys and coloring consistent (both
//! updated or neither).

use crate::remote::{RemoteBlobSource, RemoteContext, traffic_keys_url, traffic_values_url};
use crate::{RoadSegmentId, SpeedGroup, deserialize_traffic_keys, deserialize_traffic_values};
use mwm_coding::CodecError;
use std::collections::HashMap;
use tracing::{info, warn};

/// How traffic data turned out to be available for a tile.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Availability {
    /// Data was fetched and decoded.
    IsAvailable,
    /// The server has nothing for this tile (or sent something unusable).
    NoData,
    /// The server has data for a newer tile version that this client could
    /// download.
    ExpiredData,
    /// The server has data only for versions newer than the app supports.
    ExpiredApp,
    /// Nothing is known, e.g. before the first fetch or after a transport
    /// failure.
    Unknown,
}

/// The per-segment speed classification for one tile.
pub type Coloring = HashMap<RoadSegmentId, SpeedGroup>;

/// Traffic state for a single map tile.
pub struct TrafficInfo {
    name: String,
    tile_version: u64,
    keys: Vec<RoadSegmentId>,
    coloring: Coloring,
    availability: Availability,
}

impl TrafficInfo {
    /// Builds an overlay from the tile's stored keys section.
    ///
    /// # Errors
    ///
    /// Fails when the section does not decode; no overlay is produced.
    pub fn from_keys_section(
        name: impl Into<String>,
        tile_version: u64,
        section: &[u8],
    ) -> Result<Self, CodecError> {
        let name = name.into();
        let keys = deserialize_traffic_keys(section)?;
        info!(tile = %name, keys = keys.len(), "read traffic keys from the tile section");
        Ok(Self::from_keys(name, tile_version, keys))
    }

    /// Builds an overlay from a pre-derived key vector
    /// (see [`extract_traffic_keys`](crate::extract_traffic_keys)).
    #[must_use]
    pub fn from_keys(name: impl Into<String>, tile_version: u64, keys: Vec<RoadSegmentId>) -> Self {
        Self {
            name: name.into(),
            tile_version,
            keys,
            coloring: Coloring::new(),
            availability: Availability::Unknown,
        }
    }

    /// Builds an overlay with a fixed coloring, bypassing any key handling.
    /// Intended for tests of overlay consumers.
    #[must_use]
    pub fn with_coloring(coloring: Coloring) -> Self {
        Self {
            name: String::new(),
            tile_version: 0,
            keys: Vec::new(),
            coloring,
            availability: Availability::IsAvailable,
        }
    }

    #[must_use]
    pub fn availability(&self) -> Availability {
        self.availability
    }

    #[must_use]
    pub fn keys(&self) -> &[RoadSegmentId] {
        &self.keys
    }

    #[must_use]
    pub fn coloring(&self) -> &Coloring {
        &self.coloring
    }

    /// The speed group for a segment; segments without data are `Unknown`.
    #[must_use]
    pub fn speed_group(&self, id: &RoadSegmentId) -> SpeedGroup {
        self.coloring.get(id).copied().unwrap_or(SpeedGroup::Unknown)
    }

    /// Fetches the keys blob from the traffic service and replaces the key
    /// vector on success. Returns whether the keys were updated; the old
    /// vector stays in place on any failure.
    pub fn receive_traffic_keys(
        &mut self,
        context: &RemoteContext,
        source: &impl RemoteBlobSource,
    ) -> bool {
        let Some(url) = traffic_keys_url(context, &self.name, self.tile_version) else {
            return false;
        };
        let response = match source.fetch(&url) {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, tile = %self.name, "network error while fetching traffic keys");
                return false;
            }
        };
        if response.status != 200 {
            warn!(status = response.status, tile = %self.name, "traffic keys request failed");
            return false;
        }
        match deserialize_traffic_keys(&response.body) {
            Ok(keys) => {
                info!(tile = %self.name, keys = keys.len(), "read traffic keys from the web");
                self.keys = keys;
                true
            }
            Err(error) => {
                warn!(
                    %error,
                    tile = %self.name,
                    version = self.tile_version,
                    "could not decode traffic keys received from the server"
                );
                false
            }
        }
    }

    /// Fetches the values blob and rebuilds the coloring.
    ///
    /// The value vector is positional, so it must match the key vector in
    /// length; a mismatch is non-fatal — the coloring is cleared and
    /// availability drops to [`Availability::NoData`]. Returns whether the
    /// coloring was rebuilt.
    pub fn receive_traffic_data(
        &mut self,
        context: &RemoteContext,
        source: &impl RemoteBlobSource,
    ) -> bool {
        let Some(values) = self.receive_traffic_values(context, source) else {
            return false;
        };

        if self.keys.len() != values.len() {
            warn!(
                keys = self.keys.len(),
                values = values.len(),
                tile = %self.name,
                "received traffic value count does not match the key count"
            );
            self.availability = Availability::NoData;
            self.coloring.clear();
            return false;
        }

        self.coloring = self.keys.iter().copied().zip(values).collect();
        true
    }

    fn receive_traffic_values(
        &mut self,
        context: &RemoteContext,
        source: &impl RemoteBlobSource,
    ) -> Option<Vec<SpeedGroup>> {
        let url = traffic_values_url(context, &self.name, self.tile_version)?;
        let response = match source.fetch(&url) {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, tile = %self.name, "network error while fetching traffic values");
                self.availability = Availability::Unknown;
                return None;
            }
        };

        match response.status {
            200 => {}
            404 => {
                // The 404 body carries the server's latest data version for
                // this tile; an unparsable body counts as version zero.
                let server_version = std::str::from_utf8(&response.body)
                    .ok()
                    .and_then(|body| body.trim().parse::<u64>().ok())
                    .unwrap_or(0);
                self.availability = if server_version > self.tile_version
                    && server_version <= context.current_data_version
                {
                    Availability::ExpiredData
                } else if server_version > context.current_data_version {
                    Availability::ExpiredApp
                } else {
                    Availability::NoData
                };
                return None;
            }
            status => {
                warn!(status, tile = %self.name, "traffic values request failed");
                self.availability = Availability::Unknown;
                return None;
            }
        }

        match deserialize_traffic_values(&response.body) {
            Ok(values) => {
                self.availability = Availability::IsAvailable;
                Some(values)
            }
            Err(error) => {
                self.availability = Availability::NoData;
                warn!(
                    %error,
                    tile = %self.name,
                    version = self.tile_version,
                    "could not decode traffic values received from the server"
                );
                None
            }
        }
    }
}

/// Combines a canonical key vector with a sparse known-color mapping: keys
/// with a known color keep it, the rest come out `Unknown`.
///
/// # Panics
///
/// Every known color must belong to a key in `keys`; a stray entry is a
/// programming error.
#[must_use]
pub fn combine_colorings(keys: &[RoadSegmentId], known_colors: &Coloring) -> Coloring {
    let mut result = Coloring::with_capacity(keys.len());
    let mut num_known = 0usize;
    let mut num_unknown = 0usize;
    for key in keys {
        match known_colors.get(key) {
            Some(&group) => {
                result.insert(*key, group);
                num_known += 1;
            }
            None => {
                result.insert(*key, SpeedGroup::Unknown);
                num_unknown += 1;
            }
        }
    }
    info!(
        known = num_known,
        unknown = num_unknown,
        total = num_known + num_unknown,
        "combined road segment colorings"
    );
    assert_eq!(
        num_known,
        known_colors.len(),
        "known colors must be a subset of the key vector"
    );
    result
}
