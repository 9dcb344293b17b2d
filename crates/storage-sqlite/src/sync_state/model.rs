//! Database model for sync markers.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use marketkit_core::sync::SyncMarker;

/// Database model for syncer state key-value pairs
#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::syncer_states)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SyncerStateDB {
    pub key: String,
    pub value: String,
}

impl From<SyncMarker> for SyncerStateDB {
    fn from(marker: SyncMarker) -> Self {
        Self {
            key: marker.key,
            value: marker.value,
        }
    }
}
