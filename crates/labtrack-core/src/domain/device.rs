use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sensor device mounted on a reactor. `status` is the on/off flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub reactor_id: i64,
    pub status: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDevice {
    pub name: String,
    pub reactor_id: i64,
    pub status: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DeviceUpdate {
    pub name: Option<String>,
    pub reactor_id: Option<i64>,
    pub status: Option<bool>,
}

impl DeviceUpdate {
    pub fn apply(self, device: &mut Device) {
        if let Some(name) = self.name {
            device.name = name;
        }
        if let Some(reactor_id) = self.reactor_id {
            device.reactor_id = reactor_id;
        }
        if let Some(status) = self.status {
            device.status = status;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStats {
    pub total_devices: u64,
    pub active_devices: u64,
    pub inactive_devices: u64,
    pub total_sensor_readings: u64,
}
