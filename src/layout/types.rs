use serde::Serialize;

use crate::forest::Forest;
use crate::ir::{Device, DeviceId, DeviceKind, DeviceLink};

use super::error::LayoutWarning;

/// A device with its final canvas rectangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedDevice {
    pub id: DeviceId,
    pub name: String,
    pub chassis_id: String,
    pub kind: DeviceKind,
    /// Index of the tree the device was laid out in.
    pub tree: usize,
    pub level: i32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlacedDevice {
    pub fn from_device(device: &Device, tree: usize) -> Self {
        Self {
            id: device.id,
            name: device.name.clone(),
            chassis_id: device.chassis_id.clone(),
            kind: device.kind,
            tree,
            level: -1,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLayout {
    pub devices: Vec<PlacedDevice>,
    /// Reduced links, including those to placeholder and hub devices.
    pub links: Vec<DeviceLink>,
    pub width: f64,
    pub height: f64,
    #[serde(skip)]
    pub forest: Forest,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<LayoutWarning>,
}

impl MapLayout {
    pub fn device(&self, id: DeviceId) -> Option<&PlacedDevice> {
        self.devices.iter().find(|device| device.id == id)
    }
}
