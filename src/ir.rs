use serde::{Deserialize, Serialize};

pub type DeviceId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Discovered,
    /// Stands in for a remote chassis that matched no known device.
    Placeholder,
    /// Shared medium inferred from several devices reporting the same port.
    Hub,
}

/// A neighbour reported by a device, typically one LLDP remote table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkedDevice {
    pub local_port: String,
    pub remote_chassis_id: String,
    pub remote_port_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub chassis_id: String,
    #[serde(default)]
    pub linked_devices: Vec<LinkedDevice>,
    #[serde(default)]
    pub kind: DeviceKind,
}

impl Device {
    pub fn new(id: DeviceId, name: &str, chassis_id: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            chassis_id: chassis_id.to_string(),
            linked_devices: Vec::new(),
            kind: DeviceKind::Discovered,
        }
    }

    pub fn with_neighbor(mut self, local_port: &str, remote_chassis_id: &str, remote_port_id: &str) -> Self {
        self.linked_devices.push(LinkedDevice {
            local_port: local_port.to_string(),
            remote_chassis_id: remote_chassis_id.to_string(),
            remote_port_id: remote_port_id.to_string(),
        });
        self
    }

    pub fn is_synthetic(&self) -> bool {
        self.kind != DeviceKind::Discovered
    }
}

/// One side of a physical connection. `device` is `None` while the far end
/// has not been matched to any known device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkEnd {
    pub device: Option<DeviceId>,
    pub chassis_id: String,
    pub port: String,
}

impl LinkEnd {
    pub fn resolved(device: DeviceId, chassis_id: &str, port: &str) -> Self {
        Self {
            device: Some(device),
            chassis_id: chassis_id.to_string(),
            port: port.to_string(),
        }
    }

    pub fn unresolved(chassis_id: &str, port: &str) -> Self {
        Self {
            device: None,
            chassis_id: chassis_id.to_string(),
            port: port.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceLink {
    pub a: LinkEnd,
    pub b: LinkEnd,
}

impl DeviceLink {
    pub fn new(a: LinkEnd, b: LinkEnd) -> Self {
        Self { a, b }
    }

    pub fn devices(&self) -> (Option<DeviceId>, Option<DeviceId>) {
        (self.a.device, self.b.device)
    }
}

/// Devices plus the reduced link list produced by the topology reducer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub devices: Vec<Device>,
    pub links: Vec<DeviceLink>,
}

impl Topology {
    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.iter().find(|device| device.id == id)
    }
}

/// Input document: either a bare device array or `{ "devices": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Inventory {
    List(Vec<Device>),
    Document { devices: Vec<Device> },
}

impl Inventory {
    pub fn into_devices(self) -> Vec<Device> {
        match self {
            Inventory::List(devices) => devices,
            Inventory::Document { devices } => devices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_device_list() {
        let input = r#"[
            {"id": 1, "name": "core", "chassisId": "00:11:22:33:44:55",
             "linkedDevices": [{"localPort": "ge1", "remoteChassisId": "aa-bb", "remotePortId": "p2"}]}
        ]"#;
        let devices = serde_json::from_str::<Inventory>(input)
            .expect("inventory")
            .into_devices();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].kind, DeviceKind::Discovered);
        assert_eq!(devices[0].linked_devices[0].remote_port_id, "p2");
    }

    #[test]
    fn parses_device_document() {
        let input = r#"{"devices": [{"id": 7}]}"#;
        let devices = serde_json::from_str::<Inventory>(input)
            .expect("inventory")
            .into_devices();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].id, 7);
        assert!(devices[0].linked_devices.is_empty());
        assert!(devices[0].name.is_empty());
    }
}
