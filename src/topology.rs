use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::forest::{Forest, Node, Tree};
use crate::ir::{Device, DeviceId, DeviceKind, DeviceLink, LinkEnd, Topology};
use crate::layout::LayoutWarning;

pub const HUB_NAME: &str = "pseudo hub";
const HUB_PORT_PREFIX: &str = "pp";

/// Removes cosmetic separators so chassis ids such as `00:11:22` and
/// `00-11-22` compare equal.
pub fn strip_separators(input: &str) -> String {
    input
        .chars()
        .filter(|ch| !matches!(ch, ' ' | ':' | '-'))
        .collect()
}

/// Runs the full reduction: link extraction, symmetric dedupe, placeholder
/// devices and hub synthesis.
pub fn reduce(devices: Vec<Device>) -> (Topology, Vec<LayoutWarning>) {
    let mut devices = devices;
    let mut warnings = Vec::new();
    let mut links = find_links(&devices);
    let extracted = links.len();
    dedupe_links(&mut links);
    add_placeholders(&mut devices, &mut links, &mut warnings);
    add_hubs(&mut devices, &mut links);
    debug!(
        extracted,
        links = links.len(),
        devices = devices.len(),
        "reduced topology"
    );
    (Topology { devices, links }, warnings)
}

pub(crate) fn find_links(devices: &[Device]) -> Vec<DeviceLink> {
    let stripped: Vec<String> = devices
        .iter()
        .map(|device| strip_separators(&device.chassis_id))
        .collect();
    let mut links = Vec::new();
    for device in devices {
        for neighbor in &device.linked_devices {
            let local = LinkEnd::resolved(device.id, &device.chassis_id, &neighbor.local_port);
            let remote_key = strip_separators(&neighbor.remote_chassis_id);
            let matched = stripped
                .iter()
                .position(|candidate| *candidate == remote_key)
                .map(|idx| devices[idx].id);
            let remote = LinkEnd {
                device: matched,
                chassis_id: neighbor.remote_chassis_id.clone(),
                port: neighbor.remote_port_id.clone(),
            };
            links.push(DeviceLink::new(local, remote));
        }
    }
    links
}

/// Collapses A->B / B->A pairs reported from both ends of the same
/// connection. The earlier link in scan order survives.
pub(crate) fn dedupe_links(links: &mut Vec<DeviceLink>) {
    let mut i = 0;
    while i < links.len() {
        let (a, b) = links[i].devices();
        let mut j = links.len();
        while j > i + 1 {
            j -= 1;
            let (other_a, other_b) = links[j].devices();
            if a == other_b && b == other_a {
                links.remove(j);
            }
        }
        i += 1;
    }
}

/// Smallest positive id not already taken by a device.
pub(crate) fn free_device_id(devices: &[Device]) -> DeviceId {
    let used: HashSet<DeviceId> = devices.iter().map(|device| device.id).collect();
    let mut candidate = 1;
    while used.contains(&candidate) {
        candidate += 1;
    }
    candidate
}

pub(crate) fn add_placeholders(
    devices: &mut Vec<Device>,
    links: &mut Vec<DeviceLink>,
    warnings: &mut Vec<LayoutWarning>,
) {
    let mut kept = Vec::with_capacity(links.len());
    for mut link in links.drain(..) {
        let end = match (link.a.device, link.b.device) {
            (None, None) => {
                warn!(
                    a = %link.a.chassis_id,
                    b = %link.b.chassis_id,
                    "dropping link with both ends unresolved"
                );
                warnings.push(LayoutWarning::UnresolvedLink {
                    a: link.a.chassis_id.clone(),
                    b: link.b.chassis_id.clone(),
                });
                continue;
            }
            (None, Some(_)) => &mut link.a,
            (Some(_), None) => &mut link.b,
            (Some(_), Some(_)) => {
                kept.push(link);
                continue;
            }
        };

        let existing = devices
            .iter()
            .find(|device| device.kind == DeviceKind::Placeholder && device.chassis_id == end.chassis_id)
            .map(|device| device.id);
        let id = match existing {
            Some(id) => id,
            None => {
                let id = free_device_id(devices);
                let mut placeholder = Device::new(id, &end.chassis_id, &end.chassis_id);
                placeholder.kind = DeviceKind::Placeholder;
                devices.push(placeholder);
                id
            }
        };
        end.device = Some(id);
        kept.push(link);
    }
    *links = kept;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

fn end_mut(link: &mut DeviceLink, side: Side) -> &mut LinkEnd {
    match side {
        Side::A => &mut link.a,
        Side::B => &mut link.b,
    }
}

fn far_device(link: &DeviceLink, side: Side) -> Option<DeviceId> {
    match side {
        Side::A => link.b.device,
        Side::B => link.a.device,
    }
}

/// Inserts a hub wherever several distinct devices report the same
/// (device, port) endpoint. Every endpoint of such a group is moved onto the
/// hub and the hub is linked back to the shared endpoint.
pub(crate) fn add_hubs(devices: &mut Vec<Device>, links: &mut Vec<DeviceLink>) {
    if links.len() < 2 {
        return;
    }

    // a-sides first, then b-sides, so groups are discovered in scan order.
    let mut groups: Vec<Vec<(usize, Side)>> = Vec::new();
    let mut group_index: HashMap<(DeviceId, String), usize> = HashMap::new();
    let endpoints = (0..links.len())
        .map(|idx| (idx, Side::A))
        .chain((0..links.len()).map(|idx| (idx, Side::B)));
    for (idx, side) in endpoints {
        let end = match side {
            Side::A => &links[idx].a,
            Side::B => &links[idx].b,
        };
        let Some(device) = end.device else {
            continue;
        };
        if end.port.is_empty() {
            continue;
        }
        let key = (device, end.port.clone());
        let slot = *group_index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push((idx, side));
    }

    for group in groups {
        if group.len() < 2 {
            continue;
        }
        let mut counterparts: Vec<DeviceId> = Vec::new();
        for (idx, side) in &group {
            if let Some(device) = far_device(&links[*idx], *side)
                && !counterparts.contains(&device)
            {
                counterparts.push(device);
            }
        }
        if counterparts.len() < 2 {
            continue;
        }

        let (first_idx, first_side) = group[0];
        let shared = end_mut(&mut links[first_idx], first_side).clone();

        let hub_id = free_device_id(devices);
        let mut hub = Device::new(hub_id, HUB_NAME, HUB_NAME);
        hub.kind = DeviceKind::Hub;
        devices.push(hub);

        let mut port = 1usize;
        for (idx, side) in &group {
            let end = end_mut(&mut links[*idx], *side);
            *end = LinkEnd::resolved(hub_id, HUB_NAME, &hub_port(port));
            port += 1;
        }
        links.push(DeviceLink::new(
            LinkEnd::resolved(hub_id, HUB_NAME, &hub_port(port)),
            shared,
        ));
        debug!(hub = hub_id, members = group.len(), "inserted hub");
    }
}

fn hub_port(port: usize) -> String {
    format!("{HUB_PORT_PREFIX}{port}")
}

/// Splits the reduced topology into connected components, one tree each,
/// and marks each tree's root.
pub fn build_forest(topology: &Topology, node_size: (f64, f64)) -> Forest {
    let mut adjacency: HashMap<DeviceId, Vec<DeviceId>> = HashMap::new();
    for link in &topology.links {
        if let (Some(a), Some(b)) = link.devices() {
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }
    }

    let (width, height) = node_size;
    let mut assigned: HashSet<DeviceId> = HashSet::new();
    let mut forest = Forest::new();
    for device in &topology.devices {
        if !assigned.insert(device.id) {
            continue;
        }
        let mut tree = Tree::new();
        tree.add_node(Node::new(device.id).with_size(width, height));
        let mut queue = VecDeque::from([device.id]);
        while let Some(current) = queue.pop_front() {
            let Some(neighbors) = adjacency.get(&current) else {
                continue;
            };
            for next in neighbors {
                if assigned.insert(*next) {
                    tree.add_node(Node::new(*next).with_size(width, height));
                    queue.push_back(*next);
                }
            }
        }

        for link in &topology.links {
            if let (Some(a), Some(b)) = link.devices()
                && tree.contains(a)
                && tree.contains(b)
            {
                tree.link(a, b);
            }
        }

        select_root(&mut tree);
        forest.add_tree(tree);
    }
    debug!(trees = forest.len(), nodes = forest.node_count(), "built forest");
    forest
}

/// Marks the node with the most links as root; first found wins ties.
pub fn select_root(tree: &mut Tree) {
    if tree.is_empty() {
        return;
    }
    let mut best = 0;
    let mut best_degree = 0;
    for ix in 0..tree.len() {
        let degree = tree.degree(ix);
        if degree > best_degree {
            best = ix;
            best_degree = degree;
        }
    }
    tree.set_root(best);
}
