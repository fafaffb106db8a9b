//! Arena layout generation
//!
//! The tick core never creates walls or nodes; hosts build the initial
//! layout here once, from a seed, before the first tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Node, Wall, World};
use super::vector::distance;
use crate::settings::ArenaSettings;

/// Four slabs enclosing a square play area.
///
/// Inner faces sit at `±(map_size + padding) / 2` on both axes.
pub fn build_walls(map_size: f32, padding: f32, thickness: f32) -> Vec<Wall> {
    let inner = 0.5 * (map_size + padding);
    let offset = inner + 0.5 * thickness;
    let span = 2.0 * (inner + thickness);

    vec![
        Wall::new(0, Vec2::new(0.0, -offset), span, thickness),
        Wall::new(1, Vec2::new(0.0, offset), span, thickness),
        Wall::new(2, Vec2::new(-offset, 0.0), thickness, span),
        Wall::new(3, Vec2::new(offset, 0.0), thickness, span),
    ]
}

/// Whether a candidate node position keeps clear of the existing layout
fn placement_ok(pos: Vec2, nodes: &[Node], radius: f32, spread: f32) -> bool {
    if pos.length() <= spread {
        return false;
    }
    nodes.iter().all(|node| {
        let dist = distance(pos, node.pos);
        // Far enough apart, and not almost exactly on a neighbour's rim
        dist > 1.3 * spread && (dist - 2.0 * radius).abs() > 0.2 * spread
    })
}

/// Rejection-sample node positions inside the play area
pub fn scatter_nodes(rng: &mut Pcg32, settings: &ArenaSettings) -> Vec<Node> {
    let radius = settings.node_radius;
    let extent = settings.map_size - 2.0 * radius;
    let mut nodes: Vec<Node> = Vec::new();

    for _ in 0..settings.node_attempts {
        let pos = Vec2::new(
            (rng.random::<f32>() - 0.5) * extent,
            (rng.random::<f32>() - 0.5) * extent,
        );
        if placement_ok(pos, &nodes, radius, settings.node_spread) {
            let id = nodes.len() as u32;
            nodes.push(Node::new(id, pos, radius));
        }
    }
    nodes
}

/// Mark nodes closer than two radii as mutual neighbours
pub fn link_neighbors(nodes: &mut [Node]) {
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let reach = nodes[i].radius + nodes[j].radius;
            if distance(nodes[i].pos, nodes[j].pos) < reach {
                let (a, b) = (nodes[i].id, nodes[j].id);
                nodes[i].neighbors.push(b);
                nodes[j].neighbors.push(a);
            }
        }
    }
}

/// Build a fresh world: enclosing walls plus a seeded node field
pub fn generate_world(seed: u64, settings: &ArenaSettings) -> World {
    let mut rng = Pcg32::seed_from_u64(seed);
    let walls = build_walls(settings.map_size, settings.wall_padding, settings.wall_thickness);
    let mut nodes = scatter_nodes(&mut rng, settings);
    link_neighbors(&mut nodes);

    let links: usize = nodes.iter().map(|n| n.neighbors.len()).sum();
    log::info!(
        "Generated arena (seed {}): {} walls, {} nodes, {} links",
        seed,
        walls.len(),
        nodes.len(),
        links / 2
    );
    World::new(walls, nodes)
}
