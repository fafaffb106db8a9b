//! Broad phase: single-axis sweep over X intervals
//!
//! Every body contributes a `[x_min - padding, x_max]` interval. Sorting the
//! interval edges and sweeping once yields every pair whose X intervals
//! overlap, in O(n log n + k). The narrow phase confirms true 2D contact.

use super::state::World;

/// Index of an actor inside its role collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActorRef {
    Player(usize),
    Pursuer(usize),
}

/// Which collection a sweep edge belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Body {
    Actor(ActorRef),
    Wall(usize),
    Node(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    x: f32,
    side: Side,
    body: Body,
}

/// Candidate pairs for the narrow phase, grouped by kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePairs {
    pub actor_actor: Vec<(ActorRef, ActorRef)>,
    pub actor_wall: Vec<(ActorRef, usize)>,
    /// (player index, node index); pursuers never touch nodes
    pub player_node: Vec<(usize, usize)>,
}

impl CandidatePairs {
    pub fn len(&self) -> usize {
        self.actor_actor.len() + self.actor_wall.len() + self.player_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bodies whose left edge has been passed but not their right edge
#[derive(Default)]
struct ActiveSets {
    players: Vec<usize>,
    pursuers: Vec<usize>,
    walls: Vec<usize>,
    nodes: Vec<usize>,
}

impl ActiveSets {
    fn actors(&self) -> impl Iterator<Item = ActorRef> + '_ {
        self.players
            .iter()
            .map(|&i| ActorRef::Player(i))
            .chain(self.pursuers.iter().map(|&i| ActorRef::Pursuer(i)))
    }
}

fn push_interval(edges: &mut Vec<Edge>, body: Body, center_x: f32, half_width: f32, padding: f32) {
    edges.push(Edge {
        x: center_x - half_width - padding,
        side: Side::Left,
        body,
    });
    edges.push(Edge {
        x: center_x + half_width,
        side: Side::Right,
        body,
    });
}

/// Sorted interval edges for every wall, node and actor
fn build_edges(world: &World, padding: f32) -> Vec<Edge> {
    let count = world.walls.len() + world.nodes.len() + world.players.len() + world.pursuers.len();
    let mut edges = Vec::with_capacity(2 * count);

    for (i, wall) in world.walls.iter().enumerate() {
        push_interval(&mut edges, Body::Wall(i), wall.pos.x, 0.5 * wall.width, padding);
    }
    for (i, node) in world.nodes.iter().enumerate() {
        push_interval(&mut edges, Body::Node(i), node.pos.x, node.radius, padding);
    }
    for (i, player) in world.players.iter().enumerate() {
        push_interval(
            &mut edges,
            Body::Actor(ActorRef::Player(i)),
            player.pos.x,
            player.radius,
            padding,
        );
    }
    for (i, pursuer) in world.pursuers.iter().enumerate() {
        push_interval(
            &mut edges,
            Body::Actor(ActorRef::Pursuer(i)),
            pursuer.pos.x,
            pursuer.radius,
            padding,
        );
    }

    // Stable sort; a left edge sorts before a right edge at the same x so
    // touching intervals count as overlapping.
    edges.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.side.cmp(&b.side)));
    edges
}

/// Sweep the world once and collect every X-overlapping candidate pair
pub fn find_candidates(world: &World, padding: f32) -> CandidatePairs {
    let edges = build_edges(world, padding);
    let mut active = ActiveSets::default();
    let mut pairs = CandidatePairs::default();

    for edge in edges {
        match (edge.side, edge.body) {
            (Side::Left, Body::Actor(actor)) => {
                for other in active.actors() {
                    pairs.actor_actor.push((actor, other));
                }
                for &wall in &active.walls {
                    pairs.actor_wall.push((actor, wall));
                }
                match actor {
                    ActorRef::Player(i) => {
                        for &node in &active.nodes {
                            pairs.player_node.push((i, node));
                        }
                        active.players.push(i);
                    }
                    ActorRef::Pursuer(i) => active.pursuers.push(i),
                }
            }
            (Side::Left, Body::Wall(wall)) => {
                for actor in active.actors() {
                    pairs.actor_wall.push((actor, wall));
                }
                active.walls.push(wall);
            }
            (Side::Left, Body::Node(node)) => {
                for &player in &active.players {
                    pairs.player_node.push((player, node));
                }
                active.nodes.push(node);
            }
            (Side::Right, Body::Actor(ActorRef::Player(i))) => active.players.retain(|&j| j != i),
            (Side::Right, Body::Actor(ActorRef::Pursuer(i))) => {
                active.pursuers.retain(|&j| j != i)
            }
            (Side::Right, Body::Wall(i)) => active.walls.retain(|&j| j != i),
            (Side::Right, Body::Node(i)) => active.nodes.retain(|&j| j != i),
        }
    }

    pairs
}
