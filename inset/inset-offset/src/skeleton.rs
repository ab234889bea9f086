//! Straight-skeleton wavefront.
//!
//! The implementation follows the Felkel & Obdržálek formulation: the
//! boundary shrinks as a set of circular lists of active vertices (LAVs),
//! each vertex riding the bisector of its two adjacent contour edges with a
//! linear motion, and a priority queue delivers wavefront events in time
//! order. Two event kinds exist:
//!
//! - **edge event**: two adjacent vertices meet and the edge between them
//!   collapses; one replacement vertex spawns from the outer edge pair.
//! - **split event**: a reflex vertex runs into a non-adjacent edge. A split
//!   within one LAV divides it in two; a split against another LAV of the
//!   same region (a hole meeting the outer wall) merges the two.
//!
//! Events are only processed up to the requested inset distance; whatever
//! part of the front survives is advanced to that distance and reported as
//! the offset boundary. Every vertex that ever lived leaves an *arc* (its
//! start and end point), and every ring termination leaves *closure*
//! segments; together these are exactly the boundary curves the band
//! assembly stitches into faces.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use nalgebra::{Point2, Vector2};
use tracing::debug;

use crate::contour::LoopPoint;

/// Geometric tolerance shared by the wavefront and the band assembly.
pub(crate) const GEOM_EPS: f64 = 1e-7;
/// Tolerance on event times.
const TIME_EPS: f64 = 1e-9;
/// Slack for stale-event coincidence checks.
const STALE_EPS: f64 = 1e-5;

/// 2D cross product.
pub(crate) fn cross2(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// A contour edge of the region being shrunk, in plane coordinates.
#[derive(Debug, Clone)]
pub(crate) struct ContourEdge {
    /// Projected start position.
    pub pa: Point2<f64>,
    /// Projected end position.
    pub pb: Point2<f64>,
    /// Unit direction from `pa` to `pb`.
    pub dir: Vector2<f64>,
    /// Inward unit normal (left of `dir`).
    pub normal: Vector2<f64>,
    /// Offset line at time `t` satisfies `normal . x = offset_base + t`.
    pub offset_base: f64,
    /// Tag of the face that owned this edge.
    pub source: Option<u32>,
}

/// Path of one wavefront vertex from birth to death (or to the distance
/// limit). Arcs border exactly the two contour edges the vertex sat
/// between for its entire lifetime.
#[derive(Debug, Clone)]
pub(crate) struct SkeletonArc {
    pub edge_in: usize,
    pub edge_out: usize,
    pub start: Point2<f64>,
    pub start_time: f64,
    pub end: Point2<f64>,
    pub end_time: f64,
}

/// Segment closing a ring, either a ridge (the ring died with its vertices
/// apart) or the offset edge of a surviving ring at the distance limit.
/// Directed against the contour edge direction, as the band walk expects.
#[derive(Debug, Clone)]
pub(crate) struct RingClosure {
    pub edge: usize,
    pub from: Point2<f64>,
    pub to: Point2<f64>,
    pub time: f64,
}

/// A ring that survived to the distance limit, in boundary order.
#[derive(Debug, Clone)]
pub(crate) struct SurvivingRing {
    pub points: Vec<Point2<f64>>,
    /// A contour edge bordering the ring, used for tag inheritance.
    pub lead_edge: usize,
}

/// Everything the band assembly needs.
#[derive(Debug)]
pub(crate) struct SkeletonOutput {
    pub edges: Vec<ContourEdge>,
    pub arcs: Vec<SkeletonArc>,
    pub closures: Vec<RingClosure>,
    pub rings: Vec<SurvivingRing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Edge { va: usize, vb: usize },
    Split { v: usize, edge: usize },
}

impl EventKind {
    /// Edge events outrank split events at equal times.
    const fn rank(self) -> (u8, usize, usize) {
        match self {
            Self::Edge { va, vb } => (0, va, vb),
            Self::Split { v, edge } => (1, v, edge),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Event {
    time: f64,
    kind: EventKind,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the earliest event.
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.kind.rank().cmp(&self.kind.rank()))
    }
}

#[derive(Debug, Clone)]
struct WfVertex {
    origin: Point2<f64>,
    start_time: f64,
    velocity: Vector2<f64>,
    edge_in: usize,
    edge_out: usize,
    reflex: bool,
    prev: usize,
    next: usize,
    death: Option<(Point2<f64>, f64)>,
}

impl WfVertex {
    fn position(&self, t: f64) -> Point2<f64> {
        self.origin + self.velocity * (t - self.start_time)
    }

    const fn alive(&self) -> bool {
        self.death.is_none()
    }
}

/// Bisector velocity of a vertex between two edges with inward normals
/// `n_in` and `n_out`: the unique motion offsetting both edges at unit
/// speed. `None` when the edges are antiparallel (a 180-degree spike).
fn bisector_velocity(n_in: Vector2<f64>, n_out: Vector2<f64>) -> Option<Vector2<f64>> {
    let denom = 1.0 + n_in.dot(&n_out);
    if denom.abs() < 1e-9 {
        return None;
    }
    Some((n_in + n_out) / denom)
}

/// Shrink the region bounded by `loops` by `limit`.
///
/// Loops are in plane coordinates, outer loop CCW and holes CW, carrying
/// original point indices and face tags. Returns `None` when the initial
/// front cannot even be built; runtime degeneracies degrade gracefully
/// inside.
pub(crate) fn shrink(
    loops: &[Vec<(LoopPoint, Point2<f64>)>],
    limit: f64,
) -> Option<SkeletonOutput> {
    let mut front = Wavefront::build(loops, limit)?;
    front.run();
    Some(front.finish())
}

struct Wavefront {
    edges: Vec<ContourEdge>,
    vertices: Vec<WfVertex>,
    heap: BinaryHeap<Event>,
    limit: f64,
    closures: Vec<RingClosure>,
    rings: Vec<SurvivingRing>,
}

impl Wavefront {
    fn build(loops: &[Vec<(LoopPoint, Point2<f64>)>], limit: f64) -> Option<Self> {
        let mut edges = Vec::new();
        let mut vertices: Vec<WfVertex> = Vec::new();

        for ring in loops {
            let n = ring.len();
            if n < 3 {
                return None;
            }
            let edge_base = edges.len();
            let vertex_base = vertices.len();
            for i in 0..n {
                let (lp, pa) = ring[i];
                let (_, pb) = ring[(i + 1) % n];
                let chord = pb - pa;
                let len = chord.norm();
                if len < GEOM_EPS {
                    // Zero-length edges should have been cleaned by the caller.
                    return None;
                }
                let dir = chord / len;
                let normal = Vector2::new(-dir.y, dir.x);
                edges.push(ContourEdge {
                    pa,
                    pb,
                    dir,
                    normal,
                    offset_base: normal.dot(&pa.coords),
                    source: lp.source,
                });
            }
            for i in 0..n {
                let edge_in = edge_base + (i + n - 1) % n;
                let edge_out = edge_base + i;
                let n_in = edges[edge_in].normal;
                let n_out = edges[edge_out].normal;
                let velocity = bisector_velocity(n_in, n_out)?;
                let reflex = cross2(edges[edge_in].dir, edges[edge_out].dir) < -1e-12;
                vertices.push(WfVertex {
                    origin: ring[i].1,
                    start_time: 0.0,
                    velocity,
                    edge_in,
                    edge_out,
                    reflex,
                    prev: vertex_base + (i + n - 1) % n,
                    next: vertex_base + (i + 1) % n,
                    death: None,
                });
            }
        }

        let mut front = Self {
            edges,
            vertices,
            heap: BinaryHeap::new(),
            limit,
            closures: Vec::new(),
            rings: Vec::new(),
        };
        for v in 0..front.vertices.len() {
            front.push_edge_event(v, front.vertices[v].next);
        }
        for v in 0..front.vertices.len() {
            if front.vertices[v].reflex {
                front.push_split_events(v);
            }
        }
        Some(front)
    }

    /// Candidate collapse of the edge between adjacent vertices `va`, `vb`.
    fn push_edge_event(&mut self, va: usize, vb: usize) {
        let a = &self.vertices[va];
        let b = &self.vertices[vb];
        let dir = self.edges[a.edge_out].dir;
        // Positions extrapolated back to t = 0.
        let a0 = a.origin - a.velocity * a.start_time;
        let b0 = b.origin - b.velocity * b.start_time;
        let closing = (b.velocity - a.velocity).dot(&dir);
        if closing >= -1e-12 {
            return; // Edge not shrinking.
        }
        let t = -(b0 - a0).dot(&dir) / closing;
        if t + TIME_EPS < a.start_time.max(b.start_time) || t > self.limit + GEOM_EPS {
            return;
        }
        self.heap.push(Event {
            time: t,
            kind: EventKind::Edge { va, vb },
        });
    }

    /// Candidate splits of reflex vertex `v` against every non-adjacent
    /// contour edge. Validity against the live front is re-checked on pop.
    fn push_split_events(&mut self, v: usize) {
        let vert = self.vertices[v].clone();
        let origin0 = vert.origin - vert.velocity * vert.start_time;
        for (e, edge) in self.edges.iter().enumerate() {
            if e == vert.edge_in || e == vert.edge_out {
                continue;
            }
            let den = vert.velocity.dot(&edge.normal) - 1.0;
            if den >= -1e-12 {
                continue; // Not approaching the sweeping edge.
            }
            let t = (edge.offset_base - origin0.coords.dot(&edge.normal)) / den;
            if t + TIME_EPS < vert.start_time || t > self.limit + GEOM_EPS {
                continue;
            }
            self.heap.push(Event {
                time: t,
                kind: EventKind::Split { v, edge: e },
            });
        }
    }

    fn run(&mut self) {
        while let Some(event) = self.heap.pop() {
            if event.time > self.limit + GEOM_EPS {
                break;
            }
            match event.kind {
                EventKind::Edge { va, vb } => self.handle_edge_event(event.time, va, vb),
                EventKind::Split { v, edge } => self.handle_split_event(event.time, v, edge),
            }
        }
    }

    /// Members of the ring containing `v`, starting at `v`, in order.
    fn collect_ring(&self, v: usize) -> Vec<usize> {
        let mut ring = vec![v];
        let mut cur = self.vertices[v].next;
        while cur != v && ring.len() <= self.vertices.len() {
            ring.push(cur);
            cur = self.vertices[cur].next;
        }
        ring
    }

    /// Terminate a ring at time `t`: every member dies at its own position
    /// and each non-degenerate pair gap becomes a ridge closure.
    fn kill_ring(&mut self, ring: &[usize], t: f64) {
        for &m in ring {
            if self.vertices[m].alive() {
                let p = self.vertices[m].position(t);
                self.vertices[m].death = Some((p, t));
            }
        }
        self.push_ring_closures(ring, t);
    }

    /// Closure segments between consecutive ring members at time `t`,
    /// directed against the underlying contour edge.
    fn push_ring_closures(&mut self, ring: &[usize], t: f64) {
        for (i, &m) in ring.iter().enumerate() {
            let next = ring[(i + 1) % ring.len()];
            let from = self.vertices[next].position(t);
            let to = self.vertices[m].position(t);
            if (from - to).norm() > GEOM_EPS {
                self.closures.push(RingClosure {
                    edge: self.vertices[m].edge_out,
                    from,
                    to,
                    time: t,
                });
            }
        }
    }

    fn handle_edge_event(&mut self, t: f64, va: usize, vb: usize) {
        if !self.vertices[va].alive() || !self.vertices[vb].alive() {
            return;
        }
        if self.vertices[va].next != vb {
            return;
        }
        let pa = self.vertices[va].position(t);
        let pb = self.vertices[vb].position(t);
        if (pa - pb).norm() > STALE_EPS {
            return;
        }

        let ring = self.collect_ring(va);
        if ring.len() <= 3 {
            self.kill_ring(&ring, t);
            return;
        }

        let q = nalgebra::center(&pa, &pb);
        let edge_in = self.vertices[va].edge_in;
        let edge_out = self.vertices[vb].edge_out;
        let Some(velocity) =
            bisector_velocity(self.edges[edge_in].normal, self.edges[edge_out].normal)
        else {
            // Antiparallel outer edges: the front degenerates to a ridge.
            self.kill_ring(&ring, t);
            return;
        };

        let prev = self.vertices[va].prev;
        let next = self.vertices[vb].next;
        let reflex = cross2(self.edges[edge_in].dir, self.edges[edge_out].dir) < -1e-12;
        let x = self.vertices.len();
        self.vertices.push(WfVertex {
            origin: q,
            start_time: t,
            velocity,
            edge_in,
            edge_out,
            reflex,
            prev,
            next,
            death: None,
        });
        self.vertices[prev].next = x;
        self.vertices[next].prev = x;
        self.vertices[va].death = Some((q, t));
        self.vertices[vb].death = Some((q, t));

        self.push_edge_event(prev, x);
        self.push_edge_event(x, next);
        if reflex {
            self.push_split_events(x);
        }
    }

    /// Locate the live piece of contour edge `e` that contains `q` at time
    /// `t`. Pieces adjacent to `v` are not valid split targets.
    fn find_split_piece(&self, v: usize, e: usize, q: Point2<f64>, t: f64) -> Option<usize> {
        let edge = &self.edges[e];
        for (w, vert) in self.vertices.iter().enumerate() {
            if !vert.alive() || vert.edge_out != e {
                continue;
            }
            let wn = vert.next;
            if w == v || wn == v || !self.vertices[wn].alive() {
                continue;
            }
            let p0 = vert.position(t);
            let p1 = self.vertices[wn].position(t);
            let along0 = (q - p0).dot(&edge.dir);
            let along1 = (p1 - q).dot(&edge.dir);
            let off_line = (q - p0).dot(&edge.normal).abs();
            if along0 >= -STALE_EPS && along1 >= -STALE_EPS && off_line <= STALE_EPS {
                return Some(w);
            }
        }
        None
    }

    fn handle_split_event(&mut self, t: f64, v: usize, e: usize) {
        if !self.vertices[v].alive() {
            return;
        }
        if self.vertices[v].edge_in == e || self.vertices[v].edge_out == e {
            return;
        }
        let q = self.vertices[v].position(t);
        let Some(w) = self.find_split_piece(v, e, q, t) else {
            return; // Stale: the front moved on.
        };
        let wn = self.vertices[w].next;

        let edge_in = self.vertices[v].edge_in;
        let edge_out = self.vertices[v].edge_out;
        let vel1 = bisector_velocity(self.edges[edge_in].normal, self.edges[e].normal);
        let vel2 = bisector_velocity(self.edges[e].normal, self.edges[edge_out].normal);
        let (Some(vel1), Some(vel2)) = (vel1, vel2) else {
            // Spike against the split edge; close out everything involved.
            let ring_v = self.collect_ring(v);
            self.kill_ring(&ring_v, t);
            if self.vertices[w].alive() {
                let ring_w = self.collect_ring(w);
                self.kill_ring(&ring_w, t);
            }
            return;
        };

        let prev = self.vertices[v].prev;
        let next = self.vertices[v].next;
        let x1 = self.vertices.len();
        let x2 = x1 + 1;
        let reflex1 = cross2(self.edges[edge_in].dir, self.edges[e].dir) < -1e-12;
        let reflex2 = cross2(self.edges[e].dir, self.edges[edge_out].dir) < -1e-12;
        self.vertices.push(WfVertex {
            origin: q,
            start_time: t,
            velocity: vel1,
            edge_in,
            edge_out: e,
            reflex: reflex1,
            prev,
            next: wn,
            death: None,
        });
        self.vertices.push(WfVertex {
            origin: q,
            start_time: t,
            velocity: vel2,
            edge_in: e,
            edge_out,
            reflex: reflex2,
            prev: w,
            next,
            death: None,
        });
        self.vertices[prev].next = x1;
        self.vertices[wn].prev = x1;
        self.vertices[w].next = x2;
        self.vertices[next].prev = x2;
        self.vertices[v].death = Some((q, t));

        self.push_edge_event(prev, x1);
        self.push_edge_event(x1, wn);
        self.push_edge_event(w, x2);
        self.push_edge_event(x2, next);
        if reflex1 {
            self.push_split_events(x1);
        }
        if reflex2 {
            self.push_split_events(x2);
        }
    }

    /// Advance whatever survived to the distance limit and collect output.
    fn finish(mut self) -> SkeletonOutput {
        let limit = self.limit;
        let mut visited = vec![false; self.vertices.len()];
        for v in 0..self.vertices.len() {
            if visited[v] || !self.vertices[v].alive() {
                continue;
            }
            let ring = self.collect_ring(v);
            for &m in &ring {
                visited[m] = true;
            }
            if ring.len() < 3 {
                // A front squeezed to a zero-width slab: pure ridge.
                debug!(len = ring.len(), "degenerate surviving ring");
                self.kill_ring(&ring, limit);
                continue;
            }
            let points: Vec<Point2<f64>> = ring
                .iter()
                .map(|&m| self.vertices[m].position(limit))
                .collect();
            if polygon_area(&points).abs() <= GEOM_EPS * GEOM_EPS {
                self.kill_ring(&ring, limit);
                continue;
            }
            self.push_ring_closures(&ring, limit);
            let lead_edge = self.vertices[ring[0]].edge_out;
            for &m in &ring {
                let p = self.vertices[m].position(limit);
                self.vertices[m].death = Some((p, limit));
            }
            self.rings.push(SurvivingRing { points, lead_edge });
        }

        let arcs = self
            .vertices
            .iter()
            .filter_map(|vert| {
                let (end, end_time) = vert.death?;
                Some(SkeletonArc {
                    edge_in: vert.edge_in,
                    edge_out: vert.edge_out,
                    start: vert.origin,
                    start_time: vert.start_time,
                    end,
                    end_time,
                })
            })
            .collect();

        SkeletonOutput {
            edges: self.edges,
            arcs,
            closures: self.closures,
            rings: self.rings,
        }
    }
}

/// Signed area of a polygon (positive for CCW).
pub(crate) fn polygon_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += cross2(a.coords, b.coords);
    }
    sum / 2.0
}
