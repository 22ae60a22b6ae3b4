use crate::events::{CircleEvent, Event, EventQueue};
use crate::geometry::{self, Edge, Point, Site};
use tracing::warn;

type NodeId = usize;

#[derive(Clone, Copy, Debug)]
enum NodeKind {
    /// A parabolic arc of the site with this index.
    Arc { site: usize, generation: u32 },
    /// The breakpoint between the rightmost arc of `left` and the leftmost arc of `right`.
    Breakpoint { edge: usize, left: NodeId, right: NodeId },
}

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
}

/// The beachline of Fortune's sweep as a binary tree stored in an arena.
///
/// Leaves are arcs, in left-to-right order along the sweep line; internal nodes are the
/// breakpoints between neighbouring arcs and own the edge that breakpoint traces. Nodes are
/// addressed by index and never reused, so a detached node can still be inspected safely.
pub struct Beachline<'a> {
    sites: &'a [Site],
    width: f64,
    tolerance: f64,
    nodes: Vec<Node>,
    root: Option<NodeId>,
    edges: Vec<Edge>,
    reported: Vec<usize>,
}

impl<'a> Beachline<'a> {
    pub fn new(sites: &'a [Site], width: f64, tolerance: f64) -> Self {
        Beachline {
            sites,
            width,
            tolerance,
            nodes: Vec::with_capacity(sites.len() * 4),
            root: None,
            edges: Vec::with_capacity(sites.len() * 3),
            reported: Vec::with_capacity(sites.len() * 3),
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[cfg(test)]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges that make up the diagram. Twins are reached through [`Edge::neighbour`].
    #[cfg(test)]
    pub fn reported(&self) -> &[usize] {
        &self.reported
    }

    /// Consumes the beachline, returning the edge arena and the reported edges.
    pub fn into_parts(self) -> (Vec<Edge>, Vec<usize>) {
        (self.edges, self.reported)
    }

    /// Edges of the breakpoints remaining in the tree.
    #[cfg(test)]
    pub fn open_edges(&self) -> Vec<usize> {
        let mut open = Vec::new();
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(node) = stack.pop() {
            if let NodeKind::Breakpoint { edge, left, right } = self.nodes[node].kind {
                open.push(edge);
                stack.push(left);
                stack.push(right);
            }
        }
        open
    }

    /// Number of arcs currently on the beachline.
    #[cfg(test)]
    pub fn arc_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(node) = stack.pop() {
            match self.nodes[node].kind {
                NodeKind::Arc { .. } => count += 1,
                NodeKind::Breakpoint { left, right, .. } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        count
    }

    /// True if a circle event registered for `arc` at `generation` is still valid.
    pub fn is_live(&self, arc: usize, generation: u32) -> bool {
        let attached = self.nodes[arc].parent.is_some() || self.root == Some(arc);
        match self.nodes[arc].kind {
            NodeKind::Arc { generation: current, .. } => attached && current == generation,
            NodeKind::Breakpoint { .. } => false,
        }
    }

    /// Handles a site event: inserts the arc of `site` below the sweep line at its y.
    pub fn insert(&mut self, site: usize, queue: &mut EventQueue) {
        let s = self.sites[site];
        let Some(root) = self.root else {
            self.root = Some(self.push_arc(site, None));
            return;
        };

        let target = self.locate_arc(root, s.x, s.y);
        let target_site = self.arc_site(target);
        let t = self.sites[target_site];

        if t.y == s.y {
            self.split_level(target, target_site, site);
            return;
        }

        self.invalidate(target);

        let start = Point::new(s.x, geometry::parabola_y(t.point(), s.y, s.x));
        let el = self.push_edge(Edge::new(start, &t, &s));
        let er = self.push_edge(Edge::new(start, &s, &t));
        self.edges[el].neighbour = Some(er);
        self.reported.push(el);

        let p0 = self.push_arc(target_site, None);
        let p1 = self.push_arc(site, None);
        let p2 = self.push_arc(target_site, Some(target));
        let inner = self.push_node(
            NodeKind::Breakpoint {
                edge: el,
                left: p0,
                right: p1,
            },
            Some(target),
        );
        self.nodes[p0].parent = Some(inner);
        self.nodes[p1].parent = Some(inner);
        self.nodes[target].kind = NodeKind::Breakpoint {
            edge: er,
            left: inner,
            right: p2,
        };

        self.check_circle(p0, s.y, queue);
        self.check_circle(p2, s.y, queue);
    }

    /// Splits an arc whose site lies on the sweep line together with `site`.
    ///
    /// Only sites in the topmost row meet here; their bisector is vertical and enters the
    /// domain through its top side.
    fn split_level(&mut self, target: NodeId, target_site: usize, site: usize) {
        let t = self.sites[target_site];
        let s = self.sites[site];
        let (l, r) = if t.x > s.x { (site, target_site) } else { (target_site, site) };

        self.invalidate(target);
        let start = Point::new((t.x + s.x) * 0.5, self.width);
        let edge = self.push_edge(Edge::from_above(start, &self.sites[l], &self.sites[r]));
        self.reported.push(edge);

        let left = self.push_arc(l, Some(target));
        let right = self.push_arc(r, Some(target));
        self.nodes[target].kind = NodeKind::Breakpoint { edge, left, right };
    }

    /// Handles a circle event at sweep coordinate `y`: removes the vanishing arc and joins its
    /// neighbours with a new edge starting at the circle center.
    pub fn remove(&mut self, y: f64, circle: &CircleEvent, queue: &mut EventQueue) {
        let arc = circle.arc;
        let (Some(lp), Some(rp), Some(parent)) = (
            self.left_parent(arc),
            self.right_parent(arc),
            self.nodes[arc].parent,
        ) else {
            warn!(arc, "circle event on an arc without two neighbours");
            return;
        };

        let p0 = self.left_child(lp);
        let p2 = self.right_child(rp);
        self.invalidate(p0);
        self.invalidate(p2);

        let (Some(left_edge), Some(right_edge)) = (self.breakpoint_edge(lp), self.breakpoint_edge(rp))
        else {
            return;
        };
        let end = circle.center;
        self.edges[left_edge].end = Some(end);
        self.edges[right_edge].end = Some(end);

        // `parent` is the breakpoint spliced out below; the other one is kept higher up and
        // now traces the bisector of the outer arcs.
        let higher = if parent == lp { rp } else { lp };
        let s0 = self.sites[self.arc_site(p0)];
        let s2 = self.sites[self.arc_site(p2)];
        let edge = self.push_edge(Edge::new(end, &s0, &s2));
        self.reported.push(edge);
        if let NodeKind::Breakpoint { edge: ref mut e, .. } = self.nodes[higher].kind {
            *e = edge;
        }

        let sibling = match self.nodes[parent].kind {
            NodeKind::Breakpoint { left, right, .. } => {
                if left == arc {
                    right
                } else {
                    left
                }
            }
            NodeKind::Arc { .. } => return,
        };
        let grand = self.nodes[parent].parent;
        self.nodes[sibling].parent = grand;
        match grand {
            Some(g) => self.replace_child(g, parent, sibling),
            None => self.root = Some(sibling),
        }
        self.invalidate(arc);
        self.nodes[arc].parent = None;
        self.nodes[parent].parent = None;

        self.check_circle(p0, y, queue);
        self.check_circle(p2, y, queue);
    }

    /// Registers a circle event for `arc` if its bounding breakpoints converge to a point
    /// the sweep line has not passed yet.
    pub fn check_circle(&mut self, arc: NodeId, y: f64, queue: &mut EventQueue) {
        let (Some(lp), Some(rp)) = (self.left_parent(arc), self.right_parent(arc)) else {
            return;
        };
        let a = self.arc_site(self.left_child(lp));
        let c = self.arc_site(self.right_child(rp));
        if a == c {
            return;
        }
        // Only a clockwise triple (left, arc, right) closes in on the arc; the other turn
        // belongs to breakpoints moving apart, even when they start from one point.
        let (pa, pb, pc) = (
            self.sites[a].point(),
            self.sites[self.arc_site(arc)].point(),
            self.sites[c].point(),
        );
        if !geometry::turns_clockwise(pa, pb, pc) {
            return;
        }

        let (Some(left_edge), Some(right_edge)) = (self.breakpoint_edge(lp), self.breakpoint_edge(rp))
        else {
            return;
        };
        let Some(center) =
            geometry::intersect(&self.edges[left_edge], &self.edges[right_edge], self.tolerance)
        else {
            return;
        };

        let radius = self.sites[a].point().distance(center);
        let bottom = center.y - radius;
        if bottom > y + self.tolerance {
            return;
        }

        let generation = self.invalidate(arc);
        queue.push(Event::circle(
            bottom.min(y),
            CircleEvent {
                center,
                radius,
                arc,
                generation,
            },
        ));
    }

    /// Descends from `node` to the arc lying above `x` when the sweep line is at `y`.
    fn locate_arc(&self, mut node: NodeId, x: f64, y: f64) -> NodeId {
        while let NodeKind::Breakpoint { left, right, .. } = self.nodes[node].kind {
            node = if self.breakpoint_x(node, y) > x { left } else { right };
        }
        node
    }

    fn breakpoint_x(&self, node: NodeId, y: f64) -> f64 {
        let l = self.sites[self.arc_site(self.left_child(node))].point();
        let r = self.sites[self.arc_site(self.right_child(node))].point();
        geometry::breakpoint_x(l, r, y)
    }

    /// Nearest ancestor breakpoint on the left side of `node`.
    fn left_parent(&self, node: NodeId) -> Option<NodeId> {
        let mut child = node;
        let mut current = self.nodes[node].parent?;
        loop {
            match self.nodes[current].kind {
                NodeKind::Breakpoint { left, .. } if left == child => {
                    child = current;
                    current = self.nodes[current].parent?;
                }
                _ => return Some(current),
            }
        }
    }

    /// Nearest ancestor breakpoint on the right side of `node`.
    fn right_parent(&self, node: NodeId) -> Option<NodeId> {
        let mut child = node;
        let mut current = self.nodes[node].parent?;
        loop {
            match self.nodes[current].kind {
                NodeKind::Breakpoint { right, .. } if right == child => {
                    child = current;
                    current = self.nodes[current].parent?;
                }
                _ => return Some(current),
            }
        }
    }

    /// Rightmost arc in the left subtree of a breakpoint.
    fn left_child(&self, node: NodeId) -> NodeId {
        let mut current = match self.nodes[node].kind {
            NodeKind::Breakpoint { left, .. } => left,
            NodeKind::Arc { .. } => return node,
        };
        while let NodeKind::Breakpoint { right, .. } = self.nodes[current].kind {
            current = right;
        }
        current
    }

    /// Leftmost arc in the right subtree of a breakpoint.
    fn right_child(&self, node: NodeId) -> NodeId {
        let mut current = match self.nodes[node].kind {
            NodeKind::Breakpoint { right, .. } => right,
            NodeKind::Arc { .. } => return node,
        };
        while let NodeKind::Breakpoint { left, .. } = self.nodes[current].kind {
            current = left;
        }
        current
    }

    fn arc_site(&self, node: NodeId) -> usize {
        match self.nodes[node].kind {
            NodeKind::Arc { site, .. } => site,
            NodeKind::Breakpoint { .. } => self.arc_site(self.left_child(node)),
        }
    }

    fn breakpoint_edge(&self, node: NodeId) -> Option<usize> {
        match self.nodes[node].kind {
            NodeKind::Breakpoint { edge, .. } => Some(edge),
            NodeKind::Arc { .. } => None,
        }
    }

    /// Bumps the generation of an arc, returning the new one.
    fn invalidate(&mut self, node: NodeId) -> u32 {
        match self.nodes[node].kind {
            NodeKind::Arc {
                ref mut generation, ..
            } => {
                *generation = generation.wrapping_add(1);
                *generation
            }
            NodeKind::Breakpoint { .. } => 0,
        }
    }

    fn replace_child(&mut self, node: NodeId, old: NodeId, new: NodeId) {
        if let NodeKind::Breakpoint {
            ref mut left,
            ref mut right,
            ..
        } = self.nodes[node].kind
        {
            if *left == old {
                *left = new;
            } else if *right == old {
                *right = new;
            }
        }
    }

    fn push_node(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        self.nodes.push(Node { kind, parent });
        self.nodes.len() - 1
    }

    fn push_arc(&mut self, site: usize, parent: Option<NodeId>) -> NodeId {
        self.push_node(NodeKind::Arc { site, generation: 0 }, parent)
    }

    fn push_edge(&mut self, edge: Edge) -> usize {
        self.edges.push(edge);
        self.edges.len() - 1
    }
}
