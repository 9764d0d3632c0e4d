//! Collision detection over droppable rectangles. Mirrors the two strategies
//! the reconciler combines: corner proximity for coarse targets and
//! pointer containment for fine ones.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x, self.bottom()),
            Point::new(self.x + self.width, self.bottom()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DroppableKind {
    Column,
    Card,
}

#[derive(Debug, Clone)]
pub struct Droppable {
    pub id: Uuid,
    pub kind: DroppableKind,
    pub rect: Rect,
}

impl Droppable {
    pub fn new(id: Uuid, kind: DroppableKind, rect: Rect) -> Self {
        Self { id, kind, rect }
    }
}

/// Corner-proximity collision: the droppable whose four corners lie closest
/// (summed) to the dragged rect's corners wins.
pub fn closest_corners(active_rect: &Rect, droppables: &[Droppable]) -> Option<Uuid> {
    let active_corners = active_rect.corners();
    droppables
        .iter()
        .map(|droppable| {
            let corners = droppable.rect.corners();
            let total: f64 = active_corners
                .iter()
                .zip(corners.iter())
                .map(|(a, b)| a.distance_to(*b))
                .sum();
            (droppable.id, total)
        })
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(id, _)| id)
}

/// Droppables containing the pointer, innermost (smallest area) first, so a
/// card wins over the column that contains it.
pub fn pointer_within(pointer: Point, droppables: &[Droppable]) -> Vec<Uuid> {
    let mut hits: Vec<&Droppable> = droppables
        .iter()
        .filter(|droppable| droppable.rect.contains(pointer))
        .collect();
    hits.sort_by(|a, b| {
        a.rect
            .area()
            .partial_cmp(&b.rect.area())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits.into_iter().map(|droppable| droppable.id).collect()
}
