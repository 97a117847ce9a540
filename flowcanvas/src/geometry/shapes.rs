//! Per-kind outline and connection-point geometry.
//!
//! Every [`ShapeKind`] maps to one [`ShapeDefinition`]: an outline builder and
//! an anchor layout. All coordinates are node-local (origin at the node's
//! top-left corner) and unrotated; the caller applies rotation about the
//! node centre. Functions here are pure and assume positive dimensions.

use super::math::{regular_polygon, star_polygon};
use crate::model::{HandleId, HandleRole, HandleSide, ShapeKind, Size, Vec2};
use serde::Serialize;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_8};

/// Path descriptor for a node outline.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outline {
    Rect { x: f32, y: f32, w: f32, h: f32, r: f32 },
    Ellipse { cx: f32, cy: f32, rx: f32, ry: f32 },
    Polygon { points: Vec<Vec2> },
    Polyline { points: Vec<Vec2> },
    Compound { parts: Vec<Outline> },
}

impl Outline {
    fn rect(x: f32, y: f32, w: f32, h: f32) -> Outline {
        Outline::Rect { x, y, w, h, r: 0.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlePoint {
    pub id: HandleId,
    pub position: Vec2,
}

#[derive(Clone, Copy)]
enum Anchors {
    /// Side midpoints of the node box, each with a source and a target handle.
    Sides,
    /// `start-target` at the shaft start and `end-source` at the tip.
    ArrowEnds,
    /// `cornerN-{source,target}` per vertex returned by the function.
    Vertices(fn(f32, f32) -> Vec<Vec2>),
}

pub struct ShapeDefinition {
    pub kind: ShapeKind,
    pub name: &'static str,
    pub default_size: Size,
    outline: fn(f32, f32) -> Outline,
    anchors: Anchors,
}

impl ShapeDefinition {
    pub fn outline(&self, w: f32, h: f32) -> Outline {
        (self.outline)(w, h)
    }

    pub fn handles(&self, w: f32, h: f32) -> Vec<HandlePoint> {
        match self.anchors {
            Anchors::Sides => {
                let sides = [
                    (HandleSide::Top, Vec2::new(w * 0.5, 0.0)),
                    (HandleSide::Bottom, Vec2::new(w * 0.5, h)),
                    (HandleSide::Left, Vec2::new(0.0, h * 0.5)),
                    (HandleSide::Right, Vec2::new(w, h * 0.5)),
                ];
                sides
                    .iter()
                    .flat_map(|&(side, position)| dual(side, position))
                    .collect()
            }
            Anchors::ArrowEnds => vec![
                HandlePoint {
                    id: HandleId::target(HandleSide::Start),
                    position: Vec2::new(ARROW_INSET, h * 0.5),
                },
                HandlePoint {
                    id: HandleId::source(HandleSide::End),
                    position: Vec2::new(w - ARROW_INSET, h * 0.5),
                },
            ],
            Anchors::Vertices(f) => f(w, h)
                .into_iter()
                .enumerate()
                .flat_map(|(i, p)| dual(HandleSide::Corner(i as u8), p))
                .collect(),
        }
    }

    pub fn handle_point(&self, w: f32, h: f32, id: HandleId) -> Option<Vec2> {
        self.handles(w, h).into_iter().find(|hp| hp.id == id).map(|hp| hp.position)
    }

    pub fn has_handle(&self, id: HandleId) -> bool {
        // Handle sets do not depend on size, so check against the minimum box.
        self.handle_point(40.0, 40.0, id).is_some()
    }
}

fn dual(side: HandleSide, position: Vec2) -> [HandlePoint; 2] {
    [
        HandlePoint { id: HandleId::new(side, HandleRole::Source), position },
        HandlePoint { id: HandleId::new(side, HandleRole::Target), position },
    ]
}

const INSET: f32 = 4.0;
const ARROW_INSET: f32 = 4.0;

fn rectangle(w: f32, h: f32) -> Outline {
    Outline::Rect { x: 2.0, y: 2.0, w: w - 4.0, h: h - 4.0, r: 4.0 }
}

fn ellipse(w: f32, h: f32) -> Outline {
    Outline::Ellipse { cx: w * 0.5, cy: h * 0.5, rx: w * 0.5 - INSET, ry: h * 0.5 - INSET }
}

fn circle(w: f32, h: f32) -> Outline {
    let r = w.min(h) * 0.5 - INSET;
    Outline::Ellipse { cx: w * 0.5, cy: h * 0.5, rx: r, ry: r }
}

fn diamond(w: f32, h: f32) -> Outline {
    Outline::Polygon {
        points: vec![
            Vec2::new(w * 0.5, INSET),
            Vec2::new(w - INSET, h * 0.5),
            Vec2::new(w * 0.5, h - INSET),
            Vec2::new(INSET, h * 0.5),
        ],
    }
}

fn parallelogram(w: f32, h: f32) -> Outline {
    let o = w * 0.25;
    Outline::Polygon {
        points: vec![
            Vec2::new(o, INSET),
            Vec2::new(w - INSET, INSET),
            Vec2::new(w - o, h - INSET),
            Vec2::new(INSET, h - INSET),
        ],
    }
}

fn trapezoid(w: f32, h: f32) -> Outline {
    let top = w * 0.25;
    let bottom = w * 0.033;
    Outline::Polygon {
        points: vec![
            Vec2::new(top, INSET),
            Vec2::new(w - top, INSET),
            Vec2::new(w - bottom, h - INSET),
            Vec2::new(bottom, h - INSET),
        ],
    }
}

fn polygon_radius(w: f32, h: f32) -> f32 {
    w.min(h) * 0.5 - 6.0
}

fn pentagon(w: f32, h: f32) -> Outline {
    Outline::Polygon { points: regular_polygon(w * 0.5, h * 0.5, polygon_radius(w, h), 5, -FRAC_PI_2) }
}

fn hexagon(w: f32, h: f32) -> Outline {
    Outline::Polygon { points: regular_polygon(w * 0.5, h * 0.5, polygon_radius(w, h), 6, -FRAC_PI_2) }
}

fn octagon(w: f32, h: f32) -> Outline {
    Outline::Polygon { points: regular_polygon(w * 0.5, h * 0.5, polygon_radius(w, h), 8, -FRAC_PI_8) }
}

fn star(w: f32, h: f32) -> Outline {
    let r = polygon_radius(w, h);
    Outline::Polygon { points: star_polygon(w * 0.5, h * 0.5, r, r * 0.5, 5) }
}

fn cross(w: f32, h: f32) -> Outline {
    let m = w.min(h);
    let bar = (m * 0.12).max(10.0);
    let long = (m * 0.9).max(20.0);
    let (cx, cy) = (w * 0.5, h * 0.5);
    Outline::Compound {
        parts: vec![
            Outline::rect(cx - bar * 0.5, cy - long * 0.5, bar, long),
            Outline::rect(cx - long * 0.5, cy - bar * 0.5, long, bar),
        ],
    }
}

fn arrow(w: f32, h: f32) -> Outline {
    let shaft_h = (h * 0.18).max(4.0);
    let head_w = (w * 0.22).min(32.0);
    let head_h = (h * 0.7).min(28.0);
    let tip_x = w - ARROW_INSET;
    let base_x = w - head_w - ARROW_INSET;
    Outline::Compound {
        parts: vec![
            Outline::rect(ARROW_INSET, (h - shaft_h) * 0.5, w - head_w - 2.0 * ARROW_INSET, shaft_h),
            Outline::Polygon {
                points: vec![
                    Vec2::new(tip_x, h * 0.5),
                    Vec2::new(base_x, (h - head_h) * 0.5),
                    Vec2::new(base_x, (h + head_h) * 0.5),
                ],
            },
        ],
    }
}

fn house_vertices(w: f32, h: f32) -> Vec<Vec2> {
    let roof = h * 0.4;
    vec![
        Vec2::new(w * 0.5, INSET),
        Vec2::new(w - INSET, roof),
        Vec2::new(w - INSET, h - INSET),
        Vec2::new(INSET, h - INSET),
        Vec2::new(INSET, roof),
    ]
}

fn house(w: f32, h: f32) -> Outline {
    Outline::Polygon { points: house_vertices(w, h) }
}

fn bars(w: f32, h: f32) -> (f32, f32) {
    let m = w.min(h);
    ((m * 0.25).max(10.0), (m * 0.75).max(20.0))
}

fn lshape1(w: f32, h: f32) -> Outline {
    let (bar, long) = bars(w, h);
    Outline::Compound {
        parts: vec![
            Outline::rect(INSET, h - bar - INSET, long, bar),
            Outline::rect(INSET, INSET, bar, long),
        ],
    }
}

fn lshape2(w: f32, h: f32) -> Outline {
    let (bar, long) = bars(w, h);
    Outline::Compound {
        parts: vec![
            Outline::rect(w - bar - INSET, INSET, bar, long),
            Outline::rect(INSET, INSET, long, bar),
        ],
    }
}

fn ushape1(w: f32, h: f32) -> Outline {
    let (bar, long) = bars(w, h);
    Outline::Compound {
        parts: vec![
            Outline::rect(INSET, INSET, bar, long),
            Outline::rect(w - bar - INSET, INSET, bar, long),
            Outline::rect(INSET, h - bar - INSET, long, bar),
        ],
    }
}

fn ushape2(w: f32, h: f32) -> Outline {
    let (bar, long) = bars(w, h);
    Outline::Compound {
        parts: vec![
            Outline::rect(INSET, INSET, long, bar),
            Outline::rect(INSET, h - bar - INSET, bar, bar),
            Outline::rect(w - bar - INSET, h - bar - INSET, bar, bar),
        ],
    }
}

fn drum_radii(w: f32, h: f32) -> (f32, f32) {
    (w * 0.5 - 10.0, (h * 0.13).max(10.0))
}

fn cylinder(w: f32, h: f32) -> Outline {
    let cx = w * 0.5;
    let (rx, ry) = drum_radii(w, h);
    Outline::Compound {
        parts: vec![
            Outline::Ellipse { cx, cy: ry + 2.0, rx, ry },
            Outline::rect(cx - rx, ry + 2.0, 2.0 * rx, h - 2.0 * ry - 4.0),
            Outline::Ellipse { cx, cy: h - ry - 2.0, rx, ry },
        ],
    }
}

fn drum_vertices(w: f32, h: f32) -> Vec<Vec2> {
    let cx = w * 0.5;
    let (rx, ry) = drum_radii(w, h);
    let top = ry + 2.0;
    let bottom = h - ry - 2.0;
    vec![
        Vec2::new(cx, top),
        Vec2::new(cx, bottom),
        Vec2::new(cx - rx, top),
        Vec2::new(cx + rx, top),
        Vec2::new(cx - rx, bottom),
        Vec2::new(cx + rx, bottom),
    ]
}

struct Page {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    fold_w: f32,
    fold_h: f32,
}

fn page(w: f32, h: f32) -> Page {
    Page { x: w * 0.125, y: h * 0.1, w: w * 0.75, h: h * 0.8, fold_w: w * 0.15, fold_h: h * 0.2 }
}

fn document(w: f32, h: f32) -> Outline {
    let p = page(w, h);
    let fx = p.x + p.w;
    Outline::Compound {
        parts: vec![
            Outline::rect(p.x, p.y, p.w, p.h),
            Outline::Polyline {
                points: vec![
                    Vec2::new(fx, p.y),
                    Vec2::new(fx, p.y + p.fold_h),
                    Vec2::new(fx - p.fold_w, p.y + p.fold_h),
                ],
            },
        ],
    }
}

fn document_vertices(w: f32, h: f32) -> Vec<Vec2> {
    let p = page(w, h);
    let fx = p.x + p.w;
    vec![
        Vec2::new(p.x, p.y),
        Vec2::new(p.x + p.w, p.y),
        Vec2::new(p.x + p.w, p.y + p.h),
        Vec2::new(p.x, p.y + p.h),
        Vec2::new(fx, p.y + p.fold_h),
        Vec2::new(fx - p.fold_w, p.y + p.fold_h),
    ]
}

fn header(w: f32, h: f32) -> Outline {
    Outline::rect(0.0, 0.0, w, h)
}

fn header_vertices(w: f32, h: f32) -> Vec<Vec2> {
    vec![
        Vec2::new(0.0, h * 0.5),
        Vec2::new(w, h * 0.5),
        Vec2::new(w * 0.5, 0.0),
        Vec2::new(w * 0.5, h),
    ]
}

macro_rules! shape {
    ($kind:ident, $name:expr, $w:expr, $h:expr, $outline:expr, $anchors:expr) => {
        ShapeDefinition {
            kind: ShapeKind::$kind,
            name: $name,
            default_size: Size { width: $w, height: $h },
            outline: $outline,
            anchors: $anchors,
        }
    };
}

static SHAPES: [ShapeDefinition; 21] = [
    shape!(Rectangle, "Rectangle", 120.0, 60.0, rectangle, Anchors::Sides),
    shape!(Ellipse, "Ellipse", 120.0, 60.0, ellipse, Anchors::Sides),
    shape!(Diamond, "Diamond", 80.0, 80.0, diamond, Anchors::Sides),
    shape!(Parallelogram, "Parallelogram", 120.0, 60.0, parallelogram, Anchors::Sides),
    shape!(Trapezoid, "Trapezoid", 120.0, 60.0, trapezoid, Anchors::Sides),
    shape!(Pentagon, "Pentagon", 80.0, 80.0, pentagon, Anchors::Sides),
    shape!(Hexagon, "Hexagon", 100.0, 60.0, hexagon, Anchors::Sides),
    shape!(Octagon, "Octagon", 80.0, 80.0, octagon, Anchors::Sides),
    shape!(Star, "Star", 80.0, 80.0, star, Anchors::Sides),
    shape!(Cross, "Cross", 80.0, 80.0, cross, Anchors::Sides),
    shape!(Arrow, "Arrow", 120.0, 40.0, arrow, Anchors::ArrowEnds),
    shape!(House, "House", 80.0, 80.0, house, Anchors::Vertices(house_vertices)),
    shape!(LShape1, "L-Shape 1", 80.0, 80.0, lshape1, Anchors::Sides),
    shape!(LShape2, "L-Shape 2", 80.0, 80.0, lshape2, Anchors::Sides),
    shape!(UShape1, "U-Shape 1", 80.0, 80.0, ushape1, Anchors::Sides),
    shape!(UShape2, "U-Shape 2", 80.0, 80.0, ushape2, Anchors::Sides),
    shape!(Circle, "Circle", 80.0, 80.0, circle, Anchors::Sides),
    shape!(Cylinder, "Cylinder", 80.0, 80.0, cylinder, Anchors::Vertices(drum_vertices)),
    shape!(Document, "Document", 80.0, 100.0, document, Anchors::Vertices(document_vertices)),
    shape!(Database, "Database", 80.0, 80.0, cylinder, Anchors::Vertices(drum_vertices)),
    shape!(Header, "Header", 120.0, 40.0, header, Anchors::Vertices(header_vertices)),
];

impl ShapeKind {
    pub fn definition(self) -> &'static ShapeDefinition {
        // SHAPES is declared in the same order as ShapeKind::ALL
        &SHAPES[self as usize]
    }
}

/// Outline of `kind` at the given size, node-local and unrotated.
pub fn outline(kind: ShapeKind, w: f32, h: f32) -> Outline {
    kind.definition().outline(w, h)
}

/// Connection points of `kind` at the given size, node-local and unrotated.
pub fn handle_points(kind: ShapeKind, w: f32, h: f32) -> Vec<HandlePoint> {
    kind.definition().handles(w, h)
}
