//! Shape generation for 2D primitives
//!
//! Everything appends triangles to a caller-owned buffer in screen space
//! (world x minus camera x).

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::sim::aabb::Aabb;

/// Scale a color's alpha channel
pub fn faded(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Axis-aligned filled rectangle, two triangles
pub fn rect(out: &mut Vec<Vertex>, rect: &Aabb, camera_x: f32, color: [f32; 4]) {
    let x0 = rect.left() - camera_x;
    let x1 = rect.right() - camera_x;
    let y0 = rect.top();
    let y1 = rect.bottom();

    out.push(Vertex::new(x0, y0, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x0, y1, color));

    out.push(Vertex::new(x0, y1, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x1, y1, color));
}

/// Filled disc as a triangle fan
pub fn disc(out: &mut Vec<Vertex>, center: Vec2, radius: f32, camera_x: f32, color: [f32; 4], segments: u32) {
    let c = Vec2::new(center.x - camera_x, center.y);
    let step = TAU / segments.max(3) as f32;

    for i in 0..segments.max(3) {
        let a = i as f32 * step;
        let b = a + step;
        out.push(Vertex::new(c.x, c.y, color));
        out.push(Vertex::new(c.x + radius * a.cos(), c.y + radius * a.sin(), color));
        out.push(Vertex::new(c.x + radius * b.cos(), c.y + radius * b.sin(), color));
    }
}

/// Fading trail of small squares, oldest point faintest and smallest
pub fn trail(out: &mut Vec<Vertex>, points: &[Vec2], size: f32, camera_x: f32, color: [f32; 4]) {
    let len = points.len() as f32;
    for (i, p) in points.iter().enumerate() {
        let t = i as f32 / len;
        let half = size * t * 0.5;
        if half <= 0.0 {
            continue;
        }
        let square = Aabb::new(p.x - half, p.y - half, half * 2.0, half * 2.0);
        rect(out, &square, camera_x, faded(color, t * 0.5));
    }
}
