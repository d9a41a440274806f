//! Shape generation for 2D primitives
//!
//! Everything is built in pixel space (origin top-left, +y down) and
//! converted to normalized device coordinates as it is emitted.

use glam::Vec2;

use super::scene::Scene;
use super::vertex::{Vertex, colors};
use crate::math::Rect;

/// Orthographic projection from a pixel rectangle onto the whole viewport
///
/// Pixel (0, 0) maps to the top-left corner (-1, 1) and (width, height)
/// to the bottom-right corner (1, -1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ortho {
    pub width: f32,
    pub height: f32,
}

impl Ortho {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    #[inline]
    pub fn to_ndc(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            2.0 * p.x / self.width - 1.0,
            1.0 - 2.0 * p.y / self.height,
        )
    }
}

/// Two triangles covering `rect`, with texture coordinates spanning `uv_min..uv_max`
fn push_quad(
    out: &mut Vec<Vertex>,
    ortho: &Ortho,
    rect: &Rect,
    color: [f32; 4],
    uv_min: Vec2,
    uv_max: Vec2,
) {
    let [tl, tr, br, bl] = rect.corners().map(|c| ortho.to_ndc(c));
    let v = |p: Vec2, s: f32, t: f32| Vertex::new(p.x, p.y, s, t, color);

    out.push(v(tl, uv_min.x, uv_min.y));
    out.push(v(bl, uv_min.x, uv_max.y));
    out.push(v(tr, uv_max.x, uv_min.y));

    out.push(v(tr, uv_max.x, uv_min.y));
    out.push(v(bl, uv_min.x, uv_max.y));
    out.push(v(br, uv_max.x, uv_max.y));
}

/// Solid rectangle
pub fn quad(ortho: &Ortho, rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    push_quad(&mut vertices, ortho, rect, color, Vec2::ZERO, Vec2::ZERO);
    vertices
}

/// Line as a thin quad of the given width
pub fn line(ortho: &Ortho, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let corners = [from + perp, to + perp, from - perp, to - perp].map(|c| ortho.to_ndc(c));
    let v = |p: Vec2| Vertex::new(p.x, p.y, 0.0, 0.0, color);

    vec![
        v(corners[0]),
        v(corners[2]),
        v(corners[1]),
        v(corners[1]),
        v(corners[2]),
        v(corners[3]),
    ]
}

/// Image quad with its top-left corner at `origin`, texture mapped 0..1
pub fn textured_quad(ortho: &Ortho, origin: Vec2, size: Vec2) -> Vec<Vertex> {
    let rect = Rect::from_center(origin + 0.5 * size, size);
    let mut vertices = Vec::with_capacity(6);
    push_quad(&mut vertices, ortho, &rect, colors::WHITE, Vec2::ZERO, Vec2::ONE);
    vertices
}

/// Quad covering the whole viewport (for presenting a framebuffer)
pub fn fullscreen_quad() -> Vec<Vertex> {
    let ortho = Ortho::new(1, 1);
    textured_quad(&ortho, Vec2::ZERO, Vec2::ONE)
}

/// All solid geometry for a scene
pub fn scene_vertices(scene: &Scene) -> Vec<Vertex> {
    let ortho = Ortho::new(scene.width, scene.height);
    let mut vertices = Vec::with_capacity(6 * (scene.rects.len() + scene.lines.len()));

    for l in &scene.lines {
        vertices.extend(line(&ortho, l.from, l.to, 1.0, l.color));
    }
    for (rect, color) in &scene.rects {
        push_quad(&mut vertices, &ortho, rect, *color, Vec2::ZERO, Vec2::ZERO);
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::sim::GameState;

    fn approx(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-5 && (a[1] - b[1]).abs() < 1e-5
    }

    #[test]
    fn test_ortho_corners() {
        let ortho = Ortho::new(1280, 720);
        assert_eq!(ortho.to_ndc(Vec2::ZERO), Vec2::new(-1.0, 1.0));
        assert_eq!(ortho.to_ndc(Vec2::new(1280.0, 720.0)), Vec2::new(1.0, -1.0));
        assert_eq!(ortho.to_ndc(Vec2::new(640.0, 360.0)), Vec2::ZERO);
    }

    #[test]
    fn test_quad_covers_rect() {
        let ortho = Ortho::new(100, 100);
        let rect = Rect::from_center(Vec2::new(50.0, 50.0), Vec2::new(20.0, 10.0));
        let vertices = quad(&ortho, &rect, [1.0; 4]);
        assert_eq!(vertices.len(), 6);

        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        let min_x = xs.iter().cloned().fold(f32::MAX, f32::min);
        let max_x = xs.iter().cloned().fold(f32::MIN, f32::max);
        let min_y = ys.iter().cloned().fold(f32::MAX, f32::min);
        let max_y = ys.iter().cloned().fold(f32::MIN, f32::max);
        assert!((min_x - -0.2).abs() < 1e-5);
        assert!((max_x - 0.2).abs() < 1e-5);
        assert!((min_y - -0.1).abs() < 1e-5);
        assert!((max_y - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_fullscreen_quad_uvs() {
        let vertices = fullscreen_quad();
        assert_eq!(vertices.len(), 6);
        // Top-left of the screen samples the first texel row
        assert!(approx(vertices[0].position, [-1.0, 1.0]));
        assert!(approx(vertices[0].tex_coords, [0.0, 0.0]));
        // Bottom-right samples the last
        assert!(approx(vertices[5].position, [1.0, -1.0]));
        assert!(approx(vertices[5].tex_coords, [1.0, 1.0]));
    }

    #[test]
    fn test_vertical_line_width() {
        let ortho = Ortho::new(100, 100);
        let vertices = line(&ortho, Vec2::new(50.0, 0.0), Vec2::new(50.0, 100.0), 2.0, [1.0; 4]);
        assert_eq!(vertices.len(), 6);
        for v in &vertices {
            assert!((v.position[0].abs() - 0.02).abs() < 1e-5);
        }
        assert!(line(&ortho, Vec2::ONE, Vec2::ONE, 1.0, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_scene_vertices() {
        let state = GameState::new(&RulesConfig::default(), 0);
        let scene = Scene::from_snapshot(&state.snapshot(), 1280, 720);
        // One line and three rects, six vertices each
        assert_eq!(scene_vertices(&scene).len(), 24);
    }
}
