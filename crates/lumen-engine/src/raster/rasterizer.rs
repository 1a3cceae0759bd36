use anyhow::Result;
use glam::{Vec2, Vec3, Vec4};

use crate::render::Vertex;
use crate::stage::{ShaderProgram, Varying};

use super::config::RasterConfig;
use super::framebuffer::Framebuffer;

/// Counters for one draw call.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DrawStats {
    /// Vertex stage invocations.
    pub vertices: usize,
    /// Triangles assembled.
    pub triangles: usize,
    /// Triangles dropped by face culling or for having zero area.
    pub culled: usize,
    /// Triangles rejected against the view volume (or with every w <= 0).
    pub clipped: usize,
    /// Fragment stage invocations.
    pub fragments: usize,
}

/// Host-side triangle-list rasterizer.
///
/// Runs a `ShaderProgram` the way the fixed-function pipeline would:
/// vertex stage per vertex, primitive assembly, perspective divide, viewport
/// mapping, culling, coverage with the top-left rule over pixel centres,
/// perspective-correct interpolation, depth test, fragment stage per covered
/// pixel.
///
/// Triangles crossing the near plane (clip z = 0) are clipped in clip space
/// before the divide and drawn as one or two triangles. Triangles with every
/// vertex at w <= 0 are rejected whole.
#[derive(Debug, Clone, Default)]
pub struct Rasterizer {
    config: RasterConfig,
}

impl Rasterizer {
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }

    /// Creates a cleared target sized to the configured viewport.
    pub fn target(&self) -> Framebuffer {
        Framebuffer::new(self.config.viewport, self.config.clear_color)
    }

    /// Draws `vertices` as a triangle list.
    ///
    /// Trailing vertices that do not complete a triangle are still shaded but
    /// never assembled.
    pub fn draw<P: ShaderProgram>(
        &self,
        program: &P,
        vertices: &[Vertex],
        target: &mut Framebuffer,
    ) -> DrawStats {
        let whole = vertices.len() / 3 * 3;
        if whole != vertices.len() {
            log::warn!(
                "draw: {} trailing vertices do not form a triangle; ignored",
                vertices.len() - whole
            );
        }

        let shaded = shade_vertices(program, vertices);
        let mut stats = DrawStats { vertices: vertices.len(), ..DrawStats::default() };

        for tri in shaded[..whole].chunks_exact(3) {
            self.raster_triangle(program, [&tri[0], &tri[1], &tri[2]], target, &mut stats);
        }

        log::debug!("draw: {stats:?}");
        stats
    }

    /// Draws an indexed triangle list.
    ///
    /// Every vertex is shaded once regardless of how often it is referenced.
    /// Fails before drawing anything if an index is out of range.
    pub fn draw_indexed<P: ShaderProgram>(
        &self,
        program: &P,
        vertices: &[Vertex],
        indices: &[u32],
        target: &mut Framebuffer,
    ) -> Result<DrawStats> {
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            anyhow::bail!("index {bad} out of range for {} vertices", vertices.len());
        }

        let whole = indices.len() / 3 * 3;
        if whole != indices.len() {
            log::warn!(
                "draw_indexed: {} trailing indices do not form a triangle; ignored",
                indices.len() - whole
            );
        }

        let shaded = shade_vertices(program, vertices);
        let mut stats = DrawStats { vertices: vertices.len(), ..DrawStats::default() };

        for tri in indices[..whole].chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| &shaded[i as usize]);
            self.raster_triangle(program, [a, b, c], target, &mut stats);
        }

        log::debug!("draw_indexed: {stats:?}");
        Ok(stats)
    }

    fn raster_triangle<P: ShaderProgram>(
        &self,
        program: &P,
        tri: [&(Vec4, P::Varying); 3],
        target: &mut Framebuffer,
        stats: &mut DrawStats,
    ) {
        stats.triangles += 1;

        let clip = tri.map(|(pos, _)| *pos);
        if clip.iter().any(|c| c.is_nan())
            || clip.iter().all(|c| c.w <= 0.0)
            || outside_one_plane(&clip)
        {
            stats.clipped += 1;
            return;
        }

        if clip.iter().all(|c| c.z >= 0.0) {
            match self.fill(program, tri, target, stats) {
                Fill::Drawn => {}
                Fill::Culled => stats.culled += 1,
                Fill::Rejected => stats.clipped += 1,
            }
            return;
        }

        let poly = clip_near(tri);
        if poly.len() < 3 {
            stats.clipped += 1;
            return;
        }

        // Fan triangles of a convex polygon share its winding.
        let fills: Vec<Fill> = (1..poly.len() - 1)
            .map(|i| self.fill(program, [&poly[0], &poly[i], &poly[i + 1]], target, stats))
            .collect();
        if fills.contains(&Fill::Drawn) {
            return;
        }
        if fills.contains(&Fill::Culled) {
            stats.culled += 1;
        } else {
            stats.clipped += 1;
        }
    }

    /// Rasterizes a triangle lying on the visible side of the near plane.
    fn fill<P: ShaderProgram>(
        &self,
        program: &P,
        tri: [&(Vec4, P::Varying); 3],
        target: &mut Framebuffer,
        stats: &mut DrawStats,
    ) -> Fill {
        let clip = tri.map(|(pos, _)| *pos);
        if clip.iter().any(|c| c.w <= 0.0) {
            return Fill::Rejected;
        }

        let ndc = clip.map(|c| c.truncate() / c.w);
        let ndc_area = edge(ndc[0].truncate(), ndc[1].truncate(), ndc[2].truncate());
        if !ndc_area.is_finite() {
            return Fill::Rejected;
        }
        if ndc_area == 0.0 || !self.config.keeps(ndc_area > 0.0) {
            return Fill::Culled;
        }

        // Window space flips Y; reorder so the area is positive there.
        let viewport = target.viewport();
        let mut order = [0usize, 1, 2];
        let mut win = ndc.map(|n| viewport.ndc_to_window(n));
        let mut area = edge(win[0].truncate(), win[1].truncate(), win[2].truncate());
        if area < 0.0 {
            order.swap(1, 2);
            win.swap(1, 2);
            area = -area;
        }

        let pts = win.map(|w| w.truncate());
        let depths = Vec3::new(win[0].z, win[1].z, win[2].z);
        let inv_w = Vec3::from_array(order.map(|i| 1.0 / clip[i].w));
        let varyings = order.map(|i| &tri[i].1);

        let top_left = [
            is_top_left(pts[1], pts[2]),
            is_top_left(pts[2], pts[0]),
            is_top_left(pts[0], pts[1]),
        ];

        let lo = pts[0].min(pts[1]).min(pts[2]);
        let hi = pts[0].max(pts[1]).max(pts[2]);
        let x0 = lo.x.floor().clamp(0.0, viewport.width as f32) as u32;
        let y0 = lo.y.floor().clamp(0.0, viewport.height as f32) as u32;
        let x1 = hi.x.ceil().clamp(0.0, viewport.width as f32) as u32;
        let y1 = hi.y.ceil().clamp(0.0, viewport.height as f32) as u32;

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w = [
                    edge(pts[1], pts[2], p),
                    edge(pts[2], pts[0], p),
                    edge(pts[0], pts[1], p),
                ];
                let covered = (0..3).all(|i| w[i] > 0.0 || (w[i] == 0.0 && top_left[i]));
                if !covered {
                    continue;
                }

                let bary = Vec3::from_array(w) / area;
                let z = bary.dot(depths);
                if !(0.0..=1.0).contains(&z) {
                    continue;
                }
                if self.config.depth_test && !target.test_and_set_depth(x, y, z) {
                    continue;
                }

                let persp = bary * inv_w;
                let frag_inv_w = persp.x + persp.y + persp.z;
                let varying = <P::Varying as Varying>::interpolate(varyings, persp / frag_inv_w);

                let color = program.fragment(Vec4::new(p.x, p.y, z, frag_inv_w), &varying);
                target.write(x, y, color);
                stats.fragments += 1;
            }
        }

        log::trace!("triangle {}: {:?}", stats.triangles - 1, stats);
        Fill::Drawn
    }
}

/// Outcome of rasterizing one (possibly near-clipped) triangle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Fill {
    Drawn,
    Culled,
    Rejected,
}

/// Sutherland-Hodgman against the near plane (z >= 0) in clip space.
///
/// Returns the visible polygon in input winding order: empty, a triangle or a
/// quad. New vertices interpolate position and varyings linearly in clip space.
fn clip_near<V: Varying>(tri: [&(Vec4, V); 3]) -> Vec<(Vec4, V)> {
    let mut out = Vec::with_capacity(4);
    for i in 0..3 {
        let (a, b) = (tri[i], tri[(i + 1) % 3]);
        let (da, db) = (a.0.z, b.0.z);
        if da >= 0.0 {
            out.push(*a);
        }
        if (da >= 0.0) != (db >= 0.0) {
            let t = da / (da - db);
            out.push((
                a.0.lerp(b.0, t),
                V::interpolate([&a.1, &b.1, &a.1], Vec3::new(1.0 - t, t, 0.0)),
            ));
        }
    }
    out
}

/// Vertex stage over every vertex, in submission order.
fn shade_vertices<P: ShaderProgram>(program: &P, vertices: &[Vertex]) -> Vec<(Vec4, P::Varying)> {
    vertices.iter().map(|v| program.vertex(v)).collect()
}

/// Twice the signed area of (a, b, p); positive when p is left of a→b in a +Y up frame.
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Top-left fill rule for an edge of a positively wound window-space triangle (+Y down).
#[inline]
fn is_top_left(a: Vec2, b: Vec2) -> bool {
    let d = b - a;
    (d.y == 0.0 && d.x > 0.0) || d.y < 0.0
}

/// All three vertices beyond the same clip plane.
fn outside_one_plane(clip: &[Vec4; 3]) -> bool {
    let planes: [fn(&Vec4) -> bool; 6] = [
        |c| c.x > c.w,
        |c| c.x < -c.w,
        |c| c.y > c.w,
        |c| c.y < -c.w,
        |c| c.z > c.w,
        |c| c.z < 0.0,
    ];
    planes.iter().any(|outside| clip.iter().all(|c| outside(c)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;
    use crate::paint::Color;
    use crate::raster::CullMode;

    /// Writes the interpolated varying into the red channel.
    struct ScalarProgram;

    impl ShaderProgram for ScalarProgram {
        type Varying = f32;

        fn vertex(&self, vertex: &Vertex) -> (Vec4, f32) {
            (Vec3::from_array(vertex.pos).extend(1.0), vertex.normal[0])
        }

        fn fragment(&self, _frag_coord: Vec4, v: &f32) -> Color {
            Color::new(*v, 0.0, 0.0, 1.0)
        }
    }

    /// Takes clip w from `normal[1]` so tests can place vertices behind the eye.
    struct HomogeneousProgram;

    impl ShaderProgram for HomogeneousProgram {
        type Varying = f32;

        fn vertex(&self, vertex: &Vertex) -> (Vec4, f32) {
            (Vec3::from_array(vertex.pos).extend(vertex.normal[1]), vertex.normal[0])
        }

        fn fragment(&self, _frag_coord: Vec4, v: &f32) -> Color {
            Color::new(*v, 0.0, 0.0, 1.0)
        }
    }

    fn v(x: f32, y: f32, z: f32) -> Vertex {
        Vertex::new([x, y, z], [0.0; 3])
    }

    fn raster(w: u32, h: u32) -> Rasterizer {
        Rasterizer::new(RasterConfig::default().with_viewport(w, h))
    }

    // ── helpers ───────────────────────────────────────────────────────────

    #[test]
    fn edge_sign_follows_winding() {
        let (a, b, c) = (Vec2::ZERO, Vec2::X, Vec2::Y);
        assert!(edge(a, b, c) > 0.0);
        assert!(edge(a, c, b) < 0.0);
    }

    #[test]
    fn top_and_left_edges() {
        assert!(is_top_left(Vec2::ZERO, Vec2::X)); // top
        assert!(is_top_left(Vec2::Y, Vec2::ZERO)); // left
        assert!(!is_top_left(Vec2::X, Vec2::Y)); // right
        assert!(!is_top_left(Vec2::X, Vec2::ZERO)); // bottom
    }

    #[test]
    fn plane_rejection() {
        let right = [Vec4::new(2.0, 0.0, 0.5, 1.0), Vec4::new(3.0, 1.0, 0.5, 1.0), Vec4::new(2.5, -1.0, 0.5, 1.0)];
        assert!(outside_one_plane(&right));
        let straddle = [Vec4::new(-2.0, 0.0, 0.5, 1.0), Vec4::new(3.0, 0.0, 0.5, 1.0), Vec4::new(0.0, 1.0, 0.5, 1.0)];
        assert!(!outside_one_plane(&straddle));
    }

    // ── coverage ──────────────────────────────────────────────────────────

    #[test]
    fn full_screen_pair_covers_every_pixel_once() {
        let r = raster(7, 5);
        let mut fb = r.target();
        let quad = [
            v(-1.0, -1.0, 0.0), v(1.0, -1.0, 0.0), v(1.0, 1.0, 0.0),
            v(-1.0, -1.0, 0.0), v(1.0, 1.0, 0.0), v(-1.0, 1.0, 0.0),
        ];
        let stats = r.draw(&crate::stage::FlatProgram::default(), &quad, &mut fb);
        // Shared diagonal: the fill rule must not double-shade any pixel.
        assert_eq!(stats.fragments, 35);
        assert!(fb.pixels().iter().all(|&c| c == Color::RED));
    }

    #[test]
    fn back_face_is_culled() {
        let r = raster(8, 8);
        let mut fb = r.target();
        let cw = [v(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0), v(1.0, 0.0, 0.0)];
        let stats = r.draw(&ScalarProgram, &cw, &mut fb);
        assert_eq!(stats.culled, 1);
        assert_eq!(stats.fragments, 0);
    }

    #[test]
    fn back_face_drawn_without_culling() {
        let r = Rasterizer::new(
            RasterConfig::default().with_viewport(8, 8).with_cull_mode(CullMode::None),
        );
        let mut fb = r.target();
        let cw = [v(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0), v(1.0, 0.0, 0.0)];
        let stats = r.draw(&ScalarProgram, &cw, &mut fb);
        assert_eq!(stats.culled, 0);
        assert!(stats.fragments > 0);
    }

    #[test]
    fn degenerate_triangle_is_culled() {
        let r = raster(8, 8);
        let mut fb = r.target();
        let line = [v(0.0, 0.0, 0.0), v(0.5, 0.5, 0.0), v(1.0, 1.0, 0.0)];
        assert_eq!(r.draw(&ScalarProgram, &line, &mut fb).culled, 1);
    }

    #[test]
    fn offscreen_triangle_is_clipped() {
        let r = raster(8, 8);
        let mut fb = r.target();
        let tri = [v(2.0, 0.0, 0.0), v(3.0, 0.0, 0.0), v(2.0, 1.0, 0.0)];
        let stats = r.draw(&ScalarProgram, &tri, &mut fb);
        assert_eq!(stats.clipped, 1);
        assert_eq!(stats.fragments, 0);
    }

    #[test]
    fn trailing_vertices_are_ignored() {
        let r = raster(8, 8);
        let mut fb = r.target();
        let verts = [
            v(-1.0, -1.0, 0.0), v(1.0, -1.0, 0.0), v(1.0, 1.0, 0.0),
            v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0),
        ];
        let stats = r.draw(&ScalarProgram, &verts, &mut fb);
        assert_eq!(stats.vertices, 5);
        assert_eq!(stats.triangles, 1);
    }

    // ── near plane ────────────────────────────────────────────────────────

    #[test]
    fn one_vertex_behind_near_plane_clips_to_quad() {
        let a = (Vec4::new(-1.0, -1.0, 0.5, 1.0), 0.0);
        let b = (Vec4::new(1.0, -1.0, 0.5, 1.0), 0.0);
        let c = (Vec4::new(0.0, 1.0, -0.5, -0.5), 1.0);
        let poly = clip_near([&a, &b, &c]);

        assert_eq!(poly.len(), 4);
        assert_eq!(poly[0], a);
        assert_eq!(poly[1], b);
        assert_eq!(poly[2], (Vec4::new(0.5, 0.0, 0.0, 0.25), 0.5));
        assert_eq!(poly[3], (Vec4::new(-0.5, 0.0, 0.0, 0.25), 0.5));
    }

    #[test]
    fn two_vertices_behind_near_plane_clip_to_triangle() {
        let a = (Vec4::new(0.0, 0.0, 1.0, 2.0), 1.0);
        let b = (Vec4::new(1.0, 0.0, -1.0, -1.0), 0.0);
        let c = (Vec4::new(0.0, 1.0, -1.0, -1.0), 0.0);
        let poly = clip_near([&a, &b, &c]);

        assert_eq!(poly.len(), 3);
        assert_eq!(poly[0], a);
        assert!(poly.iter().all(|(pos, _)| pos.z >= 0.0));
        assert_eq!(poly[1].1, 0.5);
    }

    #[test]
    fn triangle_crossing_near_plane_is_drawn_in_front() {
        let r = raster(4, 4);
        let mut fb = r.target();
        // Third vertex sits behind the eye (w < 0); the visible part is the
        // lower half of the viewport.
        let tri = [
            Vertex::new([-1.0, -1.0, 0.5], [0.0, 1.0, 0.0]),
            Vertex::new([1.0, -1.0, 0.5], [0.0, 1.0, 0.0]),
            Vertex::new([0.0, 1.0, -0.5], [1.0, -0.5, 0.0]),
        ];
        let stats = r.draw(&HomogeneousProgram, &tri, &mut fb);

        assert_eq!(stats.clipped, 0);
        assert_eq!(stats.culled, 0);
        assert_eq!(stats.fragments, 8);
        for x in 0..4 {
            assert_eq!(fb.pixel(x, 0), Some(Color::WHITE));
            assert_eq!(fb.pixel(x, 1), Some(Color::WHITE));
            assert_ne!(fb.pixel(x, 3), Some(Color::WHITE));
        }
    }

    #[test]
    fn triangle_entirely_behind_eye_is_clipped() {
        let r = raster(4, 4);
        let mut fb = r.target();
        let tri = [
            Vertex::new([-1.0, -1.0, -0.5], [0.0, -1.0, 0.0]),
            Vertex::new([1.0, -1.0, -0.5], [0.0, -1.0, 0.0]),
            Vertex::new([0.0, 1.0, -0.5], [0.0, -1.0, 0.0]),
        ];
        let stats = r.draw(&HomogeneousProgram, &tri, &mut fb);
        assert_eq!(stats.clipped, 1);
        assert_eq!(stats.fragments, 0);
    }

    // ── interpolation ─────────────────────────────────────────────────────

    #[test]
    fn varying_interpolates_linearly_at_w_one() {
        let r = Rasterizer::new(
            RasterConfig::default().with_viewport(4, 4).with_cull_mode(CullMode::None),
        );
        let mut fb = r.target();
        // Varying equals NDC x + 1 halved, so 0 at the left edge and 1 at the right.
        let vert = |x: f32, y: f32| Vertex::new([x, y, 0.0], [(x + 1.0) * 0.5, 0.0, 0.0]);
        let quad = [
            vert(-1.0, -1.0), vert(1.0, -1.0), vert(1.0, 1.0),
            vert(-1.0, -1.0), vert(1.0, 1.0), vert(-1.0, 1.0),
        ];
        r.draw(&ScalarProgram, &quad, &mut fb);
        for (x, expected) in [(0, 0.125), (1, 0.375), (2, 0.625), (3, 0.875)] {
            let got = fb.pixel(x, 2).unwrap().r;
            assert!((got - expected).abs() < 1e-5, "x={x}: {got} != {expected}");
        }
    }

    // ── depth ─────────────────────────────────────────────────────────────

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let r = raster(4, 4);
        let full = |z: f32, tag: f32| {
            [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
                .map(|(x, y)| Vertex::new([x, y, z], [tag, 0.0, 0.0]))
        };
        let mut verts = full(0.25, 0.5).to_vec();
        verts.extend(full(0.75, 1.0));

        let mut fb = r.target();
        r.draw(&ScalarProgram, &verts, &mut fb);
        assert!((fb.pixel(1, 1).unwrap().r - 0.5).abs() < 1e-5);
        assert!((fb.depth(1, 1).unwrap() - 0.25).abs() < 1e-5);
    }

    #[test]
    fn depth_outside_unit_range_is_dropped() {
        let r = raster(4, 4);
        let mut fb = r.target();
        // z straddles the far plane only for part of the surface.
        let tri = [v(-1.0, -1.0, 0.5), v(1.0, -1.0, 1.5), v(-1.0, 1.0, 0.5)];
        let stats = r.draw(&ScalarProgram, &tri, &mut fb);
        assert_eq!(stats.clipped, 0);
        assert!(stats.fragments > 0);
        // NDC (-0.75, -0.75) sits at depth 0.625, NDC (0.25, -0.75) at 1.125.
        assert_eq!(fb.pixel(0, 3), Some(Color::BLACK));
        assert_eq!(fb.pixel(2, 3), Some(Color::WHITE));
    }

    // ── indexed ───────────────────────────────────────────────────────────

    #[test]
    fn indexed_quad_matches_list() {
        let r = raster(6, 6);
        let corners = [v(-1.0, -1.0, 0.0), v(1.0, -1.0, 0.0), v(1.0, 1.0, 0.0), v(-1.0, 1.0, 0.0)];
        let mut fb = r.target();
        let stats = r
            .draw_indexed(&crate::stage::FlatProgram::default(), &corners, &[0, 1, 2, 0, 2, 3], &mut fb)
            .unwrap();
        assert_eq!(stats.vertices, 4);
        assert_eq!(stats.fragments, 36);
    }

    #[test]
    fn out_of_range_index_fails_without_drawing() {
        let r = raster(4, 4);
        let mut fb = r.target();
        let before = fb.clone();
        let err = r
            .draw_indexed(&ScalarProgram, &[v(0.0, 0.0, 0.0)], &[0, 0, 3], &mut fb)
            .unwrap_err();
        assert!(err.to_string().contains("index 3"));
        assert_eq!(fb, before);
    }

    #[test]
    fn invalid_viewport_draws_nothing() {
        let r = Rasterizer::default();
        let mut fb = Framebuffer::new(Viewport::new(0, 0), Color::WHITE);
        let tri = [v(-1.0, -1.0, 0.0), v(1.0, -1.0, 0.0), v(0.0, 1.0, 0.0)];
        assert_eq!(r.draw(&ScalarProgram, &tri, &mut fb).fragments, 0);
    }
}
