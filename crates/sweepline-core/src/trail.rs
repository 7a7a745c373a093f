//! Sweeping trail: a ribbon mesh swept by a moving line segment.
//!
//! The logical segment sequence is `[header, fixed[0..n], tail]`, where
//! `fixed` is ordered newest first. The header is supplied by the caller
//! every frame and is committed into `fixed` each time the cooldown timer
//! passes its threshold. The tail slides toward the oldest fixed segment and
//! evicts it once the quad between them has fully collapsed.
//!
//! ```text
//!  header   fixed[0]          fixed[n-1]   tail
//!  v1 ------ v1 ----- .... ----- v1 ------ v1
//!  |         |                   |         |
//!  v2 ------ v2 ----- .... ----- v2 ------ v2
//!  u = 0                                   u = 1
//!  <------------- sweeping direction
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use sweepline_platform::{BufferId, GpuDevice};
use tracing::{debug, error, warn};

use crate::config::TrailPreset;
use crate::error::TrailError;
use crate::math::{cubic_hermite, lerp};
use crate::pool::GpuVertexPool;
use crate::segment::{LineSegment, TrailVertex};

/// Two triangles per sub-quad.
const QUAD_VERTEX_COUNT: u32 = 6;

/// What a renderer needs to issue the trail's draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub buffer: BufferId,
    pub vertex_count: u32,
}

#[derive(Debug)]
pub struct SweepingTrail {
    name: String,
    pool: Option<GpuVertexPool>,
    free_header: LineSegment,
    fixed_segments: VecDeque<LineSegment>,
    free_tail_start: LineSegment,
    free_tail_tangent1: Vec3,
    free_tail_tangent2: Vec3,
    header_cool_down_timer: f32,
    header_cool_down_threshold: f32,
    max_segment_lifetime: f32,
    tail_quad_collapsing_ratio: f32,
    interpolation_step_count: u32,
    cubic_hermite_tangent_scale: f32,
    tangent_list: Vec<(Vec3, Vec3)>,
    last_drawn_vertex_count: u32,
    scratch: Vec<TrailVertex>,
}

impl Default for SweepingTrail {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepingTrail {
    /// Creates a trail without a vertex buffer. It becomes drawable once the
    /// owning [`SweepingTrailManager`](crate::SweepingTrailManager) initializes it.
    pub fn new() -> Self {
        let preset = TrailPreset::default();
        Self {
            name: String::new(),
            pool: None,
            free_header: LineSegment::default(),
            fixed_segments: VecDeque::new(),
            free_tail_start: LineSegment::default(),
            free_tail_tangent1: Vec3::ZERO,
            free_tail_tangent2: Vec3::ZERO,
            header_cool_down_timer: 0.0,
            header_cool_down_threshold: preset.header_cool_down_threshold,
            max_segment_lifetime: preset.max_segment_lifetime,
            tail_quad_collapsing_ratio: 0.0,
            interpolation_step_count: preset.interpolation_step_count,
            cubic_hermite_tangent_scale: preset.cubic_hermite_tangent_scale,
            tangent_list: Vec::new(),
            last_drawn_vertex_count: 0,
            scratch: Vec::new(),
        }
    }

    /// Allocates the vertex buffer. Capacity is fixed from here on.
    pub(crate) fn initialize(
        &mut self,
        device: Arc<dyn GpuDevice>,
        name: &str,
        max_vertex_count: u32,
    ) -> Result<(), TrailError> {
        let pool = GpuVertexPool::new(device, name, max_vertex_count)?;
        self.name = name.to_owned();
        self.pool = Some(pool);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the live header. Degenerate segments are the caller's concern.
    pub fn set_header(&mut self, segment: LineSegment) {
        self.free_header = segment;
    }

    pub fn header(&self) -> LineSegment {
        self.free_header
    }

    pub fn header_center(&self) -> Vec3 {
        self.free_header.center()
    }

    pub fn set_header_cool_down_threshold(&mut self, duration: f32) {
        if !duration.is_finite() || duration <= 0.0 {
            warn!(trail = %self.name, duration, "rejected header cooldown threshold");
            return;
        }
        self.header_cool_down_threshold = duration;
    }

    pub fn header_cool_down_threshold(&self) -> f32 {
        self.header_cool_down_threshold
    }

    pub fn set_max_lifetime_of_segment(&mut self, duration: f32) {
        if !duration.is_finite() || duration <= 0.0 {
            warn!(trail = %self.name, duration, "rejected max segment lifetime");
            return;
        }
        self.max_segment_lifetime = duration;
    }

    pub fn max_lifetime_of_segment(&self) -> f32 {
        self.max_segment_lifetime
    }

    /// Sub-quads generated between each pair of adjacent segments. Zero is
    /// coerced to one.
    pub fn set_interpolation_step_count(&mut self, count: u32) {
        self.interpolation_step_count = count.max(1);
    }

    pub fn interpolation_step_count(&self) -> u32 {
        self.interpolation_step_count
    }

    pub fn set_cubic_hermite_tangent_scale(&mut self, scale: f32) {
        if !scale.is_finite() {
            warn!(trail = %self.name, scale, "rejected tangent scale");
            return;
        }
        self.cubic_hermite_tangent_scale = scale;
    }

    pub fn cubic_hermite_tangent_scale(&self) -> f32 {
        self.cubic_hermite_tangent_scale
    }

    pub fn apply_preset(&mut self, preset: &TrailPreset) {
        self.set_header_cool_down_threshold(preset.header_cool_down_threshold);
        self.set_max_lifetime_of_segment(preset.max_segment_lifetime);
        self.set_interpolation_step_count(preset.interpolation_step_count);
        self.set_cubic_hermite_tangent_scale(preset.cubic_hermite_tangent_scale);
    }

    /// Advances aging and tail collapse, then regenerates the vertex stream
    /// and uploads it. Call once per frame before submitting the draw.
    pub fn update(&mut self, delta_time: f32) {
        let delta_time = if delta_time.is_finite() && delta_time >= 0.0 {
            delta_time
        } else {
            warn!(trail = %self.name, delta_time, "ignoring invalid frame delta");
            0.0
        };

        if self.fixed_segments.is_empty() {
            self.seed_history();
        } else {
            self.header_cool_down_timer += delta_time;
            self.cool_down_header();
        }
        self.move_and_collapse_tail();
        self.regenerate_vertices();
    }

    pub fn is_renderable(&self) -> bool {
        !self.fixed_segments.is_empty()
    }

    pub fn last_drawn_vertex_count(&self) -> u32 {
        self.last_drawn_vertex_count
    }

    pub fn vertex_capacity(&self) -> u32 {
        self.pool.as_ref().map_or(0, GpuVertexPool::max_vertex_count)
    }

    pub fn draw_call(&self) -> Option<DrawCall> {
        let pool = self.pool.as_ref()?;
        if !self.is_renderable() || self.last_drawn_vertex_count == 0 {
            return None;
        }
        Some(DrawCall {
            buffer: pool.buffer(),
            vertex_count: self.last_drawn_vertex_count,
        })
    }

    pub fn fixed_segment_count(&self) -> usize {
        self.fixed_segments.len()
    }

    pub fn collapsing_ratio(&self) -> f32 {
        self.tail_quad_collapsing_ratio
    }

    pub fn cool_down_timer(&self) -> f32 {
        self.header_cool_down_timer
    }

    /// Tangent pairs from the last update, parallel to [`Self::segment_list`].
    pub fn tangent_list(&self) -> &[(Vec3, Vec3)] {
        &self.tangent_list
    }

    /// Header, fixed segments newest first, then the tail.
    pub fn segment_list(&self) -> Vec<LineSegment> {
        let mut list = Vec::with_capacity(self.fixed_segments.len() + 2);
        list.push(self.free_header);
        list.extend(self.fixed_segments.iter().copied());
        list.push(self.free_tail_start);
        list
    }

    fn seed_history(&mut self) {
        self.fixed_segments.push_back(self.free_header);
        self.free_tail_start = self.free_header;
        self.free_tail_tangent1 = Vec3::ZERO;
        self.free_tail_tangent2 = Vec3::ZERO;
        self.header_cool_down_timer = 0.0;
        self.tail_quad_collapsing_ratio = 0.0;
        debug!(trail = %self.name, "history seeded from header");
    }

    fn cool_down_header(&mut self) {
        if self.header_cool_down_timer >= self.header_cool_down_threshold {
            self.fixed_segments.push_front(self.free_header);
            self.header_cool_down_timer = 0.0;
            debug!(
                trail = %self.name,
                fixed = self.fixed_segments.len(),
                "header cooled down"
            );
        }
    }

    // The last quad collapses over exactly one cooldown period, so the tail
    // reaches the oldest fixed segment when that segment's life timer equals
    // the max lifetime and its u coordinate is 1.
    fn move_and_collapse_tail(&mut self) {
        let fixed_count = self.fixed_segments.len();
        if fixed_count == 0 {
            return;
        }

        let tail_life = self.life_timer(fixed_count + 1);
        let ratio = (tail_life - self.max_segment_lifetime) / self.header_cool_down_threshold;
        self.tail_quad_collapsing_ratio = if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, 1.0)
        };

        if self.tail_quad_collapsing_ratio >= 1.0 {
            self.estimate_tangents();
            let (tangent1, tangent2) = self.tangent_list[fixed_count];
            if let Some(oldest) = self.fixed_segments.pop_back() {
                self.free_tail_start = oldest;
            }
            self.free_tail_tangent1 = tangent1;
            self.free_tail_tangent2 = tangent2;
            self.tail_quad_collapsing_ratio = 0.0;
            debug!(
                trail = %self.name,
                fixed = self.fixed_segments.len(),
                "tail collapsed, oldest segment evicted"
            );
        }
    }

    /// Elapsed life of the segment at a logical index. The header is always 0.
    fn life_timer(&self, index: usize) -> f32 {
        if index == 0 {
            return 0.0;
        }
        self.header_cool_down_timer + (index - 1) as f32 * self.header_cool_down_threshold
    }

    fn logical_segment(&self, index: usize) -> LineSegment {
        if index == 0 {
            return self.free_header;
        }
        if index == self.fixed_segments.len() + 1 {
            return self.free_tail_start;
        }
        self.fixed_segments
            .get(index - 1)
            .copied()
            .unwrap_or(self.free_header)
    }

    fn estimate_tangents(&mut self) {
        let fixed_count = self.fixed_segments.len();
        let scale = self.cubic_hermite_tangent_scale;
        let tangent = |front: LineSegment, back: LineSegment| {
            ((back.vert1 - front.vert1) * scale, (back.vert2 - front.vert2) * scale)
        };

        let mut tangents = std::mem::take(&mut self.tangent_list);
        tangents.clear();
        tangents.push(tangent(self.logical_segment(0), self.logical_segment(1)));
        for i in 1..=fixed_count {
            tangents.push(tangent(self.logical_segment(i - 1), self.logical_segment(i + 1)));
        }
        // Carried over from the last collapse so the tail keeps its trajectory.
        tangents.push((self.free_tail_tangent1, self.free_tail_tangent2));
        self.tangent_list = tangents;
    }

    fn regenerate_vertices(&mut self) {
        self.estimate_tangents();

        if self.fixed_segments.is_empty() {
            self.last_drawn_vertex_count = 0;
            return;
        }
        let Some(pool) = self.pool.as_ref() else {
            return;
        };

        let region_vertex_count = self.interpolation_step_count.saturating_mul(QUAD_VERTEX_COUNT);
        let max_start_vertex = pool.max_vertex_count().checked_sub(region_vertex_count);
        let region_count = self.fixed_segments.len() + 1;

        let mut scratch = std::mem::take(&mut self.scratch);
        let mut truncated = false;
        let result = pool.write_frame(|writer| {
            for region in 0..region_count {
                match max_start_vertex {
                    Some(max_start) if writer.written() <= max_start => {}
                    _ => {
                        truncated = true;
                        break;
                    }
                }
                scratch.clear();
                self.generate_region(region, region + 1 == region_count, &mut scratch);
                if !writer.push_slice(&scratch) {
                    truncated = true;
                    break;
                }
            }
        });

        match result {
            Ok(written) => {
                self.last_drawn_vertex_count = written;
                if truncated {
                    warn!(
                        trail = %self.name,
                        written,
                        capacity = self.vertex_capacity(),
                        "vertex pool full, trail truncated"
                    );
                }
            }
            Err(err) => {
                error!(trail = %self.name, %err, "failed to update trail vertices");
            }
        }
        self.scratch = scratch;
    }

    /// Hermite-interpolated strip between logical segments `front` and
    /// `front + 1`. The last region is shortened by the collapsing ratio.
    fn generate_region(&self, front: usize, is_last: bool, out: &mut Vec<TrailVertex>) {
        let front_seg = self.logical_segment(front);
        let back_seg = self.logical_segment(front + 1);
        let (front_tan1, front_tan2) = self.tangent_list[front];
        let (back_tan1, back_tan2) = self.tangent_list[front + 1];

        let collapsing = if is_last {
            self.tail_quad_collapsing_ratio
        } else {
            0.0
        };
        let front_u = self.life_timer(front) / self.max_segment_lifetime;
        let back_u = self.life_timer(front + 1) / self.max_segment_lifetime;

        let rail1 = |t: f32| cubic_hermite(front_seg.vert1, back_seg.vert1, front_tan1, back_tan1, t);
        let rail2 = |t: f32| cubic_hermite(front_seg.vert2, back_seg.vert2, front_tan2, back_tan2, t);

        let steps = self.interpolation_step_count;
        let unit = 1.0 / steps as f32;
        for step in 0..steps {
            let t_front = (1.0 - collapsing) * step as f32 * unit;
            let t_back = (1.0 - collapsing) * (step + 1) as f32 * unit;

            let front1 = rail1(t_front);
            let front2 = rail2(t_front);
            let back1 = rail1(t_back);
            let back2 = rail2(t_back);
            let u_front = lerp(front_u, back_u, t_front);
            let u_back = lerp(front_u, back_u, t_back);

            out.extend_from_slice(&[
                TrailVertex::new(front1, Vec2::new(u_front, 0.0)),
                TrailVertex::new(back1, Vec2::new(u_back, 0.0)),
                TrailVertex::new(front2, Vec2::new(u_front, 1.0)),
                TrailVertex::new(front2, Vec2::new(u_front, 1.0)),
                TrailVertex::new(back1, Vec2::new(u_back, 0.0)),
                TrailVertex::new(back2, Vec2::new(u_back, 1.0)),
            ]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sweepline_platform::HeadlessDevice;

    fn header() -> LineSegment {
        LineSegment::new(Vec3::new(0.0, -10.0, 0.0), Vec3::new(0.0, 10.0, 0.0))
    }

    fn initialized(capacity: u32) -> (Arc<HeadlessDevice>, SweepingTrail) {
        let device = Arc::new(HeadlessDevice::new());
        let mut trail = SweepingTrail::new();
        trail.initialize(device.clone(), "test", capacity).unwrap();
        trail.set_header_cool_down_threshold(50.0);
        trail.set_max_lifetime_of_segment(200.0);
        trail.set_interpolation_step_count(10);
        trail.set_cubic_hermite_tangent_scale(0.7);
        trail.set_header(header());
        (device, trail)
    }

    fn read_vertices(device: &HeadlessDevice, trail: &SweepingTrail) -> Vec<TrailVertex> {
        let call = trail.draw_call().unwrap();
        let bytes = device.read_buffer(call.buffer).unwrap();
        bytes
            .chunks_exact(std::mem::size_of::<TrailVertex>())
            .take(call.vertex_count as usize)
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }

    #[test]
    fn zero_step_count_is_coerced_to_one() {
        let mut trail = SweepingTrail::new();
        trail.set_interpolation_step_count(0);
        assert_eq!(trail.interpolation_step_count(), 1);
    }

    #[test]
    fn first_update_seeds_history() {
        let (_device, mut trail) = initialized(1000);
        assert!(!trail.is_renderable());
        trail.update(10.0);
        assert!(trail.is_renderable());
        assert_eq!(trail.fixed_segment_count(), 1);
        assert_eq!(trail.cool_down_timer(), 0.0);
        assert_eq!(trail.segment_list(), vec![header(), header(), header()]);
        assert_eq!(trail.tangent_list().last(), Some(&(Vec3::ZERO, Vec3::ZERO)));
    }

    #[test]
    fn five_updates_leave_one_fixed_segment() {
        let (_device, mut trail) = initialized(1000);
        for _ in 0..5 {
            trail.update(10.0);
        }
        assert_eq!(trail.fixed_segment_count(), 1);
        assert!(trail.is_renderable());
    }

    #[test]
    fn header_commits_once_per_threshold() {
        let (_device, mut trail) = initialized(1000);
        trail.update(10.0);
        for _ in 0..4 {
            trail.update(10.0);
            assert_eq!(trail.fixed_segment_count(), 1);
        }
        let moved = LineSegment::new(Vec3::new(5.0, -10.0, 0.0), Vec3::new(5.0, 10.0, 0.0));
        trail.set_header(moved);
        trail.update(10.0);
        assert_eq!(trail.fixed_segment_count(), 2);
        assert_eq!(trail.segment_list()[1], moved);
        assert!(trail.cool_down_timer() < trail.header_cool_down_threshold());
    }

    #[test]
    fn large_delta_commits_a_single_segment() {
        let (_device, mut trail) = initialized(1000);
        trail.update(0.0);
        trail.update(10_000.0);
        assert_eq!(trail.fixed_segment_count(), 2);
        assert_eq!(trail.cool_down_timer(), 0.0);
        assert!((0.0..=1.0).contains(&trail.collapsing_ratio()));
    }

    #[test]
    fn vertex_count_covers_every_region() {
        let (_device, mut trail) = initialized(1000);
        trail.update(10.0);
        // header -> fixed[0] -> tail
        assert_eq!(trail.last_drawn_vertex_count(), 2 * 10 * 6);
    }

    #[test]
    fn interior_tangents_use_neighbours() {
        let (_device, mut trail) = initialized(2000);
        for frame in 0..16 {
            let x = frame as f32;
            trail.set_header(LineSegment::new(
                Vec3::new(x, -10.0, x * 0.5),
                Vec3::new(x, 10.0, -x),
            ));
            trail.update(10.0);
        }
        let segments = trail.segment_list();
        let tangents = trail.tangent_list();
        assert_eq!(segments.len(), tangents.len());
        assert!(segments.len() >= 4);

        let scale = 0.7;
        let first = (segments[1].vert1 - segments[0].vert1) * scale;
        assert!(tangents[0].0.abs_diff_eq(first, 1e-4));
        for i in 1..segments.len() - 1 {
            let t1 = (segments[i + 1].vert1 - segments[i - 1].vert1) * scale;
            let t2 = (segments[i + 1].vert2 - segments[i - 1].vert2) * scale;
            assert!(tangents[i].0.abs_diff_eq(t1, 1e-4));
            assert!(tangents[i].1.abs_diff_eq(t2, 1e-4));
        }
    }

    #[test]
    fn header_vertices_start_at_u_zero() {
        let (device, mut trail) = initialized(1000);
        trail.update(10.0);
        let vertices = read_vertices(&device, &trail);
        assert_eq!(vertices[0].texcoord(), Vec2::new(0.0, 0.0));
        assert_eq!(vertices[2].texcoord(), Vec2::new(0.0, 1.0));
        assert_eq!(vertices[0].color, [0.0, 0.0, 0.0, 1.0]);
        assert!(vertices[0].position().abs_diff_eq(header().vert1, 1e-5));
        assert!(vertices[2].position().abs_diff_eq(header().vert2, 1e-5));
    }

    #[test]
    fn quad_winding_reuses_shared_corners() {
        let (device, mut trail) = initialized(1000);
        trail.update(10.0);
        let vertices = read_vertices(&device, &trail);
        for quad in vertices.chunks_exact(6) {
            assert_eq!(quad[2], quad[3]);
            assert_eq!(quad[1], quad[4]);
        }
    }

    fn orbit(frame: u32) -> LineSegment {
        let angle = frame as f32 * 0.2;
        LineSegment::new(
            Vec3::new(10.0 * angle.sin(), 0.0, 10.0 * angle.cos()),
            Vec3::new(5.0 * angle.sin(), 0.0, 5.0 * angle.cos()),
        )
    }

    fn run_orbit(trail: &mut SweepingTrail, frames: u32) {
        for frame in 0..frames {
            trail.set_header(orbit(frame));
            trail.update(10.0);
        }
    }

    #[test]
    fn sub_quad_corners_follow_hermite_rails() {
        let (device, mut trail) = initialized(1000);
        run_orbit(&mut trail, 16);
        assert_eq!(trail.fixed_segment_count(), 4);
        assert_eq!(trail.collapsing_ratio(), 0.0);

        let segments = trail.segment_list();
        let tangents = trail.tangent_list();
        let vertices = read_vertices(&device, &trail);

        let (region, step) = (1, 3);
        let base = region * 60 + step * 6;
        let unit = 1.0 / 10.0;
        let t_front = step as f32 * unit;
        let t_back = (step + 1) as f32 * unit;
        let (front, back) = (segments[region], segments[region + 1]);
        let (front_tan, back_tan) = (tangents[region], tangents[region + 1]);

        let rail1 = |t| cubic_hermite(front.vert1, back.vert1, front_tan.0, back_tan.0, t);
        let rail2 = |t| cubic_hermite(front.vert2, back.vert2, front_tan.1, back_tan.1, t);
        assert!(vertices[base].position().abs_diff_eq(rail1(t_front), 1e-4));
        assert!(vertices[base + 1].position().abs_diff_eq(rail1(t_back), 1e-4));
        assert!(vertices[base + 2].position().abs_diff_eq(rail2(t_front), 1e-4));
        assert!(vertices[base + 5].position().abs_diff_eq(rail2(t_back), 1e-4));

        // A straight chord would land elsewhere on this bend.
        let chord = front.vert1.lerp(back.vert1, t_back);
        assert!(!vertices[base + 1].position().abs_diff_eq(chord, 1e-3));
    }

    #[test]
    fn collapsing_region_stops_short_of_the_tail() {
        let (device, mut trail) = initialized(1000);
        run_orbit(&mut trail, 23);
        let ratio = trail.collapsing_ratio();
        assert_relative_eq!(ratio, 0.4, epsilon = 1e-5);

        let segments = trail.segment_list();
        let tangents = trail.tangent_list();
        let vertices = read_vertices(&device, &trail);
        let n = trail.fixed_segment_count();
        let (front, tail) = (segments[n], segments[n + 1]);
        let (front_tan, tail_tan) = (tangents[n], tangents[n + 1]);
        let t_end = (1.0 - ratio) * 10.0 * (1.0 / 10.0);

        let back1 = vertices[vertices.len() - 2].position();
        let back2 = vertices[vertices.len() - 1].position();
        let expected1 = cubic_hermite(front.vert1, tail.vert1, front_tan.0, tail_tan.0, t_end);
        let expected2 = cubic_hermite(front.vert2, tail.vert2, front_tan.1, tail_tan.1, t_end);
        assert!(back1.abs_diff_eq(expected1, 1e-4));
        assert!(back2.abs_diff_eq(expected2, 1e-4));
        assert!(!back2.abs_diff_eq(tail.vert2, 1e-3));
    }

    #[test]
    fn emptied_history_stops_drawing_until_reseeded() {
        let (_device, mut trail) = initialized(1000);
        trail.set_max_lifetime_of_segment(10.0);
        trail.update(10.0);
        assert_eq!(trail.fixed_segment_count(), 1);

        trail.update(10.0);
        assert_eq!(trail.fixed_segment_count(), 0);
        assert!(!trail.is_renderable());
        assert_eq!(trail.last_drawn_vertex_count(), 0);
        assert!(trail.draw_call().is_none());
        assert_eq!(trail.segment_list().len(), 2);

        trail.update(10.0);
        assert_eq!(trail.fixed_segment_count(), 1);
        assert!(trail.is_renderable());
        assert_eq!(trail.last_drawn_vertex_count(), 120);
        assert!(trail.draw_call().is_some());
    }

    #[test]
    fn small_pool_truncates_whole_regions() {
        let (_device, mut trail) = initialized(100);
        trail.update(10.0);
        assert_eq!(trail.last_drawn_vertex_count(), 60);

        let (_device, mut tiny) = initialized(59);
        tiny.update(10.0);
        assert_eq!(tiny.last_drawn_vertex_count(), 0);
        assert!(tiny.draw_call().is_none());
    }

    #[test]
    fn map_failure_keeps_previous_frame() {
        let (device, mut trail) = initialized(1000);
        trail.update(10.0);
        let buffer = trail.draw_call().unwrap().buffer;
        let before = device.read_buffer(buffer).unwrap();

        device.fail_next_maps(1);
        trail.set_header(LineSegment::new(Vec3::splat(3.0), Vec3::splat(4.0)));
        trail.update(10.0);
        assert_eq!(trail.last_drawn_vertex_count(), 120);
        assert_eq!(device.read_buffer(buffer).unwrap(), before);
        assert_eq!(trail.cool_down_timer(), 10.0);
        assert!(!device.is_mapped(buffer));
    }

    #[test]
    fn degenerate_settings_are_rejected() {
        let mut trail = SweepingTrail::new();
        trail.set_header_cool_down_threshold(0.0);
        trail.set_header_cool_down_threshold(f32::NAN);
        trail.set_max_lifetime_of_segment(-1.0);
        trail.set_cubic_hermite_tangent_scale(f32::INFINITY);
        assert_eq!(trail.header_cool_down_threshold(), 20.0);
        assert_eq!(trail.max_lifetime_of_segment(), 1000.0);
        assert_eq!(trail.cubic_hermite_tangent_scale(), 0.5);
    }

    #[test]
    fn uninitialized_trail_updates_without_a_buffer() {
        let mut trail = SweepingTrail::new();
        trail.set_header(header());
        trail.update(10.0);
        assert!(trail.is_renderable());
        assert_eq!(trail.vertex_capacity(), 0);
        assert_eq!(trail.last_drawn_vertex_count(), 0);
        assert!(trail.draw_call().is_none());
    }

    #[test]
    fn invalid_delta_is_treated_as_zero() {
        let (_device, mut trail) = initialized(1000);
        trail.update(10.0);
        trail.update(10.0);
        trail.update(f32::NAN);
        trail.update(-5.0);
        assert_relative_eq!(trail.cool_down_timer(), 10.0);
    }
}
