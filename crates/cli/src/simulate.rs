//! Synthetic frame loop over the headless driver.
//!
//! Each frame clears, draws every object with its own short-lived texture,
//! drops those textures and runs cleanup. Every fourth frame the shared
//! vertex buffer is replaced so cached vertex arrays get purged.

use std::collections::BTreeMap;

use glam::Vec4;
use log::debug;
use serde::Serialize;
use strata_core::{
    AttributeBinding, AttributeType, ColorMode, Context, ContextConfig, ContextStats, DepthMode,
    DrawMode, Drawable, HeadlessDriver, Image, Result, Segment, TextureFilter, TextureMipMap,
    Triangle, Vertex, Viewport,
};

const SURFACE: u32 = 256;
const REBUILD_INTERVAL: usize = 4;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct QuadVertex {
    position: [f32; 2],
    uv: [u16; 2],
}

impl Vertex for QuadVertex {
    const ATTRIBUTES: &'static [AttributeBinding] = &[
        AttributeBinding::new(0, 2, AttributeType::F32, 0),
        AttributeBinding::new(1, 2, AttributeType::U16, 8).normalized(),
    ];
}

/// `objects` unit quads laid out side by side.
fn quads(objects: usize) -> (Vec<QuadVertex>, Vec<Triangle>) {
    let mut vertices = Vec::with_capacity(objects * 4);
    let mut triangles = Vec::with_capacity(objects * 2);
    for i in 0..objects {
        let x = i as f32;
        for (dx, dy, u, v) in [(0.0, 0.0, 0, 0), (1.0, 0.0, 1, 0), (0.0, 1.0, 0, 1), (1.0, 1.0, 1, 1)] {
            vertices.push(QuadVertex {
                position: [x + dx, dy],
                uv: [u * u16::MAX, v * u16::MAX],
            });
        }
        triangles.push(Triangle([0, 1, 2]));
        triangles.push(Triangle([2, 1, 3]));
    }
    (vertices, triangles)
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub frames: usize,
    pub objects: usize,
    pub total_calls: usize,
    pub draw_calls: usize,
    /// Driver calls by name.
    pub calls: BTreeMap<&'static str, usize>,
    /// Bookkeeping after the last frame's cleanup.
    pub stats: ContextStats,
    /// Deletes that named an object the driver did not consider live.
    pub invalid_deletes: usize,
}

pub fn simulate(
    frames: usize,
    objects: usize,
    config: ContextConfig,
    driver: HeadlessDriver,
) -> Result<SimulationReport> {
    let mut ctx = Context::with_config(driver, config)?;
    let stats = run_frames(&mut ctx, frames, objects)?;
    ctx.reset();

    let driver = ctx.driver();
    let mut calls = BTreeMap::new();
    for call in driver.calls() {
        *calls.entry(call.name()).or_insert(0) += 1;
    }
    Ok(SimulationReport {
        frames,
        objects,
        total_calls: driver.calls().len(),
        draw_calls: driver.count_calls(|c| c.is_draw()),
        calls,
        stats,
        invalid_deletes: driver.invalid_deletes(),
    })
}

fn run_frames(
    ctx: &mut Context<HeadlessDriver>,
    frames: usize,
    objects: usize,
) -> Result<ContextStats> {
    let program = ctx.create_program()?;
    let (vertices, triangles) = quads(objects);
    let index_buffer = ctx.create_index_buffer(triangles)?;
    let mut vertex_buffer = ctx.create_vertex_buffer(vertices.clone())?;
    let image = Image::blank(2, 2);
    let segments: Vec<Segment> = (0..objects)
        .map(|i| Segment::new(i * 4, 4, i * 6, 6))
        .collect();

    for frame in 0..frames {
        if frame > 0 && frame % REBUILD_INTERVAL == 0 {
            vertex_buffer = ctx.create_vertex_buffer(vertices.clone())?;
        }

        ctx.bind_framebuffer(0);
        ctx.set_viewport(Viewport::new(0, 0, SURFACE, SURFACE));
        ctx.clear(Some(Vec4::new(0.0, 0.0, 0.0, 1.0)), Some(1.0), None);

        let mut textures = Vec::with_capacity(objects);
        for segment in &segments {
            let mut texture = ctx.create_texture(&image, 0)?;
            ctx.bind_texture(&mut texture, 0, TextureFilter::Linear, TextureMipMap::No)?;
            let drawable = Drawable::indexed(
                DrawMode::Triangles,
                &program,
                &vertex_buffer,
                &index_buffer,
                std::slice::from_ref(segment),
            )
            .with_depth(DepthMode::disabled())
            .with_color(ColorMode::alpha_blended());
            ctx.draw(&drawable)?;
            textures.push(texture);
        }
        drop(textures);

        ctx.perform_cleanup();
        debug!("frame {frame}: {:?}", ctx.stats());
    }

    Ok(ctx.stats())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::ObjectKind;

    #[test]
    fn quads_have_four_vertices_and_two_triangles_each() {
        let (vertices, triangles) = quads(3);
        assert_eq!(vertices.len(), 12);
        assert_eq!(triangles.len(), 6);
    }

    #[test]
    fn simulation_draws_every_object_every_frame() {
        let report =
            simulate(5, 3, ContextConfig::default(), HeadlessDriver::new()).unwrap();
        assert_eq!(report.draw_calls, 15);
        assert_eq!(report.calls["draw_elements"], 15);
        assert_eq!(report.invalid_deletes, 0);
    }

    #[test]
    fn textures_come_from_the_pool_after_the_first_frame() {
        let report =
            simulate(6, 4, ContextConfig::default(), HeadlessDriver::new()).unwrap();
        // One texture name per object, reused every frame.
        assert_eq!(report.stats.pooled_textures, 4);
        assert_eq!(report.stats.abandoned.textures, 0);
    }

    #[test]
    fn vertex_arrays_rebuilt_after_buffer_replacement() {
        let report =
            simulate(5, 2, ContextConfig::default(), HeadlessDriver::new()).unwrap();
        // Two vertex buffers over the run, one array per object each.
        assert_eq!(report.stats.cached_vertex_arrays, 2);
        assert_eq!(report.calls["vertex_attrib_pointer"], 2 * 2 * 2);
    }

    #[test]
    fn without_vertex_arrays_attributes_bind_per_draw() {
        let report = simulate(
            3,
            2,
            ContextConfig::default(),
            HeadlessDriver::without_vertex_arrays(),
        )
        .unwrap();
        assert_eq!(report.calls["vertex_attrib_pointer"], 3 * 2 * 2);
        assert_eq!(report.stats.cached_vertex_arrays, 0);
    }

    #[test]
    fn allocation_failure_surfaces_as_error() {
        let mut driver = HeadlessDriver::new();
        driver.fail_allocations(ObjectKind::Program, true);
        assert!(simulate(1, 1, ContextConfig::default(), driver).is_err());
    }

    #[test]
    fn report_serializes() {
        let report =
            simulate(1, 1, ContextConfig::default(), HeadlessDriver::new()).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["frames"], 1);
        assert!(value["calls"]["clear"].is_number());
    }
}
