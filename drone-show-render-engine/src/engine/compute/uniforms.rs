use bytemuck::{Pod, Zeroable};
use choreography::PipelineConfig;
use choreography::bitonic::SortPass;
use choreography::flight::FlightPlan;

use crate::engine::systems::show_clock::ShowFrame;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PositionPassUniform {
    pub width: u32,
    pub drone_count: u32,
    pub grid_edge: u32,
    pub pad_width: u32,

    pub time: f32,
    pub blend: f32,
    pub scale: f32,
    pub flight_duration: f32,

    pub row_delay: f32,
    pub drone_delay: f32,
    pub fly_up_height: f32,
    pub pad_spacing: f32,

    pub pad_height: f32,
    pub control_distance: f32,
    pub _padding: [f32; 2],
}

impl PositionPassUniform {
    pub fn new(config: &PipelineConfig, plan: &FlightPlan, frame: &ShowFrame) -> Self {
        Self {
            width: config.texture_width(),
            drone_count: config.drone_count() as u32,
            grid_edge: plan.grid_edge,
            pad_width: plan.pad_width,
            time: frame.time,
            blend: frame.blend,
            scale: plan.scale,
            flight_duration: plan.flight_duration,
            row_delay: plan.row_delay,
            drone_delay: plan.drone_delay,
            fly_up_height: plan.fly_up_height,
            pad_spacing: plan.pad_spacing,
            pad_height: plan.pad_height,
            control_distance: plan.control_distance,
            _padding: [0.0; 2],
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct HashPassUniform {
    pub width: u32,
    pub drone_count: u32,
    pub cell_size: f32,
    pub _padding: u32,
}

impl HashPassUniform {
    pub fn new(config: &PipelineConfig, cell_size: f32) -> Self {
        Self {
            width: config.texture_width(),
            drone_count: config.drone_count() as u32,
            cell_size,
            _padding: 0,
        }
    }
}

/// One bitonic pass. The rank pass reuses it with `stage = sub_stage = 0`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SortPassUniform {
    pub width: u32,
    pub stage: u32,
    pub sub_stage: u32,
    pub _padding: u32,
}

impl SortPassUniform {
    pub fn new(config: &PipelineConfig, pass: SortPass) -> Self {
        Self {
            width: config.texture_width(),
            stage: pass.stage,
            sub_stage: pass.sub_stage,
            _padding: 0,
        }
    }

    pub fn rank(config: &PipelineConfig) -> Self {
        Self::new(
            config,
            SortPass {
                stage: 0,
                sub_stage: 0,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::mem::size_of;

    #[test]
    fn uniform_blocks_are_16_byte_aligned() {
        assert_eq!(size_of::<PositionPassUniform>(), 64);
        assert_eq!(size_of::<HashPassUniform>(), 16);
        assert_eq!(size_of::<SortPassUniform>(), 16);
    }

    #[test]
    fn sort_uniforms_follow_the_schedule() {
        let config = PipelineConfig::new(4096).unwrap();
        let uniforms: Vec<_> = config
            .sort_passes()
            .iter()
            .map(|pass| SortPassUniform::new(&config, *pass))
            .collect();
        assert_eq!(uniforms.len(), 78);
        assert_eq!((uniforms[0].stage, uniforms[0].sub_stage), (1, 0));
        assert_eq!((uniforms[77].stage, uniforms[77].sub_stage), (12, 0));
        assert!(uniforms.iter().all(|u| u.width == 64));
    }

    #[test]
    fn position_uniform_carries_the_frame() {
        let config = PipelineConfig::new(100).unwrap();
        let plan = FlightPlan::new(config.texture_width());
        let frame = ShowFrame {
            time: 21.0,
            blend: 0.5,
            ..Default::default()
        };
        let uniform = PositionPassUniform::new(&config, &plan, &frame);
        assert_eq!(uniform.width, 16);
        assert_eq!(uniform.drone_count, 100);
        assert_eq!(uniform.pad_width, 16);
        assert_eq!(uniform.blend, 0.5);
    }
}
