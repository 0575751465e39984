//! Per-instance data for gradient circles

use bytemuck::{Pod, Zeroable};

use super::ColorStop;

/// Gradient stops supported per circle on the GPU
pub const MAX_STOPS: usize = 3;

/// One circle, expanded to a quad in the vertex shader
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    /// Centre (surface pixels)
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    /// Stop offsets, unused slots repeat the last stop
    pub offsets: [f32; 4],
    pub color0: [f32; 4],
    pub color1: [f32; 4],
    pub color2: [f32; 4],
}

impl CircleInstance {
    /// Pack a gradient, truncating to [`MAX_STOPS`] and padding with the last stop
    pub fn new(center: [f32; 2], radius: f32, stops: &[ColorStop]) -> Self {
        let last = stops.last().copied().unwrap_or(ColorStop::new(1.0, [0.0; 4]));
        let stop = |i: usize| stops.get(i).copied().unwrap_or(last);
        let (s0, s1, s2) = (stop(0), stop(1), stop(2));

        Self {
            center,
            radius,
            _pad: 0.0,
            offsets: [s0.offset, s1.offset, s2.offset, 0.0],
            color0: s0.color,
            color1: s1.color,
            color2: s2.color,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = {
        const F32X4: wgpu::BufferAddress = std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress;
        [
            // center, radius, pad
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: F32X4,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: F32X4 * 2,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: F32X4 * 3,
                shader_location: 3,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: F32X4 * 4,
                shader_location: 4,
                format: wgpu::VertexFormat::Float32x4,
            },
        ]
    };

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<CircleInstance>(), 80);
    }

    #[test]
    fn test_pads_missing_stops() {
        let stops = [
            ColorStop::new(0.0, [1.0, 0.0, 0.0, 1.0]),
            ColorStop::new(1.0, [0.0, 0.0, 1.0, 0.5]),
        ];
        let inst = CircleInstance::new([5.0, 6.0], 7.0, &stops);
        assert_eq!(inst.offsets[..3], [0.0, 1.0, 1.0]);
        assert_eq!(inst.color2, [0.0, 0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_truncates_extra_stops() {
        let stops: Vec<ColorStop> = (0..5)
            .map(|i| ColorStop::new(i as f32 / 4.0, [i as f32; 4]))
            .collect();
        let inst = CircleInstance::new([0.0, 0.0], 1.0, &stops);
        assert_eq!(inst.offsets[..3], [0.0, 0.25, 0.5]);
    }
}
