use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// One cross-section of the trail ribbon: the two rails at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LineSegment {
    pub vert1: Vec3,
    pub vert2: Vec3,
}

impl LineSegment {
    pub const fn new(vert1: Vec3, vert2: Vec3) -> Self {
        Self { vert1, vert2 }
    }

    pub fn center(&self) -> Vec3 {
        (self.vert1 + self.vert2) * 0.5
    }
}

/// Vertex layout of the trail's GPU buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct TrailVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub texcoord: [f32; 2],
}

impl TrailVertex {
    /// Debug color mirrors the texcoord into red/green with opaque alpha.
    pub fn new(position: Vec3, texcoord: Vec2) -> Self {
        Self {
            position: position.to_array(),
            color: Vec4::new(texcoord.x, texcoord.y, 0.0, 1.0).to_array(),
            texcoord: texcoord.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn texcoord(&self) -> Vec2 {
        Vec2::from_array(self.texcoord)
    }
}
