use bytemuck::{Pod, Zeroable};

/// One triangle corner in normalized device coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }
}

/// Counter-clockwise triangle centered on the origin.
pub const TRIANGLE: [Vertex; 3] = [
    Vertex::new(-0.5, -0.5, 0.0),
    Vertex::new(0.5, -0.5, 0.0),
    Vertex::new(0.0, 0.5, 0.0),
];

/// Element format of a vertex attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttributeFormat {
    Float32,
    Float32x2,
    Float32x3,
    Float32x4,
}

impl AttributeFormat {
    pub fn components(self) -> u32 {
        match self {
            AttributeFormat::Float32 => 1,
            AttributeFormat::Float32x2 => 2,
            AttributeFormat::Float32x3 => 3,
            AttributeFormat::Float32x4 => 4,
        }
    }

    /// Size in bytes.
    pub fn size(self) -> u64 {
        self.components() as u64 * std::mem::size_of::<f32>() as u64
    }

    pub(crate) fn to_wgpu(self) -> wgpu::VertexFormat {
        match self {
            AttributeFormat::Float32 => wgpu::VertexFormat::Float32,
            AttributeFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
            AttributeFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
            AttributeFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
        }
    }
}

/// Maps bytes at `offset` within each vertex to shader input `location`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexAttribute {
    pub location: u32,
    pub format: AttributeFormat,
    pub offset: u64,
}

/// How a vertex buffer's bytes map to shader inputs.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct VertexLayout {
    /// Bytes between consecutive vertices.
    pub stride: u64,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    pub fn new(stride: u64, attributes: Vec<VertexAttribute>) -> Self {
        Self { stride, attributes }
    }

    /// Single tightly packed `vec3` position at location 0.
    pub fn position3() -> Self {
        Self::new(
            std::mem::size_of::<Vertex>() as u64,
            vec![VertexAttribute {
                location: 0,
                format: AttributeFormat::Float32x3,
                offset: 0,
            }],
        )
    }

    pub fn attribute_at(&self, location: u32) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.location == location)
    }

    /// True when every attribute fits inside the stride and no location repeats.
    pub fn is_consistent(&self) -> bool {
        let fits = self
            .attributes
            .iter()
            .all(|a| a.offset + a.format.size() <= self.stride);
        let unique = self
            .attributes
            .iter()
            .enumerate()
            .all(|(i, a)| self.attributes[..i].iter().all(|b| b.location != a.location));
        fits && unique
    }

    pub(crate) fn wgpu_attributes(&self) -> Vec<wgpu::VertexAttribute> {
        self.attributes
            .iter()
            .map(|a| wgpu::VertexAttribute {
                format: a.format.to_wgpu(),
                offset: a.offset,
                shader_location: a.location,
            })
            .collect()
    }
}

/// How consecutive vertices are assembled into primitives.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrimitiveTopology {
    TriangleList,
}

impl PrimitiveTopology {
    pub(crate) fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            PrimitiveTopology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 12);
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&TRIANGLE).len(), 36);
    }

    #[test]
    fn position_layout_matches_vertex() {
        let layout = VertexLayout::position3();
        assert_eq!(layout.stride, 12);
        assert!(layout.is_consistent());
        assert_eq!(layout.attribute_at(0).map(|a| a.format), Some(AttributeFormat::Float32x3));
        assert!(layout.attribute_at(1).is_none());
    }

    #[test]
    fn attribute_past_stride_is_inconsistent() {
        let layout = VertexLayout::new(
            8,
            vec![VertexAttribute { location: 0, format: AttributeFormat::Float32x3, offset: 0 }],
        );
        assert!(!layout.is_consistent());
    }

    #[test]
    fn duplicate_location_is_inconsistent() {
        let attr = VertexAttribute { location: 0, format: AttributeFormat::Float32, offset: 0 };
        let layout = VertexLayout::new(8, vec![attr, VertexAttribute { offset: 4, ..attr }]);
        assert!(!layout.is_consistent());
    }
}
