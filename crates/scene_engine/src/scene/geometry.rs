//! Vertex and index storage for visuals
//!
//! Vertices are stored interleaved as `f32` components described by a
//! [`VertexFormat`]. The position attribute is always present since model
//! bounds are computed from it.

use bitflags::bitflags;

use crate::foundation::math::Point3;

/// How the index buffer (or vertex order) is assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    /// Unconnected points
    Polypoint,
    /// Independent line segments, two vertices each
    PolylineSegments,
    /// Connected line strip
    PolylineOpen,
    /// Connected line loop
    PolylineClosed,
    /// Independent triangles
    TriMesh,
    /// Triangle strip
    TriStrip,
    /// Triangle fan
    TriFan,
}

impl PrimitiveType {
    /// Number of primitives produced from `index_count` indices
    pub fn primitive_count(self, index_count: usize) -> usize {
        match self {
            Self::Polypoint => index_count,
            Self::PolylineSegments => index_count / 2,
            Self::PolylineOpen => index_count.saturating_sub(1),
            Self::PolylineClosed => {
                if index_count >= 2 {
                    index_count
                } else {
                    0
                }
            }
            Self::TriMesh => index_count / 3,
            Self::TriStrip | Self::TriFan => index_count.saturating_sub(2),
        }
    }
}

bitflags! {
    /// Attributes present in each vertex
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VertexAttributes: u32 {
        /// xyz position
        const POSITION = 1 << 0;
        /// xyz normal
        const NORMAL = 1 << 1;
        /// rgba color
        const COLOR = 1 << 2;
        /// uv texture coordinate
        const TEXCOORD = 1 << 3;
    }
}

impl VertexAttributes {
    fn component_count(self) -> usize {
        match self {
            Self::POSITION | Self::NORMAL => 3,
            Self::COLOR => 4,
            Self::TEXCOORD => 2,
            _ => 0,
        }
    }
}

/// Layout of one interleaved vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexFormat {
    attributes: VertexAttributes,
}

impl VertexFormat {
    /// Attribute order inside a vertex
    const ORDER: [VertexAttributes; 4] = [
        VertexAttributes::POSITION,
        VertexAttributes::NORMAL,
        VertexAttributes::COLOR,
        VertexAttributes::TEXCOORD,
    ];

    /// Create a format; position is always included
    pub fn new(attributes: VertexAttributes) -> Self {
        Self {
            attributes: attributes | VertexAttributes::POSITION,
        }
    }

    /// Position-only format
    pub fn positions() -> Self {
        Self::new(VertexAttributes::POSITION)
    }

    /// Attributes present
    pub fn attributes(&self) -> VertexAttributes {
        self.attributes
    }

    /// Floats per vertex
    pub fn stride(&self) -> usize {
        Self::ORDER
            .iter()
            .filter(|a| self.attributes.contains(**a))
            .map(|a| a.component_count())
            .sum()
    }

    /// Float offset of an attribute inside a vertex, `None` if absent
    pub fn offset(&self, attribute: VertexAttributes) -> Option<usize> {
        if !self.attributes.contains(attribute) {
            return None;
        }
        let mut offset = 0;
        for a in Self::ORDER {
            if a == attribute {
                return Some(offset);
            }
            if self.attributes.contains(a) {
                offset += a.component_count();
            }
        }
        None
    }
}

/// Interleaved vertex storage.
///
/// Every mutation bumps `version` so a renderer can tell when its uploaded copy
/// is stale.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffer {
    format: VertexFormat,
    data: Vec<f32>,
    version: u64,
}

impl VertexBuffer {
    /// Zero-filled buffer of `vertex_count` vertices
    pub fn new(format: VertexFormat, vertex_count: usize) -> Self {
        Self {
            format,
            data: vec![0.0; vertex_count * format.stride()],
            version: 0,
        }
    }

    /// Position-only buffer
    pub fn from_positions(positions: &[Point3]) -> Self {
        let data = positions.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
        Self {
            format: VertexFormat::positions(),
            data,
            version: 0,
        }
    }

    /// Vertex layout
    pub fn format(&self) -> VertexFormat {
        self.format
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.data.len() / self.format.stride()
    }

    /// Modification counter
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Make this buffer's version newer than `previous` when it replaces
    /// another buffer
    pub(crate) fn supersede(&mut self, previous: u64) {
        self.version = self.version.max(previous + 1);
    }

    /// Raw interleaved floats
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Buffer contents as bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Position of vertex `index`
    pub fn position(&self, index: usize) -> Point3 {
        let base = index * self.format.stride();
        Point3::new(self.data[base], self.data[base + 1], self.data[base + 2])
    }

    /// Overwrite the position of vertex `index`
    pub fn set_position(&mut self, index: usize, position: Point3) {
        let base = index * self.format.stride();
        self.data[base..base + 3].copy_from_slice(&[position.x, position.y, position.z]);
        self.version += 1;
    }

    /// Overwrite an attribute of vertex `index`; `values` must match the
    /// attribute's component count
    pub fn set_attribute(&mut self, index: usize, attribute: VertexAttributes, values: &[f32]) {
        let Some(offset) = self.format.offset(attribute) else {
            panic!("vertex format has no {attribute:?} attribute");
        };
        assert_eq!(
            values.len(),
            attribute.component_count(),
            "wrong component count for {attribute:?}"
        );
        let base = index * self.format.stride() + offset;
        self.data[base..base + values.len()].copy_from_slice(values);
        self.version += 1;
    }

    /// Iterator over all vertex positions
    pub fn positions(&self) -> impl Iterator<Item = Point3> + Clone + '_ {
        self.data
            .chunks_exact(self.format.stride())
            .map(|v| Point3::new(v[0], v[1], v[2]))
    }
}

/// Index storage
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexBuffer {
    indices: Vec<u32>,
}

impl IndexBuffer {
    /// Wrap a list of indices
    pub fn new(indices: Vec<u32>) -> Self {
        Self { indices }
    }

    /// Sequential indices `0..count`, for primitives drawn in vertex order
    pub fn sequential(count: usize) -> Self {
        Self {
            indices: (0..count as u32).collect(),
        }
    }

    /// Indices
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of indices
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether there are no indices
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
