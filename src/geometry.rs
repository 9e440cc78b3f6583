//! CPU-side model data and format parsers.
//!
//! Models are parsed into a flat list of [`ModelNode`]s that mirrors the
//! source node hierarchy. Parsing never touches the GPU, so it can run on a
//! loader thread; see [`crate::loader`].
//!
//! # Supported Formats
//!
//! | Format | Extensions      | Notes                                       |
//! |--------|-----------------|---------------------------------------------|
//! | glTF   | `.glb`, `.gltf` | Node hierarchy, names, TRS, triangle meshes |
//! | STL    | `.stl`          | Binary and ASCII, single node, no UVs       |
//!
//! glTF nodes also carry their [`Material`]: the base color factor, the
//! decoded base color texture and the double-sided flag. A mesh whose
//! primitives use several materials is split, and each extra material
//! becomes a child node named `<node>.<n>`.

use crate::mesh::{Transform, Vertex3d};
use glam::{Quat, Vec3};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when loading geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown geometry format: '{0}'")]
    UnknownFormat(String),
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("model contains no triangle geometry")]
    Empty,
}

/// Raw triangle geometry before GPU upload.
#[derive(Clone, Debug, Default)]
pub struct RawGeometry {
    pub vertices: Vec<Vertex3d>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
}

impl RawGeometry {
    pub fn new(vertices: Vec<Vertex3d>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.len() < 3
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for v in &self.vertices {
            let p = Vec3::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }

        (min, max)
    }

    /// Append another geometry, rebasing its indices.
    pub fn append(&mut self, other: RawGeometry) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    /// Iterate triangles as vertex positions. Triangles with out-of-range
    /// indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let a = self.vertices.get(tri[0] as usize)?;
            let b = self.vertices.get(tri[1] as usize)?;
            let c = self.vertices.get(tri[2] as usize)?;
            Some([
                Vec3::from(a.position),
                Vec3::from(b.position),
                Vec3::from(c.position),
            ])
        })
    }

    /// Recalculates smooth vertex normals by averaging area-weighted face
    /// normals of the triangles sharing each vertex.
    pub fn recalculate_normals(&mut self) {
        for v in &mut self.vertices {
            v.normal = [0.0, 0.0, 0.0];
        }

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            if i0 >= self.vertices.len() || i1 >= self.vertices.len() || i2 >= self.vertices.len()
            {
                continue;
            }

            let p0 = Vec3::from(self.vertices[i0].position);
            let p1 = Vec3::from(self.vertices[i1].position);
            let p2 = Vec3::from(self.vertices[i2].position);
            let face_normal = (p1 - p0).cross(p2 - p0);

            for &i in &[i0, i1, i2] {
                self.vertices[i].normal[0] += face_normal.x;
                self.vertices[i].normal[1] += face_normal.y;
                self.vertices[i].normal[2] += face_normal.z;
            }
        }

        for v in &mut self.vertices {
            v.normal = Vec3::from(v.normal).normalize_or_zero().into();
        }
    }
}

/// An RGBA8 image, rows top to bottom, with sRGB-encoded color channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Convert a decoded glTF image to RGBA8. Float formats are not
    /// supported and yield `None`.
    fn from_gltf(data: &gltf::image::Data) -> Option<Self> {
        use gltf::image::Format;
        use image::{DynamicImage, ImageBuffer};

        let (width, height) = (data.width, data.height);
        let bytes = data.pixels.clone();
        let image = match data.format {
            Format::R8 => DynamicImage::ImageLuma8(ImageBuffer::from_raw(width, height, bytes)?),
            Format::R8G8 => DynamicImage::ImageLumaA8(ImageBuffer::from_raw(width, height, bytes)?),
            Format::R8G8B8 => DynamicImage::ImageRgb8(ImageBuffer::from_raw(width, height, bytes)?),
            Format::R8G8B8A8 => {
                DynamicImage::ImageRgba8(ImageBuffer::from_raw(width, height, bytes)?)
            }
            Format::R16G16B16 => {
                DynamicImage::ImageRgb16(ImageBuffer::from_raw(width, height, to_u16(&bytes))?)
            }
            Format::R16G16B16A16 => {
                DynamicImage::ImageRgba16(ImageBuffer::from_raw(width, height, to_u16(&bytes))?)
            }
            other => {
                log::warn!("ignoring {width}x{height} texture with unsupported format {other:?}");
                return None;
            }
        };

        Some(Self {
            width,
            height,
            pixels: image.to_rgba8().into_raw(),
        })
    }
}

/// 16-bit channels arrive as native-endian byte pairs.
fn to_u16(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
        .collect()
}

/// Surface parameters of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Linear RGBA multiplier applied to the texture.
    pub base_color: [f32; 4],
    pub base_color_texture: Option<Arc<ImageData>>,
    /// When false, back faces are neither drawn nor picked.
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            base_color_texture: None,
            double_sided: false,
        }
    }
}

impl Material {
    fn from_gltf(material: &gltf::Material, images: &[Option<Arc<ImageData>>]) -> Self {
        let pbr = material.pbr_metallic_roughness();
        let base_color_texture = pbr.base_color_texture().and_then(|info| {
            if info.tex_coord() != 0 {
                log::warn!(
                    "material {:?} samples TEXCOORD_{}, only TEXCOORD_0 is loaded",
                    material.name(),
                    info.tex_coord()
                );
            }
            images
                .get(info.texture().source().index())
                .cloned()
                .flatten()
        });

        Self {
            base_color: pbr.base_color_factor(),
            base_color_texture,
            double_sided: material.double_sided(),
        }
    }
}

/// One node of a parsed model.
#[derive(Clone, Debug)]
pub struct ModelNode {
    pub name: String,
    /// Index of the parent within [`ModelData::nodes`]. Parents always come
    /// before their children.
    pub parent: Option<usize>,
    pub transform: Transform,
    pub geometry: Option<RawGeometry>,
    /// Ignored when `geometry` is `None`.
    pub material: Material,
}

/// A parsed model: a node hierarchy in parent-first order.
#[derive(Clone, Debug, Default)]
pub struct ModelData {
    pub nodes: Vec<ModelNode>,
}

impl ModelData {
    /// Total triangle count across all nodes.
    pub fn triangle_count(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|n| n.geometry.as_ref())
            .map(|g| g.indices.len() / 3)
            .sum()
    }

    /// Load a model from disk, detecting the format from the extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GeometryError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        let model = match ext.as_str() {
            "glb" | "gltf" => {
                let (document, buffers, images) = gltf::import(path)?;
                Self::from_gltf(&document, &buffers, &images)?
            }
            "stl" => {
                let file = std::fs::File::open(path)?;
                let mut reader = std::io::BufReader::new(file);
                let name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("stl");
                Self::from_stl(name, &mut reader)?
            }
            _ => return Err(GeometryError::UnknownFormat(ext)),
        };

        if model.triangle_count() == 0 {
            return Err(GeometryError::Empty);
        }

        Ok(model)
    }

    /// Parse a binary glTF (`.glb`) or self-contained `.gltf` from memory.
    pub fn from_gltf_slice(bytes: &[u8]) -> Result<Self, GeometryError> {
        let (document, buffers, images) = gltf::import_slice(bytes)?;
        Self::from_gltf(&document, &buffers, &images)
    }

    /// Flatten the default scene (or the first scene) of a glTF document.
    pub fn from_gltf(
        document: &gltf::Document,
        buffers: &[gltf::buffer::Data],
        images: &[gltf::image::Data],
    ) -> Result<Self, GeometryError> {
        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| GeometryError::Parse("document has no scenes".to_string()))?;

        let images: Vec<Option<Arc<ImageData>>> = images
            .iter()
            .map(|data| ImageData::from_gltf(data).map(Arc::new))
            .collect();

        let mut model = ModelData::default();
        for node in scene.nodes() {
            model.push_gltf_node(&node, None, buffers, &images)?;
        }

        Ok(model)
    }

    fn push_gltf_node(
        &mut self,
        node: &gltf::Node,
        parent: Option<usize>,
        buffers: &[gltf::buffer::Data],
        images: &[Option<Arc<ImageData>>],
    ) -> Result<(), GeometryError> {
        let (translation, rotation, scale) = node.transform().decomposed();
        let transform = Transform::new()
            .position(Vec3::from(translation))
            .rotation(Quat::from_array(rotation))
            .scale(Vec3::from(scale));

        let mut parts = match node.mesh() {
            Some(mesh) => gltf_mesh_parts(&mesh, buffers, images)?,
            None => Vec::new(),
        }
        .into_iter();
        let (geometry, material) = match parts.next() {
            Some((geometry, material)) => (Some(geometry), material),
            None => (None, Material::default()),
        };

        let name = node
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("node{}", node.index()));
        let index = self.nodes.len();
        self.nodes.push(ModelNode {
            name: name.clone(),
            parent,
            transform,
            geometry,
            material,
        });

        for (n, (geometry, material)) in parts.enumerate() {
            self.nodes.push(ModelNode {
                name: format!("{name}.{}", n + 1),
                parent: Some(index),
                transform: Transform::new(),
                geometry: Some(geometry),
                material,
            });
        }

        for child in node.children() {
            self.push_gltf_node(&child, Some(index), buffers, images)?;
        }

        Ok(())
    }

    /// Parse STL (binary or ASCII) into a single-node model.
    pub fn from_stl<R: std::io::Read + std::io::Seek>(
        name: &str,
        reader: &mut R,
    ) -> Result<Self, GeometryError> {
        let stl = stl_io::read_stl(reader)
            .map_err(|e| GeometryError::Parse(format!("STL parse error: {e}")))?;

        let mut vertices = Vec::with_capacity(stl.faces.len() * 3);
        let mut indices = Vec::with_capacity(stl.faces.len() * 3);

        for face in &stl.faces {
            let normal: [f32; 3] = face.normal.into();

            for &vertex_idx in &face.vertices {
                let position: [f32; 3] = stl.vertices[vertex_idx].into();
                indices.push(vertices.len() as u32);
                vertices.push(Vertex3d::new(position, normal, [0.0, 0.0]));
            }
        }

        Ok(Self {
            nodes: vec![ModelNode {
                name: name.to_string(),
                parent: None,
                transform: Transform::new(),
                geometry: Some(RawGeometry::new(vertices, indices)),
                material: Material::default(),
            }],
        })
    }
}

/// Merge the triangle primitives of a glTF mesh, one geometry per material,
/// in order of first use.
fn gltf_mesh_parts(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    images: &[Option<Arc<ImageData>>],
) -> Result<Vec<(RawGeometry, Material)>, GeometryError> {
    let mut parts: Vec<(Option<usize>, RawGeometry, Material)> = Vec::new();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "skipping primitive {} of mesh {:?}: unsupported mode {:?}",
                primitive.index(),
                mesh.name(),
                primitive.mode()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .ok_or_else(|| GeometryError::Parse("primitive without positions".to_string()))?
            .collect();
        let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|n| n.collect());
        let uvs: Option<Vec<[f32; 2]>> = reader.read_tex_coords(0).map(|t| t.into_f32().collect());
        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let has_normals = normals.is_some();
        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, &position)| {
                let normal = normals
                    .as_ref()
                    .and_then(|n| n.get(i).copied())
                    .unwrap_or([0.0, 0.0, 0.0]);
                let uv = uvs
                    .as_ref()
                    .and_then(|t| t.get(i).copied())
                    .unwrap_or([0.0, 0.0]);
                Vertex3d::new(position, normal, uv)
            })
            .collect();

        let mut part = RawGeometry::new(vertices, indices);
        if !has_normals {
            part.recalculate_normals();
        }

        let material = primitive.material();
        match parts.iter_mut().find(|(key, ..)| *key == material.index()) {
            Some((_, geometry, _)) => geometry.append(part),
            None => parts.push((
                material.index(),
                part,
                Material::from_gltf(&material, images),
            )),
        }
    }

    Ok(parts
        .into_iter()
        .map(|(_, geometry, material)| (geometry, material))
        .collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn vertex(p: [f32; 3]) -> Vertex3d {
        Vertex3d::new(p, [0.0, 1.0, 0.0], [0.0, 0.0])
    }

    /// Pack a glTF JSON document and its binary chunk into a GLB.
    fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
        let mut json = json.as_bytes().to_vec();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let mut bin = bin.to_vec();
        while bin.len() % 4 != 0 {
            bin.push(0);
        }

        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"JSON");
        glb.extend_from_slice(&json);
        glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"BIN\0");
        glb.extend_from_slice(&bin);
        glb
    }

    const TRIANGLE: [f32; 9] = [-1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0, 0.0];

    /// Build a GLB holding one triangle in the XY plane, under a parent node
    /// named `root` with a child mesh node named `panel` offset by +1 on Y.
    pub(crate) fn triangle_glb() -> Vec<u8> {
        let json = r#"{
            "asset": {"version": "2.0"},
            "scene": 0,
            "scenes": [{"nodes": [0]}],
            "nodes": [
                {"name": "root", "children": [1]},
                {"name": "panel", "mesh": 0, "translation": [0.0, 1.0, 0.0]}
            ],
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
            "accessors": [{
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [-1.0, -1.0, 0.0], "max": [1.0, 1.0, 0.0]
            }],
            "bufferViews": [{"buffer": 0, "byteLength": 36}],
            "buffers": [{"byteLength": 36}]
        }"#;
        glb(json, bytemuck::cast_slice(&TRIANGLE))
    }

    /// The same triangle drawn twice by one mesh: once with a tinted,
    /// double-sided material and once with a single-sided material whose
    /// base color comes from a 2x2 red PNG.
    fn material_glb() -> Vec<u8> {
        let mut png = Vec::new();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]))
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let mut bin: Vec<u8> = bytemuck::cast_slice(&TRIANGLE).to_vec();
        bin.extend_from_slice(&png);

        let json = r#"{
            "asset": {"version": "2.0"},
            "scene": 0,
            "scenes": [{"nodes": [0]}],
            "nodes": [{"name": "sign", "mesh": 0}],
            "meshes": [{"primitives": [
                {"attributes": {"POSITION": 0}, "material": 0},
                {"attributes": {"POSITION": 0}, "material": 1},
                {"attributes": {"POSITION": 0}, "material": 0}
            ]}],
            "materials": [
                {
                    "name": "tint",
                    "pbrMetallicRoughness": {"baseColorFactor": [1.0, 0.5, 0.25, 1.0]},
                    "doubleSided": true
                },
                {
                    "name": "poster",
                    "pbrMetallicRoughness": {"baseColorTexture": {"index": 0}}
                }
            ],
            "textures": [{"source": 0}],
            "images": [{"bufferView": 1, "mimeType": "image/png"}],
            "accessors": [{
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [-1.0, -1.0, 0.0], "max": [1.0, 1.0, 0.0]
            }],
            "bufferViews": [
                {"buffer": 0, "byteLength": 36},
                {"buffer": 0, "byteOffset": 36, "byteLength": PNG_LEN}
            ],
            "buffers": [{"byteLength": BIN_LEN}]
        }"#
        .replace("PNG_LEN", &png.len().to_string())
        .replace("BIN_LEN", &bin.len().to_string());

        glb(&json, &bin)
    }

    #[test]
    fn raw_geometry_bounds() {
        let geom = RawGeometry::new(
            vec![
                vertex([0.0, 0.0, 0.0]),
                vertex([1.0, 2.0, 3.0]),
                vertex([-1.0, -1.0, -1.0]),
            ],
            vec![0, 1, 2],
        );

        let (min, max) = geom.bounds();
        assert_eq!(min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn append_rebases_indices() {
        let mut a = RawGeometry::new(
            vec![vertex([0.0; 3]), vertex([1.0; 3]), vertex([2.0; 3])],
            vec![0, 1, 2],
        );
        let b = RawGeometry::new(
            vec![vertex([3.0; 3]), vertex([4.0; 3]), vertex([5.0; 3])],
            vec![2, 1, 0],
        );
        a.append(b);

        assert_eq!(a.indices, vec![0, 1, 2, 5, 4, 3]);
        assert_eq!(a.triangles().count(), 2);
    }

    #[test]
    fn triangles_skip_bad_indices() {
        let geom = RawGeometry::new(vec![vertex([0.0; 3])], vec![0, 0, 7]);
        assert_eq!(geom.triangles().count(), 0);
    }

    #[test]
    fn recalculated_normals_face_the_winding() {
        let mut geom = RawGeometry::new(
            vec![
                vertex([0.0, 0.0, 0.0]),
                vertex([1.0, 0.0, 0.0]),
                vertex([0.0, 1.0, 0.0]),
            ],
            vec![0, 1, 2],
        );
        geom.recalculate_normals();

        for v in &geom.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn gltf_hierarchy_is_flattened_parent_first() {
        let model = ModelData::from_gltf_slice(&triangle_glb()).unwrap();

        assert_eq!(model.nodes.len(), 2);
        assert_eq!(model.nodes[0].name, "root");
        assert_eq!(model.nodes[0].parent, None);
        assert!(model.nodes[0].geometry.is_none());

        let panel = &model.nodes[1];
        assert_eq!(panel.name, "panel");
        assert_eq!(panel.parent, Some(0));
        assert_eq!(panel.transform.position, Vec3::new(0.0, 1.0, 0.0));

        let geometry = panel.geometry.as_ref().unwrap();
        assert_eq!(geometry.indices, vec![0, 1, 2]);
        // No normals in the file, so they are rebuilt from the winding.
        assert_eq!(geometry.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(model.triangle_count(), 1);
    }

    #[test]
    fn gltf_without_materials_uses_default() {
        let model = ModelData::from_gltf_slice(&triangle_glb()).unwrap();
        assert_eq!(model.nodes[1].material, Material::default());
        assert!(!model.nodes[1].material.double_sided);
    }

    #[test]
    fn gltf_materials_are_read_per_primitive() {
        let model = ModelData::from_gltf_slice(&material_glb()).unwrap();

        // The second material splits off into a child node.
        assert_eq!(model.nodes.len(), 2);
        let sign = &model.nodes[0];
        assert_eq!(sign.name, "sign");
        assert_eq!(sign.material.base_color, [1.0, 0.5, 0.25, 1.0]);
        assert!(sign.material.double_sided);
        assert!(sign.material.base_color_texture.is_none());
        // Both primitives using the tint were merged.
        assert_eq!(sign.geometry.as_ref().unwrap().indices.len(), 6);

        let poster = &model.nodes[1];
        assert_eq!(poster.name, "sign.1");
        assert_eq!(poster.parent, Some(0));
        assert_eq!(poster.transform.position, Vec3::ZERO);
        assert_eq!(poster.material.base_color, [1.0; 4]);
        assert!(!poster.material.double_sided);

        let texture = poster.material.base_color_texture.as_ref().unwrap();
        assert_eq!((texture.width, texture.height), (2, 2));
        assert_eq!(texture.pixels.len(), 16);
        assert_eq!(&texture.pixels[..4], &[255, 0, 0, 255]);
        assert_eq!(model.triangle_count(), 3);
    }

    #[test]
    fn rgb_images_gain_opaque_alpha() {
        let data = gltf::image::Data {
            pixels: vec![10, 20, 30, 40, 50, 60],
            format: gltf::image::Format::R8G8B8,
            width: 2,
            height: 1,
        };
        let image = ImageData::from_gltf(&data).unwrap();
        assert_eq!(image.pixels, vec![10, 20, 30, 255, 40, 50, 60, 255]);
    }

    #[test]
    fn float_images_are_skipped() {
        let data = gltf::image::Data {
            pixels: vec![0; 12],
            format: gltf::image::Format::R32G32B32FLOAT,
            width: 1,
            height: 1,
        };
        assert!(ImageData::from_gltf(&data).is_none());
    }

    #[test]
    fn garbage_gltf_is_an_error() {
        let err = ModelData::from_gltf_slice(b"definitely not a model").unwrap_err();
        assert!(matches!(err, GeometryError::Gltf(_)));
    }

    #[test]
    fn ascii_stl_becomes_single_node() {
        let stl = "solid tri
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 1 0 0
vertex 0 1 0
endloop
endfacet
endsolid tri
";
        let mut cursor = std::io::Cursor::new(stl.as_bytes());
        let model = ModelData::from_stl("tri", &mut cursor).unwrap();

        assert_eq!(model.nodes.len(), 1);
        assert_eq!(model.nodes[0].name, "tri");
        assert_eq!(model.triangle_count(), 1);
        let geometry = model.nodes[0].geometry.as_ref().unwrap();
        assert_eq!(geometry.vertices[2].position, [0.0, 1.0, 0.0]);
        assert_eq!(geometry.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = ModelData::from_file("model.obj").unwrap_err();
        assert!(matches!(err, GeometryError::UnknownFormat(ext) if ext == "obj"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ModelData::from_file("does/not/exist.glb").unwrap_err();
        assert!(matches!(err, GeometryError::Gltf(_) | GeometryError::Io(_)));
    }
}
