//! m3d scene file loader.
//!
//! The file is plain text. A header banner and five labelled counts
//! (materials, vertices, triangles, bones, clips) are followed by fixed
//! sections in this order, each introduced by a banner token:
//!
//! ```text
//! Materials      one record per material
//! SubsetTable    one record per material
//! Vertices       skinned or static layout
//! Triangles      three bare indices per triangle
//! BoneOffsets    BoneOffsetN followed by 16 floats (row by row)
//! BoneHierarchy  ParentIndexOfBoneN: parent
//! AnimationClips AnimationClip <name> { BoneN #Keyframes: k { ... } ... }
//! ```
//!
//! Static files stop after `Triangles`.

use std::path::Path;

use glam::{Mat4, Quat, Vec3};
use sinew_animation::{AnimationClip, BoneAnimation, Keyframe, Skeleton};

use crate::error::{LoadError, ParseError, ParseErrorKind, Result};
use crate::m3d::tokens::{ParseResult, TokenReader};
use crate::material::{M3dMaterial, Subset};
use crate::options::LoadOptions;
use crate::vertex::{MAX_BONE_INFLUENCES, STORED_BONE_WEIGHTS, SkinnedVertex, Vertex};

// Header counts come from the file; they only bound the initial allocation.
const MAX_PREALLOCATED: usize = 1 << 16;

const MIN_ROTATION_LENGTH_SQUARED: f32 = 1e-12;

/// Mesh buffers, materials and skeleton of a skinned m3d file.
#[derive(Debug, Clone)]
pub struct SkinnedModel {
    pub vertices: Vec<SkinnedVertex>,
    pub indices: Vec<u16>,
    pub subsets: Vec<Subset>,
    pub materials: Vec<M3dMaterial>,
    pub skeleton: Skeleton,
}

/// Mesh buffers and materials of a static m3d file.
#[derive(Debug, Clone, Default)]
pub struct StaticModel {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
    pub subsets: Vec<Subset>,
    pub materials: Vec<M3dMaterial>,
}

#[derive(Debug, Clone, Copy)]
struct Header {
    materials: usize,
    vertices: usize,
    triangles: usize,
    bones: usize,
    clips: usize,
}

/// Loads m3d files. Loading is a single all-or-nothing call.
#[derive(Debug, Clone, Default)]
pub struct M3dLoader {
    options: LoadOptions,
}

impl M3dLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: LoadOptions) -> Self {
        Self { options }
    }

    #[inline]
    #[must_use]
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn load_skinned(&self, path: impl AsRef<Path>) -> Result<SkinnedModel> {
        let path = path.as_ref();
        let source = read_source(path)?;
        let model = self.parse_skinned(&source)?;
        log::info!(
            "Loaded skinned m3d {}: {} vertices, {} triangles, {} bones, {} clips",
            path.display(),
            model.vertices.len(),
            model.indices.len() / 3,
            model.skeleton.bone_count(),
            model.skeleton.clip_count()
        );
        Ok(model)
    }

    pub fn load_static(&self, path: impl AsRef<Path>) -> Result<StaticModel> {
        let path = path.as_ref();
        let source = read_source(path)?;
        let model = self.parse_static(&source)?;
        log::info!(
            "Loaded static m3d {}: {} vertices, {} triangles",
            path.display(),
            model.vertices.len(),
            model.indices.len() / 3
        );
        Ok(model)
    }

    pub fn parse_skinned(&self, source: &str) -> Result<SkinnedModel> {
        let mut reader = TokenReader::new(source, self.options.label_policy);
        let header = read_header(&mut reader)?;

        let materials = read_materials(&mut reader, header.materials)?;
        let subsets = read_subset_table(&mut reader, &header)?;
        let vertices = read_skinned_vertices(&mut reader, header.vertices, header.bones)?;
        let indices = read_triangles(&mut reader, header.triangles, header.vertices)?;
        let bone_offsets = read_bone_offsets(&mut reader, header.bones)?;
        let parents = read_bone_hierarchy(&mut reader, header.bones)?;
        let clips = self.read_animation_clips(&mut reader, header.bones, header.clips)?;

        // every section holds exactly its header count, so nothing may follow the clips
        if let Some(token) = reader.next_token() {
            return Err(LoadError::Parse(ParseError {
                line: token.line,
                column: token.column,
                kind: ParseErrorKind::TrailingData {
                    found: token.text.to_string(),
                },
            }));
        }

        let skeleton = Skeleton::new(parents, bone_offsets, clips).map_err(|source| LoadError::Animation {
            context: "skeleton".to_string(),
            source,
        })?;

        Ok(SkinnedModel {
            vertices,
            indices,
            subsets,
            materials,
            skeleton,
        })
    }

    pub fn parse_static(&self, source: &str) -> Result<StaticModel> {
        let mut reader = TokenReader::new(source, self.options.label_policy);
        let header = read_header(&mut reader)?;

        let materials = read_materials(&mut reader, header.materials)?;
        let subsets = read_subset_table(&mut reader, &header)?;
        let vertices = read_static_vertices(&mut reader, header.vertices)?;
        let indices = read_triangles(&mut reader, header.triangles, header.vertices)?;

        if reader.next_token().is_some() {
            log::debug!("Static load skipped the skeleton sections");
        }

        Ok(StaticModel {
            vertices,
            indices,
            subsets,
            materials,
        })
    }

    fn read_animation_clips(
        &self,
        reader: &mut TokenReader<'_>,
        bones: usize,
        count: usize,
    ) -> Result<Vec<AnimationClip>> {
        reader.section("AnimationClips")?;

        let mut clips = Vec::with_capacity(capacity_hint(count));
        for _ in 0..count {
            reader.label("AnimationClip")?;
            let name = reader.word("clip name")?.to_string();
            reader.delimiter("{")?;

            let mut tracks = Vec::with_capacity(capacity_hint(bones));
            for bone in 0..bones {
                let keyframes = self.read_bone_keyframes(reader, bone)?;
                let track = BoneAnimation::new(keyframes).map_err(|source| LoadError::Animation {
                    context: format!("clip {name:?}, bone {bone}"),
                    source,
                })?;
                tracks.push(track);
            }
            reader.delimiter("}")?;

            log::debug!("Read clip {name:?} with {bones} bone tracks");
            clips.push(AnimationClip::new(name, tracks));
        }
        Ok(clips)
    }

    fn read_bone_keyframes(&self, reader: &mut TokenReader<'_>, bone: usize) -> ParseResult<Vec<Keyframe>> {
        reader.label(&format!("Bone{bone}"))?;
        reader.label("#Keyframes:")?;
        let count: u32 = reader.number("keyframe count")?;
        reader.delimiter("{")?;

        let mut keyframes = Vec::with_capacity(capacity_hint(count as usize));
        for _ in 0..count {
            reader.label("Time:")?;
            let time = reader.float("keyframe time")?;
            reader.label("Pos:")?;
            let translation = Vec3::from_array(reader.floats("keyframe translation")?);
            reader.label("Scale:")?;
            let scale = Vec3::from_array(reader.floats("keyframe scale")?);
            reader.label("Quat:")?;
            let (line, column) = reader.peek_position();
            let components = reader.floats::<4>("keyframe rotation")?;
            let rotation =
                checked_rotation(components, self.options.normalize_rotations).ok_or(ParseError {
                    line,
                    column,
                    kind: ParseErrorKind::DegenerateRotation { found: components },
                })?;

            keyframes.push(Keyframe::new(time, translation, scale, rotation));
        }
        reader.delimiter("}")?;

        Ok(keyframes)
    }
}

/// Loads a skinned m3d file with default options.
pub fn load(path: impl AsRef<Path>) -> Result<SkinnedModel> {
    M3dLoader::new().load_skinned(path)
}

fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    String::from_utf8(bytes).map_err(|err| {
        let valid = &err.as_bytes()[..err.utf8_error().valid_up_to()];
        let (line, column) = text_position(&String::from_utf8_lossy(valid));
        LoadError::Parse(ParseError {
            line,
            column,
            kind: ParseErrorKind::InvalidUtf8,
        })
    })
}

/// 1-based position just past the end of `prefix`.
fn text_position(prefix: &str) -> (usize, usize) {
    let line = prefix.matches('\n').count() + 1;
    let column = prefix.rsplit('\n').next().map_or(0, |last| last.chars().count()) + 1;
    (line, column)
}

/// Rejects zero-length and non-finite quaternions, normalizing on request.
fn checked_rotation(components: [f32; 4], normalize: bool) -> Option<Quat> {
    let rotation = Quat::from_array(components);
    let length_squared = rotation.length_squared();
    if !length_squared.is_finite() || length_squared < MIN_ROTATION_LENGTH_SQUARED {
        return None;
    }

    let rotation = if normalize { rotation.normalize() } else { rotation };
    rotation.is_finite().then_some(rotation)
}

fn capacity_hint(count: usize) -> usize {
    count.min(MAX_PREALLOCATED)
}

fn read_count(reader: &mut TokenReader<'_>, label: &str) -> ParseResult<usize> {
    reader.label(label)?;
    let count: u32 = reader.number(label)?;
    Ok(count as usize)
}

fn read_header(reader: &mut TokenReader<'_>) -> ParseResult<Header> {
    reader.section("m3d-File-Header")?;
    let header = Header {
        materials: read_count(reader, "#Materials")?,
        vertices: read_count(reader, "#Vertices")?,
        triangles: read_count(reader, "#Triangles")?,
        bones: read_count(reader, "#Bones")?,
        clips: read_count(reader, "#AnimationClips")?,
    };
    log::debug!("m3d header: {header:?}");
    Ok(header)
}

fn read_materials(reader: &mut TokenReader<'_>, count: usize) -> ParseResult<Vec<M3dMaterial>> {
    reader.section("Materials")?;

    let mut materials = Vec::with_capacity(capacity_hint(count));
    for _ in 0..count {
        reader.label("Name:")?;
        let name = reader.word("material name")?.to_string();
        reader.label("Diffuse:")?;
        let diffuse = Vec3::from_array(reader.floats("diffuse albedo")?);
        reader.label("Fresnel0:")?;
        let fresnel_r0 = Vec3::from_array(reader.floats("fresnel R0")?);
        reader.label("Roughness:")?;
        let roughness = reader.float("roughness")?;
        reader.label("AlphaClip:")?;
        let alpha_clip = reader.flag("alpha clip flag")?;
        reader.label("MaterialTypeName:")?;
        let material_type = reader.word("material type name")?.to_string();
        reader.label("DiffuseMap:")?;
        let diffuse_map = reader.word("diffuse map name")?.to_string();
        reader.label("NormalMap:")?;
        let normal_map = reader.word("normal map name")?.to_string();

        materials.push(M3dMaterial {
            name,
            diffuse_albedo: diffuse.extend(1.0),
            fresnel_r0,
            roughness,
            alpha_clip,
            material_type,
            diffuse_map,
            normal_map,
        });
    }
    Ok(materials)
}

fn read_subset_table(reader: &mut TokenReader<'_>, header: &Header) -> ParseResult<Vec<Subset>> {
    reader.section("SubsetTable")?;

    // one subset per material
    let mut subsets = Vec::with_capacity(capacity_hint(header.materials));
    for _ in 0..header.materials {
        reader.label("SubsetID:")?;
        let id = reader.number("subset id")?;
        reader.label("VertexStart:")?;
        let vertex_start = reader.number("subset vertex start")?;
        reader.label("VertexCount:")?;
        let vertex_count = reader.number("subset vertex count")?;
        reader.label("FaceStart:")?;
        let face_start = reader.number("subset face start")?;
        reader.label("FaceCount:")?;
        let face_count = reader.number("subset face count")?;

        let subset = Subset {
            id,
            vertex_start,
            vertex_count,
            face_start,
            face_count,
        };
        check_range(reader, "subset vertex", vertex_start, vertex_count, header.vertices)?;
        check_range(reader, "subset face", face_start, face_count, header.triangles)?;
        subsets.push(subset);
    }
    Ok(subsets)
}

fn check_range(
    reader: &mut TokenReader<'_>,
    what: &'static str,
    start: u32,
    count: u32,
    limit: usize,
) -> ParseResult<()> {
    if u64::from(start) + u64::from(count) <= limit as u64 {
        return Ok(());
    }
    let (line, column) = reader.peek_position();
    Err(ParseError {
        line,
        column,
        kind: ParseErrorKind::RangeOutOfBounds {
            what,
            start,
            count,
            limit,
        },
    })
}

fn read_static_vertices(reader: &mut TokenReader<'_>, count: usize) -> ParseResult<Vec<Vertex>> {
    reader.section("Vertices")?;

    let mut vertices = Vec::with_capacity(capacity_hint(count));
    for _ in 0..count {
        reader.label("Position:")?;
        let position = reader.floats("vertex position")?;
        reader.label("Tangent:")?;
        let tangent = reader.floats("vertex tangent")?;
        reader.label("Normal:")?;
        let normal = reader.floats("vertex normal")?;
        reader.label("Tex-Coords:")?;
        let tex_coord = reader.floats("vertex texture coordinates")?;

        vertices.push(Vertex {
            position,
            normal,
            tex_coord,
            tangent,
        });
    }
    Ok(vertices)
}

fn read_skinned_vertices(
    reader: &mut TokenReader<'_>,
    count: usize,
    bones: usize,
) -> ParseResult<Vec<SkinnedVertex>> {
    reader.section("Vertices")?;

    // Without bones every index is 0; otherwise it must name a bone.
    let index_limit = bones.clamp(1, usize::from(u8::MAX) + 1);

    let mut vertices = Vec::with_capacity(capacity_hint(count));
    for _ in 0..count {
        reader.label("Position:")?;
        let position = reader.floats("vertex position")?;
        reader.label("Tangent:")?;
        let [tx, ty, tz, _handedness] = reader.floats::<4>("vertex tangent")?;
        reader.label("Normal:")?;
        let normal = reader.floats("vertex normal")?;
        reader.label("Tex-Coords:")?;
        let tex_coord = reader.floats("vertex texture coordinates")?;

        reader.label("BlendWeights:")?;
        let weights = reader.floats::<MAX_BONE_INFLUENCES>("bone weight")?;
        let mut bone_weights = [0.0; STORED_BONE_WEIGHTS];
        bone_weights.copy_from_slice(&weights[..STORED_BONE_WEIGHTS]);

        reader.label("BlendIndices:")?;
        let mut bone_indices = [0u8; MAX_BONE_INFLUENCES];
        for slot in &mut bone_indices {
            // index_limit <= 256, so the index always fits in a byte
            *slot = reader.index("bone index", index_limit)? as u8;
        }

        vertices.push(SkinnedVertex {
            position,
            normal,
            tex_coord,
            tangent: [tx, ty, tz],
            bone_weights,
            bone_indices,
        });
    }
    Ok(vertices)
}

fn read_triangles(reader: &mut TokenReader<'_>, count: usize, vertices: usize) -> ParseResult<Vec<u16>> {
    reader.section("Triangles")?;

    let index_limit = vertices.min(usize::from(u16::MAX) + 1);
    let mut indices = Vec::with_capacity(capacity_hint(count.saturating_mul(3)));
    for _ in 0..count {
        for _ in 0..3 {
            indices.push(reader.index("vertex index", index_limit)? as u16);
        }
    }
    Ok(indices)
}

fn read_bone_offsets(reader: &mut TokenReader<'_>, bones: usize) -> ParseResult<Vec<Mat4>> {
    reader.section("BoneOffsets")?;

    let mut offsets = Vec::with_capacity(capacity_hint(bones));
    for bone in 0..bones {
        reader.label(&format!("BoneOffset{bone}"))?;
        // Stored row by row for row vectors; read as columns that is the
        // same transform for glam's column vectors.
        let values = reader.floats::<16>("bone offset matrix")?;
        offsets.push(Mat4::from_cols_array(&values));
    }
    Ok(offsets)
}

fn read_bone_hierarchy(reader: &mut TokenReader<'_>, bones: usize) -> ParseResult<Vec<i32>> {
    reader.section("BoneHierarchy")?;

    let mut parents = Vec::with_capacity(capacity_hint(bones));
    for bone in 0..bones {
        reader.label(&format!("ParentIndexOfBone{bone}:"))?;
        parents.push(reader.number("parent bone index")?);
    }
    Ok(parents)
}
