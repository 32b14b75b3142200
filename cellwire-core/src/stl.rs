/// STL mesh loading for binary and ASCII files
use std::f32::consts::FRAC_PI_2;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use log::debug;
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    combinator::map,
    multi::{count, many0},
    number::complete::{float, le_f32, le_u32},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};
use thiserror::Error;

use crate::geometry::Vector3;
use crate::shape::Mesh;
use crate::transform::Transform;

/// Bytes of free-form header at the start of a binary file
pub const HEADER_LEN: usize = 80;

/// Bytes per triangle record: normal, three vertices, attribute word
pub const FACET_LEN: usize = 50;

#[derive(Debug, Error)]
pub enum StlError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("file too small to be a valid STL ({len} bytes)")]
    TooShort { len: usize },

    #[error("STL declares {declared} triangles but only {available} complete records follow")]
    Truncated { declared: u32, available: usize },

    #[error("malformed STL: {0}")]
    Malformed(String),
}

/// One triangle as stored in the file.
///
/// The stored normal is kept for reference only; faces derive their
/// orientation from the vertex winding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    pub normal: Vector3,
    pub vertices: [Vector3; 3],
}

/// Parse a binary STL file.
///
/// Fails if fewer bytes remain than the declared triangle count needs;
/// trailing bytes after the last record are ignored.
pub fn parse_binary_stl(data: &[u8]) -> Result<Vec<Facet>, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooShort { len: data.len() });
    }

    let (records, declared) = binary_preamble(data).map_err(malformed)?;
    let available = records.len() / FACET_LEN;
    if declared as usize > available {
        return Err(StlError::Truncated { declared, available });
    }

    let (_, facets) = count(binary_facet, declared as usize)(records).map_err(malformed)?;
    Ok(facets)
}

fn binary_preamble(input: &[u8]) -> IResult<&[u8], u32> {
    let (input, _header) = take(HEADER_LEN)(input)?;
    le_u32(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Facet> {
    let (input, normal) = le_vector3(input)?;
    let (input, a) = le_vector3(input)?;
    let (input, b) = le_vector3(input)?;
    let (input, c) = le_vector3(input)?;
    let (input, _attribute) = take(2usize)(input)?;
    Ok((
        input,
        Facet {
            normal,
            vertices: [a, b, c],
        },
    ))
}

fn le_vector3(input: &[u8]) -> IResult<&[u8], Vector3> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn malformed<I>(err: nom::Err<nom::error::Error<I>>) -> StlError {
    match err {
        nom::Err::Incomplete(_) => StlError::Malformed("unexpected end of input".to_string()),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            StlError::Malformed(format!("{:?} parser failed", e.code))
        }
    }
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Vec<Facet>, StlError> {
    match ascii_solid(input) {
        Ok(("", facets)) => Ok(facets),
        Ok((rest, _)) => Err(StlError::Malformed(format!(
            "unexpected content at line {}",
            line_of(input, rest)
        ))),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(StlError::Malformed(format!(
            "{:?} parser failed at line {}",
            e.code,
            line_of(input, e.input)
        ))),
        Err(nom::Err::Incomplete(_)) => {
            Err(StlError::Malformed("unexpected end of input".to_string()))
        }
    }
}

fn line_of(input: &str, rest: &str) -> usize {
    let consumed = input.len() - rest.len();
    input[..consumed].matches('\n').count() + 1
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Facet>> {
    delimited(
        pair(keyword("solid"), not_line_ending),
        many0(ascii_facet),
        tuple((keyword("endsolid"), not_line_ending, multispace0)),
    )(input)
}

/// `facet normal <v> outer loop vertex <v> vertex <v> vertex <v> endloop endfacet`
fn ascii_facet(input: &str) -> IResult<&str, Facet> {
    map(
        tuple((
            preceded(keyword("facet"), keyed_vector3("normal")),
            preceded(
                pair(keyword("outer"), keyword("loop")),
                tuple((keyed_vector3("vertex"), keyed_vector3("vertex"), keyed_vector3("vertex"))),
            ),
            pair(keyword("endloop"), keyword("endfacet")),
        )),
        |(normal, (a, b, c), _)| Facet {
            normal,
            vertices: [a, b, c],
        },
    )(input)
}

fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(multispace0, tag(word))
}

/// A keyword followed by three whitespace-separated floats.
fn keyed_vector3<'a>(key: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, Vector3> {
    map(
        preceded(
            keyword(key),
            tuple((
                preceded(multispace0, float),
                preceded(multispace1, float),
                preceded(multispace1, float),
            )),
        ),
        |(x, y, z)| Vector3::new(x, y, z),
    )
}

/// Detect and parse STL file (binary or ASCII).
///
/// Input that starts with `solid` and parses as ASCII is ASCII; anything
/// else is read as binary, since binary headers may also start with `solid`.
pub fn parse_stl(data: &[u8]) -> Result<Vec<Facet>, StlError> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(facets) = parse_ascii_stl(text) {
                return Ok(facets);
            }
        }
    }

    parse_binary_stl(data)
}

/// Builds a mesh with one face per facet, sharing equal vertices.
pub fn mesh_from_facets(facets: &[Facet]) -> Mesh {
    let mut mesh = Mesh::with_capacity(facets.len());
    for facet in facets {
        mesh.add_face(&facet.vertices);
    }
    mesh
}

/// Moves a freshly loaded mesh into scene convention.
///
/// The bounding box midpoint goes to the origin, the mesh is scaled
/// uniformly, then turned a quarter turn about Z (the files' vertical axis).
pub fn fit_to_scene(mesh: &mut Mesh, scale: f32) {
    let center = mesh.bounds().center();
    mesh.translate(&-center);
    mesh.scale(scale);
    mesh.rotate_z(FRAC_PI_2);
}

/// Parses STL bytes into a mesh ready to place in a scene.
///
/// Any parse failure is returned as-is; no partial mesh is produced.
pub fn load_mesh(data: &[u8], scale: f32) -> Result<Mesh, StlError> {
    let facets = parse_stl(data)?;
    let mut mesh = mesh_from_facets(&facets);
    let bounds = mesh.bounds();
    debug!(
        "loaded {} triangles, {} unique vertices, bounds {:?} to {:?}",
        facets.len(),
        mesh.vertices().len(),
        bounds.min.as_slice(),
        bounds.max.as_slice()
    );
    fit_to_scene(&mut mesh, scale);
    Ok(mesh)
}

/// Reads a whole stream and loads it with [`load_mesh`].
pub fn load_mesh_from<R: Read>(mut reader: R, scale: f32) -> Result<Mesh, StlError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    load_mesh(&data, scale)
}

/// Reads an STL file from disk and loads it with [`load_mesh`].
pub fn read_mesh(path: impl AsRef<Path>, scale: f32) -> Result<Mesh, StlError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| StlError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes from {}", data.len(), path.display());
    load_mesh(&data, scale)
}
