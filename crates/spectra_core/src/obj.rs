//! Wavefront OBJ loader.
//!
//! Parses the subset the renderer consumes: positions, texcoords, normals,
//! triangular faces in the `v`, `v/t`, `v//n` and `v/t/n` forms (with
//! 1-based or negative relative indices), and `g`/`o`/`usemtl` group starts.
//! Everything else (smoothing groups, mtllib, free-form geometry) is
//! skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::{UVec3, Vec2, Vec3};
use thiserror::Error;

use crate::TriangleMesh;

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to read OBJ file")]
    Io(#[from] std::io::Error),

    #[error("line {line}: malformed {directive} directive")]
    Malformed { line: usize, directive: &'static str },

    #[error("line {line}: only triangular faces are supported ({arity} vertices)")]
    FaceArity { line: usize, arity: usize },

    #[error("line {line}: face index out of range")]
    IndexRange { line: usize },
}

/// One corner of a face: vertex index plus optional texcoord/normal indices.
struct FaceCorner {
    v: u32,
    t: Option<u32>,
    n: Option<u32>,
}

/// Load a triangle mesh from an OBJ file.
pub fn load_obj(path: impl AsRef<Path>) -> Result<TriangleMesh, ObjError> {
    let reader = BufReader::new(File::open(path)?);
    let mut mesh = TriangleMesh::default();

    // Faces seen in the currently open group
    let mut current_group = String::new();
    let mut current_count = 0u32;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let head = tokens.next().unwrap_or_default();

        match head {
            "v" => {
                mesh.positions
                    .push(parse_vec3(&mut tokens).ok_or(ObjError::Malformed {
                        line: line_no,
                        directive: "v",
                    })?);
            }
            "vt" => {
                mesh.texcoords
                    .push(parse_vec2(&mut tokens).ok_or(ObjError::Malformed {
                        line: line_no,
                        directive: "vt",
                    })?);
            }
            "vn" => {
                mesh.normals
                    .push(parse_vec3(&mut tokens).ok_or(ObjError::Malformed {
                        line: line_no,
                        directive: "vn",
                    })?);
            }
            "f" => {
                let corner_tokens: Vec<&str> = tokens.collect();
                if corner_tokens.len() != 3 {
                    return Err(ObjError::FaceArity {
                        line: line_no,
                        arity: corner_tokens.len(),
                    });
                }

                let c0 = parse_corner(corner_tokens[0], &mesh, line_no)?;
                let c1 = parse_corner(corner_tokens[1], &mesh, line_no)?;
                let c2 = parse_corner(corner_tokens[2], &mesh, line_no)?;
                mesh.faces.push(UVec3::new(c0.v, c1.v, c2.v));
                mesh.face_texcoords
                    .push(zip3(c0.t, c1.t, c2.t));
                mesh.face_normals
                    .push(zip3(c0.n, c1.n, c2.n));
                current_count += 1;
            }
            "g" | "o" | "usemtl" => {
                if current_count > 0 {
                    mesh.groups.push((current_group.clone(), current_count));
                }
                current_group = tokens.next().unwrap_or_default().to_string();
                current_count = 0;
            }
            // mtllib, s, and anything unknown
            _ => {}
        }
    }

    if current_count > 0 {
        mesh.groups.push((current_group, current_count));
    }

    mesh.log_statistics();

    Ok(mesh)
}

fn parse_vec3<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<Vec3> {
    let x = tokens.next()?.parse().ok()?;
    let y = tokens.next()?.parse().ok()?;
    let z = tokens.next()?.parse().ok()?;
    Some(Vec3::new(x, y, z))
}

fn parse_vec2<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<Vec2> {
    let u = tokens.next()?.parse().ok()?;
    let v = tokens.next()?.parse().ok()?;
    Some(Vec2::new(u, v))
}

/// Resolve a 1-based or negative relative OBJ index against a pool size.
fn resolve_index(raw: i64, count: usize, line: usize) -> Result<u32, ObjError> {
    let resolved = if raw < 0 { count as i64 + raw } else { raw - 1 };
    if resolved < 0 || resolved >= count as i64 {
        return Err(ObjError::IndexRange { line });
    }
    Ok(resolved as u32)
}

fn parse_corner(token: &str, mesh: &TriangleMesh, line: usize) -> Result<FaceCorner, ObjError> {
    let malformed = || ObjError::Malformed {
        line,
        directive: "f",
    };

    let mut parts = token.split('/');
    let v_str = parts.next().ok_or_else(malformed)?;
    let t_str = parts.next();
    let n_str = parts.next();

    let v_raw: i64 = v_str.parse().map_err(|_| malformed())?;
    let v = resolve_index(v_raw, mesh.positions.len(), line)?;

    // An empty middle component is the v//n form
    let t = match t_str {
        Some("") | None => None,
        Some(s) => {
            let raw: i64 = s.parse().map_err(|_| malformed())?;
            Some(resolve_index(raw, mesh.texcoords.len(), line)?)
        }
    };
    let n = match n_str {
        Some("") | None => None,
        Some(s) => {
            let raw: i64 = s.parse().map_err(|_| malformed())?;
            Some(resolve_index(raw, mesh.normals.len(), line)?)
        }
    };

    Ok(FaceCorner { v, t, n })
}

/// A face attribute triple exists only when all three corners carry it.
fn zip3(a: Option<u32>, b: Option<u32>, c: Option<u32>) -> Option<UVec3> {
    match (a, b, c) {
        (Some(a), Some(b), Some(c)) => Some(UVec3::new(a, b, c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load_str(content: &str) -> Result<TriangleMesh, ObjError> {
        let mut file = tempfile_path();
        write!(file.1, "{content}").unwrap();
        file.1.flush().unwrap();
        load_obj(&file.0)
    }

    fn tempfile_path() -> (std::path::PathBuf, File) {
        let path = std::env::temp_dir().join(format!(
            "spectra_obj_test_{}_{:?}.obj",
            std::process::id(),
            std::thread::current().id()
        ));
        let file = File::create(&path).unwrap();
        (path, file)
    }

    #[test]
    fn test_load_plain_faces() {
        let mesh = load_str(
            "# comment\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             f 1 2 3\n",
        )
        .unwrap();

        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.faces, vec![UVec3::new(0, 1, 2)]);
        assert_eq!(mesh.face_texcoords, vec![None]);
        assert_eq!(mesh.face_normals, vec![None]);
        assert_eq!(mesh.groups, vec![(String::new(), 1)]);
    }

    #[test]
    fn test_load_full_corner_forms() {
        let mesh = load_str(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             vt 0 0\nvt 1 0\nvt 0 1\n\
             vn 0 0 1\n\
             f 1/1 2/2 3/3\n\
             f 1//1 2//1 3//1\n\
             f 1/1/1 2/2/1 3/3/1\n",
        )
        .unwrap();

        assert_eq!(mesh.faces.len(), 3);
        assert_eq!(mesh.face_texcoords[0], Some(UVec3::new(0, 1, 2)));
        assert_eq!(mesh.face_normals[0], None);
        assert_eq!(mesh.face_texcoords[1], None);
        assert_eq!(mesh.face_normals[1], Some(UVec3::ZERO));
        assert_eq!(mesh.face_texcoords[2], Some(UVec3::new(0, 1, 2)));
        assert_eq!(mesh.face_normals[2], Some(UVec3::ZERO));
    }

    #[test]
    fn test_load_negative_indices() {
        let mesh = load_str(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             f -3 -2 -1\n",
        )
        .unwrap();
        assert_eq!(mesh.faces, vec![UVec3::new(0, 1, 2)]);
    }

    #[test]
    fn test_load_groups() {
        let mesh = load_str(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             g floor\n\
             f 1 2 3\n\
             f 1 3 2\n\
             usemtl wall\n\
             f 2 1 3\n",
        )
        .unwrap();
        assert_eq!(
            mesh.groups,
            vec![("floor".to_string(), 2), ("wall".to_string(), 1)]
        );
    }

    #[test]
    fn test_malformed_line_is_reported() {
        let err = load_str("v 0 0\n").unwrap_err();
        match err {
            ObjError::Malformed { line, directive } => {
                assert_eq!(line, 1);
                assert_eq!(directive, "v");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_quad_face_rejected() {
        let err = load_str(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             f 1 2 3 4\n",
        )
        .unwrap_err();
        assert!(matches!(err, ObjError::FaceArity { line: 5, arity: 4 }));
    }

    #[test]
    fn test_dangling_index_rejected() {
        let err = load_str("v 0 0 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(err, ObjError::IndexRange { line: 2 }));
    }
}
