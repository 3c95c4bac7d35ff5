use bytemuck::{Pod, Zeroable};
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

pub(crate) struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

/// Segments around the trunk and log cylinders.
pub(crate) const CYLINDER_SEGMENTS: u16 = 8;
/// Segments around a leaf cone; three gives the triangular blade shape.
pub(crate) const CONE_SEGMENTS: u16 = 3;

/// Unit cube centred on the origin.
pub(crate) fn cube_mesh() -> MeshData {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        Vertex { position: [-p, -p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p, -p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p,  p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [-p,  p,  p], normal: [0.0, 0.0, 1.0] },
        // -Z face
        Vertex { position: [ p, -p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p, -p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p,  p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [ p,  p, -p], normal: [0.0, 0.0, -1.0] },
        // +X face
        Vertex { position: [ p, -p,  p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p, -p, -p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p, -p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p,  p], normal: [1.0, 0.0, 0.0] },
        // -X face
        Vertex { position: [-p, -p, -p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p, -p,  p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p,  p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p, -p], normal: [-1.0, 0.0, 0.0] },
        // +Y face
        Vertex { position: [-p,  p,  p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p,  p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p, -p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [-p,  p, -p], normal: [0.0, 1.0, 0.0] },
        // -Y face
        Vertex { position: [-p, -p, -p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p, -p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p,  p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [-p, -p,  p], normal: [0.0, -1.0, 0.0] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    MeshData { vertices, indices }
}

fn ring_point(i: u16, segments: u16) -> (f32, f32) {
    let a = i as f32 / segments as f32 * TAU;
    (a.cos(), a.sin())
}

/// Flat disc at height `y` facing `normal_y`.
fn push_cap(mesh: &mut MeshData, segments: u16, y: f32, normal_y: f32) {
    let centre = mesh.vertices.len() as u16;
    let normal = [0.0, normal_y, 0.0];
    mesh.vertices.push(Vertex {
        position: [0.0, y, 0.0],
        normal,
    });
    for i in 0..segments {
        let (c, s) = ring_point(i, segments);
        mesh.vertices.push(Vertex {
            position: [c * 0.5, y, s * 0.5],
            normal,
        });
    }
    for i in 0..segments {
        let a = centre + 1 + i;
        let b = centre + 1 + (i + 1) % segments;
        if normal_y > 0.0 {
            mesh.indices.extend_from_slice(&[centre, b, a]);
        } else {
            mesh.indices.extend_from_slice(&[centre, a, b]);
        }
    }
}

/// Cylinder of diameter 1 and height 1 along +Y, centred on the origin.
pub(crate) fn cylinder_mesh(segments: u16) -> MeshData {
    let mut mesh = MeshData {
        vertices: Vec::new(),
        indices: Vec::new(),
    };
    for i in 0..=segments {
        let (c, s) = ring_point(i, segments);
        let normal = [c, 0.0, s];
        mesh.vertices.push(Vertex {
            position: [c * 0.5, -0.5, s * 0.5],
            normal,
        });
        mesh.vertices.push(Vertex {
            position: [c * 0.5, 0.5, s * 0.5],
            normal,
        });
    }
    for i in 0..segments {
        let b0 = i * 2;
        let t0 = b0 + 1;
        let b1 = b0 + 2;
        let t1 = b0 + 3;
        mesh.indices.extend_from_slice(&[b0, t0, b1, b1, t0, t1]);
    }
    push_cap(&mut mesh, segments, 0.5, 1.0);
    push_cap(&mut mesh, segments, -0.5, -1.0);
    mesh
}

/// Cone with a base of diameter 1 at y = -0.5 and its apex at y = 0.5.
pub(crate) fn cone_mesh(segments: u16) -> MeshData {
    let mut mesh = MeshData {
        vertices: Vec::new(),
        indices: Vec::new(),
    };
    // Slant normal: the side rises 1 over a run of 0.5.
    let slope = 0.5_f32;
    let inv = 1.0 / (1.0 + slope * slope).sqrt();
    for i in 0..segments {
        let (c0, s0) = ring_point(i, segments);
        let (c1, s1) = ring_point(i + 1, segments);
        let (cm, sm) = ring_point(2 * i + 1, segments * 2);
        let base = mesh.vertices.len() as u16;
        let n = |c: f32, s: f32| [c * inv, slope * inv, s * inv];
        mesh.vertices.push(Vertex {
            position: [c0 * 0.5, -0.5, s0 * 0.5],
            normal: n(c0, s0),
        });
        mesh.vertices.push(Vertex {
            position: [0.0, 0.5, 0.0],
            normal: n(cm, sm),
        });
        mesh.vertices.push(Vertex {
            position: [c1 * 0.5, -0.5, s1 * 0.5],
            normal: n(c1, s1),
        });
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
    push_cap(&mut mesh, segments, -0.5, -1.0);
    mesh
}

/// Unit square in the XZ plane facing +Y.
pub(crate) fn plane_mesh() -> MeshData {
    let n = [0.0, 1.0, 0.0];
    let vertices = vec![
        Vertex { position: [-0.5, 0.0, 0.5], normal: n },
        Vertex { position: [0.5, 0.0, 0.5], normal: n },
        Vertex { position: [0.5, 0.0, -0.5], normal: n },
        Vertex { position: [-0.5, 0.0, -0.5], normal: n },
    ];
    MeshData {
        vertices,
        indices: vec![0, 1, 2, 2, 3, 0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(mesh: &MeshData) {
        assert_eq!(mesh.indices.len() % 3, 0);
        for i in &mesh.indices {
            assert!((*i as usize) < mesh.vertices.len());
        }
        for v in &mesh.vertices {
            assert!(v.position.iter().all(|c| c.abs() <= 0.5 + 1e-6));
            let len = v.normal.iter().map(|c| c * c).sum::<f32>().sqrt();
            assert!((len - 1.0).abs() < 1e-5, "{v:?}");
        }
    }

    #[test]
    fn meshes_are_well_formed() {
        check(&cube_mesh());
        check(&cylinder_mesh(CYLINDER_SEGMENTS));
        check(&cone_mesh(CONE_SEGMENTS));
        check(&plane_mesh());
    }

    #[test]
    fn cylinder_triangle_count() {
        let m = cylinder_mesh(8);
        // Two per side quad plus one per cap segment, two caps.
        assert_eq!(m.indices.len() / 3, 8 * 2 + 8 * 2);
    }

    #[test]
    fn cone_has_single_apex_height() {
        let m = cone_mesh(CONE_SEGMENTS);
        let top = m.vertices.iter().filter(|v| v.position[1] > 0.0).count();
        assert_eq!(top, CONE_SEGMENTS as usize);
    }

    #[test]
    fn plane_faces_up() {
        let m = plane_mesh();
        let v: Vec<_> = m.vertices.iter().map(|v| glam::Vec3::from(v.position)).collect();
        let normal = (v[1] - v[0]).cross(v[2] - v[0]);
        assert!(normal.y > 0.0);
    }
}
