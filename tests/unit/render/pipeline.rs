use super::*;

fn pos(v: &Vertex) -> Vec3 {
    Vec3::from_array(v.position)
}

#[test]
fn cube_has_24_vertices_and_12_triangles() {
    let (vertices, indices) = cube_geometry();
    assert_eq!(vertices.len(), 24);
    assert_eq!(indices.len(), 36);
    assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    for v in &vertices {
        assert!(v.position.iter().all(|c| c.abs() == 1.0), "{v:?}");
        assert!(v.uv.iter().all(|c| (0.0..=1.0).contains(c)), "{v:?}");
    }
}

#[test]
fn triangles_face_outward() {
    let (vertices, indices) = cube_geometry();
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [0, 1, 2].map(|k| pos(&vertices[tri[k] as usize]));
        let geometric = (b - a).cross(c - a);
        let centre = (a + b + c) / 3.0;
        assert!(geometric.dot(centre) > 0.0, "triangle {tri:?} faces inward");
    }
}

#[test]
fn front_quad_is_drawn_last_and_upright() {
    let (vertices, indices) = cube_geometry();
    let last = &indices[30..];
    let quad: Vec<&Vertex> = last.iter().map(|&i| &vertices[i as usize]).collect();
    assert!(quad.iter().all(|v| v.position[2] == -1.0));

    let top_left = quad
        .iter()
        .find(|v| v.position[0] == -1.0 && v.position[1] == 1.0)
        .unwrap();
    assert_eq!(top_left.uv, [0.0, 0.0]);
    let bottom_right = quad
        .iter()
        .find(|v| v.position[0] == 1.0 && v.position[1] == -1.0)
        .unwrap();
    assert_eq!(bottom_right.uv, [1.0, 1.0]);
}

#[test]
fn vertex_layout_matches_struct() {
    let layout = Vertex::layout();
    assert_eq!(layout.array_stride, 20);
    assert_eq!(layout.attributes.len(), 2);
    assert_eq!(layout.attributes[1].offset, 12);
}

#[test]
fn address_modes_map_to_wgpu() {
    assert_eq!(AddressMode::default(), AddressMode::Clamp);
    assert_eq!(AddressMode::Clamp.to_wgpu(), wgpu::AddressMode::ClampToEdge);
    assert_eq!(AddressMode::Wrap.to_wgpu(), wgpu::AddressMode::Repeat);
    assert_eq!(AddressMode::Mirror.to_wgpu(), wgpu::AddressMode::MirrorRepeat);
}
