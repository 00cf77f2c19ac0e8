#![allow(dead_code)]

use std::path::PathBuf;

/// One triangle: positions (0,0,0) (1,0,0) (0,1,0), u16 indices 0 1 2, padded to 44 bytes
pub const TRIANGLE_BASE64: &str = "AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA=";

/// Fresh scratch directory per test
pub fn scratch_dir(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "model-viewer-{}-{}",
        std::process::id(),
        test_name
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

pub fn triangle_buffer() -> Vec<u8> {
    let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let indices: [u16; 3] = [0, 1, 2];

    let mut bytes: Vec<u8> = positions.iter().flat_map(|v| v.to_le_bytes()).collect();
    bytes.extend(indices.iter().flat_map(|v| v.to_le_bytes()));
    bytes.extend([0, 0]);
    bytes
}

/// glTF document with a single translated, red triangle node.
/// `buffer_uri` of `None` means the buffer lives in the GLB binary chunk.
pub fn triangle_document(buffer_uri: Option<&str>) -> String {
    let uri = buffer_uri
        .map(|u| format!(r#""uri": "{}", "#, u))
        .unwrap_or_default();

    format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "name": "leaf", "mesh": 0, "translation": [0.0, 1.0, 0.0] }}],
  "meshes": [{{ "name": "leaf", "primitives": [{{ "attributes": {{ "POSITION": 0 }}, "indices": 1, "material": 0 }}] }}],
  "materials": [{{ "pbrMetallicRoughness": {{ "baseColorFactor": [1.0, 0.0, 0.0, 1.0] }} }}],
  "buffers": [{{ {uri}"byteLength": 44 }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }},
    {{ "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }}
  ]
}}"#
    )
}

/// Write an embedded-buffer `.gltf` and return its path
pub fn write_triangle_gltf(dir: &std::path::Path) -> PathBuf {
    let path = dir.join("triangle.gltf");
    let uri = format!("data:application/octet-stream;base64,{}", TRIANGLE_BASE64);
    std::fs::write(&path, triangle_document(Some(&uri))).expect("write gltf");
    path
}

/// Write a binary `.glb` and return its path
pub fn write_triangle_glb(dir: &std::path::Path) -> PathBuf {
    let mut json = triangle_document(None).into_bytes();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let bin = triangle_buffer();

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend(b"glTF");
    glb.extend(2u32.to_le_bytes());
    glb.extend((total as u32).to_le_bytes());
    glb.extend((json.len() as u32).to_le_bytes());
    glb.extend(b"JSON");
    glb.extend(&json);
    glb.extend((bin.len() as u32).to_le_bytes());
    glb.extend(b"BIN\0");
    glb.extend(&bin);

    let path = dir.join("triangle.glb");
    std::fs::write(&path, glb).expect("write glb");
    path
}

/// Quad as a four-vertex strip: (0,0,0) (1,0,0) (0,1,0) (1,1,0)
pub const QUAD_STRIP_BASE64: &str = "AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAACAPwAAgD8AAAAA";

/// Write an embedded-buffer `.gltf` whose only primitive uses `mode`
/// (5 = triangle strip, 6 = triangle fan) and return its path
pub fn write_quad_gltf(dir: &std::path::Path, mode: u32) -> PathBuf {
    let document = format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "mesh": 0 }}],
  "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0 }}, "mode": {mode} }}] }}],
  "buffers": [{{ "uri": "data:application/octet-stream;base64,{QUAD_STRIP_BASE64}", "byteLength": 48 }}],
  "bufferViews": [{{ "buffer": 0, "byteOffset": 0, "byteLength": 48, "target": 34962 }}],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }}
  ]
}}"#
    );

    let path = dir.join(format!("quad-{}.gltf", mode));
    std::fs::write(&path, document).expect("write gltf");
    path
}
