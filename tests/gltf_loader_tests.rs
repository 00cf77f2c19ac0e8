mod common;

use glam::Vec3;
use model_viewer::error::LoadCause;
use model_viewer::loaders::{AssetLoader, GltfLoader};

// ============================================================================
// Successful loads
// ============================================================================

#[test]
fn test_load_embedded_gltf() {
    let dir = common::scratch_dir("embedded-gltf");
    let path = common::write_triangle_gltf(&dir);

    let asset = GltfLoader::new().load(path.to_str().unwrap()).unwrap();

    assert_eq!(asset.name, "triangle");
    assert_eq!(asset.meshes.len(), 1);
    assert_eq!(asset.triangle_count(), 1);
    assert_eq!(asset.meshes[0].name.as_deref(), Some("leaf"));
}

#[test]
fn test_load_binary_glb() {
    let dir = common::scratch_dir("binary-glb");
    let path = common::write_triangle_glb(&dir);

    let asset = GltfLoader::new().load(path.to_str().unwrap()).unwrap();

    assert_eq!(asset.triangle_count(), 1);
    assert_eq!(asset.vertex_count(), 3);
}

#[test]
fn test_node_translation_is_baked() {
    let dir = common::scratch_dir("baked-translation");
    let path = common::write_triangle_glb(&dir);

    let asset = GltfLoader::new().load(path.to_str().unwrap()).unwrap();
    let mesh = &asset.meshes[0];

    assert_eq!(mesh.positions[0], Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(mesh.positions[1], Vec3::new(1.0, 1.0, 0.0));
    assert_eq!(asset.bounds.min, Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(asset.bounds.max, Vec3::new(1.0, 2.0, 0.0));
}

#[test]
fn test_missing_normals_are_computed() {
    let dir = common::scratch_dir("computed-normals");
    let path = common::write_triangle_glb(&dir);

    let asset = GltfLoader::new().load(path.to_str().unwrap()).unwrap();

    for normal in &asset.meshes[0].normals {
        assert!((*normal - Vec3::Z).length() < 1e-5, "got {:?}", normal);
    }
}

#[test]
fn test_material_base_color() {
    let dir = common::scratch_dir("base-color");
    let path = common::write_triangle_glb(&dir);

    let asset = GltfLoader::new().load(path.to_str().unwrap()).unwrap();
    assert_eq!(asset.meshes[0].base_color, [1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_base_dir_and_file_uri() {
    let dir = common::scratch_dir("base-dir");
    common::write_triangle_glb(&dir);

    let relative = GltfLoader::with_base_dir(&dir).load("triangle.glb").unwrap();
    assert_eq!(relative.triangle_count(), 1);

    let uri = format!("file://{}", dir.join("triangle.glb").display());
    let absolute = GltfLoader::new().load(&uri).unwrap();
    assert_eq!(absolute.triangle_count(), 1);
}

#[test]
fn test_triangle_strip_is_kept() {
    let dir = common::scratch_dir("triangle-strip");
    let path = common::write_quad_gltf(&dir, 5);

    let asset = GltfLoader::new().load(path.to_str().unwrap()).unwrap();

    assert_eq!(asset.triangle_count(), 2);
    assert_eq!(asset.meshes[0].indices, vec![0, 1, 2, 1, 3, 2]);
}

#[test]
fn test_triangle_fan_is_kept() {
    let dir = common::scratch_dir("triangle-fan");
    let path = common::write_quad_gltf(&dir, 6);

    let asset = GltfLoader::new().load(path.to_str().unwrap()).unwrap();

    assert_eq!(asset.triangle_count(), 2);
    assert_eq!(asset.meshes[0].indices, vec![1, 2, 0, 2, 3, 0]);
}

#[test]
fn test_percent_encoded_file_uri() {
    let dir = common::scratch_dir("spaced name");
    common::write_triangle_glb(&dir);

    let encoded = dir.join("triangle.glb").display().to_string().replace(' ', "%20");
    let asset = GltfLoader::new().load(&format!("file://{}", encoded)).unwrap();

    assert_eq!(asset.triangle_count(), 1);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_file_fails() {
    let failure = GltfLoader::new().load("/no/such/model.glb").unwrap_err();

    assert_eq!(failure.uri, "/no/such/model.glb");
    assert!(matches!(failure.cause, LoadCause::Import(_)));
}

#[test]
fn test_garbage_file_fails() {
    let dir = common::scratch_dir("garbage");
    let path = dir.join("broken.glb");
    std::fs::write(&path, b"this is not a model").unwrap();

    let failure = GltfLoader::new().load(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(failure.cause, LoadCause::Import(_)));
}

#[test]
fn test_remote_uri_is_unsupported() {
    let failure = GltfLoader::new()
        .load("https://example.com/photorealistic_plant.glb")
        .unwrap_err();

    assert!(matches!(failure.cause, LoadCause::UnsupportedScheme(ref scheme) if scheme == "https"));
}
