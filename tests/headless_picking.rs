//! ID-buffer picking against a real device. Every test returns early when
//! no adapter is available.

use std::sync::mpsc;

use glam::Mat4;
use pickview::gpu::render_context::RenderContext;
use pickview::gpu::shader_composer::ShaderComposer;
use pickview::gpu::texture::RenderTarget;
use pickview::mesh::{GpuMesh, Material, Mesh, SubMesh, Vertex};
use pickview::options::{
    CameraOptions, MeshKind, PlacementOptions, SceneOptions,
};
use pickview::picking::{resolve_click, PickingTexture};
use pickview::scene::Scene;
use pickview::technique::{PickingTechnique, ShaderProgram, Technique};
use pickview::{EngineCommand, Options, PickEngine, PickviewError, PixelInfo};

const SIZE: u32 = 64;

fn context() -> Option<RenderContext> {
    match pollster::block_on(RenderContext::headless(SIZE, SIZE)) {
        Ok(context) => Some(context),
        Err(e) => {
            eprintln!("skipping: {e}");
            None
        }
    }
}

/// Axis-aligned quad in clip space at depth `z`, counter-clockwise.
fn quad(min: (f32, f32), max: (f32, f32), z: f32) -> Mesh {
    let vertex = |x: f32, y: f32| Vertex {
        position: [x, y, z],
        uv: [0.0, 0.0],
        normal: [0.0, 0.0, -1.0],
    };
    Mesh {
        vertices: vec![
            vertex(min.0, min.1),
            vertex(max.0, min.1),
            vertex(max.0, max.1),
            vertex(min.0, max.1),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
        submeshes: vec![SubMesh {
            base_index: 0,
            num_indices: 6,
            base_vertex: 0,
            material_index: 0,
        }],
        materials: vec![Material {
            diffuse_color: [1.0; 4],
        }],
    }
}

struct Fixture {
    context: RenderContext,
    technique: PickingTechnique,
    texture: PickingTexture,
}

impl Fixture {
    fn new() -> Option<Self> {
        let context = context()?;
        let mut composer = ShaderComposer::new().unwrap();
        let technique = PickingTechnique::new(
            &context.device,
            &mut composer,
            context.primitive_index,
        )
        .unwrap();
        let texture = PickingTexture::new(&context.device, SIZE, SIZE).unwrap();
        Some(Self {
            context,
            technique,
            texture,
        })
    }

    /// Render `meshes` in order; mesh `i` gets object index `i + 1`.
    fn render(&mut self, meshes: &[Mesh]) {
        let gpu: Vec<GpuMesh> = meshes
            .iter()
            .map(|m| GpuMesh::upload(&self.context.device, "Quad", m).unwrap())
            .collect();
        self.technique.begin_frame(&self.context.device, gpu.len());

        let mut encoder = self.context.create_encoder("Test Picking");
        {
            let mut pass = self.texture.enable_writing(&mut encoder);
            self.technique.bind(&mut pass);
            for (i, mesh) in gpu.iter().enumerate() {
                let mut object = self.technique.object(
                    &self.context.queue,
                    Mat4::IDENTITY,
                    Scene::pick_index(i),
                );
                mesh.render(&mut pass, &mut object).unwrap();
            }
            PickingTexture::disable_writing(pass);
        }
        self.context.submit(encoder);
    }

    fn read(&self, x: u32, y: u32) -> Result<PixelInfo, PickviewError> {
        self.texture
            .read_pixel(&self.context.device, &self.context.queue, x, y)
    }
}

#[test]
fn nearest_object_wins_in_either_draw_order() {
    let Some(mut fixture) = Fixture::new() else {
        return;
    };
    let near = quad((-1.0, -1.0), (1.0, 1.0), 0.25);
    let far = quad((-1.0, -1.0), (1.0, 1.0), 0.75);

    fixture.render(&[far.clone(), near.clone()]);
    assert_eq!(fixture.read(SIZE / 2, SIZE / 2).unwrap().object_id, 2);

    fixture.render(&[near, far]);
    assert_eq!(fixture.read(SIZE / 2, SIZE / 2).unwrap().object_id, 1);
}

#[test]
fn background_and_object_resolve() {
    let Some(mut fixture) = Fixture::new() else {
        return;
    };
    fixture.render(&[quad((-1.0, -1.0), (0.0, 1.0), 0.5)]);

    let extent = fixture.texture.extent();
    let left = resolve_click(
        (8.0, 32.0),
        extent,
        PickingTexture::ORIGIN,
        |x, y| fixture.read(x, y),
    )
    .unwrap();
    let selection = left.selection.unwrap();
    assert_eq!(selection.object, 0);
    assert_eq!(selection.draw, 0);

    let right = resolve_click(
        (56.0, 32.0),
        extent,
        PickingTexture::ORIGIN,
        |x, y| fixture.read(x, y),
    )
    .unwrap();
    assert!(right.pixel.is_background());
    assert_eq!(right.selection, None);
}

#[test]
fn rows_start_at_the_top() {
    let Some(mut fixture) = Fixture::new() else {
        return;
    };
    // Upper half of clip space.
    fixture.render(&[quad((-1.0, 0.0), (1.0, 1.0), 0.5)]);

    assert_eq!(fixture.read(SIZE / 2, SIZE / 4).unwrap().object_id, 1);
    assert!(fixture.read(SIZE / 2, 3 * SIZE / 4).unwrap().is_background());
}

#[test]
fn repeated_reads_agree() {
    let Some(mut fixture) = Fixture::new() else {
        return;
    };
    fixture.render(&[quad((-1.0, -1.0), (1.0, 1.0), 0.5)]);

    let first = fixture.read(10, 20).unwrap();
    let second = fixture.read(10, 20).unwrap();
    assert_eq!(first, second);
}

#[test]
fn reads_are_bounded_by_the_framebuffer() {
    let Some(mut fixture) = Fixture::new() else {
        return;
    };
    fixture.render(&[quad((-1.0, -1.0), (1.0, 1.0), 0.5)]);

    assert_eq!(fixture.read(SIZE - 1, SIZE - 1).unwrap().object_id, 1);
    assert!(matches!(
        fixture.read(SIZE, 0),
        Err(PickviewError::OutOfBounds { .. })
    ));
    assert!(matches!(
        fixture.read(0, SIZE),
        Err(PickviewError::OutOfBounds { .. })
    ));
}

#[test]
fn primitive_index_identifies_triangle() {
    let Some(mut fixture) = Fixture::new() else {
        return;
    };
    fixture.render(&[quad((-1.0, -1.0), (1.0, 1.0), 0.5)]);

    let bottom_right = fixture.read(SIZE - 4, SIZE - 4).unwrap();
    let top_left = fixture.read(4, 4).unwrap();
    if fixture.technique.writes_primitive_index() {
        assert_eq!(bottom_right.prim_id, 1);
        assert_eq!(top_left.prim_id, 2);
    } else {
        assert_eq!(bottom_right.prim_id, 0);
        assert_eq!(top_left.prim_id, 0);
    }
}

#[test]
fn engine_rejects_cursor_outside_surface() {
    let Some(context) = context() else {
        return;
    };
    let mut engine = PickEngine::with_context(context, Options::default())
        .unwrap();

    let err = engine.pick_at(SIZE as f32, 0.0).unwrap_err();
    assert!(matches!(err, PickviewError::OutOfBounds { .. }));
    assert_eq!(engine.selection(), None);

    // The sky above the default scene.
    let pick = engine.pick_at(0.0, 0.0).unwrap();
    assert!(pick.pixel.is_background());
    assert_eq!(engine.selection(), None);
}

#[test]
fn framebuffer_rejects_unusable_extents() {
    let Some(context) = context() else {
        return;
    };
    let device = &context.device;
    let max = device.limits().max_texture_dimension_2d;

    assert!(matches!(
        PickingTexture::new(device, 0, 8),
        Err(PickviewError::RenderResource { .. })
    ));
    assert!(matches!(
        PickingTexture::new(device, max + 1, 8),
        Err(PickviewError::RenderResource { .. })
    ));

    let mut texture = PickingTexture::new(device, 8, 8).unwrap();
    assert!(matches!(
        texture.resize(device, 8, 0),
        Err(PickviewError::RenderResource { .. })
    ));
    assert!(texture.resize(device, max + 1, 8).is_err());
    assert_eq!(texture.extent(), (8, 8));
    assert!(texture.read_pixel(device, &context.queue, 7, 7).is_ok());
}

#[test]
fn absent_uniform_is_reported_by_name() {
    let Some(context) = context() else {
        return;
    };
    let mut composer = ShaderComposer::new().unwrap();
    let program = ShaderProgram::new(
        &context.device,
        &mut composer,
        "SimpleColor",
        (
            include_str!("../assets/shaders/simple_color.wgsl"),
            "simple_color.wgsl",
        ),
        &[],
    )
    .unwrap();

    assert!(program.require("u_draw").is_ok());
    assert!(matches!(
        program.require("u_light"),
        Err(PickviewError::MissingUniform {
            technique: "SimpleColor",
            name: "u_light",
        })
    ));
}

/// One cube filling the middle of the view, its front face toward the
/// camera.
fn cube_in_view() -> Options {
    Options {
        scene: SceneOptions {
            mesh: MeshKind::Cube,
            size: 4.0,
            placements: vec![PlacementOptions::default()],
            ..SceneOptions::default()
        },
        camera: CameraOptions {
            position: [0.0, 0.0, -10.0],
            target: [0.0, 0.0, 1.0],
            ..CameraOptions::default()
        },
        ..Options::default()
    }
}

/// Draw the engine's scene offscreen and read back texel `(x, y)`.
fn scene_texel(engine: &mut PickEngine, x: u32, y: u32) -> [u8; 4] {
    let target = RenderTarget::new(
        &engine.context().device,
        "Test Scene",
        engine.size(),
        engine.context().format(),
        wgpu::TextureUsages::COPY_SRC,
    );
    engine.render_to(&target.view).unwrap();

    let context = engine.context();
    let staging = context.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Test Scene Readback"),
        size: u64::from(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });
    let mut encoder = context.create_encoder("Test Scene Copy");
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &target.texture,
            mip_level: 0,
            origin: wgpu::Origin3d { x, y, z: 0 },
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT),
                rows_per_image: Some(1),
            },
        },
        wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
    );
    context.submit(encoder);

    let slice = staging.slice(..4);
    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        tx.send(result).unwrap();
    });
    let _ = context.device.poll(wgpu::PollType::Wait).unwrap();
    rx.recv().unwrap().unwrap();
    let texel = slice.get_mapped_range();
    [texel[0], texel[1], texel[2], texel[3]]
}

#[test]
fn picked_object_is_tinted_and_its_triangle_outlined() {
    let Some(context) = context() else {
        return;
    };
    let mut engine =
        PickEngine::with_context(context, cube_in_view()).unwrap();
    // Off both face diagonals so the texel lies inside one triangle.
    let (x, y) = (20, 24);

    let pick = engine.pick_at(20.0, 24.0).unwrap();
    let selection = pick.selection.unwrap();
    assert_eq!(selection.object, 0);
    let selected = scene_texel(&mut engine, x, y);

    engine.execute(EngineCommand::ClearSelection);
    let plain = scene_texel(&mut engine, x, y);

    assert_ne!(selected, plain);
    if selection.triangle().is_some() {
        assert_eq!(selected, [255, 0, 0, 255]);
    }
}
