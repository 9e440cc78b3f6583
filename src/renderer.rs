//! The seam between the interaction core and the GPU.

use std::sync::Arc;

use winit::window::Window;

use crate::camera::Camera;
use crate::geometry::{Material, RawGeometry};
use crate::gpu::{GpuContext, GpuError};
use crate::mesh_pass::MeshPass;
use crate::scene::{MeshId, Scene};

/// Draws one frame of a scene from a camera.
///
/// The frame driver only needs this trait, so interaction logic can run
/// headless in tests with a recording implementation.
pub trait SceneRenderer {
    type Error;

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), Self::Error>;
}

/// Presents scenes to a window surface.
pub struct SurfaceRenderer {
    pub gpu: GpuContext,
    pub mesh_pass: MeshPass,
}

impl SurfaceRenderer {
    pub fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let gpu = GpuContext::new(window)?;
        let mesh_pass = MeshPass::new(&gpu);
        Ok(Self { gpu, mesh_pass })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    pub fn upload(&mut self, label: &str, geometry: &RawGeometry, material: &Material) -> MeshId {
        self.mesh_pass.upload(&self.gpu, label, geometry, material)
    }
}

impl SceneRenderer for SurfaceRenderer {
    type Error = wgpu::SurfaceError;

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), Self::Error> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.mesh_pass.render(&self.gpu, &view, scene, camera);
        output.present();
        Ok(())
    }
}
