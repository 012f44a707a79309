/// Represents a single acquired frame.
///
/// Holding the surface texture blocks acquisition of the next one, so a frame
/// lives from `begin_frame` to `present` and no longer.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
