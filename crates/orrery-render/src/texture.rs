//! Image decoding and GPU texture upload.

use std::path::{Path, PathBuf};

use wgpu::util::DeviceExt;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load texture {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Decodes an image file into 8-bit RGBA.
pub fn load_rgba(path: &Path) -> Result<image::RgbaImage, TextureError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| TextureError::Load {
            path: path.to_path_buf(),
            source,
        })
}

/// A sampled 2D texture.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl GpuTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &image::RgbaImage,
        label: &str,
    ) -> Self {
        let (width, height) = image.dimensions();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: Self::FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image.as_raw(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// 1x1 opaque white, sampled when a material has no usable image.
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let pixel = image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        Self::from_image(device, queue, &pixel, "white-texture")
    }
}

pub fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("body-sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Linear,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::tests::create_test_device;

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ring.png");
        let img = image::RgbaImage::from_fn(4, 1, |x, _| image::Rgba([255, 255, 255, (x * 60) as u8]));
        img.save(&path).unwrap();

        let loaded = load_rgba(&path).unwrap();
        assert_eq!(loaded.dimensions(), (4, 1));
        assert_eq!(loaded.get_pixel(3, 0)[3], 180);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pluto.jpg");
        let err = load_rgba(&path).unwrap_err();
        let TextureError::Load { path: reported, .. } = &err;
        assert_eq!(reported, &path);
        assert!(err.to_string().contains("pluto.jpg"));
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("earth.jpg");
        std::fs::write(&path, b"not a jpeg").unwrap();
        assert!(load_rgba(&path).is_err());
    }

    #[test]
    fn test_upload() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let texture = GpuTexture::white(&device, &queue);
        assert_eq!((texture.width, texture.height), (1, 1));
    }
}
