use image::RgbaImage;

/// Fails when an image of this size cannot be uploaded as a 2D texture.
pub fn check_texture_size(width: u32, height: u32, limits: &wgpu::Limits) -> crate::Result<()> {
    let max = limits.max_texture_dimension_2d;
    if width > max || height > max {
        return Err(crate::Error::CanvasTooLarge { width, height, max });
    }
    Ok(())
}

/// GPU copy of the canvas, sampled by the presentation quad.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    size: wgpu::Extent3d,
}

impl Texture {
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &RgbaImage,
        label: Option<&str>,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: img.width(),
            height: img.height(),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // nearest filtering keeps canvas pixels sharp when the window is scaled
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let texture = Self {
            texture,
            view,
            sampler,
            size,
        };
        texture.update_data(queue, img);
        texture
    }

    /// Upload a new frame. The image must match the texture size.
    pub fn update_data(&self, queue: &wgpu::Queue, img: &RgbaImage) {
        debug_assert_eq!((img.width(), img.height()), (self.size.width, self.size.height));
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            img.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.size.width),
                rows_per_image: Some(self.size.height),
            },
            self.size,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_within_default_limits() {
        let limits = wgpu::Limits::default();
        assert!(check_texture_size(800, 600, &limits).is_ok());
        assert!(check_texture_size(8192, 8192, &limits).is_ok());
    }

    #[test]
    fn oversized_canvas_is_rejected() {
        let limits = wgpu::Limits::downlevel_defaults();
        assert!(check_texture_size(2048, 2048, &limits).is_ok());

        let err = check_texture_size(4096, 600, &limits).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::CanvasTooLarge {
                width: 4096,
                height: 600,
                max: 2048
            }
        ));
        assert!(matches!(
            check_texture_size(800, 2560, &limits),
            Err(crate::Error::CanvasTooLarge { .. })
        ));
        assert!(matches!(
            check_texture_size(8193, 1, &wgpu::Limits::default()),
            Err(crate::Error::CanvasTooLarge { .. })
        ));
    }
}
