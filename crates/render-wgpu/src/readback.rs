use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadbackError {
    #[error("texture format {0:?} cannot be read back as RGBA8")]
    UnsupportedFormat(wgpu::TextureFormat),
    #[error("buffer mapping failed: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
    #[error("mapping callback dropped before completion")]
    Cancelled,
}

/// Channel order of an 8-bit colour format, or `None` for anything else.
fn channel_order(format: wgpu::TextureFormat) -> Option<bool> {
    use wgpu::TextureFormat as F;
    match format {
        F::Rgba8Unorm | F::Rgba8UnormSrgb => Some(false),
        F::Bgra8Unorm | F::Bgra8UnormSrgb => Some(true),
        _ => None,
    }
}

/// Row pitch for a copy of `width` RGBA8 pixels.
fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Strip row padding and, for BGRA sources, swap to RGBA.
fn unpad_rows(data: &[u8], width: u32, height: u32, padded: u32, bgra: bool) -> Vec<u8> {
    let row = (width * 4) as usize;
    let mut out = Vec::with_capacity(row * height as usize);
    for chunk in data.chunks(padded as usize).take(height as usize) {
        out.extend_from_slice(&chunk[..row.min(chunk.len())]);
    }
    if bgra {
        for px in out.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
    }
    out
}

/// Copy a rendered texture back to the CPU as tightly packed RGBA8 rows.
///
/// The texture must have been created with `COPY_SRC`. Blocks until the GPU
/// has finished the copy.
pub fn read_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
) -> Result<Vec<u8>, ReadbackError> {
    let format = texture.format();
    let bgra = channel_order(format).ok_or(ReadbackError::UnsupportedFormat(format))?;
    let (width, height) = (texture.width(), texture.height());
    let padded = padded_bytes_per_row(width);

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("readback_buffer"),
        size: padded as u64 * height as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("readback_encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let slice = buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    let _ = device.poll(wgpu::Maintain::Wait);
    rx.recv().map_err(|_| ReadbackError::Cancelled)??;

    let pixels = {
        let data = slice.get_mapped_range();
        unpad_rows(&data, width, height, padded, bgra)
    };
    buffer.unmap();
    tracing::trace!(width, height, "frame read back");
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_aligned() {
        assert_eq!(padded_bytes_per_row(1), 256);
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
    }

    #[test]
    fn unpad_drops_padding_and_swizzles() {
        // Two rows of one BGRA pixel, padded to 8 bytes.
        let data = [1, 2, 3, 4, 0, 0, 0, 0, 5, 6, 7, 8, 0, 0, 0, 0];
        assert_eq!(unpad_rows(&data, 1, 2, 8, false), vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(unpad_rows(&data, 1, 2, 8, true), vec![3, 2, 1, 4, 7, 6, 5, 8]);
    }

    #[test]
    fn only_8bit_colour_formats_read_back() {
        assert_eq!(channel_order(wgpu::TextureFormat::Bgra8UnormSrgb), Some(true));
        assert_eq!(channel_order(wgpu::TextureFormat::Rgba8Unorm), Some(false));
        assert_eq!(channel_order(wgpu::TextureFormat::Rgba16Float), None);
    }
}
