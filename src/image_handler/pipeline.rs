//! # 解码与变换流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 位图 → 变色 → 字节”的过程集中管理：
//! - 解码阶段优先读取 header 尺寸并做像素上限检查，再进行完整解码。
//! - 变色是纯函数：只借用源位图，返回全新的位图，源位图可被多个配色反复使用。
//! - 编码阶段沿用源文件的容器格式，不做格式转换。
//!
//! ## 变色规则（逐像素，按顺序判定）
//!
//! 1. 不透明度非 0 且 RGB 为纯白 → alpha 置 0，RGB 不变
//! 2. 不透明度非 0 且 RGB 为纯黑 → RGB 替换为目标色，alpha 不变
//! 3. 其余像素原样保留

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgb, Rgba, RgbaImage};

use super::source::{DecodedAsset, RawImageData};
use super::ImageError;

const WHITE: [u8; 3] = [255, 255, 255];
const BLACK: [u8; 3] = [0, 0, 0];

/// 将原始字节解码为只读 RGBA 位图，并记录源容器格式。
pub(crate) fn decode_asset(
    raw: &RawImageData,
    max_decoded_pixels: u64,
) -> Result<DecodedAsset, ImageError> {
    let format = image::guess_format(&raw.bytes)
        .map_err(|e| ImageError::InvalidFormat(format!("不支持的图片格式：{}", e)))?;

    let (header_width, header_height) = inspect_dimensions_from_memory(&raw.bytes, format)?;
    validate_pixel_limits(max_decoded_pixels, header_width, header_height)?;

    let decoded = image::load_from_memory_with_format(&raw.bytes, format)
        .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;
    let bitmap = decoded.to_rgba8();

    log::debug!(
        "✅ 图片解码成功 - 格式: {:?} 尺寸: {}x{}",
        format,
        bitmap.width(),
        bitmap.height()
    );

    Ok(DecodedAsset { bitmap, format })
}

/// 仅通过内存中的图片头信息读取宽高。
fn inspect_dimensions_from_memory(bytes: &[u8], format: ImageFormat) -> Result<(u32, u32), ImageError> {
    image::ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(|e| ImageError::Decode(format!("无法读取图片尺寸：{}", e)))
}

/// 校验像素数量是否超过配置上限。
fn validate_pixel_limits(max_pixels: u64, width: u32, height: u32) -> Result<(), ImageError> {
    let pixels = (width as u64)
        .checked_mul(height as u64)
        .ok_or_else(|| ImageError::ResourceLimit("图片像素数溢出".to_string()))?;

    if pixels > max_pixels {
        return Err(ImageError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, max_pixels
        )));
    }

    Ok(())
}

/// 按掩码规则为位图着色，返回新位图，不修改输入。
///
/// # 示例
/// ```rust
/// use css_recolor::image_handler::recolor;
/// use image::{Rgb, Rgba, RgbaImage};
///
/// let source = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
/// let tinted = recolor(&source, Rgb([0, 128, 0]));
/// assert_eq!(tinted.get_pixel(0, 0), &Rgba([0, 128, 0, 255]));
/// assert_eq!(source.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
/// ```
pub fn recolor(source: &RgbaImage, target: Rgb<u8>) -> RgbaImage {
    let mut output = source.clone();
    for pixel in output.pixels_mut() {
        *pixel = recolor_pixel(*pixel, target);
    }
    output
}

fn recolor_pixel(pixel: Rgba<u8>, target: Rgb<u8>) -> Rgba<u8> {
    let Rgba([r, g, b, a]) = pixel;
    if a == 0 {
        return pixel;
    }

    match [r, g, b] {
        WHITE => Rgba([r, g, b, 0]),
        BLACK => Rgba([target[0], target[1], target[2], a]),
        _ => pixel,
    }
}

/// 以指定容器格式编码位图。
pub(crate) fn encode_bitmap(bitmap: RgbaImage, format: ImageFormat) -> Result<Vec<u8>, ImageError> {
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(bitmap)
        .write_to(&mut cursor, format)
        .map_err(|e| ImageError::Decode(format!("图片编码失败（{:?}）：{}", format, e)))?;
    Ok(cursor.into_inner())
}

/// 计算输出路径：`<output_root>/<palette_name>/<reference 去掉前导斜杠>`。
///
/// 纯路径拼接，不访问文件系统或网络。
pub fn output_target(output_root: &Path, palette_name: &str, reference: &str) -> PathBuf {
    output_root
        .join(palette_name)
        .join(reference.trim_start_matches('/'))
}

/// 写入单个变体文件，按需递归创建父目录。
pub(crate) fn write_variant(path: &Path, bytes: &[u8]) -> Result<(), ImageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ImageError::FileSystem(format!("无法创建目录 '{}'：{}", parent.display(), e))
        })?;
    }

    std::fs::write(path, bytes)
        .map_err(|e| ImageError::FileSystem(format!("无法写入 '{}'：{}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use reqwest::Url;

    fn create_png_bytes(bitmap: &RgbaImage) -> Vec<u8> {
        encode_bitmap(bitmap.clone(), ImageFormat::Png).expect("failed to encode test image")
    }

    fn raw(bytes: Vec<u8>) -> RawImageData {
        RawImageData {
            bytes,
            url: Url::parse("https://x.test/icon.png").expect("url"),
        }
    }

    #[test]
    fn white_becomes_transparent_black_becomes_target() {
        let mut source = RgbaImage::new(4, 1);
        source.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        source.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        source.put_pixel(2, 0, Rgba([0, 0, 0, 128]));
        source.put_pixel(3, 0, Rgba([10, 20, 30, 255]));

        let out = recolor(&source, Rgb([255, 0, 0]));

        assert_eq!(out.get_pixel(0, 0), &Rgba([255, 255, 255, 0]));
        assert_eq!(out.get_pixel(1, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(2, 0), &Rgba([255, 0, 0, 128]));
        assert_eq!(out.get_pixel(3, 0), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn transparent_black_and_white_pass_through() {
        let mut source = RgbaImage::new(2, 1);
        source.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        source.put_pixel(1, 0, Rgba([255, 255, 255, 0]));

        let out = recolor(&source, Rgb([1, 2, 3]));
        assert_eq!(out, source);
    }

    #[test]
    fn output_target_strips_leading_slashes() {
        let root = Path::new("output_images");
        assert_eq!(
            output_target(root, "green", "/img/icon.png"),
            PathBuf::from("output_images/green/img/icon.png")
        );
        assert_eq!(
            output_target(root, "red", "//icon.png"),
            PathBuf::from("output_images/red/icon.png")
        );
        assert_eq!(
            output_target(root, "red", "icon.png"),
            PathBuf::from("output_images/red/icon.png")
        );
    }

    #[test]
    fn decode_keeps_source_format_and_dimensions() {
        let source = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 255]));
        let decoded = decode_asset(&raw(create_png_bytes(&source)), 1_000).expect("decode png");

        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!(decoded.bitmap, source);
    }

    #[test]
    fn decode_rejects_too_many_pixels() {
        let source = RgbaImage::new(100, 100);
        let result = decode_asset(&raw(create_png_bytes(&source)), 999);
        assert!(matches!(result, Err(ImageError::ResourceLimit(_))));
    }

    #[test]
    fn decode_rejects_non_image_bytes() {
        let result = decode_asset(&raw(b"<html>not found</html>".to_vec()), 1_000);
        assert!(matches!(result, Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn encode_round_trips_recolored_png() {
        let source = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let tinted = recolor(&source, Rgb([0, 0, 255]));

        let bytes = encode_bitmap(tinted.clone(), ImageFormat::Png).expect("encode");
        let decoded = decode_asset(&raw(bytes), 1_000).expect("decode");
        assert_eq!(decoded.bitmap, tinted);
    }

    fn arb_bitmap() -> impl Strategy<Value = RgbaImage> {
        (1u32..6, 1u32..6).prop_flat_map(|(w, h)| {
            proptest::collection::vec(
                prop_oneof![
                    Just([0u8, 0, 0, 255]),
                    Just([255u8, 255, 255, 255]),
                    any::<[u8; 4]>(),
                ],
                (w * h) as usize,
            )
            .prop_map(move |pixels| {
                let raw: Vec<u8> = pixels.into_iter().flatten().collect();
                RgbaImage::from_raw(w, h, raw).expect("buffer matches dimensions")
            })
        })
    }

    proptest! {
        #[test]
        fn recolor_is_pure_and_does_not_mutate_input(bitmap in arb_bitmap(), target in any::<[u8; 3]>()) {
            let snapshot = bitmap.clone();

            let first = recolor(&bitmap, Rgb(target));
            let second = recolor(&bitmap, Rgb(target));

            prop_assert_eq!(&bitmap, &snapshot);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.dimensions(), bitmap.dimensions());
        }

        #[test]
        fn non_mask_pixels_are_untouched(pixel in any::<[u8; 4]>(), target in any::<[u8; 3]>()) {
            let [r, g, b, a] = pixel;
            let is_mask = a != 0 && ([r, g, b] == BLACK || [r, g, b] == WHITE);
            prop_assume!(!is_mask);

            let source = RgbaImage::from_pixel(1, 1, Rgba(pixel));
            let out = recolor(&source, Rgb(target));
            prop_assert_eq!(out.get_pixel(0, 0), &Rgba(pixel));
        }
    }
}
