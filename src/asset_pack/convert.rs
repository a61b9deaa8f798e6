//! # 格式转换模块
//!
//! ## 设计思路
//!
//! 摆放好的 RGBA 画布在这里变成最终字节：
//! - PNG：透明底保留 RGBA；不透明底输出 RGB
//! - CMYK TIFF：白底压平后做朴素 RGB → CMYK（不做 ICC 色彩管理），LZW 压缩
//! - PDF：白底压平后以 JPEG（DCTDecode）嵌入单页文档，页面尺寸等于像素尺寸
//!
//! 所有函数都是纯函数，只返回字节，写盘交给输出写入器。

use image::codecs::jpeg::JpegEncoder;
use image::imageops;
use image::{DynamicImage, ImageFormat, Rgba, RgbImage, RgbaImage};
use std::io::{Cursor, Write};
use tiff::encoder::{TiffEncoder, colortype, compression::Lzw};

use super::ImageError;
use super::compositor::Background;
use super::descriptor::PostConversion;

const PDF_JPEG_QUALITY: u8 = 95;

/// 按底色编码 PNG。
pub fn encode_png(image: &RgbaImage, background: Background) -> Result<Vec<u8>, ImageError> {
    let dynamic = if background.is_opaque() {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image.clone()).to_rgb8())
    } else {
        DynamicImage::ImageRgba8(image.clone())
    };

    let mut cursor = Cursor::new(Vec::new());
    dynamic
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| ImageError::Encode(format!("PNG 编码失败：{}", e)))?;
    Ok(cursor.into_inner())
}

/// 白底压平：`c * a + 255 * (1 - a)`。
pub fn flatten_on_white(image: &RgbaImage) -> RgbImage {
    let mut base = RgbaImage::from_pixel(image.width(), image.height(), Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut base, image, 0, 0);
    DynamicImage::ImageRgba8(base).to_rgb8()
}

/// 执行描述表声明的后处理。
pub fn apply_post_conversion(
    image: &RgbaImage,
    conversion: PostConversion,
) -> Result<Vec<u8>, ImageError> {
    let flattened = flatten_on_white(image);
    match conversion {
        PostConversion::CmykTiff => encode_cmyk_tiff(&flattened),
        PostConversion::FlattenedPdf => encode_pdf(&flattened),
    }
}

/// 朴素 CMYK：`C = 255 - R`，`M = 255 - G`，`Y = 255 - B`，`K = 0`。
pub fn rgb_to_cmyk(image: &RgbImage) -> Vec<u8> {
    image
        .pixels()
        .flat_map(|p| [255 - p[0], 255 - p[1], 255 - p[2], 0])
        .collect()
}

pub fn encode_cmyk_tiff(image: &RgbImage) -> Result<Vec<u8>, ImageError> {
    let cmyk = rgb_to_cmyk(image);
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor)
            .map_err(|e| ImageError::Encode(format!("TIFF 编码器初始化失败：{}", e)))?;
        encoder
            .write_image_with_compression::<colortype::CMYK8, _>(
                image.width(),
                image.height(),
                Lzw::default(),
                &cmyk,
            )
            .map_err(|e| ImageError::Encode(format!("CMYK TIFF 编码失败：{}", e)))?;
    }
    Ok(cursor.into_inner())
}

/// 单页 PDF：一个 DCTDecode 图像 XObject 铺满页面（72 dpi，1px = 1pt）。
pub fn encode_pdf(image: &RgbImage) -> Result<Vec<u8>, ImageError> {
    let (width, height) = image.dimensions();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, PDF_JPEG_QUALITY)
        .encode_image(image)
        .map_err(|e| ImageError::Encode(format!("JPEG 编码失败：{}", e)))?;

    let content = format!("q\n{width} 0 0 {height} 0 0 cm\n/Im0 Do\nQ\n");

    let mut pdf = PdfWriter::default();
    pdf.object(b"<< /Type /Catalog /Pages 2 0 R >>");
    pdf.object(b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    pdf.object(
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width} {height}] \
             /Resources << /XObject << /Im0 4 0 R >> >> /Contents 5 0 R >>"
        )
        .as_bytes(),
    );
    pdf.stream(
        &format!(
            "<< /Type /XObject /Subtype /Image /Width {width} /Height {height} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>",
            jpeg.len()
        ),
        &jpeg,
    );
    pdf.stream(&format!("<< /Length {} >>", content.len()), content.as_bytes());
    pdf.finish()
}

/// 最小 PDF 1.4 写入器：顺序编号对象 + xref 表。
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }
}

impl PdfWriter {
    fn begin(&mut self) {
        self.offsets.push(self.buf.len());
        let id = self.offsets.len();
        self.buf.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
    }

    fn object(&mut self, dict: &[u8]) {
        self.begin();
        self.buf.extend_from_slice(dict);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, dict: &str, data: &[u8]) {
        self.begin();
        self.buf.extend_from_slice(dict.as_bytes());
        self.buf.extend_from_slice(b"\nstream\n");
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self) -> Result<Vec<u8>, ImageError> {
        let xref_offset = self.buf.len();
        let count = self.offsets.len() + 1;

        let mut xref = format!("xref\n0 {count}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {count} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        ));

        self.buf
            .write_all(xref.as_bytes())
            .map_err(|e| ImageError::Encode(format!("PDF 写入失败：{}", e)))?;
        Ok(self.buf)
    }
}
