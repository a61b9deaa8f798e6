//! # 素材描述表模块
//!
//! ## 设计思路
//!
//! 所有输出素材集中在一张声明式表里：平台、相对路径、画布尺寸、留白、底色、格式，
//! 以及同一张栅格上的后处理派生（CMYK TIFF / PDF）和图标容器打包。
//! 批处理只有一个通用循环，不再按平台写重复逻辑。
//!
//! 表在运行期只读，文件名是描述项的确定性函数。

use super::compositor::{Background, Canvas};

/// 输出素材所属平台（即输出子目录）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Web,
    Social,
    Ios,
    Android,
    Desktop,
    Emoji,
    Print,
    Flags,
}

impl Platform {
    pub fn dir(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Social => "social",
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Desktop => "desktop",
            Self::Emoji => "emoji",
            Self::Print => "print",
            Self::Flags => "flags",
        }
    }
}

/// 输出编码格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// 原样复制的输入文件。
    Original,
    Png,
    Tiff,
    Pdf,
    Ico,
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Original => "application/octet-stream",
            Self::Png => "image/png",
            Self::Tiff => "image/tiff",
            Self::Pdf => "application/pdf",
            Self::Ico => "image/x-icon",
            Self::Json => "application/manifest+json",
            Self::Markdown => "text/markdown",
        }
    }
}

/// 同一张已摆放栅格上的后处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostConversion {
    /// 白底压平后转 CMYK，LZW 压缩 TIFF。
    CmykTiff,
    /// 白底压平后嵌入单页 PDF。
    FlattenedPdf,
}

impl PostConversion {
    pub fn format(self) -> OutputFormat {
        match self {
            Self::CmykTiff => OutputFormat::Tiff,
            Self::FlattenedPdf => OutputFormat::Pdf,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Derivative {
    pub path: &'static str,
    pub conversion: PostConversion,
}

/// 单个输出素材的声明。
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSpec {
    pub platform: Platform,
    /// 相对于输出根目录的路径，使用 `/` 分隔。
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub pad_ratio: f64,
    pub background: Background,
    pub format: OutputFormat,
    pub derivatives: &'static [Derivative],
    /// 是否同时打包进 `favicon.ico`。
    pub pack_into_icon: bool,
}

impl AssetSpec {
    fn png(platform: Platform, name: impl AsRef<str>, width: u32, height: u32, pad_ratio: f64) -> Self {
        Self {
            platform,
            path: format!("{}/{}", platform.dir(), name.as_ref()),
            width,
            height,
            pad_ratio,
            background: Background::Transparent,
            format: OutputFormat::Png,
            derivatives: &[],
            pack_into_icon: false,
        }
    }

    fn square(platform: Platform, name: impl AsRef<str>, size: u32, pad_ratio: f64) -> Self {
        Self::png(platform, name, size, size, pad_ratio)
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height, self.background, self.pad_ratio)
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

pub const ICON_CONTAINER_PATH: &str = "web/favicon.ico";

const FAVICON_SIZES: [u32; 3] = [16, 32, 48];
const PWA_SIZES: [u32; 4] = [192, 256, 384, 512];
const IOS_BASE_POINTS: [u32; 6] = [20, 29, 40, 60, 76, 83];
const IOS_SCALES: [u32; 3] = [1, 2, 3];
const ANDROID_DENSITIES: [(&str, u32); 5] = [
    ("mipmap-mdpi", 48),
    ("mipmap-hdpi", 72),
    ("mipmap-xhdpi", 96),
    ("mipmap-xxhdpi", 144),
    ("mipmap-xxxhdpi", 192),
];
const DESKTOP_SIZES: [u32; 4] = [128, 256, 512, 1024];
const EMOJI_SIZES: [u32; 3] = [128, 256, 512];
/// `(ratio_w, ratio_h, base_width)`
const FLAG_RATIOS: [(u32, u32, u32); 2] = [(3, 2, 900), (5, 3, 1500)];

const PRINT_DERIVATIVES: &[Derivative] = &[
    Derivative {
        path: "print/logo-cmyk.tiff",
        conversion: PostConversion::CmykTiff,
    },
    Derivative {
        path: "print/logo.pdf",
        conversion: PostConversion::FlattenedPdf,
    },
];

/// 构建完整描述表，顺序即输出顺序。
pub fn descriptor_table() -> Vec<AssetSpec> {
    let mut specs = Vec::with_capacity(48);
    specs.extend(web_specs());
    specs.extend(social_specs());
    specs.extend(ios_specs());
    specs.extend(android_specs());
    specs.extend(desktop_specs());
    specs.extend(emoji_specs());
    specs.extend(print_specs());
    specs.extend(flag_specs());
    specs
}

fn web_specs() -> Vec<AssetSpec> {
    let mut specs: Vec<AssetSpec> = FAVICON_SIZES
        .iter()
        .map(|&s| AssetSpec {
            pack_into_icon: true,
            ..AssetSpec::square(Platform::Web, format!("favicon-{s}.png"), s, 0.08)
        })
        .collect();
    specs.push(AssetSpec::square(Platform::Web, "apple-touch-icon-180.png", 180, 0.10));
    specs.extend(
        PWA_SIZES
            .iter()
            .map(|&s| AssetSpec::square(Platform::Web, format!("icon-{s}.png"), s, 0.10)),
    );
    // 更大留白，给 maskable 安全区裁切
    specs.push(AssetSpec::square(Platform::Web, "maskable-icon-512.png", 512, 0.18));
    specs
}

fn social_specs() -> Vec<AssetSpec> {
    vec![
        AssetSpec::square(Platform::Social, "og-1200x1200.png", 1200, 0.20),
        AssetSpec::png(Platform::Social, "og-1200x630.png", 1200, 630, 0.12),
    ]
}

fn ios_specs() -> Vec<AssetSpec> {
    let mut specs = Vec::new();
    for base in IOS_BASE_POINTS {
        for scale in IOS_SCALES {
            // 83pt@1x 不是平台定义的尺寸
            if base == 83 && scale == 1 {
                continue;
            }
            let size = base * scale;
            specs.push(AssetSpec::square(
                Platform::Ios,
                format!("Icon-{base}pt@{scale}x-{size}.png"),
                size,
                0.12,
            ));
        }
    }
    specs.push(AssetSpec::square(Platform::Ios, "Icon-83.5pt@2x-167.png", 167, 0.12));
    specs.push(AssetSpec::square(Platform::Ios, "AppStore-1024.png", 1024, 0.12));
    specs
}

fn android_specs() -> Vec<AssetSpec> {
    let mut specs: Vec<AssetSpec> = ANDROID_DENSITIES
        .iter()
        .map(|&(folder, px)| {
            AssetSpec::square(Platform::Android, format!("{folder}/ic_launcher.png"), px, 0.10)
        })
        .collect();
    specs.push(AssetSpec::square(Platform::Android, "play-store-1024.png", 1024, 0.12));
    specs.push(AssetSpec::square(Platform::Android, "web_hi_res_512.png", 512, 0.12));
    specs
}

fn desktop_specs() -> Vec<AssetSpec> {
    DESKTOP_SIZES
        .iter()
        .map(|&s| AssetSpec::square(Platform::Desktop, format!("appicon-{s}.png"), s, 0.12))
        .collect()
}

fn emoji_specs() -> Vec<AssetSpec> {
    EMOJI_SIZES
        .iter()
        .map(|&s| AssetSpec::square(Platform::Emoji, format!("emoji-{s}.png"), s, 0.08))
        .collect()
}

fn print_specs() -> Vec<AssetSpec> {
    vec![AssetSpec {
        derivatives: PRINT_DERIVATIVES,
        ..AssetSpec::square(Platform::Print, "logo-3000x3000.png", 3000, 0.08)
    }]
}

/// 旗帜高度：`round(width * ratio_h / ratio_w)`。
pub fn flag_height(width: u32, ratio_w: u32, ratio_h: u32) -> u32 {
    (width as f64 * ratio_h as f64 / ratio_w as f64).round() as u32
}

fn flag_specs() -> Vec<AssetSpec> {
    FLAG_RATIOS
        .iter()
        .map(|&(rw, rh, width)| {
            let height = flag_height(width, rw, rh);
            AssetSpec {
                background: Background::WHITE,
                ..AssetSpec::png(
                    Platform::Flags,
                    format!("flag-{width}x{height}-{rw}x{rh}.png"),
                    width,
                    height,
                    0.25,
                )
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn by_platform(platform: Platform) -> Vec<AssetSpec> {
        descriptor_table()
            .into_iter()
            .filter(|s| s.platform == platform)
            .collect()
    }

    #[test]
    fn ios_group_has_nineteen_entries() {
        let ios = by_platform(Platform::Ios);
        assert_eq!(ios.len(), 19);

        let names: HashSet<&str> = ios.iter().map(|s| s.path.as_str()).collect();
        assert!(names.contains("ios/Icon-20pt@1x-20.png"));
        assert!(names.contains("ios/Icon-83pt@2x-166.png"));
        assert!(names.contains("ios/Icon-83pt@3x-249.png"));
        assert!(names.contains("ios/Icon-83.5pt@2x-167.png"));
        assert!(names.contains("ios/AppStore-1024.png"));
        assert!(!names.contains("ios/Icon-83pt@1x-83.png"));
        assert!(ios.iter().all(|s| s.pad_ratio == 0.12 && s.is_square()));
    }

    #[test]
    fn flag_heights_follow_ratio() {
        assert_eq!(flag_height(900, 3, 2), 600);
        assert_eq!(flag_height(1500, 5, 3), 900);

        let flags = by_platform(Platform::Flags);
        let paths: Vec<&str> = flags.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, vec!["flags/flag-900x600-3x2.png", "flags/flag-1500x900-5x3.png"]);
        assert!(flags.iter().all(|s| s.background == Background::WHITE && s.pad_ratio == 0.25));
    }

    #[test]
    fn paths_are_unique_and_padding_is_valid() {
        let table = descriptor_table();
        let paths: HashSet<&str> = table.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths.len(), table.len());
        assert!(table.iter().all(|s| (0.0..0.5).contains(&s.pad_ratio)));
        assert!(table.iter().all(|s| s.path.starts_with(s.platform.dir())));
    }

    #[test]
    fn group_sizes() {
        assert_eq!(by_platform(Platform::Web).len(), 9);
        assert_eq!(by_platform(Platform::Social).len(), 2);
        assert_eq!(by_platform(Platform::Android).len(), 7);
        assert_eq!(by_platform(Platform::Desktop).len(), 4);
        assert_eq!(by_platform(Platform::Emoji).len(), 3);
        assert_eq!(by_platform(Platform::Print).len(), 1);
        assert_eq!(descriptor_table().len(), 47);
    }

    #[test]
    fn only_favicons_feed_the_icon_container() {
        let packed: Vec<u32> = descriptor_table()
            .iter()
            .filter(|s| s.pack_into_icon)
            .map(|s| s.width)
            .collect();
        assert_eq!(packed, vec![16, 32, 48]);
    }

    #[test]
    fn print_raster_carries_derivatives() {
        let print = by_platform(Platform::Print);
        assert_eq!(print[0].width, 3000);
        assert_eq!(print[0].derivatives.len(), 2);
        assert_eq!(print[0].derivatives[0].conversion.format(), OutputFormat::Tiff);
        assert_eq!(print[0].derivatives[1].conversion.format(), OutputFormat::Pdf);
    }
}
