//! 房源图片存储
//!
//! 原图按 `<id><ext>` 保存，缩略图统一转为 JPEG 保存为 `<id>_thumb.jpg`。

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage, GenericImageView};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::storage::Storage;
use crate::util::config::ImageConfig;
use crate::util::logging::standards::events;

const DEFAULT_EXTENSION: &str = ".jpg";
const THUMB_SUFFIX: &str = "_thumb";
/// 读取时依次尝试的扩展名
const LOOKUP_EXTENSIONS: [&str; 2] = [".jpg", ".png"];

/// 图片校验失败
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("File size exceeds {limit_mb}MB limit")]
    TooLarge { limit_mb: u64 },
    #[error("Invalid image: {0}")]
    Invalid(String),
}

/// 保存结果
#[derive(Debug, Clone)]
pub struct SavedImage {
    pub file_id: String,
    pub filename: String,
    pub original_key: String,
    /// 缩略图生成失败时为 None
    pub thumbnail_key: Option<String>,
    pub size: u64,
}

/// base64 编码后的图片
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub base64: String,
    pub mime: &'static str,
}

impl EncodedImage {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.base64)
    }
}

#[derive(Clone)]
pub struct ImageStore {
    storage: Arc<dyn Storage>,
    config: ImageConfig,
}

impl ImageStore {
    pub fn new(storage: Arc<dyn Storage>, config: ImageConfig) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// 校验大小与可解码性
    pub fn validate(&self, bytes: &[u8]) -> Result<(), ImageError> {
        if bytes.len() > self.config.max_size_bytes() {
            return Err(ImageError::TooLarge {
                limit_mb: self.config.max_size_mb,
            });
        }

        image::load_from_memory(bytes)
            .map(|_| ())
            .map_err(|e| ImageError::Invalid(e.to_string()))
    }

    /// 保存原图并生成缩略图
    pub async fn save(&self, bytes: &[u8], filename: &str) -> Result<SavedImage> {
        let file_id = Uuid::new_v4().to_string();
        let original_key = format!("{}{}", file_id, extension_for(filename));

        self.storage
            .put(&original_key, bytes)
            .await
            .with_context(|| format!("failed to store image {}", original_key))?;

        let thumbnail_key = match self.create_thumbnail(bytes.to_vec()).await {
            Ok(thumb) => {
                let key = thumbnail_key(&file_id);
                match self.storage.put(&key, &thumb).await {
                    Ok(()) => Some(key),
                    Err(e) => {
                        warn!(
                            target: "image",
                            event = events::IMAGE_THUMBNAIL_FAILED,
                            file_id = %file_id,
                            error = %e,
                            "缩略图写入失败"
                        );
                        None
                    }
                }
            }
            Err(e) => {
                warn!(
                    target: "image",
                    event = events::IMAGE_THUMBNAIL_FAILED,
                    file_id = %file_id,
                    error = %e,
                    "缩略图生成失败"
                );
                None
            }
        };

        info!(
            target: "image",
            event = events::IMAGE_SAVED,
            file_id = %file_id,
            bytes = bytes.len(),
            has_thumbnail = thumbnail_key.is_some(),
        );

        Ok(SavedImage {
            file_id,
            filename: filename.to_string(),
            original_key,
            thumbnail_key,
            size: bytes.len() as u64,
        })
    }

    /// 读取原图或缩略图，依次尝试 .jpg 与 .png
    pub async fn fetch_base64(&self, file_id: &str, thumbnail: bool) -> Result<Option<EncodedImage>> {
        let suffix = if thumbnail { THUMB_SUFFIX } else { "" };

        for ext in LOOKUP_EXTENSIONS {
            let key = format!("{}{}{}", file_id, suffix, ext);
            if let Some(bytes) = self.storage.get(&key).await? {
                return Ok(Some(EncodedImage {
                    base64: STANDARD.encode(bytes),
                    mime: mime_for(ext),
                }));
            }
        }

        Ok(None)
    }

    /// 尽力删除原图与缩略图，错误只记录日志
    ///
    /// 除 .jpg/.png 外，还会删除按上传文件名推断出的原图扩展名。
    pub async fn delete(&self, file_id: &str, filename: Option<&str>) {
        let mut keys = Vec::new();
        for suffix in ["", THUMB_SUFFIX] {
            for ext in LOOKUP_EXTENSIONS {
                keys.push(format!("{}{}{}", file_id, suffix, ext));
            }
        }
        if let Some(ext) = filename.map(extension_for) {
            if !LOOKUP_EXTENSIONS.contains(&ext.as_str()) {
                keys.push(format!("{}{}", file_id, ext));
            }
        }

        for key in keys {
            if let Err(e) = self.storage.delete(&key).await {
                warn!(
                    target: "image",
                    event = events::IMAGE_DELETE_FAILED,
                    key = %key,
                    error = %e,
                );
            }
        }
        info!(target: "image", event = events::IMAGE_DELETED, file_id = %file_id);
    }

    /// 原图访问地址，扩展名按上传文件名推断
    pub fn image_url(&self, file_id: &str, filename: Option<&str>) -> String {
        let ext = filename.map(extension_for).unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        self.storage.get_public_url(&format!("{}{}", file_id, ext))
    }

    pub fn thumbnail_url(&self, file_id: &str) -> String {
        self.storage.get_public_url(&thumbnail_key(file_id))
    }

    async fn create_thumbnail(&self, bytes: Vec<u8>) -> Result<Vec<u8>> {
        let max_side = self.config.thumbnail_size;
        let quality = self.config.thumbnail_quality;

        tokio::task::spawn_blocking(move || {
            let img = image::load_from_memory(&bytes).context("failed to decode image")?;
            let resized = resize_within(img, max_side);

            let rgb = resized.to_rgb8();
            let mut output = Vec::new();
            JpegEncoder::new_with_quality(&mut output, quality)
                .encode_image(&rgb)
                .context("failed to encode thumbnail")?;
            Ok(output)
        })
        .await
        .context("thumbnail task panicked")?
    }
}

fn thumbnail_key(file_id: &str) -> String {
    format!("{}{}.jpg", file_id, THUMB_SUFFIX)
}

/// 小写扩展名（含点），缺省为 .jpg
pub fn extension_for(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

fn mime_for(ext: &str) -> &'static str {
    mime_guess::from_ext(ext.trim_start_matches('.'))
        .first_raw()
        .unwrap_or("image/jpeg")
}

/// 等比缩放到不超过 `max_side`，不放大
fn resize_within(img: DynamicImage, max_side: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    if w <= max_side && h <= max_side {
        return img;
    }
    let ratio = (max_side as f32 / w as f32).min(max_side as f32 / h as f32);
    let new_w = ((w as f32) * ratio).round() as u32;
    let new_h = ((h as f32) * ratio).round() as u32;
    img.resize(new_w.max(1), new_h.max(1), FilterType::Lanczos3)
}
