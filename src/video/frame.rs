use image::GrayImage;

/// A captured still image, plus the text the external collaborators
/// attach to it later in the pipeline.
///
/// `ocr_text` and `tags` start out `None` and are written at most once
/// each; `None` means the step has not run or failed for this frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Seconds from the start of the video.
    pub timestamp: f64,
    pub width: u32,
    pub height: u32,
    /// RGB24, row-major.
    pub data: Vec<u8>,
    pub ocr_text: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Frame {
    pub fn new(timestamp: f64, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            timestamp,
            width,
            height,
            data,
            ocr_text: None,
            tags: None,
        }
    }

    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Grayscale reduction at native resolution.
    pub fn luma(&self) -> Vec<u8> {
        luma_from_rgb(&self.data)
    }

    /// Grayscale reduction at a fixed small resolution, for cheap
    /// whole-frame similarity comparisons.
    pub fn luma_thumbnail(&self, target_width: u32, target_height: u32) -> Vec<u8> {
        let gray = GrayImage::from_raw(self.width, self.height, self.luma())
            .expect("Invalid frame data");
        let resized = image::imageops::resize(
            &gray,
            target_width,
            target_height,
            image::imageops::FilterType::Triangle,
        );
        resized.into_raw()
    }

    pub fn ocr_text_or_empty(&self) -> &str {
        self.ocr_text.as_deref().unwrap_or("")
    }
}

/// BT.601 integer grayscale conversion over an RGB24 buffer.
pub fn luma_from_rgb(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(3)
        .map(|rgb| {
            ((rgb[0] as u32 * 299 + rgb[1] as u32 * 587 + rgb[2] as u32 * 114) / 1000) as u8
        })
        .collect()
}
