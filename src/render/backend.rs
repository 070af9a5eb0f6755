use crate::foundation::core::Resolution;
use crate::foundation::error::{FoldError, FoldResult};
use crate::render::passes::{FramePlan, PassBackend, execute_plan};

/// Tightly packed RGB8 raster, rows top to bottom.
///
/// Used both for the two input images and for every rendered frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGB {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGB {
    /// Wrap `data`, checking it holds exactly `width * height * 3` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> FoldResult<Self> {
        let expected = Resolution { width, height }.rgb_len()?;
        if width == 0 || height == 0 {
            return Err(FoldError::validation("frame width/height must be > 0"));
        }
        if data.len() != expected {
            return Err(FoldError::validation(format!(
                "frame data is {} bytes, expected {expected} for {width}x{height} rgb8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame filled with a single color.
    pub fn solid(resolution: Resolution, rgb: [u8; 3]) -> FoldResult<Self> {
        let len = resolution.rgb_len()?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / 3 {
            data.extend_from_slice(&rgb);
        }
        Self::new(resolution.width, resolution.height, data)
    }

    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel at column `x`, row `y` (row 0 is the top).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Backend-local handle of an uploaded texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Row order of a raw color-buffer readback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadOrigin {
    /// First row is the bottom of the image (GL convention).
    BottomLeft,
    /// First row is the top of the image.
    TopLeft,
}

/// Raw color buffer contents as read from a backend.
#[derive(Clone, Debug)]
pub struct Readback {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGB8 rows in `origin` order.
    pub rows: Vec<u8>,
    pub origin: ReadOrigin,
}

impl Readback {
    /// Convert into a top-to-bottom frame, flipping rows when the origin is bottom-left.
    pub fn into_frame(self) -> FoldResult<FrameRGB> {
        let data = match self.origin {
            ReadOrigin::TopLeft => self.rows,
            ReadOrigin::BottomLeft => {
                let row_bytes = (self.width as usize) * 3;
                if row_bytes == 0 || self.rows.len() % row_bytes != 0 {
                    return Err(FoldError::render("readback rows are not whole rgb8 rows"));
                }
                let mut out = Vec::with_capacity(self.rows.len());
                for row in self.rows.chunks_exact(row_bytes).rev() {
                    out.extend_from_slice(row);
                }
                out
            }
        };
        FrameRGB::new(self.width, self.height, data)
            .map_err(|e| FoldError::render(format!("readback buffer mismatch: {e}")))
    }
}

/// Texture sampling filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFilter {
    Nearest,
    #[default]
    Bilinear,
}

/// Settings shared by every backend.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Color the buffer is cleared to before each frame.
    pub clear_rgb: [u8; 3],
    pub filter: SampleFilter,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_rgb: [0, 0, 0],
            filter: SampleFilter::Bilinear,
        }
    }
}

/// Texture management plus frame rendering on top of [`PassBackend`].
pub trait RenderBackend: PassBackend {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Upload an RGB image and return its handle.
    fn upload_texture(&mut self, image: &FrameRGB) -> FoldResult<TextureId>;

    /// Release a texture. Unknown ids are an error.
    fn release_texture(&mut self, id: TextureId) -> FoldResult<()>;

    /// Number of textures currently resident.
    fn texture_count(&self) -> usize;

    /// Settings this backend was created with.
    fn settings(&self) -> &RenderSettings;

    /// Execute `plan` and return the frame.
    fn render_frame(&mut self, plan: &FramePlan) -> FoldResult<FrameRGB> {
        let clear = self.settings().clear_rgb;
        execute_plan(self, plan, clear)
    }
}

/// Available backend implementations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Software rasterizer; always available.
    #[default]
    Cpu,
    /// `wgpu` offscreen renderer.
    #[cfg(feature = "gpu")]
    Gpu,
}

impl std::str::FromStr for BackendKind {
    type Err = FoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" | "software" => Ok(Self::Cpu),
            #[cfg(feature = "gpu")]
            "gpu" | "wgpu" => Ok(Self::Gpu),
            #[cfg(not(feature = "gpu"))]
            "gpu" | "wgpu" => Err(FoldError::validation(
                "gpu backend requested but this build lacks the 'gpu' feature",
            )),
            other => Err(FoldError::validation(format!("unknown backend '{other}'"))),
        }
    }
}

/// Create a backend. GPU backends acquire their device here and fail with a context error.
pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
) -> FoldResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new(
            settings.clone(),
        ))),
        #[cfg(feature = "gpu")]
        BackendKind::Gpu => Ok(Box::new(crate::render::gpu::GpuBackend::new(
            settings.clone(),
        )?)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
