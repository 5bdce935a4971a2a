//! Frame one image and write the exported PNG.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context};
use clap::Args;
use polaroid_core::{
    Command, Effect, FrameParameters, ParameterUpdate, PointerEvent, Session, SurfaceBounds,
};

/// Per-field overrides, applied after the parameter file.
#[derive(Debug, Default, Args)]
pub struct ParamOverrides {
    /// Frame color as #rgb or #rrggbb
    #[arg(long)]
    pub frame_color: Option<String>,

    /// Border width around the photo (px)
    #[arg(long)]
    pub border_width: Option<f64>,

    /// Bottom band height (px)
    #[arg(long)]
    pub bottom_border: Option<f64>,

    /// Rotation in degrees, positive is clockwise
    #[arg(long, allow_hyphen_values = true)]
    pub rotation: Option<f64>,

    /// Shadow blur radius (px)
    #[arg(long)]
    pub shadow_blur: Option<f64>,

    /// Shadow opacity (0.0 - 1.0)
    #[arg(long)]
    pub shadow_opacity: Option<f64>,

    /// Photo scale relative to the fitted size
    #[arg(long)]
    pub image_scale: Option<f64>,

    /// Caption text
    #[arg(long)]
    pub caption: Option<String>,

    /// Caption size (px)
    #[arg(long)]
    pub caption_size: Option<f64>,

    /// Caption font family list, CSS style
    #[arg(long)]
    pub caption_font: Option<String>,
}

impl ParamOverrides {
    fn into_updates(self) -> Vec<ParameterUpdate> {
        let mut updates = Vec::new();
        if let Some(v) = self.frame_color {
            updates.push(ParameterUpdate::FrameColor(v));
        }
        if let Some(v) = self.border_width {
            updates.push(ParameterUpdate::BorderWidth(v));
        }
        if let Some(v) = self.bottom_border {
            updates.push(ParameterUpdate::BottomBorder(v));
        }
        if let Some(v) = self.rotation {
            updates.push(ParameterUpdate::Rotation(v));
        }
        if let Some(v) = self.shadow_blur {
            updates.push(ParameterUpdate::ShadowBlur(v));
        }
        if let Some(v) = self.shadow_opacity {
            updates.push(ParameterUpdate::ShadowOpacity(v));
        }
        if let Some(v) = self.image_scale {
            updates.push(ParameterUpdate::ImageScale(v));
        }
        if let Some(v) = self.caption {
            updates.push(ParameterUpdate::Caption(v));
        }
        if let Some(v) = self.caption_size {
            updates.push(ParameterUpdate::CaptionSize(v));
        }
        if let Some(v) = self.caption_font {
            updates.push(ParameterUpdate::CaptionFont(v));
        }
        updates
    }
}

/// Everything the export command needs.
#[derive(Debug)]
pub struct ExportJob {
    pub input: PathBuf,
    pub params: Option<PathBuf>,
    pub overrides: ParamOverrides,
    pub fonts: Vec<PathBuf>,
    pub pan: (f64, f64),
    pub output: Option<PathBuf>,
}

/// Media type for a file, judged by its extension.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Load a JSON parameter file. Missing keys take their defaults.
pub fn load_params(path: &Path) -> anyhow::Result<FrameParameters> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file {}", path.display()))?;
    let params: FrameParameters = serde_json::from_str(&text)
        .with_context(|| format!("Invalid parameter file {}", path.display()))?;
    Ok(params)
}

/// Drag the photo by `(dx, dy)` the way a pointer would.
fn replay_pan(session: &mut Session, dx: f64, dy: f64) -> anyhow::Result<()> {
    if dx == 0.0 && dy == 0.0 {
        return Ok(());
    }
    let surface = session
        .render()
        .context("No image loaded, cannot pan")?;
    let bounds = SurfaceBounds::new(0.0, 0.0, surface.width() as f64, surface.height() as f64);
    let (cx, cy) = (bounds.width / 2.0, bounds.height / 2.0);

    session.apply(Command::PointerDown(PointerEvent::new(cx, cy, bounds)))?;
    session.apply(Command::PointerMove(PointerEvent::new(cx + dx, cy + dy, bounds)))?;
    session.apply(Command::PointerUp)?;
    Ok(())
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Build the session for `job` and return the written file's path.
pub fn run(job: ExportJob) -> anyhow::Result<PathBuf> {
    let mut session = Session::new();

    for font in &job.fonts {
        let bytes = std::fs::read(font)
            .with_context(|| format!("Failed to read font {}", font.display()))?;
        let family = font
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("sans-serif")
            .to_string();
        session
            .fonts_mut()
            .register(&family, bytes)
            .with_context(|| format!("Failed to load font {}", font.display()))?;
        tracing::debug!(family = %family, "registered font");
    }

    let media_type = media_type_for(&job.input);
    let bytes = std::fs::read(&job.input)
        .with_context(|| format!("Failed to read image {}", job.input.display()))?;
    let effect = session
        .apply(Command::UploadImage {
            media_type: media_type.to_string(),
            bytes,
        })
        .with_context(|| format!("Failed to decode {}", job.input.display()))?;
    if effect == Effect::None {
        bail!("{} is not an image ({media_type})", job.input.display());
    }

    if let Some(path) = &job.params {
        session.set_params(load_params(path)?);
    }
    for update in job.overrides.into_updates() {
        session.apply(Command::UpdateParameter(update))?;
    }
    replay_pan(&mut session, job.pan.0, job.pan.1)?;

    let Effect::Exported(file) = session.apply(Command::Export {
        epoch_millis: epoch_millis(),
    })?
    else {
        bail!("Nothing to export");
    };

    let output = job.output.unwrap_or_else(|| PathBuf::from(&file.file_name));
    std::fs::write(&output, &file.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Exported {} ({} bytes)", output.display(), file.bytes.len());
    Ok(output)
}
