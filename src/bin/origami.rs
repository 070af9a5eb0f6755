use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use origami::fold::Crossfade;
use origami::{
    BackendKind, Capabilities, Ease, FfmpegSink, FfmpegSinkOpts, FoldAlgorithm, FoldVariant,
    FrameRGB, Fps, OutputKind, RenderOpts, RenderSettings, Requirements, Resolution,
    TransitionDescriptor, VariantId,
};

#[derive(Parser, Debug)]
#[command(name = "origami", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a transition between two images as an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a transition as numbered PNG frames.
    Frames(FramesArgs),
    /// List transition variants.
    List,
}

#[derive(Args, Debug)]
struct TransitionArgs {
    /// Image the transition starts from.
    #[arg(long)]
    from: PathBuf,

    /// Image the transition ends on.
    #[arg(long)]
    to: PathBuf,

    /// Transition descriptor JSON; flags below override its values.
    #[arg(long)]
    descriptor: Option<PathBuf>,

    /// Variant name or alias (see `origami list`).
    #[arg(long)]
    variant: Option<VariantId>,

    /// Duration in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Frame rate, `30` or `30000/1001`.
    #[arg(long)]
    fps: Option<Fps>,

    /// Output size, `WIDTHxHEIGHT`.
    #[arg(long)]
    size: Option<Resolution>,

    /// Easing for multi-quadrant folds.
    #[arg(long)]
    ease: Option<Ease>,

    /// Disable flap lighting.
    #[arg(long, default_value_t = false)]
    no_lighting: bool,

    /// Floor for the shrinking seam of center and slide folds.
    #[arg(long)]
    min_seam_height: Option<f64>,

    /// Render backend (`cpu`, or `gpu` when built with the `gpu` feature).
    #[arg(long, default_value = "cpu")]
    backend: BackendKind,

    /// Substitute a crossfade if the fold fails.
    #[arg(long, default_value_t = false)]
    fallback: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    transition: TransitionArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Fail instead of replacing an existing output file.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,
}

#[derive(Args, Debug)]
struct FramesArgs {
    #[command(flatten)]
    transition: TransitionArgs,

    /// Directory receiving `frame_00000.png`, `frame_00001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frames(args) => cmd_frames(args),
        Command::List => cmd_list(),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (desc, frames) = render(&args.transition, OutputKind::Video)?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: !args.no_overwrite,
    });
    origami::write_frames(&frames, &desc, &mut sink)?;
    eprintln!("wrote {} ({} frames)", args.out.display(), frames.len());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let (_, frames) = render(&args.transition, OutputKind::Frames)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (i, frame) in frames.iter().enumerate() {
        let path = args.out_dir.join(format!("frame_{i:05}.png"));
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
    }
    eprintln!("wrote {} frames to {}", frames.len(), args.out_dir.display());
    Ok(())
}

fn cmd_list() -> anyhow::Result<()> {
    for v in VariantId::ALL {
        let desc = TransitionDescriptor::new(1.0, Fps::whole(1)?, Resolution::default(), v);
        let honors = honored_options(FoldVariant::from_descriptor(&desc)?.requirements());
        println!("{:<18} {} [{}]", v.name(), v.description(), honors.join(", "));
    }
    Ok(())
}

fn honored_options(req: Requirements) -> Vec<&'static str> {
    let mut out = Vec::new();
    if req.two_phase {
        out.push("two-phase");
    }
    if req.eased {
        out.extend(["ease", "lighting"]);
    }
    if req.seam_shrink {
        out.push("min-seam-height");
    }
    if req.discards_dark {
        out.push("discard-dark");
    }
    out
}

fn render(
    args: &TransitionArgs,
    output: OutputKind,
) -> anyhow::Result<(TransitionDescriptor, Vec<FrameRGB>)> {
    let desc = descriptor(args)?;
    // A variant that fails to build is reported by the render below.
    let requirements = match FoldVariant::from_descriptor(&desc) {
        Ok(variant) => variant.requirements(),
        Err(_) => Crossfade::new().requirements(),
    };
    let caps = match output {
        OutputKind::Video => Capabilities::probe(),
        OutputKind::Frames => Capabilities { ffmpeg: false },
    };
    requirements.check(output, &caps)?;

    let from = origami::load_image(&args.from, desc.resolution)?;
    let to = origami::load_image(&args.to, desc.resolution)?;
    let opts = RenderOpts {
        backend: args.backend,
        settings: RenderSettings::default(),
    };

    let frames = if args.fallback {
        let rendered = origami::render_transition_with_fallback(&from, &to, &desc, &opts)?;
        if let Some(err) = &rendered.fallback_from {
            eprintln!("{} failed ({err}); rendered a crossfade instead", desc.variant);
        }
        rendered.frames
    } else {
        origami::render_transition(&from, &to, &desc, &opts)?
    };
    Ok((desc, frames))
}

fn descriptor(args: &TransitionArgs) -> anyhow::Result<TransitionDescriptor> {
    let mut desc = match &args.descriptor {
        Some(path) => TransitionDescriptor::from_path(path)?,
        None => TransitionDescriptor::new(
            2.0,
            Fps::whole(30)?,
            Resolution::default(),
            VariantId::Left,
        ),
    };
    if let Some(v) = args.variant {
        desc.variant = v;
    }
    if let Some(d) = args.duration {
        desc.duration_secs = d;
    }
    if let Some(fps) = args.fps {
        desc.fps = fps;
    }
    if let Some(size) = args.size {
        desc.resolution = size;
    }
    if let Some(ease) = args.ease {
        desc.options.ease = ease;
    }
    if args.no_lighting {
        desc.options.lighting = false;
    }
    if let Some(h) = args.min_seam_height {
        desc.options.min_seam_height = h;
    }
    desc.validate()?;
    Ok(desc)
}
