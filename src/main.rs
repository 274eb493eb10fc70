use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::time::Instant;
use surface_shader::io::config::Config;
use surface_shader::io::image::save_framebuffer;
use surface_shader::pipeline::passes::render_frame;
use surface_shader::pipeline::renderer::Renderer;
use surface_shader::scene::loader::load_scene;
use surface_shader::shading::config::PipelineConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// Tangent space per vertex, plain specular, raw normal samples.
    VertexProjected,
    /// World-space TBN per fragment, masked specular, remapped normal samples.
    FragmentTbn,
}

impl From<Preset> for PipelineConfig {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::VertexProjected => PipelineConfig::vertex_projected(),
            Preset::FragmentTbn => PipelineConfig::fragment_tbn(),
        }
    }
}

/// Renders one frame of a TOML-described scene to an image.
#[derive(Parser, Debug)]
#[command(name = "surface-shader", version)]
struct Cli {
    /// Scene file; built-in defaults when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Overrides `render.output`.
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Replaces the `[pipeline]` section.
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Draws the wireframe overlay and TBN glyphs.
    #[arg(long)]
    debug_geometry: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading config: {}", path);
            Config::load(path).with_context(|| format!("loading config '{}'", path))?
        }
        None => {
            info!("Using default config");
            Config::default()
        }
    };
    if let Some(output) = cli.output {
        config.render.output = output;
    }
    if let Some(preset) = cli.preset {
        config.pipeline = preset.into();
    }
    if cli.debug_geometry {
        config.debug.geometry = true;
        config.debug.vectors = true;
    }

    let context = load_scene(&config).context("building scene")?;
    let mut renderer = Renderer::new(
        config.render.width,
        config.render.height,
        config.render.samples,
    );

    let start = Instant::now();
    render_frame(&config, &context, &mut renderer);
    info!("Rendered in {:?}", start.elapsed());

    save_framebuffer(&renderer.framebuffer, &config.render.output)
        .with_context(|| format!("writing '{}'", config.render.output))?;
    Ok(())
}
