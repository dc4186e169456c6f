// Copyright 2020 TwoCookingMice

use ganache::core::accumulation::AccumulationBuffer;
use ganache::core::error::{RenderError, Result};
use ganache::core::integrator::Integrator;
use ganache::core::presentation::present_accumulation;
use ganache::core::scene::RenderContext;
use ganache::core::sensor::Sensor;
use ganache::core::settings::RenderSettings;
use ganache::integrators::path::PathIntegrator;
use ganache::io::exr_utils::write_accumulation_exr;
use ganache::io::png_utils::PngSink;
use ganache::renderers::progressive::{ProgressiveRenderer, Renderer};
use ganache::scenes::{cornell, shadowed_quad, DemoScene};
use ganache::shapes::mesh_intersector::BvhIntersector;

use indicatif::{ProgressBar, ProgressStyle};
use std::env;

const USAGE: &str = "<output.png> [--scene cornell|shadow] [--width N] [--height N] [--spp N] \
                     [--max-depth N] [--frames N] [--exr path]";

#[derive(Debug, Clone, PartialEq)]
struct CliOptions {
    output: String,
    scene: String,
    width: usize,
    height: usize,
    settings: RenderSettings,
    frames: u32,
    exr: Option<String>,
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T> {
    let value = value.ok_or_else(|| RenderError::Config(format!("{} expects a value", flag)))?;
    value.parse::<T>()
        .map_err(|_| RenderError::Config(format!("invalid value for {}: {}", flag, value)))
}

fn parse_args(args: &[String]) -> Result<CliOptions> {
    let output = args.get(1)
        .filter(|a| !a.starts_with("--"))
        .ok_or_else(|| RenderError::Config(format!("usage: {} {}", args.first().map_or("ganache", |s| s.as_str()), USAGE)))?;

    let mut options = CliOptions {
        output: output.clone(),
        scene: String::from("cornell"),
        width: 256,
        height: 256,
        settings: RenderSettings::default(),
        frames: 16,
        exr: None,
    };

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        let value = args.get(i);
        match flag {
            "--scene" => options.scene = parse_value(flag, value)?,
            "--width" => options.width = parse_value(flag, value)?,
            "--height" => options.height = parse_value(flag, value)?,
            "--spp" => options.settings.samples_per_pixel = parse_value(flag, value)?,
            "--max-depth" => options.settings.max_depth = parse_value(flag, value)?,
            "--frames" => options.frames = parse_value(flag, value)?,
            "--exr" => options.exr = Some(parse_value(flag, value)?),
            _ => return Err(RenderError::Config(format!("unknown argument: {}", flag))),
        }
        i += 1;
    }

    options.settings.validate()?;
    if options.width == 0 || options.height == 0 {
        return Err(RenderError::Config(String::from("resolution must be at least 1x1")));
    }
    Ok(options)
}

fn load_scene(options: &CliOptions) -> Result<DemoScene> {
    match options.scene.as_str() {
        "cornell" => cornell::cornell_box(options.width, options.height),
        "shadow" => shadowed_quad::shadowed_quad(options.width, options.height),
        other => Err(RenderError::Config(format!("unknown scene: {}", other))),
    }
}

fn run(options: &CliOptions) -> Result<()> {
    let demo = load_scene(options)?;
    let intersector = BvhIntersector::new(demo.scene.geometry())?;
    let ctx = RenderContext::new(&demo.scene, &intersector);
    let renderer = ProgressiveRenderer::new(Box::new(PathIntegrator::from_settings(&options.settings)));
    let mut accumulation = AccumulationBuffer::new(options.width, options.height);

    log::info!("{}", demo.camera.describe());
    log::info!("{}", renderer.integrator().describe());
    log::info!("Rendering {} frames at {}x{}, {} spp per frame.",
               options.frames, demo.camera.width(), demo.camera.height(),
               renderer.integrator().samples_per_pixel());

    let progress = ProgressBar::new(options.frames as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    for _ in 0..options.frames {
        renderer.render_frame(&ctx, &demo.camera, &mut accumulation)?;
        progress.inc(1);
    }
    progress.finish_and_clear();

    let mut sink = PngSink::new(options.output.as_str());
    present_accumulation(&accumulation, &mut sink)?;
    log::info!("Image written to: {}.", options.output);

    if let Some(exr_path) = &options.exr {
        write_accumulation_exr(&accumulation, exr_path)?;
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let result = parse_args(&args).and_then(|options| run(&options));
    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
