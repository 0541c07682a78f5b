//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burn::{
    config::Config,
    data::{dataloader::batcher::Batcher, dataset::Dataset},
    prelude::*,
    tensor::{Distribution, ElementConversion},
};
use wallseg::{
    dataset::{DatasetConfig, SegmentationBatcher, Split, WallSceneDataset},
    ModelConfig, UNetConfig,
};

use crate::backend::{Runtime, SelectedBackend};

/// Loads the model configuration, or falls back to the defaults.
pub fn load_model_config(path: Option<&Path>) -> Result<ModelConfig> {
    let config = match path {
        Some(path) => {
            tracing::info!(config = %path.display(), "loading model configuration");
            ModelConfig::load(path).map_err(|e| {
                anyhow::anyhow!("failed to load configuration {}: {e}", path.display())
            })?
        }
        None => ModelConfig::new(),
    };

    config.validate()?;
    Ok(config)
}

/// Writes the default model configuration as JSON.
pub fn init_config(path: &Path) -> Result<()> {
    ModelConfig::new()
        .save(path)
        .with_context(|| format!("failed to write configuration to {}", path.display()))?;

    tracing::info!(path = %path.display(), "wrote default configuration");
    Ok(())
}

/// Prints the backend, the configuration and the per-stage plan for an input size.
pub fn info(config: &ModelConfig, height: usize, width: usize) -> Result<()> {
    let schedule = config.schedule()?;
    let runtime = Runtime::new();
    let model = UNetConfig::new(config.clone()).init::<SelectedBackend>(&runtime.device)?;

    println!("Runtime: {runtime}");
    println!("Input channels: {}", config.in_channels);
    println!("Classes: {}", config.num_classes);
    println!("Interpolation: {:?}", config.interpolation);
    println!("Parameters: {}", model.num_params());
    println!("Minimum input size: {0}x{0}", schedule.min_input_size());
    println!();

    let skip_sizes = schedule.skip_sizes(height, width);
    println!("Encoder ({height}x{width} input):");
    for (stage, [h, w]) in schedule.encoder_stages(config.in_channels).iter().zip(&skip_sizes) {
        println!(
            "  stage {}: {:>5} -> {:>5} channels, skip {h}x{w}",
            stage.index, stage.in_channels, stage.out_channels
        );
    }

    let [h, w] = schedule.bottleneck_size(height, width);
    println!(
        "Bottleneck: {:>5} -> {:>5} channels at {h}x{w}",
        schedule.last(),
        schedule.bottleneck_channels()
    );

    println!("Decoder:");
    let mut size = [h, w];
    for stage in schedule.decoder_stages() {
        let [skip_h, skip_w] = skip_sizes[stage.index];
        let upsampled = [size[0] * 2, size[1] * 2];
        let note = if upsampled == [skip_h, skip_w] {
            String::new()
        } else {
            format!(" (resized from {}x{})", upsampled[0], upsampled[1])
        };
        println!(
            "  stage {}: {:>5} -> {:>5} channels at {skip_h}x{skip_w}{note}",
            stage.index, stage.in_channels, stage.out_channels
        );
        size = [skip_h, skip_w];
    }

    println!(
        "Head: {:>5} -> {:>5} channels at {height}x{width}",
        schedule.first(),
        config.num_classes
    );

    Ok(())
}

/// Runs one forward pass on random input and verifies the output shape.
pub fn check(config: &ModelConfig, batch: usize, height: usize, width: usize) -> Result<()> {
    let runtime = Runtime::new();
    tracing::info!(%runtime, "building model");
    let model = UNetConfig::new(config.clone()).init::<SelectedBackend>(&runtime.device)?;

    let input = Tensor::<SelectedBackend, 4>::random(
        [batch, config.in_channels, height, width],
        Distribution::Default,
        &runtime.device,
    );
    tracing::info!(shape = ?input.dims(), "running forward pass");
    let output = model.forward(input)?;

    let expected = [batch, config.num_classes, height, width];
    if output.dims() != expected {
        anyhow::bail!(
            "output shape {:?} does not match expected {:?}",
            output.dims(),
            expected
        );
    }

    println!("Output shape: {:?}", output.dims());
    Ok(())
}

/// Collects a dataset split and batches its first samples.
pub fn dataset(root: PathBuf, split: Split, samples: usize, size: u32) -> Result<()> {
    let config = DatasetConfig::new()
        .with_data_root_dir(root)
        .with_target_size(size);
    let dataset = WallSceneDataset::new(&config, split)
        .with_context(|| format!("failed to open {} split", split.dir_name()))?;

    println!("Split: {}", split.dir_name());
    println!("Image/mask pairs: {}", dataset.len());

    let items: Vec<_> = (0..samples.min(dataset.len()))
        .filter_map(|index| dataset.get(index))
        .collect();
    if items.is_empty() {
        anyhow::bail!("none of the first {samples} samples could be loaded");
    }

    let runtime = Runtime::new();
    tracing::info!(%runtime, samples = items.len(), "batching samples");
    let batch = SegmentationBatcher::<SelectedBackend>::new().batch(items, &runtime.device);
    let [n, _, h, w] = batch.images.dims();
    let wall_pixels = batch.masks.clone().sum().into_scalar().elem::<f64>();

    println!("Images: {:?}", batch.images.dims());
    println!("Masks: {:?}", batch.masks.dims());
    println!(
        "Wall pixels: {:.1}%",
        100.0 * wall_pixels / (n * h * w) as f64
    );

    Ok(())
}
