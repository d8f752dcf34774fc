//! Command-line interface for batch generation from samples and tilesets

use crate::algorithm::catalog::Catalog;
use crate::algorithm::executor::{GenerationStatus, Model};
use crate::analysis::overlapping::{OverlappingCatalog, OverlappingOptions};
use crate::analysis::tiled::TiledCatalog;
use crate::io::configuration::{
    DEFAULT_ATTEMPTS, DEFAULT_OUTPUT_SIZE, DEFAULT_PATTERN_SIZE, DEFAULT_SEED, DEFAULT_SYMMETRY,
    GIF_FRAME_DELAY_MS, OUTPUT_SUFFIX, PROGRESS_UPDATE_INTERVAL,
};
use crate::io::definition::load_definition;
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::export_rgba_as_png;
use crate::io::progress::{FileOutcome, ProgressManager};
use crate::io::render::Render;
use crate::io::visualization::FrameCapture;
use crate::math::random::{LcgRandom, RandomSource, SeededRandom};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "wavecollapse")]
#[command(
    author,
    version,
    about = "Generate textures and tile maps by wave function collapse"
)]
/// Command-line arguments for the generation tool
///
/// PNG inputs are treated as samples for the overlapping model, JSON inputs as tileset
/// definitions for the simple tiled model.
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG sample, JSON tileset or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Random seed for reproducible generation; attempt `k` uses `seed + k`
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Seed the portable generator from a phrase instead of a number
    #[arg(long, conflicts_with = "seed")]
    pub phrase: Option<String>,

    /// Output width in cells
    #[arg(short = 'w', long, default_value_t = DEFAULT_OUTPUT_SIZE)]
    pub width: usize,

    /// Output height in cells
    #[arg(short = 'H', long, default_value_t = DEFAULT_OUTPUT_SIZE)]
    pub height: usize,

    /// Wrap the output around its edges
    #[arg(short, long)]
    pub periodic: bool,

    /// Pattern size N for PNG samples
    #[arg(short = 'n', long, default_value_t = DEFAULT_PATTERN_SIZE)]
    pub pattern_size: usize,

    /// Number of rotations/reflections of each sample window to include (1-8)
    #[arg(long, default_value_t = DEFAULT_SYMMETRY)]
    pub symmetry: usize,

    /// Treat PNG samples as non-repeating; windows will not wrap around their edges
    #[arg(long)]
    pub bounded_input: bool,

    /// Pattern forced along the bottom row (negative counts from the last pattern, 0 disables)
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub ground: i64,

    /// Tileset subset to generate with
    #[arg(long)]
    pub subset: Option<String>,

    /// Attempts before giving up on an input
    #[arg(short, long, default_value_t = DEFAULT_ATTEMPTS)]
    pub attempts: usize,

    /// Stop each attempt after this many steps, exporting a partial result
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Enable visualization output as animated GIF
    #[arg(short, long)]
    pub visualize: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Pattern extraction settings for PNG samples
    pub const fn overlapping_options(&self) -> OverlappingOptions {
        OverlappingOptions {
            pattern_size: self.pattern_size,
            periodic_input: !self.bounded_input,
            symmetry: self.symmetry,
            ground: self.ground,
        }
    }

    /// Random source for the given attempt
    pub fn random_source(&self, attempt: usize) -> Box<dyn RandomSource> {
        match &self.phrase {
            Some(phrase) if attempt == 0 => Box::new(LcgRandom::from_phrase(phrase)),
            Some(phrase) => Box::new(LcgRandom::from_phrase(&format!("{phrase} {attempt}"))),
            None => Box::new(SeededRandom::new(self.seed.wrapping_add(attempt as u64))),
        }
    }
}

/// Kind of input a file provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// PNG sample for the overlapping model
    Sample,
    /// JSON tileset for the simple tiled model
    Tileset,
}

impl InputKind {
    /// Classify a path by extension
    pub fn of(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("png") => Some(Self::Sample),
            Some("json") => Some(Self::Tileset),
            _ => None,
        }
    }
}

/// Orchestrates batch generation with retries and progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// Returns the outcome of every processed file, in processing order.
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, catalog construction or export fails.
    /// Contradictions are not errors: an input whose attempts all fail is reported as
    /// [`FileOutcome::Failed`].
    pub fn process(&mut self) -> Result<Vec<(PathBuf, FileOutcome)>> {
        let files = self.collect_files()?;
        let mut outcomes = Vec::with_capacity(files.len());

        if files.is_empty() {
            return Ok(outcomes);
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.into_iter().enumerate() {
            let outcome = self.process_file(&file, index)?;
            outcomes.push((file, outcome));
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(outcomes)
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if InputKind::of(target).is_none() {
                return Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &"file must be a PNG sample or a JSON tileset",
                ));
            }
            Ok(if self.should_process_file(target) {
                vec![target.clone()]
            } else {
                vec![]
            })
        } else if target.is_dir() {
            let mut files = Vec::new();
            let entries = std::fs::read_dir(target).map_err(|e| {
                crate::io::error::AlgorithmError::FileSystem {
                    path: target.clone(),
                    operation: "read directory",
                    source: e,
                }
            })?;
            for entry in entries {
                let path = entry?.path();
                if InputKind::of(&path).is_some()
                    && !Self::is_generated(&path)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"must be a PNG file, a JSON file or a directory",
            ))
        }
    }

    // Outputs land next to their inputs; never treat them as samples
    fn is_generated(path: &Path) -> bool {
        path.file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX))
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            info!(input = %input_path.display(), "skipping, output exists");
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<FileOutcome> {
        match InputKind::of(input_path) {
            Some(InputKind::Sample) => {
                let catalog =
                    OverlappingCatalog::from_png_file(input_path, &self.cli.overlapping_options())?;
                self.generate(catalog, input_path, index)
            }
            Some(InputKind::Tileset) => {
                let definition = load_definition(input_path)?;
                let catalog = TiledCatalog::new(&definition, self.cli.subset.as_deref())?;
                self.generate(catalog, input_path, index)
            }
            None => Err(invalid_parameter(
                "target",
                &input_path.display(),
                &"unsupported input type",
            )),
        }
    }

    fn generate<C: Catalog + Render>(
        &mut self,
        catalog: C,
        input_path: &Path,
        index: usize,
    ) -> Result<FileOutcome> {
        let start_time = Instant::now();
        let mut model = Model::new(catalog, self.cli.width, self.cli.height, self.cli.periodic)?;
        let (width, height) = model.image_dimensions();

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, self.cli.attempts);
        }

        for attempt in 0..self.cli.attempts {
            let mut rng = self.cli.random_source(attempt);
            let mut capture = self
                .cli
                .visualize
                .then(|| FrameCapture::new(width, height, GIF_FRAME_DELAY_MS));

            let success =
                self.run_attempt(&mut model, rng.as_mut(), index, attempt, capture.as_mut())?;

            if !success {
                warn!(
                    input = %input_path.display(),
                    attempt,
                    steps = model.steps(),
                    "contradiction"
                );
                continue;
            }

            let pixels = model.graphics()?;
            export_rgba_as_png(&pixels, width, height, Self::get_output_path(input_path))?;

            if let Some(mut capture) = capture {
                capture.capture_final(&pixels);
                capture.export_gif(Self::get_visualization_path(input_path))?;
            }

            if let Some(ref mut pm) = self.progress_manager {
                pm.complete_file(index, FileOutcome::Generated);
            }
            info!(
                input = %input_path.display(),
                attempt,
                steps = model.steps(),
                complete = model.is_generation_complete(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "generated"
            );
            return Ok(FileOutcome::Generated);
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, FileOutcome::Failed);
        }
        warn!(
            input = %input_path.display(),
            attempts = self.cli.attempts,
            "every attempt ended in contradiction"
        );
        Ok(FileOutcome::Failed)
    }

    // Returns false on contradiction; hitting the step limit counts as success
    fn run_attempt<C: Catalog + Render>(
        &mut self,
        model: &mut Model<C>,
        rng: &mut dyn RandomSource,
        index: usize,
        attempt: usize,
        mut capture: Option<&mut FrameCapture>,
    ) -> Result<bool> {
        model.clear();
        debug!(attempt, "starting attempt");

        loop {
            if self.cli.limit.is_some_and(|limit| model.steps() >= limit) {
                return Ok(true);
            }

            model.iterate(&mut *rng, Some(1));

            if let Some(capture) = capture.as_deref_mut() {
                capture.capture(&model.graphics()?);
            }
            if model.steps() % PROGRESS_UPDATE_INTERVAL == 0 {
                if let Some(ref mut pm) = self.progress_manager {
                    pm.update_attempt(index, attempt + 1, model.steps());
                }
            }

            match model.status() {
                GenerationStatus::Complete => return Ok(true),
                GenerationStatus::Contradiction => return Ok(false),
                GenerationStatus::Ready | GenerationStatus::InProgress => {}
            }
        }
    }

    /// Where the generated image for an input is written
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!("{}{}.png", stem.to_string_lossy(), OUTPUT_SUFFIX);

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }

    /// Where the stepwise playback for an input is written
    pub fn get_visualization_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let viz_name = format!("{}_visualization.gif", stem.to_string_lossy());

        if let Some(parent) = input_path.parent() {
            parent.join(viz_name)
        } else {
            PathBuf::from(viz_name)
        }
    }
}
