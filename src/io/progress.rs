//! Multi-file progress tracking with automatic batching for large sets

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static ATTEMPT_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:30.cyan/blue}] {prefix}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Final state of one input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Still generating
    Running,
    /// An output was written
    Generated,
    /// Every attempt ended in contradiction
    Failed,
}

#[derive(Debug, Clone)]
struct FileState {
    name: String,
    attempt: usize,
    attempts: usize,
    steps: usize,
    outcome: FileOutcome,
}

/// Coordinates progress display for batch generation
///
/// Each visible bar tracks the attempts spent on one file; large batches add a single
/// bar counting finished files and only the most recent files keep a bar of their own.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    files: Vec<Option<FileState>>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Initialize progress bars based on file count
    pub fn initialize(&mut self, file_count: usize) {
        self.files = vec![None; file_count];

        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let pb = ProgressBar::new(0);
            pb.set_style(ATTEMPT_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Register a file about to be generated with up to `attempts` attempts
    pub fn start_file(&mut self, index: usize, path: &Path, attempts: usize) {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.files.len() {
            self.files.resize(index + 1, None);
        }
        if let Some(slot) = self.files.get_mut(index) {
            *slot = Some(FileState {
                name,
                attempt: 0,
                attempts,
                steps: 0,
                outcome: FileOutcome::Running,
            });
        }
        self.update_bars();
    }

    /// Report the attempt in progress and the steps it has taken
    pub fn update_attempt(&mut self, index: usize, attempt: usize, steps: usize) {
        if let Some(Some(state)) = self.files.get_mut(index) {
            state.attempt = attempt;
            state.steps = steps;
        }
        self.update_bars();
    }

    /// Mark a file as finished
    pub fn complete_file(&mut self, index: usize, outcome: FileOutcome) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(Some(state)) = self.files.get_mut(index) {
            state.outcome = outcome;
            if outcome == FileOutcome::Generated {
                state.attempt = state.attempt.max(1);
            } else {
                state.attempt = state.attempts;
            }
        }
        self.update_bars();
    }

    /// Outcome recorded for a file, if it was started
    pub fn outcome(&self, index: usize) -> Option<FileOutcome> {
        self.files.get(index)?.as_ref().map(|state| state.outcome)
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }

    fn update_bars(&self) {
        let started: Vec<&FileState> = self.files.iter().flatten().collect();
        let visible = started
            .get(started.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS)..)
            .unwrap_or_default();

        for (bar, state) in self.file_bars.iter().zip(visible) {
            let marker = match state.outcome {
                FileOutcome::Running => "",
                FileOutcome::Generated => "✓ ",
                FileOutcome::Failed => "✗ ",
            };
            bar.set_length(state.attempts as u64);
            bar.set_position(state.attempt as u64);
            bar.set_message(format!(
                "attempt {}/{} ({} steps)",
                state.attempt, state.attempts, state.steps
            ));
            bar.set_prefix(format!("{marker}{}", state.name));
        }

        for bar in self.file_bars.iter().skip(visible.len()) {
            bar.set_length(0);
            bar.set_position(0);
            bar.set_message(String::new());
            bar.set_prefix(String::new());
        }
    }
}
