//! Algorithm constants and runtime configuration defaults

// Tie-breaking perturbation added to entropies during observation
/// Scale of the random noise separating cells of equal entropy
pub const ENTROPY_NOISE: f64 = 1e-6;

/// Default side length of overlapping patterns
pub const DEFAULT_PATTERN_SIZE: usize = 3;

/// Default number of the eight pattern symmetries to include
pub const DEFAULT_SYMMETRY: usize = 8;

/// Default output width and height, in cells
pub const DEFAULT_OUTPUT_SIZE: usize = 48;

/// Default tile side length in pixels when a tileset does not specify one
pub const DEFAULT_TILE_SIZE: usize = 16;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Number of generation attempts before giving up on a contradiction
pub const DEFAULT_ATTEMPTS: usize = 10;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_result";
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 5;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;

// Progress display refresh interval
/// Steps between progress bar updates during a generation attempt
pub const PROGRESS_UPDATE_INTERVAL: usize = 64;
