/// Golden ratio: (1 + √5) / 2
pub const PHI: f64 = 1.618_033_988_749_895;

/// Numerical epsilon for near-zero comparisons
pub const EPSILON: f64 = 1e-10;

/// Smallest template size. Fewer entries still get a full template.
pub const MIN_TEMPLATE_COUNT: usize = 3;

/// Largest template size. A constellation never holds more stars than this.
pub const MAX_TEMPLATE_COUNT: usize = 7;

/// Fraction of the region radius a single-region layout may use.
pub const REGION_FILL: f64 = 0.8;

/// Fraction of the region radius over which group centres are spread.
pub const GROUP_SPREAD: f64 = 0.7;

/// Upper bound on one constellation's radius, as a fraction of its region.
pub const CONSTELLATION_FILL: f64 = 0.3;

/// Base constellation scale, multiplied by log10(size + 1).
pub const BASE_SCALE: f64 = 30.0;

/// Divisor floor when normalizing a template by its largest norm.
pub const MIN_TEMPLATE_EXTENT: f64 = 1.0;

/// Minimum depth of a distributed group centre (fraction of the radius).
pub const MIN_CENTER_DEPTH: f64 = 0.3;

/// Minimum tag similarity for a ranked connection.
pub const SIMILARITY_THRESHOLD: f64 = 0.20;

/// Soft degree cap honoured while admitting ranked connections.
pub const MAX_CONNECTIONS_PER_ENTRY: usize = 2;

/// Similarity between a tagged and an untagged entry.
pub const ONE_SIDED_SIMILARITY: f64 = 0.1;

/// Fixed seed of the scatter template.
pub const SCATTER_SEED: u64 = 42;

/// Fixed seed of the chaos template.
pub const CHAOS_SEED: u64 = 43;
