/// Rows in the keyboard backlight grid.
pub const GRID_ROWS: usize = 6;

/// Columns in the keyboard backlight grid.
pub const GRID_COLS: usize = 22;

/// Trials per block before a mandatory rest.
pub const DEFAULT_BLOCK_SIZE: usize = 30;

/// Pause after a correct response, in milliseconds.
pub const DEFAULT_CORRECT_DELAY_MS: u64 = 1000;

/// Pause after an incorrect response, in milliseconds.
pub const DEFAULT_INCORRECT_DELAY_MS: u64 = 2000;

/// Rest between blocks, in milliseconds.
pub const DEFAULT_REST_DELAY_MS: u64 = 5000;

/// How often the illumination sink is repainted, in milliseconds.
pub const DEFAULT_REFRESH_MS: u64 = 10;
