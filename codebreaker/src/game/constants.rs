/// Smallest palette the core accepts. A single color leaves nothing to deduce.
pub const MIN_PALETTE_SIZE: usize = 2;

/// Palette size used when the controller does not choose one.
pub const DEFAULT_PALETTE_SIZE: usize = 4;

/// Status strings that mean the service cracked the code. Compared
/// case-insensitively; anything else is treated as still in progress.
pub const WIN_STATUSES: [&str; 2] = ["won", "ganado"];

/// Prefix of the position tag in a wire token (`p{position}{color}`).
pub const POSITION_TAG: char = 'p';

/// Prefix of a color tag that carries a numeric index (`c{index}`).
pub const COLOR_TAG: char = 'c';
