/// Points awarded for a win
pub const WIN_POINTS: u32 = 3;

/// Points awarded to both sides for a draw
pub const DRAW_POINTS: u32 = 1;

/// Candidate goal counts of the built-in distributions; the last bucket stands for "4 or more"
pub const DEFAULT_GOALS: [u32; 5] = [0, 1, 2, 3, 4];

/// Share of home sides scoring 0, 1, 2, 3 and 4+ goals (second-division seasons, aggregated)
pub const DEFAULT_HOME_WEIGHTS: [f64; 5] = [0.232, 0.331, 0.245, 0.122, 0.070];

/// Share of away sides scoring 0, 1, 2, 3 and 4+ goals (second-division seasons, aggregated)
pub const DEFAULT_AWAY_WEIGHTS: [f64; 5] = [0.318, 0.352, 0.198, 0.090, 0.042];

/// Number of simulated seasons when the caller does not choose one
pub const DEFAULT_TRIALS: usize = 1000;

/// Trials per parallel work unit. Each batch owns one random stream, so changing this
/// changes the draws a given seed produces.
pub const DEFAULT_BATCH_SIZE: usize = 512;

/// Decimal places kept in rounded percentage output
pub const PERCENT_DECIMALS: i32 = 2;
