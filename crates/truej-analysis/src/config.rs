//! Configuration for the proof pass.

/// The default branch limit handed to the prover.
const DEFAULT_BRANCH_LIMIT: usize = 4096;

/// Represents configuration for analysis.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether `return e;` translates only to the decorated final value
    /// `('return^' = e)`.
    require_decorated_final_value: bool,
    /// The number of disjunctive branches the prover may explore before
    /// reporting that it reached an internal limit.
    branch_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            require_decorated_final_value: true,
            branch_limit: DEFAULT_BRANCH_LIMIT,
        }
    }
}

impl Config {
    /// Creates a new analysis configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets whether `return e;` translates only to the decorated final
    /// value `('return^' = e)`.
    ///
    /// When false, the undecorated `(return = e)` is asserted as well so
    /// that authors may refer to either name in claims.
    ///
    /// Defaults to `true`.
    pub fn require_decorated_final_value(&self) -> bool {
        self.require_decorated_final_value
    }

    /// Sets whether `return e;` translates only to the decorated final
    /// value.
    pub fn with_require_decorated_final_value(mut self, value: bool) -> Self {
        self.require_decorated_final_value = value;
        self
    }

    /// Gets the number of disjunctive branches the prover may explore
    /// before reporting that it reached an internal limit.
    pub fn branch_limit(&self) -> usize {
        self.branch_limit
    }

    /// Sets the prover branch limit.
    pub fn with_branch_limit(mut self, limit: usize) -> Self {
        self.branch_limit = limit;
        self
    }
}
