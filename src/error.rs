/// Application error with a stable process exit code.
///
/// Exit codes:
/// - 2: invalid input or I/O failure (bad flag values, unwritable paths)
/// - 3: insufficient data (underdetermined regression)
/// - 4: numeric failure (rank-deficient design, non-finite results)
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    /// Input-validation failure at a boundary (exit code 2).
    pub fn input(message: impl Into<String>) -> Self {
        Self::with_code(2, message)
    }

    /// I/O failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self::with_code(2, message)
    }

    /// Not enough observations to fit (exit code 3).
    pub fn data(message: impl Into<String>) -> Self {
        Self::with_code(3, message)
    }

    /// Numeric failure during generation or fitting (exit code 4).
    pub fn numeric(message: impl Into<String>) -> Self {
        Self::with_code(4, message)
    }

    fn with_code(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
