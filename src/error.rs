use snafu::Snafu;

#[derive(Snafu, Debug, Clone, PartialEq, Eq)]
pub enum ErudifyError {
    /// A frequency list must name each lexeme at most once.
    #[snafu(display("duplicate frequency list entry: {key}"))]
    DuplicateFrequencyEntry { key: String },
}

pub type Result<T, E = ErudifyError> = std::result::Result<T, E>;
