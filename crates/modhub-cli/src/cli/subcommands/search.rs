use clap::{Args, ValueEnum};
use modhub_core::{SearchField, SortBy, Verification};

#[derive(Clone, Debug, Args)]
pub struct SearchArgs {
    /// Text to search for (at most 64 bytes).
    #[arg(default_value = "")]
    pub text: String,

    /// Which field the text is matched against.
    #[arg(long, value_enum, default_value_t = FieldArg::All)]
    pub field: FieldArg,

    #[arg(long, value_enum, default_value_t = SortArg::Name)]
    pub sort: SortArg,

    /// Reverse the sort order.
    #[arg(long)]
    pub reverse: bool,

    /// Minimum verification level.
    #[arg(long, value_enum)]
    pub verification: Option<VerificationArg>,

    /// Maximum number of pages to fetch.
    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    /// Entries per page (defaults to `search.page_size`).
    #[arg(long)]
    pub page_size: Option<u32>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum FieldArg {
    All,
    Name,
    Keywords,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SortArg {
    Name,
    Downloads,
    Uploaded,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum VerificationArg {
    Unsafe,
    Unverified,
    Auto,
    Manual,
    Core,
}

impl From<FieldArg> for SearchField {
    fn from(value: FieldArg) -> Self {
        match value {
            FieldArg::All => Self::All,
            FieldArg::Name => Self::Name,
            FieldArg::Keywords => Self::Keywords,
        }
    }
}

impl From<SortArg> for SortBy {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Name => Self::Name,
            SortArg::Downloads => Self::Downloads,
            SortArg::Uploaded => Self::Uploaded,
        }
    }
}

impl From<VerificationArg> for Verification {
    fn from(value: VerificationArg) -> Self {
        match value {
            VerificationArg::Unsafe => Self::Unsafe,
            VerificationArg::Unverified => Self::Unverified,
            VerificationArg::Auto => Self::Auto,
            VerificationArg::Manual => Self::Manual,
            VerificationArg::Core => Self::Core,
        }
    }
}
