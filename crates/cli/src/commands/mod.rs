//! CLI subcommands.

pub mod migrate;
pub mod token;
pub mod user;

/// Read `DATABASE_URL`, loading `.env` first.
pub(crate) fn database_url() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty())
}
