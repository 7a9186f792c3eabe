//! `wla config`

use super::Backend;
use crate::output::print_json;
use anyhow::Result;

/// Print the effective advisor configuration.
///
/// The configuration is always printed as JSON; it has no tabular form.
pub async fn show_config(backend: &Backend) -> Result<()> {
    match backend {
        Backend::Local(advisor) => print_json(advisor.config()),
        Backend::Remote(client) => print_json(&client.config().await?),
    }
}
