//! Implementation of the `nugetcfg global` command.

use crate::discovery::find_global_config;
use crate::error::{NugetError, Result};

/// Print the path of the user-level config, or fail when there is none.
pub fn cmd_global() -> Result<()> {
    let path = find_global_config().ok_or_else(|| {
        NugetError::UserError(
            "no user-level NuGet.Config found.\n\n\
             Looked in %APPDATA%\\NuGet on Windows, or ~/.config/NuGet and ~/.nuget/NuGet elsewhere."
                .to_string(),
        )
    })?;
    println!("{}", path.display());
    Ok(())
}
