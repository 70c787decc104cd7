//! Files under the strata home directory.

use std::env;
use std::path::PathBuf;

const HOME_VAR: &str = "STRATA_HOME";

/// `$STRATA_HOME` when set, else `.strata` in the user's home. `None` when
/// neither is available.
pub fn strata_home() -> Option<PathBuf> {
    env::var_os(HOME_VAR)
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".strata")))
}

/// Registry credentials file.
pub fn auth_path() -> Option<PathBuf> {
    strata_home().map(|home| home.join("auth.json"))
}
