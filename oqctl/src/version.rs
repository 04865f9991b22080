//! Build-time version information
// (c) 2026 oqctl developers

/// Short version string, e.g. `0.1.0+gdeadbeef`
pub(crate) fn short() -> String {
    if let Some(v) = option_env!("OQCTL_VERSION_STRING") {
        return v.to_string();
    }
    let hash = option_env!("OQCTL_BUILD_GIT_HASH").unwrap_or("???");
    format!("{}+g{hash}", env!("CARGO_PKG_VERSION"))
}
