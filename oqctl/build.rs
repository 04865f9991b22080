#![allow(missing_docs)]

fn main() {
    // A tagged CI build reports the tag; anything else reports the crate version and the commit.
    let hash = git_short_hash().unwrap_or_else(|| "unknown".into());
    println!("cargo:rustc-env=OQCTL_BUILD_GIT_HASH={hash}");
    let cargo_version = env!("CARGO_PKG_VERSION");

    let version_string = match ci_tag() {
        Some(tag) => {
            let short_tag = tag.strip_prefix('v').unwrap_or(&tag);
            if cargo_version != short_tag {
                println!(
                    "cargo::error=mismatched version tags: cargo={cargo_version}, CI tag={short_tag}"
                );
            }
            tag
        }
        None => format!("{cargo_version}+g{hash}"),
    };
    println!("cargo:rustc-env=OQCTL_VERSION_STRING={version_string}");
    println!("cargo:rerun-if-changed=build.rs");
}

fn ci_tag() -> Option<String> {
    std::env::var("GITHUB_REF_TYPE")
        .is_ok_and(|v| v == "tag")
        .then(|| std::env::var("GITHUB_REF_NAME").ok())
        .flatten()
}

fn git_short_hash() -> Option<String> {
    let output = std::process::Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    let rev = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!rev.is_empty()).then_some(rev)
}
