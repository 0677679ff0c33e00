use std::fs;
use std::path::Path;
use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Rebuild on commit or branch switch so --version stays honest
    if Path::new(".git").exists() {
        println!("cargo:rerun-if-changed=.git/HEAD");
        if let Ok(head) = fs::read_to_string(".git/HEAD") {
            if let Some(reference) = head.strip_prefix("ref: ") {
                let ref_path = format!(".git/{}", reference.trim());
                if Path::new(&ref_path).exists() {
                    println!("cargo:rerun-if-changed={}", ref_path);
                }
            }
        }
    }

    let hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    let dirty = git(&["status", "--porcelain"]).is_some();

    println!(
        "cargo:rustc-env=GIT_HASH={}{}",
        hash,
        if dirty && hash != "unknown" { "-dirty" } else { "" }
    );
}
