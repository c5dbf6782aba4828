use std::path::Path;

/// Resolves the commit hash of `HEAD` from the `.git` directory.
///
/// Loose refs are checked first followed by `packed-refs`.
fn read_head_hash(git_dir: &Path) -> std::io::Result<String> {
    let head_path = git_dir.join("HEAD");
    println!("cargo::rerun-if-changed={}", head_path.display());

    let head = std::fs::read_to_string(&head_path)?;
    let Some(head_ref) = head.trim().strip_prefix("ref: ") else {
        return Ok(head.trim().to_string());
    };

    let ref_path = git_dir.join(head_ref);
    if let Ok(hash) = std::fs::read_to_string(&ref_path) {
        println!("cargo::rerun-if-changed={}", ref_path.display());
        return Ok(hash.trim().to_string());
    }

    let packed_path = git_dir.join("packed-refs");
    println!("cargo::rerun-if-changed={}", packed_path.display());
    std::fs::read_to_string(&packed_path)?
        .lines()
        .filter_map(|line| line.split_once(' '))
        .find_map(|(hash, name)| (name == head_ref).then(|| hash.to_string()))
        .ok_or_else(|| std::io::Error::other(format!("{head_ref} is not in packed-refs")))
}

fn main() {
    println!("cargo::rerun-if-changed=build.rs");

    let shorthash = read_head_hash(Path::new(".git"))
        .ok()
        .filter(|hash| hash.len() == 40)
        .map(|hash| hash[..7].to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo::rustc-env=GIT_SHORT_HASH={shorthash}");
}
