fn main() {
    // Embeds GIT_COMMIT_HASH and friends, reported by /health.
    if let Err(err) = built::write_built_file() {
        panic!("Failed to acquire build-time information: {err}");
    }
}
