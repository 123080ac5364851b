use std::sync::LazyLock;

use crate::build_info::BUILD_INFO;

/// Defines the application version.
pub static VERSION: LazyLock<String> = LazyLock::new(|| {
    render(
        env!("IMAGE_VERSION"),
        BUILD_INFO.commit_sha1,
        BUILD_INFO.git_dirty,
    )
});

fn render(image_version: &str, commit_sha1: Option<&str>, git_dirty: Option<&str>) -> String {
    format!(
        "{}-{}{}",
        image_version,
        commit_sha1.unwrap_or("unknown"),
        if git_dirty == Some("true") { "-dirty" } else { "" }
    )
}
