//! 构建期元数据，由 build.rs 注入

pub const BUILD_VERSION: &str = env!("APP_BUILD_VERSION");
pub const BUILD_COMMIT: &str = env!("APP_BUILD_COMMIT");
pub const BUILD_TIMESTAMP: &str = env!("APP_BUILD_TIMESTAMP");

/// 对外报告的版本号（Cargo 版本）
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 启动日志中打印的完整构建信息
pub fn summary() -> String {
    format!(
        "{} {} (build {}, commit {}, built at {})",
        env!("CARGO_PKG_NAME"),
        version(),
        BUILD_VERSION,
        BUILD_COMMIT,
        BUILD_TIMESTAMP
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_contains_version_and_commit() {
        let s = summary();
        assert!(s.contains(version()));
        assert!(s.contains(BUILD_COMMIT));
    }
}
