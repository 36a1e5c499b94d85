use chrono::Local;
use log::LevelFilter;
use std::io::Write;

/// 初始化全局 logger：输出到 stderr，带毫秒时间戳与模块路径。
/// `RUST_LOG` 环境变量仍可覆盖这里给定的级别。
pub fn init_logging(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                record.level(),
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.module_path().unwrap_or("-"),
                record.args()
            )
        })
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        init_logging(LevelFilter::Debug);
        init_logging(LevelFilter::Info);
        log::debug!("logger initialised");
    }
}
