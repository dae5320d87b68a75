use std::io::Write;

use property_server::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info.payload();
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "Unknown location".to_string());

        eprintln!("[PANIC] 程序异常退出");
        eprintln!("位置: {}", location);
        eprintln!("原因: {}", message);

        tracing::error!(event = "panic.raised", location = %location, reason = %message);

        if std::fs::create_dir_all("./runtime/logs").is_ok() {
            let panic_file = format!(
                "./runtime/logs/panic-{}.log",
                chrono::Utc::now().format("%Y%m%d-%H%M%S")
            );
            let panic_msg = format!(
                "PANIC OCCURRED\nLocation: {}\nReason: {}\nTime: {}\n",
                location,
                message,
                chrono::Utc::now()
            );
            if let Err(e) = std::fs::write(&panic_file, panic_msg) {
                eprintln!("[WARN] 无法写入panic日志: {}", e);
            }
        }

        std::io::stderr().flush().ok();
    }));

    let mut args = std::env::args();
    let _ = args.next();

    match args.next().as_deref() {
        Some("health-check") | Some("--health-check") => {
            let report = server::check_system_health().await?;
            println!(
                "健康检查: overall={}, store={}, uploads={}, logs={}",
                report.overall_healthy, report.store_healthy, report.uploads_healthy, report.logs_writable
            );
            if !report.overall_healthy {
                std::process::exit(1);
            }
            Ok(())
        }
        _ => server::start_server().await,
    }
}
