use std::process;
use std::time::Instant;

use sqldump_core::{DatabaseSession, DumpOptions, Dumper};

use crate::{print_completed, print_error, print_status};

/// 导出数据库为 SQL 文件任务
pub fn run(
    session: Box<dyn DatabaseSession>,
    options: DumpOptions,
) {
    tracing::info!("开始导出任务");
    tracing::debug!(
        "导出配置: database={}, dir={}, file={}, dump_schema={}, dump_data={}",
        options.database,
        options.dir,
        options.file_name,
        options.dump_schema,
        options.dump_data
    );

    let mut dumper = match Dumper::new(session, options) {
        Ok(dumper) => dumper,
        Err(e) => {
            print_error("fatal", &format!("初始化导出器失败: {}", e));
            process::exit(1);
        }
    };

    print_status(serde_json::json!({ "message": "导出开始" }));
    let start_time = Instant::now();

    let summary = match dumper.dump() {
        Ok(summary) => summary,
        Err(e) => {
            print_error("fatal", &format!("导出中断: {}", e));
            process::exit(1);
        }
    };

    let elapsed = start_time.elapsed().as_secs_f64();
    tracing::info!(
        "导出结束,成功 {} 个表,失败 {} 个表,耗时 {:.1} 秒",
        summary.succeeded.len(),
        summary.failed.len(),
        elapsed
    );

    let failed = summary.has_failures();
    print_completed(serde_json::json!({
        "status": if failed { "partial" } else { "success" },
        "summary": summary,
        "elapsed_seconds": format!("{:.1}", elapsed),
    }));

    // 有任一表失败时以非零状态退出,让调用方能从退出码感知部分失败
    if failed {
        process::exit(1);
    }
}
