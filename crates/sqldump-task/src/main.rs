use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fs;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::process::exit;

use serde::{Deserialize, Serialize};
use tracing_appender::{non_blocking, rolling::never};
use tracing_subscriber::{EnvFilter, fmt::layer, layer::SubscriberExt, util::SubscriberInitExt};

use sqldump_core::{DumpOptions, FailPolicy, MySQLOptions, TableOptions, create_connection};

mod dump;

/// 导出任务配置
#[derive(Deserialize)]
pub struct TaskConfig {
    pub task_id: String,
    pub created_at: String,
    pub database: MySQLOptions,
    pub dump: DumpTask,
}

/// 导出设置
#[derive(Debug, Deserialize)]
pub struct DumpTask {
    pub dir: String,
    pub file_name: String,
    #[serde(default = "default_dump_schema")]
    pub dump_schema: bool,
    #[serde(default = "default_dump_data")]
    pub dump_data: bool,
    #[serde(default)]
    pub fail_policy: FailPolicy,
    /// 各数据库的表过滤配置文件(JSON,键为数据库名)
    pub tables_file: Option<String>,
}

fn default_dump_schema() -> bool {
    true
}

fn default_dump_data() -> bool {
    true
}

/// 进度输出消息(写入 stdout 的 JSON Lines)
#[derive(Debug, Serialize)]
pub struct ProgressMessage {
    kind: MessageKind,
    data: serde_json::Value,
}

/// 消息类型
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Status,
    Error,
    Completed,
}

/// 初始化任务日志系统
fn init_task_logging(task_dir: &Path) -> non_blocking::WorkerGuard {
    let log_file = never(task_dir, "task.log");
    let (non_blocking, guard) = non_blocking(log_file);

    tracing_subscriber::registry()
        .with(EnvFilter::new("info"))
        .with(layer().with_writer(stdout))
        .with(layer().with_writer(non_blocking).with_ansi(false))
        .init();

    guard
}

fn main() {
    // 1. 解析命令行参数
    let mut task_dir: Option<PathBuf> = None;
    let args: Vec<String> = env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--task-dir" && i + 1 < args.len() {
            task_dir = Some(PathBuf::from(&args[i + 1]));
            break;
        }
    }
    let task_dir = match task_dir {
        Some(dir) => dir,
        None => {
            print_error("fatal", "缺少 --task-dir 参数");
            eprintln!("用法: sqldump-task --task-dir <DIR>");
            exit(1);
        }
    };

    // 2. 初始化日志系统
    let _log_guard = init_task_logging(&task_dir);
    tracing::info!("任务进程启动,task_dir: {:?}", task_dir);

    // 3. 读取任务配置
    let config_path = task_dir.join("config.json");
    let config_content = match fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) => {
            print_error("fatal", &format!("无法读取配置文件: {}", e));
            exit(1);
        }
    };

    let config: TaskConfig = match serde_json::from_str(&config_content) {
        Ok(cfg) => cfg,
        Err(e) => {
            print_error("fatal", &format!("配置文件格式错误: {}", e));
            exit(1);
        }
    };
    tracing::info!("任务配置解析成功: task_id={}", config.task_id);

    // 4. 加载目标数据库的表过滤配置
    let table_options = match load_table_options(&config) {
        Ok(opts) => opts,
        Err(e) => {
            print_error("fatal", &format!("无法加载表过滤配置: {}", e));
            exit(1);
        }
    };

    // 5. 建立数据库连接
    tracing::info!("正在连接 {}", config.database.endpoint());
    let session = match create_connection(&config.database) {
        Ok(s) => s,
        Err(e) => {
            print_error("fatal", &format!("数据库连接失败: {}", e));
            exit(1);
        }
    };
    tracing::info!("数据库连接成功");

    // 6. 执行导出
    let options = DumpOptions {
        database: config.database.database.clone(),
        dir: config.dump.dir.clone(),
        file_name: config.dump.file_name.clone(),
        dump_schema: config.dump.dump_schema,
        dump_data: config.dump.dump_data,
        fail_policy: config.dump.fail_policy,
        table_options,
    };
    dump::run(session, options);
}

/// 读取按数据库名组织的表过滤配置,没有配置文件时使用默认值
fn load_table_options(config: &TaskConfig) -> Result<TableOptions, Box<dyn Error>> {
    let path = match &config.dump.tables_file {
        Some(path) => path,
        None => return Ok(TableOptions::default()),
    };

    let content = fs::read_to_string(path)?;
    let mut all: HashMap<String, TableOptions> = serde_json::from_str(&content)?;
    Ok(all.remove(&config.database.database).unwrap_or_default())
}

pub fn print_error(
    severity: &str,
    message: &str,
) {
    print_progress(ProgressMessage {
        kind: MessageKind::Error,
        data: serde_json::json!({
            "severity": severity,
            "message": message,
        }),
    });
}

pub fn print_status(data: serde_json::Value) {
    print_progress(ProgressMessage {
        kind: MessageKind::Status,
        data,
    });
}

pub fn print_completed(data: serde_json::Value) {
    print_progress(ProgressMessage {
        kind: MessageKind::Completed,
        data,
    });
}

pub fn print_progress(msg: ProgressMessage) {
    if let Ok(json) = serde_json::to_string(&msg) {
        println!("{}", json);
    }
}
