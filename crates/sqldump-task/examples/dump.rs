use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// 示例:导出 sakila 数据库的结构与数据
fn dump_database() {
    let task_dir = PathBuf::from("/tmp/sqldump-tasks/dump-sakila");
    let output_file = PathBuf::from("/tmp/sakila.sql");

    // 清除上次任务的信息
    if task_dir.exists() {
        fs::remove_dir_all(&task_dir).unwrap();
    }
    if output_file.exists() {
        fs::remove_file(&output_file).unwrap();
    }
    fs::create_dir_all(&task_dir).unwrap();

    let config = json!({
        "task_id": "dump-sakila-001",
        "created_at": "2026-08-07T10:00:00Z",
        "database": {
            "host": "127.0.0.1",
            "port": "3306",
            "username": "root",
            "password": "root",
            "database": "sakila",
            "use_tls": false
        },
        "dump": {
            "dir": "/tmp",
            "file_name": "sakila.sql",
            "dump_schema": true,
            "dump_data": true,
            "fail_policy": "continue"
        }
    });

    fs::write(
        task_dir.join("config.json"),
        serde_json::to_string_pretty(&config).unwrap(),
    )
    .unwrap();

    println!("配置文件已创建: {:?}/config.json", task_dir);
    println!("正在执行任务...\n");

    // 直接调用二进制执行任务
    let status = Command::new("cargo")
        .args(["run", "-p", "sqldump-task", "--", "--task-dir"])
        .arg(&task_dir)
        .status()
        .expect("创建任务失败");

    if status.success() {
        println!("\n✓ 任务执行成功");
    } else {
        println!("\n✗ 任务执行失败");
    }
}

fn main() {
    println!("=== Sqldump Task 示例 ===\n");

    println!("示例: 导出整个数据库的结构与数据");
    println!("----------------------------------------");
    dump_database();
    println!();

    println!("注意:");
    println!("  1. 确保本机 3306 端口有可连接的 MySQL 实例");
    println!("  2. 确保目标数据库 sakila 存在");
    println!("  3. 输出文件将保存到 /tmp/sakila.sql");
    println!("  4. 导出包含表结构(CREATE TABLE)和数据(INSERT 语句)");
}
