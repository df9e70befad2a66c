use serde::{Deserialize, Serialize};

// 核心模块导出
pub mod driver;
pub mod dump;

// 重新导出 driver 和 dump 类型
pub use driver::{
    ColumnMeta, DatabaseDriver, DatabaseSession, DumpError, MySQLDriver, RawTable, check_connection,
    create_connection, escape_backtick,
};

pub use dump::{DumpSummary, Dumper, TableFailure};

// ============================================================================
// Model Types
// ============================================================================

/// MySQL 连接配置
#[derive(Clone, Serialize, Deserialize)]
pub struct MySQLOptions {
    pub host: String,
    pub port: String,
    pub username: String,
    pub password: String,
    pub database: String,
    pub use_tls: bool,
}

impl Default for MySQLOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: "3306".into(),
            username: "root".into(),
            password: "".into(),
            database: String::new(),
            use_tls: false,
        }
    }
}

impl MySQLOptions {
    pub fn endpoint(&self) -> String {
        let scheme = if self.use_tls { "mysqls" } else { "mysql" };
        let db = self.database.trim();
        if db.is_empty() {
            format!("{}://{}:{}", scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}/{}", scheme, self.host, self.port, db)
        }
    }
}

/// 单次导出任务的完整配置
#[derive(Clone, Serialize, Deserialize)]
pub struct DumpOptions {
    pub database: String,
    pub dir: String,
    pub file_name: String,
    #[serde(default = "default_dump_schema")]
    pub dump_schema: bool,
    #[serde(default = "default_dump_data")]
    pub dump_data: bool,
    #[serde(default)]
    pub fail_policy: FailPolicy,
    #[serde(default)]
    pub table_options: TableOptions,
}

fn default_dump_schema() -> bool {
    true
}

fn default_dump_data() -> bool {
    true
}

/// 导出过程中遇到错误时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailPolicy {
    FailFast, // 任一表失败立即终止
    Continue, // 记录失败并继续导出其余表
}

impl Default for FailPolicy {
    fn default() -> Self {
        FailPolicy::Continue
    }
}

/// 单个数据库的表过滤与数据筛选配置
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    pub where_clause: Option<String>,
    pub included_tables: Vec<String>,
    pub excluded_tables: Vec<String>,
    pub included_tables_regex: Vec<String>,
    pub excluded_tables_regex: Vec<String>,
}
