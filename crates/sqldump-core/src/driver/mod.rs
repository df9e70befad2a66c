use crate::MySQLOptions;

pub use self::mysql::MySQLDriver;

mod mysql;

/// 结果集单列的元信息
#[derive(Clone, Debug)]
pub struct ColumnMeta {
    pub name: String,
    pub kind: String,
}

/// 原始查询结果,单元格为可空字节串
#[derive(Clone, Debug, Default)]
pub struct RawTable {
    pub cols: Vec<ColumnMeta>,
    pub rows: Vec<Vec<Option<Vec<u8>>>>,
}

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("数据库连接失败: {0}")]
    ConnectionFailure(String),
    #[error("查询执行失败: {0}")]
    QueryFailure(String),
    #[error("行数据解码失败: {0}")]
    ScanFailure(String),
    #[error("表结构校验失败: 请求 {requested},返回 {returned}")]
    SchemaMismatch { requested: String, returned: String },
    #[error("表 {0} 未报告任何列")]
    EmptyTableSchema(String),
    #[error("写入导出文件失败: {0}")]
    WriteFailure(#[from] std::io::Error),
    #[error("配置字段缺失: {0}")]
    MissingField(String),
    #[error("配置字段非法: {0}")]
    InvalidField(String),
}

pub trait DatabaseDriver {
    type Config;

    fn check_connection(
        &self,
        config: &Self::Config,
    ) -> Result<(), DumpError>;

    fn create_connection(
        &self,
        config: &Self::Config,
    ) -> Result<Box<dyn DatabaseSession>, DumpError>;
}

/// 导出引擎依赖的最小查询能力
pub trait DatabaseSession: Send {
    fn query_raw(
        &mut self,
        sql: &str,
    ) -> Result<RawTable, DumpError>;
}

pub fn check_connection(opts: &MySQLOptions) -> Result<(), DumpError> {
    MySQLDriver.check_connection(opts)
}

pub fn create_connection(opts: &MySQLOptions) -> Result<Box<dyn DatabaseSession>, DumpError> {
    MySQLDriver.create_connection(opts)
}

pub fn validate_sql(sql: &str) -> Result<(), DumpError> {
    if sql.trim().is_empty() {
        return Err(DumpError::InvalidField("sql".into()));
    }
    Ok(())
}

pub fn escape_backtick(s: &str) -> String {
    s.replace('`', "``")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backticks_are_doubled() {
        assert_eq!(escape_backtick("a`b"), "a``b");
        assert_eq!(escape_backtick("plain"), "plain");
    }

    #[test]
    fn blank_sql_is_rejected() {
        assert!(matches!(validate_sql("   "), Err(DumpError::InvalidField(_))));
        assert!(validate_sql("SELECT 1").is_ok());
    }
}
