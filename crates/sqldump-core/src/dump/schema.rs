use crate::driver::{DatabaseSession, DumpError, escape_backtick};

/// 提取单表的建表语句
///
/// SHOW CREATE TABLE 回显的表名必须与请求的表名一致,不一致说明驱动或目录
/// 状态异常,按硬错误处理。
pub fn create_table_sql(
    session: &mut dyn DatabaseSession,
    table: &str,
) -> Result<String, DumpError> {
    let sql = format!("SHOW CREATE TABLE `{}`", escape_backtick(table));
    let raw = session.query_raw(&sql)?;

    let row = match raw.rows.first() {
        Some(row) => row,
        None => {
            return Err(DumpError::QueryFailure(format!("SHOW CREATE TABLE {} 未返回任何行", table)));
        }
    };

    let returned =
        cell_text(row, 0).ok_or_else(|| DumpError::ScanFailure(format!("表 {} 的回显表名为空", table)))?;
    let schema_sql =
        cell_text(row, 1).ok_or_else(|| DumpError::ScanFailure(format!("表 {} 的建表语句为空", table)))?;

    if returned != table {
        return Err(DumpError::SchemaMismatch {
            requested: table.into(),
            returned,
        });
    }
    Ok(schema_sql)
}

fn cell_text(
    row: &[Option<Vec<u8>>],
    index: usize,
) -> Option<String> {
    row.get(index)
        .and_then(|cell| cell.as_deref())
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}
