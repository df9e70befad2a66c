use crate::driver::{DatabaseSession, DumpError, escape_backtick};

use super::encode::{self, EncodePolicy};

/// 提取单表全部行数据,编码为可直接拼在 VALUES 之后的元组序列
///
/// 所有行在拼接前先在内存中累积,表的体量受可用内存约束;任何一行解码失败
/// 都会放弃本表已累积的部分,不会输出残缺的 INSERT。
pub fn table_values(
    session: &mut dyn DatabaseSession,
    table: &str,
    where_clause: Option<&str>,
) -> Result<String, DumpError> {
    let mut sql = format!("SELECT * FROM `{}`", escape_backtick(table));
    if let Some(clause) = where_clause {
        if !clause.trim().is_empty() {
            sql.push_str(&format!(" WHERE {}", clause));
        }
    }

    let raw = session.query_raw(&sql)?;
    if raw.cols.is_empty() {
        return Err(DumpError::EmptyTableSchema(table.into()));
    }

    // 每列的编码策略只按声明类型推导一次,整表复用
    let policies: Vec<EncodePolicy> = raw.cols.iter().map(|col| encode::policy_for_type(&col.kind)).collect();

    let mut tuples = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        if row.len() != policies.len() {
            return Err(DumpError::ScanFailure(format!(
                "表 {} 的行宽 {} 与列数 {} 不一致",
                table,
                row.len(),
                policies.len()
            )));
        }

        let literals: Vec<String> = row
            .iter()
            .zip(&policies)
            .map(|(value, policy)| encode::encode_value(*policy, value.as_deref()))
            .collect();
        tuples.push(format!("({})", literals.join(",")));
    }

    Ok(tuples.join(","))
}
