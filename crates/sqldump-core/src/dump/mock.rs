use std::collections::VecDeque;

use crate::driver::{ColumnMeta, DatabaseSession, DumpError, RawTable};

/// 按脚本顺序应答的会话替身,记录收到的每条 SQL
pub struct MockSession {
    responses: VecDeque<Result<RawTable, DumpError>>,
    pub executed: Vec<String>,
}

impl MockSession {
    pub fn new() -> Self {
        Self {
            responses: VecDeque::new(),
            executed: vec![],
        }
    }

    pub fn push(
        &mut self,
        response: Result<RawTable, DumpError>,
    ) {
        self.responses.push_back(response);
    }
}

impl DatabaseSession for MockSession {
    fn query_raw(
        &mut self,
        sql: &str,
    ) -> Result<RawTable, DumpError> {
        self.executed.push(sql.into());
        match self.responses.pop_front() {
            Some(response) => response,
            None => Err(DumpError::QueryFailure(format!("未预置应答: {}", sql))),
        }
    }
}

/// 构造查询结果,单元格为可空字节串
pub fn raw_table(
    cols: &[(&str, &str)],
    rows: &[Vec<Option<&[u8]>>],
) -> RawTable {
    RawTable {
        cols: cols
            .iter()
            .map(|(name, kind)| ColumnMeta {
                name: (*name).into(),
                kind: (*kind).into(),
            })
            .collect(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.map(|bytes| bytes.to_vec())).collect())
            .collect(),
    }
}

/// 单列字符串结果,用于表清单与版本号应答
pub fn single_column(values: &[&str]) -> RawTable {
    RawTable {
        cols: vec![ColumnMeta {
            name: "value".into(),
            kind: "VARCHAR".into(),
        }],
        rows: values.iter().map(|v| vec![Some(v.as_bytes().to_vec())]).collect(),
    }
}

/// SHOW CREATE TABLE 形状的应答:回显表名 + 建表语句
pub fn schema_row(
    name: &str,
    schema_sql: &str,
) -> RawTable {
    raw_table(
        &[("Table", "VARCHAR"), ("Create Table", "VARCHAR")],
        &[vec![Some(name.as_bytes()), Some(schema_sql.as_bytes())]],
    )
}
