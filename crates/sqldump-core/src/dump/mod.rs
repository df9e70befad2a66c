use chrono::Utc;
use serde::Serialize;

use crate::driver::{DatabaseSession, DumpError};
use crate::{DumpOptions, FailPolicy};

use self::writer::FileWriter;

pub mod data;
pub mod encode;
pub mod render;
pub mod schema;
pub mod tables;
pub mod writer;

#[cfg(test)]
pub(crate) mod mock;

/// 一次导出运行的结果汇总
#[derive(Debug, Default, Serialize)]
pub struct DumpSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<TableFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enumeration_error: Option<String>,
}

impl DumpSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty() || self.enumeration_error.is_some()
    }
}

/// 单表导出失败记录
#[derive(Debug, Serialize)]
pub struct TableFailure {
    pub table: String,
    pub phase: &'static str,
    pub message: String,
}

/// 导出编排器:文件头 → 逐表结构/数据 → 文件尾
pub struct Dumper {
    session: Box<dyn DatabaseSession>,
    writer: FileWriter,
    options: DumpOptions,
}

impl std::fmt::Debug for Dumper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dumper").finish_non_exhaustive()
    }
}

impl Dumper {
    pub fn new(
        session: Box<dyn DatabaseSession>,
        options: DumpOptions,
    ) -> Result<Self, DumpError> {
        if options.database.trim().is_empty() {
            return Err(DumpError::MissingField("database".into()));
        }
        if options.file_name.trim().is_empty() {
            return Err(DumpError::MissingField("file_name".into()));
        }

        let writer = FileWriter::new(&options.dir, &options.file_name)?;
        Ok(Self {
            session,
            writer,
            options,
        })
    }

    /// 执行整个导出流程
    ///
    /// 失败路由遵循配置的 FailPolicy:Continue 下枚举失败与单表失败都记入汇总
    /// 并继续;FailFast 下第一个错误即终止。写产物失败在两种策略下都立即终止,
    /// 产物无法追加时继续跑只会静默丢段落。
    pub fn dump(&mut self) -> Result<DumpSummary, DumpError> {
        let start_time = Utc::now().to_rfc3339();
        let server_version = server_version(self.session.as_mut())?;
        tracing::info!("开始导出数据库 {},服务器版本 {}", self.options.database, server_version);

        self.writer
            .append(&render::render_header(render::DUMP_VERSION, &start_time, &server_version))?;

        let mut summary = DumpSummary::default();
        let tables = match tables::list_tables(
            self.session.as_mut(),
            &self.options.database,
            &self.options.table_options,
        ) {
            Ok(tables) => tables,
            Err(err) => {
                if self.options.fail_policy == FailPolicy::FailFast {
                    return Err(err);
                }
                tracing::error!("枚举表清单失败: {}", err);
                summary.enumeration_error = Some(err.to_string());
                vec![]
            }
        };
        tracing::info!("待导出表共 {} 个", tables.len());

        for table in &tables {
            match self.dump_table(table) {
                Ok(()) => summary.succeeded.push(table.clone()),
                Err((phase, err)) => {
                    if matches!(err, DumpError::WriteFailure(_))
                        || self.options.fail_policy == FailPolicy::FailFast
                    {
                        return Err(err);
                    }
                    tracing::error!("导出表 {} 失败({}): {}", table, phase, err);
                    summary.failed.push(TableFailure {
                        table: table.clone(),
                        phase,
                        message: err.to_string(),
                    });
                }
            }
        }

        self.writer.append(&render::render_footer(&Utc::now().to_rfc3339()))?;
        tracing::info!("导出完成,成功 {} 个表,失败 {} 个表", summary.succeeded.len(), summary.failed.len());
        Ok(summary)
    }

    // 段落先完整渲染再追加,失败的阶段不落任何字节
    fn dump_table(
        &mut self,
        table: &str,
    ) -> Result<(), (&'static str, DumpError)> {
        if self.options.dump_schema {
            tracing::debug!("导出表结构: {}", table);
            let schema_sql =
                schema::create_table_sql(self.session.as_mut(), table).map_err(|err| ("schema", err))?;
            self.writer
                .append(&render::render_table_schema(table, &schema_sql))
                .map_err(|err| ("schema", err))?;
        }

        if self.options.dump_data {
            tracing::debug!("导出表数据: {}", table);
            let values = data::table_values(
                self.session.as_mut(),
                table,
                self.options.table_options.where_clause.as_deref(),
            )
            .map_err(|err| ("data", err))?;
            self.writer
                .append(&render::render_table_data(table, &values))
                .map_err(|err| ("data", err))?;
        }

        Ok(())
    }
}

/// 查询服务器版本号,写入文件头
fn server_version(session: &mut dyn DatabaseSession) -> Result<String, DumpError> {
    let raw = session.query_raw("SELECT version()")?;
    raw.rows
        .first()
        .and_then(|row| row.first())
        .and_then(|cell| cell.as_deref())
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .ok_or_else(|| DumpError::QueryFailure("无法获取服务器版本".into()))
}
